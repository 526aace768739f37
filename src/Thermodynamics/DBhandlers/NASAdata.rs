//! # NASA-7 polynomial thermodynamic model
//!
//! Two temperature pieces with seven coefficients each, as stored in CHEMKIN
//! thermo blocks:
//!
//! Cp/R = a1 + a2 T + a3 T^2 + a4 T^3 + a5 T^4
//! H/RT = a1 + a2 T/2 + a3 T^2/3 + a4 T^3/4 + a5 T^4/5 + a6/T
//! S/R  = a1 ln T + a2 T + a3 T^2/2 + a4 T^3/3 + a5 T^4/4 + a7
//!
//! Besides the plain numbers the model hands out closures and symbolic
//! expressions of Cp, H and S for the piece covering a given temperature.
use RustedSciThe::symbolic::symbolic_engine::Expr;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

/// J/(mol·K)
#[allow(non_upper_case_globals)]
pub const R: f64 = 8.314462618;
#[allow(non_upper_case_globals)]
const Rsym: Expr = Expr::Const(R);

#[derive(Debug, Clone, PartialEq)]
pub enum NASAError {
    NoCoefficientsFound { temperature: f64, range: String },
    InvalidTemperatureRange { tmin: f64, tint: f64, tmax: f64 },
}

impl fmt::Display for NASAError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NASAError::NoCoefficientsFound { temperature, range } => {
                write!(
                    f,
                    "No coefficients found for temperature {} K. Valid range: {}",
                    temperature, range
                )
            }
            NASAError::InvalidTemperatureRange { tmin, tint, tmax } => {
                write!(
                    f,
                    "Invalid temperature range: expected Tmin < Tint < Tmax, got {} - {} - {}",
                    tmin, tint, tmax
                )
            }
        }
    }
}

impl Error for NASAError {}

#[allow(non_snake_case)]
pub fn Cp(t: f64, a: &[f64; 7]) -> f64 {
    R * (a[0] + a[1] * t + a[2] * t.powi(2) + a[3] * t.powi(3) + a[4] * t.powi(4))
}
pub fn dh(t: f64, a: &[f64; 7]) -> f64 {
    R * t
        * (a[0]
            + a[1] * t / 2.0
            + a[2] * t.powi(2) / 3.0
            + a[3] * t.powi(3) / 4.0
            + a[4] * t.powi(4) / 5.0
            + a[5] / t)
}
pub fn ds(t: f64, a: &[f64; 7]) -> f64 {
    R * (a[0] * t.ln()
        + a[1] * t
        + a[2] * t.powi(2) / 2.0
        + a[3] * t.powi(3) / 3.0
        + a[4] * t.powi(4) / 4.0
        + a[6])
}
#[allow(non_snake_case)]
fn Cp_sym(a: &[f64; 7]) -> Expr {
    let t = Expr::Var("T".to_owned());
    let c: Vec<Expr> = a.iter().map(|x| Expr::Const(*x)).collect();
    Rsym * (c[0].clone()
        + c[1].clone() * t.clone()
        + c[2].clone() * t.clone().pow(Expr::Const(2.0))
        + c[3].clone() * t.clone().pow(Expr::Const(3.0))
        + c[4].clone() * t.pow(Expr::Const(4.0)))
}
fn dh_sym(a: &[f64; 7]) -> Expr {
    let t = Expr::Var("T".to_owned());
    let c: Vec<Expr> = a.iter().map(|x| Expr::Const(*x)).collect();
    Rsym * t.clone()
        * (c[0].clone()
            + c[1].clone() * t.clone() / Expr::Const(2.0)
            + c[2].clone() * t.clone().pow(Expr::Const(2.0)) / Expr::Const(3.0)
            + c[3].clone() * t.clone().pow(Expr::Const(3.0)) / Expr::Const(4.0)
            + c[4].clone() * t.clone().pow(Expr::Const(4.0)) / Expr::Const(5.0)
            + c[5].clone() / t)
}
fn ds_sym(a: &[f64; 7]) -> Expr {
    let t = Expr::Var("T".to_owned());
    let c: Vec<Expr> = a.iter().map(|x| Expr::Const(*x)).collect();
    Rsym * (c[0].clone() * t.clone().ln()
        + c[1].clone() * t.clone()
        + c[2].clone() * t.clone().pow(Expr::Const(2.0)) / Expr::Const(2.0)
        + c[3].clone() * t.clone().pow(Expr::Const(3.0)) / Expr::Const(3.0)
        + c[4].clone() * t.pow(Expr::Const(4.0)) / Expr::Const(4.0)
        + c[6].clone())
}

/// one temperature piece of the NASA model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NasaPolynomial {
    /// a1..a7
    pub coeffs: [f64; 7],
    pub tmin: f64,
    pub tmax: f64,
}

impl NasaPolynomial {
    pub fn new(coeffs: [f64; 7], tmin: f64, tmax: f64) -> Self {
        Self { coeffs, tmin, tmax }
    }
    pub fn is_temperature_valid(&self, t: f64) -> bool {
        self.tmin <= t && t <= self.tmax
    }
}

/// Two-piece NASA-7 model: `low` on [Tmin, Tint], `high` on [Tint, Tmax].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NASAdata {
    pub low: NasaPolynomial,
    pub high: NasaPolynomial,
    /// free text attached to the record (source of the data)
    pub comment: Option<String>,
}

impl NASAdata {
    /// Builds the model from low- and high-temperature coefficients.
    pub fn new(
        low_coeffs: [f64; 7],
        high_coeffs: [f64; 7],
        tmin: f64,
        tint: f64,
        tmax: f64,
    ) -> Result<Self, NASAError> {
        if !(tmin < tint && tint < tmax) {
            return Err(NASAError::InvalidTemperatureRange { tmin, tint, tmax });
        }
        Ok(Self {
            low: NasaPolynomial::new(low_coeffs, tmin, tint),
            high: NasaPolynomial::new(high_coeffs, tint, tmax),
            comment: None,
        })
    }
    pub fn tmin(&self) -> f64 {
        self.low.tmin
    }
    /// common temperature of the two pieces
    pub fn tint(&self) -> f64 {
        self.low.tmax
    }
    pub fn tmax(&self) -> f64 {
        self.high.tmax
    }
    pub fn is_temperature_valid(&self, t: f64) -> bool {
        self.tmin() <= t && t <= self.tmax()
    }
    /// coefficients of the piece covering `t`
    pub fn extract_coefficients(&self, t: f64) -> Result<&[f64; 7], NASAError> {
        if self.low.is_temperature_valid(t) {
            Ok(&self.low.coeffs)
        } else if self.high.is_temperature_valid(t) {
            Ok(&self.high.coeffs)
        } else {
            Err(NASAError::NoCoefficientsFound {
                temperature: t,
                range: format!("{} - {} - {}", self.tmin(), self.tint(), self.tmax()),
            })
        }
    }
    /// heat capacity, J/(mol·K)
    #[allow(non_snake_case)]
    pub fn calculate_Cp(&self, t: f64) -> Result<f64, NASAError> {
        Ok(Cp(t, self.extract_coefficients(t)?))
    }
    /// enthalpy, J/mol
    pub fn calculate_dh(&self, t: f64) -> Result<f64, NASAError> {
        Ok(dh(t, self.extract_coefficients(t)?))
    }
    /// entropy, J/(mol·K)
    pub fn calculate_ds(&self, t: f64) -> Result<f64, NASAError> {
        Ok(ds(t, self.extract_coefficients(t)?))
    }
    /// Closures of Cp, H and S built from the piece covering `t`.
    #[allow(non_snake_case, clippy::type_complexity)]
    pub fn create_closures_Cp_dH_dS(
        &self,
        t: f64,
    ) -> Result<
        (
            Box<dyn Fn(f64) -> f64>,
            Box<dyn Fn(f64) -> f64>,
            Box<dyn Fn(f64) -> f64>,
        ),
        NASAError,
    > {
        let a = *self.extract_coefficients(t)?;
        Ok((
            Box::new(move |t| Cp(t, &a)),
            Box::new(move |t| dh(t, &a)),
            Box::new(move |t| ds(t, &a)),
        ))
    }
    /// Symbolic Cp(T), H(T), S(T) of the piece covering `t`.
    #[allow(non_snake_case)]
    pub fn create_sym_Cp_dH_dS(&self, t: f64) -> Result<(Expr, Expr, Expr), NASAError> {
        let a = self.extract_coefficients(t)?;
        Ok((
            Cp_sym(a).symplify(),
            dh_sym(a).symplify(),
            ds_sym(a).symplify(),
        ))
    }
}

impl fmt::Display for NASAdata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "NASA(Tmin={} K, Tint={} K, Tmax={} K)",
            self.tmin(),
            self.tint(),
            self.tmax()
        )
    }
}
