/// Module to handle reactions of the `REACTIONS` section: the kinetics models
/// CHEMKIN can express, the reaction entry (equation line plus auxiliary
/// lines) in both directions, and the CHEMKIN rules for `DUPLICATE` reactions.
///
/// Internally A is kept in cm, mol, s units and Ea in cal/mol whatever the
/// units of the file were.
use crate::Kinetics::species::Species;
use crate::Thermodynamics::DBhandlers::NASAdata::R;
use crate::Utils::diagnostics::Diagnostics;
use crate::Utils::number_format::{fixed_or_exact, format_sci};
use crate::chemkin_error::ChemkinError;
use enum_dispatch::enum_dispatch;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// cal/(mol·K)
pub const R_CAL: f64 = 1.987_204_258_640_83;
pub const AVOGADRO: f64 = 6.022_140_76e23;
const ATM: f64 = 101_325.0;

/// `(+M)` or `(+SPEC)`; the collider may carry an index suffix, `(+N2(35))`
static FALLOFF_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(\+\s*((?:[^()\s]|\([^()\s]*\))+)\s*\)").unwrap()
});
static MULTIPLIER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)(\D.*)$").unwrap());
static AUXILIARY_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^\s/]+)\s*/([^/]*)/").unwrap());

#[enum_dispatch]
pub trait RateExpression {
    /// rate coefficient at `t` (K) and `p` (Pa), cm-mol-s units
    fn rate_constant(&self, t: f64, p: f64) -> f64;
    fn is_pressure_dependent(&self) -> bool;
}

/// total concentration of an ideal gas, mol/cm³
fn total_concentration(t: f64, p: f64) -> f64 {
    p / (R * t) * 1e-6
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrhenius {
    pub a: f64,
    pub n: f64,
    /// cal/mol
    pub ea: f64,
}

impl Arrhenius {
    pub fn new(a: f64, n: f64, ea: f64) -> Self {
        Self { a, n, ea }
    }
    pub fn k(&self, t: f64) -> f64 {
        self.a * t.powf(self.n) * (-self.ea / (R_CAL * t)).exp()
    }
}

impl RateExpression for Arrhenius {
    fn rate_constant(&self, t: f64, _p: f64) -> f64 {
        self.k(t)
    }
    fn is_pressure_dependent(&self) -> bool {
        false
    }
}

/// `A + B + M` reactions; efficiencies are keyed by species position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThirdBody {
    pub arrhenius: Arrhenius,
    pub efficiencies: Vec<(usize, f64)>,
}

impl RateExpression for ThirdBody {
    /// effective coefficient with all collider efficiencies taken as one
    fn rate_constant(&self, t: f64, p: f64) -> f64 {
        self.arrhenius.k(t) * total_concentration(t, p)
    }
    fn is_pressure_dependent(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lindemann {
    pub high: Arrhenius,
    pub low: Arrhenius,
    pub efficiencies: Vec<(usize, f64)>,
}

fn reduced_pressure(high: &Arrhenius, low: &Arrhenius, t: f64, p: f64) -> f64 {
    low.k(t) * total_concentration(t, p) / high.k(t)
}

impl RateExpression for Lindemann {
    fn rate_constant(&self, t: f64, p: f64) -> f64 {
        let pr = reduced_pressure(&self.high, &self.low, t, p);
        self.high.k(t) * pr / (1.0 + pr)
    }
    fn is_pressure_dependent(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Troe {
    pub high: Arrhenius,
    pub low: Arrhenius,
    pub alpha: f64,
    pub t3: f64,
    pub t1: f64,
    pub t2: Option<f64>,
    pub efficiencies: Vec<(usize, f64)>,
}

impl RateExpression for Troe {
    fn rate_constant(&self, t: f64, p: f64) -> f64 {
        let pr = reduced_pressure(&self.high, &self.low, t, p);
        let mut f_cent =
            (1.0 - self.alpha) * (-t / self.t3).exp() + self.alpha * (-t / self.t1).exp();
        if let Some(t2) = self.t2 {
            f_cent += (-t2 / t).exp();
        }
        let log_f_cent = f_cent.log10();
        let c = -0.4 - 0.67 * log_f_cent;
        let n = 0.75 - 1.27 * log_f_cent;
        let d = 0.14;
        let x = pr.log10() + c;
        let log_f = log_f_cent / (1.0 + (x / (n - d * x)).powi(2));
        self.high.k(t) * pr / (1.0 + pr) * 10f64.powf(log_f)
    }
    fn is_pressure_dependent(&self) -> bool {
        true
    }
}

/// `PLOG` tables: Arrhenius expressions at a set of pressures (atm),
/// interpolated linearly in ln k against ln P.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PDepArrhenius {
    pub pressures: Vec<f64>,
    pub arrhenius: Vec<Arrhenius>,
}

impl RateExpression for PDepArrhenius {
    fn rate_constant(&self, t: f64, p: f64) -> f64 {
        let p = p / ATM;
        let n = self.pressures.len();
        if n == 0 {
            return 0.0;
        }
        if p <= self.pressures[0] {
            return self.arrhenius[0].k(t);
        }
        if p >= self.pressures[n - 1] {
            return self.arrhenius[n - 1].k(t);
        }
        let i = self.pressures.iter().position(|pi| *pi > p).unwrap_or(n - 1);
        let (p1, p2) = (self.pressures[i - 1], self.pressures[i]);
        let (k1, k2) = (self.arrhenius[i - 1].k(t), self.arrhenius[i].k(t));
        (k1.ln() + (k2.ln() - k1.ln()) * (p.ln() - p1.ln()) / (p2.ln() - p1.ln())).exp()
    }
    fn is_pressure_dependent(&self) -> bool {
        true
    }
}

#[enum_dispatch(RateExpression)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Kinetics {
    Arrhenius(Arrhenius),
    ThirdBody(ThirdBody),
    Lindemann(Lindemann),
    Troe(Troe),
    PDepArrhenius(PDepArrhenius),
}

impl Kinetics {
    pub fn efficiencies(&self) -> &[(usize, f64)] {
        match self {
            Kinetics::ThirdBody(k) => &k.efficiencies,
            Kinetics::Lindemann(k) => &k.efficiencies,
            Kinetics::Troe(k) => &k.efficiencies,
            _ => &[],
        }
    }
    /// `+M` in the equation
    pub fn is_third_body(&self) -> bool {
        matches!(self, Kinetics::ThirdBody(_))
    }
    /// `(+M)` in the equation
    pub fn is_falloff(&self) -> bool {
        matches!(self, Kinetics::Lindemann(_) | Kinetics::Troe(_))
    }
    pub fn model_name(&self) -> &'static str {
        match self {
            Kinetics::Arrhenius(_) => "Arrhenius",
            Kinetics::ThirdBody(_) => "ThirdBody",
            Kinetics::Lindemann(_) => "Lindemann",
            Kinetics::Troe(_) => "Troe",
            Kinetics::PDepArrhenius(_) => "PLOG",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    /// position in the file, from 1
    pub index: usize,
    /// positions in the species list, multipliers expanded
    pub reactants: Vec<usize>,
    pub products: Vec<usize>,
    pub reversible: bool,
    pub duplicate: bool,
    pub kinetics: Kinetics,
    /// collider of `(+AR)` style falloff reactions
    pub specific_collider: Option<usize>,
    pub family: Option<String>,
    pub library: Option<String>,
    pub comment: String,
}

fn sorted(v: &[usize]) -> Vec<usize> {
    let mut v = v.to_vec();
    v.sort_unstable();
    v
}

impl Reaction {
    pub fn rate_constant(&self, t: f64, p: f64) -> f64 {
        self.kinetics.rate_constant(t, p)
    }

    /// same species on the same sides
    pub fn matches_forward(&self, other: &Reaction) -> bool {
        sorted(&self.reactants) == sorted(&other.reactants)
            && sorted(&self.products) == sorted(&other.products)
    }

    /// same species on opposite sides
    pub fn matches_reverse(&self, other: &Reaction) -> bool {
        sorted(&self.reactants) == sorted(&other.products)
            && sorted(&self.products) == sorted(&other.reactants)
    }

    fn same_collider(&self, other: &Reaction) -> bool {
        self.specific_collider == other.specific_collider
    }

    /// Equation with species written through `name`.
    fn format_equation(
        &self,
        species: &[Species],
        name: impl Fn(&Species) -> Result<String, ChemkinError>,
    ) -> Result<String, ChemkinError> {
        let side = |indices: &[usize]| -> Result<String, ChemkinError> {
            let names = indices
                .iter()
                .map(|i| match species.get(*i) {
                    Some(spc) => name(spc),
                    None => Err(ChemkinError::MalformedReaction {
                        entry: format!("reaction {}", self.index),
                        reason: format!("no species at position {}", i),
                    }),
                })
                .collect::<Result<Vec<String>, ChemkinError>>()?;
            let mut s = names.join(" + ");
            if self.kinetics.is_third_body() {
                s.push_str(" + M");
            } else if let Some(collider) = self.specific_collider {
                let collider = species.get(collider).map(&name).transpose()?;
                s.push_str(&format!(" (+{})", collider.unwrap_or_default()));
            } else if self.kinetics.is_falloff() {
                s.push_str(" (+M)");
            }
            Ok(s)
        };
        let arrow = if self.reversible { "<=>" } else { "=>" };
        Ok(format!(
            "{} {} {}",
            side(&self.reactants)?,
            arrow,
            side(&self.products)?
        ))
    }

    /// Equation with CHEMKIN identifiers, as written to files.
    pub fn equation(&self, species: &[Species]) -> Result<String, ChemkinError> {
        self.format_equation(species, |spc| spc.identifier())
    }

    /// Equation with labels, for messages.
    pub fn display(&self, species: &[Species]) -> String {
        self.format_equation(species, |spc| Ok(spc.to_string()))
            .unwrap_or_else(|_| format!("reaction {}", self.index))
    }
}

impl fmt::Display for Kinetics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kinetics::Arrhenius(k) => write!(f, "Arrhenius(A={}, n={}, Ea={} cal/mol)", k.a, k.n, k.ea),
            Kinetics::ThirdBody(k) => write!(
                f,
                "ThirdBody(A={}, n={}, Ea={} cal/mol, {} efficiencies)",
                k.arrhenius.a,
                k.arrhenius.n,
                k.arrhenius.ea,
                k.efficiencies.len()
            ),
            Kinetics::Lindemann(k) => write!(f, "Lindemann(A_inf={}, A_0={})", k.high.a, k.low.a),
            Kinetics::Troe(k) => write!(
                f,
                "Troe(A_inf={}, A_0={}, alpha={})",
                k.high.a, k.low.a, k.alpha
            ),
            Kinetics::PDepArrhenius(k) => write!(f, "PLOG({} pressures)", k.pressures.len()),
        }
    }
}

/////////////////////////////////////UNITS////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnergyUnit {
    CalPerMole,
    KcalPerMole,
    JoulesPerMole,
    KjoulesPerMole,
    Kelvins,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuantityUnit {
    Moles,
    Molecules,
}

/// units declared on the `REACTIONS` line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionUnits {
    pub energy: EnergyUnit,
    pub quantity: QuantityUnit,
}

impl Default for ReactionUnits {
    fn default() -> Self {
        ReactionUnits {
            energy: EnergyUnit::CalPerMole,
            quantity: QuantityUnit::Moles,
        }
    }
}

impl ReactionUnits {
    /// Reads the unit keywords following `REACTIONS`.
    pub fn from_header(line: &str) -> Result<Self, ChemkinError> {
        let mut units = ReactionUnits::default();
        for token in line.split_whitespace().skip(1) {
            match token.to_uppercase().as_str() {
                "CAL/MOLE" => units.energy = EnergyUnit::CalPerMole,
                "KCAL/MOLE" => units.energy = EnergyUnit::KcalPerMole,
                "JOULES/MOLE" => units.energy = EnergyUnit::JoulesPerMole,
                "KJOULES/MOLE" => units.energy = EnergyUnit::KjoulesPerMole,
                "KELVINS" => units.energy = EnergyUnit::Kelvins,
                "MOLES" => units.quantity = QuantityUnit::Moles,
                "MOLECULES" => units.quantity = QuantityUnit::Molecules,
                _ => return Err(ChemkinError::UnsupportedUnits(token.to_string())),
            }
        }
        Ok(units)
    }

    /// activation energy in cal/mol
    pub fn energy_to_cal(&self, value: f64) -> f64 {
        match self.energy {
            EnergyUnit::CalPerMole => value,
            EnergyUnit::KcalPerMole => value * 1000.0,
            EnergyUnit::JoulesPerMole => value / 4.184,
            EnergyUnit::KjoulesPerMole => value * 1000.0 / 4.184,
            EnergyUnit::Kelvins => value * R_CAL,
        }
    }

    /// pre-exponential factor in cm-mol-s units for a reaction of `order`
    pub fn a_to_moles(&self, value: f64, order: usize) -> f64 {
        match self.quantity {
            QuantityUnit::Moles => value,
            QuantityUnit::Molecules => value * AVOGADRO.powi(order as i32 - 1),
        }
    }

    pub fn arrhenius(&self, a: f64, n: f64, ea: f64, order: usize) -> Arrhenius {
        Arrhenius::new(self.a_to_moles(a, order), n, self.energy_to_cal(ea))
    }
}

/////////////////////////////////////READING////////////////////////////////////////////////

/// What a `(+X)` or `+M` on the reactant side says.
#[derive(Debug, Clone, PartialEq)]
enum Collider {
    None,
    ThirdBody,
    Falloff,
    Specific(usize),
}

struct Equation {
    reactants: Vec<usize>,
    products: Vec<usize>,
    reversible: bool,
    collider: Collider,
}

/// Splits one side on `+`; an empty piece belongs to the previous name
/// (`H3O+ + e`).
fn split_side(side: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for piece in side.split('+') {
        let piece = piece.trim();
        if piece.is_empty() {
            if let Some(last) = names.last_mut() {
                last.push('+');
            }
            continue;
        }
        names.push(piece.to_string());
    }
    names
}

fn parse_side(
    side: &str,
    equation: &str,
    lookup: &HashMap<String, usize>,
) -> Result<(Vec<usize>, Collider), ChemkinError> {
    let mut collider = Collider::None;
    let mut text = side.to_string();
    if let Some(caps) = FALLOFF_MARKER.captures(side) {
        let name = caps[1].to_string();
        collider = if name.eq_ignore_ascii_case("M") {
            Collider::Falloff
        } else {
            let index = lookup
                .get(&name)
                .ok_or_else(|| ChemkinError::UnexpectedSpecies {
                    species: name.clone(),
                    reaction: equation.to_string(),
                })?;
            Collider::Specific(*index)
        };
        text = FALLOFF_MARKER.replace(side, "").to_string();
    }
    let mut species = Vec::new();
    for name in split_side(&text) {
        if name.eq_ignore_ascii_case("M") {
            collider = Collider::ThirdBody;
            continue;
        }
        if let Some(index) = lookup.get(&name) {
            species.push(*index);
            continue;
        }
        let multiplied = MULTIPLIER.captures(&name).and_then(|caps| {
            let count = caps[1].parse::<usize>().ok()?;
            lookup.get(&caps[2]).map(|index| (count, *index))
        });
        match multiplied {
            Some((count, index)) => species.extend(std::iter::repeat_n(index, count)),
            None => {
                return Err(ChemkinError::UnexpectedSpecies {
                    species: name,
                    reaction: equation.to_string(),
                });
            }
        }
    }
    Ok((species, collider))
}

fn parse_equation(
    equation: &str,
    lookup: &HashMap<String, usize>,
) -> Result<Equation, ChemkinError> {
    let (left, right, reversible) = if let Some((l, r)) = equation.split_once("<=>") {
        (l, r, true)
    } else if let Some((l, r)) = equation.split_once("=>") {
        (l, r, false)
    } else if let Some((l, r)) = equation.split_once('=') {
        (l, r, true)
    } else {
        return Err(ChemkinError::MalformedReaction {
            entry: equation.to_string(),
            reason: "no reaction arrow".to_string(),
        });
    };
    let (reactants, left_collider) = parse_side(left, equation, lookup)?;
    let (products, right_collider) = parse_side(right, equation, lookup)?;
    if left_collider != right_collider {
        return Err(ChemkinError::MalformedReaction {
            entry: equation.to_string(),
            reason: "third body differs between reactants and products".to_string(),
        });
    }
    if reactants.is_empty() || products.is_empty() {
        return Err(ChemkinError::MalformedReaction {
            entry: equation.to_string(),
            reason: "a side of the equation has no species".to_string(),
        });
    }
    Ok(Equation {
        reactants,
        products,
        reversible,
        collider: left_collider,
    })
}

fn parse_numbers(values: &str, entry: &str, keyword: &str) -> Result<Vec<f64>, ChemkinError> {
    values
        .split_whitespace()
        .map(|v| {
            v.parse::<f64>().map_err(|_| ChemkinError::MalformedReaction {
                entry: entry.to_string(),
                reason: format!("could not convert string to float: {} (in {})", v, keyword),
            })
        })
        .collect()
}

/// Parses one reaction: the equation line followed by its auxiliary lines,
/// comments already removed. `lookup` maps file identifiers to species
/// positions.
pub fn read_reaction_entry(
    lines: &[&str],
    lookup: &HashMap<String, usize>,
    units: &ReactionUnits,
    index: usize,
) -> Result<Reaction, ChemkinError> {
    let first = lines.first().map(|l| l.trim()).unwrap_or("");
    let malformed = |reason: String| ChemkinError::MalformedReaction {
        entry: first.to_string(),
        reason,
    };
    let tokens: Vec<&str> = first.split_whitespace().collect();
    if tokens.len() < 4 {
        return Err(malformed("expected an equation followed by A, n and Ea".to_string()));
    }
    let equation_text: String = tokens[..tokens.len() - 3].concat();
    let numbers = parse_numbers(&tokens[tokens.len() - 3..].join(" "), first, "Arrhenius")?;
    let equation = parse_equation(&equation_text, lookup)?;

    let order = equation.reactants.len();
    let third_body_order = order + 1;
    let main_order = if equation.collider == Collider::ThirdBody {
        third_body_order
    } else {
        order
    };
    let main = units.arrhenius(numbers[0], numbers[1], numbers[2], main_order);

    let mut duplicate = false;
    let mut low: Option<Arrhenius> = None;
    let mut troe: Option<Vec<f64>> = None;
    let mut plog: Vec<(f64, Arrhenius)> = Vec::new();
    let mut efficiencies: Vec<(usize, f64)> = Vec::new();
    for line in lines[1..].iter() {
        let data = line.trim();
        if data.is_empty() {
            continue;
        }
        if data.to_uppercase().starts_with("DUP") {
            duplicate = true;
            continue;
        }
        let leftover = AUXILIARY_FIELD.replace_all(data, "");
        if !leftover.trim().is_empty() {
            return Err(malformed(format!("cannot read auxiliary line '{}'", data)));
        }
        for caps in AUXILIARY_FIELD.captures_iter(data) {
            let keyword = &caps[1];
            let values = &caps[2];
            match keyword.to_uppercase().as_str() {
                "LOW" => {
                    let v = parse_numbers(values, first, keyword)?;
                    if v.len() != 3 {
                        return Err(malformed(format!("LOW needs 3 values, got {}", v.len())));
                    }
                    low = Some(units.arrhenius(v[0], v[1], v[2], third_body_order));
                }
                "TROE" => {
                    let v = parse_numbers(values, first, keyword)?;
                    if !(v.len() == 3 || v.len() == 4) {
                        return Err(malformed(format!("TROE needs 3 or 4 values, got {}", v.len())));
                    }
                    troe = Some(v);
                }
                "PLOG" => {
                    let v = parse_numbers(values, first, keyword)?;
                    if v.len() != 4 {
                        return Err(malformed(format!("PLOG needs 4 values, got {}", v.len())));
                    }
                    plog.push((v[0], units.arrhenius(v[1], v[2], v[3], order)));
                }
                _ => match lookup.get(keyword) {
                    Some(species_index) => {
                        let v = parse_numbers(values, first, keyword)?;
                        if v.len() != 1 {
                            return Err(malformed(format!(
                                "efficiency of {} needs 1 value",
                                keyword
                            )));
                        }
                        efficiencies.push((*species_index, v[0]));
                    }
                    None => {
                        return Err(malformed(format!(
                            "unknown auxiliary keyword or species '{}'",
                            keyword
                        )));
                    }
                },
            }
        }
    }

    let falloff = matches!(equation.collider, Collider::Falloff | Collider::Specific(_));
    if low.is_some() && !falloff {
        return Err(malformed("LOW given for a reaction without (+M)".to_string()));
    }
    if !efficiencies.is_empty() && equation.collider == Collider::None {
        return Err(malformed("collider efficiencies given without third body".to_string()));
    }
    let kinetics = if !plog.is_empty() {
        let (pressures, arrhenius) = plog.into_iter().unzip();
        Kinetics::PDepArrhenius(PDepArrhenius {
            pressures,
            arrhenius,
        })
    } else if falloff {
        let low = low.ok_or_else(|| malformed("falloff reaction without LOW".to_string()))?;
        match troe {
            Some(v) => Kinetics::Troe(Troe {
                high: main,
                low,
                alpha: v[0],
                t3: v[1],
                t1: v[2],
                t2: v.get(3).copied(),
                efficiencies,
            }),
            None => Kinetics::Lindemann(Lindemann {
                high: main,
                low,
                efficiencies,
            }),
        }
    } else if equation.collider == Collider::ThirdBody {
        Kinetics::ThirdBody(ThirdBody {
            arrhenius: main,
            efficiencies,
        })
    } else {
        Kinetics::Arrhenius(main)
    };

    Ok(Reaction {
        index,
        reactants: equation.reactants,
        products: equation.products,
        reversible: equation.reversible,
        duplicate,
        kinetics,
        specific_collider: match equation.collider {
            Collider::Specific(i) => Some(i),
            _ => None,
        },
        family: None,
        library: None,
        comment: String::new(),
    })
}

/////////////////////////////////////WRITING////////////////////////////////////////////////

/// A with six significant digits
fn format_a(a: f64) -> String {
    format_sci(a, 5, 'e')
}

/// shortest exact form, exponent notation for very large or small values
fn format_parameter(v: f64) -> String {
    if v == 0.0 || (1e-3..1e6).contains(&v.abs()) {
        format!("{}", v)
    } else {
        format!("{:e}", v)
    }
}

fn arrhenius_fields(k: &Arrhenius) -> String {
    format!("{:<9} {:<9.3} {:<9.3}", format_a(k.a), k.n, k.ea / 1000.0)
}

/// Formats the reaction for a `REACTIONS KCAL/MOLE MOLES` section: the
/// equation line, auxiliary lines and `DUPLICATE`. Comments are left to the
/// caller.
pub fn write_reaction_entry(
    reaction: &Reaction,
    species: &[Species],
) -> Result<String, ChemkinError> {
    let equation = reaction.equation(species)?;
    let mut s = String::new();
    let main = match &reaction.kinetics {
        Kinetics::Arrhenius(k) => k.clone(),
        Kinetics::ThirdBody(k) => k.arrhenius.clone(),
        Kinetics::Lindemann(k) => k.high.clone(),
        Kinetics::Troe(k) => k.high.clone(),
        // CHEMKIN wants a placeholder expression on the equation line
        Kinetics::PDepArrhenius(_) => Arrhenius::new(1.0, 0.0, 0.0),
    };
    s.push_str(&format!("{:<51} {}\n", equation, arrhenius_fields(&main)));

    match &reaction.kinetics {
        Kinetics::Lindemann(k) => {
            s.push_str(&format!("    LOW/ {}/\n", arrhenius_fields(&k.low)));
        }
        Kinetics::Troe(k) => {
            s.push_str(&format!("    LOW/ {}/\n", arrhenius_fields(&k.low)));
            let mut troe = format!(
                "    TROE/ {} {} {}",
                format_parameter(k.alpha),
                format_parameter(k.t3),
                format_parameter(k.t1)
            );
            if let Some(t2) = k.t2 {
                troe.push_str(&format!(" {}", format_parameter(t2)));
            }
            troe.push_str("/\n");
            s.push_str(&troe);
        }
        Kinetics::PDepArrhenius(k) => {
            for (p, arrhenius) in k.pressures.iter().zip(k.arrhenius.iter()) {
                s.push_str(&format!(
                    "    PLOG/ {:<9} {}/\n",
                    fixed_or_exact(*p, 3),
                    arrhenius_fields(arrhenius)
                ));
            }
        }
        _ => {}
    }
    let efficiencies = reaction.kinetics.efficiencies();
    if !efficiencies.is_empty() {
        let mut line = String::new();
        for (i, efficiency) in efficiencies.iter() {
            let spc = species.get(*i).ok_or_else(|| ChemkinError::MalformedReaction {
                entry: equation.clone(),
                reason: format!("no species at position {}", i),
            })?;
            line.push_str(&format!(
                "{}/{}/ ",
                spc.identifier()?,
                fixed_or_exact(*efficiency, 2)
            ));
        }
        s.push_str(line.trim_end());
        s.push('\n');
    }
    if reaction.duplicate {
        s.push_str("DUPLICATE\n");
    }
    Ok(s)
}

/////////////////////////////////////DUPLICATES////////////////////////////////////////////////

/// Adjusts `DUPLICATE` flags before writing: matching reactions with the
/// same pressure dependence are marked, while flagged pairs that CHEMKIN
/// would not accept as duplicates are unmarked.
pub fn mark_duplicate_reactions(
    reactions: &mut [Reaction],
    species: &[Species],
    diag: &mut Diagnostics,
) {
    for i in 0..reactions.len() {
        for j in (i + 1)..reactions.len() {
            let (head, tail) = reactions.split_at_mut(j);
            let (r1, r2) = (&mut head[i], &mut tail[0]);
            let forward = r1.matches_forward(r2);
            let reverse = r1.matches_reverse(r2);
            if !(forward || reverse) || !r1.same_collider(r2) {
                continue;
            }
            let same_pdep =
                r1.kinetics.is_pressure_dependent() == r2.kinetics.is_pressure_dependent();
            let opposite_irreversible = reverse && !forward && !r1.reversible && !r2.reversible;
            if r1.duplicate && r2.duplicate {
                if !same_pdep {
                    r1.duplicate = false;
                    r2.duplicate = false;
                    diag.warning(format!(
                        "Marked reaction {} as not duplicate because of varying pressure dependence for saving to Chemkin file.",
                        r1.display(species)
                    ));
                } else if opposite_irreversible {
                    r1.duplicate = false;
                    r2.duplicate = false;
                    diag.warning(format!(
                        "Marked reaction {} as not duplicate because they are irreversible in opposite directions for saving to Chemkin file.",
                        r1.display(species)
                    ));
                }
            } else if same_pdep && !opposite_irreversible {
                r1.duplicate = true;
                r2.duplicate = true;
                diag.warning(format!(
                    "Marked reaction {} as duplicate of {} for saving to Chemkin file.",
                    r1.display(species),
                    r2.display(species)
                ));
            }
        }
    }
}

/// Fails on the first pair of identical reactions (same species, same
/// collider, same pressure dependence) that are not both marked `DUPLICATE`.
pub fn check_for_unmarked_duplicates(
    reactions: &[Reaction],
    species: &[Species],
) -> Result<(), ChemkinError> {
    for (i, r1) in reactions.iter().enumerate() {
        for r2 in reactions[i + 1..].iter() {
            if r1.matches_forward(r2)
                && r1.same_collider(r2)
                && r1.kinetics.is_third_body() == r2.kinetics.is_third_body()
                && r1.kinetics.is_pressure_dependent() == r2.kinetics.is_pressure_dependent()
                && !(r1.duplicate && r2.duplicate)
            {
                return Err(ChemkinError::UnmarkedDuplicate(r1.display(species)));
            }
        }
    }
    Ok(())
}
