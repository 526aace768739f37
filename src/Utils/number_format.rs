//! Number formatting in the conventions of CHEMKIN (Fortran/C style) files.
//!
//! Rust prints exponents as `E4`, CHEMKIN files carry `E+04`.

/// Scientific notation with a signed, at least two-digit exponent:
/// `format_sci(-11965.5244, 8, 'E') == "-1.19655244E+04"`.
pub fn format_sci(value: f64, precision: usize, exp_char: char) -> String {
    if !value.is_finite() {
        return format!("{}", value);
    }
    let raw = format!("{:.*E}", precision, value);
    match raw.split_once('E') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{}{}{}{:02}", mantissa, exp_char, sign, exponent.abs())
        }
        None => raw,
    }
}

/// NASA coefficient field: 15 columns, a blank in place of the sign for
/// non-negative numbers, 8 decimals.
pub fn format_thermo_coefficient(value: f64) -> String {
    let body = format_sci(value, 8, 'E');
    let signed = if value.is_sign_negative() {
        body
    } else {
        format!(" {}", body)
    };
    format!("{:<15}", signed)
}

/// `decimals` fixed decimals when that representation reads back as exactly
/// the same number, otherwise the shortest representation that does.
pub fn fixed_or_exact(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, value);
    match fixed.parse::<f64>() {
        Ok(v) if v == value => fixed,
        _ => format!("{}", value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_sci() {
        assert_eq!(format_sci(2.44813916, 8, 'E'), "2.44813916E+00");
        assert_eq!(format_sci(-11965.5244, 8, 'E'), "-1.19655244E+04");
        assert_eq!(format_sci(-9.60327447e-14, 8, 'E'), "-9.60327447E-14");
        assert_eq!(format_sci(1.0e10, 3, 'e'), "1.000e+10");
        assert_eq!(format_sci(0.0, 3, 'e'), "0.000e+00");
        assert_eq!(format_sci(1.5e120, 2, 'e'), "1.50e+120");
    }

    #[test]
    fn test_format_thermo_coefficient() {
        let positive = format_thermo_coefficient(2.44813916);
        assert_eq!(positive, " 2.44813916E+00");
        assert_eq!(positive.len(), 15);
        let negative = format_thermo_coefficient(-11965.5244);
        assert_eq!(negative, "-1.19655244E+04");
        assert_eq!(negative.len(), 15);
    }

    #[test]
    fn test_fixed_or_exact() {
        assert_eq!(fixed_or_exact(3.33, 3), "3.330");
        assert_eq!(fixed_or_exact(0.0, 3), "0.000");
        assert_eq!(fixed_or_exact(136.50123456, 3), "136.50123456");
        let v = 1134.93 / 8.314462618;
        assert_eq!(fixed_or_exact(v, 3).parse::<f64>().unwrap(), v);
    }
}
