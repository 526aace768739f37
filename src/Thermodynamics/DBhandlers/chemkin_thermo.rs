//! # CHEMKIN thermo records
//!
//! Reading and writing of the 4-line fixed-column NASA records found in the
//! `THERMO` section of mechanism files and in stand-alone `therm.dat` files.
//!
//! ```text
//! C2H6                    H   6C   2          G   100.000  5000.000  827.28      1
//!  2.44813916E+00 1.83377834E-02-7.25714119E-06 1.35300042E-09-9.60327447E-14    2
//! -1.19655244E+04 8.07917520E+00 3.50507145E+00-3.65219841E-03 6.32200490E-05    3
//! -8.01049582E-08 3.19734088E-11-1.15627878E+04 6.67152939E+00                   4
//! ```
//!
//! The high temperature coefficients come first. Problems are handled in two
//! tiers: a malformed element segment is a structural error, while a non-gas
//! phase or an unreadable coefficient only skips the thermo data (with a
//! warning) and still hands back the species label.
use crate::Kinetics::molmass::{ElementCount, hill_order, normalize_symbol};
use crate::Thermodynamics::DBhandlers::NASAdata::{NASAError, NASAdata};
use crate::Utils::diagnostics::Diagnostics;
use crate::Utils::fixed_width::{FieldSpec, char_at, char_slice};
use crate::Utils::load_from_file::{is_end_line, remove_comment_from_line};
use crate::Utils::number_format::format_thermo_coefficient;
use crate::chemkin_error::ChemkinError;
use serde::{Deserialize, Serialize};

const LABEL: FieldSpec = FieldSpec::new("label", 0, 18);
/// the label field and the inline comment share the first 24 columns
const LABEL_AND_COMMENT: FieldSpec = FieldSpec::new("label and comment", 0, 24);
/// symbol (2 columns) followed by the count (3 columns)
const ELEMENT_SEGMENTS: [FieldSpec; 5] = [
    FieldSpec::new("element 1", 24, 5),
    FieldSpec::new("element 2", 29, 5),
    FieldSpec::new("element 3", 34, 5),
    FieldSpec::new("element 4", 39, 5),
    FieldSpec::new("element 5", 74, 5),
];
const SEGMENT_SYMBOL: FieldSpec = FieldSpec::new("symbol", 0, 2);
const SEGMENT_COUNT: FieldSpec = FieldSpec::new("count", 2, 3);
const PHASE: FieldSpec = FieldSpec::new("phase", 44, 1);
const TMIN: FieldSpec = FieldSpec::new("Tmin", 45, 10);
const TMAX: FieldSpec = FieldSpec::new("Tmax", 55, 10);
const TINT: FieldSpec = FieldSpec::new("Tint", 65, 10);
/// column holding the record line number (1..4)
const LINE_NUMBER_COLUMN: usize = 79;

/// A coefficient field: which record line (after the first), which field
/// and where the value goes. `high` selects the high temperature piece.
struct CoefficientField {
    line: usize,
    field: FieldSpec,
    high: bool,
    index: usize,
}

const fn coefficient(line: usize, start: usize, high: bool, index: usize) -> CoefficientField {
    CoefficientField {
        line,
        field: FieldSpec::new("coefficient", start, 15),
        high,
        index,
    }
}

const COEFFICIENTS: [CoefficientField; 14] = [
    coefficient(1, 0, true, 0),
    coefficient(1, 15, true, 1),
    coefficient(1, 30, true, 2),
    coefficient(1, 45, true, 3),
    coefficient(1, 60, true, 4),
    coefficient(2, 0, true, 5),
    coefficient(2, 15, true, 6),
    coefficient(2, 30, false, 0),
    coefficient(2, 45, false, 1),
    coefficient(2, 60, false, 2),
    coefficient(3, 0, false, 3),
    coefficient(3, 15, false, 4),
    coefficient(3, 30, false, 5),
    coefficient(3, 45, false, 6),
];

/// Default temperatures used when a record leaves its range blank. In
/// mechanism files they come from the line following `THERMO ALL`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRange {
    pub tmin: f64,
    pub tint: f64,
    pub tmax: f64,
}

impl TemperatureRange {
    pub fn new(tmin: f64, tint: f64, tmax: f64) -> Self {
        Self { tmin, tint, tmax }
    }
}

/// Outcome of parsing one record. `thermo` and `formula` are `None` when the
/// record was skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct ThermoEntry {
    pub label: String,
    pub thermo: Option<NASAdata>,
    pub formula: Option<ElementCount>,
}

impl ThermoEntry {
    fn skipped(label: &str) -> Self {
        Self {
            label: label.to_string(),
            thermo: None,
            formula: None,
        }
    }
}

/// Python-compatible wording of a failed float conversion
fn float_error(field: &str) -> String {
    format!("could not convert string to float: {}", field)
}

/// Parses an element count, accepting float notation (`2.`) as CHEMKIN does.
fn parse_count(count: &str) -> Option<usize> {
    if let Ok(n) = count.parse::<i64>() {
        return usize::try_from(n).ok();
    }
    match count.parse::<f64>() {
        Ok(x) if x.is_finite() && x >= 0.0 => Some(x.trunc() as usize),
        _ => None,
    }
}

fn bad_segment(line: &str, segment: &str, diag: &mut Diagnostics) -> ChemkinError {
    diag.info(format!(
        "Trouble reading line '{}' element segment '{}'",
        line.trim(),
        segment
    ));
    ChemkinError::BadElementSegment {
        line: line.trim().to_string(),
        segment: segment.to_string(),
    }
}

fn read_element_segments(
    first: &str,
    diag: &mut Diagnostics,
) -> Result<ElementCount, ChemkinError> {
    let mut formula = ElementCount::new();
    for (i, segment) in ELEMENT_SEGMENTS.iter().enumerate() {
        let raw = segment.slice(first);
        let symbol = SEGMENT_SYMBOL.trimmed(raw);
        if symbol.is_empty() {
            continue;
        }
        // the fifth slot overlaps the end of the Tint field
        if i == ELEMENT_SEGMENTS.len() - 1
            && !symbol.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        {
            continue;
        }
        let count =
            parse_count(SEGMENT_COUNT.trimmed(raw)).ok_or_else(|| bad_segment(first, raw, diag))?;
        // unused slots are often padded with zero counts
        if count != 0 {
            *formula.entry(normalize_symbol(symbol)).or_insert(0) += count;
        }
    }
    Ok(formula)
}

/// Free-format element list of the CHEMKIN-4 continuation line: `C 2 H 6 O 1`.
fn read_continuation_elements(
    line: &str,
    formula: &mut ElementCount,
    diag: &mut Diagnostics,
) -> Result<(), ChemkinError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    for pair in tokens.chunks(2) {
        let segment = pair.join(" ");
        let (symbol, count) = match pair {
            [symbol, count] => (symbol, count),
            _ => return Err(bad_segment(line, &segment, diag)),
        };
        if !symbol.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(bad_segment(line, &segment, diag));
        }
        let count = parse_count(count).ok_or_else(|| bad_segment(line, &segment, diag))?;
        if count != 0 {
            *formula.entry(normalize_symbol(symbol)).or_insert(0) += count;
        }
    }
    Ok(())
}

fn read_temperature(field: &FieldSpec, line: &str) -> Option<f64> {
    field.trimmed(line).parse::<f64>().ok()
}

/// Parses one NASA record.
///
/// `defaults` fills the temperature range when the record leaves it blank.
/// Returns the label with `None` thermo and formula when the phase is not gas
/// or a coefficient cannot be read; a malformed element segment is an error.
pub fn read_thermo_entry(
    entry: &str,
    defaults: Option<TemperatureRange>,
    diag: &mut Diagnostics,
) -> Result<ThermoEntry, ChemkinError> {
    let lines: Vec<&str> = entry.lines().filter(|l| !l.trim().is_empty()).collect();
    let first = *lines
        .first()
        .ok_or_else(|| ChemkinError::MalformedThermoBlock("empty thermo entry".to_string()))?;
    let label = LABEL
        .slice(first)
        .split_whitespace()
        .next()
        .ok_or_else(|| {
            ChemkinError::MalformedThermoBlock(format!("no species label in '{}'", first.trim()))
        })?
        .to_string();
    let comment = LABEL_AND_COMMENT
        .trimmed(first)
        .strip_prefix(label.as_str())
        .unwrap_or("")
        .trim()
        .to_string();

    let mut formula = read_element_segments(first, diag)?;
    // CHEMKIN-4 syntax moves long element lists to a continuation line
    let mut coefficient_lines: Vec<&str> = lines[1..].to_vec();
    if first.trim_end().ends_with('&') {
        if coefficient_lines.is_empty() {
            return Err(ChemkinError::MalformedThermoBlock(format!(
                "missing element continuation line for {}",
                label
            )));
        }
        let continuation = coefficient_lines.remove(0);
        read_continuation_elements(continuation, &mut formula, diag)?;
    }

    if !PHASE.slice(first).eq_ignore_ascii_case("G") {
        diag.warning(format!(
            "Was expecting gas phase thermo data for {}. Skipping thermo data.",
            label
        ));
        return Ok(ThermoEntry::skipped(&label));
    }

    let missing = || ChemkinError::MissingTemperatureRange {
        label: label.clone(),
    };
    let tmin = read_temperature(&TMIN, first)
        .or(defaults.map(|d| d.tmin))
        .ok_or_else(missing)?;
    let tmax = read_temperature(&TMAX, first)
        .or(defaults.map(|d| d.tmax))
        .ok_or_else(missing)?;
    let tint = read_temperature(&TINT, first)
        .or(defaults.map(|d| d.tint))
        .ok_or_else(missing)?;

    let mut low = [0.0; 7];
    let mut high = [0.0; 7];
    for c in COEFFICIENTS.iter() {
        let value = match coefficient_lines.get(c.line - 1) {
            Some(line) => {
                let field = c.field.trimmed(line);
                field.parse::<f64>().map_err(|_| float_error(field))
            }
            None => Err(format!(
                "thermo entry has {} coefficient lines, expected 3",
                coefficient_lines.len()
            )),
        };
        match value {
            Ok(v) if c.high => high[c.index] = v,
            Ok(v) => low[c.index] = v,
            Err(message) => {
                diag.warning(format!(
                    "Error while reading thermo entry for species {}",
                    label
                ));
                diag.warning(message);
                return Ok(ThermoEntry::skipped(&label));
            }
        }
    }

    let mut thermo = NASAdata::new(low, high, tmin, tint, tmax).map_err(|e| match e {
        NASAError::InvalidTemperatureRange { tmin, tint, tmax } => {
            ChemkinError::InvalidTemperatureRange {
                label: label.clone(),
                tmin,
                tint,
                tmax,
            }
        }
        other => ChemkinError::MalformedThermoBlock(other.to_string()),
    })?;
    if !comment.is_empty() {
        thermo.comment = Some(comment);
    }
    Ok(ThermoEntry {
        label,
        thermo: Some(thermo),
        formula: Some(formula),
    })
}

/// Formats a NASA record. Comments are written as `!` lines in front of the
/// record when `verbose`. More than four elements use the `&` continuation.
pub fn write_thermo_entry(
    label: &str,
    thermo: &NASAdata,
    formula: &ElementCount,
    verbose: bool,
) -> String {
    let mut s = String::new();
    if verbose {
        if let Some(comment) = &thermo.comment {
            for line in comment.lines() {
                s.push_str(&format!("! {}\n", line));
            }
        }
    }
    let elements = hill_order(formula);
    s.push_str(&format!("{:<16}        ", label));
    if elements.len() <= 4 {
        for (symbol, count) in elements.iter() {
            s.push_str(&format!("{:<2}{:<3}", symbol, count));
        }
        s.push_str(&"     ".repeat(4 - elements.len()));
    } else {
        s.push_str(&"     ".repeat(4));
    }
    s.push_str(&format!(
        "G{:<10.3}{:<10.3}{:<8.2}      1",
        thermo.tmin(),
        thermo.tmax(),
        thermo.tint()
    ));
    if elements.len() > 4 {
        s.push_str("&\n");
        for (symbol, count) in elements.iter() {
            s.push_str(&format!("{:<2}{:<3}", symbol, count));
        }
    }
    s.push('\n');

    let (h, l) = (&thermo.high.coeffs, &thermo.low.coeffs);
    let line = |values: &[f64], number: char, pad: usize| -> String {
        let mut out: String = values.iter().map(|v| format_thermo_coefficient(*v)).collect();
        out.push_str(&" ".repeat(pad));
        out.push(number);
        out.push('\n');
        out
    };
    s.push_str(&line(&h[0..5], '2', 4));
    s.push_str(&line(&[h[5], h[6], l[0], l[1], l[2]], '3', 4));
    s.push_str(&line(&l[3..7], '4', 19));
    s
}

/// Parsed `THERMO` section.
#[derive(Debug, Clone, Default)]
pub struct ThermoBlock {
    pub defaults: Option<TemperatureRange>,
    pub entries: Vec<ThermoEntry>,
}

/// Parses the default temperature line: exactly three numbers.
fn read_default_temperatures(line: &str) -> Option<TemperatureRange> {
    let (data, _) = remove_comment_from_line(line);
    let values: Vec<f64> = data
        .split_whitespace()
        .map(|t| t.parse::<f64>())
        .collect::<Result<Vec<f64>, _>>()
        .ok()?;
    match values.as_slice() {
        [tmin, tint, tmax] => Some(TemperatureRange::new(*tmin, *tint, *tmax)),
        _ => None,
    }
}

/// Reads a thermo section starting at the `THERMO` header line (or, with
/// `has_header == false`, at the first line of a bare thermo file). Returns
/// the block and the index of the first line after it.
///
/// `!` lines in front of a record are attached to its comment.
pub fn read_thermo_block(
    lines: &[String],
    start: usize,
    has_header: bool,
    diag: &mut Diagnostics,
) -> Result<(ThermoBlock, usize), ChemkinError> {
    let mut block = ThermoBlock::default();
    let mut comments: Vec<String> = Vec::new();
    let mut i = if has_header { start + 1 } else { start };
    // blank and comment lines up to the optional temperature line
    while i < lines.len() {
        let (data, comment) = remove_comment_from_line(&lines[i]);
        if !data.trim().is_empty() {
            break;
        }
        let comment = comment.trim();
        if !comment.is_empty() {
            comments.push(comment.to_string());
        }
        i += 1;
    }
    if i < lines.len() {
        if let Some(defaults) = read_default_temperatures(&lines[i]) {
            block.defaults = Some(defaults);
            i += 1;
        }
    }

    let mut record: Vec<String> = Vec::new();
    while i < lines.len() {
        let raw = &lines[i];
        i += 1;
        if is_end_line(raw) {
            break;
        }
        let (data, comment) = remove_comment_from_line(raw);
        let comment = comment.trim();
        if !comment.is_empty() {
            comments.push(comment.to_string());
        }
        if data.trim().is_empty() {
            continue;
        }
        let awaits_continuation = record
            .last()
            .is_some_and(|l| l.trim_end().ends_with('&'));
        let number = char_at(data, LINE_NUMBER_COLUMN);
        if awaits_continuation {
            record.push(data.to_string());
            continue;
        }
        match number {
            Some(n @ '1'..='4') => {
                if n == '1' && !record.is_empty() {
                    return Err(ChemkinError::MalformedThermoBlock(format!(
                        "record interrupted before its line 4:\n{}",
                        record.join("\n")
                    )));
                }
                record.push(data.to_string());
                if n == '4' {
                    let mut entry = read_thermo_entry(&record.join("\n"), block.defaults, diag)?;
                    if let Some(thermo) = entry.thermo.as_mut() {
                        if !comments.is_empty() {
                            let mut text = thermo.comment.take().unwrap_or_default();
                            for c in comments.iter() {
                                if !text.is_empty() {
                                    text.push('\n');
                                }
                                text.push_str(c);
                            }
                            thermo.comment = Some(text);
                        }
                    }
                    block.entries.push(entry);
                    record.clear();
                    comments.clear();
                } else if record.len() > 5 {
                    return Err(ChemkinError::MalformedThermoBlock(format!(
                        "Should only have 4 lines in a thermo block:\n{}",
                        record.join("\n")
                    )));
                }
            }
            _ => {
                diag.warning(format!(
                    "Ignoring line without a valid line number in thermo block: '{}'",
                    char_slice(data, 0, 80).trim_end()
                ));
            }
        }
    }
    if !record.is_empty() {
        return Err(ChemkinError::MalformedThermoBlock(format!(
            "unterminated thermo record:\n{}",
            record.join("\n")
        )));
    }
    Ok((block, i))
}
