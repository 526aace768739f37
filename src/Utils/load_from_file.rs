use crate::chemkin_error::ChemkinError;
use log::{debug, info};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Reads the whole file into lines. The file handle is dropped before
/// returning, on success and on error alike.
pub fn read_lines(path: &Path) -> Result<Vec<String>, ChemkinError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let lines = reader
        .lines()
        .map(|line| line.map(|l| l.trim_end_matches('\r').to_string()))
        .collect::<Result<Vec<String>, std::io::Error>>()?;
    info!("read {} lines from '{}'", lines.len(), path.display());
    Ok(lines)
}

/// Splits a line at the first `!` into (data, comment). The comment excludes
/// the `!` itself.
pub fn remove_comment_from_line(line: &str) -> (&str, &str) {
    match line.find('!') {
        Some(pos) => (&line[..pos], &line[pos + 1..]),
        None => (line, ""),
    }
}

/// top level sections of a mechanism file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Elements,
    Species,
    Thermo,
    Reactions,
}

/// Section opened by this line, judged on the first keyword of its data part.
/// CHEMKIN accepts the four letter abbreviations (`ELEM`, `SPEC`, `THER`, `REAC`).
pub fn section_header(line: &str) -> Option<Section> {
    let (data, _) = remove_comment_from_line(line);
    let keyword = data.split_whitespace().next()?.to_uppercase();
    let section = if keyword.starts_with("ELEM") {
        Section::Elements
    } else if keyword.starts_with("SPEC") {
        Section::Species
    } else if keyword.starts_with("THER") {
        Section::Thermo
    } else if keyword.starts_with("REAC") {
        Section::Reactions
    } else {
        return None;
    };
    debug!("section {:?} opened by '{}'", section, line.trim());
    Some(section)
}

/// true for a line whose data part is the `END` keyword
pub fn is_end_line(line: &str) -> bool {
    let (data, _) = remove_comment_from_line(line);
    data.trim().eq_ignore_ascii_case("END")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_lines() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "ELEMENTS").unwrap();
        writeln!(temp_file, "H C O\r").unwrap();
        writeln!(temp_file, "END").unwrap();
        let lines = read_lines(temp_file.path()).unwrap();
        assert_eq!(lines, vec!["ELEMENTS", "H C O", "END"]);
    }

    #[test]
    fn test_read_lines_missing_file() {
        let result = read_lines(Path::new("definitely/not/here/chem.inp"));
        assert!(matches!(result, Err(ChemkinError::Io(_))));
    }

    #[test]
    fn test_remove_comment_from_line() {
        assert_eq!(
            remove_comment_from_line("ethane ! C2H6"),
            ("ethane ", " C2H6")
        );
        assert_eq!(remove_comment_from_line("no comment"), ("no comment", ""));
        assert_eq!(
            remove_comment_from_line("!Template reaction: H_Abstraction"),
            ("", "Template reaction: H_Abstraction")
        );
    }

    #[test]
    fn test_section_header() {
        assert_eq!(section_header("ELEMENTS"), Some(Section::Elements));
        assert_eq!(section_header("elem H C END"), Some(Section::Elements));
        assert_eq!(section_header("SPECIES ! list"), Some(Section::Species));
        assert_eq!(section_header("THERM ALL"), Some(Section::Thermo));
        assert_eq!(
            section_header("REACTIONS    KCAL/MOLE   MOLES"),
            Some(Section::Reactions)
        );
        assert_eq!(section_header("! SPECIES in a comment"), None);
        assert_eq!(section_header("CH4 + O2 = CH3 + HO2  1 0 0"), None);
        assert!(is_end_line("  end  ! done"));
        assert!(!is_end_line("ENDO"));
    }
}
