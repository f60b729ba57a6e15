//! Parser for the comma-separated autonomous script format.
//!
//! One entry per line: `CommandName,arg1,arg2,...`. The entry points are
//! [`parse_str`] for text already in memory and [`read_script`] to load a file.

use crate::error::AutoError;
use std::path::Path;

/// One parsed script line: a command name and its ordered arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptEntry {
    pub name: String,
    pub arguments: Vec<String>,
}

impl ScriptEntry {
    pub fn new(name: impl Into<String>, arguments: Vec<String>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// Parse script text into ordered entries.
///
/// `\r\n`, `\r` and `\n` are all accepted as line endings. Blank lines are
/// skipped. Whitespace right after a comma is dropped, so `Drive, 10, 20` and
/// `Drive,10,20` produce the same entry. The command name keeps its case.
///
/// # Errors
///
/// Returns [`AutoError::ScriptParse`] for a non-blank line with an empty
/// command name, e.g. `,10`.
///
/// # Example
///
/// ```
/// use autoscript::parse_str;
///
/// let entries = parse_str("Drive, 1000\r\nTurn,90\n").unwrap();
/// assert_eq!(entries.len(), 2);
/// assert_eq!(entries[0].arguments, ["1000"]);
/// ```
pub fn parse_str(content: &str) -> Result<Vec<ScriptEntry>, AutoError> {
    let normalized = normalize_line_endings(content);
    let mut entries = Vec::new();
    for (line_num, line) in normalized.split('\n').enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        entries.push(parse_line(line).map_err(|reason| AutoError::ScriptParse {
            line: line_num + 1,
            reason,
        })?);
    }
    Ok(entries)
}

/// Read a script file into memory.
///
/// # Errors
///
/// Returns [`AutoError::ScriptIo`] if the file is missing or unreadable.
pub fn read_script(path: impl AsRef<Path>) -> Result<String, AutoError> {
    let path = path.as_ref();
    std::fs::read_to_string(path).map_err(|source| AutoError::ScriptIo {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and parse a script file.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Vec<ScriptEntry>, AutoError> {
    parse_str(&read_script(path)?)
}

fn normalize_line_endings(content: &str) -> String {
    content.replace("\r\n", "\n").replace('\r', "\n")
}

fn parse_line(line: &str) -> Result<ScriptEntry, String> {
    let mut columns = line.split(',');
    let name = columns.next().unwrap_or_default().trim();
    if name.is_empty() {
        return Err(format!("missing command name in \"{line}\""));
    }
    let arguments = columns
        .map(|column| column.trim_start().to_string())
        .collect();
    Ok(ScriptEntry::new(name, arguments))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let entries = parse_str("Drive,1000\nTurn,90\n").unwrap();
        assert_eq!(
            entries,
            vec![
                ScriptEntry::new("Drive", vec!["1000".into()]),
                ScriptEntry::new("Turn", vec!["90".into()]),
            ]
        );
    }

    #[test]
    fn test_line_endings_equivalent() {
        let lf = parse_str("Drive,1\nTurn,2\nShoot\n").unwrap();
        let crlf = parse_str("Drive,1\r\nTurn,2\r\nShoot\r\n").unwrap();
        let cr = parse_str("Drive,1\rTurn,2\rShoot\r").unwrap();
        let mixed = parse_str("Drive,1\r\nTurn,2\rShoot\n").unwrap();
        assert_eq!(lf, crlf);
        assert_eq!(lf, cr);
        assert_eq!(lf, mixed);
    }

    #[test]
    fn test_no_trailing_blank_entry() {
        assert_eq!(parse_str("Drive,1\n").unwrap().len(), 1);
        assert_eq!(parse_str("Drive,1").unwrap().len(), 1);
    }

    #[test]
    fn test_parse_empty_lines() {
        let entries = parse_str("\n\nDrive,1\n\r\n  \nTurn,2\n\n").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].name, "Turn");
    }

    #[test]
    fn test_empty_script() {
        assert!(parse_str("").unwrap().is_empty());
        assert!(parse_str("\r\n\r\n").unwrap().is_empty());
    }

    #[test]
    fn test_space_after_comma_stripped() {
        assert_eq!(
            parse_str("Drive, 10, 20").unwrap(),
            parse_str("Drive,10,20").unwrap()
        );
    }

    #[test]
    fn test_argument_count_matches_commas() {
        let entries = parse_str("Stop\nDrive,1\nArc,1,2,3\nPad,\n").unwrap();
        let counts: Vec<usize> = entries.iter().map(|e| e.arguments.len()).collect();
        assert_eq!(counts, [0, 1, 3, 1]);
        assert_eq!(entries[3].arguments, [""]);
    }

    #[test]
    fn test_name_case_preserved() {
        let entries = parse_str("dRiVe,5").unwrap();
        assert_eq!(entries[0].name, "dRiVe");
    }

    #[test]
    fn test_missing_name_rejected() {
        let err = parse_str("Drive,1\n,10\n").unwrap_err();
        match err {
            AutoError::ScriptParse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_script("/nonexistent/autoscript/auto.csv").unwrap_err();
        assert!(matches!(err, AutoError::ScriptIo { .. }), "got: {err}");
    }
}
