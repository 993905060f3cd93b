use std::fs;
use std::path::Path;

use super::error::CatalogError;

/// (name, line 1, line 2) as found in a TLE source.
pub type TleEntry = (String, String, String);

/// Reads a TLE file holding one or more satellites.
pub fn read_tle_file(path: &Path) -> Result<Vec<TleEntry>, CatalogError> {
    let content = fs::read_to_string(path)?;
    log::debug!("Read TLE file {}", path.display());
    parse_multi_tle(&content)
}

/// Parse multi-satellite TLE content in 2-line or 3-line form.
///
/// Unnamed sets are keyed as `NORAD <id>`. A line that does not belong to any
/// set rejects the whole input.
pub fn parse_multi_tle(content: &str) -> Result<Vec<TleEntry>, CatalogError> {
    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let mut result = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if lines[i].starts_with("1 ") && i + 1 < lines.len() && lines[i + 1].starts_with("2 ") {
            // 2-line TLE (no name)
            let id = super::record::parse_catalog_number(lines[i]).ok_or_else(|| {
                CatalogError::malformed(lines[i], "catalog number is not numeric")
            })?;
            result.push((
                format!("NORAD {}", id),
                lines[i].to_string(),
                lines[i + 1].to_string(),
            ));
            i += 2;
        } else if i + 2 < lines.len()
            && lines[i + 1].starts_with("1 ")
            && lines[i + 2].starts_with("2 ")
        {
            // 3-line TLE (with name)
            result.push((
                lines[i].to_string(),
                lines[i + 1].to_string(),
                lines[i + 2].to_string(),
            ));
            i += 3;
        } else {
            return Err(CatalogError::malformed(
                lines[i],
                format!("unexpected line {} in TLE input", i + 1),
            ));
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const LINE1: &str = "1 43530U 18059A   26008.12345678  .00001234  00000-0  12345-4 0  9999";
    const LINE2: &str = "2 43530  97.1234 123.4567 0012345 180.0000 180.0000 15.12345678 12346";

    #[test]
    fn parses_named_and_unnamed_sets() {
        let content = format!("PRSS-1\n{LINE1}\n{LINE2}\n\n{LINE1}\n{LINE2}\n");
        let entries = parse_multi_tle(&content).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "PRSS-1");
        assert_eq!(entries[1].0, "NORAD 43530");
        assert_eq!(entries[1].1, LINE1);
        assert_eq!(entries[1].2, LINE2);
    }

    #[test]
    fn stray_line_rejects_input() {
        let content = format!("PRSS-1\n{LINE1}\n{LINE2}\ngarbage\n");
        assert!(matches!(
            parse_multi_tle(&content),
            Err(CatalogError::MalformedElementSet { .. })
        ));
    }

    #[test]
    fn orphan_line_one_rejects_input() {
        let content = format!("PRSS-1\n{LINE1}\n");
        assert!(parse_multi_tle(&content).is_err());
    }

    #[test]
    fn reads_file_from_disk() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "PRSS-1\n{LINE1}\n{LINE2}").unwrap();
        let entries = read_tle_file(file.path()).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_tle_file(Path::new("/nonexistent/catalog.tle")).unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }
}
