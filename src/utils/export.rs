//! Export resolved links to a text file

use crate::core::DirectLink;
use crate::error::ResolveError;
use crate::Result;
use regex::Regex;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Check an export filename before any resolution work happens.
///
/// Path separators are rejected outright; the rest must be a plain
/// filename with an extension.
pub fn is_valid_export_filename(name: &str) -> bool {
    if name.contains('/') || name.contains('\\') {
        return false;
    }
    let pattern = Regex::new(r"^[a-zA-Z0-9_\-.]+\.\S*$").expect("valid filename pattern");
    pattern.is_match(name)
}

/// Write the resolved links as newline-delimited UTF-8 text, one URL per
/// line, in episode order.
pub fn export_links(path: &Path, links: &[DirectLink]) -> Result<()> {
    let mut file = File::create(path)?;
    for link in links {
        writeln!(file, "{}", link.url)?;
    }
    info!("Exported {} links to {}", links.len(), path.display());
    Ok(())
}

/// Validate the filename and write the links next to the working directory.
pub fn export_links_named(name: &str, links: &[DirectLink]) -> Result<()> {
    if !is_valid_export_filename(name) {
        return Err(ResolveError::Validation(format!(
            "invalid export filename: {}",
            name
        )));
    }
    export_links(Path::new(name), links)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_validation() {
        assert!(is_valid_export_filename("links.txt"));
        assert!(is_valid_export_filename("my-links_01.txt"));
        assert!(!is_valid_export_filename("dir/links.txt"));
        assert!(!is_valid_export_filename("dir\\links.txt"));
        assert!(!is_valid_export_filename("noextension"));
        assert!(!is_valid_export_filename(""));
    }

    #[test]
    fn test_export_links_one_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("links.txt");
        let links = vec![
            DirectLink {
                url: "https://files.example/ep1.mp4".to_string(),
            },
            DirectLink {
                url: "https://files.example/ep2.mp4".to_string(),
            },
        ];

        export_links(&path, &links).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "https://files.example/ep1.mp4\nhttps://files.example/ep2.mp4\n"
        );
    }
}
