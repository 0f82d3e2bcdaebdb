//! Output formatting for the CLI

use crate::cli::args::VerbosityLevel;
use crate::platform::catalog::LinkMetadata;
use colored::Colorize;

/// Output formatter for pahe-resolve
pub struct OutputFormatter {
    verbosity: VerbosityLevel,
}

impl OutputFormatter {
    /// Create a new output formatter
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self { verbosity }
    }

    /// Print info message
    pub fn info(&self, message: &str) {
        if self.verbosity != VerbosityLevel::Quiet {
            println!(" * {}", message);
        }
    }

    /// Print success message
    pub fn success(&self, message: &str) {
        if self.verbosity != VerbosityLevel::Quiet {
            println!(" * {} {}", message, "OK!".green());
        }
    }

    /// Print error message
    pub fn error(&self, message: &str) {
        eprintln!(" * {} {}", "ERROR:".red(), message);
    }

    /// Print debug message
    pub fn debug(&self, message: &str) {
        if self.verbosity == VerbosityLevel::Verbose {
            println!("   {}", message.dimmed());
        }
    }

    /// Print the metadata block for the reference being resolved
    pub fn print_metadata(&self, metadata: &LinkMetadata) {
        if self.verbosity == VerbosityLevel::Quiet {
            return;
        }
        match metadata {
            LinkMetadata::Series {
                title,
                kind,
                episodes,
            } => {
                self.info(&format!("Anime: {}", field(title)));
                self.info(&format!("Type: {}", field(kind)));
                self.info(&format!("Episodes: {}", field(episodes)));
            }
            LinkMetadata::Episode { title, number } => {
                self.info(&format!("Anime: {}", field(title)));
                self.info(&format!("Episode: {}", field(number)));
            }
        }
    }

    /// Print one resolved link
    pub fn print_link(&self, url: &str) {
        println!("{}", url);
    }
}

fn field(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_fallback() {
        assert_eq!(field(&None), "unknown");
        assert_eq!(field(&Some("Title".to_string())), "Title");
    }
}
