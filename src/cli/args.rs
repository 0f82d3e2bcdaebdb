//! Command line argument parsing

use clap::Parser;
use std::time::Duration;

/// AnimePahe link resolver - turn series and episode pages into direct download links
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Series or episode page URL
    #[arg(short, long, value_name = "URL")]
    pub link: String,

    /// Episodes to resolve: 'all' or a 1-based range like '1-12'
    #[arg(short, long, default_value = "all", value_name = "RANGE")]
    pub episodes: String,

    /// Preferred resolution (e.g. 720); falls back to the best available
    #[arg(short, long, value_name = "RES")]
    pub quality: Option<u32>,

    /// Write the resolved links to a text file, one URL per line
    #[arg(short = 'x', long, value_name = "FILE")]
    pub export: Option<String>,

    /// HTTP timeout (e.g., 30s, 1m)
    #[arg(long, value_name = "DURATION", default_value = "30s")]
    pub timeout: humantime::Duration,

    /// Fetch attempts per mirror page
    #[arg(long, default_value = "4")]
    pub retries: u32,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet output (only errors and links)
    #[arg(long)]
    pub quiet: bool,
}

impl Args {
    /// Get HTTP timeout as Duration
    pub fn timeout_duration(&self) -> Duration {
        self.timeout.into()
    }

    /// Get output verbosity level
    pub fn verbosity_level(&self) -> VerbosityLevel {
        if self.quiet {
            VerbosityLevel::Quiet
        } else if self.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }
}

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbosityLevel {
    /// Quiet (only errors and links)
    Quiet,
    /// Normal
    Normal,
    /// Verbose (debug info)
    Verbose,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["pahe-resolve", "--link", "https://animepahe.ru/anime/x"]);
        assert_eq!(args.episodes, "all");
        assert_eq!(args.retries, 4);
        assert_eq!(args.timeout_duration(), Duration::from_secs(30));
        assert_eq!(args.verbosity_level(), VerbosityLevel::Normal);
        assert!(args.quality.is_none());
        assert!(args.export.is_none());
    }

    #[test]
    fn test_verbosity_flags() {
        let args = Args::parse_from(["pahe-resolve", "-l", "x", "-v"]);
        assert_eq!(args.verbosity_level(), VerbosityLevel::Verbose);

        let args = Args::parse_from(["pahe-resolve", "-l", "x", "--quiet"]);
        assert_eq!(args.verbosity_level(), VerbosityLevel::Quiet);
    }

    #[test]
    fn test_full_invocation() {
        let args = Args::parse_from([
            "pahe-resolve",
            "--link",
            "https://animepahe.ru/anime/x",
            "--episodes",
            "1-12",
            "--quality",
            "720",
            "--export",
            "links.txt",
            "--timeout",
            "1m",
            "--retries",
            "6",
        ]);
        assert_eq!(args.episodes, "1-12");
        assert_eq!(args.quality, Some(720));
        assert_eq!(args.export.as_deref(), Some("links.txt"));
        assert_eq!(args.timeout_duration(), Duration::from_secs(60));
        assert_eq!(args.retries, 6);
    }
}
