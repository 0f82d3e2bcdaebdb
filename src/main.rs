//! Main entry point for pahe-resolve CLI

use clap::Parser;
use pahe_resolve::cli::{Args, OutputFormatter};
use pahe_resolve::core::{ContentReference, EpisodeSelection, Resolver};
use pahe_resolve::utils::export::{export_links_named, is_valid_export_filename};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    init_logging();

    let args = Args::parse();
    let formatter = OutputFormatter::new(args.verbosity_level());

    if let Err(err) = run(&args, &formatter).await {
        formatter.error(&err.to_string());
        std::process::exit(1);
    }
}

async fn run(args: &Args, formatter: &OutputFormatter) -> pahe_resolve::Result<()> {
    info!("Starting pahe-resolve with args: {:?}", args);

    // Reject a bad export filename before any network work
    if let Some(name) = &args.export {
        if !is_valid_export_filename(name) {
            return Err(pahe_resolve::ResolveError::Validation(format!(
                "invalid export filename: {}",
                name
            )));
        }
    }

    let reference = ContentReference::parse(&args.link)?;
    let selection: EpisodeSelection = args.episodes.parse()?;
    debug!("Parsed reference: {:?}, selection: {:?}", reference, selection);

    let mut resolver = Resolver::new()
        .with_timeout(args.timeout_duration())
        .with_retries(args.retries);
    if let Some(quality) = args.quality {
        resolver = resolver.with_quality(quality);
    }

    match resolver.fetch_metadata(&reference).await {
        Ok(metadata) => formatter.print_metadata(&metadata),
        // Metadata is display-only; a resolution run still makes sense without it
        Err(err) => debug!("Metadata fetch failed: {}", err),
    }

    let episodes = resolver.discover_episodes(&reference, &selection).await?;
    formatter.success(&format!("Found {} episodes", episodes.len()));

    let links = resolver.resolve(&reference, &selection).await?;
    for link in &links {
        formatter.print_link(&link.url);
    }

    if let Some(name) = &args.export {
        export_links_named(name, &links)?;
        formatter.success(&format!("Exported {} links to {}", links.len(), name));
    }

    Ok(())
}

/// Initialize logging system
fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}
