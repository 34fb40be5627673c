//! Real-time emoji captions for a camera feed.
//!
//! A render clock ticks the [`scheduler::PipelineController`]. About once a second
//! the current frame goes through an external classifier, the label goes through
//! the [`matching::Matcher`], and the result lands in a time-windowed
//! [`cache::ResultCache`]. On a separate cadence the renderer is told to swap its
//! anchor and builds a [`display::DisplayNode`] from the newest cached result.

pub mod anchors;
pub mod cache;
pub mod catalog;
pub mod demo;
pub mod display;
pub mod matching;
pub mod perception;
pub mod scheduler;
pub mod settings;
pub mod utils;

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use cache::CacheHandle;
use catalog::Catalog;
use demo::{LoggingRenderer, ScriptedClassifier, SyntheticCamera};
use perception::AccessibilitySignal;
use scheduler::{Collaborators, PipelineController};
use settings::{extended_reading_from_env, PipelineSettings};

const DEFAULT_RUN_SECS: u64 = 10;

const USAGE: &str =
    "usage: emojify <labels.txt> [--catalog emojis.json] [--settings settings.json] [--seconds N]";

#[derive(Debug, Default, PartialEq)]
struct RunArgs {
    labels: PathBuf,
    catalog: Option<PathBuf>,
    settings: Option<PathBuf>,
    seconds: Option<u64>,
}

fn parse_args(args: &[String]) -> Result<RunArgs> {
    let mut parsed = RunArgs::default();
    let mut labels = None;
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--catalog" => parsed.catalog = iter.next().map(PathBuf::from),
            "--settings" => parsed.settings = iter.next().map(PathBuf::from),
            "--seconds" => {
                let value = iter.next().context("--seconds needs a value")?;
                parsed.seconds = Some(value.parse().with_context(|| format!("bad --seconds '{value}'"))?);
            }
            other if other.starts_with("--") => bail!("unknown flag {other}\n{USAGE}"),
            other => labels = Some(PathBuf::from(other)),
        }
    }

    parsed.labels = labels.with_context(|| USAGE.to_string())?;
    Ok(parsed)
}

/// Accessibility signal that re-reads `EMOJIFY_EXTENDED_READING` on every tick.
fn env_accessibility() -> Arc<dyn AccessibilitySignal> {
    Arc::new(extended_reading_from_env)
}

async fn run_demo(args: RunArgs) -> Result<()> {
    let settings = match &args.settings {
        Some(path) => PipelineSettings::load(path)?,
        None => PipelineSettings::default(),
    }
    .with_env_overrides();

    let catalog_path = args
        .catalog
        .or_else(|| settings.catalog_path.clone())
        .unwrap_or_else(|| PathBuf::from("emojis.json"));
    let catalog = Arc::new(Catalog::load(&catalog_path));

    let cache = CacheHandle::new();
    let collaborators = Collaborators {
        frames: Arc::new(SyntheticCamera),
        classifier: Arc::new(ScriptedClassifier::from_file(&args.labels)?),
        anchors: Arc::new(LoggingRenderer::new(cache.clone())),
        accessibility: env_accessibility(),
    };

    let mut controller = PipelineController::new(catalog, cache, collaborators, &settings);
    controller.start().await?;

    let seconds = args.seconds.unwrap_or(DEFAULT_RUN_SECS);
    tokio::select! {
        _ = tokio::time::sleep(Duration::from_secs(seconds)) => {}
        _ = tokio::signal::ctrl_c() => log::info!("interrupted"),
    }

    controller.stop().await?;
    let node = controller.display_node();
    log::info!("final: {} {}", node.glyph, node.caption);
    Ok(())
}

pub fn run() {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("emojify starting up...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = parse_args(&args).and_then(|args| {
        tokio::runtime::Runtime::new()
            .context("failed to build tokio runtime")?
            .block_on(run_demo(args))
    });

    if let Err(err) = result {
        log::error!("{err:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        let parsed = parse_args(&strings(&["labels.txt", "--catalog", "e.json", "--seconds", "3"])).unwrap();
        assert_eq!(
            parsed,
            RunArgs {
                labels: PathBuf::from("labels.txt"),
                catalog: Some(PathBuf::from("e.json")),
                settings: None,
                seconds: Some(3),
            }
        );
    }

    #[test]
    fn test_parse_args_rejects_bad_input() {
        assert!(parse_args(&[]).is_err());
        assert!(parse_args(&strings(&["labels.txt", "--seconds", "soon"])).is_err());
        assert!(parse_args(&strings(&["labels.txt", "--verbose"])).is_err());
    }

    #[test]
    fn test_env_accessibility_follows_the_environment() {
        let signal = env_accessibility();

        std::env::set_var("EMOJIFY_EXTENDED_READING", "1");
        assert!(signal.extended_reading());

        std::env::set_var("EMOJIFY_EXTENDED_READING", "false");
        assert!(!signal.extended_reading());

        std::env::remove_var("EMOJIFY_EXTENDED_READING");
        assert!(!signal.extended_reading());
    }
}
