//! Score command implementation for the Sahasi CLI.

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use sahasi_core::{
    NearbyPoiOracle, PoiCategorySet, ProximityProvider, SearchRadius, SmoothingFactor,
};
use sahasi_data::{HttpOverpassProvider, OverpassConfig};
use sahasi_scorer::{
    CacheCapacityError, CachedProximityOracle, DEFAULT_CACHE_CAPACITY, LocationEntry,
    ProximityCache, SafetyScorer, ScorerConfig,
};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader, Write};
use std::num::NonZeroUsize;
use std::time::Duration;

use crate::input::{open_utf8_file, require_file};
use crate::{
    ARG_CACHE_CAPACITY, ARG_INPUT, ARG_OVERPASS_URL, ARG_RADIUS, ARG_SMOOTHING, ARG_TIMEOUT_SECS,
    CliError,
};

/// Input path that selects standard input.
const STDIN_PATH: &str = "-";

/// CLI arguments for the `score` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Score a stream of JSON location entries, one per line. Each \
                 entry carries lat/lon (or latitude/longitude) and an \
                 optional ISO-8601 time. One integer score between 0 and 100 \
                 is written per entry. Options can come from CLI flags, \
                 configuration files, or environment variables.",
    about = "Score JSON-lines location entries"
)]
#[ortho_config(prefix = "SAHASI")]
pub(crate) struct ScoreArgs {
    /// JSON-lines file of entries; reads standard input when omitted or `-`.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) input: Option<Utf8PathBuf>,
    /// Overpass interpreter URL.
    #[arg(long = ARG_OVERPASS_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) overpass_url: Option<String>,
    /// Search radius in metres (default 600).
    #[arg(long = ARG_RADIUS, value_name = "metres")]
    #[serde(default)]
    pub(crate) radius: Option<u32>,
    /// Weight of the newest reading, between 0 and 1 (default 0.8).
    #[arg(long = ARG_SMOOTHING, value_name = "factor")]
    #[serde(default)]
    pub(crate) smoothing: Option<f64>,
    /// Overpass request timeout in seconds (default 15).
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "seconds")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// Number of proximity answers to cache (default 512).
    #[arg(long = ARG_CACHE_CAPACITY, value_name = "entries")]
    #[serde(default)]
    pub(crate) cache_capacity: Option<usize>,
}

impl ScoreArgs {
    pub(crate) fn into_config(self) -> Result<ScoreConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ScoreConfig::try_from(merged)
    }
}

/// Resolved `score` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ScoreConfig {
    /// Entries file, or `None` for standard input.
    pub(crate) input: Option<Utf8PathBuf>,
    /// HTTP provider settings.
    pub(crate) overpass: OverpassConfig,
    /// Radius and smoothing.
    pub(crate) scorer: ScorerConfig,
    /// Proximity cache size.
    pub(crate) cache_capacity: NonZeroUsize,
}

impl ScoreConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        match &self.input {
            Some(path) => require_file(path, ARG_INPUT),
            None => Ok(()),
        }
    }
}

impl TryFrom<ScoreArgs> for ScoreConfig {
    type Error = CliError;

    fn try_from(args: ScoreArgs) -> Result<Self, Self::Error> {
        let input = args.input.filter(|path| path.as_str() != STDIN_PATH);

        let mut overpass = OverpassConfig::default();
        if let Some(endpoint) = args.overpass_url {
            overpass.endpoint = endpoint;
        }
        if let Some(secs) = args.timeout_secs {
            if secs == 0 {
                return Err(CliError::ZeroTimeout {
                    field: ARG_TIMEOUT_SECS,
                });
            }
            overpass = overpass.with_timeout(Duration::from_secs(secs));
        }

        let mut scorer = ScorerConfig::default();
        if let Some(value) = args.radius {
            let radius = SearchRadius::new(value).map_err(|source| CliError::InvalidRadius {
                field: ARG_RADIUS,
                value,
                source,
            })?;
            scorer = scorer.with_radius(radius);
        }
        if let Some(value) = args.smoothing {
            let smoothing =
                SmoothingFactor::new(value).map_err(|source| CliError::InvalidSmoothing {
                    field: ARG_SMOOTHING,
                    source,
                })?;
            scorer = scorer.with_smoothing(smoothing);
        }

        let capacity = args.cache_capacity.unwrap_or(DEFAULT_CACHE_CAPACITY);
        let cache_capacity =
            NonZeroUsize::new(capacity).ok_or(CliError::InvalidCacheCapacity {
                field: ARG_CACHE_CAPACITY,
                value: capacity,
                source: CacheCapacityError::Zero,
            })?;

        Ok(Self {
            input,
            overpass,
            scorer,
            cache_capacity,
        })
    }
}

/// Builds the proximity provider for the current score invocation.
pub(super) trait ProviderBuilder {
    fn build(&self, config: &ScoreConfig) -> Result<Box<dyn ProximityProvider>, CliError>;
}

pub(super) struct OverpassProviderBuilder;

impl ProviderBuilder for OverpassProviderBuilder {
    fn build(&self, config: &ScoreConfig) -> Result<Box<dyn ProximityProvider>, CliError> {
        let provider = HttpOverpassProvider::with_config(config.overpass.clone()).map_err(
            |source| CliError::BuildProvider {
                endpoint: config.overpass.endpoint.clone(),
                source,
            },
        )?;
        Ok(Box::new(provider))
    }
}

pub(super) fn run_score(args: ScoreArgs) -> Result<(), CliError> {
    let mut stdin = std::io::stdin().lock();
    let mut stdout = std::io::stdout().lock();
    let builder = OverpassProviderBuilder;
    run_score_with(args, &builder, &mut stdin, &mut stdout).map(|_| ())
}

/// Score every entry from the configured input, returning how many were
/// scored.
pub(super) fn run_score_with(
    args: ScoreArgs,
    builder: &dyn ProviderBuilder,
    stdin: &mut dyn BufRead,
    writer: &mut dyn Write,
) -> Result<usize, CliError> {
    let config = resolve_score_config(args)?;
    let provider = builder.build(&config)?;
    let oracle = CachedProximityOracle::with_parts(
        provider,
        PoiCategorySet::safety_defaults(),
        ProximityCache::with_capacity(config.cache_capacity),
    );
    let mut scorer = SafetyScorer::with_config(oracle, config.scorer);

    match &config.input {
        Some(path) => {
            let file = open_utf8_file(path).map_err(|source| CliError::OpenInput {
                path: path.clone(),
                source,
            })?;
            score_lines(BufReader::new(file), &mut scorer, writer)
        }
        None => score_lines(stdin, &mut scorer, writer),
    }
}

fn resolve_score_config(args: ScoreArgs) -> Result<ScoreConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

/// Score each non-blank line of `reader` as a [`LocationEntry`].
///
/// Stops at the first unreadable or malformed line; scores already written
/// stay written.
pub(super) fn score_lines<R, O>(
    reader: R,
    scorer: &mut SafetyScorer<O>,
    writer: &mut dyn Write,
) -> Result<usize, CliError>
where
    R: BufRead,
    O: NearbyPoiOracle,
{
    let mut scored = 0_usize;
    for (line, read) in (1_usize..).zip(reader.lines()) {
        let text = read.map_err(|source| CliError::ReadInput { line, source })?;
        if text.trim().is_empty() {
            continue;
        }
        let entry: LocationEntry =
            serde_json::from_str(&text).map_err(|source| CliError::ParseEntry { line, source })?;
        let score = scorer.process(&entry);
        writeln!(writer, "{score}").map_err(CliError::WriteOutput)?;
        scored = scored.saturating_add(1);
    }
    writer.flush().map_err(CliError::WriteOutput)?;
    Ok(scored)
}
