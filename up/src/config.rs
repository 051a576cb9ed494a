//! Configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Names renamed even though no file of that name exists in a library
/// directory (templated, composite and helper names)
pub const DEFAULT_STATIC_NAMES: &[&str] = &[
    "ValueParam", "UF", "BF", "BinOp", "MonOp", "QuadOp", "Rng", "RndGenerator", "STLF",
    "VlDelMutation", "GeneCHooser", "UniformGeneChooser", "GeneDelChooser", "VlAddMutation",
    "VlAtomExchangeQuadOp", "AtomExchange", "VlUniformQuadOp", "InnerExchangeQuadOp",
    "UniformAtomExchange", "Dummy", "Bounds", "Many", "Deterministic", "Plus", "Truncate",
    "GeneralReplacement", "STLUF", "STLBF", "F<", "Invalidate", "Eval", "Roulette",
    "DynSGATransform", "SequentialOp", "QuadCloneOp", "ProportionalOp", "Pters",
    "EliteSequentialSelect", "DetTournamentWorthSelect", "eoTournament", "MinimizingFitness",
    "MaximizingFitness", "StochTournamentWorthSelect", "Assembled", "WeakElitistReplacement",
    "GenerationalReplacement", "SSGAStochTournamentReplacement", "DetTournament",
    "LinearRandomSplit", "RandomSplit", "LinearTruncateSplit", "SSGAWorseReplacement", "Limit",
    "BestSelect", "NoSelect", "SSGA", "Linear", "Stoch", "Random", "ExpDecayingBoundModifier",
    "Perf", "Prop", "MonCloneOp", "SeqPopulator", "TimeVaryingLoopEval", "Particle",
    "FirstIsBestInit", "Class", "EPR", "NoElitism", "Comma", "StochTournament", "Proportional",
    "ExpDecayingBoundModifier", "NoPerf", "Quad", "Elitism", "MonGenOp", "BinGenOp",
    "QuadGenOp", "DerivedTransform", "SelBinGenOp", "VecOp", "eoEngine", "FlOr", "Max",
    "Islands", "DistEval", "Min", "Procedure", "Unary", "Binary", "Bin", "Counted", "Timed",
    "Incrementor", "Dyn", "Neg", "Normal", "Boolean", "Average", "Best", "Stdev", "Second",
    "Nth", "Sorted", "General", "Uniform", "StdOut", "Container", "G3", "GnuPlot",
    "IsFeasible", "Hamming", "Fitness", "FDC", "Scalar", "SBX", "Hypercube", "Arithmetic",
    "Segment", "Det", "Double", "ES", "UBit", "NPts", "1Pt", "One", "PBIL", "StHoist",
    "StDepth", "Gp", "StPoint", "StBranch", "StSub", "Hoist", "Collapse", "Expansion", "Point",
    "Sub", "External",
];

/// Library directories: collected and used to derive names
pub const DEFAULT_LIBRARY_DIRS: &[&str] = &["src", "src/do", "src/es", "src/ga", "src/gp", "src/other", "src/utils"];

/// Application and test directories: collected only
pub const DEFAULT_CONSUMER_DIRS: &[&str] = &["app/gprop", "app/gpsymreg", "app/mastermind", "test"];

/// Main unprefix configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Directory the directory groups are relative to
    pub root: PathBuf,

    /// Prefix stripped from every catalog name
    pub prefix: String,

    /// Substring marking a header file name
    pub header_marker: String,

    /// Substring marking a source file name
    pub source_marker: String,

    /// Directory group A: rewritten, and their file names join the catalog
    pub library_dirs: Vec<PathBuf>,

    /// Directory group B: rewritten only
    pub consumer_dirs: Vec<PathBuf>,

    /// Hand-maintained base names
    pub static_names: Vec<String>,

    /// Default log level when --log-level is not given
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            prefix: crate::DEFAULT_PREFIX.to_string(),
            header_marker: crate::DEFAULT_HEADER_MARKER.to_string(),
            source_marker: crate::DEFAULT_SOURCE_MARKER.to_string(),
            library_dirs: DEFAULT_LIBRARY_DIRS.iter().map(PathBuf::from).collect(),
            consumer_dirs: DEFAULT_CONSUMER_DIRS.iter().map(PathBuf::from).collect(),
            static_names: DEFAULT_STATIC_NAMES.iter().map(|s| s.to_string()).collect(),
            log_level: None,
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    ///
    /// An explicit path must load. Otherwise `.unprefix.yml` in the current
    /// directory, then `~/.config/unprefix/unprefix.yml`, then defaults.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        for path in Self::fallback_paths() {
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                    }
                }
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read just the log level, before logging is set up
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let candidates: Vec<PathBuf> = match config_path {
            Some(path) => vec![path.clone()],
            None => Self::fallback_paths(),
        };

        candidates
            .iter()
            .filter(|p| p.exists())
            .find_map(|p| Self::load_from_file(p).ok())
            .and_then(|c| c.log_level)
    }

    /// Warn about settings that make the run a no-op or select everything
    ///
    /// Nothing here is an error; the tool accepts any configuration.
    pub fn validate(&self) {
        if self.prefix.is_empty() {
            tracing::warn!("Prefix is empty; no names will be rewritten");
        }
        if self.header_marker.is_empty() || self.source_marker.is_empty() {
            tracing::warn!("A file marker is empty; every file in the configured directories will be selected");
        }
        if self.static_names.iter().any(|n| n.is_empty()) {
            tracing::warn!("Static names contain an empty entry; it will be ignored");
        }
    }

    fn fallback_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(".unprefix.yml")];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("unprefix").join("unprefix.yml"));
        }
        paths
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}
