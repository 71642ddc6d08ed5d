//! # Sort Configuration
//!
//! Which discipline to run and with how many workers. Loaded once at
//! startup, either built in code or parsed from TOML:
//!
//! ```toml
//! strategy = "farm"
//! workers = 4
//! blocks = 8      # farm only, defaults to 2 * workers
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{SortError, SortResult};

/// The synchronization discipline used to sort.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Single-threaded baseline, the correctness oracle.
    Sequential,
    /// Phase-parallel loop over a thread pool, one implicit barrier per phase.
    ParallelFor,
    /// Per-block locks with distributed termination detection.
    Async,
    /// Central controller driving lock-step phases.
    Barrier,
    /// Master/worker farm with fairness-paced re-dispatch.
    Farm,
}

impl Strategy {
    /// Every strategy, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Sequential,
        Self::ParallelFor,
        Self::Async,
        Self::Barrier,
        Self::Farm,
    ];

    /// Kebab-case name, as written in config files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::ParallelFor => "parallel-for",
            Self::Async => "async",
            Self::Barrier => "barrier",
            Self::Farm => "farm",
        }
    }

    /// Whether the strategy splits the array into blocks.
    #[must_use]
    pub const fn is_blocked(self) -> bool {
        matches!(self, Self::Async | Self::Barrier | Self::Farm)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.name() == s)
            .ok_or_else(|| SortError::Config {
                reason: format!("unknown strategy `{s}`"),
            })
    }
}

/// Configuration for one sort call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SortConfig {
    /// Discipline to run.
    pub strategy: Strategy,
    /// Worker threads.
    pub workers: usize,
    /// Farm block count; `None` means `2 * workers`.
    #[serde(default)]
    pub blocks: Option<usize>,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Async,
            workers: 4,
            blocks: None,
        }
    }
}

impl SortConfig {
    /// Creates a config with the default block count.
    #[must_use]
    pub const fn new(strategy: Strategy, workers: usize) -> Self {
        Self {
            strategy,
            workers,
            blocks: None,
        }
    }

    /// Overrides the farm block count.
    #[must_use]
    pub fn with_blocks(mut self, blocks: usize) -> Self {
        self.blocks = Some(blocks);
        self
    }

    /// Number of blocks the strategy will partition into.
    ///
    /// The farm defaults to twice the workers so a worker never waits for
    /// its neighbor's block; the other blocked strategies use one block per
    /// worker.
    #[must_use]
    pub fn block_count(&self) -> usize {
        match self.strategy {
            Strategy::Farm => self.blocks.unwrap_or(2 * self.workers),
            _ => self.workers,
        }
    }

    /// Checks the config against an array of length `n`.
    ///
    /// Inputs shorter than two elements accept any positive worker count:
    /// they are already sorted and no block is ever built.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` for zero workers, zero blocks, or more blocks
    /// than elements.
    pub fn validate(&self, n: usize) -> SortResult<()> {
        if self.workers == 0 {
            return Err(SortError::invalid("worker count must be positive"));
        }
        if !self.strategy.is_blocked() {
            return Ok(());
        }
        let blocks = self.block_count();
        if blocks == 0 {
            return Err(SortError::invalid("block count must be positive"));
        }
        if n >= 2 && blocks > n {
            return Err(SortError::invalid(format!(
                "block count {blocks} exceeds array length {n}"
            )));
        }
        Ok(())
    }

    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// `Config` if the document is malformed or has unknown keys.
    pub fn from_toml_str(text: &str) -> SortResult<Self> {
        toml::from_str(text).map_err(|e| SortError::Config {
            reason: e.to_string(),
        })
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// `Config` if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> SortResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| SortError::Config {
            reason: format!("{}: {e}", path.display()),
        })?;
        Self::from_toml_str(&text)
    }
}
