//! Configuration loading for Gatehouse.
//!
//! Configuration follows a precedence chain:
//! 1. Environment variables (highest priority)
//! 2. Project config (`.gatehouse/config.toml`)
//! 3. User config (`~/.gatehouse/config.toml`)
//! 4. Defaults (lowest priority)
//!
//! All configuration is optional. The coordinator runs with sensible
//! defaults when no config exists; a missing or malformed file is ignored
//! rather than surfaced to the caller.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{GateError, Result};

/// Main configuration struct for Gatehouse.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Gate pacing configuration.
    pub gate: GateConfig,
    /// Arithmetic challenge pool configuration.
    pub challenges: ChallengeConfig,
}

/// Gate pacing configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GateConfig {
    /// Delay in milliseconds between resolving one gate and showing the next.
    ///
    /// Must be non-zero so consecutive gates visually separate rather than
    /// flashing instantaneously.
    pub cooldown_ms: u64,
}

/// Minimum valid cooldown value in milliseconds.
pub const MIN_COOLDOWN_MS: u64 = 1;

/// Maximum valid cooldown value in milliseconds (one minute).
///
/// The cooldown is a brief visual pause; anything longer is a
/// misconfiguration, and unbounded values would overflow timestamp
/// arithmetic.
pub const MAX_COOLDOWN_MS: u64 = 60_000;

impl GateConfig {
    /// Check if a cooldown value is valid (1 ms to one minute).
    pub fn is_valid_cooldown_ms(value: u64) -> bool {
        (MIN_COOLDOWN_MS..=MAX_COOLDOWN_MS).contains(&value)
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self { cooldown_ms: 350 }
    }
}

/// Arithmetic challenge pool configuration.
///
/// Controls the generated pool of addition/multiplication puzzles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChallengeConfig {
    /// Smallest operand used when generating puzzles.
    pub min_operand: u32,
    /// Largest operand used when generating puzzles.
    pub max_operand: u32,
    /// Number of candidate answers per challenge (correct one included).
    pub option_count: usize,
}

/// Valid range for the per-challenge option count.
pub const MIN_OPTION_COUNT: usize = 2;
pub const MAX_OPTION_COUNT: usize = 8;

/// Largest operand allowed when generating puzzles.
///
/// Keeps the generated pool small (it grows quadratically with the range)
/// and keeps every sum, product, and distractor comfortably within `u32`.
pub const MAX_OPERAND: u32 = 100;

impl ChallengeConfig {
    /// Check if an option count is valid.
    pub fn is_valid_option_count(value: usize) -> bool {
        (MIN_OPTION_COUNT..=MAX_OPTION_COUNT).contains(&value)
    }

    /// Check that the operand range is non-empty and within bounds.
    pub fn is_valid_range(min: u32, max: u32) -> bool {
        min < max && max <= MAX_OPERAND
    }
}

impl Default for ChallengeConfig {
    fn default() -> Self {
        Self {
            min_operand: 2,
            max_operand: 9,
            option_count: 4,
        }
    }
}

impl Config {
    /// Load configuration with full precedence chain.
    ///
    /// Precedence (highest to lowest):
    /// 1. Environment variables
    /// 2. Project config (`.gatehouse/config.toml` in cwd)
    /// 3. User config (`~/.gatehouse/config.toml`)
    /// 4. Defaults
    pub fn load() -> Self {
        match env::current_dir() {
            Ok(cwd) => Self::load_from_cwd(&cwd),
            Err(_) => {
                let mut config = Config::default();
                if let Some(user_config) = Self::load_user_config() {
                    config = config.merge(user_config);
                }
                config.apply_env_overrides();
                config
            }
        }
    }

    /// Load configuration with a specific working directory.
    pub fn load_from_cwd(cwd: &Path) -> Self {
        let mut config = Config::default();

        if let Some(user_config) = Self::load_user_config() {
            config = config.merge(user_config);
        }

        if let Some(project_config) = Self::load_project_config(cwd) {
            config = config.merge(project_config);
        }

        config.apply_env_overrides();

        config
    }

    /// Load user config from `~/.gatehouse/config.toml`.
    fn load_user_config() -> Option<Config> {
        let home = gatehouse_home()?;
        let config_path = home.join("config.toml");
        Self::load_from_file(&config_path).ok()
    }

    /// Load project config from `.gatehouse/config.toml` in the given directory.
    fn load_project_config(cwd: &Path) -> Option<Config> {
        let config_path = cwd.join(".gatehouse").join("config.toml");
        Self::load_from_file(&config_path).ok()
    }

    /// Load config from a specific file path.
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| GateError::storage(path, e))?;
        toml::from_str(&content).map_err(|e| GateError::config(e.to_string()))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        // GATEHOUSE_COOLDOWN_MS
        if let Ok(val) = env::var("GATEHOUSE_COOLDOWN_MS") {
            match val.parse::<u64>() {
                Ok(n) => {
                    if GateConfig::is_valid_cooldown_ms(n) {
                        self.gate.cooldown_ms = n;
                    } else {
                        eprintln!(
                            "Warning: Invalid GATEHOUSE_COOLDOWN_MS value '{}'. \
                            Must be in range [{}, {}]. Using default '{}'.",
                            n, MIN_COOLDOWN_MS, MAX_COOLDOWN_MS, self.gate.cooldown_ms
                        );
                    }
                }
                Err(_) => eprintln!(
                    "Warning: Invalid GATEHOUSE_COOLDOWN_MS value '{}'. \
                    Expected a positive integer. Using default '{}'.",
                    val, self.gate.cooldown_ms
                ),
            }
        }

        // GATEHOUSE_OPTION_COUNT
        if let Ok(val) = env::var("GATEHOUSE_OPTION_COUNT") {
            match val.parse::<usize>() {
                Ok(n) => {
                    if ChallengeConfig::is_valid_option_count(n) {
                        self.challenges.option_count = n;
                    } else {
                        eprintln!(
                            "Warning: Invalid GATEHOUSE_OPTION_COUNT value '{}'. \
                            Must be in range [{}, {}]. Using default '{}'.",
                            n, MIN_OPTION_COUNT, MAX_OPTION_COUNT, self.challenges.option_count
                        );
                    }
                }
                Err(_) => eprintln!(
                    "Warning: Invalid GATEHOUSE_OPTION_COUNT value '{}'. \
                    Expected a positive integer. Using default '{}'.",
                    val, self.challenges.option_count
                ),
            }
        }

        // GATEHOUSE_OPERAND_RANGE ("min..max")
        if let Ok(val) = env::var("GATEHOUSE_OPERAND_RANGE") {
            let parsed = val
                .split_once("..")
                .and_then(|(lo, hi)| Some((lo.parse::<u32>().ok()?, hi.parse::<u32>().ok()?)));
            match parsed {
                Some((min, max)) if ChallengeConfig::is_valid_range(min, max) => {
                    self.challenges.min_operand = min;
                    self.challenges.max_operand = max;
                }
                _ => eprintln!(
                    "Warning: Invalid GATEHOUSE_OPERAND_RANGE value '{}'. \
                    Expected 'min..max' with min < max <= {}. Using default '{}..{}'.",
                    val, MAX_OPERAND, self.challenges.min_operand, self.challenges.max_operand
                ),
            }
        }
    }

    /// Merge another config into this one.
    ///
    /// The `other` config takes precedence: any field that differs from the
    /// default is applied to `self`. Field-by-field merging keeps the
    /// precedence chain layering correct when a file only sets one section.
    fn merge(mut self, other: Config) -> Config {
        let defaults = Config::default();

        if other.gate.cooldown_ms != defaults.gate.cooldown_ms {
            self.gate.cooldown_ms = other.gate.cooldown_ms;
        }
        if other.challenges.min_operand != defaults.challenges.min_operand {
            self.challenges.min_operand = other.challenges.min_operand;
        }
        if other.challenges.max_operand != defaults.challenges.max_operand {
            self.challenges.max_operand = other.challenges.max_operand;
        }
        if other.challenges.option_count != defaults.challenges.option_count {
            self.challenges.option_count = other.challenges.option_count;
        }

        self
    }
}

/// Get the Gatehouse home directory (`~/.gatehouse`).
fn gatehouse_home() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".gatehouse"))
}
