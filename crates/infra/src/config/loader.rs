//! Budget configuration loader
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `CONVERGE_READ_TIMEOUT`: Read timeout in seconds
//! - `CONVERGE_WRITE_TIMEOUT`: Write timeout in seconds
//! - `CONVERGE_POLL_INTERVAL`: Delay between polls in seconds
//!
//! Multipliers keep their defaults when loading from the environment.
//!
//! ## File Locations
//! The loader probes `converge.toml` then `converge.json` in the current
//! working directory, its parent and grandparent, then next to the
//! executable.

use std::path::{Path, PathBuf};

use converge_common::error::{CommonError, CommonResult};

use super::budgets::BudgetConfig;

/// Read timeout in seconds
pub const ENV_READ_TIMEOUT: &str = "CONVERGE_READ_TIMEOUT";
/// Write timeout in seconds
pub const ENV_WRITE_TIMEOUT: &str = "CONVERGE_WRITE_TIMEOUT";
/// Delay between attempts in seconds
pub const ENV_POLL_INTERVAL: &str = "CONVERGE_POLL_INTERVAL";

const CONFIG_FILE_NAMES: [&str; 2] = ["converge.toml", "converge.json"];

/// Load budget configuration with automatic fallback strategy
///
/// # Errors
/// Returns `CommonError::Config` if neither source yields a valid
/// configuration.
pub fn load() -> CommonResult<BudgetConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Budget configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load budget configuration from environment variables
///
/// All three variables must be present.
///
/// # Errors
/// Returns `CommonError::Config` if a variable is missing, is not a whole
/// number of seconds, or the result fails validation.
pub fn load_from_env() -> CommonResult<BudgetConfig> {
    let config = BudgetConfig {
        read_timeout_secs: env_secs(ENV_READ_TIMEOUT)?,
        write_timeout_secs: env_secs(ENV_WRITE_TIMEOUT)?,
        poll_interval_secs: env_secs(ENV_POLL_INTERVAL)?,
        ..BudgetConfig::default()
    };
    config.validate()?;
    Ok(config)
}

/// Load budget configuration from a file
///
/// If `path` is `None`, probes the standard locations.
///
/// # Errors
/// Returns `CommonError::Config` if the file is missing or invalid, or
/// `CommonError::Serialization` if it cannot be parsed.
pub fn load_from_file(path: Option<PathBuf>) -> CommonResult<BudgetConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(CommonError::config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            CommonError::config("No config file found in any of the standard locations")
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading budget configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| CommonError::persistence_op("read_config", e.to_string()))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration by file extension (`.json` or `.toml`)
fn parse_config(contents: &str, path: &Path) -> CommonResult<BudgetConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => Ok(toml::from_str(contents)?),
        "json" => Ok(serde_json::from_str(contents)?),
        _ => Err(CommonError::config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe the standard locations for a config file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.extend(cwd.ancestors().take(3).map(Path::to_path_buf));
    }
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

fn env_secs(key: &str) -> CommonResult<u64> {
    let raw = std::env::var(key)
        .map_err(|_| CommonError::config(format!("Missing required environment variable: {key}")))?;
    raw.trim().parse::<u64>().map_err(|e| CommonError::config_field(key, format!("Invalid number of seconds: {e}")))
}
