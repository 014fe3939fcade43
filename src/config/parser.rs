use crate::config::types::{Config, ConfigOverrides, FileConfig};
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// The file is only parsed here; validation happens in [`resolve_config`]
/// once command-line overrides have been applied.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(FileConfig)` - Successfully parsed file
/// * `Err(ConfigError)` - Failed to read or parse the file
pub fn load_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: FileConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Merges file settings with command-line overrides and validates the result
///
/// Missing input or output directories are reported here, before any
/// traversal begins.
pub fn resolve_config(file: FileConfig, overrides: ConfigOverrides) -> Result<Config, ConfigError> {
    let input_dir = overrides.input.or(file.paths.input);
    let output_dir = overrides.output.or(file.paths.output);

    let (input_dir, output_dir) = match (input_dir, output_dir) {
        (Some(input), Some(output)) => (input, output),
        _ => {
            return Err(ConfigError::Validation(
                "input and output directory must be specified".to_string(),
            ))
        }
    };

    let mut fetcher = file.fetcher;
    if let Some(timeout_secs) = overrides.timeout_secs {
        fetcher.timeout_secs = timeout_secs;
    }
    if let Some(max) = overrides.max_concurrent_fetches {
        fetcher.max_concurrent_fetches = max;
    }

    let config = Config {
        input_dir,
        output_dir,
        fetcher,
    };
    validate(&config)?;

    Ok(config)
}
