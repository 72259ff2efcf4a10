use crate::conf::error::ConfigError;
use crate::conf::types::{OutputStrategy, SawmillConfig};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Reads, parses and validates the HCL config at `path`.
pub fn load_config(path: &Path) -> Result<SawmillConfig, ConfigError> {
    let s = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    let config = parse_config(path, &s)?;
    debug!(path = %path.display(), strategy = ?config.output.strategy, "loaded config");
    Ok(config)
}

/// Parses and validates HCL text. `origin` is only used in error messages.
pub fn parse_config(origin: &Path, s: &str) -> Result<SawmillConfig, ConfigError> {
    let config: SawmillConfig = hcl::from_str(s).map_err(|e| ConfigError::parse(origin, e))?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &SawmillConfig) -> Result<(), ConfigError> {
    //-------------------------------------------------------------------------
    // Output
    //-------------------------------------------------------------------------
    let output = &config.output;
    match output.strategy {
        OutputStrategy::Shifting => {
            if output
                .path
                .as_ref()
                .is_some_and(|p| p.as_os_str().is_empty())
            {
                return Err(ConfigError::invalid("output.path must not be empty"));
            }
            if output.max_file_size == Some(0) {
                return Err(ConfigError::invalid(
                    "output.max_file_size must be greater than zero",
                ));
            }
        }
        OutputStrategy::DateBased => {
            if output.prefix.as_deref() == Some("") {
                return Err(ConfigError::invalid("output.prefix must not be empty"));
            }
        }
        OutputStrategy::Stdout => {}
    }

    //-------------------------------------------------------------------------
    // Format
    //-------------------------------------------------------------------------
    if config
        .format
        .fractional_second_digits
        .is_some_and(|digits| digits > 6)
    {
        return Err(ConfigError::invalid(
            "format.fractional_second_digits must be between 0 and 6",
        ));
    }

    //-------------------------------------------------------------------------
    // Parser
    //-------------------------------------------------------------------------
    if config.parser.levels.as_ref().is_some_and(Vec::is_empty) {
        return Err(ConfigError::invalid("parser.levels must name at least one level"));
    }

    Ok(())
}
