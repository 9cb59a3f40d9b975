//! Helper Configuration
//!
//! Runtime options of the helpers. Defaults can be overridden through
//! environment variables (prefixed with `SAGA_HELPER_`) or by calling
//! [`HelperConfig::set_option`]. Options set by calling functions override
//! options read from the environment.
//!
//! ```
//! use saga_helpers::config::HelperConfig;
//!
//! let mut config = HelperConfig::default();
//!
//! // Use another tool to build virtual mosaics
//! config.set_option("VRT_TOOL", "13").unwrap();
//! assert_eq!(config.option("VRT_TOOL").unwrap(), "13");
//!
//! // Unknown keys are rejected
//! assert!(config.set_option("CACHEMAX", "1024").is_err());
//! ```
//!
//! | key           | default   | meaning                                        |
//! |---------------|-----------|------------------------------------------------|
//! | `VRT_LIBRARY` | `io_gdal` | library of the "Create Virtual Raster" tool    |
//! | `VRT_TOOL`    | `12`      | identifier of the "Create Virtual Raster" tool |
//! | `VERBOSITY`   | `status`  | default [`Verbosity`] of new tool wrappers     |
//! | `EPSG`        | `4326`    | reference system of extent based AOIs          |

use crate::errors::*;
use crate::tool::Verbosity;

const ENV_PREFIX: &str = "SAGA_HELPER_";
const KEYS: [&str; 4] = ["VRT_LIBRARY", "VRT_TOOL", "VERBOSITY", "EPSG"];

#[derive(Clone, Debug, PartialEq)]
pub struct HelperConfig {
    pub vrt_library: String,
    pub vrt_tool: String,
    pub verbosity: Verbosity,
    pub default_epsg: u32,
}

impl Default for HelperConfig {
    fn default() -> Self {
        HelperConfig {
            vrt_library: "io_gdal".to_string(),
            vrt_tool: "12".to_string(),
            verbosity: Verbosity::Status,
            default_epsg: 4326,
        }
    }
}

impl HelperConfig {
    /// Defaults, overridden by any `SAGA_HELPER_*` environment variable.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(format!("{ENV_PREFIX}{key}")).ok())
    }

    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self> {
        let mut config = HelperConfig::default();
        for key in KEYS {
            if let Some(value) = lookup(key) {
                log::debug!("config option {key}={value} from environment");
                config.set_option(key, &value)?;
            }
        }
        Ok(config)
    }

    /// Set a configuration option by key.
    pub fn set_option(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "VRT_LIBRARY" => self.vrt_library = non_empty(key, value)?,
            "VRT_TOOL" => self.vrt_tool = non_empty(key, value)?,
            "VERBOSITY" => self.verbosity = value.parse()?,
            "EPSG" => {
                self.default_epsg = value
                    .trim()
                    .parse()
                    .ok()
                    .filter(|&code| code > 0)
                    .ok_or_else(|| {
                        HelperError::BadArgument(format!("Invalid EPSG code: '{value}'"))
                    })?
            }
            _ => {
                return Err(HelperError::BadArgument(format!(
                    "Unknown config option: '{key}'"
                )))
            }
        }
        Ok(())
    }

    /// Get the value of a configuration option by key.
    pub fn option(&self, key: &str) -> Result<String> {
        match key {
            "VRT_LIBRARY" => Ok(self.vrt_library.clone()),
            "VRT_TOOL" => Ok(self.vrt_tool.clone()),
            "VERBOSITY" => Ok(self.verbosity.to_string()),
            "EPSG" => Ok(self.default_epsg.to_string()),
            _ => Err(HelperError::BadArgument(format!(
                "Unknown config option: '{key}'"
            ))),
        }
    }
}

fn non_empty(key: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(HelperError::BadArgument(format!(
            "Config option '{key}' must not be empty"
        )));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults() {
        let config = HelperConfig::default();
        assert_eq!(config.option("VRT_LIBRARY").unwrap(), "io_gdal");
        assert_eq!(config.option("VRT_TOOL").unwrap(), "12");
        assert_eq!(config.option("VERBOSITY").unwrap(), "status");
        assert_eq!(config.option("EPSG").unwrap(), "4326");
    }

    #[test]
    fn overrides_from_lookup() {
        let env: HashMap<&str, &str> = [("VERBOSITY", "silent"), ("EPSG", "32633")].into();
        let config = HelperConfig::from_lookup(|key| env.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(config.verbosity, Verbosity::Silent);
        assert_eq!(config.default_epsg, 32633);
        assert_eq!(config.vrt_library, "io_gdal");
    }

    #[test]
    fn invalid_values() {
        let mut config = HelperConfig::default();
        assert!(config.set_option("EPSG", "0").is_err());
        assert!(config.set_option("EPSG", "wgs84").is_err());
        assert!(config.set_option("VERBOSITY", "loud").is_err());
        assert!(config.set_option("VRT_TOOL", " ").is_err());
        assert!(config.option("GDAL_CACHEMAX").is_err());
        assert_eq!(config, HelperConfig::default());
    }
}
