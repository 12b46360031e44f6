//! Configuration file loading for tasktickctl

use std::path::Path;

use serde::{Deserialize, Serialize};
use tasktick_control::{ControllerConfig, Waveform};
use tasktick_scheduler::SchedulerConfig;

use crate::error::CliError;

/// Simulated sensor inputs, as raw 10-bit ADC waveforms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    pub temperature: Waveform,
    pub light: Waveform,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            // Roughly 18 °C to 33 °C.
            temperature: Waveform::Triangle {
                low: 140,
                high: 170,
                step: 1,
            },
            // Roughly 10 % to 88 %.
            light: Waveform::Triangle {
                low: 100,
                high: 900,
                step: 25,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Result<Self, CliError> {
        let Some(ext) = path.extension() else {
            return Ok(Self::Json);
        };
        match ext.to_str().map(str::to_ascii_lowercase).as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(CliError::InvalidConfiguration(format!(
                "unsupported config file extension `{}` (expected json, yaml or yml)",
                ext.to_string_lossy()
            ))),
        }
    }
}

/// Everything tasktickctl can be configured with.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scheduler: SchedulerConfig,
    pub controller: ControllerConfig,
    pub sensors: SensorConfig,
}

impl AppConfig {
    /// Load the configuration, falling back to defaults with no file.
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON or YAML file, chosen by extension.
    ///
    /// A file without an extension is read as JSON; any extension other than
    /// `json`, `yaml` or `yml` is rejected before the file is opened.
    pub fn from_file(path: &Path) -> Result<Self, CliError> {
        let format = ConfigFormat::from_path(path)?;
        let text = std::fs::read_to_string(path)?;
        let config = match format {
            ConfigFormat::Json => serde_json::from_str(&text)?,
            ConfigFormat::Yaml => serde_yaml::from_str(&text)?,
        };
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CliError> {
        self.scheduler.validate()?;
        self.controller.validate()?;
        Ok(())
    }
}
