//! Effective configuration display

use anyhow::Result;

use crate::config::AppConfig;
use crate::output;

/// Execute the config command
pub fn execute(config: &AppConfig, json: bool) -> Result<()> {
    output::print_config(config, json)
}
