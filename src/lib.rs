//! Driver for the Ecowitt WN1821 weather station.
//!
//! Polls the station's `/get_livedata_info` JSON endpoint once a minute and
//! turns each answer into a flat loop packet keyed by weewx observation
//! names (`inTemp`, `extraTemp1`, `outHumidity`, ...).
pub mod config;
pub mod error;
pub mod installer;
pub mod livedata;
pub mod logger;
pub mod packet;
pub mod station;

use serde_json::Value as ConfigDict;

use crate::config::Config;
use crate::error::ConfigError;
use crate::station::Station;

pub const DRIVER_NAME: &str = "WN1821";
pub const DRIVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Host entry point: build the driver from the `[WN1821]` section.
pub fn loader(config_dict: &ConfigDict) -> Result<Station, ConfigError> {
    Ok(Station::new(Config::from_host(config_dict)?))
}
