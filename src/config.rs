use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use serde_json::Value as ConfigDict;

use crate::error::ConfigError;
use crate::livedata::is_valid_channel;
use crate::DRIVER_NAME;

pub const DEFAULT_URL: &str = "http://192.168.4.1/get_livedata_info";

/// Driver settings, read from the `[WN1821]` section of the host config.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    /// Live data endpoint of the station.
    #[serde(default = "default_url")]
    pub url: String,

    /// Channels whose coldest reading stands in for outdoor temperature and
    /// humidity. `None` when not configured.
    #[serde(
        default,
        rename = "out_temp_and_humidity_channels",
        deserialize_with = "deserialize_channels"
    )]
    pub outdoor_channels: Option<BTreeSet<String>>,
}

fn default_url() -> String {
    DEFAULT_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: default_url(),
            outdoor_channels: None,
        }
    }
}

impl Config {
    /// Pull the driver section out of a host configuration dictionary.
    pub fn from_host(config_dict: &ConfigDict) -> Result<Self, ConfigError> {
        let section = config_dict
            .get(DRIVER_NAME)
            .ok_or(ConfigError::MissingSection(DRIVER_NAME))?;
        if section.is_null() {
            return Ok(Config::default());
        }
        Ok(Config::deserialize(section)?)
    }

    /// Configured outdoor channels the station can never report.
    pub fn unknown_outdoor_channels(&self) -> Vec<&str> {
        self.outdoor_channels
            .iter()
            .flatten()
            .map(String::as_str)
            .filter(|c| !is_valid_channel(c))
            .collect()
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "  URL: {}", self.url)?;
        match &self.outdoor_channels {
            Some(channels) => {
                let channels: Vec<&str> = channels.iter().map(String::as_str).collect();
                write!(f, "  Out Temp and Humidity Channels: {}", channels.join(","))
            }
            None => write!(f, "  Out Temp and Humidity Channels: none"),
        }
    }
}

/// Read a YAML host configuration file into a config dictionary.
pub fn load_host_config(path: impl AsRef<Path>) -> Result<ConfigDict, ConfigError> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    parse_host_config(&contents)
}

pub fn parse_host_config(yaml: &str) -> Result<ConfigDict, ConfigError> {
    Ok(serde_yaml::from_str(yaml)?)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ChannelItem {
    Number(i64),
    Text(String),
}

impl ChannelItem {
    fn into_channels(self) -> Vec<String> {
        match self {
            ChannelItem::Number(n) => vec![n.to_string()],
            ChannelItem::Text(text) => parse_channel_list(&text),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ChannelSetting {
    One(ChannelItem),
    Many(Vec<ChannelItem>),
}

/// Split `"1, 2,,3"` into `["1", "2", "3"]`.
pub fn parse_channel_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

fn deserialize_channels<'de, D>(deserializer: D) -> Result<Option<BTreeSet<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let setting = Option::<ChannelSetting>::deserialize(deserializer)?;
    let channels: BTreeSet<String> = match setting {
        None => return Ok(None),
        Some(ChannelSetting::One(item)) => item.into_channels().into_iter().collect(),
        Some(ChannelSetting::Many(items)) => items
            .into_iter()
            .flat_map(ChannelItem::into_channels)
            .collect(),
    };

    if channels.is_empty() {
        Ok(None)
    } else {
        Ok(Some(channels))
    }
}
