//! Extension manifest: what the host's installer needs to know to set the
//! driver up. Declarative only.
use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::DEFAULT_URL;
use crate::DRIVER_NAME;

pub type Stanza = BTreeMap<String, BTreeMap<String, String>>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtensionManifest {
    pub name: String,
    pub version: String,
    pub description: String,
    pub author: String,
    pub config: Stanza,
    pub files: Vec<(String, Vec<String>)>,
}

impl ExtensionManifest {
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

/// Default configuration the installer merges into the host config.
pub fn default_stanza() -> Stanza {
    let mut station = BTreeMap::new();
    station.insert("station_type".to_string(), DRIVER_NAME.to_string());

    let mut driver = BTreeMap::new();
    driver.insert("driver".to_string(), "user.wn1821".to_string());
    driver.insert("url".to_string(), DEFAULT_URL.to_string());

    let mut stanza = BTreeMap::new();
    stanza.insert("Station".to_string(), station);
    stanza.insert(DRIVER_NAME.to_string(), driver);
    stanza
}

pub fn manifest() -> ExtensionManifest {
    ExtensionManifest {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: crate::DRIVER_VERSION.to_string(),
        description: format!("{} API driver for weewx.", DRIVER_NAME),
        author: env!("CARGO_PKG_AUTHORS").to_string(),
        config: default_stanza(),
        files: vec![(
            "bin".to_string(),
            vec![concat!("bin/", env!("CARGO_PKG_NAME")).to_string()],
        )],
    }
}
