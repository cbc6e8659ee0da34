use thiserror::Error;

/// Failure to get a response body from the station.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("station responded with HTTP status {0}")]
    Status(u16),

    #[error("failed to read response body: {0}")]
    Body(#[from] std::io::Error),
}

/// The station answered, but with something that does not fold into a packet.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid live data document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("'{field}' missing from {block}")]
    MissingField {
        block: &'static str,
        field: &'static str,
    },

    #[error("could not parse {field} value {value:?} as a number")]
    InvalidNumber { field: &'static str, value: String },

    #[error("could not parse {field} value {value:?} as an integer")]
    InvalidInteger { field: &'static str, value: String },
}

/// Outcome of a single failed poll cycle.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("Error fetching data from WN1821: {0}")]
    Transport(#[from] TransportError),

    #[error("Error processing data: {0}")]
    Parse(#[from] ParseError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration section [{0}] not found")]
    MissingSection(&'static str),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] serde_json::Error),

    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
