//! The `/get_livedata_info` document as reported by the station.
//!
//! The station reports every value as a string, sometimes with a unit
//! attached (`"65%"`, `"1013.2 hPa"`), so the parsers below do the
//! conversions the packet needs.
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::ParseError;

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct LiveData {
    /// First `wh25` block; the station only ever fills one.
    #[serde(rename = "wh25", default, deserialize_with = "first_block")]
    pub indoor: Option<Wh25>,

    #[serde(default)]
    pub ch_aisle: Option<Vec<ChannelReading>>,
}

impl LiveData {
    pub fn from_json(body: &str) -> Result<Self, ParseError> {
        Ok(serde_json::from_str(body)?)
    }

    /// The indoor block, when the station reports one.
    pub fn indoor(&self) -> Option<&Wh25> {
        self.indoor.as_ref()
    }
}

/// Decode only the first element of the `wh25` list; later ones are never read.
fn first_block<'de, D>(deserializer: D) -> Result<Option<Wh25>, D::Error>
where
    D: Deserializer<'de>,
{
    let blocks = Option::<Vec<Value>>::deserialize(deserializer)?;
    match blocks.and_then(|blocks| blocks.into_iter().next()) {
        Some(first) => Wh25::deserialize(first).map(Some).map_err(D::Error::custom),
        None => Ok(None),
    }
}

/// Channel ids are strings on the wire; anything else is kept as its JSON
/// text so it can be rejected like any other unknown channel.
fn channel_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(id) => Ok(id),
        other => Ok(other.to_string()),
    }
}

/// Indoor temperature, humidity, pressure and CO2 sensor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Wh25 {
    pub intemp: String,
    pub inhumi: String,
    pub rel: String,
    pub abs: String,
    #[serde(rename = "CO2")]
    pub co2: String,
}

/// One WN31-style auxiliary channel.
///
/// Only `channel` is required up front: readings of invalid channels are
/// skipped without being looked at.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChannelReading {
    #[serde(deserialize_with = "channel_id")]
    pub channel: String,
    #[serde(default)]
    pub temp: Option<String>,
    #[serde(default)]
    pub humidity: Option<String>,
    #[serde(default)]
    pub battery: Option<String>,
}

impl ChannelReading {
    pub fn temperature(&self) -> Result<f64, ParseError> {
        parse_number("temp", required("ch_aisle", "temp", &self.temp)?)
    }

    pub fn humidity(&self) -> Result<i64, ParseError> {
        parse_percent("humidity", required("ch_aisle", "humidity", &self.humidity)?)
    }

    pub fn battery(&self) -> Result<f64, ParseError> {
        parse_number("battery", required("ch_aisle", "battery", &self.battery)?)
    }
}

/// Valid channel numbers, as the station spells them.
pub const CHANNELS: [&str; 8] = ["1", "2", "3", "4", "5", "6", "7", "8"];

pub fn is_valid_channel(channel: &str) -> bool {
    CHANNELS.contains(&channel)
}

fn required<'a>(
    block: &'static str,
    field: &'static str,
    value: &'a Option<String>,
) -> Result<&'a str, ParseError> {
    value
        .as_deref()
        .ok_or(ParseError::MissingField { block, field })
}

pub fn parse_number(field: &'static str, value: &str) -> Result<f64, ParseError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| ParseError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}

/// `"65%"` -> `65`
pub fn parse_percent(field: &'static str, value: &str) -> Result<i64, ParseError> {
    value
        .trim_matches('%')
        .trim()
        .parse::<i64>()
        .map_err(|_| ParseError::InvalidInteger {
            field,
            value: value.to_string(),
        })
}

/// `"1013.2 hPa"` -> `1013.2`
pub fn parse_leading_number(field: &'static str, value: &str) -> Result<f64, ParseError> {
    let token = value
        .split_whitespace()
        .next()
        .ok_or_else(|| ParseError::InvalidNumber {
            field,
            value: value.to_string(),
        })?;
    parse_number(field, token)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "common_list": [{"id": "0x02", "val": "20.1", "unit": "C"}],
        "wh25": [{"intemp": "22.4", "unit": "C", "inhumi": "48%", "abs": "985.3 hPa", "rel": "1012.8 hPa", "CO2": "612", "CO2_24H": "580"}],
        "ch_aisle": [
            {"channel": "1", "name": "", "battery": "5", "temp": "11.8", "unit": "C", "humidity": "81%"},
            {"channel": "2", "name": "", "battery": "4", "temp": "21.0", "unit": "C", "humidity": "45%"}
        ]
    }"#;

    #[test]
    fn parses_station_document() {
        // act
        let data = LiveData::from_json(SAMPLE).unwrap();

        // assert
        let indoor = data.indoor().unwrap();
        assert_eq!(indoor.intemp, "22.4");
        assert_eq!(indoor.co2, "612");
        let channels = data.ch_aisle.unwrap();
        assert_eq!(channels.len(), 2);
        assert_eq!(channels[1].channel, "2");
        assert_eq!(channels[1].humidity.as_deref(), Some("45%"));
    }

    #[test]
    fn missing_blocks_are_none() {
        // act
        let data = LiveData::from_json("{}").unwrap();

        // assert
        assert_eq!(data, LiveData::default());
        assert!(data.indoor().is_none());
    }

    #[test]
    fn empty_wh25_has_no_indoor_block() {
        let data = LiveData::from_json(r#"{"wh25": []}"#).unwrap();

        assert!(data.indoor().is_none());
    }

    #[test]
    fn later_wh25_blocks_are_not_decoded() {
        // act
        let data = LiveData::from_json(
            r#"{"wh25": [
                {"intemp": "22.4", "inhumi": "48%", "abs": "985.3 hPa", "rel": "1012.8 hPa", "CO2": "612"},
                {"intemp": "1"}
            ]}"#,
        )
        .unwrap();

        // assert
        assert_eq!(data.indoor().unwrap().inhumi, "48%");
    }

    #[test]
    fn numeric_channel_id_is_kept_as_text() {
        // act
        let data = LiveData::from_json(
            r#"{"ch_aisle": [
                {"channel": 9, "temp": "20.0", "humidity": "50%", "battery": "5"},
                {"channel": "1", "temp": "18.5", "humidity": "55%", "battery": "4"},
                {"channel": null}
            ]}"#,
        )
        .unwrap();

        // assert
        let ids: Vec<String> = data.ch_aisle.unwrap().into_iter().map(|c| c.channel).collect();
        assert_eq!(ids, vec!["9", "1", "null"]);
    }

    #[test]
    fn non_json_body_is_a_parse_error() {
        let err = LiveData::from_json("<html>busy</html>").unwrap_err();

        assert!(matches!(err, ParseError::Json(_)));
    }

    #[test]
    fn wh25_missing_field_is_a_parse_error() {
        let err = LiveData::from_json(r#"{"wh25": [{"intemp": "22.4"}]}"#).unwrap_err();

        assert!(matches!(err, ParseError::Json(_)));
    }

    #[test]
    fn percent_is_stripped() {
        assert_eq!(parse_percent("inhumi", "65%").unwrap(), 65);
        assert_eq!(parse_percent("inhumi", "7").unwrap(), 7);
        assert!(parse_percent("inhumi", "65.5%").is_err());
        assert!(parse_percent("inhumi", "--%").is_err());
    }

    #[test]
    fn leading_number_ignores_unit() {
        assert_eq!(parse_leading_number("rel", "1012.8 hPa").unwrap(), 1012.8);
        assert_eq!(parse_leading_number("rel", "29.91 inHg").unwrap(), 29.91);
        assert!(parse_leading_number("rel", "").is_err());
        assert!(parse_leading_number("rel", "-- hPa").is_err());
    }

    #[test]
    fn channel_reading_requires_fields_on_access() {
        // arrange
        let reading = ChannelReading {
            channel: "3".to_string(),
            temp: Some("12.5".to_string()),
            humidity: None,
            battery: Some("x".to_string()),
        };

        // assert
        assert_eq!(reading.temperature().unwrap(), 12.5);
        assert!(matches!(
            reading.humidity(),
            Err(ParseError::MissingField {
                field: "humidity",
                ..
            })
        ));
        assert!(matches!(
            reading.battery(),
            Err(ParseError::InvalidNumber { field: "battery", .. })
        ));
    }

    #[test]
    fn only_channels_one_to_eight_are_valid() {
        assert!(is_valid_channel("1"));
        assert!(is_valid_channel("8"));
        assert!(!is_valid_channel("0"));
        assert!(!is_valid_channel("9"));
        assert!(!is_valid_channel("01"));
        assert!(!is_valid_channel(""));
    }
}
