//! Loop packets: flat records keyed by weewx observation names.
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ParseError;
use crate::livedata::{is_valid_channel, parse_leading_number, parse_number, parse_percent};
use crate::livedata::{ChannelReading, LiveData};
use crate::logger::Logger;

pub const DATE_TIME: &str = "dateTime";
pub const US_UNITS: &str = "usUnits";

/// Unit system tag carried in every packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitSystem {
    Metric = 0x10,
}

impl UnitSystem {
    pub fn tag(self) -> i64 {
        self as i64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Integer(i64),
    Float(f64),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{:?}", v),
        }
    }
}

/// A single normalized record.
///
/// `dateTime` and `usUnits` are set on construction and cannot be removed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Packet {
    #[serde(skip)]
    date_time: i64,
    fields: BTreeMap<String, Value>,
}

impl Packet {
    pub fn new(stamp: DateTime<Utc>, units: UnitSystem) -> Self {
        let date_time = stamp.timestamp();
        let mut fields = BTreeMap::new();
        fields.insert(DATE_TIME.to_string(), Value::Integer(date_time));
        fields.insert(US_UNITS.to_string(), Value::Integer(units.tag()));
        Self { date_time, fields }
    }

    /// Fold one station document into a packet stamped with `stamp`.
    ///
    /// Any unparseable value aborts the whole packet. Channels outside
    /// 1..8 are skipped with a warning.
    pub fn from_live_data(
        data: &LiveData,
        outdoor_channels: Option<&BTreeSet<String>>,
        stamp: DateTime<Utc>,
        logger: &dyn Logger,
    ) -> Result<Self, ParseError> {
        let mut packet = Packet::new(stamp, UnitSystem::Metric);

        if let Some(indoor) = data.indoor() {
            packet.insert("inTemp", parse_number("intemp", &indoor.intemp)?);
            packet.insert("inHumidity", parse_percent("inhumi", &indoor.inhumi)?);
            packet.insert("barometer", parse_leading_number("rel", &indoor.rel)?);
            packet.insert("pressure", parse_leading_number("abs", &indoor.abs)?);
            packet.insert("co2", parse_number("CO2", &indoor.co2)?);
        }

        if let Some(channels) = &data.ch_aisle {
            for reading in channels {
                let n = &reading.channel;
                if !is_valid_channel(n) {
                    logger.warn(format_args!("Ignoring invalid channel: {}", n));
                    continue;
                }
                packet.insert(format!("extraTemp{}", n), reading.temperature()?);
                packet.insert(format!("extraHumid{}", n), reading.humidity()?);
                packet.insert(format!("batteryStatus{}", n), reading.battery()?);
            }

            if let Some(wanted) = outdoor_channels {
                if let Some(coldest) = coldest_channel(channels, wanted)? {
                    packet.insert("outTemp", coldest.temperature()?);
                    packet.insert("outHumidity", coldest.humidity()?);
                }
            }
        }

        Ok(packet)
    }

    pub fn insert<K: Into<String>, V: Into<Value>>(&mut self, key: K, value: V) {
        let key = key.into();
        if key == DATE_TIME || key == US_UNITS {
            return;
        }
        self.fields.insert(key, value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Epoch seconds.
    pub fn date_time(&self) -> i64 {
        self.date_time
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "'{}': {}", key, value)?;
        }
        write!(f, "}}")
    }
}

/// Of the configured channels, the one reporting the lowest temperature.
/// Ties go to the first one reported. Invalid channels were already warned
/// about by the per-channel pass and are skipped quietly.
fn coldest_channel<'a>(
    channels: &'a [ChannelReading],
    wanted: &BTreeSet<String>,
) -> Result<Option<&'a ChannelReading>, ParseError> {
    let mut coldest = None;
    let mut lowest = f64::INFINITY;

    for reading in channels {
        if !wanted.contains(&reading.channel) || !is_valid_channel(&reading.channel) {
            continue;
        }
        let temp = reading.temperature()?;
        if temp < lowest {
            lowest = temp;
            coldest = Some(reading);
        }
    }

    Ok(coldest)
}
