//! Polling the station.
//!
//! `Station::poll` runs one fetch-and-fold cycle. `Station::loop_packets`
//! turns that into the endless stream of loop packets a host consumes,
//! pausing `LOOP_INTERVAL` between cycles so the station API is not hammered.
use std::collections::BTreeSet;
use std::thread;
use std::time::Duration;

use chrono::Utc;

use crate::config::Config;
use crate::error::{PollError, TransportError};
use crate::livedata::LiveData;
use crate::logger::{LogFacade, Logger};
use crate::packet::Packet;
use crate::DRIVER_NAME;

pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
pub const LOOP_INTERVAL: Duration = Duration::from_secs(60);

static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

/// What a host needs from a weather station driver.
pub trait Driver {
    fn hardware_name(&self) -> &str;

    /// Endless stream of loop packets. Blocks between packets.
    fn loop_packets(&mut self) -> Box<dyn Iterator<Item = Packet> + '_>;
}

/// Where the live data document comes from.
pub trait LiveDataSource: Send {
    fn fetch(&self, url: &str) -> Result<String, TransportError>;
}

/// Blocking HTTP GET against the station.
pub struct HttpSource {
    agent: ureq::Agent,
}

impl HttpSource {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(APP_USER_AGENT)
            .build();
        Self { agent }
    }
}

impl Default for HttpSource {
    fn default() -> Self {
        Self::new(FETCH_TIMEOUT)
    }
}

impl LiveDataSource for HttpSource {
    fn fetch(&self, url: &str) -> Result<String, TransportError> {
        match self.agent.get(url).call() {
            Ok(response) => Ok(response.into_string()?),
            Err(ureq::Error::Status(status, _)) => Err(TransportError::Status(status)),
            Err(err) => Err(TransportError::Request(err.to_string())),
        }
    }
}

/// The delay between poll cycles.
pub trait Pause: Send {
    fn pause(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleep;

impl Pause for ThreadSleep {
    fn pause(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Poller for a single WN1821 station.
pub struct Station<S = HttpSource, P = ThreadSleep> {
    config: Config,
    source: S,
    pause: P,
    logger: Box<dyn Logger>,
}

impl Station {
    pub fn new(config: Config) -> Self {
        Self::with_parts(config, HttpSource::default(), ThreadSleep, Box::new(LogFacade))
    }
}

impl<S: LiveDataSource, P: Pause> Station<S, P> {
    pub fn with_parts(config: Config, source: S, pause: P, logger: Box<dyn Logger>) -> Self {
        logger.info(format_args!("{} driver initialized with:\n{}", DRIVER_NAME, config));
        for channel in config.unknown_outdoor_channels() {
            logger.warn(format_args!(
                "Configured outdoor channel {} is outside 1..8 and will never be used",
                channel
            ));
        }

        Self {
            config,
            source,
            pause,
            logger,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn outdoor_channels(&self) -> Option<&BTreeSet<String>> {
        self.config.outdoor_channels.as_ref()
    }

    /// One cycle: fetch the live data and fold it into a packet.
    pub fn poll(&self) -> Result<Packet, PollError> {
        let body = self.source.fetch(&self.config.url)?;
        let data = LiveData::from_json(&body)?;
        let packet =
            Packet::from_live_data(&data, self.outdoor_channels(), Utc::now(), &*self.logger)?;

        self.logger.debug(format_args!("Generated packet: {}", packet));
        Ok(packet)
    }

    /// Endless, lazy stream of packets. Failed cycles are logged and skipped.
    pub fn loop_packets(&mut self) -> LoopPackets<'_, S, P> {
        self.logger.debug(format_args!("loop_packets() getting live info"));
        LoopPackets {
            station: self,
            started: false,
        }
    }
}

impl<S: LiveDataSource, P: Pause> Driver for Station<S, P> {
    fn hardware_name(&self) -> &str {
        DRIVER_NAME
    }

    fn loop_packets(&mut self) -> Box<dyn Iterator<Item = Packet> + '_> {
        Box::new(Station::<S, P>::loop_packets(self))
    }
}

/// Iterator returned by [`Station::loop_packets`]. Never ends.
pub struct LoopPackets<'a, S, P> {
    station: &'a Station<S, P>,
    started: bool,
}

impl<'a, S: LiveDataSource, P: Pause> Iterator for LoopPackets<'a, S, P> {
    type Item = Packet;

    fn next(&mut self) -> Option<Packet> {
        loop {
            if self.started {
                self.station.pause.pause(LOOP_INTERVAL);
            }
            self.started = true;

            match self.station.poll() {
                Ok(packet) => return Some(packet),
                Err(err) => self.station.logger.error(format_args!("{}", err)),
            }
        }
    }
}
