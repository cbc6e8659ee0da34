//! Logging capability handed to the station.
//!
//! The driver never reaches for a global sink directly; it logs through a
//! `Logger` so hosts and tests can decide where messages end up.
use std::fmt;

use log::Level;

pub trait Logger: Send + Sync {
    fn log(&self, level: Level, args: fmt::Arguments);

    fn debug(&self, args: fmt::Arguments) {
        self.log(Level::Debug, args);
    }

    fn info(&self, args: fmt::Arguments) {
        self.log(Level::Info, args);
    }

    fn warn(&self, args: fmt::Arguments) {
        self.log(Level::Warn, args);
    }

    fn error(&self, args: fmt::Arguments) {
        self.log(Level::Error, args);
    }
}

/// Forwards to the `log` facade under the crate's target.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFacade;

impl Logger for LogFacade {
    fn log(&self, level: Level, args: fmt::Arguments) {
        log::log!(target: "wn1821", level, "{}", args);
    }
}
