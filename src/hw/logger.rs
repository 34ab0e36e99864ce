// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! `log` backend writing to the USART1 debug terminal.
//!
//! Initialize once at start-up, after the USART is up:
//!
//! ```ignore
//! logger::init(Usart::new(serial), LevelFilter::Info)?;
//! info!("starting");
//! ```
//!
//! Each record is one CRLF-terminated line:
//!
//! ```text
//! INFO rover::control::navigator - checkpoint 1: distance=500 angle=90
//! ```
//!
//! Lines are written with interrupts masked, so log sparingly from interrupt handlers.

use core::cell::RefCell;
use core::fmt::Write;

use critical_section::Mutex;
use log::{LevelFilter, Metadata, Record, SetLoggerError};
use stm32f7xx_hal::pac::USART1;

use crate::hw::Usart;

pub struct UsartLogger {
    port: Mutex<RefCell<Option<Usart<USART1>>>>,
}

static LOGGER: UsartLogger = UsartLogger {
    port: Mutex::new(RefCell::new(None)),
};

impl log::Log for UsartLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        critical_section::with(|cs| {
            if let Some(port) = self.port.borrow_ref_mut(cs).as_mut() {
                let _ = write!(
                    port,
                    "{} {} - {}\r\n",
                    record.level(),
                    record.target(),
                    record.args()
                );
            }
        });
    }

    fn flush(&self) {
        critical_section::with(|cs| {
            if let Some(port) = self.port.borrow_ref_mut(cs).as_mut() {
                port.flush();
            }
        });
    }
}

/// Install the USART logger.
///
/// # Errors
///
/// Returns [`SetLoggerError`] if a logger has already been set.
pub fn init(port: Usart<USART1>, level: LevelFilter) -> Result<(), SetLoggerError> {
    critical_section::with(|cs| LOGGER.port.borrow_ref_mut(cs).replace(port));
    log::set_logger(&LOGGER).map(|()| log::set_max_level(level))
}
