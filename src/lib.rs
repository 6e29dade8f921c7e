#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod asynch;
pub mod command;
pub mod config;
pub mod error;
mod module_timing;
pub mod registration;

#[cfg(test)]
mod test_helpers;

pub use asynch::{Identity, Ingress, Mode, Modem, Router};
pub use command::SIM800_URCS;
pub use config::{ModemConfig, Sim800};
pub use error::Error;
