use embassy_time::Duration;

use crate::{command::control, module_timing};

/// Initialization strings sent after echo has been disabled. Each entry is
/// the text following `AT`.
pub const DEFAULT_INIT_COMMANDS: &[&str] = &[
    control::FIXED_BAUD_RATE,
    control::VERBOSE_ERRORS,
    control::INDICATOR_REPORTING,
    control::LOCAL_TIMESTAMP,
    control::FLOW_CONTROL_NONE,
    control::RESULT_CODES_ON,
    control::STORE_PROFILE,
    control::FULL_FUNCTIONALITY,
];

pub trait ModemConfig {
    /// Maximum number of `AT` probes before bring-up is abandoned
    const SYNC_ATTEMPTS: u8 = 10;

    /// Maximum number of `AT+CREG?` polls before bring-up is abandoned
    const REGISTRATION_ATTEMPTS: u8 = 5;

    fn sync_interval(&self) -> Duration {
        module_timing::sync_interval()
    }

    fn registration_interval(&self) -> Duration {
        module_timing::registration_interval()
    }

    fn command_timeout(&self) -> Duration {
        module_timing::command_timeout()
    }

    fn operator_timeout(&self) -> Duration {
        module_timing::operator_timeout()
    }

    fn escape_timeout(&self) -> Duration {
        module_timing::escape_timeout()
    }

    fn dial_timeout(&self) -> Duration {
        module_timing::dial_timeout()
    }

    fn power_down_timeout(&self) -> Duration {
        module_timing::power_down_timeout()
    }

    /// Profile strings applied during bring-up. A failing entry is logged and
    /// skipped.
    fn init_commands(&self) -> &[&str] {
        DEFAULT_INIT_COMMANDS
    }
}

/// Stock SIM800 settings
#[derive(Debug, Clone, Copy, Default)]
pub struct Sim800;

impl ModemConfig for Sim800 {}
