//! ### 3.2 - Mobile equipment control and status
pub mod responses;
pub mod types;

/// 3.2.47 Power off +CPOWD, normal power off
///
/// The module answers `NORMAL POWER DOWN` instead of `OK` and stops responding
/// afterwards.
pub const POWER_DOWN: &str = "+CPOWD=1";

/// 3.2.51 Battery charge +CBC
pub const BATTERY_CHARGE: &str = "+CBC";

/// 3.2.24 Clock +CCLK, read command
///
/// Returns `+CCLK: "yy/MM/dd,hh:mm:ss±zz"`, where the zone is given in quarters
/// of an hour.
pub const CLOCK: &str = "+CCLK?";
