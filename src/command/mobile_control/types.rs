//! Argument and parameter types used by Mobile equipment control and status
//! Commands and Responses
use chrono::NaiveDate;
use serde::Serialize;

/// Seconds since the Unix epoch
pub type Timestamp = u64;

/// Two digit years below this mean the module has no clock estimate yet and
/// reports its build default.
const MIN_TWO_DIGIT_YEAR: u16 = 14;
const CENTURY: u16 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Functionality {
    /// • 0: minimum functionality
    Minimum,
    /// • 1: full functionality (default)
    Full,
    /// • 2: disable phone transmit RF circuits only
    DisableTransmit,
    /// • 3: disable phone receive RF circuits only
    DisableReceive,
    /// • 4: disable phone both transmit and receive RF circuits
    DisableRf,
    Reserved(u8),
}

impl From<u8> for Functionality {
    fn from(fun: u8) -> Self {
        match fun {
            0 => Self::Minimum,
            1 => Self::Full,
            2 => Self::DisableTransmit,
            3 => Self::DisableReceive,
            4 => Self::DisableRf,
            n => Self::Reserved(n),
        }
    }
}

/// Convert a reported UTC date and time to a [`Timestamp`].
///
/// `year` is either two digit (`23`) or four digit (`2023`). Dates before 2014
/// and impossible dates yield `None`.
pub fn unix_timestamp(
    year: u16,
    month: u16,
    day: u16,
    hour: u16,
    minute: u16,
    second: u16,
) -> Option<Timestamp> {
    let year = if year < 100 {
        if year < MIN_TWO_DIGIT_YEAR {
            return None;
        }
        CENTURY + year
    } else if year < CENTURY + MIN_TWO_DIGIT_YEAR {
        return None;
    } else {
        year
    };

    let seconds = NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), u32::from(day))?
        .and_hms_opt(u32::from(hour), u32::from(minute), u32::from(second))?
        .and_utc()
        .timestamp();
    Timestamp::try_from(seconds).ok()
}
