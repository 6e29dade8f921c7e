//! Responses for Mobile equipment control and status Commands
use atat::atat_derive::AtatResp;
use serde::Serialize;

use super::types::{unix_timestamp, Timestamp};
use crate::command::{
    complete_on_ok, decode_response, split_fields, Completion, Decoder, Line, LineHandler, Outcome,
    ResultCode,
};
use crate::error::Error;

/// 3.2.51 Battery charge +CBC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, AtatResp)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatteryStatus {
    #[at_arg(position = 0)]
    /// Charge status
    /// • 0: not charging
    /// • 1: charging
    /// • 2: charging has finished
    pub bcs: u8,
    #[at_arg(position = 1)]
    /// Battery connection level, 1...100 percent
    pub bcl: u8,
    #[at_arg(position = 2)]
    /// Battery voltage in mV
    pub voltage_mv: u16,
}

#[derive(Debug, Default)]
pub struct BatteryResponse {
    value: Option<BatteryStatus>,
}

impl LineHandler for BatteryResponse {
    fn handle(&mut self, line: Line<'_>) -> Outcome {
        match line {
            Line::Final(code) => return Outcome::Complete(complete_on_ok(code)),
            Line::Plain(text) if text.starts_with("+CBC:") => self.value = decode_response(text),
            Line::Plain(_) => {}
        }
        Outcome::Pending
    }
}

impl Decoder for BatteryResponse {
    type Output = BatteryStatus;

    fn finish(self) -> Result<Self::Output, Error> {
        self.value.ok_or(Error::DecodeFailure)
    }
}

/// `+CCLK: "yy/MM/dd,hh:mm:ss±zz"`
///
/// The zone suffix is checked for shape only, the module clock is taken to
/// be UTC.
fn clock(line: &str) -> Option<Timestamp> {
    let value = line.strip_prefix("+CCLK:")?.trim().trim_matches('"');
    let (date, time) = value.split_once(',')?;

    let (time, zone) = match time.find(|c| c == '+' || c == '-') {
        Some(at) => time.split_at(at),
        None => (time, ""),
    };
    if !zone.is_empty() {
        zone[1..].parse::<u8>().ok()?;
    }

    let [year, month, day] = split_fields::<u16, 3>(date, '/')?;
    let [hour, minute, second] = split_fields::<u16, 3>(time, ':')?;
    unix_timestamp(year, month, day, hour, minute, second)
}

#[derive(Debug, Default)]
pub struct ClockResponse {
    value: Option<Timestamp>,
}

impl LineHandler for ClockResponse {
    fn handle(&mut self, line: Line<'_>) -> Outcome {
        match line {
            Line::Final(code) => return Outcome::Complete(complete_on_ok(code)),
            Line::Plain(text) if text.starts_with("+CCLK:") => self.value = clock(text),
            Line::Plain(_) => {}
        }
        Outcome::Pending
    }
}

impl Decoder for ClockResponse {
    type Output = Timestamp;

    fn finish(self) -> Result<Self::Output, Error> {
        self.value.ok_or(Error::DecodeFailure)
    }
}

/// Completes on `NORMAL POWER DOWN`, `ERROR` rejects.
#[derive(Debug, Default)]
pub struct PowerDownResponse;

impl LineHandler for PowerDownResponse {
    fn handle(&mut self, line: Line<'_>) -> Outcome {
        match line {
            Line::Final(ResultCode::PowerDown) => Outcome::Complete(Completion::Success),
            Line::Final(_) => Outcome::Complete(Completion::Rejected),
            Line::Plain(_) => Outcome::Pending,
        }
    }
}

impl Decoder for PowerDownResponse {
    type Output = ();

    fn finish(self) -> Result<(), Error> {
        Ok(())
    }
}
