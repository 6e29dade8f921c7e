//! ### 2.2 - Call control
//!
//! A data call to `*99#` switches the serial link into PPP data mode, the
//! `+++` escape sequence switches it back into command mode.

use super::{Completion, Decoder, Line, LineHandler, Outcome, ResultCode};
use crate::error::Error;

/// 2.2.4 Originate call to phone number in memory D, dialling the packet
/// data service. Sent with the `AT` prefix.
pub const DIAL_PPP: &str = "D*99#";

/// 2.2.1 Switch from data mode to command mode `+++`
///
/// Sent verbatim, without `AT` prefix or terminator. The module only
/// recognises it after a guard time of silence on the line.
pub const ESCAPE: &str = "+++";

/// Completes on `CONNECT`. `NO CARRIER` and `ERROR` reject the call.
#[derive(Debug, Default)]
pub struct DialResponse;

impl LineHandler for DialResponse {
    fn handle(&mut self, line: Line<'_>) -> Outcome {
        match line {
            Line::Final(ResultCode::Connect) => Outcome::Complete(Completion::Success),
            Line::Final(_) => Outcome::Complete(Completion::Rejected),
            Line::Plain(_) => Outcome::Pending,
        }
    }
}

impl Decoder for DialResponse {
    type Output = ();

    fn finish(self) -> Result<(), Error> {
        Ok(())
    }
}

/// Completes on `OK`, or on `NO CARRIER` when the data call dropped with
/// the escape.
#[derive(Debug, Default)]
pub struct EscapeResponse;

impl LineHandler for EscapeResponse {
    fn handle(&mut self, line: Line<'_>) -> Outcome {
        match line {
            Line::Final(ResultCode::Ok | ResultCode::NoCarrier) => {
                Outcome::Complete(Completion::Success)
            }
            Line::Final(_) => Outcome::Complete(Completion::Rejected),
            Line::Plain(_) => Outcome::Pending,
        }
    }
}

impl Decoder for EscapeResponse {
    type Output = ();

    fn finish(self) -> Result<(), Error> {
        Ok(())
    }
}
