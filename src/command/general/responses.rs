//! Responses for General Commands
use heapless::String;

use crate::command::{complete_on_ok, truncated, Decoder, Line, LineHandler, Outcome};
use crate::error::Error;

pub const IDENTITY_LEN: usize = 32;

/// Shorter answers are treated as garbage rather than an identity.
const MIN_IDENTITY_LEN: usize = 3;

/// Captures the first intermediate line that is not the echo of the command.
#[derive(Debug, Default)]
pub struct IdentityResponse {
    value: Option<String<IDENTITY_LEN>>,
}

impl LineHandler for IdentityResponse {
    fn handle(&mut self, line: Line<'_>) -> Outcome {
        match line {
            Line::Final(code) => Outcome::Complete(complete_on_ok(code)),
            Line::Plain(text) => {
                if self.value.is_none() && !text.starts_with("AT") {
                    self.value = Some(truncated(text));
                }
                Outcome::Pending
            }
        }
    }
}

impl Decoder for IdentityResponse {
    type Output = String<IDENTITY_LEN>;

    fn finish(self) -> Result<Self::Output, Error> {
        match self.value {
            Some(value) if value.len() >= MIN_IDENTITY_LEN => Ok(value),
            _ => Err(Error::DecodeFailure),
        }
    }
}
