//! AT Commands for the SIM800 module family
//! Following the SIM800 Series AT Command Manual V1.09

pub mod call_control;
pub mod classify;
pub mod control;
pub mod general;
pub mod mobile_control;
pub mod network_service;
pub mod urc;

use core::str::FromStr;

use heapless::{String, Vec};

use crate::error::Error;

pub use classify::{classify, Classification, ResultCode};
pub use urc::{Urc, UrcTable, SIM800_URCS};

pub const FRAME_CAPACITY: usize = 128;
pub type Frame = String<FRAME_CAPACITY>;

const AT_PREFIX: &str = "AT";
const AT_TERMINATOR: &str = "\r";
/// Raw lines end with CR LF followed by Ctrl-Z, as used to submit SMS and
/// socket payloads.
const RAW_TERMINATOR: &str = "\r\n\x1A";

/// `AT<text>\r`
pub fn at_frame(text: &str) -> Result<Frame, Error> {
    let mut frame = Frame::new();
    frame.push_str(AT_PREFIX).map_err(|_| Error::Overflow)?;
    frame.push_str(text).map_err(|_| Error::Overflow)?;
    frame.push_str(AT_TERMINATOR).map_err(|_| Error::Overflow)?;
    Ok(frame)
}

/// `<text>\r\n\x1A`
pub fn raw_frame(text: &str) -> Result<Frame, Error> {
    let mut frame = Frame::new();
    frame.push_str(text).map_err(|_| Error::Overflow)?;
    frame.push_str(RAW_TERMINATOR).map_err(|_| Error::Overflow)?;
    Ok(frame)
}

/// A received line as seen by a [`LineHandler`]. URCs never get here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Line<'a> {
    Final(ResultCode),
    Plain(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Completion {
    Success,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    Pending,
    Complete(Completion),
}

pub trait LineHandler {
    fn handle(&mut self, line: Line<'_>) -> Outcome;
}

/// A line handler that produces a typed value once its command succeeded.
pub trait Decoder: Into<Handler> + TryFrom<Handler> {
    type Output;

    fn finish(self) -> Result<Self::Output, Error>;
}

macro_rules! handlers {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        /// The line handler installed in the router
        pub enum Handler {
            $($variant($ty),)*
        }

        impl Handler {
            pub fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant(_) => stringify!($variant),)*
                }
            }
        }

        impl LineHandler for Handler {
            fn handle(&mut self, line: Line<'_>) -> Outcome {
                match self {
                    $(Self::$variant(inner) => inner.handle(line),)*
                }
            }
        }

        $(
            impl From<$ty> for Handler {
                fn from(inner: $ty) -> Self {
                    Self::$variant(inner)
                }
            }

            impl TryFrom<Handler> for $ty {
                type Error = Handler;

                fn try_from(handler: Handler) -> Result<Self, Self::Error> {
                    match handler {
                        Handler::$variant(inner) => Ok(inner),
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

handlers! {
    Default(DefaultHandler),
    Generic(GenericResponse),
    Escape(call_control::EscapeResponse),
    Dial(call_control::DialResponse),
    PowerDown(mobile_control::responses::PowerDownResponse),
    SignalQuality(network_service::responses::SignalQualityResponse),
    Registration(network_service::responses::RegistrationResponse),
    Operator(network_service::responses::OperatorResponse),
    Battery(mobile_control::responses::BatteryResponse),
    Clock(mobile_control::responses::ClockResponse),
    Identity(general::responses::IdentityResponse),
}

impl Default for Handler {
    fn default() -> Self {
        Self::Default(DefaultHandler)
    }
}

impl core::fmt::Debug for Handler {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Installed whenever no command is in flight
#[derive(Debug, Default)]
pub struct DefaultHandler;

impl LineHandler for DefaultHandler {
    fn handle(&mut self, line: Line<'_>) -> Outcome {
        match line {
            Line::Final(ResultCode::PowerDown) => warn!("Module powered down unexpectedly"),
            Line::Final(code) => warn!("Final result code outside of a command: {:?}", code),
            Line::Plain(text) => info!("Unhandled line: {}", text),
        }
        Outcome::Pending
    }
}

/// Any command that only reports `OK` or `ERROR`
#[derive(Debug, Default)]
pub struct GenericResponse;

impl LineHandler for GenericResponse {
    fn handle(&mut self, line: Line<'_>) -> Outcome {
        match line {
            Line::Final(code) => Outcome::Complete(complete_on_ok(code)),
            Line::Plain(text) => {
                info!("{}", text);
                Outcome::Pending
            }
        }
    }
}

impl Decoder for GenericResponse {
    type Output = ();

    fn finish(self) -> Result<(), Error> {
        Ok(())
    }
}

/// `OK` succeeds, every other final result code rejects.
pub(crate) fn complete_on_ok(code: ResultCode) -> Completion {
    match code {
        ResultCode::Ok => Completion::Success,
        _ => Completion::Rejected,
    }
}

/// Deserialize an information response line such as `+CSQ: 15,2` into its
/// `AtatResp` struct. The `+XXX: ` prefix is skipped by `serde_at`.
pub(crate) fn decode_response<'a, T: serde::Deserialize<'a>>(line: &'a str) -> Option<T> {
    match atat::serde_at::de::from_str(line) {
        Ok(value) => Some(value),
        Err(_) => {
            debug!("Failed to decode {}", line);
            None
        }
    }
}

/// Parse the first `N` comma separated fields following `prefix`.
///
/// For payloads `serde_at` does not cover, like `*PSUTTZ` with its `*`
/// prefix.
pub(crate) fn numeric_fields<T: FromStr, const N: usize>(
    line: &str,
    prefix: &str,
) -> Option<[T; N]> {
    split_fields(line.strip_prefix(prefix)?, ',')
}

/// Parse the first `N` fields of `text` split on `separator`.
pub(crate) fn split_fields<T: FromStr, const N: usize>(
    text: &str,
    separator: char,
) -> Option<[T; N]> {
    let mut fields: Vec<T, N> = Vec::new();
    for field in text.split(separator).take(N) {
        fields.push(field.trim().parse().ok()?).ok()?;
    }
    fields.into_array().ok()
}

/// Copy as much of `text` as fits.
pub(crate) fn truncated<const N: usize>(text: &str) -> String<N> {
    let mut out = String::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
