//! Responses for Network service Commands
use atat::atat_derive::AtatResp;
use heapless::String;
use serde::Serialize;

use super::types::NetworkRegistrationUrc;
use crate::command::{
    complete_on_ok, decode_response, truncated, Decoder, Line, LineHandler, Outcome,
};
use crate::error::Error;
use crate::registration::Status;

pub const OPERATOR_LEN: usize = 32;

/// 3.2.21 Signal quality report +CSQ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, AtatResp)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SignalQuality {
    #[at_arg(position = 0)]
    /// • 0: -115 dBm or less
    /// • 1: -111 dBm
    /// • 2...30: -110 to -54 dBm
    /// • 31: -52 dBm or greater
    /// • 99: not known or not detectable
    pub rssi: u8,
    #[at_arg(position = 1)]
    /// Channel bit error rate in percent, 0...7, 99 if not known
    pub ber: u8,
}

impl SignalQuality {
    /// Received signal strength in dBm, `None` when not detectable.
    pub fn dbm(&self) -> Option<i16> {
        match self.rssi {
            0 => Some(-115),
            1 => Some(-111),
            n @ 2..=30 => Some(-114 + 2 * i16::from(n)),
            31 => Some(-52),
            _ => None,
        }
    }
}

/// 3.2.32 Network registration +CREG
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NetworkRegistration {
    pub mode: NetworkRegistrationUrc,
    pub stat: Status,
}

impl NetworkRegistration {
    pub fn registered(&self) -> bool {
        self.stat.registered()
    }
}

/// `+CREG: <n>,<stat>[,<lac>,<ci>]`, the location is only reported with
/// `AT+CREG=2`
#[derive(Debug, Clone, PartialEq, Eq, AtatResp)]
#[allow(dead_code)]
struct RegistrationRead {
    #[at_arg(position = 0)]
    n: NetworkRegistrationUrc,
    #[at_arg(position = 1)]
    stat: u8,
    #[at_arg(position = 2)]
    lac: Option<String<8>>,
    #[at_arg(position = 3)]
    ci: Option<String<8>>,
}

#[derive(Debug, Default)]
pub struct SignalQualityResponse {
    value: Option<SignalQuality>,
}

impl LineHandler for SignalQualityResponse {
    fn handle(&mut self, line: Line<'_>) -> Outcome {
        match line {
            Line::Final(code) => return Outcome::Complete(complete_on_ok(code)),
            Line::Plain(text) if text.starts_with("+CSQ:") => {
                self.value = decode_response(text);
            }
            Line::Plain(_) => {}
        }
        Outcome::Pending
    }
}

impl Decoder for SignalQualityResponse {
    type Output = SignalQuality;

    fn finish(self) -> Result<Self::Output, Error> {
        self.value.ok_or(Error::DecodeFailure)
    }
}

#[derive(Debug, Default)]
pub struct RegistrationResponse {
    value: Option<NetworkRegistration>,
}

impl LineHandler for RegistrationResponse {
    fn handle(&mut self, line: Line<'_>) -> Outcome {
        match line {
            Line::Final(code) => return Outcome::Complete(complete_on_ok(code)),
            Line::Plain(text) if text.starts_with("+CREG:") => {
                self.value =
                    decode_response(text).map(|read: RegistrationRead| NetworkRegistration {
                        mode: read.n,
                        stat: Status::from(read.stat),
                    });
            }
            Line::Plain(_) => {}
        }
        Outcome::Pending
    }
}

impl Decoder for RegistrationResponse {
    type Output = NetworkRegistration;

    fn finish(self) -> Result<Self::Output, Error> {
        self.value.ok_or(Error::DecodeFailure)
    }
}

/// The operator is the last non-empty comma separated token of the line, as
/// long as the line has at least three of them.
#[derive(Debug, Default)]
pub struct OperatorResponse {
    value: Option<String<OPERATOR_LEN>>,
}

const MIN_OPERATOR_TOKENS: usize = 3;
const MIN_OPERATOR_LEN: usize = 3;

fn operator_name(line: &str) -> Option<String<OPERATOR_LEN>> {
    let mut tokens = line.split(',').filter(|token| !token.is_empty());
    let count = tokens.clone().count();
    if count < MIN_OPERATOR_TOKENS {
        return None;
    }

    let name = tokens
        .nth(count - 1)?
        .trim_matches(|c| c == '\r' || c == '\n')
        .trim_matches('"');
    if name.len() < MIN_OPERATOR_LEN {
        return None;
    }
    Some(truncated(name))
}

impl LineHandler for OperatorResponse {
    fn handle(&mut self, line: Line<'_>) -> Outcome {
        match line {
            Line::Final(code) => return Outcome::Complete(complete_on_ok(code)),
            Line::Plain(text) if text.starts_with("+COPS:") => {
                self.value = operator_name(text);
            }
            Line::Plain(_) => {}
        }
        Outcome::Pending
    }
}

impl Decoder for OperatorResponse {
    type Output = String<OPERATOR_LEN>;

    fn finish(self) -> Result<Self::Output, Error> {
        self.value.ok_or(Error::DecodeFailure)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::command::{Completion, ResultCode};

    fn run<D: LineHandler>(handler: &mut D, lines: &[Line<'_>]) -> Outcome {
        let mut outcome = Outcome::Pending;
        for line in lines {
            outcome = handler.handle(*line);
        }
        outcome
    }

    #[test]
    fn signal_quality() {
        let mut handler = SignalQualityResponse::default();
        let outcome = run(
            &mut handler,
            &[
                Line::Plain("AT+CSQ"),
                Line::Plain("+CSQ: 15,2"),
                Line::Final(ResultCode::Ok),
            ],
        );
        assert_eq!(outcome, Outcome::Complete(Completion::Success));
        let quality = handler.finish().unwrap();
        assert_eq!(quality, SignalQuality { rssi: 15, ber: 2 });
        assert_eq!(quality.dbm(), Some(-84));
    }

    #[test]
    fn signal_quality_missing_field() {
        let mut handler = SignalQualityResponse::default();
        run(
            &mut handler,
            &[Line::Plain("+CSQ: 15"), Line::Final(ResultCode::Ok)],
        );
        assert_eq!(handler.finish(), Err(Error::DecodeFailure));

        let handler = SignalQualityResponse::default();
        assert_eq!(handler.finish(), Err(Error::DecodeFailure));
    }

    #[test]
    fn not_detectable_rssi() {
        let quality = SignalQuality { rssi: 99, ber: 99 };
        assert_eq!(quality.dbm(), None);
    }

    #[test]
    fn registration() {
        let mut handler = RegistrationResponse::default();
        run(
            &mut handler,
            &[Line::Plain("+CREG: 0,5"), Line::Final(ResultCode::Ok)],
        );
        let registration = handler.finish().unwrap();
        assert_eq!(registration.mode, NetworkRegistrationUrc::UrcDisabled);
        assert_eq!(registration.stat, Status::Roaming);
        assert!(registration.registered());

        let mut handler = RegistrationResponse::default();
        run(
            &mut handler,
            &[
                Line::Plain("+CREG: 2,2,\"1A2B\",\"0C3D\""),
                Line::Final(ResultCode::Ok),
            ],
        );
        let registration = handler.finish().unwrap();
        assert_eq!(registration.mode, NetworkRegistrationUrc::UrcVerbose);
        assert!(!registration.registered());

        let mut handler = RegistrationResponse::default();
        run(
            &mut handler,
            &[Line::Plain("+CREG: 7,1"), Line::Final(ResultCode::Ok)],
        );
        assert_eq!(handler.finish(), Err(Error::DecodeFailure));
    }

    #[test]
    fn operator_keeps_embedded_space() {
        let mut handler = OperatorResponse::default();
        let outcome = run(
            &mut handler,
            &[
                Line::Plain("+COPS: 0,0,\"Example Telecom\""),
                Line::Final(ResultCode::Ok),
            ],
        );
        assert_eq!(outcome, Outcome::Complete(Completion::Success));
        assert_eq!(handler.finish().unwrap().as_str(), "Example Telecom");
    }

    #[test]
    fn operator_tokens() {
        // Empty tokens are skipped
        assert_eq!(
            operator_name("+COPS: 0,,0,\"Telia\"").unwrap().as_str(),
            "Telia"
        );
        // Not registered, no operator reported
        assert_eq!(operator_name("+COPS: 0"), None);
        assert_eq!(operator_name("+COPS: 0,,\"Telia\""), None);
        assert_eq!(operator_name("+COPS: 0,0,\"3\""), None);
    }

    #[test]
    fn operator_rejected() {
        let mut handler = OperatorResponse::default();
        let outcome = run(
            &mut handler,
            &[Line::Plain("+COPS: 0"), Line::Final(ResultCode::Error)],
        );
        assert_eq!(outcome, Outcome::Complete(Completion::Rejected));
        assert_eq!(handler.finish(), Err(Error::DecodeFailure));
    }
}
