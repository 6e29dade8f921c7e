//! Line classification
//!
//! Every line received from the module is exactly one of: an unsolicited
//! result code, a final result code terminating the command in flight, or a
//! plain intermediate line belonging to that command.

use super::urc::{self, UrcParser, UrcTable};

/// Final result codes, spelled byte for byte as the module sends them.
pub const OK: &str = "OK";
pub const ERROR: &str = "ERROR";
pub const CME_ERROR: &str = "+CME ERROR";
pub const CMS_ERROR: &str = "+CMS ERROR";
pub const CONNECT: &str = "CONNECT";
pub const NO_CARRIER: &str = "NO CARRIER";
/// Matched anywhere in the line, SIM800 sends `NORMAL POWER DOWN`
pub const POWER_DOWN: &str = "POWER DOWN";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResultCode {
    Ok,
    Error,
    Connect,
    NoCarrier,
    PowerDown,
}

#[derive(Clone, Copy)]
pub enum Classification {
    Urc(UrcParser),
    Final(ResultCode),
    Plain,
}

impl core::fmt::Debug for Classification {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Urc(_) => f.write_str("Urc"),
            Self::Final(code) => f.debug_tuple("Final").field(code).finish(),
            Self::Plain => f.write_str("Plain"),
        }
    }
}

/// Remove the trailing `\r\n` (or any run of CR / LF) from a received line.
pub fn strip_line_ending(line: &str) -> &str {
    line.trim_end_matches(|c| c == '\r' || c == '\n')
}

/// Classify a single received line.
///
/// URCs take precedence over final result codes, so a URC whose text happens
/// to contain a result code (`1, CONNECT OK`, `UNDER-VOLTAGE POWER DOWN`)
/// never terminates a command.
pub fn classify(line: &str, table: &UrcTable) -> Classification {
    let line = strip_line_ending(line);

    if urc::is_socket_status(line) {
        return Classification::Urc(urc::socket_status);
    }

    if let Some(entry) = table.find(line) {
        return Classification::Urc(entry.parser());
    }

    match result_code(line) {
        Some(code) => Classification::Final(code),
        None => Classification::Plain,
    }
}

fn result_code(line: &str) -> Option<ResultCode> {
    if line == OK {
        Some(ResultCode::Ok)
    } else if line == ERROR || line.starts_with(CME_ERROR) || line.starts_with(CMS_ERROR) {
        Some(ResultCode::Error)
    } else if is_connect(line) {
        Some(ResultCode::Connect)
    } else if line == NO_CARRIER {
        Some(ResultCode::NoCarrier)
    } else if line.contains(POWER_DOWN) {
        Some(ResultCode::PowerDown)
    } else {
        None
    }
}

/// `CONNECT` or `CONNECT <rate>`
fn is_connect(line: &str) -> bool {
    match line.strip_prefix(CONNECT) {
        Some("") => true,
        Some(rest) => rest
            .strip_prefix(' ')
            .is_some_and(|rate| !rate.is_empty() && rate.bytes().all(|b| b.is_ascii_digit())),
        None => false,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::command::urc::{Urc, UrcEntry, SIM800_URCS};

    fn kind(line: &str) -> Classification {
        classify(line, &SIM800_URCS)
    }

    #[test]
    fn final_result_codes() {
        assert!(matches!(kind("OK\r\n"), Classification::Final(ResultCode::Ok)));
        assert!(matches!(kind("ERROR\r\n"), Classification::Final(ResultCode::Error)));
        assert!(matches!(
            kind("+CME ERROR: SIM not inserted\r\n"),
            Classification::Final(ResultCode::Error)
        ));
        assert!(matches!(
            kind("+CMS ERROR: 500"),
            Classification::Final(ResultCode::Error)
        ));
        assert!(matches!(kind("CONNECT\r\n"), Classification::Final(ResultCode::Connect)));
        assert!(matches!(
            kind("CONNECT 115200\r\n"),
            Classification::Final(ResultCode::Connect)
        ));
        assert!(matches!(
            kind("NO CARRIER\r\n"),
            Classification::Final(ResultCode::NoCarrier)
        ));
        assert!(matches!(
            kind("NORMAL POWER DOWN\r\n"),
            Classification::Final(ResultCode::PowerDown)
        ));
    }

    #[test]
    fn tokens_are_case_sensitive_and_exact() {
        assert!(matches!(kind("ok\r\n"), Classification::Plain));
        assert!(matches!(kind("OKAY"), Classification::Plain));
        assert!(matches!(kind("CONNECTED"), Classification::Plain));
        assert!(matches!(kind("CONNECT "), Classification::Plain));
        assert!(matches!(kind("CONNECT 9600bps"), Classification::Plain));
        assert!(matches!(kind("+CSQ: 15,2\r\n"), Classification::Plain));
        assert!(matches!(kind("861234567890123\r\n"), Classification::Plain));
    }

    #[test]
    fn every_table_prefix_is_a_urc() {
        for entry in SIM800_URCS.entries() {
            let mut line: heapless::String<64> = heapless::String::new();
            line.push_str(entry.prefix()).unwrap();
            line.push_str("1\r\n").unwrap();
            assert!(
                matches!(kind(&line), Classification::Urc(_)),
                "{} was not classified as a URC",
                entry.prefix()
            );
        }
    }

    #[test]
    fn urc_wins_over_embedded_result_code() {
        assert!(matches!(
            kind("UNDER-VOLTAGE POWER DOWN\r\n"),
            Classification::Urc(_)
        ));
        assert!(matches!(kind("0, CONNECT OK\r\n"), Classification::Urc(_)));
        assert!(matches!(kind("3, CLOSED\r\n"), Classification::Urc(_)));
    }

    #[test]
    fn tcp_status_is_not_a_dial_result() {
        assert!(matches!(kind("CONNECT OK\r\n"), Classification::Urc(_)));
        assert!(matches!(kind("CONNECT FAIL\r\n"), Classification::Urc(_)));
        assert!(matches!(kind("ALREADY CONNECT\r\n"), Classification::Urc(_)));
        assert!(matches!(
            kind("CONNECT 9600\r\n"),
            Classification::Final(ResultCode::Connect)
        ));
    }

    #[test]
    fn socket_status_is_positional() {
        // Only ids 0..=5 followed by ", "
        assert!(matches!(kind("6, CONNECT OK"), Classification::Plain));
        assert!(matches!(kind("1,CLOSED"), Classification::Plain));
        assert!(matches!(kind("12, CLOSED"), Classification::Plain));
        match kind("2, SEND OK\r\n") {
            Classification::Urc(parse) => match parse("2, SEND OK") {
                Urc::SocketStatus { id, status } => {
                    assert_eq!(id, 2);
                    assert_eq!(status.as_str(), "SEND OK");
                }
                other => panic!("unexpected {:?}", other),
            },
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn registration_read_response_is_not_a_urc() {
        assert!(matches!(kind("+CREG: 1\r\n"), Classification::Urc(_)));
        assert!(matches!(
            kind("+CREG: 5,\"1A2B\",\"0C3D\"\r\n"),
            Classification::Urc(_)
        ));
        assert!(matches!(kind("+CREG: 0,1\r\n"), Classification::Plain));
        assert!(matches!(
            kind("+CREG: 2,1,\"1A2B\",\"0C3D\"\r\n"),
            Classification::Plain
        ));
    }

    #[test]
    fn first_matching_entry_wins() {
        fn specific(_: &str) -> Urc {
            Urc::PdpDeactivated
        }
        fn general(_: &str) -> Urc {
            Urc::Ready
        }
        static ENTRIES: [UrcEntry; 2] = [
            UrcEntry::new("+CIPRXGET: 1,", specific),
            UrcEntry::new("+CIPRXGET:", general),
        ];
        let table = UrcTable::new(&ENTRIES);

        match classify("+CIPRXGET: 1,0\r\n", &table) {
            Classification::Urc(parse) => assert_eq!(parse(""), Urc::PdpDeactivated),
            other => panic!("unexpected {:?}", other),
        }
        match classify("+CIPRXGET: 2,0,10\r\n", &table) {
            Classification::Urc(parse) => assert_eq!(parse(""), Urc::Ready),
            other => panic!("unexpected {:?}", other),
        }
    }
}
