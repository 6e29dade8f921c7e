//! Unsolicited result codes
//!
//! URCs are recognised by prefix against an ordered [`UrcTable`]. Order
//! matters: when two prefixes overlap the more specific entry has to be
//! declared first, as the first match wins.

use atat::atat_derive::AtatResp;
use heapless::String;

use super::mobile_control::types::{Functionality, Timestamp};
use crate::registration::Status;

/// Maximum stored length of a URC that is only reported, not decoded
pub const URC_TEXT_LEN: usize = 64;
pub const SOCKET_STATUS_LEN: usize = 24;
/// Highest connection id reported by `AT+CIPMUX=1` status lines
pub const MAX_SOCKET_ID: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Urc {
    /// `+CFUN: <fun>`
    Functionality(Functionality),
    /// `+CREG: <stat>[,<lac>,<ci>]`, sent when `AT+CREG=1` or `AT+CREG=2` is
    /// active
    NetworkRegistration(Status),
    /// `*PSUTTZ`, network time after `AT+CLTS=1`. `None` when the network
    /// reported a time before the module could have an estimate.
    NetworkTime(Option<Timestamp>),
    /// `<id>, <status>` with `AT+CIPMUX=1`
    SocketStatus {
        id: u8,
        status: String<SOCKET_STATUS_LEN>,
    },
    /// `CLOSED` with `AT+CIPMUX=0`
    ConnectionClosed,
    /// `+PDP: DEACT` or `+SAPBR 1: DEACT`
    PdpDeactivated,
    /// `RDY`, the module finished booting at a fixed baud rate
    Ready,
    CallReady,
    SmsReady,
    UnderVoltage,
    OverVoltage,
    /// Any other URC the table knows about, kept as text
    Notice(String<URC_TEXT_LEN>),
}

pub type UrcParser = fn(&str) -> Urc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Any,
    /// One leading field, optionally followed by quoted fields only. The read
    /// response sharing the prefix carries an unquoted second field.
    Report,
}

#[derive(Clone, Copy)]
pub struct UrcEntry {
    prefix: &'static str,
    shape: Shape,
    parser: UrcParser,
}

impl UrcEntry {
    pub const fn new(prefix: &'static str, parser: UrcParser) -> Self {
        Self {
            prefix,
            shape: Shape::Any,
            parser,
        }
    }

    pub const fn report(prefix: &'static str, parser: UrcParser) -> Self {
        Self {
            prefix,
            shape: Shape::Report,
            parser,
        }
    }

    pub fn prefix(&self) -> &'static str {
        self.prefix
    }

    pub fn parser(&self) -> UrcParser {
        self.parser
    }

    pub fn matches(&self, line: &str) -> bool {
        match line.strip_prefix(self.prefix) {
            Some(rest) => match self.shape {
                Shape::Any => true,
                Shape::Report => rest
                    .split(',')
                    .nth(1)
                    .map_or(true, |field| field.trim_start().starts_with('"')),
            },
            None => false,
        }
    }
}

#[derive(Clone, Copy)]
pub struct UrcTable {
    entries: &'static [UrcEntry],
}

impl UrcTable {
    pub const fn new(entries: &'static [UrcEntry]) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &'static [UrcEntry] {
        self.entries
    }

    /// First entry matching `line`, in declaration order
    pub fn find(&self, line: &str) -> Option<&'static UrcEntry> {
        self.entries.iter().find(|entry| entry.matches(line))
    }
}

// `CONNECT [<rate>]` and `NORMAL POWER DOWN` are final result codes of
// `ATD*99#` and `AT+CPOWD=1`, so they must not be listed here. The TCP status
// lines of `AT+CIPMUX=0` share the `CONNECT` prefix and are.
const SIM800_URC_ENTRIES: [UrcEntry; 24] = [
    UrcEntry::new("CONNECT OK", notice),
    UrcEntry::new("CONNECT FAIL", notice),
    UrcEntry::new("ALREADY CONNECT", notice),
    UrcEntry::new("+CFUN: ", functionality),
    UrcEntry::report("+CREG: ", registration),
    UrcEntry::new("*PSUTTZ: ", network_time),
    UrcEntry::new("+CTZV: ", notice),
    UrcEntry::new("DST: ", notice),
    UrcEntry::new("+CIEV: ", notice),
    UrcEntry::new("+CIPRXGET: 1,", notice),
    UrcEntry::new("+FTPGET: 1,", notice),
    UrcEntry::new("+PDP: DEACT", pdp_deactivated),
    UrcEntry::new("+SAPBR 1: DEACT", pdp_deactivated),
    UrcEntry::new("*PSNWID: ", notice),
    UrcEntry::new("+CGREG: ", notice),
    UrcEntry::new("CLOSED", connection_closed),
    UrcEntry::new("RDY", ready),
    UrcEntry::new("+CSSI:", notice),
    UrcEntry::new("+CSSU:", notice),
    UrcEntry::new("+CSQN:", notice),
    UrcEntry::new("Call Ready", call_ready),
    UrcEntry::new("SMS Ready", sms_ready),
    UrcEntry::new("UNDER-VOLTAGE", under_voltage),
    UrcEntry::new("OVER-VOLTAGE", over_voltage),
];

/// URC table of the SIM800 family
pub const SIM800_URCS: UrcTable = UrcTable::new(&SIM800_URC_ENTRIES);

/// `<digit>, <STATUS>` connection status lines carry no prefix and are
/// recognised by position.
pub fn is_socket_status(line: &str) -> bool {
    match line.as_bytes() {
        [id, b',', b' ', ..] => id.is_ascii_digit() && id - b'0' <= MAX_SOCKET_ID,
        _ => false,
    }
}

pub fn socket_status(line: &str) -> Urc {
    let id = line.as_bytes().first().map(|b| b.wrapping_sub(b'0')).unwrap_or_default();
    Urc::SocketStatus {
        id,
        status: crate::command::truncated(line.get(3..).unwrap_or_default()),
    }
}

fn notice(line: &str) -> Urc {
    Urc::Notice(crate::command::truncated(line))
}

#[derive(Debug, Clone, PartialEq, Eq, AtatResp)]
struct FunctionalityReport {
    #[at_arg(position = 0)]
    fun: u8,
}

fn functionality(line: &str) -> Urc {
    match crate::command::decode_response::<FunctionalityReport>(line) {
        Some(report) => Urc::Functionality(Functionality::from(report.fun)),
        None => notice(line),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, AtatResp)]
#[allow(dead_code)]
struct RegistrationReport {
    #[at_arg(position = 0)]
    stat: u8,
    #[at_arg(position = 1)]
    lac: Option<String<8>>,
    #[at_arg(position = 2)]
    ci: Option<String<8>>,
}

fn registration(line: &str) -> Urc {
    match crate::command::decode_response::<RegistrationReport>(line) {
        Some(report) => Urc::NetworkRegistration(Status::from(report.stat)),
        None => notice(line),
    }
}

/// `*PSUTTZ: <year>,<month>,<day>,<hour>,<min>,<sec>,"<tz>",<dst>`
fn network_time(line: &str) -> Urc {
    let time = crate::command::numeric_fields::<u16, 6>(line, "*PSUTTZ:").and_then(
        |[year, month, day, hour, minute, second]| {
            super::mobile_control::types::unix_timestamp(year, month, day, hour, minute, second)
        },
    );
    Urc::NetworkTime(time)
}

fn pdp_deactivated(_: &str) -> Urc {
    Urc::PdpDeactivated
}

fn connection_closed(_: &str) -> Urc {
    Urc::ConnectionClosed
}

fn ready(_: &str) -> Urc {
    Urc::Ready
}

fn call_ready(_: &str) -> Urc {
    Urc::CallReady
}

fn sms_ready(_: &str) -> Urc {
    Urc::SmsReady
}

fn under_voltage(_: &str) -> Urc {
    Urc::UnderVoltage
}

fn over_voltage(_: &str) -> Urc {
    Urc::OverVoltage
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(line: &str) -> Urc {
        let entry = SIM800_URCS.find(line).expect("no matching entry");
        (entry.parser())(line)
    }

    #[test]
    fn decodes_typed_urcs() {
        assert_eq!(parse("+CFUN: 1"), Urc::Functionality(Functionality::Full));
        assert_eq!(parse("+CFUN: 4"), Urc::Functionality(Functionality::DisableRf));
        assert_eq!(parse("+CREG: 5"), Urc::NetworkRegistration(Status::Roaming));
        assert_eq!(
            parse("+CREG: 1,\"1A2B\",\"0C3D\""),
            Urc::NetworkRegistration(Status::Home)
        );
        assert_eq!(parse("+PDP: DEACT"), Urc::PdpDeactivated);
        assert_eq!(parse("+SAPBR 1: DEACT"), Urc::PdpDeactivated);
        assert_eq!(parse("Call Ready"), Urc::CallReady);
        assert_eq!(parse("UNDER-VOLTAGE WARNNING"), Urc::UnderVoltage);
    }

    #[test]
    fn network_time_from_psuttz() {
        assert_eq!(
            parse("*PSUTTZ: 23,6,15,12,30,45,\"+8\",0"),
            Urc::NetworkTime(Some(1_686_832_245))
        );
        // Four digit years are reported by newer firmware
        assert_eq!(
            parse("*PSUTTZ: 2019,11,26,14,28,36,\"+4\",0"),
            Urc::NetworkTime(Some(1_574_778_516))
        );
        assert_eq!(
            parse("*PSUTTZ: 4,1,1,0,0,12,\"+0\",0"),
            Urc::NetworkTime(None)
        );
    }

    #[test]
    fn unknown_payload_is_kept_as_notice() {
        match parse("+CIEV: 10,\"23802\",\"Example\",\"\", 0, 0") {
            Urc::Notice(text) => assert!(text.starts_with("+CIEV: 10")),
            other => panic!("unexpected {:?}", other),
        }
        match parse("+CFUN: x") {
            Urc::Notice(text) => assert_eq!(text.as_str(), "+CFUN: x"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn report_shape() {
        let entry = UrcEntry::report("+CREG: ", registration);
        assert!(entry.matches("+CREG: 2"));
        assert!(entry.matches("+CREG: 1,\"1A2B\",\"0C3D\""));
        assert!(!entry.matches("+CREG: 1,5"));
        assert!(!entry.matches("+CREG: 2,1,\"1A2B\",\"0C3D\""));
        assert!(!entry.matches("+CGREG: 2"));
    }

    #[test]
    fn tcp_status_lines_are_notices() {
        for line in ["CONNECT OK", "CONNECT FAIL", "ALREADY CONNECT"] {
            match parse(line) {
                Urc::Notice(text) => assert_eq!(text.as_str(), line),
                other => panic!("unexpected {:?}", other),
            }
        }
    }
}
