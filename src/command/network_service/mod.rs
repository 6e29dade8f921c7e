//! ### 3.2 - Network service
pub mod responses;
pub mod types;

/// 3.2.21 Signal quality report +CSQ
///
/// Returns the received signal strength indication <rssi> and the channel bit
/// error rate <ber>.
pub const SIGNAL_QUALITY: &str = "+CSQ";

/// 3.2.32 Network registration +CREG, read command
///
/// Returns the URC presentation mode <n> together with the current
/// registration status <stat>. With <n>=2 the location fields follow and are
/// ignored.
pub const NETWORK_REGISTRATION: &str = "+CREG?";

/// 3.2.20 Operator selection +COPS, read command
///
/// Returns `+COPS: <mode>[,<format>,<oper>]`. May take a long time while the
/// module is scanning.
pub const OPERATOR_SELECTION: &str = "+COPS?";
