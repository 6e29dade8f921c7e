//! ### 2.2 - V.25TER and 3 - GSM 07.07 control
//!
//! Each constant is the command text following `AT`.

/// 2.2.13 Set command echo mode E0
pub const ECHO_OFF: &str = "E0";

/// 2.2.29 Set fixed local rate +IPR
///
/// `0` selects autobauding. The module sends `RDY` after power on only when a
/// fixed rate is stored.
pub const FIXED_BAUD_RATE: &str = "+IPR=0";

/// 3.2.23 Report mobile equipment error +CMEE, verbose values
pub const VERBOSE_ERRORS: &str = "+CMEE=2";

/// 3.2.11 Mobile equipment event reporting +CMER
///
/// Enables `+CIEV` indicator events, used for network name and time updates.
pub const INDICATOR_REPORTING: &str = "+CMER=2,0,0,2,1";

/// 3.2.55 Get local timestamp +CLTS
///
/// Enables the `*PSUTTZ`, `+CTZV` and `DST` URCs on network time sync.
pub const LOCAL_TIMESTAMP: &str = "+CLTS=1";

/// 2.2.26 Set TE-TA local data flow control +IFC, none in either direction
pub const FLOW_CONTROL_NONE: &str = "+IFC=0,0";

/// 2.2.17 Set result code presentation mode Q0
pub const RESULT_CODES_ON: &str = "Q0";

/// 2.2.42 Store active profile to user profile &W
pub const STORE_PROFILE: &str = "&W";

/// 3.2.16 Set phone functionality +CFUN, full functionality
pub const FULL_FUNCTIONALITY: &str = "+CFUN=1";
