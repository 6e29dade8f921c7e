//! ### 3.2 - General commands
//!
//! Identification queries answered by a single bare text line followed by
//! `OK`.
pub mod responses;

/// 3.2.4 Request TA model identification +CGMM
pub const MODEL_ID: &str = "+CGMM";

/// 3.2.5 Request product serial number identification +CGSN, the IMEI
pub const IMEI: &str = "+CGSN";

/// 3.2.7 Request international mobile subscriber identity +CIMI
pub const IMSI: &str = "+CIMI";
