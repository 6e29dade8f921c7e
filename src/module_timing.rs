use embassy_time::Duration;

/// Default time to wait for the final result code of a plain AT command
pub fn command_timeout() -> Duration {
    Duration::from_millis(500)
}

/// `AT+COPS?` may block while the module scans for operators
pub fn operator_timeout() -> Duration {
    Duration::from_secs(75)
}

/// Time to wait for `OK` / `NO CARRIER` after the `+++` escape sequence
pub fn escape_timeout() -> Duration {
    Duration::from_secs(5)
}

/// Time to wait for `CONNECT` after `ATD*99#`
pub fn dial_timeout() -> Duration {
    Duration::from_secs(60)
}

/// Time to wait for `NORMAL POWER DOWN` after `AT+CPOWD=1`
pub fn power_down_timeout() -> Duration {
    Duration::from_secs(5)
}

/// Delay before each `AT` synchronization attempt
pub fn sync_interval() -> Duration {
    Duration::from_millis(500)
}

/// Delay before each `AT+CREG?` poll during bring-up
pub fn registration_interval() -> Duration {
    Duration::from_secs(2)
}
