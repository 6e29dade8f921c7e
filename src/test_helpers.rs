extern crate std;

use core::convert::Infallible;
use std::collections::VecDeque;
use std::string::String;
use std::sync::Once;
use std::vec::Vec;

use embassy_time::Duration;
use embedded_io_async::{ErrorKind, ErrorType, Write};
use env_logger::Env;

use crate::asynch::router::Router;
use crate::config::ModemConfig;

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        env_logger::Builder::from_env(Env::default().default_filter_or("info"))
            .is_test(true)
            .init();
    });
}

/// A command frame and the lines the module answers it with.
pub type Exchange = (&'static str, &'static [&'static str]);

/// Successful bring-up with the default init strings. Registration succeeds
/// on the second poll.
pub const BRING_UP: &[Exchange] = &[
    ("AT\r", &["AT", "OK"]),
    ("ATE0\r", &["ATE0", "OK"]),
    ("AT+IPR=0\r", &["OK"]),
    ("AT+CMEE=2\r", &["OK"]),
    ("AT+CMER=2,0,0,2,1\r", &["OK"]),
    ("AT+CLTS=1\r", &["OK"]),
    ("AT+IFC=0,0\r", &["OK"]),
    ("ATQ0\r", &["OK"]),
    ("AT&W\r", &["OK"]),
    ("AT+CFUN=1\r", &["OK"]),
    ("AT+CREG?\r", &["+CREG: 0,2", "OK"]),
    ("AT+CREG?\r", &["+CREG: 0,1", "OK"]),
    ("AT+CGMM\r", &["SIMCOM_SIM800L", "OK"]),
    ("AT+CGSN\r", &["861234567890123", "OK"]),
    ("AT+CIMI\r", &["240011234567890", "OK"]),
    ("AT+COPS?\r", &["+COPS: 0,0,\"Example Telecom\"", "OK"]),
];

/// Answers each flushed frame by routing canned lines through the router,
/// the way the receive path would.
pub struct ScriptedModem<'a> {
    router: &'a Router,
    script: VecDeque<Exchange>,
    pending: Vec<u8>,
    sent: Vec<String>,
}

impl<'a> ScriptedModem<'a> {
    pub fn new(router: &'a Router, script: &[Exchange]) -> Self {
        init_logger();
        Self {
            router,
            script: script.iter().copied().collect(),
            pending: Vec::new(),
            sent: Vec::new(),
        }
    }

    /// Bring-up exchanges followed by `script`
    pub fn after_bring_up(router: &'a Router, script: &[Exchange]) -> Self {
        let mut modem = Self::new(router, BRING_UP);
        modem.script.extend(script.iter().copied());
        modem
    }

    pub fn is_done(&self) -> bool {
        self.script.is_empty()
    }

    pub fn sent(&self) -> &[String] {
        &self.sent
    }
}

impl ErrorType for ScriptedModem<'_> {
    type Error = Infallible;
}

impl Write for ScriptedModem<'_> {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.pending.extend_from_slice(buf);
        Ok(buf.len())
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        let frame = String::from_utf8(core::mem::take(&mut self.pending)).unwrap();
        let (command, reply) = self
            .script
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected command {:?}", frame));
        assert_eq!(frame, command);
        self.sent.push(frame);

        for line in reply {
            self.router.route(line);
        }
        Ok(())
    }
}

/// A writer whose link is down
pub struct FailingWriter;

impl ErrorType for FailingWriter {
    type Error = ErrorKind;
}

impl Write for FailingWriter {
    async fn write(&mut self, _buf: &[u8]) -> Result<usize, Self::Error> {
        Err(ErrorKind::BrokenPipe)
    }
}

/// Short timeouts so failing tests do not stall
#[derive(Debug, Clone, Copy, Default)]
pub struct TestConfig;

impl ModemConfig for TestConfig {
    const SYNC_ATTEMPTS: u8 = 3;
    const REGISTRATION_ATTEMPTS: u8 = 3;

    fn sync_interval(&self) -> Duration {
        Duration::from_millis(1)
    }

    fn registration_interval(&self) -> Duration {
        Duration::from_millis(1)
    }

    fn command_timeout(&self) -> Duration {
        Duration::from_millis(50)
    }

    fn operator_timeout(&self) -> Duration {
        Duration::from_millis(50)
    }

    fn escape_timeout(&self) -> Duration {
        Duration::from_millis(50)
    }

    fn dial_timeout(&self) -> Duration {
        Duration::from_millis(50)
    }

    fn power_down_timeout(&self) -> Duration {
        Duration::from_millis(50)
    }
}
