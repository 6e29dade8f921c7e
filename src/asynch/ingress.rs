use embedded_io_async::Read;
use heapless::Vec;

use crate::error::Error;

use super::router::Router;

pub const LINE_CAPACITY: usize = 128;
const READ_CHUNK: usize = 64;

/// Splits the received byte stream into CR / LF terminated lines and routes
/// each of them.
///
/// Only feed it while the module is in command mode. In data mode the link
/// carries PPP frames.
pub struct Ingress<'a, const N: usize = LINE_CAPACITY> {
    router: &'a Router,
    line: Vec<u8, N>,
    overflowed: bool,
}

impl<'a, const N: usize> Ingress<'a, N> {
    pub fn new(router: &'a Router) -> Self {
        Self {
            router,
            line: Vec::new(),
            overflowed: false,
        }
    }

    pub fn write(&mut self, data: &[u8]) {
        for &byte in data {
            match byte {
                b'\r' | b'\n' => self.end_line(),
                _ if self.overflowed => {}
                _ => {
                    if self.line.push(byte).is_err() {
                        warn!("Line longer than {} bytes, dropped", N);
                        self.overflowed = true;
                    }
                }
            }
        }
    }

    fn end_line(&mut self) {
        if !self.overflowed && !self.line.is_empty() {
            match core::str::from_utf8(&self.line) {
                Ok(line) => {
                    self.router.route(line);
                }
                Err(_) => warn!("Dropping line that is not valid UTF-8"),
            }
        }
        self.line.clear();
        self.overflowed = false;
    }

    /// Pump `reader` into the router until it reports end of stream.
    pub async fn read_from<R: Read>(&mut self, mut reader: R) -> Result<(), Error> {
        let mut chunk = [0; READ_CHUNK];
        loop {
            match reader.read(&mut chunk).await {
                Ok(0) => return Ok(()),
                Ok(n) => self.write(&chunk[..n]),
                Err(_) => return Err(Error::Transport),
            }
        }
    }
}
