use embassy_time::{with_timeout, Duration};
use embedded_io_async::Write;

use crate::command::{at_frame, raw_frame, Completion, Decoder, Handler};
use crate::error::Error;

use super::router::{Router, SessionState};

/// A command session installed in the router. Dropping it before
/// [`ActiveSession::end`], e.g. when the command future is cancelled, still
/// reinstalls the default handler.
struct ActiveSession<'a> {
    router: &'a Router,
    open: bool,
}

impl<'a> ActiveSession<'a> {
    fn begin(router: &'a Router, handler: Handler) -> Result<Self, Error> {
        router.begin(handler)?;
        Ok(Self { router, open: true })
    }

    fn end(mut self) -> (Handler, SessionState) {
        self.open = false;
        self.router.end()
    }
}

impl Drop for ActiveSession<'_> {
    fn drop(&mut self) {
        if self.open {
            let (handler, _) = self.router.end();
            warn!("Command cancelled, {} handler discarded", handler.name());
        }
    }
}

/// Sends one command at a time and waits for its handler to complete.
pub struct AtClient<'a, W: Write> {
    router: &'a Router,
    writer: W,
    default_timeout: Duration,
}

impl<'a, W: Write> AtClient<'a, W> {
    pub fn new(router: &'a Router, writer: W, default_timeout: Duration) -> Self {
        Self {
            router,
            writer,
            default_timeout,
        }
    }

    pub fn router(&self) -> &'a Router {
        self.router
    }

    /// Hand back the writer.
    pub fn release(self) -> W {
        self.writer
    }

    /// Send `AT<text>\r` and decode the response with `decoder`.
    pub async fn send_at<D: Decoder>(
        &mut self,
        text: &str,
        decoder: D,
        timeout: Duration,
    ) -> Result<D::Output, Error> {
        let frame = at_frame(text)?;
        self.execute(&frame, decoder, timeout).await
    }

    /// Send `<text>\r\n\x1A` and decode the response with `decoder`.
    pub async fn send_raw<D: Decoder>(
        &mut self,
        text: &str,
        decoder: D,
        timeout: Duration,
    ) -> Result<D::Output, Error> {
        let frame = raw_frame(text)?;
        self.execute(&frame, decoder, timeout).await
    }

    /// Run a complete command session for an already framed command.
    ///
    /// A zero `timeout` selects the default timeout. Whatever the outcome, the
    /// default handler is installed again when this returns.
    pub async fn execute<D: Decoder>(
        &mut self,
        frame: &str,
        decoder: D,
        timeout: Duration,
    ) -> Result<D::Output, Error> {
        let timeout = if timeout.as_ticks() == 0 {
            self.default_timeout
        } else {
            timeout
        };

        let session = ActiveSession::begin(self.router, decoder.into())?;

        let written = self.write_frame(frame).await;
        if written.is_ok() && with_timeout(timeout, self.router.wait()).await.is_err() {
            debug!("No completion within {} ms", timeout.as_millis());
        }

        // The completion is read from the router under its lock, so a final
        // line racing the timeout is either seen here or handled by the
        // default handler, never both.
        let (handler, state) = session.end();
        written?;

        match state {
            SessionState::Done(Completion::Success) => D::try_from(handler)
                .map_err(|_| Error::DecodeFailure)?
                .finish(),
            SessionState::Done(Completion::Rejected) => Err(Error::Rejected),
            SessionState::Pending | SessionState::Idle => {
                warn!("Command timed out: {}", frame.trim_end());
                Err(Error::Timeout)
            }
        }
    }

    async fn write_frame(&mut self, frame: &str) -> Result<(), Error> {
        trace!("-> {}", frame.trim_end());
        self.writer
            .write_all(frame.as_bytes())
            .await
            .map_err(|_| Error::Transport)?;
        self.writer.flush().await.map_err(|_| Error::Transport)
    }
}
