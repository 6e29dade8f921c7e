use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::pubsub::{PubSubChannel, Subscriber};
use embassy_sync::signal::Signal;

use crate::command::classify::strip_line_ending;
use crate::command::{
    classify, Classification, Completion, DefaultHandler, Handler, Line, LineHandler, Outcome,
    Urc, UrcTable,
};
use crate::error::Error;

use super::state::State;
use super::urc_handler::UrcHandler;

pub const URC_CAPACITY: usize = 4;
pub const URC_SUBSCRIBERS: usize = 2;

pub type UrcSubscription<'a> =
    Subscriber<'a, CriticalSectionRawMutex, Urc, URC_CAPACITY, URC_SUBSCRIBERS, 1>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionState {
    /// The default handler is installed
    Idle,
    /// A command is in flight and its handler is installed
    Pending,
    /// The command handler reported a terminal outcome, the session has not
    /// collected it yet
    Done(Completion),
}

/// Where a routed line ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dispatch {
    Urc,
    Session,
    Default,
    Dropped,
}

struct Slot {
    handler: Handler,
    session: SessionState,
}

/// Routes every received line to exactly one handler.
///
/// Lines can be fed from any context, e.g. a UART interrupt or a dedicated
/// reader task, while a [`Modem`](super::control::Modem) awaits responses.
pub struct Router {
    table: UrcTable,
    slot: Mutex<CriticalSectionRawMutex, RefCell<Slot>>,
    completion: Signal<CriticalSectionRawMutex, Completion>,
    state: State,
    urc_channel: PubSubChannel<CriticalSectionRawMutex, Urc, URC_CAPACITY, URC_SUBSCRIBERS, 1>,
}

impl Router {
    pub const fn new(table: UrcTable) -> Self {
        Self {
            table,
            slot: Mutex::new(RefCell::new(Slot {
                handler: Handler::Default(DefaultHandler),
                session: SessionState::Idle,
            })),
            completion: Signal::new(),
            state: State::new(),
            urc_channel: PubSubChannel::new(),
        }
    }

    /// Route a single received line, with or without its line ending.
    pub fn route(&self, line: &str) -> Dispatch {
        let line = strip_line_ending(line);
        if line.is_empty() {
            return Dispatch::Dropped;
        }
        trace!("<- {}", line);

        let line = match classify(line, &self.table) {
            Classification::Urc(parse) => {
                self.handle_urc(parse(line));
                return Dispatch::Urc;
            }
            Classification::Final(code) => Line::Final(code),
            Classification::Plain => Line::Plain(line),
        };

        self.slot.lock(|slot| {
            let slot = &mut *slot.borrow_mut();
            match slot.session {
                SessionState::Pending => {
                    if let Outcome::Complete(completion) = slot.handler.handle(line) {
                        slot.session = SessionState::Done(completion);
                        self.completion.signal(completion);
                    }
                    Dispatch::Session
                }
                SessionState::Done(_) => {
                    debug!("Dropping {:?}, command already completed", line);
                    Dispatch::Dropped
                }
                SessionState::Idle => {
                    slot.handler.handle(line);
                    Dispatch::Default
                }
            }
        })
    }

    fn handle_urc(&self, urc: Urc) {
        UrcHandler::new(&self.state).handle_urc(&urc);
        self.urc_channel.immediate_publisher().publish_immediate(urc);
    }

    /// Install the handler of a new command session.
    pub(crate) fn begin(&self, handler: Handler) -> Result<(), Error> {
        self.slot.lock(|slot| {
            let slot = &mut *slot.borrow_mut();
            if slot.session != SessionState::Idle {
                return Err(Error::Busy);
            }
            debug!("Session start: {}", handler.name());
            slot.handler = handler;
            slot.session = SessionState::Pending;
            self.completion.reset();
            Ok(())
        })
    }

    /// Wait until the active session's handler reports a terminal outcome.
    pub(crate) async fn wait(&self) -> Completion {
        self.completion.wait().await
    }

    /// Take back the session's handler together with its final state and
    /// reinstall the default handler.
    pub(crate) fn end(&self) -> (Handler, SessionState) {
        self.slot.lock(|slot| {
            let slot = &mut *slot.borrow_mut();
            let handler = core::mem::take(&mut slot.handler);
            let session = core::mem::replace(&mut slot.session, SessionState::Idle);
            debug!("Session end: {} {:?}", handler.name(), session);
            (handler, session)
        })
    }

    pub fn session_state(&self) -> SessionState {
        self.slot.lock(|slot| slot.borrow().session)
    }

    /// Name of the installed handler
    pub fn active_handler(&self) -> &'static str {
        self.slot.lock(|slot| slot.borrow().handler.name())
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn subscribe(&self) -> Result<UrcSubscription<'_>, Error> {
        Ok(self.urc_channel.subscriber()?)
    }
}
