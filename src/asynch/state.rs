use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::command::mobile_control::types::{Functionality, Timestamp};
use crate::registration::RegistrationState;

/// Module status learnt from URCs and registration polls, shared between the
/// receive path and the modem handle.
pub struct State {
    shared: Mutex<CriticalSectionRawMutex, RefCell<Shared>>,
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl State {
    pub const fn new() -> Self {
        Self {
            shared: Mutex::new(RefCell::new(Shared {
                registration: RegistrationState::new(),
                functionality: None,
                network_time: None,
            })),
        }
    }

    pub fn update_registration_with(&self, f: impl FnOnce(&mut RegistrationState)) {
        self.shared.lock(|s| {
            let s = &mut *s.borrow_mut();
            let was_registered = s.registration.registered();
            f(&mut s.registration);
            if was_registered != s.registration.registered() {
                info!(
                    "Registration status changed! Registered: {:?}",
                    s.registration.registered()
                );
            }
        })
    }

    pub fn registration(&self) -> RegistrationState {
        self.shared.lock(|s| s.borrow().registration.clone())
    }

    pub fn set_functionality(&self, functionality: Functionality) {
        self.shared.lock(|s| {
            s.borrow_mut().functionality.replace(functionality);
        })
    }

    pub fn functionality(&self) -> Option<Functionality> {
        self.shared.lock(|s| s.borrow().functionality)
    }

    pub fn set_network_time(&self, time: Timestamp) {
        self.shared.lock(|s| {
            s.borrow_mut().network_time.replace(time);
        })
    }

    /// Last network time reported through `*PSUTTZ`
    pub fn network_time(&self) -> Option<Timestamp> {
        self.shared.lock(|s| s.borrow().network_time)
    }
}

struct Shared {
    registration: RegistrationState,
    functionality: Option<Functionality>,
    network_time: Option<Timestamp>,
}
