use embassy_time::{Duration, Instant};
use serde::Serialize;

/// Circuit switched registration status as last reported by the module,
/// either through a `+CREG` URC or a `+CREG?` poll.
#[derive(Debug, Clone, Default)]
pub struct RegistrationState {
    status: Status,
    updated: Option<Instant>,
    started: Option<Instant>,
}

impl RegistrationState {
    pub const fn new() -> Self {
        Self {
            status: Status::None,
            updated: None,
            started: None,
        }
    }

    /// Time spent in the current status
    pub fn duration(&self, ts: Instant) -> Duration {
        self.started
            .and_then(|started| ts.checked_duration_since(started))
            .unwrap_or_else(|| Duration::from_millis(0))
    }

    pub fn started(&self) -> Option<Instant> {
        self.started
    }

    pub fn updated(&self) -> Option<Instant> {
        self.updated
    }

    pub fn reset(&mut self) {
        self.status = Status::None;
        self.updated = None;
        self.started = None;
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn set_status(&mut self, stat: Status) {
        let ts = Instant::now();
        if self.status != stat {
            self.status = stat;
            self.started = Some(ts);
        }
        self.updated = Some(ts);
    }

    pub fn registered(&self) -> bool {
        self.status.registered()
    }
}

/// `<stat>` of `+CREG`
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    #[default]
    None,
    NotRegistering,
    Home,
    Searching,
    Denied,
    OutOfCoverage,
    Roaming,
}

impl Status {
    pub fn registered(&self) -> bool {
        matches!(self, Self::Home | Self::Roaming)
    }
}

impl From<u8> for Status {
    fn from(v: u8) -> Self {
        match v {
            0 => Self::NotRegistering,
            1 => Self::Home,
            2 => Self::Searching,
            3 => Self::Denied,
            4 => Self::OutOfCoverage,
            5 => Self::Roaming,
            _ => Self::None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn registered_statuses() {
        assert!(Status::from(1).registered());
        assert!(Status::from(5).registered());
        for stat in [0, 2, 3, 4, 6, 99] {
            assert!(!Status::from(stat).registered(), "stat {}", stat);
        }
    }

    #[test]
    fn status_change_restarts_duration() {
        let mut state = RegistrationState::new();
        assert_eq!(state.status(), Status::None);
        assert_eq!(state.duration(Instant::now()), Duration::from_millis(0));

        state.set_status(Status::Searching);
        let started = state.started();
        assert!(started.is_some());

        // Same status only refreshes the update time
        state.set_status(Status::Searching);
        assert_eq!(state.started(), started);

        state.set_status(Status::Home);
        assert!(state.registered());
        assert!(state.started() >= started);

        state.reset();
        assert!(!state.registered());
        assert_eq!(state.updated(), None);
    }
}
