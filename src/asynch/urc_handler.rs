use crate::command::Urc;

use super::state::State;

/// Applies URCs to the shared [`State`]. Runs on the receive path, before the
/// URC is published to subscribers.
pub struct UrcHandler<'a> {
    state: &'a State,
}

impl<'a> UrcHandler<'a> {
    pub fn new(state: &'a State) -> Self {
        Self { state }
    }

    pub fn handle_urc(&self, event: &Urc) {
        match event {
            Urc::NetworkRegistration(stat) => {
                self.state
                    .update_registration_with(|registration| registration.set_status(*stat));
            }
            Urc::Functionality(functionality) => {
                debug!("Functionality {:?}", functionality);
                self.state.set_functionality(*functionality);
            }
            Urc::NetworkTime(Some(time)) => self.state.set_network_time(*time),
            Urc::NetworkTime(None) => warn!("Network time reported without a valid date"),
            Urc::PdpDeactivated => warn!("PDP context deactivated"),
            Urc::ConnectionClosed => warn!("Connection closed"),
            Urc::SocketStatus { id, status } => debug!("Connection {}: {}", id, status.as_str()),
            Urc::UnderVoltage => warn!("Supply under voltage"),
            Urc::OverVoltage => warn!("Supply over voltage"),
            Urc::Ready => info!("Module ready"),
            Urc::CallReady => info!("Call ready"),
            Urc::SmsReady => info!("SMS ready"),
            Urc::Notice(text) => debug!("URC: {}", text.as_str()),
        }
    }
}
