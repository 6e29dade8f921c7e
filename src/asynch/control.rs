use embassy_time::Duration;
use embedded_io_async::Write;
use heapless::String;
use serde::Serialize;

use crate::command::call_control::{DialResponse, EscapeResponse, DIAL_PPP, ESCAPE};
use crate::command::general::responses::IDENTITY_LEN;
use crate::command::mobile_control::responses::{
    BatteryResponse, BatteryStatus, ClockResponse, PowerDownResponse,
};
use crate::command::mobile_control::types::{Functionality, Timestamp};
use crate::command::mobile_control::{BATTERY_CHARGE, CLOCK, POWER_DOWN};
use crate::command::network_service::responses::{
    NetworkRegistration, OperatorResponse, RegistrationResponse, SignalQuality,
    SignalQualityResponse, OPERATOR_LEN,
};
use crate::command::network_service::{NETWORK_REGISTRATION, OPERATOR_SELECTION, SIGNAL_QUALITY};
use crate::command::GenericResponse;
use crate::config::{ModemConfig, Sim800};
use crate::error::Error;
use crate::registration::RegistrationState;

use super::router::UrcSubscription;
use super::session::AtClient;

pub const IMEI_LEN: usize = 15;
pub const IMSI_LEN: usize = 15;

/// What the serial link currently carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// AT commands
    Command,
    /// PPP, after a successful `ATD*99#`
    Data,
}

/// Identification read during bring-up
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Identity {
    /// Model identification, `+CGMM`
    pub name: String<IDENTITY_LEN>,
    pub imei: String<IMEI_LEN>,
    pub imsi: String<IMSI_LEN>,
    pub operator: String<OPERATOR_LEN>,
}

/// Handle to a SIM800 module that completed bring-up.
///
/// Obtained from [`Modem::sync_and_initialize`].
pub struct Modem<'a, W: Write, C: ModemConfig = Sim800> {
    at: AtClient<'a, W>,
    mode: Mode,
    powered_down: bool,
    identity: Identity,
    config: C,
}

impl<'a, W: Write, C: ModemConfig> Modem<'a, W, C> {
    pub(crate) fn new(at: AtClient<'a, W>, identity: Identity, config: C) -> Self {
        Self {
            at,
            mode: Mode::Command,
            powered_down: false,
            identity,
            config,
        }
    }

    fn ensure_ready(&self) -> Result<(), Error> {
        if self.powered_down || self.mode == Mode::Data {
            return Err(Error::NotReady);
        }
        Ok(())
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_powered_down(&self) -> bool {
        self.powered_down
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    /// Registration status as last reported by a URC or poll
    pub fn registration(&self) -> RegistrationState {
        self.at.router().state().registration()
    }

    pub fn network_time(&self) -> Option<Timestamp> {
        self.at.router().state().network_time()
    }

    pub fn functionality(&self) -> Option<Functionality> {
        self.at.router().state().functionality()
    }

    pub fn subscribe(&self) -> Result<UrcSubscription<'a>, Error> {
        self.at.router().subscribe()
    }

    /// Send `AT<text>` and wait for `OK`. A zero `timeout` selects the
    /// configured command timeout.
    ///
    /// Useful for configuration the driver does not cover, but settings that
    /// interfere with the driver's own may break it.
    pub async fn run_at_command(&mut self, text: &str, timeout: Duration) -> Result<(), Error> {
        self.ensure_ready()?;
        self.at.send_at(text, GenericResponse, timeout).await
    }

    /// Send `text` followed by CR LF and Ctrl-Z, e.g. to complete an SMS, and
    /// wait for `OK`.
    pub async fn send_raw_line(&mut self, text: &str, timeout: Duration) -> Result<(), Error> {
        self.ensure_ready()?;
        self.at.send_raw(text, GenericResponse, timeout).await
    }

    pub async fn get_signal_quality(&mut self) -> Result<SignalQuality, Error> {
        self.ensure_ready()?;
        self.at
            .send_at(
                SIGNAL_QUALITY,
                SignalQualityResponse::default(),
                self.config.command_timeout(),
            )
            .await
    }

    pub async fn get_battery_status(&mut self) -> Result<BatteryStatus, Error> {
        self.ensure_ready()?;
        self.at
            .send_at(
                BATTERY_CHARGE,
                BatteryResponse::default(),
                self.config.command_timeout(),
            )
            .await
    }

    /// Poll `+CREG?`. The result also updates [`Modem::registration`].
    pub async fn get_network_registration(&mut self) -> Result<NetworkRegistration, Error> {
        self.ensure_ready()?;
        poll_registration(&mut self.at, &self.config).await
    }

    pub async fn get_operator_name(&mut self) -> Result<String<OPERATOR_LEN>, Error> {
        self.ensure_ready()?;
        self.at
            .send_at(
                OPERATOR_SELECTION,
                OperatorResponse::default(),
                self.config.operator_timeout(),
            )
            .await
    }

    /// Module clock as a Unix timestamp. Fails with
    /// [`Error::DecodeFailure`] while the module has no time estimate.
    pub async fn get_clock(&mut self) -> Result<Timestamp, Error> {
        self.ensure_ready()?;
        self.at
            .send_at(CLOCK, ClockResponse::default(), self.config.command_timeout())
            .await
    }

    /// Switch between command and data mode.
    ///
    /// Data mode is entered by dialling `*99#` and only from command mode.
    /// The `+++` escape back to command mode is accepted from either mode. On
    /// failure the mode is left unchanged.
    pub async fn set_mode(&mut self, mode: Mode) -> Result<(), Error> {
        if self.powered_down {
            return Err(Error::NotReady);
        }

        match mode {
            Mode::Command => {
                self.at
                    .execute(ESCAPE, EscapeResponse, self.config.escape_timeout())
                    .await?;
            }
            Mode::Data => {
                if self.mode != Mode::Command {
                    return Err(Error::NotReady);
                }
                self.at
                    .send_at(DIAL_PPP, DialResponse, self.config.dial_timeout())
                    .await?;
            }
        }

        if self.mode != mode {
            info!("Mode {:?} -> {:?}", self.mode, mode);
        }
        self.mode = mode;
        Ok(())
    }

    /// Normal power down with `+CPOWD=1`. Every later operation fails with
    /// [`Error::NotReady`].
    pub async fn power_down(&mut self) -> Result<(), Error> {
        self.ensure_ready()?;
        self.at
            .send_at(
                POWER_DOWN,
                PowerDownResponse,
                self.config.power_down_timeout(),
            )
            .await?;
        info!("Powered down");
        self.powered_down = true;
        Ok(())
    }

    /// Give the writer back, typically after [`Modem::power_down`].
    pub fn release(self) -> W {
        self.at.release()
    }
}

pub(crate) async fn poll_registration<W: Write, C: ModemConfig>(
    at: &mut AtClient<'_, W>,
    config: &C,
) -> Result<NetworkRegistration, Error> {
    let registration = at
        .send_at(
            NETWORK_REGISTRATION,
            RegistrationResponse::default(),
            config.command_timeout(),
        )
        .await?;
    at.router()
        .state()
        .update_registration_with(|state| state.set_status(registration.stat));
    Ok(registration)
}
