use embassy_time::Timer;
use embedded_io_async::Write;
use heapless::String;

use crate::command::control::ECHO_OFF;
use crate::command::general::responses::{IdentityResponse, IDENTITY_LEN};
use crate::command::general::{IMEI, IMSI, MODEL_ID};
use crate::command::network_service::responses::OperatorResponse;
use crate::command::network_service::OPERATOR_SELECTION;
use crate::command::GenericResponse;
use crate::config::ModemConfig;
use crate::error::{BringUpError, Error, IdentityField};

use super::control::{poll_registration, Identity, Modem, IMEI_LEN, IMSI_LEN};
use super::router::Router;
use super::session::AtClient;

/// Transport failures abort bring-up as they are. Everything else is reported
/// as the failing stage.
fn stage_error(e: Error, stage: BringUpError) -> Error {
    match e {
        Error::Transport | Error::Busy => e,
        _ => {
            error!("Bring-up failed at {:?}: {:?}", stage, e);
            stage.into()
        }
    }
}

impl<'a, W: Write, C: ModemConfig> Modem<'a, W, C> {
    /// Synchronize with the module, apply the init strings, wait for network
    /// registration and read the module identity.
    ///
    /// Lines received from the module have to be fed to `router` while this
    /// runs.
    pub async fn sync_and_initialize(
        router: &'a Router,
        writer: W,
        config: C,
    ) -> Result<Self, Error> {
        let mut at = AtClient::new(router, writer, config.command_timeout());

        sync(&mut at, &config).await?;

        at.send_at(ECHO_OFF, GenericResponse, config.command_timeout())
            .await
            .map_err(|e| stage_error(e, BringUpError::Echo))?;

        for command in config.init_commands() {
            match at
                .send_at(command, GenericResponse, config.command_timeout())
                .await
            {
                Ok(()) => {}
                Err(Error::Transport) => return Err(Error::Transport),
                Err(e) => warn!("Init command {} failed: {:?}", command, e),
            }
        }

        wait_for_registration(&mut at, &config).await?;

        let identity = read_identity(&mut at, &config).await?;
        info!(
            "Module {} ready on {}",
            identity.name.as_str(),
            identity.operator.as_str()
        );

        Ok(Self::new(at, identity, config))
    }
}

async fn sync<W: Write, C: ModemConfig>(at: &mut AtClient<'_, W>, config: &C) -> Result<(), Error> {
    for attempt in 1..=C::SYNC_ATTEMPTS {
        Timer::after(config.sync_interval()).await;
        match at.send_at("", GenericResponse, config.command_timeout()).await {
            Ok(()) => {
                debug!("Synchronized after {} attempts", attempt);
                return Ok(());
            }
            Err(Error::Transport) => return Err(Error::Transport),
            Err(e) => debug!("Sync attempt {} failed: {:?}", attempt, e),
        }
    }
    error!("No response to AT after {} attempts", C::SYNC_ATTEMPTS);
    Err(BringUpError::Sync.into())
}

async fn wait_for_registration<W: Write, C: ModemConfig>(
    at: &mut AtClient<'_, W>,
    config: &C,
) -> Result<(), Error> {
    for attempt in 1..=C::REGISTRATION_ATTEMPTS {
        Timer::after(config.registration_interval()).await;
        match poll_registration(at, config).await {
            Ok(registration) if registration.registered() => {
                info!("Registered: {:?}", registration.stat);
                return Ok(());
            }
            Ok(registration) => debug!(
                "Not registered yet ({:?}), attempt {}",
                registration.stat, attempt
            ),
            Err(Error::Transport) => return Err(Error::Transport),
            Err(e) => warn!("Registration poll failed: {:?}", e),
        }
    }
    error!("Not registered after {} polls", C::REGISTRATION_ATTEMPTS);
    Err(BringUpError::Registration.into())
}

/// Narrow a captured identity value, failing instead of cutting it short.
fn fitted<const N: usize>(value: String<IDENTITY_LEN>) -> Result<String<N>, Error> {
    String::try_from(value.as_str()).map_err(|_| {
        warn!("Identity value {} is longer than {} characters", value.as_str(), N);
        Error::DecodeFailure
    })
}

async fn read_identity<W: Write, C: ModemConfig>(
    at: &mut AtClient<'_, W>,
    config: &C,
) -> Result<Identity, Error> {
    let identity_error = |field| move |e| stage_error(e, BringUpError::Identity(field));

    let name = at
        .send_at(MODEL_ID, IdentityResponse::default(), config.command_timeout())
        .await
        .map_err(identity_error(IdentityField::Name))?;
    let imei = at
        .send_at(IMEI, IdentityResponse::default(), config.command_timeout())
        .await
        .and_then(fitted::<IMEI_LEN>)
        .map_err(identity_error(IdentityField::Imei))?;
    let imsi = at
        .send_at(IMSI, IdentityResponse::default(), config.command_timeout())
        .await
        .and_then(fitted::<IMSI_LEN>)
        .map_err(identity_error(IdentityField::Imsi))?;
    let operator = at
        .send_at(
            OPERATOR_SELECTION,
            OperatorResponse::default(),
            config.operator_timeout(),
        )
        .await
        .map_err(identity_error(IdentityField::Operator))?;

    Ok(Identity {
        name,
        imei,
        imsi,
        operator,
    })
}
