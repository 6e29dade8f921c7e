/// The identity query that failed during bring-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IdentityField {
    Name,
    Imei,
    Imsi,
    Operator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BringUpError {
    /// The module never answered the `AT` probe
    Sync,
    /// `ATE0` was not accepted
    Echo,
    /// The module did not register with the network in time
    Registration,
    Identity(IdentityField),
}

#[derive(Debug, PartialEq)]
#[non_exhaustive]
pub enum Error {
    // Command session errors
    Timeout,
    Rejected,
    DecodeFailure,

    // Handle state errors
    NotReady,
    Busy,

    BringUp(BringUpError),

    Transport,
    Overflow,

    SubscriberOverflow(embassy_sync::pubsub::Error),
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter<'_>) {
        match self {
            Self::Timeout => defmt::write!(f, "Timeout"),
            Self::Rejected => defmt::write!(f, "Rejected"),
            Self::DecodeFailure => defmt::write!(f, "DecodeFailure"),
            Self::NotReady => defmt::write!(f, "NotReady"),
            Self::Busy => defmt::write!(f, "Busy"),
            Self::BringUp(e) => defmt::write!(f, "BringUp({:?})", e),
            Self::Transport => defmt::write!(f, "Transport"),
            Self::Overflow => defmt::write!(f, "Overflow"),
            Self::SubscriberOverflow(_) => defmt::write!(f, "SubscriberOverflow"),
        }
    }
}

impl From<BringUpError> for Error {
    fn from(e: BringUpError) -> Self {
        Self::BringUp(e)
    }
}

impl From<embassy_sync::pubsub::Error> for Error {
    fn from(e: embassy_sync::pubsub::Error) -> Self {
        Self::SubscriberOverflow(e)
    }
}
