mod bringup;
pub mod control;
pub mod ingress;
pub mod router;
pub mod session;
pub mod state;
pub mod urc_handler;

pub use control::{Identity, Mode, Modem};
pub use ingress::Ingress;
pub use router::{Dispatch, Router, UrcSubscription};
pub use session::AtClient;
