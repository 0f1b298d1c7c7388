pub mod import;
pub mod pairing;

pub use import::ImportService;
pub use pairing::{PairingOptions, PairingService};
