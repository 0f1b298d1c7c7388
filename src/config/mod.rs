pub mod settings;

pub use settings::{AppConfig, PairingSettings, StorageSettings};
