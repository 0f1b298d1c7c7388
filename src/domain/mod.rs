pub mod history;
pub mod models;
pub mod roster;

pub use history::History;
pub use models::*;
pub use roster::{canonical_id, Roster};
