pub mod config;
pub mod db;
pub mod error;
pub mod identity;
pub mod server;
pub mod validate;

mod patches;
mod utils;

pub use error::TrackaniError;
pub use identity::{IdentityVerifier, UserId};
