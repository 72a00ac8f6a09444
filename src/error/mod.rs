mod config;
mod identity;
mod trackani;

pub use config::ConfigError;
pub use identity::IdentityError;
pub use trackani::TrackaniError;
