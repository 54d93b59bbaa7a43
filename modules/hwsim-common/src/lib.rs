pub mod config;
pub mod defaults;
pub mod error;
pub mod types;
pub mod validation;

pub use config::{Config, ExtractorBackend};
pub use defaults::SimulationDefaults;
pub use error::SimError;
pub use types::*;
