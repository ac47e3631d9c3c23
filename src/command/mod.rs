pub mod args;
pub mod effects;
pub mod executor;
pub mod registry;

pub use args::ArgMap;
pub use effects::{CommandError, EffectOutcome, EffectResult};
pub use executor::{Classification, classify_and_run, is_command};
pub use registry::{CommandCategory, CommandDefinition, CommandRegistry, RegistryError};
