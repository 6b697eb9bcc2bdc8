//! Configuration and dependency initialization for the search provisioner.

mod cli;
mod dependencies;
mod settings;

pub use cli::Cli;
pub use dependencies::{Dependencies, RunOutcome};
pub use settings::ProvisionerConfig;
