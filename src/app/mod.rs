mod orchestrator;
mod runtime;
mod shutdown;
mod startup;
mod state;
mod types;


pub use orchestrator::SmileBackApp;
pub use runtime::ShutdownTrigger;
pub use types::{Component, ComponentState, ShutdownReason};
