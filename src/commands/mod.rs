// ABOUTME: Command module aggregator for the cdrelease CLI.
// ABOUTME: Re-exports release and status command handlers.

mod release;
mod status;

pub use release::{deploy, prepare};
pub use status::status;
