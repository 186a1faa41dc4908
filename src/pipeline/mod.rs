// ABOUTME: Release orchestration using the type state pattern.
// ABOUTME: `prepare` yields a Prepared pipeline; only that one can `deploy`.

mod connector;
mod error;
mod phases;
mod state;

pub use connector::{AwsConnector, Connector};
pub use error::{PipelineError, PipelineErrorKind};
pub use phases::{Collaborators, DeploymentReport, Pipeline};
pub use state::{Prepared, Unprepared};
