// ABOUTME: Artifact packaging for a release.
// ABOUTME: Builds the zip archive of the source tree and clears stale build output.

mod builder;

pub use builder::{
    ArtifactBuilder, BuildError, archive_command, cleanup_command, mkdir_command, shell_quote,
};
