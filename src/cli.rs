// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cdrelease")]
#[command(about = "Bundle a release, upload it to S3 and roll it out with AWS CodeDeploy")]
#[command(version)]
pub struct Cli {
    /// Configuration file (default: discover cdrelease.yml in the current directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Working directory that artifact paths are resolved against
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print the final result
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines for scripting
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new cdrelease.yml configuration file
    Init {
        /// CodeDeploy application name to put in the template
        #[arg(short, long)]
        application: Option<String>,

        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },

    /// Validate configuration, resolve credentials and remove the old build directory
    Prepare,

    /// Prepare, then bundle, upload, deploy and wait for the result
    Deploy,

    /// Show the current status of a deployment
    Status {
        /// Deployment id as returned by CodeDeploy (d-XXXXXXXXX)
        deployment_id: String,
    },
}
