// ABOUTME: Prepare and deploy command implementations.
// ABOUTME: Wires the real shell, console and AWS backends into the pipeline.

use std::path::Path;
use std::sync::Arc;

use cdrelease::config::RawConfig;
use cdrelease::error::Result;
use cdrelease::exec::ShellRunner;
use cdrelease::output::Output;
use cdrelease::pipeline::{AwsConnector, Collaborators, Pipeline, Prepared};
use tokio_util::sync::CancellationToken;

fn collaborators(data_dir: &Path, output: Arc<Output>) -> Collaborators {
    Collaborators {
        runner: Arc::new(ShellRunner::new(data_dir)),
        console: output,
        connector: Arc::new(AwsConnector::new()),
    }
}

async fn prepared(
    raw: RawConfig,
    data_dir: &Path,
    output: Arc<Output>,
    cancel: CancellationToken,
) -> Result<Pipeline<Prepared>> {
    let pipeline = Pipeline::new(raw, data_dir, collaborators(data_dir, output))
        .with_cancellation(cancel)
        .prepare()
        .await?;
    Ok(pipeline)
}

/// Run the prepare phase only.
pub async fn prepare(raw: RawConfig, data_dir: &Path, mut output: Output) -> Result<()> {
    output.start_timer();
    let output = Arc::new(output);

    let pipeline = prepared(raw, data_dir, output.clone(), CancellationToken::new()).await?;

    output.success(&format!(
        "Prepared {} / {} (credentials from {})",
        pipeline.config().application_name(),
        pipeline.config().deployment_group(),
        pipeline.credentials().source()
    ));
    Ok(())
}

/// Run prepare then deploy, sharing one credential resolution.
pub async fn deploy(
    raw: RawConfig,
    data_dir: &Path,
    mut output: Output,
    cancel: CancellationToken,
) -> Result<()> {
    output.start_timer();
    let output = Arc::new(output);

    let pipeline = prepared(raw, data_dir, output.clone(), cancel).await?;
    let report = pipeline.deploy().await?;

    for warning in &report.warnings {
        output.warning(&warning.message);
    }

    output.success(&format!(
        "Deployment {} {}",
        report.job.deployment_id, report.job.status
    ));
    Ok(())
}
