// ABOUTME: Test support utilities.
// ABOUTME: Provides in-memory fakes for the pipeline's external collaborators.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Once;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use cdrelease::config::RawConfig;
use cdrelease::credentials::ResolvedCredentials;
use cdrelease::deployment::{
    CreateDeploymentRequest, DeploymentJob, DeploymentService, ErrorInformation, ServiceError,
};
use cdrelease::exec::{CommandOutput, CommandRunner, ExecError};
use cdrelease::output::Console;
use cdrelease::pipeline::{Collaborators, Connector};
use cdrelease::storage::{ObjectStorage, StorageError, UploadReceipt};
use cdrelease::types::{DeploymentId, DeploymentStatus};
use parking_lot::Mutex;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env()
            .add_directive("cdrelease=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// A complete raw configuration for `my-app` / `production`.
pub fn raw_config() -> RawConfig {
    RawConfig {
        application_name: Some("my-app".to_string()),
        deployment_group: Some("production".to_string()),
        s3_bucket: Some("releases/my-app".to_string()),
        region: Some("eu-west-1".to_string()),
        source_path: Some(".".to_string()),
        ..RawConfig::default()
    }
}

/// Records command lines; optionally fails those containing a substring.
#[derive(Default)]
pub struct RecordingRunner {
    commands: Mutex<Vec<String>>,
    fail_matching: Option<String>,
}

impl RecordingRunner {
    pub fn failing_on(pattern: &str) -> Self {
        Self {
            commands: Mutex::default(),
            fail_matching: Some(pattern.to_string()),
        }
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().clone()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, command_line: &str) -> Result<CommandOutput, ExecError> {
        self.commands.lock().push(command_line.to_string());
        match &self.fail_matching {
            Some(pattern) if command_line.contains(pattern.as_str()) => {
                Ok(CommandOutput::failed(12, "zip error: Nothing to do!"))
            }
            _ => Ok(CommandOutput::succeeded()),
        }
    }
}

/// Captures comments and structured log records.
#[derive(Default)]
pub struct RecordingConsole {
    comments: Mutex<Vec<String>>,
    logs: Mutex<Vec<serde_json::Value>>,
}

impl RecordingConsole {
    pub fn comments(&self) -> Vec<String> {
        self.comments.lock().clone()
    }

    pub fn logs(&self) -> Vec<serde_json::Value> {
        self.logs.lock().clone()
    }
}

impl Console for RecordingConsole {
    fn comment(&self, text: &str) {
        self.comments.lock().push(text.to_string());
    }

    fn log(&self, value: &serde_json::Value) {
        self.logs.lock().push(value.clone());
    }
}

/// Object storage that keeps uploads in memory.
pub struct InMemoryStorage {
    uploads: Mutex<Vec<(String, String, Bytes)>>,
    e_tag: Option<String>,
    stored_key: Option<String>,
    calls: AtomicUsize,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::with_e_tag(Some("\"0a1b2c\""))
    }
}

impl InMemoryStorage {
    pub fn with_e_tag(e_tag: Option<&str>) -> Self {
        Self {
            uploads: Mutex::default(),
            e_tag: e_tag.map(str::to_string),
            stored_key: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Report every object as stored under `key`, as a normalizing store would.
    pub fn storing_under(key: &str) -> Self {
        Self {
            stored_key: Some(key.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn uploads(&self) -> Vec<(String, String, Bytes)> {
        self.uploads.lock().clone()
    }
}

#[async_trait]
impl ObjectStorage for InMemoryStorage {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
    ) -> Result<UploadReceipt, StorageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.uploads
            .lock()
            .push((bucket.to_string(), key.to_string(), body));
        Ok(UploadReceipt {
            key: self.stored_key.clone().unwrap_or_else(|| key.to_string()),
            e_tag: self.e_tag.clone(),
        })
    }
}

/// What a scripted status fetch returns.
#[derive(Debug, Clone)]
pub enum Step {
    Status(DeploymentStatus),
    Failed(DeploymentStatus, String),
    FetchError(String),
}

/// Deployment service returning statuses from a fixed script.
///
/// Once the script is exhausted the last step repeats.
pub struct ScriptedDeployments {
    steps: Mutex<VecDeque<Step>>,
    last: Mutex<Option<Step>>,
    created: Mutex<Vec<CreateDeploymentRequest>>,
    fetches: AtomicUsize,
    reject_create: Option<String>,
}

impl ScriptedDeployments {
    pub const ID: &'static str = "d-TESTED123";

    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into_iter().collect()),
            last: Mutex::new(None),
            created: Mutex::default(),
            fetches: AtomicUsize::new(0),
            reject_create: None,
        }
    }

    pub fn statuses(statuses: impl IntoIterator<Item = DeploymentStatus>) -> Self {
        Self::new(statuses.into_iter().map(Step::Status))
    }

    pub fn rejecting(reason: &str) -> Self {
        Self {
            reject_create: Some(reason.to_string()),
            ..Self::new(Vec::new())
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn created(&self) -> Vec<CreateDeploymentRequest> {
        self.created.lock().clone()
    }
}

#[async_trait]
impl DeploymentService for ScriptedDeployments {
    async fn create_deployment(
        &self,
        request: &CreateDeploymentRequest,
    ) -> Result<DeploymentId, ServiceError> {
        if let Some(reason) = &self.reject_create {
            return Err(ServiceError::request("CreateDeployment", reason.clone()));
        }
        self.created.lock().push(request.clone());
        Ok(DeploymentId::new(Self::ID))
    }

    async fn get_deployment(&self, id: &DeploymentId) -> Result<DeploymentJob, ServiceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let step = {
            let next = self.steps.lock().pop_front();
            let mut last = self.last.lock();
            match next {
                Some(step) => {
                    *last = Some(step.clone());
                    step
                }
                None => last
                    .clone()
                    .unwrap_or(Step::Status(DeploymentStatus::InProgress)),
            }
        };

        match step {
            Step::Status(status) => Ok(DeploymentJob::new(id.clone(), status, None)),
            Step::Failed(status, message) => Ok(DeploymentJob::new(
                id.clone(),
                status,
                Some(ErrorInformation::message(message)),
            )),
            Step::FetchError(reason) => Err(ServiceError::request("GetDeployment", reason)),
        }
    }
}

/// Hands out shared fakes regardless of region or credentials.
pub struct FakeConnector {
    pub storage: Arc<InMemoryStorage>,
    pub deployments: Arc<ScriptedDeployments>,
}

impl FakeConnector {
    pub fn new(storage: InMemoryStorage, deployments: ScriptedDeployments) -> Self {
        Self {
            storage: Arc::new(storage),
            deployments: Arc::new(deployments),
        }
    }
}

struct SharedStorage(Arc<InMemoryStorage>);

#[async_trait]
impl ObjectStorage for SharedStorage {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
    ) -> Result<UploadReceipt, StorageError> {
        self.0.upload(bucket, key, body).await
    }
}

struct SharedDeployments(Arc<ScriptedDeployments>);

#[async_trait]
impl DeploymentService for SharedDeployments {
    async fn create_deployment(
        &self,
        request: &CreateDeploymentRequest,
    ) -> Result<DeploymentId, ServiceError> {
        self.0.create_deployment(request).await
    }

    async fn get_deployment(&self, id: &DeploymentId) -> Result<DeploymentJob, ServiceError> {
        self.0.get_deployment(id).await
    }
}

impl Connector for FakeConnector {
    fn object_storage(
        &self,
        _region: &str,
        _credentials: &ResolvedCredentials,
    ) -> Box<dyn ObjectStorage> {
        Box::new(SharedStorage(self.storage.clone()))
    }

    fn deployment_service(
        &self,
        _region: &str,
        _credentials: &ResolvedCredentials,
    ) -> Box<dyn DeploymentService> {
        Box::new(SharedDeployments(self.deployments.clone()))
    }
}

/// Fakes wired together, with handles kept for assertions.
pub struct Harness {
    pub runner: Arc<RecordingRunner>,
    pub console: Arc<RecordingConsole>,
    pub connector: Arc<FakeConnector>,
}

impl Harness {
    pub fn new(runner: RecordingRunner, connector: FakeConnector) -> Self {
        Self {
            runner: Arc::new(runner),
            console: Arc::new(RecordingConsole::default()),
            connector: Arc::new(connector),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            runner: self.runner.clone(),
            console: self.console.clone(),
            connector: self.connector.clone(),
        }
    }
}
