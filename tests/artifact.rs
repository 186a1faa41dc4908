// ABOUTME: Integration tests for artifact packaging and publishing.
// ABOUTME: Uses a recording command runner and in-memory object storage.

mod support;

use cdrelease::artifact::{ArtifactBuilder, BuildError};
use cdrelease::config::DeploymentConfig;
use cdrelease::exec::ShellRunner;
use cdrelease::storage::{PublishError, publish};
use std::path::Path;
use support::{InMemoryStorage, RecordingRunner, raw_config};

fn config(data_dir: &Path) -> DeploymentConfig {
    let mut raw = raw_config();
    raw.exclude_string = Some("*.log tmp/*".to_string());
    DeploymentConfig::resolve(&raw, data_dir).unwrap()
}

mod building {
    use super::*;

    #[tokio::test]
    async fn creates_directory_then_archives() {
        let runner = RecordingRunner::default();
        ArtifactBuilder::new(&runner)
            .build(&config(Path::new("/srv")))
            .await
            .unwrap();

        assert_eq!(
            runner.commands(),
            [
                "mkdir -p 'aws_build'".to_string(),
                "zip 'aws_build/my-app_production_release_artifact.zip' '.' --recurse-paths \
                 --exclude 'aws_build/*' *.log tmp/* --quiet"
                    .to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn failed_archive_is_a_build_error() {
        let runner = RecordingRunner::failing_on("zip ");
        let err = ArtifactBuilder::new(&runner)
            .build(&config(Path::new("/srv")))
            .await
            .unwrap_err();

        match &err {
            BuildError::CommandFailed { exit_code, .. } => assert_eq!(*exit_code, Some(12)),
            other => panic!("expected CommandFailed, got {other:?}"),
        }
        assert!(err.to_string().contains("Nothing to do"));
    }

    #[tokio::test]
    async fn failed_mkdir_skips_archive() {
        let runner = RecordingRunner::failing_on("mkdir");
        let result = ArtifactBuilder::new(&runner)
            .build(&config(Path::new("/srv")))
            .await;

        assert!(result.is_err());
        assert_eq!(runner.commands().len(), 1);
    }

    #[tokio::test]
    async fn removing_absent_build_directory_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ShellRunner::new(dir.path());
        let builder = ArtifactBuilder::new(&runner);
        let config = config(dir.path());

        builder.remove_build_directory(&config).await.unwrap();

        std::fs::create_dir(dir.path().join("aws_build")).unwrap();
        std::fs::write(dir.path().join("aws_build/stale.zip"), b"old").unwrap();
        builder.remove_build_directory(&config).await.unwrap();
        assert!(!dir.path().join("aws_build").exists());
    }
}

mod publishing {
    use super::*;

    #[tokio::test]
    async fn missing_artifact_never_reaches_storage() {
        let dir = tempfile::tempdir().unwrap();
        let storage = InMemoryStorage::default();

        let err = publish(&config(dir.path()), &storage).await.unwrap_err();

        assert!(matches!(err, PublishError::ArtifactNotFound(_)));
        assert_eq!(storage.calls(), 0);
    }

    #[tokio::test]
    async fn uploads_artifact_under_prefixed_key() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        std::fs::create_dir(dir.path().join("aws_build")).unwrap();
        std::fs::write(config.absolute_artifact_path(), b"PK\x03\x04zip").unwrap();
        let storage = InMemoryStorage::default();

        let result = publish(&config, &storage).await.unwrap();

        assert_eq!(result.bucket, "releases");
        assert_eq!(result.key, "my-app/my-app_production_release_artifact.zip");
        assert_eq!(result.e_tag.as_deref(), Some("\"0a1b2c\""));

        let uploads = storage.uploads();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].2.as_ref(), b"PK\x03\x04zip");
    }

    #[tokio::test]
    async fn reports_key_the_store_wrote() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        std::fs::create_dir(dir.path().join("aws_build")).unwrap();
        std::fs::write(config.absolute_artifact_path(), b"PK").unwrap();
        let storage = InMemoryStorage::storing_under("normalized/a.zip");

        let result = publish(&config, &storage).await.unwrap();

        assert_eq!(result.key, "normalized/a.zip");
    }

    #[tokio::test]
    async fn doubled_slashes_in_bucket_prefix_are_collapsed() {
        let dir = tempfile::tempdir().unwrap();
        let mut raw = raw_config();
        raw.s3_bucket = Some("releases//my-app/".to_string());
        let config = DeploymentConfig::resolve(&raw, dir.path()).unwrap();
        std::fs::create_dir(dir.path().join("aws_build")).unwrap();
        std::fs::write(config.absolute_artifact_path(), b"PK").unwrap();
        let storage = InMemoryStorage::default();

        let result = publish(&config, &storage).await.unwrap();

        assert_eq!(result.key, "my-app/my-app_production_release_artifact.zip");
        assert_eq!(storage.uploads()[0].1, result.key);
    }
}
