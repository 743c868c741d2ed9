//! Main app runner for one-shot processing

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use tracing::debug;

use crate::application::ports::{ConfigStore, Describe, DownloadError, TextResolver};
use crate::application::{
    ArtifactDownloader, SavedArtifact, SubmissionSettings, SubmitOutcome, WorkflowEngine,
};
use crate::domain::config::AppConfig;
use crate::domain::upload::{format_size, SelectedFile};
use crate::domain::workflow::{ArtifactKind, SubmissionResult, WorkflowState};
use crate::infrastructure::{
    pick_file, Catalog, DirectorySink, Endpoint, HttpArtifactFetcher, HttpProcessingService,
    PickError,
};

use super::args::ENV_SERVER_URL;
use super::presenter::Presenter;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Resolved options for one processing run
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    pub file: Option<PathBuf>,
    pub media_type: Option<String>,
    pub settings: SubmissionSettings,
    pub server_url: String,
    pub output_dir: PathBuf,
    pub timeout: Duration,
    pub download: bool,
}

impl ProcessOptions {
    /// Build options from a merged config
    pub fn from_config(
        config: &AppConfig,
        file: Option<PathBuf>,
        media_type: Option<String>,
        download: bool,
    ) -> Self {
        Self {
            file,
            media_type,
            settings: SubmissionSettings {
                mode: config.mode_or_default(),
                language: config.language_or_default(),
            },
            server_url: config.server_url_or_default().to_string(),
            output_dir: PathBuf::from(config.output_dir_or_default()),
            timeout: Duration::from_secs(config.timeout_secs_or_default()),
            download,
        }
    }
}

/// Run one select → submit → download pass
pub async fn run_process(options: ProcessOptions) -> ExitCode {
    let mut presenter = Presenter::new();
    let catalog = Catalog::new(options.settings.language);

    let file = match load_file(&options).await {
        Ok(file) => file,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    let endpoint = match Endpoint::new(&options.server_url, options.timeout) {
        Ok(endpoint) => endpoint,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    let engine = WorkflowEngine::new(HttpProcessingService::new(endpoint.clone()));

    if let Err(e) = engine.select(file).await {
        presenter.error(&e.describe(&catalog));
        return ExitCode::from(EXIT_USAGE_ERROR);
    }

    if let Some(file) = engine.snapshot().await.file() {
        presenter.info(&catalog.resolve(
            "status.selected",
            &[("name", file.name()), ("size", file.human_readable_size().as_str())],
        ));
    }
    presenter.info(&catalog.resolve(options.settings.mode.label_key(), &[]));

    presenter.start_spinner(&catalog.resolve("status.processing", &[]));

    let result = match engine.submit(options.settings).await {
        Ok(SubmitOutcome::Completed(result)) => {
            presenter.spinner_success(&catalog.resolve("status.ready", &[]));
            result
        }
        Ok(SubmitOutcome::Failed(error)) => {
            presenter.spinner_fail(&error.describe(&catalog));
            presenter.info(&catalog.resolve(retry_hint_key(error.is_retryable()), &[]));
            return ExitCode::from(EXIT_ERROR);
        }
        Ok(SubmitOutcome::AlreadySubmitting) => {
            presenter.spinner_fail(&catalog.resolve("status.processing", &[]));
            return ExitCode::from(EXIT_ERROR);
        }
        Err(e) => {
            presenter.spinner_fail(&e.describe(&catalog));
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    if let Some(analysis) = result.analysis() {
        presenter.analysis(analysis, &catalog);
    }

    if !options.download {
        print_references(&presenter, &endpoint, &result);
        return ExitCode::from(EXIT_SUCCESS);
    }

    let downloader = ArtifactDownloader::new(
        HttpArtifactFetcher::new(endpoint),
        DirectorySink::new(&options.output_dir),
        options.settings.language,
    );
    let snapshot = engine.snapshot().await;

    let saved = download_all(&downloader, &snapshot, &result).await;

    let mut code = EXIT_SUCCESS;
    for (kind, outcome) in saved {
        let label = catalog.resolve(artifact_label_key(kind), &[]);
        match outcome {
            Ok(artifact) => {
                let path = artifact.path.display().to_string();
                let size = format_size(artifact.size as u64);
                presenter.success(&catalog.resolve(
                    "status.saved",
                    &[
                        ("artifact", label.as_str()),
                        ("path", path.as_str()),
                        ("size", size.as_str()),
                    ],
                ));
                presenter.output(&path);
            }
            Err(e) => {
                presenter.error(&format!("{}: {}", label, e.describe(&catalog)));
                debug!(error = %e, "download failed");
                code = EXIT_ERROR;
            }
        }
    }

    ExitCode::from(code)
}

async fn load_file(options: &ProcessOptions) -> Result<Option<SelectedFile>, PickError> {
    match &options.file {
        Some(path) => pick_file(path, options.media_type.clone()).await.map(Some),
        None => Ok(None),
    }
}

/// Fetch the processed audio and, when offered, the report at the same time
async fn download_all(
    downloader: &ArtifactDownloader<HttpArtifactFetcher, DirectorySink>,
    state: &WorkflowState,
    result: &SubmissionResult,
) -> Vec<(ArtifactKind, Result<SavedArtifact, DownloadError>)> {
    let processed = downloader.download_artifact(state, ArtifactKind::ProcessedAudio);
    let report = async {
        match result.report() {
            Some(_) => Some(downloader.download_artifact(state, ArtifactKind::Report).await),
            None => None,
        }
    };

    let (processed, report) = tokio::join!(processed, report);

    let mut saved = vec![(ArtifactKind::ProcessedAudio, processed)];
    if let Some(report) = report {
        saved.push((ArtifactKind::Report, report));
    }
    saved
}

fn print_references(presenter: &Presenter, endpoint: &Endpoint, result: &SubmissionResult) {
    let references = [
        ("processed_audio", Some(result.processed_audio())),
        ("original_audio", result.original_audio()),
        ("report", result.report()),
    ];

    for (name, reference) in references {
        if let Some(reference) = reference {
            let shown = endpoint
                .resolve(reference)
                .map(|url| url.to_string())
                .unwrap_or_else(|_| reference.to_string());
            presenter.key_value(name, &shown);
        }
    }

    if let Some(original) = result.original_filename() {
        presenter.key_value("original_filename", original);
    }
}

/// Whether resubmitting the same file is worth suggesting
fn retry_hint_key(retryable: bool) -> &'static str {
    if retryable {
        "status.retry"
    } else {
        "status.choose_other"
    }
}

fn artifact_label_key(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::ProcessedAudio => "artifact.processed",
        ArtifactKind::Report => "artifact.report",
    }
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config<S: ConfigStore>(store: &S, cli_config: AppConfig) -> AppConfig {
    let file_config = store.load_or_empty().await;

    let env_config = AppConfig {
        server_url: env::var(ENV_SERVER_URL).ok().filter(|s| !s.is_empty()),
        ..Default::default()
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config)
}
