//! Upload/process workflow use case

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::upload::{validate, Language, ProcessingMode, RejectionReason, SelectedFile};
use crate::domain::workflow::{
    SubmissionRequest, SubmissionResult, WorkflowStage, WorkflowState,
};

use super::ports::{ProcessingService, SubmissionError};

/// Errors surfaced by workflow triggers.
///
/// Submission failures are not errors of the trigger: they are a normal
/// outcome and land the workflow in `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("File rejected: {0}")]
    Rejected(#[from] RejectionReason),

    #[error("File selection is locked while a submission is in flight")]
    SelectionLocked,
}

impl WorkflowError {
    /// Symbolic key for text lookup
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Rejected(reason) => reason.key(),
            Self::SelectionLocked => "SelectionLocked",
        }
    }
}

/// User choices that travel with each submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubmissionSettings {
    pub mode: ProcessingMode,
    pub language: Language,
}

/// What a submit trigger led to
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The service returned artifacts; the workflow is `Completed`
    Completed(SubmissionResult),
    /// The submission failed; the workflow is `Failed`
    Failed(SubmissionError),
    /// Another submission is in flight; nothing happened
    AlreadySubmitting,
}

/// Drives the upload/process workflow.
///
/// The engine exclusively owns the [`WorkflowState`]; callers only get
/// snapshots. At most one submission is in flight per engine: a second
/// submit trigger while `Submitting` is a no-op, and new selections are
/// refused until the in-flight request finishes. Dropping a pending
/// `submit` future abandons the request and lands the workflow in `Failed`.
pub struct WorkflowEngine<S>
where
    S: ProcessingService,
{
    service: S,
    state: Mutex<WorkflowState>,
    attempts: AtomicU64,
}

impl<S> WorkflowEngine<S>
where
    S: ProcessingService,
{
    /// Create a new engine in idle state
    pub fn new(service: S) -> Self {
        Self {
            service,
            state: Mutex::new(WorkflowState::new()),
            attempts: AtomicU64::new(0),
        }
    }

    /// Get the current stage
    pub async fn stage(&self) -> WorkflowStage {
        lock(&self.state).stage()
    }

    /// Get a read-only copy of the current state
    pub async fn snapshot(&self) -> WorkflowState {
        lock(&self.state).clone()
    }

    /// Handle a file selection (or a selection that produced no file).
    ///
    /// An accepted file moves the workflow to `FileReady` and discards any
    /// previous result or error. A rejected file leaves the state untouched.
    pub async fn select(&self, file: Option<SelectedFile>) -> Result<(), WorkflowError> {
        let mut state = lock(&self.state);

        if state.is_submitting() {
            warn!("file selected while a submission is in flight, refusing");
            return Err(WorkflowError::SelectionLocked);
        }

        validate(file.as_ref()).into_result().map_err(|reason| {
            debug!(stage = %state.stage(), reason = reason.key(), "file rejected");
            WorkflowError::from(reason)
        })?;

        let file = file.ok_or(WorkflowError::Rejected(RejectionReason::NoFileProvided))?;
        let name = file.name().to_string();
        let size = file.size();

        state
            .select_file(file)
            .map_err(|_| WorkflowError::SelectionLocked)?;
        debug!(file = %name, size, "file ready");
        Ok(())
    }

    /// Return to idle, discarding the selection and any result or error
    pub async fn clear(&self) -> Result<(), WorkflowError> {
        let mut state = lock(&self.state);
        state.clear().map_err(|_| WorkflowError::SelectionLocked)?;
        debug!("workflow cleared");
        Ok(())
    }

    /// Submit the selected file to the processing service.
    ///
    /// The file is validated again before anything is sent. The lock is not
    /// held across the network call; the `Submitting` stage is the guard.
    pub async fn submit(&self, settings: SubmissionSettings) -> Result<SubmitOutcome, WorkflowError> {
        let request = {
            let mut state = lock(&self.state);

            if state.is_submitting() {
                info!("submit requested while already submitting, ignoring");
                return Ok(SubmitOutcome::AlreadySubmitting);
            }

            validate(state.file()).into_result()?;

            let file = state
                .begin_submission()
                .map_err(|_| WorkflowError::Rejected(RejectionReason::NoFileProvided))?;
            SubmissionRequest::new(&file, settings.mode, settings.language)
        };

        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        info!(
            attempt,
            file = request.file_name(),
            mode = %request.mode(),
            lang = %request.language(),
            "submitting"
        );

        let mut in_flight = InFlight::new(&self.state, attempt);
        let outcome = self.service.submit(&request).await;

        let mut state = lock(&self.state);
        in_flight.settle();
        match outcome {
            Ok(result) => {
                if let Err(e) = state.complete(result.clone()) {
                    warn!(attempt, error = %e, "dropping submission result");
                }
                info!(attempt, processed = result.processed_audio(), "submission completed");
                Ok(SubmitOutcome::Completed(result))
            }
            Err(error) => {
                warn!(attempt, kind = error.key(), error = %error, "submission failed");
                if let Err(e) = state.fail(error.clone()) {
                    warn!(attempt, error = %e, "dropping submission failure");
                }
                Ok(SubmitOutcome::Failed(error))
            }
        }
    }
}

fn lock(state: &Mutex<WorkflowState>) -> MutexGuard<'_, WorkflowState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Marks a submission whose outcome has not been recorded yet.
///
/// If the `submit` future is dropped while the service call is pending
/// (timeout, `select!`, task abort), the workflow moves to `Failed` so the
/// selection can be retried or replaced.
struct InFlight<'a> {
    state: &'a Mutex<WorkflowState>,
    attempt: u64,
    pending: bool,
}

impl<'a> InFlight<'a> {
    fn new(state: &'a Mutex<WorkflowState>, attempt: u64) -> Self {
        Self {
            state,
            attempt,
            pending: true,
        }
    }

    fn settle(&mut self) {
        self.pending = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.pending {
            return;
        }
        let mut state = lock(self.state);
        if state.is_submitting() {
            warn!(attempt = self.attempt, "submission abandoned before the service answered");
            let abandoned = SubmissionError::ServiceUnreachable("submission abandoned".into());
            if let Err(e) = state.fail(abandoned) {
                debug!(attempt = self.attempt, error = %e, "abandoned submission already settled");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::upload::MAX_UPLOAD_BYTES;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use std::sync::{Arc, Mutex as StdMutex};
    use std::time::Duration;
    use tokio::sync::Notify;

    // Mock service returning queued outcomes, optionally blocking until released
    struct MockService {
        calls: AtomicUsize,
        outcomes: StdMutex<Vec<Result<SubmissionResult, SubmissionError>>>,
        requests: StdMutex<Vec<SubmissionRequest>>,
        gate: Option<Arc<Notify>>,
    }

    impl MockService {
        fn returning(outcomes: Vec<Result<SubmissionResult, SubmissionError>>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                outcomes: StdMutex::new(outcomes.into_iter().rev().collect()),
                requests: StdMutex::new(Vec::new()),
                gate: None,
            }
        }

        fn gated(mut self, gate: Arc<Notify>) -> Self {
            self.gate = Some(gate);
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ProcessingService for MockService {
        async fn submit(
            &self,
            request: &SubmissionRequest,
        ) -> Result<SubmissionResult, SubmissionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request.clone());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.outcomes
                .lock()
                .unwrap()
                .pop()
                .expect("unexpected submission")
        }
    }

    fn wav(name: &str, size: u64) -> SelectedFile {
        SelectedFile::new(name, size, Some("audio/wav".into()), vec![0u8; 8])
    }

    fn processed(reference: &str) -> SubmissionResult {
        SubmissionResult::new(reference)
            .unwrap()
            .with_report(Some("/files/abc_report.txt".into()))
    }

    #[tokio::test]
    async fn valid_selection_moves_to_file_ready() {
        let engine = WorkflowEngine::new(MockService::returning(vec![]));
        engine.select(Some(wav("episode.wav", 8_000_000))).await.unwrap();
        assert_eq!(engine.stage().await, WorkflowStage::FileReady);
    }

    #[tokio::test]
    async fn rejected_selection_keeps_idle() {
        let engine = WorkflowEngine::new(MockService::returning(vec![]));
        let err = engine
            .select(Some(wav("big.wav", 25 * 1024 * 1024)))
            .await
            .unwrap_err();
        assert_eq!(err, WorkflowError::Rejected(RejectionReason::SizeExceedsLimit));
        assert_eq!(engine.stage().await, WorkflowStage::Idle);

        let err = engine.select(None).await.unwrap_err();
        assert_eq!(err.key(), "NoFileProvided");
        assert_eq!(engine.stage().await, WorkflowStage::Idle);
    }

    #[tokio::test]
    async fn rejected_selection_keeps_completed_result() {
        let service = MockService::returning(vec![Ok(processed("/files/a.wav"))]);
        let engine = WorkflowEngine::new(service);
        engine.select(Some(wav("a.wav", 10))).await.unwrap();
        engine.submit(SubmissionSettings::default()).await.unwrap();

        let notes = SelectedFile::from_bytes("notes.txt", Some("text/plain".into()), vec![1]);
        assert!(engine.select(Some(notes)).await.is_err());

        let snapshot = engine.snapshot().await;
        assert_eq!(snapshot.stage(), WorkflowStage::Completed);
        assert_eq!(snapshot.file().unwrap().name(), "a.wav");
        assert_eq!(snapshot.result().unwrap().processed_audio(), "/files/a.wav");
    }

    #[tokio::test]
    async fn submit_without_file_is_rejected_without_network() {
        let engine = WorkflowEngine::new(MockService::returning(vec![]));
        let err = engine.submit(SubmissionSettings::default()).await.unwrap_err();
        assert_eq!(err, WorkflowError::Rejected(RejectionReason::NoFileProvided));
        assert_eq!(engine.service.calls(), 0);
        assert_eq!(engine.stage().await, WorkflowStage::Idle);
    }

    #[tokio::test]
    async fn successful_submission_completes() {
        let engine = WorkflowEngine::new(MockService::returning(vec![Ok(processed(
            "/files/abc_processed.wav",
        ))]));
        engine.select(Some(wav("episode.wav", 8_000_000))).await.unwrap();

        let settings = SubmissionSettings {
            mode: ProcessingMode::ExternalMic,
            language: Language::En,
        };
        let outcome = engine.submit(settings).await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Completed(_)));

        let snapshot = engine.snapshot().await;
        assert_eq!(snapshot.stage(), WorkflowStage::Completed);
        assert_eq!(
            snapshot.result().unwrap().processed_audio(),
            "/files/abc_processed.wav"
        );
        assert!(snapshot.error().is_none());

        let requests = engine.service.requests.lock().unwrap();
        assert_eq!(requests[0].mode(), ProcessingMode::ExternalMic);
        assert_eq!(requests[0].language(), Language::En);
        assert_eq!(requests[0].file_name(), "episode.wav");
    }

    #[tokio::test]
    async fn failed_submission_can_be_retried() {
        let engine = WorkflowEngine::new(MockService::returning(vec![
            Err(SubmissionError::ServiceFailure { status: 500 }),
            Ok(processed("/files/a.wav")),
        ]));
        engine.select(Some(wav("a.wav", 10))).await.unwrap();

        let outcome = engine.submit(SubmissionSettings::default()).await.unwrap();
        assert_eq!(
            outcome,
            SubmitOutcome::Failed(SubmissionError::ServiceFailure { status: 500 })
        );
        let snapshot = engine.snapshot().await;
        assert_eq!(snapshot.stage(), WorkflowStage::Failed);
        assert!(snapshot.result().is_none());

        let outcome = engine.submit(SubmissionSettings::default()).await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Completed(_)));
        assert_eq!(engine.service.calls(), 2);
        assert!(engine.snapshot().await.error().is_none());
    }

    #[tokio::test]
    async fn duplicate_submit_while_in_flight_is_a_no_op() {
        let gate = Arc::new(Notify::new());
        let service =
            MockService::returning(vec![Ok(processed("/files/a.wav"))]).gated(Arc::clone(&gate));
        let engine = WorkflowEngine::new(service);
        engine.select(Some(wav("a.wav", 10))).await.unwrap();

        let first = engine.submit(SubmissionSettings::default());
        let second = async {
            while engine.stage().await != WorkflowStage::Submitting {
                tokio::task::yield_now().await;
            }
            let outcome = engine.submit(SubmissionSettings::default()).await.unwrap();
            assert_eq!(engine.stage().await, WorkflowStage::Submitting);

            let locked = engine.select(Some(wav("b.wav", 10))).await.unwrap_err();
            assert_eq!(locked, WorkflowError::SelectionLocked);
            assert_eq!(engine.clear().await.unwrap_err(), WorkflowError::SelectionLocked);

            gate.notify_one();
            outcome
        };

        let (first, second) = tokio::join!(first, second);
        assert!(matches!(first.unwrap(), SubmitOutcome::Completed(_)));
        assert_eq!(second, SubmitOutcome::AlreadySubmitting);
        assert_eq!(engine.service.calls(), 1);
        assert_eq!(engine.snapshot().await.file().unwrap().name(), "a.wav");
    }

    #[tokio::test]
    async fn dropped_submission_lands_in_failed() {
        let gate = Arc::new(Notify::new());
        let service =
            MockService::returning(vec![Ok(processed("/files/a.wav"))]).gated(Arc::clone(&gate));
        let engine = WorkflowEngine::new(service);
        engine.select(Some(wav("a.wav", 10))).await.unwrap();

        let timed_out = tokio::time::timeout(
            Duration::from_millis(50),
            engine.submit(SubmissionSettings::default()),
        )
        .await;
        assert!(timed_out.is_err());

        let snapshot = engine.snapshot().await;
        assert_eq!(snapshot.stage(), WorkflowStage::Failed);
        assert_eq!(snapshot.error().unwrap().key(), "ServiceUnreachable");
        assert_eq!(snapshot.file().unwrap().name(), "a.wav");

        // Retrying goes back to the service instead of reporting a submission in flight
        gate.notify_one();
        let outcome = engine.submit(SubmissionSettings::default()).await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Completed(_)));
        assert_eq!(engine.service.calls(), 2);

        engine.select(Some(wav("b.wav", 10))).await.unwrap();
        assert_eq!(engine.stage().await, WorkflowStage::FileReady);
    }

    #[tokio::test]
    async fn reselect_after_completion_discards_result() {
        let engine = WorkflowEngine::new(MockService::returning(vec![Ok(processed("/files/a.wav"))]));
        engine.select(Some(wav("a.wav", 10))).await.unwrap();
        engine.submit(SubmissionSettings::default()).await.unwrap();

        engine.select(Some(wav("b.wav", 10))).await.unwrap();
        let snapshot = engine.snapshot().await;
        assert_eq!(snapshot.stage(), WorkflowStage::FileReady);
        assert!(snapshot.result().is_none());
        assert_eq!(snapshot.file().unwrap().name(), "b.wav");
    }

    #[tokio::test]
    async fn reselect_after_failure_discards_error() {
        let engine = WorkflowEngine::new(MockService::returning(vec![Err(
            SubmissionError::ServiceUnreachable("connection refused".into()),
        )]));
        engine.select(Some(wav("a.wav", 10))).await.unwrap();
        engine.submit(SubmissionSettings::default()).await.unwrap();
        assert_eq!(engine.stage().await, WorkflowStage::Failed);

        engine.select(Some(wav("b.wav", MAX_UPLOAD_BYTES))).await.unwrap();
        let snapshot = engine.snapshot().await;
        assert_eq!(snapshot.stage(), WorkflowStage::FileReady);
        assert!(snapshot.error().is_none());
    }

    #[tokio::test]
    async fn clear_returns_to_idle() {
        let engine = WorkflowEngine::new(MockService::returning(vec![]));
        engine.select(Some(wav("a.wav", 10))).await.unwrap();
        engine.clear().await.unwrap();
        let snapshot = engine.snapshot().await;
        assert_eq!(snapshot.stage(), WorkflowStage::Idle);
        assert!(snapshot.file().is_none());
    }
}
