use std::{
    panic::AssertUnwindSafe,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use futures::{future::join_all, FutureExt};
use shared::{
    domain::{AnalysisResult, OperationKind, RequestConfig, CLASSIFICATION_TOP_K},
    protocol::{ClassifyRequest, KeywordsRequest, SentimentRequest, SummarizeRequest},
};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

pub mod error;
pub mod transport;
pub mod types;
pub mod view;

pub use error::{GatewayError, GatewayErrorSource};
pub use transport::HttpAnalysisGateway;
pub use types::{CommitPolicy, ResultSlot, ResultSlots, SessionState};
pub use view::{render, render_tab, TabBody, TabView, ViewModel};

const SESSION_EVENT_CAPACITY: usize = 256;

/// One call to the remote analysis service, already parameterized for its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisRequest {
    Summarize(SummarizeRequest),
    Classify(ClassifyRequest),
    Sentiment(SentimentRequest),
    Keywords(KeywordsRequest),
}

impl AnalysisRequest {
    pub fn for_kind(kind: OperationKind, text: &str, config: &RequestConfig) -> Self {
        let text = text.to_string();
        match kind {
            OperationKind::Summary => AnalysisRequest::Summarize(SummarizeRequest {
                text,
                max_sentences: config.max_sentences(),
            }),
            OperationKind::Classification => AnalysisRequest::Classify(ClassifyRequest {
                text,
                top_k: CLASSIFICATION_TOP_K,
            }),
            OperationKind::Sentiment => AnalysisRequest::Sentiment(SentimentRequest { text }),
            OperationKind::Keywords => AnalysisRequest::Keywords(KeywordsRequest {
                text,
                top_k: config.top_k(),
            }),
        }
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            AnalysisRequest::Summarize(_) => OperationKind::Summary,
            AnalysisRequest::Classify(_) => OperationKind::Classification,
            AnalysisRequest::Sentiment(_) => OperationKind::Sentiment,
            AnalysisRequest::Keywords(_) => OperationKind::Keywords,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            AnalysisRequest::Summarize(request) => &request.text,
            AnalysisRequest::Classify(request) => &request.text,
            AnalysisRequest::Sentiment(request) => &request.text,
            AnalysisRequest::Keywords(request) => &request.text,
        }
    }
}

#[async_trait]
pub trait AnalysisGateway: Send + Sync {
    async fn invoke(&self, request: AnalysisRequest) -> Result<AnalysisResult, GatewayError>;
}

pub struct MissingAnalysisGateway;

#[async_trait]
impl AnalysisGateway for MissingAnalysisGateway {
    async fn invoke(&self, request: AnalysisRequest) -> Result<AnalysisResult, GatewayError> {
        Err(GatewayError::transport(format!(
            "analysis service is not configured for {}",
            request.kind()
        )))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    OperationStarted {
        kind: OperationKind,
        generation: u64,
    },
    OperationSettled {
        kind: OperationKind,
        generation: u64,
        succeeded: bool,
        committed: bool,
    },
    TabSelected(OperationKind),
    Cleared,
}

/// Orchestrates the analysis operations for one input session.
///
/// State is only touched between gateway awaits, so every mutation happens on whichever
/// task is driving the session and the lock is never held across a suspension point.
pub struct AnalysisSession {
    gateway: Arc<dyn AnalysisGateway>,
    commit_policy: CommitPolicy,
    inner: Mutex<SessionState>,
    events: broadcast::Sender<SessionEvent>,
}

impl AnalysisSession {
    pub fn new(gateway: Arc<dyn AnalysisGateway>) -> Arc<Self> {
        Self::with_options(gateway, RequestConfig::default(), CommitPolicy::default())
    }

    pub fn with_options(
        gateway: Arc<dyn AnalysisGateway>,
        config: RequestConfig,
        commit_policy: CommitPolicy,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(SESSION_EVENT_CAPACITY);
        Arc::new(Self {
            gateway,
            commit_policy,
            inner: Mutex::new(SessionState::new(config)),
            events,
        })
    }

    pub fn commit_policy(&self) -> CommitPolicy {
        self.commit_policy
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn snapshot(&self) -> SessionState {
        self.state().clone()
    }

    pub fn view(&self) -> ViewModel {
        render(&self.state())
    }

    pub fn set_input_text(&self, text: impl Into<String>) {
        self.state().set_input_text(text.into());
    }

    pub fn set_max_sentences(&self, value: i64) {
        self.state().config_mut().set_max_sentences(value);
    }

    pub fn set_top_k(&self, value: i64) {
        self.state().config_mut().set_top_k(value);
    }

    pub fn set_config(&self, config: RequestConfig) {
        *self.state().config_mut() = config;
    }

    pub fn select_tab(&self, kind: OperationKind) {
        self.state().select_tab(kind);
        self.emit(SessionEvent::TabSelected(kind));
    }

    /// Runs one operation against the current input. Blank input is a silent no-op.
    pub async fn run(&self, kind: OperationKind) {
        for pending in self.begin(&[kind]) {
            pending.complete().await;
        }
    }

    /// Runs all four operations concurrently and returns once each has settled.
    pub async fn run_all(&self) {
        let pending = self.begin(&OperationKind::ALL);
        if pending.is_empty() {
            return;
        }
        info!(operations = pending.len(), "analyzing input with all operations");
        join_all(pending.into_iter().map(|operation| operation.complete())).await;
        debug!("all operations settled");
    }

    /// Empties input and results. Config survives, and requests already in flight still
    /// write their outcome when they settle.
    pub fn clear(&self) {
        self.state().clear();
        info!("session cleared");
        self.emit(SessionEvent::Cleared);
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: SessionEvent) {
        let _ = self.events.send(event);
    }

    /// Registers every request before the first suspension so `loading` is raised once
    /// for the whole batch.
    fn begin(&self, kinds: &[OperationKind]) -> Vec<PendingOperation<'_>> {
        let mut state = self.state();
        if !state.has_input() {
            debug!(?kinds, "skipping analysis for blank input");
            return Vec::new();
        }

        let pending = kinds
            .iter()
            .map(|&kind| {
                let generation = state.begin(kind);
                let request = AnalysisRequest::for_kind(kind, state.input_text(), &state.config());
                PendingOperation {
                    session: self,
                    kind,
                    generation,
                    request: Some(request),
                    settled: false,
                }
            })
            .collect::<Vec<_>>();
        drop(state);

        for operation in &pending {
            debug!(kind = %operation.kind, generation = operation.generation, "operation started");
            self.emit(SessionEvent::OperationStarted {
                kind: operation.kind,
                generation: operation.generation,
            });
        }
        pending
    }
}

/// An issued request whose in-flight mark is released exactly once, even if the
/// gateway call unwinds or the future is dropped.
struct PendingOperation<'a> {
    session: &'a AnalysisSession,
    kind: OperationKind,
    generation: u64,
    request: Option<AnalysisRequest>,
    settled: bool,
}

impl PendingOperation<'_> {
    async fn complete(mut self) {
        let kind = self.kind;
        let Some(request) = self.request.take() else {
            return;
        };

        let outcome = AssertUnwindSafe(self.session.gateway.invoke(request))
            .catch_unwind()
            .await;
        let slot = match outcome {
            Ok(Ok(result)) if result.kind() == kind => ResultSlot::Success(result),
            Ok(Ok(result)) => {
                warn!(kind = %kind, returned = %result.kind(), "gateway returned mismatched payload");
                ResultSlot::Failure(format!("unexpected {} response payload", result.kind()))
            }
            Ok(Err(err)) => {
                warn!(kind = %kind, source = ?err.source_kind(), error = %err, "operation failed");
                ResultSlot::Failure(err.user_message(kind))
            }
            Err(_) => {
                error!(kind = %kind, "gateway call panicked");
                ResultSlot::Failure(error::generic_failure_message(kind).to_string())
            }
        };
        self.settle(slot);
    }

    fn settle(&mut self, slot: ResultSlot) {
        let succeeded = matches!(slot, ResultSlot::Success(_));
        let committed = self.session.state().settle(
            self.kind,
            self.generation,
            slot,
            self.session.commit_policy,
        );
        self.settled = true;

        if committed {
            debug!(kind = %self.kind, generation = self.generation, succeeded, "operation committed");
        } else {
            info!(
                kind = %self.kind,
                generation = self.generation,
                "discarding superseded operation result"
            );
        }
        self.session.emit(SessionEvent::OperationSettled {
            kind: self.kind,
            generation: self.generation,
            succeeded,
            committed,
        });
    }
}

impl Drop for PendingOperation<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!(kind = %self.kind, generation = self.generation, "operation abandoned before settling");
            self.session.state().release(self.kind);
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
