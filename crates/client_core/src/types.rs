use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shared::domain::{AnalysisResult, OperationKind, RequestConfig};

use crate::error::UnknownCommitPolicy;

/// Latest outcome of one operation.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResultSlot {
    #[default]
    Empty,
    Success(AnalysisResult),
    Failure(String),
}

impl ResultSlot {
    pub fn is_empty(&self) -> bool {
        matches!(self, ResultSlot::Empty)
    }

    pub fn success(&self) -> Option<&AnalysisResult> {
        match self {
            ResultSlot::Success(result) => Some(result),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            ResultSlot::Failure(message) => Some(message),
            _ => None,
        }
    }
}

/// Exactly one slot per [`OperationKind`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultSlots([ResultSlot; 4]);

impl ResultSlots {
    pub fn get(&self, kind: OperationKind) -> &ResultSlot {
        &self.0[kind.index()]
    }

    pub(crate) fn set(&mut self, kind: OperationKind, slot: ResultSlot) {
        self.0[kind.index()] = slot;
    }

    pub fn iter(&self) -> impl Iterator<Item = (OperationKind, &ResultSlot)> {
        OperationKind::ALL
            .into_iter()
            .map(move |kind| (kind, self.get(kind)))
    }

    pub fn all_empty(&self) -> bool {
        self.0.iter().all(ResultSlot::is_empty)
    }
}

/// Which settlement of overlapping requests for the same kind is written to its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitPolicy {
    /// Every settlement is written; whichever settles last wins.
    #[default]
    LastSettled,
    /// Only the settlement of the most recently issued request is written.
    LatestIssued,
}

impl FromStr for CommitPolicy {
    type Err = UnknownCommitPolicy;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "last_settled" => Ok(CommitPolicy::LastSettled),
            "latest_issued" => Ok(CommitPolicy::LatestIssued),
            _ => Err(UnknownCommitPolicy(raw.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct OperationTrack {
    issued: u64,
    in_flight: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    input_text: String,
    config: RequestConfig,
    active_tab: OperationKind,
    results: ResultSlots,
    tracks: [OperationTrack; 4],
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(RequestConfig::default())
    }
}

impl SessionState {
    pub fn new(config: RequestConfig) -> Self {
        Self {
            input_text: String::new(),
            config,
            active_tab: OperationKind::Summary,
            results: ResultSlots::default(),
            tracks: [OperationTrack::default(); 4],
        }
    }

    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    pub fn has_input(&self) -> bool {
        !self.input_text.trim().is_empty()
    }

    pub fn config(&self) -> RequestConfig {
        self.config
    }

    pub fn active_tab(&self) -> OperationKind {
        self.active_tab
    }

    pub fn results(&self) -> &ResultSlots {
        &self.results
    }

    pub fn slot(&self, kind: OperationKind) -> &ResultSlot {
        self.results.get(kind)
    }

    /// True while any operation has a request outstanding.
    pub fn loading(&self) -> bool {
        self.tracks.iter().any(|track| track.in_flight > 0)
    }

    pub fn is_loading(&self, kind: OperationKind) -> bool {
        self.in_flight(kind) > 0
    }

    pub fn in_flight(&self, kind: OperationKind) -> u32 {
        self.tracks[kind.index()].in_flight
    }

    pub fn latest_generation(&self, kind: OperationKind) -> u64 {
        self.tracks[kind.index()].issued
    }

    pub(crate) fn set_input_text(&mut self, text: String) {
        self.input_text = text;
    }

    pub(crate) fn config_mut(&mut self) -> &mut RequestConfig {
        &mut self.config
    }

    pub(crate) fn select_tab(&mut self, kind: OperationKind) {
        self.active_tab = kind;
    }

    /// Marks a request for `kind` as outstanding and returns its generation.
    pub(crate) fn begin(&mut self, kind: OperationKind) -> u64 {
        let track = &mut self.tracks[kind.index()];
        track.issued += 1;
        track.in_flight += 1;
        track.issued
    }

    pub(crate) fn release(&mut self, kind: OperationKind) {
        let track = &mut self.tracks[kind.index()];
        track.in_flight = track.in_flight.saturating_sub(1);
    }

    /// Releases the request and, if `policy` allows, writes `slot` and focuses its tab.
    pub(crate) fn settle(
        &mut self,
        kind: OperationKind,
        generation: u64,
        slot: ResultSlot,
        policy: CommitPolicy,
    ) -> bool {
        self.release(kind);
        let commit = match policy {
            CommitPolicy::LastSettled => true,
            CommitPolicy::LatestIssued => generation == self.latest_generation(kind),
        };
        if commit {
            self.results.set(kind, slot);
            self.active_tab = kind;
        }
        commit
    }

    /// Empties the input and every slot; config and outstanding requests are untouched.
    pub(crate) fn clear(&mut self) {
        self.input_text.clear();
        self.results = ResultSlots::default();
    }

    #[cfg(test)]
    pub(crate) fn with_slot(mut self, kind: OperationKind, slot: ResultSlot) -> Self {
        self.results.set(kind, slot);
        self
    }
}

#[cfg(test)]
mod tests {
    use shared::domain::{KeywordsResult, SummaryResult};

    use super::*;

    fn keywords(terms: &[&str]) -> ResultSlot {
        ResultSlot::Success(AnalysisResult::Keywords(KeywordsResult {
            terms: terms.iter().map(|term| term.to_string()).collect(),
        }))
    }

    #[test]
    fn fresh_state_has_one_empty_slot_per_kind() {
        let state = SessionState::default();
        assert_eq!(state.results().iter().count(), 4);
        assert!(state.results().all_empty());
        assert_eq!(state.active_tab(), OperationKind::Summary);
        assert!(!state.loading());
    }

    #[test]
    fn settle_overwrites_previous_slot_without_merging() {
        let mut state = SessionState::default();
        let first = state.begin(OperationKind::Keywords);
        state.settle(
            OperationKind::Keywords,
            first,
            keywords(&["alpha", "beta"]),
            CommitPolicy::LastSettled,
        );
        let second = state.begin(OperationKind::Keywords);
        state.settle(
            OperationKind::Keywords,
            second,
            keywords(&["gamma"]),
            CommitPolicy::LastSettled,
        );
        assert_eq!(state.slot(OperationKind::Keywords), &keywords(&["gamma"]));
    }

    #[test]
    fn latest_issued_policy_discards_stale_generation() {
        let mut state = SessionState::default();
        let stale = state.begin(OperationKind::Keywords);
        let fresh = state.begin(OperationKind::Keywords);
        state.select_tab(OperationKind::Sentiment);

        assert!(state.settle(
            OperationKind::Keywords,
            fresh,
            keywords(&["fresh"]),
            CommitPolicy::LatestIssued,
        ));
        state.select_tab(OperationKind::Sentiment);
        assert!(!state.settle(
            OperationKind::Keywords,
            stale,
            keywords(&["stale"]),
            CommitPolicy::LatestIssued,
        ));

        assert_eq!(state.slot(OperationKind::Keywords), &keywords(&["fresh"]));
        assert_eq!(state.active_tab(), OperationKind::Sentiment);
        assert!(!state.loading());
    }

    #[test]
    fn selecting_a_tab_leaves_results_alone() {
        let mut state = SessionState::default().with_slot(
            OperationKind::Summary,
            ResultSlot::Success(AnalysisResult::Summary(SummaryResult {
                text: "short".into(),
            })),
        );
        let before = state.results().clone();
        state.select_tab(OperationKind::Keywords);
        assert_eq!(state.results(), &before);
    }

    #[test]
    fn clear_keeps_config_and_outstanding_requests() {
        let mut state = SessionState::new(RequestConfig::new(5, 7));
        state.set_input_text("some text".into());
        state.begin(OperationKind::Sentiment);
        state.results.set(OperationKind::Summary, ResultSlot::Failure("boom".into()));

        state.clear();

        assert_eq!(state.input_text(), "");
        assert!(state.results().all_empty());
        assert_eq!(state.config(), RequestConfig::new(5, 7));
        assert!(state.is_loading(OperationKind::Sentiment));
    }

    #[test]
    fn commit_policy_parses_kebab_and_snake_case() {
        assert_eq!(
            "latest-issued".parse::<CommitPolicy>().unwrap(),
            CommitPolicy::LatestIssued
        );
        assert_eq!(
            "LAST_SETTLED".parse::<CommitPolicy>().unwrap(),
            CommitPolicy::LastSettled
        );
        assert!("newest".parse::<CommitPolicy>().is_err());
    }
}
