//! Read-only projection of [`SessionState`] into what a front end draws.

use std::fmt;

use shared::domain::{AnalysisResult, OperationKind, SentimentScores};

use crate::types::{ResultSlot, SessionState};

pub const ANALYZE_ALL_LABEL: &str = "Analyze All";
pub const ANALYZING_LABEL: &str = "Analyzing...";

#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub tabs: Vec<TabHeader>,
    pub active: TabView,
    pub loading: bool,
    /// Whether the operation triggers should be enabled.
    pub can_submit: bool,
    pub analyze_all_label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabHeader {
    pub kind: OperationKind,
    pub title: &'static str,
    pub active: bool,
    pub loading: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TabView {
    pub kind: OperationKind,
    pub heading: &'static str,
    pub body: TabBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TabBody {
    Placeholder(&'static str),
    Error(String),
    Summary {
        text: String,
    },
    Classification {
        primary_category: String,
        top_categories: Vec<ScoredRow>,
    },
    Sentiment {
        label: String,
        scores: Vec<ScoredRow>,
    },
    Keywords {
        terms: Vec<RankedTerm>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredRow {
    pub label: String,
    pub percent: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedTerm {
    pub rank: usize,
    pub term: String,
}

pub fn tab_title(kind: OperationKind) -> &'static str {
    match kind {
        OperationKind::Summary => "Summary",
        OperationKind::Classification => "Classification",
        OperationKind::Sentiment => "Sentiment",
        OperationKind::Keywords => "Keywords",
    }
}

pub fn tab_heading(kind: OperationKind) -> &'static str {
    match kind {
        OperationKind::Summary => "Text Summary",
        OperationKind::Classification => "Text Classification",
        OperationKind::Sentiment => "Sentiment Analysis",
        OperationKind::Keywords => "Keyword Extraction",
    }
}

pub fn placeholder(kind: OperationKind) -> &'static str {
    match kind {
        OperationKind::Summary => {
            "No summary generated yet. Click \"Summarize\" to analyze your text."
        }
        OperationKind::Classification => {
            "No classification result yet. Click \"Classify\" to analyze your text."
        }
        OperationKind::Sentiment => {
            "No sentiment analysis yet. Click \"Sentiment\" to analyze your text."
        }
        OperationKind::Keywords => {
            "No keywords extracted yet. Click \"Keywords\" to analyze your text."
        }
    }
}

/// `0.92` -> `"92.0%"`.
pub fn format_percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

pub fn render(state: &SessionState) -> ViewModel {
    let active_tab = state.active_tab();
    let loading = state.loading();
    ViewModel {
        tabs: OperationKind::ALL
            .into_iter()
            .map(|kind| TabHeader {
                kind,
                title: tab_title(kind),
                active: kind == active_tab,
                loading: state.is_loading(kind),
            })
            .collect(),
        active: render_tab(state, active_tab),
        loading,
        can_submit: !loading && state.has_input(),
        analyze_all_label: if loading {
            ANALYZING_LABEL
        } else {
            ANALYZE_ALL_LABEL
        },
    }
}

pub fn render_tab(state: &SessionState, kind: OperationKind) -> TabView {
    let body = match state.slot(kind) {
        ResultSlot::Empty => TabBody::Placeholder(placeholder(kind)),
        ResultSlot::Failure(message) => TabBody::Error(message.clone()),
        ResultSlot::Success(result) => project(result),
    };
    TabView {
        kind,
        heading: tab_heading(kind),
        body,
    }
}

fn project(result: &AnalysisResult) -> TabBody {
    match result {
        AnalysisResult::Summary(summary) => TabBody::Summary {
            text: summary.text.clone(),
        },
        AnalysisResult::Classification(classification) => TabBody::Classification {
            primary_category: classification.primary_category.clone(),
            top_categories: classification
                .top_categories
                .iter()
                .map(|category| ScoredRow {
                    label: category.label.clone(),
                    percent: format_percent(category.confidence),
                })
                .collect(),
        },
        AnalysisResult::Sentiment(sentiment) => TabBody::Sentiment {
            label: sentiment.label.clone(),
            scores: sentiment_rows(&sentiment.scores),
        },
        AnalysisResult::Keywords(keywords) => TabBody::Keywords {
            terms: keywords
                .terms
                .iter()
                .enumerate()
                .map(|(index, term)| RankedTerm {
                    rank: index + 1,
                    term: term.clone(),
                })
                .collect(),
        },
    }
}

fn sentiment_rows(scores: &SentimentScores) -> Vec<ScoredRow> {
    [
        ("Positive", scores.positive),
        ("Neutral", scores.neutral),
        ("Negative", scores.negative),
        ("Compound", scores.compound),
    ]
    .into_iter()
    .map(|(label, value)| ScoredRow {
        label: label.to_string(),
        percent: format_percent(value),
    })
    .collect()
}

impl fmt::Display for TabView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.heading)?;
        match &self.body {
            TabBody::Placeholder(text) => writeln!(f, "{text}"),
            TabBody::Error(message) => writeln!(f, "{message}"),
            TabBody::Summary { text } => writeln!(f, "{text}"),
            TabBody::Classification {
                primary_category,
                top_categories,
            } => {
                writeln!(f, "Primary Category: {primary_category}")?;
                if !top_categories.is_empty() {
                    writeln!(f, "Top Categories:")?;
                    for row in top_categories {
                        writeln!(f, "  {}: {}", row.label, row.percent)?;
                    }
                }
                Ok(())
            }
            TabBody::Sentiment { label, scores } => {
                writeln!(f, "Overall Sentiment: {label}")?;
                writeln!(f, "Detailed Scores:")?;
                for row in scores {
                    writeln!(f, "  {}: {}", row.label, row.percent)?;
                }
                Ok(())
            }
            TabBody::Keywords { terms } if terms.is_empty() => {
                writeln!(f, "No keywords returned.")
            }
            TabBody::Keywords { terms } => {
                writeln!(f, "Top Keywords:")?;
                for term in terms {
                    writeln!(f, "  #{} {}", term.rank, term.term)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for ViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bar = self
            .tabs
            .iter()
            .map(|tab| match (tab.active, tab.loading) {
                (true, true) => format!("[{}*]", tab.title),
                (true, false) => format!("[{}]", tab.title),
                (false, true) => format!(" {}* ", tab.title),
                (false, false) => format!(" {} ", tab.title),
            })
            .collect::<Vec<_>>()
            .join("|");
        writeln!(f, "{bar}")?;
        if self.loading {
            writeln!(f, "{}", self.analyze_all_label)?;
        }
        write!(f, "{}", self.active)
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
