use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::UnknownOperationKind;

pub const MIN_MAX_SENTENCES: u32 = 1;
pub const MAX_MAX_SENTENCES: u32 = 10;
pub const DEFAULT_MAX_SENTENCES: u32 = 3;
pub const MIN_TOP_K: u32 = 1;
pub const MAX_TOP_K: u32 = 20;
pub const DEFAULT_TOP_K: u32 = 10;
/// Breadth requested from the engine for classification; not user tunable.
pub const CLASSIFICATION_TOP_K: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Summary,
    Classification,
    Sentiment,
    Keywords,
}

impl OperationKind {
    /// All kinds in tab order.
    pub const ALL: [OperationKind; 4] = [
        OperationKind::Summary,
        OperationKind::Classification,
        OperationKind::Sentiment,
        OperationKind::Keywords,
    ];

    pub fn index(self) -> usize {
        match self {
            OperationKind::Summary => 0,
            OperationKind::Classification => 1,
            OperationKind::Sentiment => 2,
            OperationKind::Keywords => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::Summary => "summary",
            OperationKind::Classification => "classification",
            OperationKind::Sentiment => "sentiment",
            OperationKind::Keywords => "keywords",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = UnknownOperationKind;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "summary" | "summarize" => Ok(OperationKind::Summary),
            "classification" | "classify" => Ok(OperationKind::Classification),
            "sentiment" => Ok(OperationKind::Sentiment),
            "keywords" => Ok(OperationKind::Keywords),
            _ => Err(UnknownOperationKind(raw.to_string())),
        }
    }
}

/// User-tunable request parameters. Values are clamped into range on every write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestConfig {
    max_sentences: u32,
    top_k: u32,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            max_sentences: DEFAULT_MAX_SENTENCES,
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl RequestConfig {
    pub fn new(max_sentences: i64, top_k: i64) -> Self {
        Self {
            max_sentences: clamp(max_sentences, MIN_MAX_SENTENCES, MAX_MAX_SENTENCES),
            top_k: clamp(top_k, MIN_TOP_K, MAX_TOP_K),
        }
    }

    pub fn max_sentences(&self) -> u32 {
        self.max_sentences
    }

    pub fn top_k(&self) -> u32 {
        self.top_k
    }

    pub fn set_max_sentences(&mut self, value: i64) {
        self.max_sentences = clamp(value, MIN_MAX_SENTENCES, MAX_MAX_SENTENCES);
    }

    pub fn set_top_k(&mut self, value: i64) {
        self.top_k = clamp(value, MIN_TOP_K, MAX_TOP_K);
    }
}

fn clamp(value: i64, min: u32, max: u32) -> u32 {
    value.clamp(i64::from(min), i64::from(max)) as u32
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub label: String,
    /// In `[0, 1]`.
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub primary_category: String,
    pub top_categories: Vec<CategoryScore>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScores {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
    /// In `[-1, 1]`.
    pub compound: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub label: String,
    pub scores: SentimentScores,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordsResult {
    /// Most relevant first.
    pub terms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum AnalysisResult {
    Summary(SummaryResult),
    Classification(ClassificationResult),
    Sentiment(SentimentResult),
    Keywords(KeywordsResult),
}

impl AnalysisResult {
    pub fn kind(&self) -> OperationKind {
        match self {
            AnalysisResult::Summary(_) => OperationKind::Summary,
            AnalysisResult::Classification(_) => OperationKind::Classification,
            AnalysisResult::Sentiment(_) => OperationKind::Sentiment,
            AnalysisResult::Keywords(_) => OperationKind::Keywords,
        }
    }
}
