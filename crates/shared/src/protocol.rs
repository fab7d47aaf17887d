//! Request and response bodies exchanged with the remote analysis service.

use serde::{Deserialize, Serialize};

use crate::domain::{
    AnalysisResult, CategoryScore, ClassificationResult, KeywordsResult, SentimentResult,
    SentimentScores, SummaryResult,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarizeRequest {
    pub text: String,
    pub max_sentences: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifyRequest {
    pub text: String,
    pub top_k: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentRequest {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordsRequest {
    pub text: String,
    pub top_k: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizeResponse {
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_sentences: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredLabel {
    pub label: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyResponse {
    pub category: String,
    #[serde(default)]
    pub top: Vec<ScoredLabel>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WireSentimentScores {
    pub pos: f64,
    pub neu: f64,
    pub neg: f64,
    pub compound: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentResponse {
    pub label: String,
    pub scores: WireSentimentScores,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordsResponse {
    pub keywords: Vec<String>,
}

impl From<SummarizeResponse> for AnalysisResult {
    fn from(value: SummarizeResponse) -> Self {
        AnalysisResult::Summary(SummaryResult {
            text: value.summary,
        })
    }
}

impl From<ClassifyResponse> for AnalysisResult {
    fn from(value: ClassifyResponse) -> Self {
        AnalysisResult::Classification(ClassificationResult {
            primary_category: value.category,
            top_categories: value
                .top
                .into_iter()
                .map(|scored| CategoryScore {
                    label: scored.label,
                    confidence: scored.confidence,
                })
                .collect(),
        })
    }
}

impl From<SentimentResponse> for AnalysisResult {
    fn from(value: SentimentResponse) -> Self {
        AnalysisResult::Sentiment(SentimentResult {
            label: value.label,
            scores: SentimentScores {
                positive: value.scores.pos,
                neutral: value.scores.neu,
                negative: value.scores.neg,
                compound: value.scores.compound,
            },
        })
    }
}

impl From<KeywordsResponse> for AnalysisResult {
    fn from(value: KeywordsResponse) -> Self {
        AnalysisResult::Keywords(KeywordsResult {
            terms: value.keywords,
        })
    }
}
