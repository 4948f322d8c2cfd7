//! Adapters to sentiment models.

use async_trait::async_trait;
use reqwest::Client;
use sentinel_core::error::SentimentError;
use sentinel_core::traits::SentimentScorer;
use sentinel_core::types::{SentimentLabel, SentimentResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_INFERENCE_URL: &str = "https://api-inference.huggingface.co/models";
pub const DEFAULT_MODEL: &str = "mrm8488/distilroberta-finetuned-financial-news-sentiment-analysis";

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
struct Classification {
    label: String,
    score: f64,
}

/// The text-classification endpoint nests results one level deep for single
/// inputs, but some deployments return the flat list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Nested(Vec<Vec<Classification>>),
    Flat(Vec<Classification>),
}

impl InferenceResponse {
    fn best(self) -> Result<SentimentResult, SentimentError> {
        let candidates = match self {
            InferenceResponse::Nested(outer) => outer.into_iter().flatten().collect::<Vec<_>>(),
            InferenceResponse::Flat(list) => list,
        };

        let best = candidates
            .into_iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .ok_or(SentimentError::EmptyResponse)?;

        SentimentResult::new(best.label.parse()?, best.score)
    }
}

/// Scores text with a hosted Hugging Face text-classification model.
pub struct HuggingFaceScorer {
    client: Client,
    endpoint: String,
    api_token: String,
    timeout: Duration,
}

impl HuggingFaceScorer {
    pub fn new(
        base_url: &str,
        model: &str,
        api_token: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}/{}", base_url.trim_end_matches('/'), model),
            api_token: api_token.into(),
            timeout,
        }
    }
}

#[async_trait]
impl SentimentScorer for HuggingFaceScorer {
    async fn score(&self, text: &str) -> Result<SentimentResult, SentimentError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_token)
            .timeout(self.timeout)
            .json(&InferenceRequest { inputs: text })
            .send()
            .await
            .map_err(|e| SentimentError::Request(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(SentimentError::Request(format!("{}: {}", status, body)));
        }

        let parsed: InferenceResponse = resp
            .json()
            .await
            .map_err(|e| SentimentError::Request(e.to_string()))?;

        let result = parsed.best()?;
        debug!("Scored {:?} as {} ({:.2})", text, result.label(), result.confidence());
        Ok(result)
    }

    fn name(&self) -> &str {
        "huggingface"
    }
}

const POSITIVE_CUES: &[&str] = &[
    "adopt", "adopts", "adoption", "approval", "approve", "approved", "approves", "bullish",
    "gain", "gains", "inflow", "inflows", "jump", "jumps", "launch", "launches", "partnership",
    "rallies", "rally", "record", "soar", "soars", "surge", "surges", "upgrade", "wins",
];

const NEGATIVE_CUES: &[&str] = &[
    "ban", "banned", "bans", "bankrupt", "bankruptcy", "bearish", "crackdown", "crash",
    "crashes", "delist", "denied", "denies", "drop", "drops", "dump", "dumps", "exploit",
    "fraud", "hack", "hacked", "lawsuit", "liquidation", "liquidations", "outflow", "outflows",
    "plunge", "plunges", "reject", "rejected", "rejects", "selloff", "sued", "sues",
];

/// Deterministic keyword scorer for offline runs.
///
/// Confidence grows with the number of agreeing cues: one cue gives 0.75, two
/// give 0.875, and so on towards 1. Mixed or absent cues are neutral.
#[derive(Debug, Clone, Default)]
pub struct LexiconScorer;

impl LexiconScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, text: &str) -> Result<SentimentResult, SentimentError> {
        let lowered = text.to_lowercase();
        let (mut pos, mut neg) = (0i32, 0i32);
        for word in lowered.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()) {
            if POSITIVE_CUES.contains(&word) {
                pos += 1;
            } else if NEGATIVE_CUES.contains(&word) {
                neg += 1;
            }
        }

        let hits = pos + neg;
        let net = pos - neg;
        if net == 0 {
            let confidence = if hits == 0 { 0.5 } else { 0.6 };
            return SentimentResult::new(SentimentLabel::Neutral, confidence);
        }

        let dominance = net.unsigned_abs() as f64 / hits as f64;
        let strength = 1.0 - 0.5f64.powi(net.abs());
        let label = if net > 0 {
            SentimentLabel::Positive
        } else {
            SentimentLabel::Negative
        };

        SentimentResult::new(label, 0.5 + 0.5 * dominance * strength)
    }
}

#[async_trait]
impl SentimentScorer for LexiconScorer {
    async fn score(&self, text: &str) -> Result<SentimentResult, SentimentError> {
        self.classify(text)
    }

    fn name(&self) -> &str {
        "lexicon"
    }
}
