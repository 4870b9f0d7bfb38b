//! Same-unit judgment over adjacent text fragments.

use async_trait::async_trait;
use common::error::AppError;
use serde::{Deserialize, Serialize};

/// Candidate label meaning the two fragments form one continuous passage.
pub const SAME_UNIT_LABEL: &str = "в одном предложении";
/// Candidate label meaning the fragments are separate passages.
pub const DIFFERENT_UNIT_LABEL: &str = "в разных предложениях";

/// Binary judgment of whether two adjacent fragments belong to the same
/// semantic unit. One inference call per invocation; this is the dominant
/// cost of the merge loop. Failures must propagate: silently assuming
/// either answer corrupts chunk boundaries.
#[async_trait]
pub trait SameUnitClassifier: Send + Sync {
    async fn judge(&self, premise: &str, hypothesis: &str) -> Result<bool, AppError>;
}

/// Zero-shot NLI classifier speaking the Hugging Face inference wire
/// format. The model instance behind the endpoint is read-only and can
/// be shared across concurrent document runs.
pub struct ZeroShotNliClassifier {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_token: Option<String>,
}

#[derive(Serialize)]
struct ZeroShotRequest<'a> {
    inputs: &'a str,
    parameters: ZeroShotParameters<'a>,
}

#[derive(Serialize)]
struct ZeroShotParameters<'a> {
    candidate_labels: Vec<&'a str>,
    multi_label: bool,
}

#[derive(Deserialize)]
struct ZeroShotResponse {
    labels: Vec<String>,
    scores: Vec<f64>,
}

impl ZeroShotNliClassifier {
    pub fn new(base_url: &str, model: &str, api_token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_token,
        }
    }
}

#[async_trait]
impl SameUnitClassifier for ZeroShotNliClassifier {
    async fn judge(&self, premise: &str, hypothesis: &str) -> Result<bool, AppError> {
        let input = format!("{premise}\n\n{hypothesis}");
        let request = ZeroShotRequest {
            inputs: &input,
            parameters: ZeroShotParameters {
                candidate_labels: vec![SAME_UNIT_LABEL, DIFFERENT_UNIT_LABEL],
                multi_label: false,
            },
        };

        let url = format!("{}/models/{}", self.base_url, self.model);
        let mut builder = self.client.post(&url).json(&request);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?.error_for_status()?;
        let parsed: ZeroShotResponse = response.json().await?;
        decide(&parsed.labels, &parsed.scores)
    }
}

/// Argmax over the returned score distribution; the judgment is positive
/// iff the winning label is the same-unit one.
fn decide(labels: &[String], scores: &[f64]) -> Result<bool, AppError> {
    if labels.is_empty() || labels.len() != scores.len() {
        return Err(AppError::Classifier(format!(
            "malformed zero-shot response: {} labels, {} scores",
            labels.len(),
            scores.len()
        )));
    }

    let mut best = 0;
    for (i, score) in scores.iter().enumerate() {
        if *score > scores[best] {
            best = i;
        }
    }
    Ok(labels[best] == SAME_UNIT_LABEL)
}
