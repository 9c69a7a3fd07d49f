use anyhow::Context;
use async_trait::async_trait;

use std::sync::Arc;

use crate::config::Config;
use crate::features;
use crate::models::{PredictionOutput, PredictionRequest, PredictionResponse};
use crate::scorer;

pub const PREDICT_PATH: &str = "/api/predict";

/// Source of predictions for the UI.
#[async_trait]
pub trait Predictor: Send + Sync {
    async fn predict(&self, url: &str) -> anyhow::Result<PredictionResponse>;

    /// Short description for logs and `/health`.
    fn describe(&self) -> String;
}

/// Calls a remote `/api/predict` endpoint.
#[derive(Clone)]
pub struct HttpPredictor {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpPredictor {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), PREDICT_PATH),
        })
    }
}

#[async_trait]
impl Predictor for HttpPredictor {
    async fn predict(&self, url: &str) -> anyhow::Result<PredictionResponse> {
        let body = PredictionRequest {
            url: url.to_string(),
        };
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("POST {} failed", self.endpoint))?
            .error_for_status()?;

        resp.json::<PredictionResponse>()
            .await
            .context("Failed to parse prediction response")
    }

    fn describe(&self) -> String {
        format!("remote ({})", self.endpoint)
    }
}

/// Predictor backing the UI: the server's own `/api/predict` at `BASE_URL`,
/// or the service at `PREDICTOR_URL` when one is configured.
pub fn from_config(config: &Config) -> anyhow::Result<Arc<dyn Predictor>> {
    let base = config.predictor_url.as_deref().unwrap_or(&config.base_url);
    Ok(Arc::new(HttpPredictor::new(base)?))
}

/// Scores URLs in-process with the heuristic scorer.
#[derive(Clone, Copy, Default)]
pub struct LocalPredictor;

impl LocalPredictor {
    pub fn score(url: &str) -> PredictionOutput {
        let url = url.trim();
        let feats = features::extract(url);
        let probability = scorer::heuristic_score(&feats);
        PredictionOutput {
            url: url.to_string(),
            label: scorer::label(probability),
            phishing_probability: probability,
            features: feats.to_map(),
        }
    }
}

#[async_trait]
impl Predictor for LocalPredictor {
    async fn predict(&self, url: &str) -> anyhow::Result<PredictionResponse> {
        Ok(Self::score(url).into())
    }

    fn describe(&self) -> String {
        "local heuristic".to_string()
    }
}
