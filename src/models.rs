use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PredictionRequest {
    #[serde(default)]
    pub url: String,
}

/// A single feature value as shown to the user.
#[derive(Clone, Debug, PartialEq)]
pub enum FeatureValue {
    Numeric(f64),
    Text(String),
}

impl From<Value> for FeatureValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(n) => match n.as_f64() {
                Some(f) => FeatureValue::Numeric(f),
                None => FeatureValue::Text(n.to_string()),
            },
            Value::String(s) => FeatureValue::Text(s),
            other => FeatureValue::Text(other.to_string()),
        }
    }
}

#[derive(Deserialize)]
struct RawPredictionResponse {
    phishing_probability: f64,
    features: Map<String, Value>,
}

/// Prediction returned by `/api/predict`. Feature order is the order the
/// entries appeared in the response body.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(from = "RawPredictionResponse")]
pub struct PredictionResponse {
    pub phishing_probability: f64,
    pub features: Vec<(String, FeatureValue)>,
}

impl From<RawPredictionResponse> for PredictionResponse {
    fn from(raw: RawPredictionResponse) -> Self {
        Self {
            phishing_probability: raw.phishing_probability,
            features: raw
                .features
                .into_iter()
                .map(|(k, v)| (k, FeatureValue::from(v)))
                .collect(),
        }
    }
}

/// Body produced by the server's `/api/predict` handler.
#[derive(Clone, Debug, Serialize)]
pub struct PredictionOutput {
    pub url: String,
    pub label: u8,
    pub phishing_probability: f64,
    pub features: Map<String, Value>,
}

impl From<PredictionOutput> for PredictionResponse {
    fn from(out: PredictionOutput) -> Self {
        RawPredictionResponse {
            phishing_probability: out.phishing_probability,
            features: out.features,
        }
        .into()
    }
}
