//! Predict-and-render interaction.
//!
//! `PredictionUi` owns no page state of its own: it reads the URL from an
//! injected input handle and writes into two injected render targets (the
//! result area and the feature list). Each call to [`PredictionUi::submit`]
//! goes `Idle -> Checking -> Result | Error`. Overlapping calls are not
//! guarded, so the response that arrives last is the one left on screen.

use std::sync::{Arc, Mutex};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::{FeatureValue, PredictionResponse};
use crate::predictor::Predictor;

pub const CHECKING_MESSAGE: &str = "Checking\u{2026}";
pub const FAILURE_MESSAGE: &str = "Something went wrong. Is the server running?";
pub const ADVISORY_NOTE: &str =
    "This is a machine-learning estimate based on URL features; always verify manually.";
pub const PHISHING_THRESHOLD: f64 = 0.5;

/// An element the UI writes into.
pub trait RenderTarget: Send + Sync {
    fn set_html(&self, html: String);
    fn set_hidden(&self, hidden: bool);
}

/// The URL text field.
pub trait UrlInput: Send + Sync {
    fn value(&self) -> String;
}

/// Inbound user signals.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Trigger {
    Click,
    KeyDown(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Empty input or a key other than Enter; nothing was touched.
    Skipped,
    Rendered { phishing: bool },
    Failed,
}

#[derive(Clone)]
pub struct PredictionUi {
    input: Arc<dyn UrlInput>,
    result: Arc<dyn RenderTarget>,
    features: Arc<dyn RenderTarget>,
    predictor: Arc<dyn Predictor>,
}

impl PredictionUi {
    pub fn new(
        input: Arc<dyn UrlInput>,
        result: Arc<dyn RenderTarget>,
        features: Arc<dyn RenderTarget>,
        predictor: Arc<dyn Predictor>,
    ) -> Self {
        Self {
            input,
            result,
            features,
            predictor,
        }
    }

    /// Dispatch a click or key press. Only `Enter` submits from the keyboard.
    pub async fn on_trigger(&self, trigger: Trigger) -> Outcome {
        match trigger {
            Trigger::Click => {}
            Trigger::KeyDown(ref key) if key == "Enter" => {}
            Trigger::KeyDown(_) => return Outcome::Skipped,
        }
        let url = self.input.value();
        self.submit(&url).await
    }

    pub async fn submit(&self, url: &str) -> Outcome {
        let url = url.trim();
        if url.is_empty() {
            return Outcome::Skipped;
        }

        let interaction = Uuid::new_v4();
        debug!("[phishguard] Interaction {} checking {}", interaction, url);

        self.result.set_hidden(false);
        self.result.set_html(CHECKING_MESSAGE.to_string());
        self.features.set_hidden(true);
        self.features.set_html(String::new());

        match self.predictor.predict(url).await {
            Ok(data) => {
                let phishing = is_phishing(data.phishing_probability);
                self.result.set_html(render_result(&data));
                self.features.set_html(render_features(&data));
                self.features.set_hidden(false);
                debug!(
                    "[phishguard] Interaction {} rendered (probability {})",
                    interaction, data.phishing_probability
                );
                Outcome::Rendered { phishing }
            }
            Err(e) => {
                warn!("[phishguard] Interaction {} failed: {:#}", interaction, e);
                self.result.set_html(FAILURE_MESSAGE.to_string());
                Outcome::Failed
            }
        }
    }
}

pub fn is_phishing(probability: f64) -> bool {
    probability >= PHISHING_THRESHOLD
}

/// Probability as a percentage with one decimal, e.g. `0.1234` -> `12.3%`.
pub fn fmt_prob(p: f64) -> String {
    format!("{:.1}%", p * 100.0)
}

pub fn fmt_feature_value(value: &FeatureValue) -> String {
    match value {
        FeatureValue::Numeric(n) => format!("{:.4}", n),
        FeatureValue::Text(s) => escape_html(s),
    }
}

pub fn feature_card(name: &str, value: &FeatureValue) -> String {
    format!(
        r#"<div class="feature">
    <h4>{}</h4>
    <div class="value">{}</div>
  </div>"#,
        escape_html(name),
        fmt_feature_value(value)
    )
}

fn render_result(data: &PredictionResponse) -> String {
    let (class, label) = if is_phishing(data.phishing_probability) {
        ("phish", "Likely Phishing")
    } else {
        ("safe", "Likely Safe")
    };
    format!(
        r#"
        <span class="badge {class}">{label}</span>
        <strong>Risk:</strong> {risk}
        <div class="muted small">{note}</div>
      "#,
        risk = fmt_prob(data.phishing_probability),
        note = ADVISORY_NOTE,
    )
}

fn render_features(data: &PredictionResponse) -> String {
    data.features
        .iter()
        .map(|(k, v)| feature_card(k, v))
        .collect()
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// In-memory render target used for server-side rendering.
pub struct HtmlSlot {
    state: Mutex<SlotState>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SlotState {
    pub html: String,
    pub hidden: bool,
}

impl HtmlSlot {
    pub fn hidden() -> Self {
        Self {
            state: Mutex::new(SlotState {
                html: String::new(),
                hidden: true,
            }),
        }
    }

    pub fn snapshot(&self) -> SlotState {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl RenderTarget for HtmlSlot {
    fn set_html(&self, html: String) {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .html = html;
    }

    fn set_hidden(&self, hidden: bool) {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .hidden = hidden;
    }
}

/// Input whose value is fixed at construction, e.g. a submitted form field.
pub struct StaticInput(pub String);

impl UrlInput for StaticInput {
    fn value(&self) -> String {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    struct FakePredictor {
        body: Option<serde_json::Value>,
        calls: AtomicUsize,
    }

    impl FakePredictor {
        fn returning(body: serde_json::Value) -> Arc<Self> {
            Arc::new(Self {
                body: Some(body),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                body: None,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Predictor for FakePredictor {
        async fn predict(&self, _url: &str) -> anyhow::Result<PredictionResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.body {
                Some(body) => Ok(serde_json::from_value(body.clone())?),
                None => anyhow::bail!("connection refused"),
            }
        }

        fn describe(&self) -> String {
            "fake".to_string()
        }
    }

    struct Page {
        ui: PredictionUi,
        result: Arc<HtmlSlot>,
        features: Arc<HtmlSlot>,
    }

    fn page(input: &str, predictor: Arc<dyn Predictor>) -> Page {
        let result = Arc::new(HtmlSlot::hidden());
        let features = Arc::new(HtmlSlot::hidden());
        let ui = PredictionUi::new(
            Arc::new(StaticInput(input.to_string())),
            result.clone(),
            features.clone(),
            predictor,
        );
        Page {
            ui,
            result,
            features,
        }
    }

    fn body(p: f64) -> serde_json::Value {
        json!({ "phishing_probability": p, "features": {} })
    }

    #[test]
    fn formats_probability_with_one_decimal() {
        assert_eq!(fmt_prob(0.5), "50.0%");
        assert_eq!(fmt_prob(0.999), "99.9%");
        assert_eq!(fmt_prob(0.1234), "12.3%");
        assert_eq!(fmt_prob(0.0), "0.0%");
    }

    #[test]
    fn numeric_features_use_four_decimals() {
        assert_eq!(fmt_feature_value(&FeatureValue::Numeric(1.0)), "1.0000");
        assert_eq!(fmt_feature_value(&FeatureValue::Numeric(3.14159265)), "3.1416");
        assert_eq!(fmt_feature_value(&FeatureValue::Text("true".into())), "true");
    }

    #[test]
    fn feature_card_escapes_markup() {
        let card = feature_card("<b>", &FeatureValue::Text("a&b".into()));
        assert!(card.contains("<h4>&lt;b&gt;</h4>"));
        assert!(card.contains(r#"<div class="value">a&amp;b</div>"#));
    }

    #[tokio::test]
    async fn threshold_is_inclusive() {
        let p = page("example.com", FakePredictor::returning(body(0.4999)));
        assert_eq!(p.ui.submit("example.com").await, Outcome::Rendered { phishing: false });
        assert!(p.result.snapshot().html.contains("Likely Safe"));

        let p = page("example.com", FakePredictor::returning(body(0.5)));
        assert_eq!(p.ui.submit("example.com").await, Outcome::Rendered { phishing: true });
        let html = p.result.snapshot().html;
        assert!(html.contains(r#"<span class="badge phish">Likely Phishing</span>"#));
        assert!(html.contains("50.0%"));
        assert!(html.contains(ADVISORY_NOTE));
    }

    #[tokio::test]
    async fn blank_input_does_nothing() {
        let predictor = FakePredictor::returning(body(0.9));
        let p = page("   ", predictor.clone());
        assert_eq!(p.ui.on_trigger(Trigger::Click).await, Outcome::Skipped);
        assert_eq!(p.ui.submit("").await, Outcome::Skipped);
        assert_eq!(predictor.calls.load(Ordering::SeqCst), 0);
        assert_eq!(p.result.snapshot(), HtmlSlot::hidden().snapshot());
        assert_eq!(p.features.snapshot(), HtmlSlot::hidden().snapshot());
    }

    #[tokio::test]
    async fn renders_feature_cards_in_order() {
        let predictor = FakePredictor::returning(json!({
            "phishing_probability": 0.87,
            "features": { "length": 23, "has_ip": "yes" }
        }));
        let p = page(" http://x.test ", predictor);
        assert_eq!(
            p.ui.on_trigger(Trigger::Click).await,
            Outcome::Rendered { phishing: true }
        );

        let features = p.features.snapshot();
        assert!(!features.hidden);
        let length = features.html.find("<h4>length</h4>").expect("length card");
        let has_ip = features.html.find("<h4>has_ip</h4>").expect("has_ip card");
        assert!(length < has_ip);
        assert!(features.html.contains(r#"<div class="value">23.0000</div>"#));
        assert!(features.html.contains(r#"<div class="value">yes</div>"#));
        assert!(p.result.snapshot().html.contains("87.0%"));
    }

    #[tokio::test]
    async fn failure_shows_fallback_and_keeps_features_hidden() {
        let predictor = FakePredictor::failing();
        let p = page("example.com", predictor.clone());
        assert_eq!(p.ui.on_trigger(Trigger::Click).await, Outcome::Failed);
        assert_eq!(predictor.calls.load(Ordering::SeqCst), 1);

        let result = p.result.snapshot();
        assert_eq!(result.html, FAILURE_MESSAGE);
        assert!(!result.hidden);
        let features = p.features.snapshot();
        assert!(features.hidden);
        assert!(features.html.is_empty());
    }

    #[tokio::test]
    async fn failure_clears_previous_features() {
        let good = page("example.com", FakePredictor::returning(body(0.1)));
        good.ui.submit("example.com").await;
        let ui = PredictionUi::new(
            Arc::new(StaticInput("example.com".into())),
            good.result.clone(),
            good.features.clone(),
            FakePredictor::failing(),
        );
        assert_eq!(ui.submit("example.com").await, Outcome::Failed);
        assert!(good.features.snapshot().hidden);
    }

    #[tokio::test]
    async fn only_enter_key_submits() {
        let predictor = FakePredictor::returning(body(0.2));
        let p = page("example.com", predictor.clone());
        assert_eq!(
            p.ui.on_trigger(Trigger::KeyDown("a".into())).await,
            Outcome::Skipped
        );
        assert_eq!(predictor.calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            p.ui.on_trigger(Trigger::KeyDown("Enter".into())).await,
            Outcome::Rendered { phishing: false }
        );
        assert_eq!(predictor.calls.load(Ordering::SeqCst), 1);
    }

    struct GatedPredictor {
        gate: Notify,
    }

    #[async_trait]
    impl Predictor for GatedPredictor {
        async fn predict(&self, url: &str) -> anyhow::Result<PredictionResponse> {
            let p = if url == "slow.test" {
                self.gate.notified().await;
                0.9
            } else {
                0.1
            };
            Ok(serde_json::from_value(body(p))?)
        }

        fn describe(&self) -> String {
            "gated".to_string()
        }
    }

    #[tokio::test]
    async fn last_response_to_arrive_wins() {
        let predictor = Arc::new(GatedPredictor {
            gate: Notify::new(),
        });
        let p = page("", predictor.clone());

        let slow_ui = p.ui.clone();
        let slow = tokio::spawn(async move { slow_ui.submit("slow.test").await });
        tokio::task::yield_now().await;

        assert_eq!(
            p.ui.submit("fast.test").await,
            Outcome::Rendered { phishing: false }
        );
        predictor.gate.notify_one();
        assert_eq!(slow.await.expect("join"), Outcome::Rendered { phishing: true });
        assert!(p.result.snapshot().html.contains("Likely Phishing"));
    }
}
