use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Html;
use serde::Deserialize;

use crate::state::AppState;
use crate::templates::page::{self, PageView};
use crate::ui::{HtmlSlot, Outcome, PredictionUi, StaticInput, Trigger};

#[derive(Deserialize)]
pub struct CheckParams {
    #[serde(default)]
    pub url: String,
}

/// Server-rendered check: runs the prediction UI against in-memory slots and
/// returns the whole page.
pub async fn check(
    State(state): State<AppState>,
    Query(params): Query<CheckParams>,
) -> Html<String> {
    let result = Arc::new(HtmlSlot::hidden());
    let features = Arc::new(HtmlSlot::hidden());
    let ui = PredictionUi::new(
        Arc::new(StaticInput(params.url.clone())),
        result.clone(),
        features.clone(),
        state.predictor.clone(),
    );

    let outcome = ui.on_trigger(Trigger::Click).await;
    if outcome != Outcome::Skipped {
        tracing::info!("[phishguard] Check for {:?}: {:?}", params.url.trim(), outcome);
    }

    Html(page::render(&PageView {
        url: params.url.trim(),
        result: result.snapshot(),
        features: features.snapshot(),
    }))
}
