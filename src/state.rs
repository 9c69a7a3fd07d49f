use crate::config::Config;
use crate::predictor::Predictor;

use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Backs the server-rendered `/check` page.
    pub predictor: Arc<dyn Predictor>,
}

impl AppState {
    pub fn new(config: Config, predictor: Arc<dyn Predictor>) -> Self {
        Self { config, predictor }
    }
}
