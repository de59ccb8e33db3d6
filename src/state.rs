use std::sync::Arc;

use crate::{store::UserStore, telemetry::Telemetry};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub telemetry: Arc<dyn Telemetry>,
}

impl AppState {
    pub fn new(store: Arc<dyn UserStore>, telemetry: Arc<dyn Telemetry>) -> Self {
        Self { store, telemetry }
    }
}
