use std::sync::Arc;

use crate::dataset::TravelDataset;
use crate::settings::Settings;
use crate::wiki::WikiClient;

// Application state shared across handlers. Everything here is read-only
// after startup, so plain Arcs are enough.
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<TravelDataset>,
    pub wiki: WikiClient,
    pub settings: Arc<Settings>,
}
