// src/state.rs

use std::sync::Arc;

use crate::config::Config;
use crate::store::{DataStore, SharedStore};
use axum::extract::FromRef;

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub config: Config,
}

impl AppState {
    pub fn new(store: impl DataStore + 'static, config: Config) -> Self {
        Self {
            store: Arc::new(store),
            config,
        }
    }
}

impl FromRef<AppState> for SharedStore {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
