use actix_web::web;
use crm_server::db::MemoryStore;
use crm_server::{AppState, Settings};
use std::sync::Arc;

/// App state over the in-memory store, one fresh instance per test.
pub fn test_state() -> web::Data<AppState> {
    let config = Settings::new_for_test().expect("Failed to load test config");
    let store = Arc::new(MemoryStore::new());
    let state =
        AppState::with_stores(config, store.clone(), store).expect("Failed to build app state");
    web::Data::new(state)
}
