use std::sync::Arc;

use crate::store::BookingStore;

/// Shared handler state. The store handle is the only thing requests share.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BookingStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self { store }
    }
}
