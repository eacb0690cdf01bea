use std::sync::Arc;

use tracing::{debug, warn};

use crate::engine::alerts::AlertEngine;
use crate::error::AppError;
use crate::models::event::StreamEvent;
use crate::state::StateStore;

/// Validates and classifies inbound frames. A frame that fails to decode is
/// logged and dropped; it is never an excuse to tear down the connection.
pub struct MessageRouter {
    store: Arc<StateStore>,
    alerts: Arc<AlertEngine>,
}

impl MessageRouter {
    pub fn new(store: Arc<StateStore>, alerts: Arc<AlertEngine>) -> Self {
        Self { store, alerts }
    }

    pub fn route(&self, raw: &str) {
        let event = match serde_json::from_str::<StreamEvent>(raw) {
            Ok(event) => event,
            Err(err) => {
                let err = AppError::Decode(err);
                warn!(error = %err, "dropping frame");
                return;
            }
        };

        if matches!(event, StreamEvent::Unknown) {
            debug!("dropping frame with unrecognized type");
            return;
        }

        // State first, alerts second: event-triggered alerts observe the
        // post-merge world.
        self.store.apply_event(&event);
        self.alerts.observe_event(&event);
    }
}
