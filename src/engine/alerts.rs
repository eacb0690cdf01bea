use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::info;
use uuid::Uuid;

use crate::engine::scheduler::Scheduler;
use crate::models::alert::{Alert, AlertCategory, AlertId, AlertThresholdConfig};
use crate::models::event::StreamEvent;
use crate::models::order::OrderStatus;
use crate::state::StateStore;

/// Side-effect hook fired once per newly-created alert, never on re-display.
/// The reference plays an audio cue; playback itself is a UI concern.
pub trait AlertNotifier: Send + Sync {
    fn notify(&self, alert: &Alert);
}

pub struct LogNotifier;

impl AlertNotifier for LogNotifier {
    fn notify(&self, alert: &Alert) {
        info!(alert = %alert.id, category = ?alert.category, "alert raised");
    }
}

/// Two independent alerting pipelines over one collection: a periodic scan
/// for orders stuck past their per-status threshold, and an event-triggered
/// alert per new support ticket. Threshold alerts dedup on the order id;
/// ticket alerts never dedup. Every alert expires `ttl` after creation
/// unless dismissed first.
pub struct AlertEngine {
    store: Arc<StateStore>,
    thresholds: Option<AlertThresholdConfig>,
    ticket_alerts_enabled: bool,
    ttl: chrono::Duration,
    alerts: DashMap<AlertId, Alert>,
    notifier: Arc<dyn AlertNotifier>,
}

impl AlertEngine {
    /// `thresholds` is `None` when the config document could not be fetched:
    /// the scanner pipeline stays disabled, ticket alerts default to on, and
    /// state sync is unaffected.
    pub fn new(
        store: Arc<StateStore>,
        thresholds: Option<AlertThresholdConfig>,
        ttl: chrono::Duration,
        notifier: Arc<dyn AlertNotifier>,
    ) -> Self {
        let ticket_alerts_enabled = thresholds
            .as_ref()
            .map(|config| config.new_support_ticket)
            .unwrap_or(true);

        Self {
            store,
            thresholds,
            ticket_alerts_enabled,
            ttl,
            alerts: DashMap::new(),
            notifier,
        }
    }

    /// Registers the scan and expiry timers on the given scheduler.
    pub fn start(self: Arc<Self>, scheduler: &Scheduler, scan_period: Duration, sweep_period: Duration) {
        let scanner = Arc::clone(&self);
        scheduler.schedule_repeating(scan_period, move || scanner.scan_overdue_orders());
        scheduler.schedule_repeating(sweep_period, move || self.sweep_expired());
    }

    /// One pass of the threshold scanner over the active working set.
    pub fn scan_overdue_orders(&self) {
        let Some(thresholds) = &self.thresholds else {
            return;
        };

        let now = Utc::now();
        for order in self.store.active_orders() {
            let minutes_stuck = (now - order.last_status_change_at).num_seconds() as f64 / 60.0;

            let overdue = match order.status {
                OrderStatus::Pending if minutes_stuck > f64::from(thresholds.pending) => Some((
                    AlertCategory::PendingOverdue,
                    format!(
                        "order #{} pending for over {} min",
                        order.id, thresholds.pending
                    ),
                )),
                OrderStatus::Accepted if minutes_stuck > f64::from(thresholds.accepted) => Some((
                    AlertCategory::AcceptedOverdue,
                    format!(
                        "order #{} accepted over {} min without movement",
                        order.id, thresholds.accepted
                    ),
                )),
                OrderStatus::PickingUp | OrderStatus::Delivering
                    if minutes_stuck > f64::from(thresholds.in_progress) =>
                {
                    Some((
                        AlertCategory::InProgressOverdue,
                        format!(
                            "order #{} in progress for over {} min",
                            order.id, thresholds.in_progress
                        ),
                    ))
                }
                _ => None,
            };

            if let Some((category, message)) = overdue {
                self.raise(AlertId::Order(order.id), category, message);
            }
        }
    }

    /// Event pipeline: watches the classified stream for alert-worthy events.
    pub fn observe_event(&self, event: &StreamEvent) {
        let StreamEvent::NewTicket { data } = event else {
            return;
        };
        if !self.ticket_alerts_enabled {
            return;
        }

        let message = match data.ticket_id {
            Some(ticket_id) => format!("new support ticket received, id {ticket_id}"),
            None => "new support ticket received".to_string(),
        };
        self.raise(AlertId::Ticket(Uuid::new_v4()), AlertCategory::NewTicket, message);
    }

    fn raise(&self, id: AlertId, category: AlertCategory, message: String) {
        match self.alerts.entry(id.clone()) {
            // A live alert already covers this entity; re-firing rules are
            // suppressed until it expires or is dismissed.
            Entry::Occupied(_) => {}
            Entry::Vacant(slot) => {
                let alert = Alert {
                    id,
                    category,
                    message,
                    created_at: Utc::now(),
                };
                self.notifier.notify(&alert);
                slot.insert(alert);
            }
        }
    }

    /// Drops alerts older than the TTL. Runs on a short timer so expiry does
    /// not wait for the next threshold scan.
    pub fn sweep_expired(&self) {
        let now = Utc::now();
        self.alerts.retain(|_, alert| now - alert.created_at < self.ttl);
    }

    pub fn dismiss(&self, id: &AlertId) -> bool {
        self.alerts.remove(id).is_some()
    }

    /// Live alerts in creation order.
    pub fn alerts(&self) -> Vec<Alert> {
        let mut alerts: Vec<Alert> = self
            .alerts
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        alerts.sort_by_key(|alert| alert.created_at);
        alerts
    }
}
