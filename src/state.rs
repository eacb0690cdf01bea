use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::{broadcast, watch};

use crate::models::courier::{Courier, Position};
use crate::models::event::{DriverLocationUpdate, StreamEvent};
use crate::models::metrics::MetricsAggregate;
use crate::models::order::{Order, OrderStatus};
use crate::snapshot::Snapshot;

/// The authoritative in-memory fleet model.
///
/// Couriers and orders are upserted by id with field-level last-write-wins;
/// the stream provides no ordering guarantee and the store does not reorder.
/// Metrics live behind a `watch` channel so unchanged recomputes produce no
/// downstream notification, and every recognized event is re-broadcast for
/// observers outside this core (ticket views, live panels).
pub struct StateStore {
    couriers: DashMap<String, Courier>,
    orders: DashMap<i64, Order>,
    active_window: chrono::Duration,
    metrics_tx: watch::Sender<MetricsAggregate>,
    last_event_tx: watch::Sender<Option<StreamEvent>>,
    events_tx: broadcast::Sender<StreamEvent>,
}

impl StateStore {
    pub fn new(active_window: chrono::Duration, event_buffer_size: usize) -> Self {
        let (metrics_tx, _) = watch::channel(MetricsAggregate::default());
        let (last_event_tx, _) = watch::channel(None);
        let (events_tx, _) = broadcast::channel(event_buffer_size);

        Self {
            couriers: DashMap::new(),
            orders: DashMap::new(),
            active_window,
            metrics_tx,
            last_event_tx,
            events_tx,
        }
    }

    /// Full replace from the bootstrap snapshot. The only place the metrics
    /// aggregate is overwritten wholesale rather than patched.
    pub fn hydrate(&self, snapshot: Snapshot) {
        self.couriers.clear();
        for courier in snapshot.couriers {
            self.couriers.insert(courier.id.clone(), courier);
        }

        self.orders.clear();
        for order in snapshot.orders {
            self.orders.insert(order.id, order);
        }

        self.metrics_tx.send_replace(snapshot.metrics);
        self.recompute_activity();
    }

    pub fn apply_event(&self, event: &StreamEvent) {
        match event {
            StreamEvent::DriverLocation { data } => self.upsert_courier(data),
            StreamEvent::NewOrder { data } => self.insert_order(data),
            StreamEvent::OrderStatusUpdate { data, .. }
            | StreamEvent::OrderAssigned { data, .. } => self.upsert_order(data),
            StreamEvent::NewTicket { .. } => {
                self.metrics_tx.send_if_modified(|metrics| {
                    metrics.open_tickets += 1;
                    true
                });
            }
            // Forward-only event types carry no core state.
            StreamEvent::NewTicketMessage { .. }
            | StreamEvent::TicketStatusUpdate { .. }
            | StreamEvent::ScheduledOrderProcessed { .. }
            | StreamEvent::SystemLog { .. } => {}
            StreamEvent::Unknown => return,
        }

        self.last_event_tx.send_replace(Some(event.clone()));
        let _ = self.events_tx.send(event.clone());
    }

    fn upsert_courier(&self, update: &DriverLocationUpdate) {
        // Processing time, not a payload timestamp: a stale update that
        // arrives late will look fresh. Carried from the source behavior.
        let now = Utc::now();

        match self.couriers.entry(update.courier_id.clone()) {
            Entry::Occupied(mut entry) => {
                let courier = entry.get_mut();
                courier.position = Position {
                    lat: update.lat,
                    lng: update.lng,
                };
                courier.status = update.status.clone();
                courier.battery_percent = update.battery_percent;
                courier.last_seen_at = Some(now);
            }
            Entry::Vacant(entry) => {
                entry.insert(Courier {
                    id: update.courier_id.clone(),
                    display_name: update.courier_id.clone(),
                    position: Position {
                        lat: update.lat,
                        lng: update.lng,
                    },
                    status: update.status.clone(),
                    battery_percent: update.battery_percent,
                    last_seen_at: Some(now),
                });
            }
        }

        self.recompute_activity();
    }

    fn insert_order(&self, order: &Order) {
        self.orders.insert(order.id, order.clone());

        // No idempotency key on the counter: a duplicate NEW_ORDER replaces
        // the map entry but still bumps the total. Accepted limitation.
        self.metrics_tx.send_if_modified(|metrics| {
            metrics.orders_today += 1;
            true
        });
    }

    fn upsert_order(&self, updated: &Order) {
        // The previous status is read inside the entry lock, atomically with
        // the replace, so the delivered-boundary count cannot double-fire
        // under concurrent updates for the same order.
        let completed_delta = match self.orders.entry(updated.id) {
            Entry::Occupied(mut entry) => {
                let was_delivered = entry.get().status == OrderStatus::Delivered;
                entry.insert(updated.clone());
                let is_delivered = updated.status == OrderStatus::Delivered;
                match (was_delivered, is_delivered) {
                    (false, true) => 1,
                    (true, false) => -1,
                    _ => 0,
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(updated.clone());
                i32::from(updated.status == OrderStatus::Delivered)
            }
        };

        if completed_delta != 0 {
            self.metrics_tx.send_if_modified(|metrics| {
                if completed_delta > 0 {
                    metrics.completed_today += 1;
                } else {
                    metrics.completed_today = metrics.completed_today.saturating_sub(1);
                }
                true
            });
        }
    }

    /// Recounts active couriers against the rolling window. Returns whether
    /// the count changed; when it did not, no watcher is notified. Driven
    /// inline by location events and by a periodic timer, because a courier
    /// can age out with no event traffic at all.
    pub fn recompute_activity(&self) -> bool {
        let now = Utc::now();
        let active = self
            .couriers
            .iter()
            .filter(|entry| entry.value().is_active(now, self.active_window))
            .count() as u32;

        self.metrics_tx.send_if_modified(|metrics| {
            if metrics.active_couriers == active {
                false
            } else {
                metrics.active_couriers = active;
                true
            }
        })
    }

    pub fn metrics(&self) -> MetricsAggregate {
        self.metrics_tx.borrow().clone()
    }

    pub fn watch_metrics(&self) -> watch::Receiver<MetricsAggregate> {
        self.metrics_tx.subscribe()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StreamEvent> {
        self.events_tx.subscribe()
    }

    /// The most recent recognized event, for observers that attach late.
    pub fn last_event(&self) -> Option<StreamEvent> {
        self.last_event_tx.borrow().clone()
    }

    pub fn courier(&self, id: &str) -> Option<Courier> {
        self.couriers.get(id).map(|entry| entry.value().clone())
    }

    pub fn couriers(&self) -> Vec<Courier> {
        self.couriers
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    pub fn order(&self, id: i64) -> Option<Order> {
        self.orders.get(&id).map(|entry| entry.value().clone())
    }

    pub fn orders(&self) -> Vec<Order> {
        self.orders
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// The live working set, newest first.
    pub fn active_orders(&self) -> Vec<Order> {
        let mut active: Vec<Order> = self
            .orders
            .iter()
            .filter(|entry| entry.value().status.is_active())
            .map(|entry| entry.value().clone())
            .collect();
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        active
    }
}
