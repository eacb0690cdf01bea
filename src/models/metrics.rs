use serde::{Deserialize, Serialize};

/// Dashboard headline counters. Derived state: mutated by field-level patches
/// as events arrive, fully replaced only at snapshot hydration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsAggregate {
    #[serde(rename = "pedidos_hoy", default)]
    pub orders_today: u32,
    #[serde(rename = "pedidos_completados_hoy", default)]
    pub completed_today: u32,
    #[serde(rename = "drivers_activos", default)]
    pub active_couriers: u32,
    #[serde(rename = "tickets_abiertos", default)]
    pub open_tickets: u32,
}
