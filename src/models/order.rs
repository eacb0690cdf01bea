use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    #[serde(rename = "pendiente")]
    Pending,
    #[serde(rename = "aceptado")]
    Accepted,
    #[serde(rename = "retirando")]
    PickingUp,
    #[serde(rename = "llevando")]
    Delivering,
    #[serde(rename = "entregado")]
    Delivered,
    #[serde(rename = "cancelado")]
    Cancelled,
    #[serde(rename = "con_novedad")]
    Flagged,
}

impl OrderStatus {
    /// Whether the order belongs to the live working set. Matches the
    /// bootstrap filter: everything except delivered and cancelled.
    pub fn is_active(self) -> bool {
        !matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    #[serde(rename = "estado")]
    pub status: OrderStatus,
    #[serde(rename = "fecha_creacion")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "fecha_actualizacion")]
    pub last_status_change_at: DateTime<Utc>,
    /// Weak reference: the courier may or may not exist in the courier map.
    #[serde(rename = "repartidor_id", default)]
    pub assigned_courier_id: Option<String>,
    #[serde(rename = "nombre_comercio", default)]
    pub merchant_name: Option<String>,
    #[serde(rename = "pedido", default)]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_wire_order() {
        let order: Order = serde_json::from_str(
            r#"{
                "id": 42,
                "estado": "pendiente",
                "fecha_creacion": "2025-11-03T12:00:00Z",
                "fecha_actualizacion": "2025-11-03T12:05:00Z",
                "repartidor_id": null,
                "nombre_comercio": "La Esquina",
                "pedido": "2x empanadas"
            }"#,
        )
        .unwrap();

        assert_eq!(order.id, 42);
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.assigned_courier_id.is_none());
        assert_eq!(order.merchant_name.as_deref(), Some("La Esquina"));
    }

    #[test]
    fn terminal_statuses_leave_the_active_set() {
        assert!(OrderStatus::Pending.is_active());
        assert!(OrderStatus::Flagged.is_active());
        assert!(!OrderStatus::Delivered.is_active());
        assert!(!OrderStatus::Cancelled.is_active());
    }
}
