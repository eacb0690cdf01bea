use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::courier::CourierStatus;
use crate::models::order::Order;

/// Payload of a `DRIVER_LOCATION_UPDATE` frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverLocationUpdate {
    #[serde(rename = "id_usuario")]
    pub courier_id: String,
    #[serde(rename = "latitud")]
    pub lat: f64,
    #[serde(rename = "longitud")]
    pub lng: f64,
    #[serde(rename = "estado")]
    pub status: CourierStatus,
    #[serde(rename = "bateria_porcentaje", default)]
    pub battery_percent: Option<u8>,
}

/// The slice of a ticket payload this core cares about. The full ticket
/// object belongs to the support collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketInfo {
    #[serde(rename = "id_ticket", default)]
    pub ticket_id: Option<i64>,
    #[serde(rename = "asunto", default)]
    pub subject: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledOrderResult {
    #[serde(rename = "id", default)]
    pub order_id: Option<i64>,
    pub status: String,
}

/// Inbound frame envelope, classified by its `type` discriminant.
///
/// Frame types this consumer does not recognize land on `Unknown` and are
/// dropped by the router, so new producer-side event types never break the
/// connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StreamEvent {
    #[serde(rename = "DRIVER_LOCATION_UPDATE")]
    DriverLocation { data: DriverLocationUpdate },

    #[serde(rename = "NEW_ORDER")]
    NewOrder { data: Order },

    #[serde(rename = "ORDER_STATUS_UPDATE")]
    OrderStatusUpdate {
        #[serde(default)]
        id: Option<i64>,
        data: Order,
    },

    #[serde(rename = "ORDER_ASSIGNED")]
    OrderAssigned {
        #[serde(default)]
        id: Option<i64>,
        data: Order,
    },

    #[serde(rename = "NEW_TICKET")]
    NewTicket { data: TicketInfo },

    // Forwarded to subscribers untouched; their shape is owned elsewhere.
    #[serde(rename = "NEW_TICKET_MESSAGE")]
    NewTicketMessage { data: Value },

    #[serde(rename = "TICKET_STATUS_UPDATE")]
    TicketStatusUpdate { data: Value },

    #[serde(rename = "SCHEDULED_ORDER_PROCESSED")]
    ScheduledOrderProcessed { data: ScheduledOrderResult },

    #[serde(rename = "NEW_SYSTEM_LOG")]
    SystemLog { data: Value },

    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::order::OrderStatus;

    #[test]
    fn classifies_driver_location_frame() {
        let raw = r#"{
            "type": "DRIVER_LOCATION_UPDATE",
            "data": {
                "id_usuario": "rep-7",
                "latitud": 10.48,
                "longitud": -66.9,
                "estado": "llevando",
                "bateria_porcentaje": 81
            }
        }"#;

        match serde_json::from_str::<StreamEvent>(raw).unwrap() {
            StreamEvent::DriverLocation { data } => {
                assert_eq!(data.courier_id, "rep-7");
                assert_eq!(data.status, CourierStatus::Delivering);
                assert_eq!(data.battery_percent, Some(81));
            }
            other => panic!("unexpected classification: {other:?}"),
        }
    }

    #[test]
    fn classifies_order_update_with_top_level_id() {
        let raw = r#"{
            "type": "ORDER_STATUS_UPDATE",
            "id": 42,
            "data": {
                "id": 42,
                "estado": "entregado",
                "fecha_creacion": "2025-11-03T12:00:00Z",
                "fecha_actualizacion": "2025-11-03T12:40:00Z"
            }
        }"#;

        match serde_json::from_str::<StreamEvent>(raw).unwrap() {
            StreamEvent::OrderStatusUpdate { id, data } => {
                assert_eq!(id, Some(42));
                assert_eq!(data.status, OrderStatus::Delivered);
            }
            other => panic!("unexpected classification: {other:?}"),
        }
    }

    #[test]
    fn unrecognized_type_falls_back_to_unknown() {
        let raw = r#"{"type": "SOMETHING_NEW", "data": {"x": 1}}"#;
        let event: StreamEvent = serde_json::from_str(raw).unwrap();
        assert!(matches!(event, StreamEvent::Unknown));
    }

    #[test]
    fn missing_payload_is_a_decode_error() {
        let raw = r#"{"type": "NEW_ORDER"}"#;
        assert!(serde_json::from_str::<StreamEvent>(raw).is_err());
    }
}
