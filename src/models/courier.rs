use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

/// Courier state as reported by the field app. The wire value is free text,
/// so anything outside the known set is preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CourierStatus {
    Available,
    Accepted,
    PickingUp,
    Delivering,
    Disconnected,
    Other(String),
}

impl From<String> for CourierStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "disponible" => CourierStatus::Available,
            "aceptado" => CourierStatus::Accepted,
            "retirando" => CourierStatus::PickingUp,
            "llevando" => CourierStatus::Delivering,
            "desconectado" => CourierStatus::Disconnected,
            _ => CourierStatus::Other(raw),
        }
    }
}

impl From<CourierStatus> for String {
    fn from(status: CourierStatus) -> Self {
        match status {
            CourierStatus::Available => "disponible".to_string(),
            CourierStatus::Accepted => "aceptado".to_string(),
            CourierStatus::PickingUp => "retirando".to_string(),
            CourierStatus::Delivering => "llevando".to_string(),
            CourierStatus::Disconnected => "desconectado".to_string(),
            CourierStatus::Other(raw) => raw,
        }
    }
}

/// A tracked field agent. Couriers are created on first sighting (snapshot or
/// location event) and never deleted; "inactive" is purely a function of
/// `last_seen_at` age at read time.
///
/// `last_seen_at` is stamped with event *processing* time, not a payload
/// timestamp, so a late-arriving stale update can look fresh. Known gap,
/// carried deliberately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Courier {
    pub id: String,
    pub display_name: String,
    pub position: Position,
    pub status: CourierStatus,
    pub battery_percent: Option<u8>,
    pub last_seen_at: Option<DateTime<Utc>>,
}

impl Courier {
    pub fn is_active(&self, now: DateTime<Utc>, window: chrono::Duration) -> bool {
        match self.last_seen_at {
            Some(last_seen) => now - last_seen < window,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_known_values() {
        for raw in ["disponible", "aceptado", "retirando", "llevando", "desconectado"] {
            let status = CourierStatus::from(raw.to_string());
            assert_eq!(String::from(status), raw);
        }
    }

    #[test]
    fn status_preserves_free_text() {
        let status = CourierStatus::from("en_pausa".to_string());
        assert_eq!(status, CourierStatus::Other("en_pausa".to_string()));
        assert_eq!(String::from(status), "en_pausa");
    }

    #[test]
    fn courier_without_sighting_is_inactive() {
        let courier = Courier {
            id: "c-1".to_string(),
            display_name: "c-1".to_string(),
            position: Position { lat: 0.0, lng: 0.0 },
            status: CourierStatus::Available,
            battery_percent: None,
            last_seen_at: None,
        };
        assert!(!courier.is_active(Utc::now(), chrono::Duration::minutes(10)));
    }
}
