use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::AppError;
use crate::models::courier::{Courier, CourierStatus, Position};
use crate::models::metrics::MetricsAggregate;
use crate::models::order::Order;

/// Status filter for the bootstrap order fetch: the live working set only.
const ACTIVE_ORDER_STATUSES: &str = "pendiente,aceptado,retirando,llevando,con_novedad";
const ORDER_FETCH_LIMIT: u32 = 50;

/// One courier row from the detailed roster endpoint.
#[derive(Debug, Deserialize)]
struct CourierRecord {
    id_usuario: String,
    #[serde(default)]
    nombre_display: Option<String>,
    #[serde(default)]
    ultima_latitud: Option<f64>,
    #[serde(default)]
    ultima_longitud: Option<f64>,
    #[serde(default)]
    estado_actual: Option<CourierStatus>,
    #[serde(default)]
    ultima_bateria_porcentaje: Option<u8>,
    #[serde(default)]
    ultima_actualizacion_loc: Option<DateTime<Utc>>,
}

impl From<CourierRecord> for Courier {
    fn from(record: CourierRecord) -> Self {
        Courier {
            display_name: record
                .nombre_display
                .unwrap_or_else(|| record.id_usuario.clone()),
            id: record.id_usuario,
            position: Position {
                lat: record.ultima_latitud.unwrap_or_default(),
                lng: record.ultima_longitud.unwrap_or_default(),
            },
            status: record.estado_actual.unwrap_or(CourierStatus::Disconnected),
            battery_percent: record.ultima_bateria_porcentaje,
            last_seen_at: record.ultima_actualizacion_loc,
        }
    }
}

/// The bootstrap view of the world, fetched once at startup.
#[derive(Debug)]
pub struct Snapshot {
    pub metrics: MetricsAggregate,
    pub couriers: Vec<Courier>,
    pub orders: Vec<Order>,
}

pub struct SnapshotLoader {
    client: reqwest::Client,
    base_url: String,
}

impl SnapshotLoader {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Fetches metrics, the courier roster, and the active order list in one
    /// concurrent round. Failure here is non-fatal for the rest of the
    /// system: the caller logs it and the store starts empty, live-only.
    pub async fn load_initial_state(&self) -> Result<Snapshot, AppError> {
        let orders_path = format!(
            "/pedidos?limit={ORDER_FETCH_LIMIT}&estado={ACTIVE_ORDER_STATUSES}"
        );

        let (metrics, courier_records, orders) = tokio::try_join!(
            self.fetch::<MetricsAggregate>("/dashboard/summary"),
            self.fetch::<Vec<CourierRecord>>("/drivers/detailed"),
            self.fetch::<Vec<Order>>(&orders_path),
        )
        .map_err(|err| AppError::SnapshotFetch(err.to_string()))?;

        Ok(Snapshot {
            metrics,
            couriers: courier_records.into_iter().map(Courier::from).collect(),
            orders,
        })
    }

    pub async fn load_alert_config(
        &self,
    ) -> Result<crate::models::alert::AlertThresholdConfig, AppError> {
        self.fetch("/config/alert_thresholds_minutes")
            .await
            .map_err(|err| AppError::ConfigMissing(err.to_string()))
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T, reqwest::Error> {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn courier_record_defaults_display_name_to_id() {
        let record: CourierRecord = serde_json::from_str(
            r#"{
                "id_usuario": "rep-3",
                "ultima_latitud": 10.5,
                "ultima_longitud": -66.9,
                "estado_actual": "disponible",
                "ultima_actualizacion_loc": "2025-11-03T12:00:00Z"
            }"#,
        )
        .unwrap();

        let courier = Courier::from(record);
        assert_eq!(courier.display_name, "rep-3");
        assert_eq!(courier.status, CourierStatus::Available);
        assert!(courier.last_seen_at.is_some());
    }

    #[test]
    fn courier_record_without_location_timestamp_stays_inactive() {
        let record: CourierRecord =
            serde_json::from_str(r#"{"id_usuario": "rep-4"}"#).unwrap();

        let courier = Courier::from(record);
        assert_eq!(courier.status, CourierStatus::Disconnected);
        assert!(!courier.is_active(Utc::now(), chrono::Duration::minutes(10)));
    }
}
