use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One timestamped sample from one (object, port) pair.
///
/// The nine required fields are always populated by ingestion; the remaining
/// telemetry attributes default to zero/empty when the uploaded CSV does not
/// carry them. Field names double as the document keys in the collection and
/// as the JSON keys on the API, so stored documents round-trip unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SensorReading {
    pub timestamp: DateTime<Utc>,
    pub object_id: f64,
    pub port_num: f64,
    pub voltage: f64,
    pub current: f64,
    pub supply_current: f64,
    pub supply_volt: f64,
    pub voltage_drop: f64,
    pub voc: f64,
    /// Stamped at ingestion time, never supplied by the caller.
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub state: f64,
    #[serde(default)]
    pub controller_error: f64,
    #[serde(default)]
    pub ai1: f64,
    #[serde(default)]
    pub ai2: f64,
    #[serde(default)]
    pub ai3: f64,
    #[serde(default)]
    pub ai4: f64,
    #[serde(default)]
    pub ai5: f64,
    #[serde(default)]
    pub fw_version: String,
    #[serde(default)]
    pub vendor_id: String,
    #[serde(default)]
    pub lite_id: String,
    #[serde(default)]
    pub q_charge: f64,
    #[serde(default)]
    pub voltage_set_point: f64,
    #[serde(default)]
    pub command: f64,
    #[serde(default)]
    pub target_q: f64,
    #[serde(default)]
    pub step_number: f64,
    #[serde(default)]
    pub voc_mode: f64,
    #[serde(default)]
    pub target_voc: f64,
    #[serde(default)]
    pub voc_state: f64,
    #[serde(default)]
    pub voc_exit: f64,
    #[serde(default)]
    pub read_error: bool,
}

/// A distinct object identifier, derived on read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ObjectSummary {
    #[serde(rename = "objectId")]
    pub object_id: f64,
}

/// A distinct port number recorded for one object, derived on read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PortSummary {
    #[serde(rename = "portNum")]
    pub port_num: f64,
}

/// Readings for one object plus the total match count. There is no
/// pagination, so `total` always equals `sensor_data.len()`.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ReadingsPage {
    #[serde(rename = "SensorData")]
    pub sensor_data: Vec<SensorReading>,
    #[serde(rename = "Total")]
    pub total: i64,
}
