use anyhow::Result;
use std::sync::Arc;

use crate::model::{ObjectSummary, PortSummary, ReadingsPage, SensorReading};
use crate::repository::SensorRepository;

/// Thin pass-through between the HTTP layer and the repository. Results and
/// errors propagate unchanged.
#[derive(Clone)]
pub struct QueryService {
    repo: Arc<dyn SensorRepository>,
}

impl QueryService {
    pub fn new(repo: Arc<dyn SensorRepository>) -> Self {
        Self { repo }
    }

    pub async fn list_objects(&self) -> Result<Vec<ObjectSummary>> {
        self.repo.list_objects().await
    }

    pub async fn list_ports(&self, object_id: f64) -> Result<Vec<PortSummary>> {
        self.repo.list_ports(object_id).await
    }

    pub async fn readings(&self, object_id: f64, port_num: Option<f64>) -> Result<ReadingsPage> {
        self.repo.readings(object_id, port_num).await
    }

    pub async fn save_readings(&self, readings: &[SensorReading]) -> Result<()> {
        self.repo.save_readings(readings).await
    }
}
