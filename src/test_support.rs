use anyhow::Result;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::sync::{Arc, Mutex};

use crate::config::AppConfig;
use crate::model::{ObjectSummary, PortSummary, ReadingsPage, SensorReading};
use crate::repository::SensorRepository;
use crate::service::QueryService;
use crate::state::AppState;

/// In-memory stand-in for the Mongo repository.
#[derive(Default)]
pub struct InMemoryRepository {
    readings: Mutex<Vec<SensorReading>>,
}

impl InMemoryRepository {
    pub fn snapshot(&self) -> Vec<SensorReading> {
        self.readings.lock().expect("lock").clone()
    }
}

#[async_trait]
impl SensorRepository for InMemoryRepository {
    async fn list_objects(&self) -> Result<Vec<ObjectSummary>> {
        let mut ids: Vec<f64> = self
            .readings
            .lock()
            .expect("lock")
            .iter()
            .map(|reading| reading.object_id)
            .collect();
        ids.sort_by(|a, b| a.partial_cmp(b).expect("total order"));
        ids.dedup();
        Ok(ids
            .into_iter()
            .map(|object_id| ObjectSummary { object_id })
            .collect())
    }

    async fn list_ports(&self, object_id: f64) -> Result<Vec<PortSummary>> {
        let mut ports: Vec<f64> = self
            .readings
            .lock()
            .expect("lock")
            .iter()
            .filter(|reading| reading.object_id == object_id)
            .map(|reading| reading.port_num)
            .collect();
        ports.sort_by(|a, b| a.partial_cmp(b).expect("total order"));
        ports.dedup();
        Ok(ports
            .into_iter()
            .map(|port_num| PortSummary { port_num })
            .collect())
    }

    async fn readings(&self, object_id: f64, port_num: Option<f64>) -> Result<ReadingsPage> {
        let sensor_data: Vec<SensorReading> = self
            .readings
            .lock()
            .expect("lock")
            .iter()
            .filter(|reading| {
                reading.object_id == object_id
                    && port_num.map_or(true, |port| reading.port_num == port)
            })
            .cloned()
            .collect();
        let total = sensor_data.len() as i64;
        Ok(ReadingsPage { sensor_data, total })
    }

    async fn save_readings(&self, readings: &[SensorReading]) -> Result<()> {
        self.readings
            .lock()
            .expect("lock")
            .extend_from_slice(readings);
        Ok(())
    }
}

pub fn sample_reading(object_id: f64, port_num: f64) -> SensorReading {
    SensorReading {
        timestamp: Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .expect("valid timestamp"),
        object_id,
        port_num,
        voltage: 3.3,
        current: 0.1,
        supply_current: 0.05,
        supply_volt: 5.0,
        voltage_drop: 0.2,
        voc: 3.1,
        created_at: Utc::now(),
        ..SensorReading::default()
    }
}

pub fn test_context() -> (AppState, Arc<InMemoryRepository>) {
    let repo = Arc::new(InMemoryRepository::default());
    let state = AppState {
        config: AppConfig::default(),
        service: QueryService::new(repo.clone()),
    };
    (state, repo)
}

pub fn seeded_context(readings: Vec<SensorReading>) -> (AppState, Arc<InMemoryRepository>) {
    let (state, repo) = test_context();
    repo.readings.lock().expect("lock").extend(readings);
    (state, repo)
}
