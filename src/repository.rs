use anyhow::Result;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::{Client, Collection};

use crate::config::AppConfig;
use crate::model::{ObjectSummary, PortSummary, ReadingsPage, SensorReading};

/// Data-access capabilities of the reading store. Kept behind a trait so the
/// query service can run against an in-memory substitute in tests.
#[async_trait]
pub trait SensorRepository: Send + Sync {
    /// Every distinct object identifier, ascending.
    async fn list_objects(&self) -> Result<Vec<ObjectSummary>>;
    /// Distinct port numbers recorded for one object; no ordering guarantee.
    async fn list_ports(&self, object_id: f64) -> Result<Vec<PortSummary>>;
    /// All readings for one object, narrowed by port when supplied, plus the
    /// total match count.
    async fn readings(&self, object_id: f64, port_num: Option<f64>) -> Result<ReadingsPage>;
    /// Bulk insert; empty input is a no-op.
    async fn save_readings(&self, readings: &[SensorReading]) -> Result<()>;
}

/// MongoDB-backed repository. The client handle is constructor-injected, not
/// process-wide state.
pub struct MongoSensorRepository {
    client: Client,
    database: String,
    collection: String,
}

impl MongoSensorRepository {
    pub fn new(client: Client, config: &AppConfig) -> Self {
        Self {
            client,
            database: config.database.clone(),
            collection: config.collection.clone(),
        }
    }

    fn collection(&self) -> Collection<SensorReading> {
        self.client
            .database(&self.database)
            .collection(&self.collection)
    }
}

#[async_trait]
impl SensorRepository for MongoSensorRepository {
    async fn list_objects(&self) -> Result<Vec<ObjectSummary>> {
        // Group on object_id and surface it under the response key, so the
        // cursor deserializes straight into ObjectSummary.
        let pipeline = vec![
            doc! { "$group": { "_id": "$object_id", "objectId": { "$first": "$object_id" } } },
            doc! { "$project": { "_id": 0 } },
            doc! { "$sort": { "objectId": 1 } },
        ];
        let cursor = self
            .collection()
            .aggregate(pipeline)
            .with_type::<ObjectSummary>()
            .await?;
        let objects: Vec<ObjectSummary> = cursor.try_collect().await?;
        tracing::debug!(count = objects.len(), "listed distinct object ids");
        Ok(objects)
    }

    async fn list_ports(&self, object_id: f64) -> Result<Vec<PortSummary>> {
        let pipeline = vec![
            doc! { "$match": { "object_id": object_id } },
            doc! { "$group": { "_id": "$port_num", "portNum": { "$first": "$port_num" } } },
            doc! { "$project": { "_id": 0 } },
        ];
        let cursor = self
            .collection()
            .aggregate(pipeline)
            .with_type::<PortSummary>()
            .await?;
        let ports: Vec<PortSummary> = cursor.try_collect().await?;
        tracing::debug!(object_id, count = ports.len(), "listed distinct ports");
        Ok(ports)
    }

    async fn readings(&self, object_id: f64, port_num: Option<f64>) -> Result<ReadingsPage> {
        let mut filter = doc! { "object_id": object_id };
        if let Some(port) = port_num {
            filter.insert("port_num", port);
        }

        let total = self.collection().count_documents(filter.clone()).await?;
        let cursor = self.collection().find(filter).await?;
        let sensor_data: Vec<SensorReading> = cursor.try_collect().await?;
        tracing::debug!(object_id, total, "fetched readings");

        Ok(ReadingsPage {
            sensor_data,
            total: total as i64,
        })
    }

    async fn save_readings(&self, readings: &[SensorReading]) -> Result<()> {
        if readings.is_empty() {
            return Ok(());
        }
        self.collection().insert_many(readings).await?;
        tracing::info!(count = readings.len(), "inserted readings");
        Ok(())
    }
}
