const DEFAULT_MONGODB_URI: &str = "mongodb://127.0.0.1:27017";
const DEFAULT_DATABASE: &str = "sensorviz";
const DEFAULT_COLLECTION: &str = "sensor_data";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mongodb_uri: String,
    pub database: String,
    pub collection: String,
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            mongodb_uri: env_or("SENSORVIZ_MONGODB_URI", DEFAULT_MONGODB_URI),
            database: env_or("SENSORVIZ_DATABASE", DEFAULT_DATABASE),
            collection: env_or("SENSORVIZ_COLLECTION", DEFAULT_COLLECTION),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mongodb_uri: DEFAULT_MONGODB_URI.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }
}
