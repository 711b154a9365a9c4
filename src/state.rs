use crate::config::AppConfig;
use crate::service::QueryService;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub service: QueryService,
}
