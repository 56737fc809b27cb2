use std::sync::Arc;

use aurora_config::Config;
use aurora_service::AuroraService;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<AuroraService>,
}
impl AppState {
	pub fn new(config: Config) -> Self {
		Self::from_service(AuroraService::new(config))
	}

	pub fn from_service(service: AuroraService) -> Self {
		Self { service: Arc::new(service) }
	}
}
