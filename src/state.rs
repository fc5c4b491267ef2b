use std::sync::Arc;

use crate::config::Config;
use crate::middleware::cors::CorsPolicy;
use crate::sheet::SheetService;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub sheet: Arc<dyn SheetService>,
    pub cors: CorsPolicy,
}
