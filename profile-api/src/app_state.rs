use std::sync::Arc;

use crate::domain::ports::inbound::ProfileService;

#[derive(Clone)]
pub struct AppState {
    pub profile_service: Arc<dyn ProfileService>,
}

impl AppState {
    pub fn new(profile_service: Arc<dyn ProfileService>) -> Self {
        Self { profile_service }
    }
}
