use std::sync::Arc;

use crate::{
    auth::AuthService,
    config::AppConfig,
    services::{
        clock::{Clock, SystemClock},
        trips::TripStore,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub trips: TripStore,
    pub auth: AuthService,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(config: AppConfig, trips: TripStore, auth: AuthService) -> Self {
        Self {
            config,
            trips,
            auth,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}
