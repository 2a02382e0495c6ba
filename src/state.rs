use std::sync::Arc;

use redis::Client;

use super::config::Config;

pub struct AppState {
    pub config: Config,
    pub redis_client: Client,
}

impl AppState {
    pub fn new() -> Arc<Self> {
        Self::with_config(Config::load())
    }

    /// URL parse only, no I/O. Connections are acquired per request.
    pub fn with_config(config: Config) -> Arc<Self> {
        let redis_client = Client::open(config.redis_url.as_str()).expect("Invalid REDIS_URL!");

        Arc::new(Self {
            config,
            redis_client,
        })
    }
}
