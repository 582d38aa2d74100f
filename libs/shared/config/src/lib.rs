use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub scheduler_base_url: String,
    pub default_patient_id: i64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            scheduler_base_url: env::var("SCHEDULER_BASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SCHEDULER_BASE_URL not set, using default");
                    "http://localhost:8000".to_string()
                }),
            default_patient_id: env::var("DEFAULT_PATIENT_ID")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(|| {
                    warn!("DEFAULT_PATIENT_ID not set, using 1");
                    1
                }),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.scheduler_base_url.is_empty()
    }
}
