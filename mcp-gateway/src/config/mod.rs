use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Backend address used when `BACKEND_URL` is unset or empty.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub common: core_config::Config,
    pub backend: BackendSettings,
}

#[derive(Debug, Clone)]
pub struct BackendSettings {
    /// Scheme, host and port of the backend service, without the `/api`
    /// prefix (e.g. `http://py-backend:8000`).
    pub base_url: String,
}

impl BackendSettings {
    pub fn new(base_url: Option<String>) -> Self {
        let base_url = base_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());

        Self { base_url }
    }
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self::new(None)
    }
}

impl GatewayConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        Ok(GatewayConfig {
            common,
            backend: BackendSettings::new(env::var("BACKEND_URL").ok()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_backend_url_falls_back_to_localhost() {
        assert_eq!(BackendSettings::new(None).base_url, "http://localhost:8000");
    }

    #[test]
    fn empty_backend_url_falls_back_to_localhost() {
        assert_eq!(
            BackendSettings::new(Some("  ".to_string())).base_url,
            DEFAULT_BACKEND_URL
        );
    }

    #[test]
    fn explicit_backend_url_wins() {
        let settings = BackendSettings::new(Some("http://py-backend:8000".to_string()));
        assert_eq!(settings.base_url, "http://py-backend:8000");
    }
}
