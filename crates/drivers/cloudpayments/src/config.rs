use serde::Deserialize;

/// Default CloudPayments API host.
pub const DEFAULT_API_URL: &str = "https://api.cloudpayments.ru";

/// CloudPayments driver configuration.
///
/// The embedding application loads this from whatever configuration source
/// it uses; every field has a default so partial configs deserialize.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CloudPaymentsConfig {
    /// Base URL of the gateway API
    pub url: String,

    /// Public id ("pk_...") used as the Basic auth username
    pub public_key: String,

    /// API secret used as the Basic auth password
    pub secret_key: String,

    /// Run in widget mode: the charge happens client-side through the
    /// embedded widget and the server never calls the charge API itself
    pub use_widget: bool,
}

impl Default for CloudPaymentsConfig {
    fn default() -> Self {
        CloudPaymentsConfig {
            url: DEFAULT_API_URL.to_string(),
            public_key: String::new(),
            secret_key: String::new(),
            use_widget: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_fills_defaults() {
        let config: CloudPaymentsConfig =
            serde_json::from_str(r#"{"public_key": "pk_test", "secret_key": "s"}"#).unwrap();
        assert_eq!(config.url, DEFAULT_API_URL);
        assert_eq!(config.public_key, "pk_test");
        assert!(!config.use_widget);
    }
}
