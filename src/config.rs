use std::env;
use std::time::Duration;

use crate::pricing::PricingPolicy;

#[derive(Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub nominatim_url: String,
    pub osrm_url: String,
    pub country_codes: String,
    pub accept_language: String,
    pub language_header: String,
    pub user_agent: String,
    pub http_timeout: Duration,
    pub pricing_policy: PricingPolicy,
    pub discount_toggle_enabled: bool,
    pub checkout_url: String,
    pub store_path: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("SERVER_PORT must be a number"),
            nominatim_url: env::var("NOMINATIM_URL")
                .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string()),
            osrm_url: env::var("OSRM_URL")
                .unwrap_or_else(|_| "https://router.project-osrm.org".to_string()),
            country_codes: env::var("COUNTRY_CODES")
                .unwrap_or_else(|_| "cz".to_string()),
            accept_language: env::var("ACCEPT_LANGUAGE")
                .unwrap_or_else(|_| "en,cs".to_string()),
            language_header: env::var("LANGUAGE_HEADER")
                .unwrap_or_else(|_| "en-US,en;q=0.9,cs;q=0.8".to_string()),
            // Nominatim's usage policy requires an identifying User-Agent
            user_agent: env::var("CLIENT_USER_AGENT")
                .unwrap_or_else(|_| "TaxiQuoteBackend/1.0 (https://maleka.dev)".to_string()),
            http_timeout: Duration::from_secs(
                env::var("HTTP_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .expect("HTTP_TIMEOUT_SECS must be a number"),
            ),
            pricing_policy: env::var("PRICING_POLICY")
                .unwrap_or_else(|_| "rate-toggle".to_string())
                .parse()
                .expect("PRICING_POLICY must be 'rate-toggle' or 'flat-return'"),
            discount_toggle_enabled: env::var("DISCOUNT_TOGGLE_ENABLED")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .expect("DISCOUNT_TOGGLE_ENABLED must be true or false"),
            checkout_url: env::var("CHECKOUT_URL")
                .unwrap_or_else(|_| "https://revolut.me/maleka05/pocket/CFVVqIW2sP".to_string()),
            store_path: env::var("STORE_PATH")
                .unwrap_or_else(|_| "taxi-store.json".to_string()),
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
