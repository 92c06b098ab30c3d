//! SMTP delivery configuration

use serde::{Deserialize, Serialize};

/// Configuration for the SMTP relay used to deliver verification codes
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SmtpConfig {
    /// SMTP relay hostname
    pub host: String,

    /// SMTP relay port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Relay username, if the relay requires authentication
    pub username: Option<String>,

    /// Relay password
    pub password: Option<String>,

    /// Sender address placed in the From header
    pub from_address: String,

    /// Display name placed in the From header
    #[serde(default = "default_from_name")]
    pub from_name: String,

    /// Disable TLS (local development relays only)
    #[serde(default)]
    pub tls_disabled: bool,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: default_port(),
            username: None,
            password: None,
            from_address: "no-reply@mailguard.dev".to_string(),
            from_name: default_from_name(),
            tls_disabled: false,
        }
    }
}

impl SmtpConfig {
    /// Load from `SMTP_*` environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(host) = std::env::var("SMTP_HOST") {
            config.host = host;
        }
        if let Ok(port) = std::env::var("SMTP_PORT") {
            if let Ok(port) = port.parse() {
                config.port = port;
            }
        }
        config.username = std::env::var("SMTP_USERNAME").ok();
        config.password = std::env::var("SMTP_PASSWORD").ok();
        if let Ok(from) = std::env::var("SMTP_FROM") {
            config.from_address = from;
        }
        if let Ok(name) = std::env::var("SMTP_FROM_NAME") {
            config.from_name = name;
        }
        config.tls_disabled = std::env::var("SMTP_TLS_DISABLED")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        config
    }
}

fn default_port() -> u16 {
    587
}

fn default_from_name() -> String {
    "MailGuard".to_string()
}
