use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default)]
    pub smtp: SmtpConfig,
    #[serde(default)]
    pub delivery: DeliveryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8585
}

/// Addresses used on every outgoing commit email
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    /// Envelope sender; the display name is taken from the commit
    #[serde(default = "default_sender")]
    pub sender: String,
    #[serde(default = "default_recipient")]
    pub recipient: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            sender: default_sender(),
            recipient: default_recipient(),
        }
    }
}

fn default_sender() -> String {
    "sender@example.com".to_string()
}

fn default_recipient() -> String {
    "recipient@example.com".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    #[serde(default = "default_smtp_hostname")]
    pub hostname: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    /// Only used together with `password`
    pub username: Option<String>,
    pub password: Option<String>,
    /// Use an implicit TLS relay instead of a plain connection
    #[serde(default)]
    pub tls: bool,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            hostname: default_smtp_hostname(),
            port: default_smtp_port(),
            username: None,
            password: None,
            tls: false,
        }
    }
}

impl SmtpConfig {
    /// Username and password, if both are configured
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Some((username.as_str(), password.as_str())),
            _ => None,
        }
    }
}

fn default_smtp_hostname() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    1025
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    /// Send within the webhook request
    Inline,
    /// Hand off to the background delivery worker
    Queued,
}

impl FromStr for DeliveryMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inline" | "sync" => Ok(DeliveryMode::Inline),
            "queued" | "queue" => Ok(DeliveryMode::Queued),
            other => anyhow::bail!("Unknown delivery mode: {}", other),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryConfig {
    #[serde(default = "default_delivery_mode")]
    pub mode: DeliveryMode,
    /// Bound of the queued delivery channel
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            mode: default_delivery_mode(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

fn default_delivery_mode() -> DeliveryMode {
    DeliveryMode::Inline
}

fn default_queue_capacity() -> usize {
    100
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load the optional config file, then apply environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let config = Self::load_file(path)?;
        config.with_overrides(|key| std::env::var(key).ok())
    }

    fn load_file(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| "Failed to parse configuration file")?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Apply environment-style overrides using `lookup` to resolve variables,
    /// then validate the merged result.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(sender) = lookup("SENDER_EMAIL") {
            self.mail.sender = sender;
        }
        if let Some(recipient) = lookup("RECIPIENT_EMAIL") {
            self.mail.recipient = recipient;
        }
        if let Some(hostname) = lookup("SMTP_HOSTNAME") {
            self.smtp.hostname = hostname;
        }
        if let Some(port) = lookup("SMTP_PORT") {
            self.smtp.port = parse_var("SMTP_PORT", &port)?;
        }
        if let Some(username) = lookup("SMTP_USERNAME") {
            self.smtp.username = Some(username);
        }
        if let Some(password) = lookup("SMTP_PASSWORD") {
            self.smtp.password = Some(password);
        }
        if let Some(tls) = lookup("SMTP_TLS") {
            self.smtp.tls = parse_var("SMTP_TLS", &tls)?;
        }
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = parse_var("PORT", &port)?;
        }
        if let Some(mode) = lookup("DELIVERY_MODE") {
            self.delivery.mode = parse_var("DELIVERY_MODE", &mode)?;
        }
        if let Some(capacity) = lookup("DELIVERY_QUEUE_CAPACITY") {
            self.delivery.queue_capacity = parse_var("DELIVERY_QUEUE_CAPACITY", &capacity)?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Checks that apply whether a value came from the file or the environment
    fn validate(&self) -> Result<()> {
        if self.delivery.queue_capacity == 0 {
            anyhow::bail!("Delivery queue capacity must be greater than zero");
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            mail: MailConfig::default(),
            smtp: SmtpConfig::default(),
            delivery: DeliveryConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

fn parse_var<T>(name: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid value for {}: {:?} ({})", name, value, e))
}
