use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct ConsoleConfig {
    pub server: ServerSettings,
    pub backend: BackendSettings,
    pub knowledge: BackendSettings,
    pub refresh: RefreshSettings,
    pub metrics: MetricsSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl BackendSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RefreshSettings {
    /// Seconds between background refreshes; 0 disables the loop.
    pub interval_secs: u64,
    pub discipline: RefreshDiscipline,
}

/// Which settled snapshot becomes visible when refreshes overlap.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RefreshDiscipline {
    /// A snapshot that settles after a newer one was published is discarded.
    #[default]
    LastStarted,
    /// Every settled snapshot is published in completion order.
    LastCompleted,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MetricsSettings {
    pub rolling_window: usize,
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self { rolling_window: 3 }
    }
}

pub fn load_console_config() -> anyhow::Result<ConsoleConfig> {
    let settings = config::Config::builder()
        .set_default("server.bind", "0.0.0.0:8080")?
        .set_default("backend.base_url", "http://localhost:8000")?
        .set_default("backend.timeout_secs", 30)?
        .set_default("knowledge.base_url", "http://localhost:8000")?
        .set_default("knowledge.timeout_secs", 60)?
        .set_default("refresh.interval_secs", 60)?
        .set_default("refresh.discipline", "last_started")?
        .set_default("metrics.rolling_window", 3)?
        .add_source(config::File::with_name("config/console").required(false))
        .add_source(config::Environment::with_prefix("CONSOLE").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Join a base URL and a resource path without doubling or dropping the slash.
pub fn resource_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
