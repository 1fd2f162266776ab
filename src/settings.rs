use crate::constants;
use crate::engine::types::TunnelMode;
use crate::errors;
use anyhow::{Context, ensure};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const MAX_BYTES_PER_TICK: u64 = 1024 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub version_name: String,
    pub help_url: String,
    pub request_buffer: usize,
    pub strings_path: Option<PathBuf>,
    pub log_directory: PathBuf,
    pub engine: EngineSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version_name: constants::VERSION_NAME.to_string(),
            help_url: constants::HELP_URL.to_string(),
            request_buffer: constants::DEFAULT_REQUEST_BUFFER,
            strings_path: None,
            log_directory: constants::default_log_directory(),
            engine: EngineSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub profile_name: Option<String>,
    pub mode: TunnelMode,
    pub providers: Vec<String>,
    pub tick_interval: String,
    pub bytes_per_tick: u64,
    pub fail_verification: bool,
    pub autostart: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            profile_name: Some("default".to_string()),
            mode: TunnelMode::Rule,
            providers: Vec::new(),
            tick_interval: constants::DEFAULT_TICK_INTERVAL.to_string(),
            bytes_per_tick: constants::DEFAULT_BYTES_PER_TICK,
            fail_verification: false,
            autostart: false,
        }
    }
}

impl EngineSettings {
    pub fn tick(&self) -> anyhow::Result<Duration> {
        humantime::parse_duration(&self.tick_interval)
            .with_context(|| errors::settings::invalid_tick(&self.tick_interval))
    }
}

impl Settings {
    /// Layers built-in defaults, the optional settings file and
    /// `CLASH_DASHBOARD__*` environment variables, in that order.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Yaml)
                    .required(true),
            );
        }

        builder = builder.add_source(
            config::Environment::with_prefix(constants::ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let source = path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "defaults".to_string());

        let settings: Settings = builder
            .build()
            .with_context(|| errors::settings::failed_to_load(&source))?
            .try_deserialize()
            .context(errors::settings::FAILED_TO_DESERIALIZE)?;

        settings.validate()?;

        Ok(settings)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.request_buffer >= 1,
            errors::settings::REQUEST_BUFFER_ZERO
        );

        let tick = self.engine.tick()?;
        ensure!(!tick.is_zero(), errors::settings::TICK_ZERO);

        ensure!(
            self.engine.bytes_per_tick <= MAX_BYTES_PER_TICK,
            errors::settings::bytes_per_tick_too_large(self.engine.bytes_per_tick)
        );

        Ok(())
    }
}
