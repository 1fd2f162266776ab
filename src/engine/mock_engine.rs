use crate::engine::Engine;
use crate::engine::types::{ConnectionSnapshot, FetchStatus, TunnelMode};
use crate::errors;
use crate::settings::EngineSettings;
use anyhow::Result;

const VERIFY_STEPS: u32 = 4;

pub struct MockEngine {
    profile_name: Option<String>,
    mode: TunnelMode,
    providers: Vec<String>,
    bytes_per_tick: u64,
    fail_verification: bool,
    running: bool,
    forwarded: u64,
    has_providers: bool,
}

impl MockEngine {
    pub fn new(settings: &EngineSettings) -> Self {
        Self {
            profile_name: settings.profile_name.clone(),
            mode: settings.mode.clone(),
            providers: settings.providers.clone(),
            bytes_per_tick: settings.bytes_per_tick,
            fail_verification: settings.fail_verification,
            running: false,
            forwarded: 0,
            has_providers: false,
        }
    }
}

impl Engine for MockEngine {
    fn start(&mut self) -> Result<()> {
        anyhow::ensure!(!self.running, errors::engine::ALREADY_RUNNING);

        self.running = true;
        self.forwarded = 0;

        tracing::info!(
            "MOCK: Engine started with profile {:?} in {} mode",
            self.profile_name,
            self.mode
        );

        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        anyhow::ensure!(self.running, errors::engine::NOT_RUNNING);

        self.running = false;

        tracing::info!("MOCK: Engine stopped after forwarding {} bytes", self.forwarded);

        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        tracing::info!("MOCK: Shutting down engine");

        if self.running {
            self.stop()?;
        }

        tracing::info!("MOCK: Engine shutdown complete");

        Ok(())
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn snapshot(&self) -> ConnectionSnapshot {
        ConnectionSnapshot {
            profile_name: self.profile_name.clone(),
            running: self.running,
            forwarded: self.forwarded,
            mode: self.mode.clone(),
            has_providers: self.has_providers,
        }
    }

    fn tick(&mut self) -> u64 {
        if self.running {
            self.forwarded = self.forwarded.saturating_add(self.bytes_per_tick);
        }
        self.forwarded
    }

    fn profile_update_plan(&self) -> Result<Vec<FetchStatus>> {
        let profile = self
            .profile_name
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!(errors::engine::NO_PROFILE))?;

        let total = self.providers.len() as u32;

        let mut plan = vec![FetchStatus::FetchConfiguration {
            source: profile.clone(),
        }];

        plan.extend(
            self.providers
                .iter()
                .enumerate()
                .map(|(index, provider)| FetchStatus::FetchProviders {
                    source: provider.clone(),
                    progress: index as u32,
                    max: total,
                }),
        );

        plan.extend((0..=VERIFY_STEPS).map(|progress| FetchStatus::Verifying {
            progress,
            max: VERIFY_STEPS,
        }));

        Ok(plan)
    }

    fn complete_profile_update(&mut self) -> Result<()> {
        let profile = self
            .profile_name
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!(errors::engine::NO_PROFILE))?;

        anyhow::ensure!(
            !self.fail_verification,
            errors::engine::verification_failed(profile)
        );

        self.has_providers = !self.providers.is_empty();

        tracing::info!(
            "MOCK: Profile '{}' updated with {} providers",
            profile,
            self.providers.len()
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> EngineSettings {
        EngineSettings {
            profile_name: Some("default".to_string()),
            mode: TunnelMode::Global,
            providers: vec!["subscription".to_string(), "geoip".to_string()],
            bytes_per_tick: 100,
            fail_verification: false,
            ..EngineSettings::default()
        }
    }

    #[test]
    fn test_start_stop_lifecycle() {
        let mut engine = MockEngine::new(&settings());

        assert!(!engine.is_running());
        engine.start().unwrap();
        assert!(engine.is_running());

        let result = engine.start();
        assert!(result.unwrap_err().to_string().contains("already running"));

        engine.stop().unwrap();
        assert!(engine.stop().is_err());
    }

    #[test]
    fn test_tick_only_counts_while_running() {
        let mut engine = MockEngine::new(&settings());

        assert_eq!(engine.tick(), 0);

        engine.start().unwrap();
        assert_eq!(engine.tick(), 100);
        assert_eq!(engine.tick(), 200);

        engine.stop().unwrap();
        assert_eq!(engine.tick(), 200);
        assert_eq!(engine.snapshot().forwarded, 200);
    }

    #[test]
    fn test_profile_update_plan_order() {
        let engine = MockEngine::new(&settings());
        let plan = engine.profile_update_plan().unwrap();

        assert_eq!(
            plan[0],
            FetchStatus::FetchConfiguration {
                source: "default".to_string()
            }
        );
        assert_eq!(
            plan[2],
            FetchStatus::FetchProviders {
                source: "geoip".to_string(),
                progress: 1,
                max: 2,
            }
        );
        assert!(matches!(
            plan.last(),
            Some(FetchStatus::Verifying { progress, max }) if progress == max
        ));
    }

    #[test]
    fn test_profile_update_requires_profile() {
        let mut engine = MockEngine::new(&EngineSettings {
            profile_name: None,
            ..settings()
        });

        assert!(engine.profile_update_plan().is_err());
        assert!(engine.complete_profile_update().is_err());
    }

    #[test]
    fn test_failed_verification_keeps_providers_hidden() {
        let mut engine = MockEngine::new(&EngineSettings {
            fail_verification: true,
            ..settings()
        });

        let result = engine.complete_profile_update();
        assert!(result.unwrap_err().to_string().contains("Verification failed"));
        assert!(!engine.snapshot().has_providers);
    }
}
