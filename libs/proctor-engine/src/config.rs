use std::time::Duration;
use tracing::warn;

/// Engine configuration, read once from the environment at startup.
///
/// The transport timeout handed to the HTTP client is always
/// `run + compile + margin`, strictly larger than both service-side bounds,
/// so the execution service gets to report its own timeout before the
/// client severs the connection.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Execute endpoint of the external sandboxed execution service.
    pub sandbox_url: String,
    pub run_timeout_ms: u64,
    pub compile_timeout_ms: u64,
    pub transport_margin_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sandbox_url: "http://localhost:2000/api/v2/execute".to_string(),
            run_timeout_ms: 10_000,
            compile_timeout_ms: 10_000,
            transport_margin_ms: 2_000,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            sandbox_url: std::env::var("SANDBOX_URL").unwrap_or(defaults.sandbox_url),
            run_timeout_ms: env_ms("RUN_TIMEOUT_MS", defaults.run_timeout_ms),
            compile_timeout_ms: env_ms("COMPILE_TIMEOUT_MS", defaults.compile_timeout_ms),
            transport_margin_ms: env_ms("TRANSPORT_MARGIN_MS", defaults.transport_margin_ms),
        }
    }

    /// Outer bound on one round-trip to the execution service.
    pub fn transport_timeout(&self) -> Duration {
        Duration::from_millis(self.run_timeout_ms + self.compile_timeout_ms + self.transport_margin_ms)
    }
}

fn env_ms(name: &str, default: u64) -> u64 {
    match std::env::var(name) {
        Ok(raw) => match raw.parse::<u64>() {
            Ok(value) => value,
            Err(_) => {
                warn!(var = name, value = %raw, "Ignoring unparseable timeout override");
                default
            }
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_timeout_exceeds_service_bounds() {
        let config = EngineConfig::default();
        let transport = config.transport_timeout();

        assert!(transport > Duration::from_millis(config.run_timeout_ms));
        assert!(transport > Duration::from_millis(config.compile_timeout_ms));
    }
}
