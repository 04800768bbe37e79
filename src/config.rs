//! Engine configuration.
//!
//! One [`VerifierConfig`] value carries everything the engine would otherwise read from globals: the
//! toolchain programs, timeouts, the random range, and parallelism. Defaults match a stock Linux host
//! with `python3`, `gcc`, `g++` and a JDK on `PATH`.

use std::time::Duration;

use crossverify_core::inputs::{DEFAULT_MAX_RANDOM, RANDOM_MAX, RANDOM_MIN};
use thiserror::Error;

/// Default wall-clock limit for one harness invocation.
pub const DEFAULT_RUN_TIMEOUT: Duration = Duration::from_secs(5);

/// Default wall-clock limit for one harness build (compilers can be slow on a cold cache).
pub const DEFAULT_BUILD_TIMEOUT: Duration = Duration::from_secs(60);

/// Programs used to build and run harnesses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub python: String,
    pub cc: String,
    pub cxx: String,
    pub javac: String,
    pub java: String,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            python: "python3".to_string(),
            cc: "gcc".to_string(),
            cxx: "g++".to_string(),
            javac: "javac".to_string(),
            java: "java".to_string(),
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq)]
pub struct VerifierConfig {
    pub toolchain: Toolchain,
    /// Timeout for each harness invocation
    pub run_timeout: Duration,
    /// Timeout for each harness build
    pub build_timeout: Duration,
    /// Inclusive bounds of random tuple components, `min <= max`
    pub random_min: i64,
    pub random_max: i64,
    /// Random tuples appended when a request does not say otherwise
    pub max_random: usize,
    /// Seed for reproducible case generation; `None` draws from OS entropy
    pub seed: Option<u64>,
    /// Concurrent invocations per side; 1 runs cases sequentially
    pub jobs: usize,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            toolchain: Toolchain::default(),
            run_timeout: DEFAULT_RUN_TIMEOUT,
            build_timeout: DEFAULT_BUILD_TIMEOUT,
            random_min: RANDOM_MIN,
            random_max: RANDOM_MAX,
            max_random: DEFAULT_MAX_RANDOM,
            seed: None,
            jobs: 1,
        }
    }
}

/// Invalid value in an environment override.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value for {var}: '{value}' ({reason})")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: &'static str,
}

pub const ENV_PYTHON: &str = "CROSSVERIFY_PYTHON";
pub const ENV_CC: &str = "CROSSVERIFY_CC";
pub const ENV_CXX: &str = "CROSSVERIFY_CXX";
pub const ENV_JAVAC: &str = "CROSSVERIFY_JAVAC";
pub const ENV_JAVA: &str = "CROSSVERIFY_JAVA";
pub const ENV_RUN_TIMEOUT_SECS: &str = "CROSSVERIFY_RUN_TIMEOUT_SECS";
pub const ENV_BUILD_TIMEOUT_SECS: &str = "CROSSVERIFY_BUILD_TIMEOUT_SECS";

impl VerifierConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overlaid with `CROSSVERIFY_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().overlay_env(|var| std::env::var(var).ok())
    }

    /// Overlay overrides from `lookup` (an environment-like source) onto this config.
    ///
    /// Empty values are ignored. Timeouts are whole or fractional seconds and must be positive.
    pub fn overlay_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(v) = get(ENV_PYTHON) {
            self.toolchain.python = v;
        }
        if let Some(v) = get(ENV_CC) {
            self.toolchain.cc = v;
        }
        if let Some(v) = get(ENV_CXX) {
            self.toolchain.cxx = v;
        }
        if let Some(v) = get(ENV_JAVAC) {
            self.toolchain.javac = v;
        }
        if let Some(v) = get(ENV_JAVA) {
            self.toolchain.java = v;
        }
        if let Some(v) = get(ENV_RUN_TIMEOUT_SECS) {
            self.run_timeout = parse_timeout(ENV_RUN_TIMEOUT_SECS, &v)?;
        }
        if let Some(v) = get(ENV_BUILD_TIMEOUT_SECS) {
            self.build_timeout = parse_timeout(ENV_BUILD_TIMEOUT_SECS, &v)?;
        }
        Ok(self)
    }

    /// Set the per-invocation timeout
    pub fn with_run_timeout(mut self, timeout: Duration) -> Self {
        self.run_timeout = timeout;
        self
    }

    /// Set the per-build timeout
    pub fn with_build_timeout(mut self, timeout: Duration) -> Self {
        self.build_timeout = timeout;
        self
    }

    /// Set the random component range. Reversed bounds are swapped.
    pub fn with_random_range(mut self, min: i64, max: i64) -> Self {
        self.random_min = min.min(max);
        self.random_max = min.max(max);
        self
    }

    /// Set the default number of random tuples
    pub fn with_max_random(mut self, max_random: usize) -> Self {
        self.max_random = max_random;
        self
    }

    /// Make case generation reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set case-level parallelism (clamped to at least 1)
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Replace the toolchain programs
    pub fn with_toolchain(mut self, toolchain: Toolchain) -> Self {
        self.toolchain = toolchain;
        self
    }
}

/// Parse a positive number of seconds.
pub fn parse_timeout(var: &'static str, value: &str) -> Result<Duration, ConfigError> {
    let invalid = |reason| ConfigError {
        var,
        value: value.to_string(),
        reason,
    };
    let secs: f64 = value.parse().map_err(|_| invalid("not a number"))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(invalid("must be a positive number of seconds"));
    }
    Duration::try_from_secs_f64(secs).map_err(|_| invalid("out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = VerifierConfig::default();
        assert_eq!(config.run_timeout, Duration::from_secs(5));
        assert_eq!(config.build_timeout, Duration::from_secs(60));
        assert_eq!((config.random_min, config.random_max), (-100, 100));
        assert_eq!(config.max_random, 8);
        assert_eq!(config.jobs, 1);
        assert_eq!(config.toolchain.python, "python3");
    }

    #[test]
    fn test_env_overlay() {
        let config = VerifierConfig::default()
            .overlay_env(env(&[
                (ENV_CXX, "clang++"),
                (ENV_RUN_TIMEOUT_SECS, "1.5"),
                (ENV_JAVA, "  "),
            ]))
            .unwrap();
        assert_eq!(config.toolchain.cxx, "clang++");
        assert_eq!(config.toolchain.java, "java");
        assert_eq!(config.run_timeout, Duration::from_millis(1500));
    }

    #[test]
    fn test_env_overlay_rejects_bad_timeouts() {
        for bad in ["abc", "0", "-3", "inf"] {
            let err = VerifierConfig::default()
                .overlay_env(env(&[(ENV_BUILD_TIMEOUT_SECS, bad)]))
                .unwrap_err();
            assert_eq!(err.var, ENV_BUILD_TIMEOUT_SECS);
            assert_eq!(err.value, bad);
        }
    }

    #[test]
    fn test_builders() {
        let config = VerifierConfig::new()
            .with_random_range(10, -10)
            .with_jobs(0)
            .with_seed(7)
            .with_max_random(3);
        assert_eq!((config.random_min, config.random_max), (-10, 10));
        assert_eq!(config.jobs, 1);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.max_random, 3);
    }
}
