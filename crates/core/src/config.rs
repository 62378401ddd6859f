//! Metrics registry configuration with environment overrides and validation
use crate::constants::{
    DEFAULT_INITIAL_CAPACITY, DEFAULT_NAMESPACE, GRIDMETRICS_INITIAL_CAPACITY_VAR,
    GRIDMETRICS_NAMESPACE_VAR, GRIDMETRICS_SHARD_AMOUNT_VAR,
};
use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};

/// Configuration for a metrics registry and its reporters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MetricsConfig {
    /// Number of entities the registry pre-allocates room for
    pub initial_capacity: usize,
    /// Number of shards in the registry map; `None` lets the map pick
    pub shard_amount: Option<usize>,
    /// Prefix for exported metric family names
    pub namespace: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            shard_amount: None,
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

impl MetricsConfig {
    /// Start building a configuration from defaults
    pub fn builder() -> MetricsConfigBuilder {
        MetricsConfigBuilder::new()
    }

    /// Load the defaults, overridden by `GRIDMETRICS_*` environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(value) = read_var(GRIDMETRICS_INITIAL_CAPACITY_VAR) {
            config.initial_capacity = parse_usize(GRIDMETRICS_INITIAL_CAPACITY_VAR, &value)?;
        }
        if let Some(value) = read_var(GRIDMETRICS_SHARD_AMOUNT_VAR) {
            config.shard_amount = Some(parse_usize(GRIDMETRICS_SHARD_AMOUNT_VAR, &value)?);
        }
        if let Some(value) = read_var(GRIDMETRICS_NAMESPACE_VAR) {
            config.namespace = value;
        }

        config.validate()?;
        tracing::debug!(?config, "loaded metrics configuration from environment");
        Ok(config)
    }

    /// Parse a JSON document, filling missing fields with defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values the registry cannot use
    pub fn validate(&self) -> Result<()> {
        if let Some(shards) = self.shard_amount {
            if shards < 2 || !shards.is_power_of_two() {
                return Err(Error::configuration(format!(
                    "shard amount must be a power of two greater than 1, got {shards}"
                )));
            }
        }

        if self.namespace.is_empty() {
            return Err(Error::configuration("namespace must not be empty"));
        }

        let mut chars = self.namespace.chars();
        let valid_start = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(Error::configuration(format!(
                "namespace '{}' must match [a-zA-Z_][a-zA-Z0-9_]*",
                self.namespace
            )));
        }

        Ok(())
    }
}

fn read_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_usize(name: &str, value: &str) -> Result<usize> {
    value
        .parse()
        .map_err(|e| Error::configuration(format!("{name}='{value}' is not a valid count: {e}")))
}

/// Builder for creating metrics configurations
#[derive(Debug, Default)]
pub struct MetricsConfigBuilder {
    config: MetricsConfig,
}

impl MetricsConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial registry capacity
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.config.initial_capacity = capacity;
        self
    }

    /// Set the registry shard amount
    pub fn with_shard_amount(mut self, shards: usize) -> Self {
        self.config.shard_amount = Some(shards);
        self
    }

    /// Set the exported metric namespace
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.config.namespace = namespace.into();
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<MetricsConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
