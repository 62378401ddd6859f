/// Constants used throughout the gridmetrics codebase
// Environment variable names
pub const GRIDMETRICS_INITIAL_CAPACITY_VAR: &str = "GRIDMETRICS_INITIAL_CAPACITY";
pub const GRIDMETRICS_SHARD_AMOUNT_VAR: &str = "GRIDMETRICS_SHARD_AMOUNT";
pub const GRIDMETRICS_NAMESPACE_VAR: &str = "GRIDMETRICS_NAMESPACE";
pub const GRIDMETRICS_LOG_VAR: &str = "GRIDMETRICS_LOG";

// Registry defaults
pub const DEFAULT_INITIAL_CAPACITY: usize = 64;
pub const DEFAULT_NAMESPACE: &str = "gridclient_data";

// Default log filter when neither GRIDMETRICS_LOG nor RUST_LOG is set
pub const DEFAULT_LOG_FILTER: &str = "info";
