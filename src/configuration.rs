use serde::{Deserialize, Serialize};

/// Prefix for environment overrides, e.g. `RELAY_CONSENSUS_NODE_COUNT=3`.
pub const ENVIRONMENT_PREFIX: &str = "RELAY";

/// Client-side settings consumed by the dispatcher and the consensus coordinator.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Configuration {
    /// Cap on remembered dispatcher candidates, 0 for no cap.
    pub max_dispatchers: usize,
    /// Cap on cached sessions, 0 for no cap.
    pub max_sessions: usize,
    /// Number of distinct nodes queried per consensus relay.
    pub consensus_node_count: usize,
    /// Transport timeout in milliseconds.
    pub request_timeout: u64,
    pub accept_disputed_responses: bool,
    /// Upper bound on refresh attempts per stale-session episode.
    pub max_session_refresh_retries: usize,
    pub validate_relay_responses: bool,
    pub reject_self_signed_certificates: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            max_dispatchers: 0,
            max_sessions: 0,
            consensus_node_count: 0,
            request_timeout: 10_000,
            accept_disputed_responses: false,
            max_session_refresh_retries: 1,
            validate_relay_responses: true,
            reject_self_signed_certificates: true,
        }
    }
}

impl Configuration {
    /// Loads the configuration from an optional file named `config_name` (any
    /// format the `config` crate recognises) and then `RELAY_*` environment
    /// variables. Keys missing from both fall back to the defaults.
    pub fn load(config_name: &str) -> crate::Result<Configuration> {
        let mut settings = config::Config::default();
        settings.merge(config::File::with_name(config_name).required(false))?;
        settings.merge(config::Environment::with_prefix(ENVIRONMENT_PREFIX))?;
        Ok(settings.try_into::<Configuration>()?)
    }

    pub fn with_max_dispatchers(mut self, max_dispatchers: usize) -> Self {
        self.max_dispatchers = max_dispatchers;
        self
    }

    pub fn with_consensus_node_count(mut self, consensus_node_count: usize) -> Self {
        self.consensus_node_count = consensus_node_count;
        self
    }

    pub fn with_accept_disputed_responses(mut self, accept_disputed_responses: bool) -> Self {
        self.accept_disputed_responses = accept_disputed_responses;
        self
    }

    pub fn with_max_session_refresh_retries(mut self, max_session_refresh_retries: usize) -> Self {
        self.max_session_refresh_retries = max_session_refresh_retries;
        self
    }

    pub fn with_request_timeout(mut self, request_timeout: u64) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn with_validate_relay_responses(mut self, validate_relay_responses: bool) -> Self {
        self.validate_relay_responses = validate_relay_responses;
        self
    }

    pub fn with_reject_self_signed_certificates(
        mut self,
        reject_self_signed_certificates: bool,
    ) -> Self {
        self.reject_self_signed_certificates = reject_self_signed_certificates;
        self
    }
}
