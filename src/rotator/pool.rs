//! Credential pool with sliding-window admission

use crate::clock::{Clock, SystemClock};
use crate::error::{CoreError, Result};
use crate::rotator::{config::RotatorConfig, usage::UsageWindow};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// A named authorization token for the outbound generative API
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub name: String,
    pub token: String,
}

impl Credential {
    pub fn new(name: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            token: token.into(),
        }
    }

    /// Token prefix safe for logs and stats
    pub fn masked(&self) -> String {
        let prefix: String = self.token.chars().take(8).collect();
        format!("{}...", prefix)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("name", &self.name)
            .field("token", &self.masked())
            .finish()
    }
}

/// Usage snapshot for one credential
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CredentialStats {
    pub name: String,
    pub masked: String,
    pub window_count: usize,
    pub lifetime_count: u64,
    pub safe_limit: usize,
    pub hard_limit: u32,
    /// Whether the credential is below its safe limit right now
    pub available: bool,
}

/// Rotates outbound requests across rate-limited credentials
///
/// The rotator only advises which credential to use; it never blocks or
/// rejects a caller. When every credential sits at its safe limit the
/// least-loaded one is returned anyway and an overage is recorded.
pub struct CredentialRotator {
    credentials: Vec<Credential>,
    config: RotatorConfig,
    clock: Arc<dyn Clock>,
    state: Mutex<RotatorState>,
}

struct RotatorState {
    usage: Vec<UsageWindow>,
    cursor: usize,
    overage_events: u64,
}

impl CredentialRotator {
    /// Build a rotator over an ordered credential pool
    pub fn new(
        credentials: Vec<Credential>,
        config: RotatorConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        if credentials.is_empty() {
            return Err(CoreError::ConfigError(
                "at least one credential is required".to_string(),
            ));
        }
        config.validate().map_err(CoreError::ConfigError)?;

        info!(
            "Credential rotator ready: {} credential(s), safe limit {}/{} per {:?}",
            credentials.len(),
            config.safe_limit(),
            config.hard_limit,
            config.window
        );

        let usage = credentials
            .iter()
            .map(|_| UsageWindow::new(config.history_capacity))
            .collect();

        Ok(Self {
            credentials,
            config,
            clock,
            state: Mutex::new(RotatorState {
                usage,
                cursor: 0,
                overage_events: 0,
            }),
        })
    }

    /// Build a rotator driven by the system clock
    pub fn with_system_clock(credentials: Vec<Credential>, config: RotatorConfig) -> Result<Self> {
        Self::new(credentials, config, Arc::new(SystemClock))
    }

    /// Select a credential for the next outbound request and record its use
    pub fn acquire(&self) -> Credential {
        let now = self.clock.now();
        let window = self.config.window;
        let safe_limit = self.config.safe_limit();
        let pool_size = self.credentials.len();

        let mut state = self.lock_state();
        for usage in state.usage.iter_mut() {
            usage.prune(now, window);
        }

        let counts: Vec<usize> = state
            .usage
            .iter()
            .map(|usage| usage.window_count(now, window))
            .collect();

        let below_limit = (0..pool_size)
            .map(|offset| (state.cursor + offset) % pool_size)
            .find(|&idx| counts[idx] < safe_limit);

        let chosen = match below_limit {
            Some(idx) => idx,
            None => {
                // First minimum wins, which keeps ties in pool order
                let idx = (0..pool_size).min_by_key(|&idx| counts[idx]).unwrap_or(0);
                state.overage_events += 1;
                warn!(
                    "All {} credential(s) at safe limit {}; falling back to {} ({} requests in window)",
                    pool_size, safe_limit, self.credentials[idx].name, counts[idx]
                );
                idx
            }
        };

        state.cursor = (chosen + 1) % pool_size;
        state.usage[chosen].record(now);

        debug!(
            "Acquired credential {} ({} in window)",
            self.credentials[chosen].name,
            counts[chosen] + 1
        );

        self.credentials[chosen].clone()
    }

    /// Per-credential usage snapshots in pool order
    pub fn stats(&self) -> Vec<CredentialStats> {
        let now = self.clock.now();
        let safe_limit = self.config.safe_limit();
        let state = self.lock_state();

        self.credentials
            .iter()
            .zip(state.usage.iter())
            .map(|(credential, usage)| {
                let window_count = usage.window_count(now, self.config.window);
                CredentialStats {
                    name: credential.name.clone(),
                    masked: credential.masked(),
                    window_count,
                    lifetime_count: usage.lifetime(),
                    safe_limit,
                    hard_limit: self.config.hard_limit,
                    available: window_count < safe_limit,
                }
            })
            .collect()
    }

    pub fn pool_size(&self) -> usize {
        self.credentials.len()
    }

    pub fn safe_limit(&self) -> usize {
        self.config.safe_limit()
    }

    /// Number of acquisitions served above the safe limit
    pub fn overage_events(&self) -> u64 {
        self.lock_state().overage_events
    }

    fn lock_state(&self) -> MutexGuard<'_, RotatorState> {
        // State stays consistent even if a holder panicked mid-read
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
