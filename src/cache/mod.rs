// ABOUTME: Bounded session cache configuration and keys for orchestration sessions
// ABOUTME: Sessions are keyed by user, domain and day and expire after a TTL
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// In-memory LRU + TTL cache with background cleanup
pub mod memory;

pub use memory::SessionCache;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;
use wellness_core::constants::cache::{
    CACHE_KEY_PREFIX, DEFAULT_CLEANUP_INTERVAL_SECS, DEFAULT_SESSION_CACHE_MAX_ENTRIES,
    DEFAULT_SESSION_TTL_SECS,
};
use wellness_core::models::WellnessDomain;

/// Session cache bounds
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum sessions held; least recently used are evicted first
    pub max_entries: usize,
    /// Lifetime of a session after its last write
    pub ttl: Duration,
    /// How often the background task sweeps expired sessions
    pub cleanup_interval: Duration,
    /// Spawn the sweeping task (needs a running tokio runtime)
    pub enable_background_cleanup: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_SESSION_CACHE_MAX_ENTRIES,
            ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
            cleanup_interval: Duration::from_secs(DEFAULT_CLEANUP_INTERVAL_SECS),
            enable_background_cleanup: true,
        }
    }
}

/// Identity of one orchestration session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionKey {
    /// User the session belongs to
    pub user_id: Uuid,
    /// Domain being analyzed
    pub domain: WellnessDomain,
    /// Day being analyzed
    pub date: NaiveDate,
}

impl SessionKey {
    /// Build a session key
    #[must_use]
    pub const fn new(user_id: Uuid, domain: WellnessDomain, date: NaiveDate) -> Self {
        Self {
            user_id,
            domain,
            date,
        }
    }

    /// Glob matching every session of one user, for `invalidate_pattern`
    #[must_use]
    pub fn user_pattern(user_id: Uuid) -> String {
        format!("{CACHE_KEY_PREFIX}{user_id}:*")
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{CACHE_KEY_PREFIX}{}:{}:{}",
            self.user_id, self.domain, self.date
        )
    }
}
