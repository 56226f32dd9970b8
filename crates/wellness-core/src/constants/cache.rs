// ABOUTME: Session cache constants for capacity, TTL, and cleanup intervals
// ABOUTME: Bounds the per-(user, domain, date) orchestration session store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Default maximum sessions held in memory
pub const DEFAULT_SESSION_CACHE_MAX_ENTRIES: usize = 1_000;

/// Default session TTL in seconds (1 hour)
pub const DEFAULT_SESSION_TTL_SECS: u64 = 3_600;

/// Default cleanup interval in seconds for expired sessions
pub const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 300; // 5 minutes

/// Cache key prefix for namespacing
pub const CACHE_KEY_PREFIX: &str = "wellness:session:";
