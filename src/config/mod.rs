// ABOUTME: Configuration module for the wellness engine runtime
// ABOUTME: Environment-driven settings; per-domain rule tables live in wellness-intelligence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// `WELLNESS_*` environment variables
pub mod environment;

pub use environment::{EngineConfig, DEFAULT_DATABASE_URL};
