// ABOUTME: Core types and constants for the wellness scoring engine
// ABOUTME: Foundation crate with error handling, pillar/snapshot/analysis models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Wellness Core
//!
//! Foundation crate providing shared types and constants for the wellness
//! scoring engine. This crate is designed to change infrequently so the
//! algorithm and provider crates can compile against a stable model.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and the engine error taxonomy
//! - **constants**: Score bounds, timeouts, and cache defaults
//! - **models**: Pillars, domains, daily snapshots, and analysis results

/// Unified error handling system with standard error codes
pub mod errors;

/// Engine constants organized by concern
pub mod constants;

/// Core data models (pillars, snapshots, analysis results)
pub mod models;
