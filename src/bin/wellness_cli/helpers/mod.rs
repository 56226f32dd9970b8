// ABOUTME: Helper modules for wellness-cli
// ABOUTME: File loading and result display
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod display;
pub mod files;
