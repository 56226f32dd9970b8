// ABOUTME: Command modules for wellness-cli
// ABOUTME: One module per subcommand family
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod analyze;
pub mod normalize;
pub mod rules;
pub mod run;
pub mod show;
