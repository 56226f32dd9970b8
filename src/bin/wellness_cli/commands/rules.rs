// ABOUTME: Rules command printing one domain's validated rule table as JSON
// ABOUTME: Fails if the built-in table does not pass validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::Result;
use wellness_engine::wellness_core::models::WellnessDomain;
use wellness_engine::wellness_intelligence::DomainRules;

use crate::helpers::files::print_json;

/// Print the rule table for `domain`
pub fn run(domain: WellnessDomain) -> Result<()> {
    let rules = DomainRules::load(domain)?;
    print_json(&rules)
}
