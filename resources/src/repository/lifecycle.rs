// Copyright (c) The Plinth Authors. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use plinth_common::schema::{LifecycleRule, TagStatus};
use serde_json::{json, Value};
use validator::Validate;

use crate::error::{Error, Result};

/// Checks a complete set of rules, each one on its own and all of them together.
pub(crate) fn validate(rules: &[LifecycleRule]) -> Result<()> {
    for rule in rules {
        rule.validate().map_err(Error::InvalidConfiguration)?;
        validate_rule(rule)?;
    }

    let any_rules: Vec<&LifecycleRule> =
        rules.iter().filter(|rule| rule.resolved_tag_status() == TagStatus::Any).collect();
    if any_rules.len() > 1 {
        return Err(Error::InvalidLifecycleRule("only one rule with tagStatus any is allowed".into()));
    }

    let mut priorities: Vec<u32> = rules.iter().filter_map(|rule| rule.rule_priority).collect();
    priorities.sort_unstable();
    if let Some(window) = priorities.windows(2).find(|window| window[0] == window[1]) {
        return Err(Error::InvalidLifecycleRule(format!("duplicate rulePriority {}", window[0])));
    }

    let highest = priorities.last().copied().unwrap_or(0);
    let unassigned = rules.iter().filter(|rule| rule.rule_priority.is_none()).count();
    if u32::try_from(unassigned).ok().and_then(|count| highest.checked_add(count)).is_none() {
        return Err(Error::InvalidLifecycleRule(format!(
            "rulePriority {} leaves no room for the {} rules without one",
            highest, unassigned
        )));
    }

    // The catch-all rule is evaluated last.
    let last = prioritize(rules).last().map(|(_, rule)| rule.resolved_tag_status());
    if !any_rules.is_empty() && last != Some(TagStatus::Any) {
        return Err(Error::InvalidLifecycleRule("the rule with tagStatus any must have the highest rulePriority".into()));
    }

    Ok(())
}

fn validate_rule(rule: &LifecycleRule) -> Result<()> {
    if rule.max_image_count.is_some() == rule.max_image_age_days.is_some() {
        return Err(Error::InvalidLifecycleRule(
            "exactly one of maxImageCount or maxImageAgeDays must be set".into(),
        ));
    }

    match rule.resolved_tag_status() {
        TagStatus::Tagged if rule.tag_prefix_list.is_empty() => Err(Error::InvalidLifecycleRule(
            "tagPrefixList is required when tagStatus is tagged".into(),
        )),
        TagStatus::Any | TagStatus::Untagged if !rule.tag_prefix_list.is_empty() => Err(Error::InvalidLifecycleRule(
            "tagPrefixList can only be set when tagStatus is tagged".into(),
        )),
        _ => Ok(()),
    }
}

/// Assigns priorities and orders the rules by them.
///
/// Explicit priorities are kept. The other rules follow the highest explicit
/// priority in the order they were added, with the `any` rule last.
/// The rules must have passed `validate`, which keeps the priorities in range.
pub(crate) fn prioritize(rules: &[LifecycleRule]) -> Vec<(u32, &LifecycleRule)> {
    let mut last = rules.iter().filter_map(|rule| rule.rule_priority).max().unwrap_or(0);
    let mut prioritized = vec![];
    let mut catch_all = None;

    for rule in rules {
        match rule.rule_priority {
            Some(priority) => prioritized.push((priority, rule)),
            None if rule.resolved_tag_status() == TagStatus::Any => catch_all = Some(rule),
            None => {
                last += 1;
                prioritized.push((last, rule));
            }
        }
    }
    if let Some(rule) = catch_all {
        prioritized.push((last + 1, rule));
    }

    prioritized.sort_by_key(|(priority, _)| *priority);
    prioritized
}

/// Returns the lifecycle policy document, `{"rules": [...]}`.
pub(crate) fn policy(rules: &[LifecycleRule]) -> Value {
    let rules: Vec<Value> = prioritize(rules).into_iter().map(|(priority, rule)| render_rule(priority, rule)).collect();
    json!({ "rules": rules })
}

fn render_rule(priority: u32, rule: &LifecycleRule) -> Value {
    let mut selection = json!({ "tagStatus": rule.resolved_tag_status().token() });
    if !rule.tag_prefix_list.is_empty() {
        selection["tagPrefixList"] = json!(rule.tag_prefix_list);
    }

    match (rule.max_image_count, rule.max_image_age_days) {
        (Some(count), _) => {
            selection["countType"] = json!("imageCountMoreThan");
            selection["countNumber"] = json!(count);
        }
        (None, Some(days)) => {
            selection["countType"] = json!("sinceImagePushed");
            selection["countNumber"] = json!(days);
            selection["countUnit"] = json!("days");
        }
        (None, None) => {}
    }

    let mut rendered = json!({
        "rulePriority": priority,
        "selection": selection,
        "action": { "type": "expire" },
    });
    if let Some(description) = &rule.description {
        rendered["description"] = json!(description);
    }

    rendered
}
