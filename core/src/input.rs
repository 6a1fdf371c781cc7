use std::collections::HashMap;
use anyhow::{anyhow, Result};

use crate::error::BunkrError;
use crate::model::bunk::TargetPercent;
use crate::model::ledger::ActionKind;

#[derive(Debug, PartialEq)]
pub struct ParsedInput {
    pub name: String,
    pub metadata: HashMap<String, String>,
}

pub fn parse_args(args: &[String]) -> ParsedInput {
    let mut name_parts = Vec::new();
    let mut metadata = HashMap::new();

    for arg in args {
        if let Some((key, value)) = arg.split_once(':') {
            if !key.is_empty() {
                metadata.insert(key.to_string(), value.to_string());
                continue;
            }
        }
        name_parts.push(arg.as_str());
    }

    ParsedInput {
        name: name_parts.join(" "),
        metadata,
    }
}

pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String> {
    // 1. Exact match
    if candidates.contains(&key) {
        return Ok(key.to_string());
    }

    // 2. Prefix match
    let matches: Vec<&str> = candidates
        .iter()
        .filter(|&&c| c.starts_with(key))
        .cloned()
        .collect();

    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(anyhow!("Unknown key: '{}'", key)),
        _ => Err(anyhow!("Ambiguous key: '{}' matches {:?}", key, matches)),
    }
}

/// Accepts an action label or any unique prefix of one, e.g. `p`, `abs`, `lab-p`.
pub fn parse_action(input: &str) -> Result<ActionKind> {
    let normalized = input.trim().to_lowercase().replace('_', "-");
    if normalized.is_empty() {
        return Err(BunkrError::UnknownAction(input.to_string()).into());
    }

    if let Some(exact) = ActionKind::ALL.into_iter().find(|a| a.label() == normalized) {
        return Ok(exact);
    }

    let matches: Vec<ActionKind> = ActionKind::ALL
        .into_iter()
        .filter(|a| a.label().starts_with(&normalized))
        .collect();

    match matches.as_slice() {
        [single] => Ok(*single),
        [] => Err(BunkrError::UnknownAction(input.to_string()).into()),
        many => Err(BunkrError::AmbiguousAction {
            input: input.to_string(),
            matches: many.iter().map(|a| a.label().to_string()).collect(),
        }
        .into()),
    }
}

/// `75` or `75%`.
pub fn parse_target(input: &str) -> Result<TargetPercent> {
    let trimmed = input.trim();
    let digits = trimmed.strip_suffix('%').unwrap_or(trimmed);
    let value: i64 = digits
        .parse()
        .map_err(|_| anyhow!("Invalid target: '{}'", input))?;
    Ok(TargetPercent::new(value)?)
}
