use crate::error::{ConvertError, Result};
use crate::models::EnvironmentEntry;
use indexmap::IndexMap;
use regex::{Captures, Regex};
use serde::Serialize;
use std::sync::LazyLock;

static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(.*?)\}\}").expect("placeholder pattern is valid"));

static REFERENCE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{(.*?)\}").expect("reference pattern is valid"));

/// Replace every `{{name}}` placeholder with the Gatling expression `${name}`
pub fn translate_placeholder(text: &str) -> String {
    PLACEHOLDER_REGEX
        .replace_all(text, |caps: &Captures| format!("${{{}}}", &caps[1]))
        .into_owned()
}

/// Fully resolved environment variables, in first-declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Feeder {
    values: IndexMap<String, String>,
}

impl Feeder {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Render the feeder document: a single-element JSON array, pretty-printed
    pub fn to_document(&self) -> Result<String> {
        let mut document = serde_json::to_string_pretty(&[self])?;
        document.push('\n');
        Ok(document)
    }
}

/// Build the feeder from environment entries.
///
/// Disabled entries are skipped and a later entry overrides an earlier one
/// with the same key. References between entries are then substituted pass
/// after pass until a pass changes nothing. Entries that keep referencing
/// each other past `entries + 1` passes are reported as a cycle.
pub fn build_feeder(entries: &[EnvironmentEntry]) -> Result<Feeder> {
    let mut values: IndexMap<String, String> = IndexMap::new();
    for entry in entries.iter().filter(|entry| entry.enabled) {
        values.insert(entry.key.clone(), translate_placeholder(&entry.value));
    }

    let max_passes = values.len() + 1;
    for pass in 1..=max_passes {
        if !resolve_pass(&mut values) {
            tracing::debug!("Feeder resolved after {} pass(es)", pass);
            return Ok(Feeder { values });
        }
    }

    let cyclic: Vec<&str> = values
        .iter()
        .filter(|(_, value)| {
            REFERENCE_REGEX
                .captures_iter(value)
                .any(|caps| values.contains_key(&caps[1]))
        })
        .map(|(key, _)| key.as_str())
        .collect();

    Err(ConvertError::VariableCycle(cyclic.join(", ")))
}

/// Substitute known references in place. Returns whether anything changed.
fn resolve_pass(values: &mut IndexMap<String, String>) -> bool {
    let mut updated = false;

    for index in 0..values.len() {
        let Some((_, value)) = values.get_index(index) else {
            continue;
        };

        let mut substituted = false;
        let resolved = REFERENCE_REGEX
            .replace_all(value, |caps: &Captures| match values.get(&caps[1]) {
                Some(referent) => {
                    substituted = true;
                    referent.clone()
                }
                None => caps[0].to_string(),
            })
            .into_owned();

        if substituted {
            values[index] = resolved;
            updated = true;
        }
    }

    updated
}
