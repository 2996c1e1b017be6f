//! Analysis of raw Postman requests
//!
//! Turns one exported request record into a [`RequestModel`]: method, URL,
//! authentication, headers, body and the checks recognized in its test
//! script.

pub mod scanners;

use crate::models::{Auth, AuthKind, Body, Capture, Checks, RawRequest, RequestModel};
use crate::variable::translate_placeholder;
use crate::warnings::Warnings;
use indexmap::IndexMap;
use regex::Regex;
use scanners::StatusAssertion;
use std::sync::LazyLock;

/// Filename used for binary bodies the collection does not name
pub const UNKNOWN_BODY_FILENAME: &str = "YOUR_FILENAME_HERE";

static UNSAFE_FILENAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9-]").expect("filename pattern is valid"));

static CONTENT_DISPOSITION_FILENAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)filename\*?\s*=\s*(?:[\w!#$%&+^`{}~.-]*'[\w-]*')?["']?([^"';]+)["']?"#)
        .expect("content disposition pattern is valid")
});

/// Replace every character outside `[A-Za-z0-9-]` with `_`
pub fn safe_filename(name: &str) -> String {
    UNSAFE_FILENAME_CHARS.replace_all(name, "_").into_owned()
}

/// Builds request models, recording advisory problems as warnings
pub struct RequestAnalyzer<'a> {
    warnings: &'a Warnings,
}

impl<'a> RequestAnalyzer<'a> {
    pub fn new(warnings: &'a Warnings) -> Self {
        Self { warnings }
    }

    /// Analyze one raw request
    pub fn analyze(&self, raw: &RawRequest) -> RequestModel {
        let auth = self.build_auth(raw);
        let headers = Self::build_headers(raw, auth.is_some());
        let body = self.build_body(raw, &headers);
        let checks = self.build_checks(raw);

        tracing::debug!(
            "Analyzed request '{}': {} header(s), body: {}, {} check(s)",
            raw.name,
            headers.len(),
            body.is_some(),
            checks.len()
        );

        RequestModel {
            name: raw.name.clone(),
            method: translate_placeholder(&raw.method.to_lowercase()),
            url: translate_placeholder(&raw.url),
            auth,
            headers,
            body,
            checks,
        }
    }

    fn build_auth(&self, raw: &RawRequest) -> Option<Auth> {
        let helper = raw.current_helper.as_deref()?;

        let Some(kind) = AuthKind::from_helper(helper) else {
            if helper != "normal" {
                self.warnings.add(format!(
                    "For request <{}> : Authentication helper {} is not supported",
                    raw.name, helper
                ));
            }
            return None;
        };

        let attributes = raw.helper_attributes.clone().unwrap_or_default();
        Some(Auth {
            kind,
            user: translate_placeholder(&attributes.username),
            password: translate_placeholder(&attributes.password),
        })
    }

    fn build_headers(raw: &RawRequest, has_auth: bool) -> IndexMap<String, String> {
        let mut headers = IndexMap::new();

        for line in raw.headers.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let Some((key, value)) = line.split_once(':') else {
                continue;
            };

            let key = key.trim();
            if has_auth && key.eq_ignore_ascii_case("Authorization") {
                continue;
            }

            headers.insert(translate_placeholder(key), translate_placeholder(value.trim()));
        }

        headers
    }

    fn build_body(&self, raw: &RawRequest, headers: &IndexMap<String, String>) -> Option<Body> {
        match raw.data_mode.as_deref() {
            Some("raw") => Some(Body {
                filename: format!("{}_stringbody.txt", safe_filename(&raw.name)),
                content: raw.raw_mode_data.as_deref().map(translate_placeholder),
            }),
            Some("binary") => {
                let filename = headers
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case("Content-Disposition"))
                    .and_then(|(_, value)| content_disposition_filename(value))
                    .unwrap_or_else(|| UNKNOWN_BODY_FILENAME.to_string());

                Some(Body {
                    filename,
                    content: None,
                })
            }
            Some(mode @ ("params" | "urlencoded")) => {
                self.warnings.add(format!(
                    "For request <{}> : Body mode {} is not supported",
                    raw.name, mode
                ));
                None
            }
            _ => None,
        }
    }

    fn build_checks(&self, raw: &RawRequest) -> Checks {
        let mut checks = Checks::default();
        let Some(script) = raw.tests.as_deref() else {
            return checks;
        };

        for assertion in scanners::status_assertions(script) {
            let (codes, code) = match assertion {
                StatusAssertion::Is(code) => (&mut checks.status, code),
                StatusAssertion::IsNot(code) => (&mut checks.not_status, code),
            };
            if !codes.contains(&code) {
                codes.push(code);
            }
        }

        checks.body_has = scanners::body_contains(script)
            .map(|literal| regex::escape(&literal))
            .collect();

        for setter in scanners::variable_setters(script) {
            if let Some(value) = scanners::string_literal(setter.value) {
                checks.captures.push(Capture::Literal {
                    name: setter.name.to_string(),
                    value: translate_placeholder(&value),
                });
                continue;
            }

            let path = setter
                .json_path
                .or_else(|| scanners::inferred_json_path(script, setter.value, setter.offset));

            match path {
                Some(path) => checks.captures.push(Capture::Json {
                    name: setter.name.to_string(),
                    path: path.trim_start_matches("$.").to_string(),
                }),
                None => self.warnings.add(format!(
                    "For request <{}> : Value of variable {} could not be extracted, add a //JSONPath= comment",
                    raw.name, setter.name
                )),
            }
        }

        checks
    }
}

fn content_disposition_filename(value: &str) -> Option<String> {
    CONTENT_DISPOSITION_FILENAME
        .captures(value)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|filename| !filename.is_empty())
}
