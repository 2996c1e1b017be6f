//! Pattern scanners over Postman test scripts
//!
//! Test scripts are JavaScript, but only a handful of idioms are recognized
//! and they are matched as text. Each scanner borrows the script and yields
//! its matches lazily in source order; calling it again restarts the scan.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// `tests["name"] = <expression>;` with the expression running to the first
/// unquoted `;` or end of line
static TEST_ASSIGNMENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"tests\s*\[\s*(?:"((?:[^"\\\n]|\\.)*)"|'((?:[^'\\\n]|\\.)*)'|`((?:[^`\\]|\\.)*)`)\s*\]\s*=\s*((?:"(?:[^"\\\n]|\\.)*"|'(?:[^'\\\n]|\\.)*'|`(?:[^`\\]|\\.)*`|[^;\n"'`])*)"#,
    )
    .expect("test assignment pattern is valid")
});

static STATUS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"responseCode\.code\s*(===|==|!==|!=)\s*(\d{2,3})\b")
        .expect("status pattern is valid")
});

static BODY_HAS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"responseBody\.has\s*\(\s*(?:"((?:[^"\\]|\\.)*)"|'((?:[^'\\]|\\.)*)'|`((?:[^`\\]|\\.)*)`)\s*\)"#,
    )
    .expect("body pattern is valid")
});

static SETTER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?:postman\.)?\b(setEnvironmentVariable|setGlobalVariable)\s*\(\s*["'`](\w*)["'`]\s*,\s*(.*?)\)(?:\s*;?\s*//\s*JSONPath=([^\n]*))?"#,
    )
    .expect("setter pattern is valid")
});

static STRING_LITERAL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*(?:"((?:[^"\\]|\\.)*)"|'((?:[^'\\]|\\.)*)'|`((?:[^`\\]|\\.)*)`)\s*$"#)
        .expect("literal pattern is valid")
});

static MEMBER_ACCESS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z_$][\w$]*)\.([\w$.\[\]]+)\s*$").expect("member pattern is valid")
});

static ESCAPE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\(.)").expect("escape pattern is valid"));

/// One assignment into the `tests` table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestAssignment<'s> {
    /// Test name, still escaped as written
    pub name: &'s str,
    /// Right-hand side of the assignment
    pub expression: &'s str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAssertion {
    Is(u16),
    IsNot(u16),
}

/// A `setEnvironmentVariable` / `setGlobalVariable` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableSetter<'s> {
    pub name: &'s str,
    /// Raw value expression
    pub value: &'s str,
    /// Trailing `//JSONPath=` annotation, if any
    pub json_path: Option<&'s str>,
    /// Byte offset of the call in the script
    pub offset: usize,
}

pub fn test_assignments(script: &str) -> impl Iterator<Item = TestAssignment<'_>> + '_ {
    TEST_ASSIGNMENT_REGEX.captures_iter(script).map(|caps| {
        let name = first_group(&caps, &[1, 2, 3]).unwrap_or_default();
        let expression = caps.get(4).map(|m| m.as_str().trim()).unwrap_or_default();
        TestAssignment { name, expression }
    })
}

/// Status code comparisons found inside test assignments
pub fn status_assertions(script: &str) -> impl Iterator<Item = StatusAssertion> + '_ {
    test_assignments(script).flat_map(|assignment| {
        STATUS_REGEX
            .captures_iter(assignment.expression)
            .filter_map(|caps| {
                let code: u16 = caps[2].parse().ok()?;
                if caps[1].starts_with('!') {
                    Some(StatusAssertion::IsNot(code))
                } else {
                    Some(StatusAssertion::Is(code))
                }
            })
    })
}

/// Literals passed to `responseBody.has(...)` inside test assignments, unescaped
pub fn body_contains(script: &str) -> impl Iterator<Item = String> + '_ {
    test_assignments(script).flat_map(|assignment| {
        BODY_HAS_REGEX
            .captures_iter(assignment.expression)
            .filter_map(|caps| first_group(&caps, &[1, 2, 3]).map(unescape))
    })
}

pub fn variable_setters(script: &str) -> impl Iterator<Item = VariableSetter<'_>> + '_ {
    SETTER_REGEX.captures_iter(script).filter_map(|caps| {
        let call = caps.get(0)?;
        Some(VariableSetter {
            name: caps.get(2)?.as_str(),
            value: caps.get(3)?.as_str().trim(),
            json_path: caps
                .get(4)
                .map(|m| m.as_str().trim())
                .filter(|path| !path.is_empty()),
            offset: call.start(),
        })
    })
}

/// The content of `value` when it is a single quoted string literal
pub fn string_literal(value: &str) -> Option<String> {
    let caps = STRING_LITERAL_REGEX.captures(value)?;
    first_group(&caps, &[1, 2, 3]).map(unescape)
}

/// Infer the JSON path read by `value` when it is `X.<path>` and `X` was
/// assigned `JSON.parse(responseBody)` before `offset`
pub fn inferred_json_path<'v>(script: &str, value: &'v str, offset: usize) -> Option<&'v str> {
    let caps = MEMBER_ACCESS_REGEX.captures(value)?;
    let variable = caps.get(1)?.as_str();
    let path = caps.get(2)?.as_str();

    let pattern = format!(
        r"(?:^|[^\w$.]){}\s*=\s*JSON\.parse\(\s*responseBody\s*\)",
        regex::escape(variable)
    );
    let parse_regex = Regex::new(&pattern).ok()?;

    let before = script.get(..offset)?;
    parse_regex.is_match(before).then_some(path)
}

fn first_group<'s>(caps: &Captures<'s>, groups: &[usize]) -> Option<&'s str> {
    groups
        .iter()
        .find_map(|&index| caps.get(index))
        .map(|m| m.as_str())
}

fn unescape(literal: &str) -> String {
    ESCAPE_REGEX.replace_all(literal, "$1").into_owned()
}
