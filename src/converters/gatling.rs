//! Gatling scenario converter
//!
//! Renders each request as an `.exec(http(...))` block of the Gatling Scala
//! DSL. Bodies are referenced through `RawFileBody`, and their files are
//! written and checked in the background.

use super::{Converter, RenderContext};
use crate::models::{Auth, Body, Capture, Checks, RequestModel};
use crate::pending::WorkHandle;
use std::path::{Path, PathBuf};

/// Converter for generating Gatling request chains
#[derive(Debug, Clone, Default)]
pub struct GatlingConverter;

impl GatlingConverter {
    /// Create a new GatlingConverter
    pub fn new() -> Self {
        Self
    }

    /// Indentation for the given depth, two spaces per level
    fn indent(depth: usize) -> String {
        "  ".repeat(depth)
    }

    /// Escape a value for a double-quoted Scala string literal
    fn scala_string(value: &str) -> String {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    }

    /// `.feed(...)` step reading the simulation's feeder document, one line
    /// at the given depth
    pub fn feed_step(&self, simulation_name: &str, indent: usize) -> String {
        format!(
            "{}.feed(jsonFile({}).circular)\n",
            Self::indent(indent),
            Self::scala_string(&format!("{}.json", simulation_name))
        )
    }

    fn auth_line(auth: &Auth) -> String {
        format!(
            ".{}({}, {})",
            auth.kind.builder_method(),
            Self::scala_string(&auth.user),
            Self::scala_string(&auth.password)
        )
    }

    /// Check expressions in rendering order: status, negated status,
    /// body patterns, then captures
    fn check_expressions(checks: &Checks) -> Vec<String> {
        let mut expressions = Vec::new();

        match checks.status.as_slice() {
            [] => {}
            [code] => expressions.push(format!("status.is({})", code)),
            codes => {
                let codes: Vec<String> = codes.iter().map(|code| code.to_string()).collect();
                expressions.push(format!("status.in({})", codes.join(", ")));
            }
        }

        for code in &checks.not_status {
            expressions.push(format!("status.not({})", code));
        }

        for pattern in &checks.body_has {
            expressions.push(format!("regex({}).exists", Self::scala_string(pattern)));
        }

        for capture in &checks.captures {
            let expression = match capture {
                Capture::Literal { name, value } => format!(
                    "status.transform(string => {}).saveAs({})",
                    Self::scala_string(value),
                    Self::scala_string(name)
                ),
                Capture::Json { name, path } => format!(
                    "jsonPath({}).saveAs({})",
                    Self::scala_string(&format!("$.{}", path)),
                    Self::scala_string(name)
                ),
            };
            expressions.push(expression);
        }

        expressions
    }

    /// Register the body file write (when the body has content) and the
    /// check that the file is in place afterwards
    fn schedule_body_file(request_name: &str, body: &Body, path: PathBuf, ctx: &RenderContext<'_>) {
        let write: Option<WorkHandle> = body
            .content
            .as_ref()
            .filter(|content| !content.is_empty())
            .map(|content| {
                let content = content.clone();
                let path = path.clone();
                ctx.pending.add(format!("write {}", path.display()), async move {
                    match tokio::fs::write(&path, content).await {
                        Ok(()) => tracing::debug!("Wrote body file {}", path.display()),
                        Err(e) => {
                            tracing::error!("Failed to write body file {}: {}", path.display(), e)
                        }
                    }
                })
            });

        let warnings = ctx.warnings.clone();
        let request_name = request_name.to_string();
        ctx.pending.add(format!("check {}", path.display()), async move {
            if let Some(write) = write {
                write.await;
            }

            if !is_writable(&path).await {
                warnings.add(format!(
                    "For request <{}> : Please provide file {}",
                    request_name,
                    path.display()
                ));
            }
        });
    }
}

/// Whether `path` is an existing file that can be opened for writing
async fn is_writable(path: &Path) -> bool {
    tokio::fs::OpenOptions::new()
        .write(true)
        .open(path)
        .await
        .is_ok()
}

impl Converter for GatlingConverter {
    type Output = String;

    fn convert_request(&self, request: &RequestModel, ctx: &RenderContext<'_>) -> Self::Output {
        let outer = Self::indent(ctx.indent);
        let inner = Self::indent(ctx.indent + 1);
        let mut lines = Vec::new();

        lines.push(format!("{}.exec(http({})", outer, Self::scala_string(&request.name)));
        lines.push(format!(
            "{}.{}({})",
            inner,
            request.method,
            Self::scala_string(&request.url)
        ));

        if let Some(ref auth) = request.auth {
            lines.push(format!("{}{}", inner, Self::auth_line(auth)));
        }

        for (key, value) in &request.headers {
            lines.push(format!(
                "{}.header({}, {})",
                inner,
                Self::scala_string(key),
                Self::scala_string(value)
            ));
        }

        if let Some(ref body) = request.body {
            let resource = format!("{}/{}", ctx.simulation_name, body.filename);
            lines.push(format!(
                "{}.body(RawFileBody({}))",
                inner,
                Self::scala_string(&resource)
            ));

            let path = ctx
                .bodies_path
                .join(ctx.simulation_name)
                .join(&body.filename);
            Self::schedule_body_file(&request.name, body, path, ctx);
        }

        let checks = Self::check_expressions(&request.checks);
        if !checks.is_empty() {
            let check_indent = Self::indent(ctx.indent + 2);
            let checks: Vec<String> = checks
                .iter()
                .map(|check| format!("{}{}", check_indent, check))
                .collect();

            lines.push(format!("{}.check(", inner));
            lines.push(checks.join(",\n"));
            lines.push(format!("{})", inner));
        }

        lines.push(format!("{})", outer));

        let mut block = lines.join("\n");
        block.push('\n');
        block
    }

    fn convert_requests(
        &self,
        requests: &[RequestModel],
        ctx: &RenderContext<'_>,
    ) -> Self::Output {
        requests
            .iter()
            .map(|request| self.convert_request(request, ctx))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AuthKind;
    use crate::pending::PendingWork;
    use crate::warnings::Warnings;
    use indexmap::IndexMap;
    use tempfile::TempDir;

    fn request(name: &str) -> RequestModel {
        RequestModel {
            name: name.to_string(),
            method: "get".to_string(),
            url: "${host}/users".to_string(),
            auth: None,
            headers: IndexMap::new(),
            body: None,
            checks: Checks::default(),
        }
    }

    fn context<'a>(
        bodies: &'a Path,
        pending: &'a PendingWork,
        warnings: &'a Warnings,
    ) -> RenderContext<'a> {
        RenderContext {
            simulation_name: "Sim",
            bodies_path: bodies,
            indent: 2,
            pending,
            warnings,
        }
    }

    #[test]
    fn test_scala_string() {
        assert_eq!(GatlingConverter::scala_string("plain"), "\"plain\"");
        assert_eq!(
            GatlingConverter::scala_string(r#"say "hi" \o/"#),
            r#""say \"hi\" \\o/""#
        );
    }

    #[test]
    fn test_feed_step() {
        assert_eq!(
            GatlingConverter::new().feed_step("Sim", 2),
            "    .feed(jsonFile(\"Sim.json\").circular)\n"
        );
    }

    #[test]
    fn test_request_without_body_needs_no_runtime() {
        let dir = TempDir::new().unwrap();
        let pending = PendingWork::new();
        let warnings = Warnings::new();
        let ctx = context(dir.path(), &pending, &warnings);

        let text = GatlingConverter::new().convert_request(&request("List users"), &ctx);

        assert!(text.starts_with("    .exec(http(\"List users\")"));
        assert!(pending.is_empty());
    }

    #[test]
    #[should_panic]
    fn test_request_with_body_outside_runtime_panics() {
        let dir = TempDir::new().unwrap();
        let pending = PendingWork::new();
        let warnings = Warnings::new();
        let ctx = context(dir.path(), &pending, &warnings);

        let mut model = request("Upload");
        model.body = Some(Body {
            filename: "data.bin".to_string(),
            content: None,
        });

        GatlingConverter::new().convert_request(&model, &ctx);
    }

    #[tokio::test]
    async fn test_convert_minimal_request() {
        let dir = TempDir::new().unwrap();
        let pending = PendingWork::new();
        let warnings = Warnings::new();
        let ctx = context(dir.path(), &pending, &warnings);

        let text = GatlingConverter::new().convert_request(&request("List users"), &ctx);

        assert_eq!(
            text,
            "    .exec(http(\"List users\")\n      .get(\"${host}/users\")\n    )\n"
        );
        assert!(pending.is_empty());
    }

    #[tokio::test]
    async fn test_convert_full_request() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("Sim")).unwrap();
        let pending = PendingWork::new();
        let warnings = Warnings::new();
        let ctx = context(dir.path(), &pending, &warnings);

        let mut model = request("Create");
        model.method = "post".to_string();
        model.auth = Some(Auth {
            kind: AuthKind::Basic,
            user: "admin".to_string(),
            password: "${password}".to_string(),
        });
        model.headers.insert("Content-Type".to_string(), "application/json".to_string());
        model.headers.insert("Accept".to_string(), "*/*".to_string());
        model.body = Some(Body {
            filename: "Create_stringbody.txt".to_string(),
            content: Some("{}".to_string()),
        });
        model.checks = Checks {
            status: vec![200, 201],
            not_status: vec![500],
            body_has: vec![r"a\.b".to_string()],
            captures: vec![Capture::Json {
                name: "id".to_string(),
                path: "data.id".to_string(),
            }],
        };

        let text = GatlingConverter::new().convert_request(&model, &ctx);
        let expected = [
            "    .exec(http(\"Create\")",
            "      .post(\"${host}/users\")",
            "      .basicAuth(\"admin\", \"${password}\")",
            "      .header(\"Content-Type\", \"application/json\")",
            "      .header(\"Accept\", \"*/*\")",
            "      .body(RawFileBody(\"Sim/Create_stringbody.txt\"))",
            "      .check(",
            "        status.in(200, 201),",
            "        status.not(500),",
            "        regex(\"a\\\\.b\").exists,",
            "        jsonPath(\"$.data.id\").saveAs(\"id\")",
            "      )",
            "    )",
            "",
        ]
        .join("\n");
        assert_eq!(text, expected);

        pending.join().await;
        let written = std::fs::read_to_string(dir.path().join("Sim/Create_stringbody.txt")).unwrap();
        assert_eq!(written, "{}");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_single_status_and_literal_capture() {
        let checks = Checks {
            status: vec![200],
            captures: vec![Capture::Literal {
                name: "mode".to_string(),
                value: "fast".to_string(),
            }],
            ..Default::default()
        };

        assert_eq!(
            GatlingConverter::check_expressions(&checks),
            vec![
                "status.is(200)".to_string(),
                "status.transform(string => \"fast\").saveAs(\"mode\")".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_binary_body_warns() {
        let dir = TempDir::new().unwrap();
        let pending = PendingWork::new();
        let warnings = Warnings::new();
        let ctx = context(dir.path(), &pending, &warnings);

        let mut model = request("Upload");
        model.body = Some(Body {
            filename: "YOUR_FILENAME_HERE".to_string(),
            content: None,
        });

        let text = GatlingConverter::new().convert_request(&model, &ctx);
        assert!(text.contains(".body(RawFileBody(\"Sim/YOUR_FILENAME_HERE\"))"));

        pending.join().await;

        let mut messages = Vec::new();
        warnings.drain(|message| messages.push(message.to_string()));
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("For request <Upload> : Please provide file"));
        assert!(messages[0].ends_with("YOUR_FILENAME_HERE"));
    }

    #[tokio::test]
    async fn test_convert_requests_concatenates_in_order() {
        let dir = TempDir::new().unwrap();
        let pending = PendingWork::new();
        let warnings = Warnings::new();
        let ctx = context(dir.path(), &pending, &warnings);

        let text = GatlingConverter::new()
            .convert_requests(&[request("first"), request("second")], &ctx);

        let first = text.find("\"first\"").unwrap();
        let second = text.find("\"second\"").unwrap();
        assert!(first < second);
    }
}
