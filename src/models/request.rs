use indexmap::IndexMap;
use serde::Serialize;

/// Structured view of one analyzed Postman request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestModel {
    pub name: String,

    /// Lower-cased HTTP method, placeholders translated
    pub method: String,

    /// Request URL, placeholders translated
    pub url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<Auth>,

    /// Headers in declaration order. `Authorization` is absent when `auth` is set.
    pub headers: IndexMap<String, String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Body>,

    pub checks: Checks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthKind {
    Basic,
    Digest,
}

impl AuthKind {
    /// Parse a Postman helper name
    pub fn from_helper(helper: &str) -> Option<Self> {
        match helper {
            "basicAuth" => Some(Self::Basic),
            "digestAuth" => Some(Self::Digest),
            _ => None,
        }
    }

    /// Name of the Gatling request builder method
    pub fn builder_method(&self) -> &'static str {
        match self {
            Self::Basic => "basicAuth",
            Self::Digest => "digestAuth",
        }
    }
}

impl std::fmt::Display for AuthKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthKind::Basic => write!(f, "basic"),
            AuthKind::Digest => write!(f, "digest"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Auth {
    pub kind: AuthKind,
    pub user: String,
    pub password: String,
}

/// Request body backed by a file under the simulation's bodies directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Body {
    pub filename: String,

    /// Literal content to write; `None` means the user must provide the file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Value stored into the Gatling session after the response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Capture {
    /// A constant assigned by the test script
    Literal { name: String, value: String },
    /// A value read from the JSON response body
    Json { name: String, path: String },
}

impl Capture {
    pub fn name(&self) -> &str {
        match self {
            Capture::Literal { name, .. } | Capture::Json { name, .. } => name,
        }
    }
}

/// Assertions extracted from the test script, each list in encounter order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Checks {
    pub status: Vec<u16>,
    pub not_status: Vec<u16>,
    /// Regex-escaped body substrings
    pub body_has: Vec<String>,
    pub captures: Vec<Capture>,
}

impl Checks {
    pub fn is_empty(&self) -> bool {
        self.status.is_empty()
            && self.not_status.is_empty()
            && self.body_has.is_empty()
            && self.captures.is_empty()
    }

    pub fn len(&self) -> usize {
        usize::from(!self.status.is_empty())
            + self.not_status.len()
            + self.body_has.len()
            + self.captures.len()
    }
}
