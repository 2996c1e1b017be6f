use serde::{Deserialize, Serialize};

/// Postman collection export (collection format v1)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    /// The collection name, used as the default simulation name
    pub name: String,

    /// Folders grouping requests, each with its own ordering
    #[serde(default)]
    pub folders: Vec<Folder>,

    /// Every request of the collection, addressed by id
    #[serde(default)]
    pub requests: Vec<RawRequest>,

    /// Ordering of the requests placed at the collection root
    #[serde(default)]
    pub order: Vec<String>,
}

impl Collection {
    /// Find a raw request by its id
    pub fn find_request(&self, id: &str) -> Option<&RawRequest> {
        self.requests.iter().find(|request| request.id == id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
    /// The folder name, folders are processed sorted by name
    pub name: String,

    /// Request ids in execution order
    #[serde(default)]
    pub order: Vec<String>,
}

/// A single request record as exported by Postman
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRequest {
    pub id: String,

    pub name: String,

    pub method: String,

    pub url: String,

    /// Newline-delimited `Key: Value` header block
    #[serde(default)]
    pub headers: String,

    /// Body mode (`raw`, `binary`, `params`, `urlencoded`)
    #[serde(default, rename = "dataMode", skip_serializing_if = "Option::is_none")]
    pub data_mode: Option<String>,

    /// Body content when the mode is `raw`
    #[serde(default, rename = "rawModeData", skip_serializing_if = "Option::is_none")]
    pub raw_mode_data: Option<String>,

    /// Authentication helper selected in Postman (`basicAuth`, `digestAuth`, ...)
    #[serde(default, rename = "currentHelper", skip_serializing_if = "Option::is_none")]
    pub current_helper: Option<String>,

    #[serde(default, rename = "helperAttributes", skip_serializing_if = "Option::is_none")]
    pub helper_attributes: Option<HelperAttributes>,

    /// Free-form post-response test script
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tests: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HelperAttributes {
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,
}

/// Postman environment export
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvironmentDocument {
    #[serde(default)]
    pub values: Vec<EnvironmentEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentEntry {
    pub key: String,

    /// May itself contain `{{name}}` placeholders
    #[serde(default)]
    pub value: String,

    /// Only enabled entries contribute to the feeder; a missing flag means disabled
    #[serde(default)]
    pub enabled: bool,
}

impl EnvironmentEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>, enabled: bool) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            enabled,
        }
    }
}
