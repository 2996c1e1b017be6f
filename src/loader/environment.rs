use crate::error::{ConvertError, Result};
use crate::models::{EnvironmentDocument, EnvironmentEntry};
use std::path::Path;

/// Load the entries of a Postman environment export
pub async fn load_environment<P: AsRef<Path>>(path: P) -> Result<Vec<EnvironmentEntry>> {
    let path = path.as_ref();

    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        ConvertError::EnvironmentLoadError(format!(
            "Failed to read file {}: {}",
            path.display(),
            e
        ))
    })?;

    let document: EnvironmentDocument = serde_json::from_str(&content).map_err(|e| {
        ConvertError::EnvironmentLoadError(format!("Failed to parse environment JSON: {}", e))
    })?;

    tracing::info!(
        "Loaded environment {} ({} value(s))",
        path.display(),
        document.values.len()
    );

    Ok(document.values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_load_environment_values() {
        let json = r#"{
            "name": "dev",
            "values": [
                { "key": "host", "value": "localhost", "enabled": true },
                { "key": "token", "value": "{{secret}}", "enabled": false }
            ]
        }"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let entries = load_environment(file.path()).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], EnvironmentEntry::new("host", "localhost", true));
        assert!(!entries[1].enabled);
    }

    #[tokio::test]
    async fn test_entry_without_enabled_flag_stays_out_of_feeder() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{ "values": [{ "key": "host", "value": "h" }] }"#)
            .unwrap();

        let entries = load_environment(file.path()).await.unwrap();
        let feeder = crate::variable::build_feeder(&entries).unwrap();
        assert!(feeder.is_empty());
    }

    #[tokio::test]
    async fn test_load_malformed_environment() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[1, 2").unwrap();

        let result = load_environment(file.path()).await;
        assert!(matches!(result, Err(ConvertError::EnvironmentLoadError(_))));
    }
}
