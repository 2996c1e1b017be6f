use crate::error::{ConvertError, Result};
use crate::models::Collection;
use std::path::Path;

/// Load a Postman collection export from a JSON file
pub async fn load_collection<P: AsRef<Path>>(path: P) -> Result<Collection> {
    let path = path.as_ref();

    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        ConvertError::CollectionLoadError(format!("Failed to read file {}: {}", path.display(), e))
    })?;

    let collection: Collection = serde_json::from_str(&content).map_err(|e| {
        ConvertError::CollectionLoadError(format!("Failed to parse collection JSON: {}", e))
    })?;

    tracing::info!(
        "Loaded collection '{}' ({} folder(s), {} request(s))",
        collection.name,
        collection.folders.len(),
        collection.requests.len()
    );

    Ok(collection)
}
