// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Startup loading of sample instruments into the index.

use crate::models::instrument::MusicalInstrument;
use crate::services::elasticsearch::ElasticsearchClient;
use anyhow::{Context, Result};
use std::path::Path;

/// Read a JSON array of instruments.
pub async fn load_instruments(path: &Path) -> Result<Vec<MusicalInstrument>> {
    let contents = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read seed file {}", path.display()))?;

    serde_json::from_slice(&contents)
        .with_context(|| format!("Seed file {} is not a JSON array of instruments", path.display()))
}

/// Bulk-index the instruments in `path`. Returns the number indexed.
pub async fn seed_index(client: &ElasticsearchClient, path: &Path) -> Result<usize> {
    let instruments = load_instruments(path).await?;
    client
        .index_documents(&instruments)
        .await
        .with_context(|| format!("Failed to index seed data into {}", client.index()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn seed_file(contents: &str) -> NamedTempFile {
        let mut tmp = NamedTempFile::new().unwrap();
        tmp.write_all(contents.as_bytes()).unwrap();
        tmp
    }

    #[tokio::test]
    async fn test_load_instruments() {
        let tmp = seed_file(
            r#"[{"make":"Fender","model":"Telecaster","genres":["rock"]},{"model":"P-45"}]"#,
        );

        let instruments = load_instruments(tmp.path()).await.unwrap();

        assert_eq!(instruments.len(), 2);
        assert_eq!(instruments[0].make.as_deref(), Some("Fender"));
        assert_eq!(instruments[1].make, None);
    }

    #[tokio::test]
    async fn test_load_rejects_non_array() {
        let tmp = seed_file(r#"{"make":"Fender"}"#);

        let result = load_instruments(tmp.path()).await;

        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("is not a JSON array of instruments"));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let result = load_instruments(Path::new("/nonexistent/instruments.json")).await;
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("Failed to read seed file"));
    }

    #[test]
    fn test_bundled_sample_data_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/musical-instruments.json");
        let contents = std::fs::read(path).unwrap();
        let instruments: Vec<MusicalInstrument> = serde_json::from_slice(&contents).unwrap();
        assert!(!instruments.is_empty());
        assert!(instruments.iter().all(|i| i.make.is_some()));
    }
}
