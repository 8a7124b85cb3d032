//! File-backed generation store
//!
//! One file holds every generation of a registry, concatenated oldest first.
//! Files are named `usernames-<millis>.bloom`; the greatest timestamp in a
//! directory is the active file, the rest are historical and read-only.
//!
//! Saves go to a sibling `.tmp` file which is fsynced and renamed over the
//! target, so a failed write never leaves a half-written generation file.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::domain::BloomFilter;
use crate::error::{CodecError, RegistryError};
use crate::ports::GenerationStore;

/// File name prefix for generation files
pub const FILE_PREFIX: &str = "usernames-";

/// File name suffix for generation files
pub const FILE_SUFFIX: &str = ".bloom";

/// Generation files found in a directory
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiscoveredFiles {
    /// File with the greatest timestamp, if any
    pub active: Option<PathBuf>,
    /// Every other matching file, newest first
    pub historical: Vec<PathBuf>,
}

/// Name of the generation file created at `millis`
pub fn generation_file_name(millis: u64) -> String {
    format!("{}{}{}", FILE_PREFIX, millis, FILE_SUFFIX)
}

/// Extract the embedded timestamp from a generation file name
pub fn parse_generation_timestamp(file_name: &str) -> Option<u64> {
    let digits = file_name
        .strip_prefix(FILE_PREFIX)?
        .strip_suffix(FILE_SUFFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Milliseconds since the Unix epoch
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Concatenate the serialized form of every generation
pub fn encode_generations(generations: &[BloomFilter]) -> Vec<u8> {
    let total = generations.iter().map(BloomFilter::encoded_len).sum();
    let mut out = Vec::with_capacity(total);
    for generation in generations {
        generation.encode_into(&mut out);
    }
    out
}

/// Parse generations until the buffer is exhausted
pub fn decode_generations(bytes: &[u8]) -> Result<Vec<BloomFilter>, CodecError> {
    if bytes.is_empty() {
        return Err(CodecError::Empty);
    }

    let mut generations = Vec::new();
    let mut offset = 0;
    while offset < bytes.len() {
        let (generation, consumed) = BloomFilter::decode(&bytes[offset..], offset)?;
        generations.push(generation);
        offset += consumed;
    }
    Ok(generations)
}

/// List generation files in `dir`, creating the directory if missing
pub async fn discover(dir: &Path) -> Result<DiscoveredFiles, RegistryError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| RegistryError::io(dir, e))?;

    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| RegistryError::io(dir, e))?;

    let mut found: Vec<(u64, PathBuf)> = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| RegistryError::io(dir, e))?
    {
        let name = entry.file_name();
        let Some(timestamp) = name.to_str().and_then(parse_generation_timestamp) else {
            continue;
        };
        let is_file = entry
            .file_type()
            .await
            .map(|t| t.is_file())
            .unwrap_or(false);
        if is_file {
            found.push((timestamp, entry.path()));
        }
    }

    found.sort_by(|a, b| b.0.cmp(&a.0));
    debug!(dir = %dir.display(), files = found.len(), "Discovered generation files");

    let mut paths = found.into_iter().map(|(_, path)| path);
    Ok(DiscoveredFiles {
        active: paths.next(),
        historical: paths.collect(),
    })
}

/// Generation store that rewrites one file per save
#[derive(Clone, Debug, Default)]
pub struct FileGenerationStore;

impl FileGenerationStore {
    pub fn new() -> Self {
        Self
    }

    fn temp_path(path: &Path) -> PathBuf {
        let mut name = path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        path.with_file_name(name)
    }
}

async fn write_synced(mut file: tokio::fs::File, bytes: &[u8]) -> std::io::Result<()> {
    file.write_all(bytes).await?;
    file.sync_all().await
}

#[async_trait]
impl GenerationStore for FileGenerationStore {
    async fn save_all(
        &self,
        generations: &[BloomFilter],
        path: &Path,
    ) -> Result<(), RegistryError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| RegistryError::io(parent, e))?;
        }

        let bytes = encode_generations(generations);
        let temp_path = Self::temp_path(path);

        let file = tokio::fs::File::create(&temp_path)
            .await
            .map_err(|e| RegistryError::io(&temp_path, e))?;

        // From here on the temp file exists and must not outlive a failure
        if let Err(e) = write_synced(file, &bytes).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(RegistryError::io(&temp_path, e));
        }
        if let Err(e) = tokio::fs::rename(&temp_path, path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(RegistryError::io(path, e));
        }

        debug!(
            path = %path.display(),
            generations = generations.len(),
            bytes = bytes.len(),
            "Persisted generations"
        );
        Ok(())
    }

    async fn load_all(&self, path: &Path) -> Result<Vec<BloomFilter>, RegistryError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| RegistryError::io(path, e))?;
        let generations = decode_generations(&bytes)?;

        info!(
            path = %path.display(),
            generations = generations.len(),
            bytes = bytes.len(),
            "Loaded generation file"
        );
        Ok(generations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn filled(m: usize, k: usize, names: &[&str]) -> BloomFilter {
        let mut filter = BloomFilter::new(m, k).unwrap();
        for name in names {
            filter.add(name.as_bytes());
        }
        filter
    }

    #[test]
    fn test_file_name_roundtrip() {
        let name = generation_file_name(1_700_000_000_123);
        assert_eq!(name, "usernames-1700000000123.bloom");
        assert_eq!(parse_generation_timestamp(&name), Some(1_700_000_000_123));
    }

    #[test]
    fn test_parse_rejects_foreign_names() {
        assert_eq!(parse_generation_timestamp("usernames-.bloom"), None);
        assert_eq!(parse_generation_timestamp("usernames-12a.bloom"), None);
        assert_eq!(parse_generation_timestamp("usernames-+12.bloom"), None);
        assert_eq!(parse_generation_timestamp("usernames-12.bloom.tmp"), None);
        assert_eq!(parse_generation_timestamp("profiles-12.bloom"), None);
    }

    #[test]
    fn test_decode_concatenated_generations() {
        let first = filled(800, 6, &["alice"]);
        let second = filled(1600, 5, &["bob", "carol"]);

        let bytes = encode_generations(&[first.clone(), second.clone()]);
        let decoded = decode_generations(&bytes).unwrap();

        assert_eq!(decoded, vec![first, second]);
    }

    #[test]
    fn test_decode_rejects_empty_and_trailing_garbage() {
        assert_eq!(decode_generations(&[]), Err(CodecError::Empty));

        let mut bytes = encode_generations(&[filled(64, 3, &["x"])]);
        bytes.extend_from_slice(&[1, 2, 3]);
        assert!(matches!(
            decode_generations(&bytes),
            Err(CodecError::TruncatedHeader { offset: 20, available: 3 })
        ));
    }

    #[tokio::test]
    async fn test_save_and_load_all() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(generation_file_name(42));
        let store = FileGenerationStore::new();
        let generations = vec![filled(800, 6, &["alice"]), filled(1600, 6, &["bob"])];

        store.save_all(&generations, &path).await.unwrap();
        let loaded = store.load_all(&path).await.unwrap();

        assert_eq!(loaded, generations);
        assert!(
            !FileGenerationStore::temp_path(&path).exists(),
            "temp file must be renamed away"
        );
    }

    #[tokio::test]
    async fn test_failed_save_removes_temp_file() {
        let dir = TempDir::new().unwrap();
        // A non-empty directory at the target path makes the final rename fail
        let path = dir.path().join(generation_file_name(3));
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("occupied"), b"x").unwrap();

        let result = FileGenerationStore::new()
            .save_all(&[filled(800, 6, &["alice"])], &path)
            .await;

        assert!(matches!(result, Err(RegistryError::Io { .. })));
        assert!(
            !FileGenerationStore::temp_path(&path).exists(),
            "failed save must not leave a temp file behind"
        );
    }

    #[tokio::test]
    async fn test_write_synced_reports_write_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("readonly");
        std::fs::write(&path, b"").unwrap();
        let file = tokio::fs::File::open(&path).await.unwrap();

        assert!(write_synced(file, b"payload").await.is_err());
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_contents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(generation_file_name(1));
        let store = FileGenerationStore::new();

        store
            .save_all(&[filled(800, 6, &[]), filled(1600, 6, &[])], &path)
            .await
            .unwrap();
        store.save_all(&[filled(800, 6, &["a"])], &path).await.unwrap();

        assert_eq!(store.load_all(&path).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_load_truncated_file_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(generation_file_name(7));
        let mut bytes = encode_generations(&[filled(800, 6, &["a"])]);
        bytes.truncate(50);
        std::fs::write(&path, bytes).unwrap();

        let result = FileGenerationStore::new().load_all(&path).await;
        assert!(matches!(
            result,
            Err(RegistryError::Codec(CodecError::TruncatedBody { .. }))
        ));
    }

    #[tokio::test]
    async fn test_discover_orders_by_timestamp() {
        let dir = TempDir::new().unwrap();
        for ts in [100u64, 300, 200] {
            std::fs::write(dir.path().join(generation_file_name(ts)), b"").unwrap();
        }
        std::fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();

        let found = discover(dir.path()).await.unwrap();

        assert_eq!(found.active, Some(dir.path().join(generation_file_name(300))));
        let mut historical = found.historical.clone();
        historical.sort();
        let mut expected = vec![
            dir.path().join(generation_file_name(100)),
            dir.path().join(generation_file_name(200)),
        ];
        expected.sort();
        assert_eq!(historical, expected);
    }

    #[tokio::test]
    async fn test_discover_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("nested").join("usernames");

        let found = discover(&target).await.unwrap();

        assert!(target.is_dir());
        assert_eq!(found, DiscoveredFiles::default());
    }
}
