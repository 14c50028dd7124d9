use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::SavedRequest;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read \"{path}\": {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write \"{path}\": {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to parse \"{path}\": {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to serialize presets: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Persistence for named request presets. `save` always receives the full
/// list and replaces whatever was stored before.
pub trait PresetStore {
    fn load(&self) -> Result<Vec<SavedRequest>, StoreError>;
    fn save(&self, all: &[SavedRequest]) -> Result<(), StoreError>;
}

/// Presets kept as one pretty-printed JSON array.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PresetStore for JsonFileStore {
    fn load(&self) -> Result<Vec<SavedRequest>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&contents).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, all: &[SavedRequest]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(all)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        fs::write(&self.path, json).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HttpMethod, KeyValue};

    fn preset(name: &str) -> SavedRequest {
        SavedRequest {
            name: name.to_string(),
            method: HttpMethod::Post,
            url: "https://api.example.com/items".to_string(),
            body: r#"{"key": "value"}"#.to_string(),
            headers: vec![KeyValue::new("Content-Type", "application/json")],
            params: vec![KeyValue::new("page", "2")],
        }
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("requests.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("requests.json"));

        store.save(&[preset("one"), preset("two")]).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded, vec![preset("one"), preset("two")]);

        store.save(&[preset("two")]).unwrap();
        assert_eq!(store.load().unwrap(), vec![preset("two")]);
    }

    #[test]
    fn test_file_format() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("requests.json"));
        store.save(&[preset("one")]).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let record = &value[0];
        assert_eq!(record["name"], "one");
        assert_eq!(record["method"], 1);
        assert_eq!(record["headers"][0]["key"], "Content-Type");
        assert_eq!(record["params"][0]["value"], "2");
    }

    #[test]
    fn test_load_reads_hand_written_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("requests.json");
        fs::write(
            &path,
            r#"[{"name":"Ping","method":0,"url":"http://localhost/ping","body":"","headers":[],"params":[]}]"#,
        )
        .unwrap();

        let loaded = JsonFileStore::new(&path).load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "Ping");
        assert_eq!(loaded[0].method, HttpMethod::Get);
    }

    #[test]
    fn test_load_corrupt_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("requests.json");
        fs::write(&path, "not json").unwrap();

        let err = JsonFileStore::new(&path).load().unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
        assert!(err.to_string().contains("requests.json"));
    }
}
