use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use rds_types::{ConfigMap, RecordId, Value};
use tempfile::PersistError;
use tracing::{debug, warn};

use crate::error::{DestinationError, DestinationResult};
use crate::registry::check_options;
use crate::traits::{Destination, PayloadIter};

/// Local-drive destination.
///
/// On-disk layout:
/// ```text
/// <path>/
///   <record id>    file contents = payload bytes, no framing
///   <record id>
///   ...
/// ```
///
/// Anything in the directory that is not a regular file with a valid record
/// identifier as its name is ignored by enumeration, as are in-flight
/// staging files (`.rds-staging-*`).
///
/// Writes go to a staging file in the same directory, are synced, and only
/// then moved onto the record's name, so a failed write never leaves a
/// partial record behind or damages the previous payload.
#[derive(Clone, Debug)]
pub struct LocalDrive {
    root: PathBuf,
}

/// Name prefix of staging files; never a record.
const STAGING_PREFIX: &str = ".rds-staging-";

impl LocalDrive {
    pub const NAME: &'static str = "localdrive";

    /// Destination rooted at `root`. Call [`Destination::init`] before use.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn template() -> ConfigMap {
        let mut conf = ConfigMap::new();
        conf.insert("path".into(), Value::String("./records".into()));
        conf
    }

    pub fn from_config(config: &ConfigMap) -> DestinationResult<Self> {
        check_options(config, &["path"])?;
        match config.get("path") {
            Some(Value::String(path)) if !path.is_empty() => Ok(Self::new(path)),
            Some(other) => Err(DestinationError::Config(format!(
                "option \"path\" must be a non-empty string, got {other}"
            ))),
            None => Err(DestinationError::Config(
                "missing configuration \"path\"".into(),
            )),
        }
    }

    pub fn boxed(config: &ConfigMap) -> DestinationResult<Box<dyn Destination>> {
        Ok(Box::new(Self::from_config(config)?))
    }

    /// Directory holding the record files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, id: &RecordId) -> PathBuf {
        self.root.join(id.as_str())
    }

    /// Make the rename of a freshly stored record durable.
    #[cfg(unix)]
    fn sync_root(&self) -> DestinationResult<()> {
        fs::File::open(&self.root)?.sync_all()?;
        Ok(())
    }

    #[cfg(not(unix))]
    fn sync_root(&self) -> DestinationResult<()> {
        Ok(())
    }

    fn unusable(&self, reason: impl Into<String>) -> DestinationError {
        DestinationError::Unusable {
            location: self.root.display().to_string(),
            reason: reason.into(),
        }
    }
}

impl Destination for LocalDrive {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn init(&self) -> DestinationResult<()> {
        match fs::metadata(&self.root) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                fs::create_dir_all(&self.root)
                    .map_err(|e| self.unusable(format!("could not create directory: {e}")))?;
                debug!(path = %self.root.display(), "created record directory");
                Ok(())
            }
            Err(e) => Err(self.unusable(e.to_string())),
            Ok(meta) if !meta.is_dir() => Err(self.unusable("not a directory")),
            Ok(meta) if meta.permissions().readonly() => {
                Err(self.unusable("directory is read-only"))
            }
            Ok(_) => Ok(()),
        }
    }

    fn exists(&self, id: &RecordId) -> DestinationResult<bool> {
        match fs::metadata(self.record_path(id)) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&self, id: &RecordId, payload: &[u8], overwrite: bool) -> DestinationResult<()> {
        let path = self.record_path(id);
        let mut staged = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempfile_in(&self.root)?;
        staged.write_all(payload)?;
        staged.as_file().sync_all()?;

        // Dropping the staging file on any error below removes it.
        if overwrite {
            staged.persist(&path).map_err(persist_error)?;
        } else {
            staged.persist_noclobber(&path).map_err(|e| match e.error.kind() {
                io::ErrorKind::AlreadyExists => DestinationError::AlreadyExists(id.clone()),
                _ => persist_error(e),
            })?;
        }
        self.sync_root()?;
        debug!(id = %id.short_id(), len = payload.len(), overwrite, "stored record file");
        Ok(())
    }

    fn retrieve(&self, id: &RecordId) -> DestinationResult<Vec<u8>> {
        fs::read(self.record_path(id)).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => DestinationError::NotFound(id.clone()),
            _ => DestinationError::Io(e),
        })
    }

    fn delete(&self, id: &RecordId) -> DestinationResult<()> {
        fs::remove_file(self.record_path(id)).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => DestinationError::NotFound(id.clone()),
            _ => DestinationError::Io(e),
        })?;
        debug!(id = %id.short_id(), "deleted record file");
        Ok(())
    }

    fn retrieve_all(&self) -> DestinationResult<PayloadIter<'_>> {
        let entries = fs::read_dir(&self.root)?;
        let iter = entries.filter_map(|entry| -> Option<DestinationResult<(RecordId, Vec<u8>)>> {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => return Some(Err(e.into())),
            };
            match entry.file_type() {
                Ok(kind) if kind.is_file() => {}
                Ok(_) => return None,
                Err(e) => return Some(Err(e.into())),
            }
            let path = entry.path();
            let name = match entry.file_name().into_string() {
                Ok(name) if name.starts_with(STAGING_PREFIX) => return None,
                Ok(name) => name,
                Err(_) => {
                    warn!(path = %path.display(), "skipping file with non-UTF-8 name");
                    return None;
                }
            };
            let id = match RecordId::new(name) {
                Ok(id) => id,
                Err(_) => {
                    warn!(path = %path.display(), "skipping file with invalid record name");
                    return None;
                }
            };
            match fs::read(&path) {
                Ok(payload) => Some(Ok((id, payload))),
                // removed between listing and reading
                Err(e) if e.kind() == io::ErrorKind::NotFound => None,
                Err(e) => Some(Err(e.into())),
            }
        });
        Ok(Box::new(iter))
    }
}

fn persist_error(e: PersistError) -> DestinationError {
    DestinationError::Io(e.error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn id(s: &str) -> RecordId {
        RecordId::new(s).unwrap()
    }

    fn temp_drive() -> (tempfile::TempDir, LocalDrive) {
        let dir = tempfile::tempdir().unwrap();
        let drive = LocalDrive::new(dir.path().join("records"));
        drive.init().unwrap();
        (dir, drive)
    }

    #[test]
    fn init_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("a").join("b");
        let drive = LocalDrive::new(&root);
        drive.init().unwrap();
        assert!(root.is_dir());
        // idempotent
        drive.init().unwrap();
    }

    #[test]
    fn init_rejects_regular_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not-a-dir");
        fs::write(&file, b"x").unwrap();
        let err = LocalDrive::new(&file).init().unwrap_err();
        assert!(matches!(err, DestinationError::Unusable { .. }));
    }

    #[test]
    fn payload_is_stored_verbatim_under_id() {
        let (_dir, drive) = temp_drive();
        drive.store(&id("abc"), br#"{"a":1}"#, false).unwrap();
        let on_disk = fs::read(drive.root().join("abc")).unwrap();
        assert_eq!(on_disk, br#"{"a":1}"#);
        assert_eq!(drive.retrieve(&id("abc")).unwrap(), br#"{"a":1}"#);
    }

    #[test]
    fn store_without_overwrite_keeps_original() {
        let (_dir, drive) = temp_drive();
        drive.store(&id("r"), b"first", false).unwrap();
        let err = drive.store(&id("r"), b"second", false).unwrap_err();
        assert!(matches!(err, DestinationError::AlreadyExists(_)));
        assert_eq!(drive.retrieve(&id("r")).unwrap(), b"first");
    }

    #[test]
    fn overwrite_truncates_longer_payload() {
        let (_dir, drive) = temp_drive();
        drive.store(&id("r"), b"a much longer payload", false).unwrap();
        drive.store(&id("r"), b"short", true).unwrap();
        assert_eq!(drive.retrieve(&id("r")).unwrap(), b"short");
    }

    #[test]
    fn exists_and_delete() {
        let (_dir, drive) = temp_drive();
        assert!(!drive.exists(&id("r")).unwrap());
        drive.store(&id("r"), b"x", false).unwrap();
        assert!(drive.exists(&id("r")).unwrap());
        drive.delete(&id("r")).unwrap();
        assert!(!drive.exists(&id("r")).unwrap());
        assert!(!drive.root().join("r").exists());
    }

    #[test]
    fn missing_record_is_not_found() {
        let (_dir, drive) = temp_drive();
        assert!(matches!(
            drive.retrieve(&id("nope")),
            Err(DestinationError::NotFound(_))
        ));
        assert!(matches!(
            drive.delete(&id("nope")),
            Err(DestinationError::NotFound(_))
        ));
    }

    #[test]
    fn retrieve_all_skips_directories() {
        let (_dir, drive) = temp_drive();
        drive.store(&id("one"), b"1", false).unwrap();
        drive.store(&id("two"), b"2", false).unwrap();
        fs::create_dir(drive.root().join("nested")).unwrap();

        let mut all: Vec<(RecordId, Vec<u8>)> = drive
            .retrieve_all()
            .unwrap()
            .collect::<DestinationResult<_>>()
            .unwrap();
        all.sort();
        assert_eq!(
            all,
            vec![(id("one"), b"1".to_vec()), (id("two"), b"2".to_vec())]
        );
    }

    fn listing(drive: &LocalDrive) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(drive.root())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn store_leaves_no_staging_files() {
        let (_dir, drive) = temp_drive();
        drive.store(&id("r"), b"first", false).unwrap();
        drive.store(&id("r"), b"second", false).unwrap_err();
        drive.store(&id("r"), b"third", true).unwrap();
        assert_eq!(listing(&drive), vec!["r"]);
        assert_eq!(drive.retrieve(&id("r")).unwrap(), b"third");
    }

    #[test]
    fn failed_store_cleans_up_and_keeps_other_records() {
        let (_dir, drive) = temp_drive();
        drive.store(&id("kept"), b"payload", false).unwrap();
        // a non-empty directory under the record's name cannot be replaced
        fs::create_dir(drive.root().join("blocked")).unwrap();
        fs::write(drive.root().join("blocked").join("inner"), b"x").unwrap();

        assert!(drive.store(&id("blocked"), b"new", true).is_err());
        assert!(matches!(
            drive.store(&id("blocked"), b"new", false),
            Err(DestinationError::AlreadyExists(_))
        ));
        assert_eq!(listing(&drive), vec!["blocked", "kept"]);
        assert_eq!(drive.retrieve(&id("kept")).unwrap(), b"payload");
    }

    #[test]
    fn staging_files_are_not_records() {
        let (_dir, drive) = temp_drive();
        drive.store(&id("one"), b"1", false).unwrap();
        fs::write(drive.root().join(".rds-staging-abc123"), b"partial").unwrap();

        let all: Vec<(RecordId, Vec<u8>)> = drive
            .retrieve_all()
            .unwrap()
            .collect::<DestinationResult<_>>()
            .unwrap();
        assert_eq!(all, vec![(id("one"), b"1".to_vec())]);
    }

    #[test]
    fn directory_is_not_a_record() {
        let (_dir, drive) = temp_drive();
        fs::create_dir(drive.root().join("dir")).unwrap();
        assert!(!drive.exists(&id("dir")).unwrap());
    }

    #[test]
    fn config_requires_path() {
        let conf = json!({}).as_object().cloned().unwrap();
        assert!(matches!(
            LocalDrive::from_config(&conf),
            Err(DestinationError::Config(_))
        ));
        let conf = json!({"path": 7}).as_object().cloned().unwrap();
        assert!(matches!(
            LocalDrive::from_config(&conf),
            Err(DestinationError::Config(_))
        ));
        let conf = json!({"path": "./somewhere"}).as_object().cloned().unwrap();
        assert_eq!(
            LocalDrive::from_config(&conf).unwrap().root(),
            Path::new("./somewhere")
        );
    }

    #[test]
    fn template_names_path() {
        assert_eq!(
            Value::Object(LocalDrive::template()),
            json!({"path": "./records"})
        );
    }
}
