use anyhow::{Context, Result};
use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
};
use tempfile::NamedTempFile;

/// A string-keyed slot holding serialized text.
pub trait KeyValueSlot: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>>;
    /// Overwrite the slot wholesale.
    fn write(&self, key: &str, value: &str) -> Result<()>;
}

/// Keeps each key as `<dir>/<key>.json`. Writes go to a temporary file in the
/// same directory that then replaces the slot, so a slot is never half written.
#[derive(Debug, Clone)]
pub struct FileSlot {
    directory: PathBuf,
}

impl FileSlot {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.directory.join(format!("{key}.json"))
    }

    fn replace_with<F>(&self, key: &str, fill: F) -> Result<()>
    where
        F: FnOnce(&mut NamedTempFile) -> io::Result<()>,
    {
        fs::create_dir_all(&self.directory).with_context(|| {
            format!("cannot create store directory {}", self.directory.display())
        })?;

        let path = self.path_for(key);
        let mut staged = NamedTempFile::new_in(&self.directory).with_context(|| {
            format!("cannot stage write in {}", self.directory.display())
        })?;
        fill(&mut staged)
            .and_then(|_| staged.as_file().sync_all())
            .with_context(|| format!("cannot write {}", path.display()))?;
        staged
            .persist(&path)
            .map_err(|e| e.error)
            .with_context(|| format!("cannot replace {}", path.display()))?;

        Ok(())
    }
}

impl KeyValueSlot for FileSlot {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("cannot read {}", path.display())),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.replace_with(key, |file| file.write_all(value.as_bytes()))
    }
}
