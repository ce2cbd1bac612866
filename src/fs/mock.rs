use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

/// Modification time given to files added without an explicit one.
pub const DEFAULT_MTIME: SystemTime = SystemTime::UNIX_EPOCH;

#[derive(Debug, Clone)]
pub enum MockEntry {
    File {
        content: Vec<u8>,
        modified: SystemTime,
    },
    Dir {
        children: Vec<String>,
        readable: bool,
        writable: bool,
    },
}

impl MockEntry {
    fn empty_dir() -> Self {
        MockEntry::Dir {
            children: Vec::new(),
            readable: true,
            writable: true,
        }
    }
}

/// In-memory filesystem with settable timestamps and permissions.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut files = HashMap::new();
        // Ensure root exists
        files.insert(PathBuf::from("."), MockEntry::empty_dir());

        Self {
            files: Arc::new(Mutex::new(files)),
        }
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        self.add_file_modified(path, content, DEFAULT_MTIME);
    }

    /// Add a file whose mtime is `secs` seconds after the Unix epoch.
    pub fn add_file_at(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>, secs: u64) {
        self.add_file_modified(path, content, SystemTime::UNIX_EPOCH + Duration::from_secs(secs));
    }

    pub fn add_file_modified(
        &self,
        path: impl AsRef<Path>,
        content: impl Into<Vec<u8>>,
        modified: SystemTime,
    ) {
        let path = path.as_ref().to_path_buf();
        let mut files = self.files.lock().unwrap();
        files.insert(
            path.clone(),
            MockEntry::File {
                content: content.into(),
                modified,
            },
        );
        link_into_parent(&mut files, &path);
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut files = self.files.lock().unwrap();
        ensure_dir_entry(&mut files, path.as_ref());
    }

    /// Change a directory's permissions; no-op for files and unknown paths.
    pub fn set_dir_permissions(&self, path: impl AsRef<Path>, can_read: bool, can_write: bool) {
        let mut files = self.files.lock().unwrap();
        if let Some(MockEntry::Dir {
            readable, writable, ..
        }) = files.get_mut(path.as_ref())
        {
            *readable = can_read;
            *writable = can_write;
        }
    }

    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        let files = self.files.lock().unwrap();
        match files.get(path.as_ref()) {
            Some(MockEntry::File { content, .. }) => Some(content.clone()),
            _ => None,
        }
    }

    pub fn remove(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut files = self.files.lock().unwrap();
        files.remove(path);
        if let (Some(parent), Some(name)) = (parent_of(path), path.file_name().and_then(|n| n.to_str())) {
            if let Some(MockEntry::Dir { children, .. }) = files.get_mut(parent) {
                children.retain(|c| c != name);
            }
        }
    }
}

fn parent_of(path: &Path) -> Option<&Path> {
    path.parent().map(|parent| {
        if parent.as_os_str().is_empty() {
            Path::new(".")
        } else {
            parent
        }
    })
}

/// Register `path` in its parent's child list, creating parents as needed.
fn link_into_parent(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    let Some(parent) = parent_of(path) else {
        return;
    };
    if parent == path {
        return;
    }
    ensure_dir_entry(files, parent);
    if let (Some(MockEntry::Dir { children, .. }), Some(name)) =
        (files.get_mut(parent), path.file_name().and_then(|n| n.to_str()))
    {
        if !children.iter().any(|c| c == name) {
            children.push(name.to_string());
        }
    }
}

fn ensure_dir_entry(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    if !files.contains_key(path) {
        files.insert(path.to_path_buf(), MockEntry::empty_dir());
        link_into_parent(files, path);
    }
}

impl FileSystem for MockFileSystem {
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        {
            let files = self.files.lock().unwrap();
            if let Some(MockEntry::Dir { .. }) = files.get(path) {
                return Err(anyhow!("Is a directory: {:?}", path));
            }
            if let Some(MockEntry::Dir { writable: false, .. }) =
                parent_of(path).and_then(|parent| files.get(parent))
            {
                return Err(anyhow!("Permission denied: {:?}", path));
            }
        }
        self.add_file_modified(path, contents, SystemTime::now());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        files.contains_key(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        matches!(files.get(path), Some(MockEntry::File { .. }))
    }

    fn is_dir(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        matches!(files.get(path), Some(MockEntry::Dir { .. }))
    }

    fn modified(&self, path: &Path) -> Option<SystemTime> {
        let files = self.files.lock().unwrap();
        match files.get(path) {
            Some(MockEntry::File { modified, .. }) => Some(*modified),
            _ => None,
        }
    }

    fn can_read_dir(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        matches!(files.get(path), Some(MockEntry::Dir { readable: true, .. }))
    }

    fn can_write_dir(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        matches!(files.get(path), Some(MockEntry::Dir { writable: true, .. }))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let files = self.files.lock().unwrap();
        match files.get(path) {
            Some(MockEntry::Dir { children, .. }) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }
}
