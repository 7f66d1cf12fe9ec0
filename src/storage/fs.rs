//! Filesystem access used by [`Store`](super::Store)
//!
//! The store only needs four operations, so they sit behind [`FileProvider`].
//! [`OsFs`] talks to the real filesystem; [`MemoryFs`] keeps files in memory
//! for tests and embedding.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use fs2::FileExt;

pub trait FileProvider {
    /// True if `path` exists and can be opened for reading
    fn can_read(&self, path: &Path) -> bool;

    /// True if `path` could be created or replaced
    fn can_write(&self, path: &Path) -> bool;

    /// Reads the raw bytes; decoding is left to the parser
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Replaces the file at `path` with `contents`, creating it if needed
    fn write_replace(&self, path: &Path, contents: &str) -> io::Result<()>;
}

/// The real filesystem
///
/// Reads hold a shared lock; writes go to `<path>.tmp` under an exclusive
/// lock and are renamed over the target.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFs;

impl OsFs {
    fn temp_path(path: &Path) -> PathBuf {
        let mut name = OsString::from(path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl FileProvider for OsFs {
    fn can_read(&self, path: &Path) -> bool {
        path.is_file() && File::open(path).is_ok()
    }

    fn can_write(&self, path: &Path) -> bool {
        match fs::metadata(path) {
            Ok(meta) => meta.is_file() && !meta.permissions().readonly(),
            Err(_) => {
                let parent = match path.parent() {
                    Some(p) if !p.as_os_str().is_empty() => p,
                    _ => Path::new("."),
                };
                fs::metadata(parent)
                    .map(|meta| meta.is_dir() && !meta.permissions().readonly())
                    .unwrap_or(false)
            }
        }
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        let file = File::open(path)?;

        // Lock is released when file is dropped
        FileExt::lock_shared(&file)?;

        let mut contents = Vec::new();
        BufReader::new(&file).read_to_end(&mut contents)?;
        Ok(contents)
    }

    fn write_replace(&self, path: &Path, contents: &str) -> io::Result<()> {
        // The rename below only needs a writable directory.
        if path.exists() && !self.can_write(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} is read-only", path.display()),
            ));
        }

        let temp_path = Self::temp_path(path);

        let written = write_locked(&temp_path, contents);

        match written.and_then(|()| fs::rename(&temp_path, path)) {
            Ok(()) => Ok(()),
            Err(err) => {
                let _ = fs::remove_file(&temp_path);
                Err(err)
            }
        }
    }
}

fn write_locked(path: &Path, contents: &str) -> io::Result<()> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    FileExt::lock_exclusive(&file)?;

    let mut writer = BufWriter::new(&file);
    writer.write_all(contents.as_bytes())?;
    writer.flush()?;
    drop(writer);
    file.sync_all()
}

#[derive(Debug, Default)]
struct MemoryFiles {
    files: HashMap<PathBuf, Vec<u8>>,
    read_only: HashSet<PathBuf>,
}

/// In-memory files; clones share the same contents
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    inner: Rc<RefCell<MemoryFiles>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
        self.inner
            .borrow_mut()
            .files
            .insert(path.into(), contents.into());
    }

    /// File contents as text, with invalid UTF-8 replaced
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        self.inner
            .borrow()
            .files
            .get(path.as_ref())
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    pub fn remove(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.inner.borrow_mut().files.remove(path.as_ref())
    }

    /// Makes writes to `path` fail with `PermissionDenied`
    pub fn set_read_only(&self, path: impl Into<PathBuf>, read_only: bool) {
        let mut inner = self.inner.borrow_mut();
        let path = path.into();
        if read_only {
            inner.read_only.insert(path);
        } else {
            inner.read_only.remove(&path);
        }
    }
}

impl FileProvider for MemoryFs {
    fn can_read(&self, path: &Path) -> bool {
        self.inner.borrow().files.contains_key(path)
    }

    fn can_write(&self, path: &Path) -> bool {
        !self.inner.borrow().read_only.contains(path)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.inner
            .borrow()
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such in-memory file"))
    }

    fn write_replace(&self, path: &Path, contents: &str) -> io::Result<()> {
        if !self.can_write(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "in-memory file is read-only",
            ));
        }
        self.insert(path, contents);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn os_write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.cfg");

        assert!(!OsFs.can_read(&path));
        assert!(OsFs.can_write(&path));

        OsFs.write_replace(&path, "# hi\n").unwrap();
        assert!(OsFs.can_read(&path));
        assert_eq!(OsFs.read(&path).unwrap(), b"# hi\n");
    }

    #[test]
    fn os_write_replaces_and_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.cfg");

        OsFs.write_replace(&path, "old contents that are longer\n").unwrap();
        OsFs.write_replace(&path, "new\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new\n");
        assert!(!OsFs::temp_path(&path).exists());
    }

    #[test]
    fn os_reads_bytes_that_are_not_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("latin1.cfg");
        fs::write(&path, b"# caf\xe9\n").unwrap();

        assert_eq!(OsFs.read(&path).unwrap(), b"# caf\xe9\n");
    }

    #[test]
    fn os_write_refuses_read_only_target() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("locked.cfg");
        fs::write(&path, "# keep\n").unwrap();

        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_readonly(true);
        fs::set_permissions(&path, perms.clone()).unwrap();

        assert!(!OsFs.can_write(&path));
        let err = OsFs.write_replace(&path, "# replaced\n").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
        assert_eq!(fs::read_to_string(&path).unwrap(), "# keep\n");
        assert!(!OsFs::temp_path(&path).exists());

        perms.set_readonly(false);
        fs::set_permissions(&path, perms).unwrap();
    }

    #[test]
    fn os_write_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("app.cfg");

        assert!(!OsFs.can_write(&path));
        assert!(OsFs.write_replace(&path, "x").is_err());
    }

    #[test]
    fn directories_are_not_readable_files() {
        let dir = TempDir::new().unwrap();
        assert!(!OsFs.can_read(dir.path()));
    }

    #[test]
    fn memory_clones_share_files() {
        let fs = MemoryFs::new();
        let other = fs.clone();
        fs.insert("a.cfg", "# a\n");
        assert_eq!(other.contents("a.cfg").as_deref(), Some("# a\n"));
        assert!(other.can_read(Path::new("a.cfg")));
    }

    #[test]
    fn memory_read_only_rejects_writes() {
        let fs = MemoryFs::new();
        fs.set_read_only("locked.cfg", true);
        let err = fs.write_replace(Path::new("locked.cfg"), "x").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);

        fs.set_read_only("locked.cfg", false);
        assert!(fs.write_replace(Path::new("locked.cfg"), "x").is_ok());
    }
}
