use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Abstraction over the filesystem root that sysfs, procfs and `/etc` are read from.
/// Defaults to `/` in production, redirectable to a temp directory for testing.
#[derive(Debug, Clone)]
pub struct SysfsRoot {
    root: PathBuf,
}

impl Default for SysfsRoot {
    fn default() -> Self {
        Self {
            root: PathBuf::from("/"),
        }
    }
}

impl SysfsRoot {
    /// Create a SysfsRoot pointing at the real system.
    pub fn system() -> Self {
        Self::default()
    }

    /// Create a SysfsRoot pointing at a custom directory (for testing).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a path relative to this root.
    /// e.g., `path("sys/bus/pci/devices")` -> `/sys/bus/pci/devices` or `<test_root>/sys/bus/pci/devices`
    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    /// Read a file, trimming whitespace.
    pub fn read(&self, relative: impl AsRef<Path>) -> Result<String> {
        let path = self.path(relative);
        std::fs::read_to_string(&path)
            .map(|s| s.trim().to_string())
            .map_err(|e| Error::SysfsRead { path, source: e })
    }

    /// Read a file, returning None if it doesn't exist or isn't readable.
    pub fn read_optional(&self, relative: impl AsRef<Path>) -> Result<Option<String>> {
        let path = self.path(relative);
        match std::fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s.trim().to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => Ok(None),
            Err(e) => Err(Error::SysfsRead { path, source: e }),
        }
    }

    /// Write a value to a file.
    pub fn write(&self, relative: impl AsRef<Path>, value: &str) -> Result<()> {
        let path = self.path(relative);
        std::fs::write(&path, value).map_err(|e| Error::SysfsWrite { path, source: e })
    }

    /// Write a whole config file, creating its parent directory if needed.
    pub fn write_file(&self, relative: impl AsRef<Path>, content: &str) -> Result<()> {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::SysfsWrite {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        std::fs::write(&path, content).map_err(|e| Error::SysfsWrite { path, source: e })
    }

    /// Remove a file. A file that is already gone counts as removed.
    pub fn remove(&self, relative: impl AsRef<Path>) -> Result<()> {
        let path = self.path(relative);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Remove { path, source: e }),
        }
    }

    /// Check if a path exists relative to this root.
    pub fn exists(&self, relative: impl AsRef<Path>) -> bool {
        self.path(relative).exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_read_write() {
        let tmp = tempfile::tempdir().unwrap();
        let sysfs = SysfsRoot::new(tmp.path());

        fs::create_dir_all(tmp.path().join("sys/test")).unwrap();
        fs::write(tmp.path().join("sys/test/value"), "on\n").unwrap();

        assert_eq!(sysfs.read("sys/test/value").unwrap(), "on");
        sysfs.write("sys/test/value", "auto").unwrap();
        assert_eq!(sysfs.read("sys/test/value").unwrap(), "auto");
    }

    #[test]
    fn test_read_optional_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let sysfs = SysfsRoot::new(tmp.path());

        assert_eq!(sysfs.read_optional("sys/nonexistent").unwrap(), None);
    }

    #[test]
    fn test_write_file_creates_parent_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let sysfs = SysfsRoot::new(tmp.path());

        sysfs
            .write_file("etc/modprobe.d/test.conf", "blacklist foo\n")
            .unwrap();
        assert_eq!(
            fs::read_to_string(tmp.path().join("etc/modprobe.d/test.conf")).unwrap(),
            "blacklist foo\n"
        );
    }

    #[test]
    fn test_remove_missing_is_ok() {
        let tmp = tempfile::tempdir().unwrap();
        let sysfs = SysfsRoot::new(tmp.path());

        assert!(sysfs.remove("etc/nothing-here.conf").is_ok());

        fs::create_dir_all(tmp.path().join("etc")).unwrap();
        fs::write(tmp.path().join("etc/present.conf"), "x").unwrap();
        sysfs.remove("etc/present.conf").unwrap();
        assert!(!sysfs.exists("etc/present.conf"));
    }
}
