//! The default [`FileSystem`] implementation: a thin layer over
//! `std::fs`/`std::env`.

use std::path::{Path, PathBuf};

use super::{FileSystem, GlobFlags, RawStat};

/// Talks to the real, host filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSystem;

impl OsFileSystem {
    pub fn new() -> Self {
        OsFileSystem
    }
}

impl FileSystem for OsFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.symlink_metadata().is_ok()
    }

    fn is_directory(&self, path: &Path) -> bool {
        path.metadata().map(|m| m.is_dir()).unwrap_or(false)
    }

    fn is_file(&self, path: &Path) -> bool {
        path.metadata().map(|m| m.is_file()).unwrap_or(false)
    }

    fn is_symlink(&self, path: &Path) -> bool {
        path.symlink_metadata()
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false)
    }

    fn read_link(&self, path: &Path) -> Option<PathBuf> {
        let target = std::fs::read_link(path).ok()?;
        let resolved = if target.is_absolute() {
            target
        } else {
            path.parent()?.join(target)
        };
        resolved.exists().then_some(resolved)
    }

    fn read_file(&self, path: &Path) -> String {
        std::fs::read_to_string(path).unwrap_or_default()
    }

    fn read_dir_checked(&self, path: &Path) -> std::io::Result<Vec<PathBuf>> {
        match std::fs::read_dir(path) {
            Ok(entries) => Ok(entries.filter_map(|e| e.ok()).map(|e| e.path()).collect()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) if !path.is_dir() => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    fn glob(&self, root: &Path, pattern: &str, flags: GlobFlags) -> std::io::Result<Vec<PathBuf>> {
        super::super::pattern::glob_via_components(self, root, pattern, flags)
    }

    fn realpath(&self, path: &Path) -> Option<PathBuf> {
        std::fs::canonicalize(path).ok()
    }

    fn cwd(&self) -> Option<PathBuf> {
        std::env::current_dir().ok()
    }

    #[cfg(unix)]
    fn metadata(&self, path: &Path) -> Option<RawStat> {
        use std::os::unix::fs::MetadataExt;
        let m = path.metadata().ok()?;
        Some(RawStat {
            size: m.size(),
            atime: m.atime(),
            mtime: m.mtime(),
            ctime: m.ctime(),
            mode: m.mode(),
            uid: m.uid(),
            gid: m.gid(),
            inode: m.ino(),
            nlink: m.nlink(),
        })
    }

    #[cfg(not(unix))]
    fn metadata(&self, path: &Path) -> Option<RawStat> {
        let m = path.metadata().ok()?;
        let to_unix_secs = |t: std::io::Result<std::time::SystemTime>| {
            t.ok()
                .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
                .map(|d| d.as_secs() as i64)
                .unwrap_or(0)
        };
        Some(RawStat {
            size: m.len(),
            atime: to_unix_secs(m.accessed()),
            mtime: to_unix_secs(m.modified()),
            ctime: 0,
            mode: 0,
            uid: 0,
            gid: 0,
            inode: 0,
            nlink: 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_directories_and_files() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("a.txt");
        std::fs::write(&file_path, "hi").unwrap();

        let fs = OsFileSystem::new();
        assert!(fs.is_directory(dir.path()));
        assert!(fs.is_file(&file_path));
        assert!(!fs.is_directory(&file_path));
        assert_eq!(fs.read_file(&file_path), "hi");
    }

    #[test]
    fn read_dir_lists_children() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        let fs = OsFileSystem::new();
        let children = fs.read_dir(dir.path());
        assert!(children.iter().any(|p| p.ends_with("a.txt")));
        assert!(children.iter().any(|p| p.ends_with("sub")));
    }

    #[test]
    fn read_dir_checked_reports_missing_path_as_empty_not_an_error() {
        let fs = OsFileSystem::new();
        let missing = Path::new("/does/not/exist/hopefully");
        assert_eq!(fs.read_dir_checked(missing).unwrap(), Vec::<PathBuf>::new());
    }

    #[test]
    fn missing_path_reports_absent() {
        let fs = OsFileSystem::new();
        let missing = Path::new("/does/not/exist/hopefully");
        assert!(!fs.exists(missing));
        assert!(!fs.is_file(missing));
        assert!(!fs.is_directory(missing));
        assert_eq!(fs.read_file(missing), "");
    }
}
