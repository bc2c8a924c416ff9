//! A deterministic, in-memory [`FileSystem`] double, used by this crate's
//! own test suite (and available to callers who want to exercise matching
//! or ignore-file logic without touching disk).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{FileSystem, GlobFlags, RawStat};

#[derive(Debug, Clone)]
enum Node {
    File(String),
    Dir,
    /// A directory that exists but whose listing simulates a permission
    /// failure, for exercising `suppressErrors` without touching disk.
    UnreadableDir,
    Symlink(PathBuf),
}

/// An in-memory virtual tree. Paths are plain `/`-separated strings; there
/// is no notion of a host OS root, so every path lives under whatever
/// `root` the tree was constructed with.
pub struct InMemoryFileSystem {
    root: PathBuf,
    nodes: Mutex<BTreeMap<PathBuf, Node>>,
}

impl InMemoryFileSystem {
    /// Creates an empty tree with `root` already present as a directory.
    pub fn new(root: &str) -> Self {
        let root = PathBuf::from(root);
        let mut nodes = BTreeMap::new();
        nodes.insert(root.clone(), Node::Dir);
        InMemoryFileSystem {
            root,
            nodes: Mutex::new(nodes),
        }
    }

    /// Writes `contents` at `path`, creating any missing ancestor
    /// directories along the way.
    pub fn write_file(&self, path: &str, contents: &str) {
        let path = PathBuf::from(path);
        self.ensure_parents(&path);
        self.nodes
            .lock()
            .unwrap()
            .insert(path, Node::File(contents.to_string()));
    }

    /// Creates an empty directory at `path`, including ancestors.
    pub fn make_dir(&self, path: &str) {
        let path = PathBuf::from(path);
        self.ensure_parents(&path);
        self.nodes.lock().unwrap().insert(path, Node::Dir);
    }

    /// Creates a directory at `path` whose listing always fails, as if
    /// permission were denied.
    pub fn make_unreadable_dir(&self, path: &str) {
        let path = PathBuf::from(path);
        self.ensure_parents(&path);
        self.nodes.lock().unwrap().insert(path, Node::UnreadableDir);
    }

    /// Creates a symlink at `path` pointing at `target`.
    pub fn make_symlink(&self, path: &str, target: &str) {
        let path = PathBuf::from(path);
        self.ensure_parents(&path);
        self.nodes
            .lock()
            .unwrap()
            .insert(path, Node::Symlink(PathBuf::from(target)));
    }

    fn ensure_parents(&self, path: &Path) {
        let mut nodes = self.nodes.lock().unwrap();
        let mut ancestors: Vec<PathBuf> = path.ancestors().skip(1).map(Path::to_path_buf).collect();
        ancestors.reverse();
        for ancestor in ancestors {
            nodes.entry(ancestor).or_insert(Node::Dir);
        }
    }

    fn resolve(&self, path: &Path) -> Option<PathBuf> {
        let nodes = self.nodes.lock().unwrap();
        let mut current = path.to_path_buf();
        let mut hops = 0;
        loop {
            match nodes.get(&current) {
                Some(Node::Symlink(target)) => {
                    hops += 1;
                    if hops > 32 {
                        return None;
                    }
                    current = if target.is_absolute() {
                        target.clone()
                    } else {
                        current.parent()?.join(target)
                    };
                }
                Some(_) => return Some(current),
                None => return None,
            }
        }
    }
}

impl FileSystem for InMemoryFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).is_some()
    }

    fn is_directory(&self, path: &Path) -> bool {
        match self.resolve(path) {
            Some(p) => matches!(
                self.nodes.lock().unwrap().get(&p),
                Some(Node::Dir) | Some(Node::UnreadableDir)
            ),
            None => false,
        }
    }

    fn is_file(&self, path: &Path) -> bool {
        match self.resolve(path) {
            Some(p) => matches!(self.nodes.lock().unwrap().get(&p), Some(Node::File(_))),
            None => false,
        }
    }

    fn is_symlink(&self, path: &Path) -> bool {
        matches!(self.nodes.lock().unwrap().get(path), Some(Node::Symlink(_)))
    }

    fn read_link(&self, path: &Path) -> Option<PathBuf> {
        match self.nodes.lock().unwrap().get(path) {
            Some(Node::Symlink(target)) => self.resolve(target).and(Some(target.clone())),
            _ => None,
        }
    }

    fn read_file(&self, path: &Path) -> String {
        match self.resolve(path) {
            Some(p) => match self.nodes.lock().unwrap().get(&p) {
                Some(Node::File(contents)) => contents.clone(),
                _ => String::new(),
            },
            None => String::new(),
        }
    }

    fn read_dir_checked(&self, path: &Path) -> std::io::Result<Vec<PathBuf>> {
        let Some(dir) = self.resolve(path) else {
            return Ok(Vec::new());
        };
        let nodes = self.nodes.lock().unwrap();
        match nodes.get(&dir) {
            Some(Node::Dir) => Ok(nodes
                .keys()
                .filter(|candidate| candidate.parent() == Some(dir.as_path()))
                .cloned()
                .collect()),
            Some(Node::UnreadableDir) => Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                format!("simulated permission error reading {}", dir.display()),
            )),
            _ => Ok(Vec::new()),
        }
    }

    fn glob(&self, root: &Path, pattern: &str, flags: GlobFlags) -> std::io::Result<Vec<PathBuf>> {
        super::super::pattern::glob_via_components(self, root, pattern, flags)
    }

    fn realpath(&self, path: &Path) -> Option<PathBuf> {
        self.resolve(path)
    }

    fn cwd(&self) -> Option<PathBuf> {
        Some(self.root.clone())
    }

    /// The virtual tree carries no real stat data; this always reports
    /// absent, the same as a real filesystem's stat failing.
    fn metadata(&self, _path: &Path) -> Option<RawStat> {
        None
    }
}
