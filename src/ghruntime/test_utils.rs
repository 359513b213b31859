use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::ZipArchive;

/// A throwaway source directory for bundling tests.
pub struct SourceTree {
    // Holds the directory alive until the test is done
    pub temp: TempDir,
    pub root: PathBuf,
}

impl Default for SourceTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceTree {
    /// An empty `dist/` directory inside a fresh temp dir.
    pub fn new() -> Self {
        let temp = tempfile::tempdir().expect("failed to create temp dir");
        let root = temp.path().join("dist");
        fs::create_dir(&root).expect("failed to create source dir");
        Self { temp, root }
    }

    /// `index.html`, `assets/logo.png` and the empty `assets/empty/`.
    pub fn dist() -> Self {
        let tree = Self::new();
        tree.file("index.html", "<h1>hi</h1>");
        tree.file("assets/logo.png", "\u{89}PNG");
        tree.dir("assets/empty");
        tree
    }

    pub fn file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent dirs");
        }
        fs::write(&path, content).expect("failed to write file");
        path
    }

    pub fn dir(&self, relative: &str) -> PathBuf {
        let path = self.root.join(relative);
        fs::create_dir_all(&path).expect("failed to create dir");
        path
    }
}

/// Entry names of the zip archive at `path`, in archive order.
pub fn bundle_names(path: &Path) -> Vec<String> {
    let file = File::open(path).expect("failed to open bundle");
    let mut archive = ZipArchive::new(file).expect("not a zip archive");
    (0..archive.len())
        .map(|i| {
            archive
                .by_index(i)
                .expect("unreadable entry")
                .name()
                .to_string()
        })
        .collect()
}

/// Entry names of an in-memory zip archive.
pub fn bundle_names_from_bytes(bytes: &[u8]) -> Vec<String> {
    let mut archive = ZipArchive::new(std::io::Cursor::new(bytes)).expect("not a zip archive");
    (0..archive.len())
        .map(|i| {
            archive
                .by_index(i)
                .expect("unreadable entry")
                .name()
                .to_string()
        })
        .collect()
}
