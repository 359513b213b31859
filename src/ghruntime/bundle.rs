//! # Bundle Builder
//!
//! Packs a local directory into a single zip archive for upload.
//!
//! The work is split in two halves:
//!
//! - [`BundleEntries`] walks the source tree and yields one [`BundleEntry`] per
//!   file or directory. It knows nothing about zip.
//! - [`write_bundle`] consumes those entries and writes the archive, streaming
//!   file content straight from disk.
//!
//! ## Determinism
//!
//! Children of every directory are visited in lexicographic order of their file
//! names, entry timestamps are pinned to the zip epoch, and permissions are copied
//! from the source. Bundling an unchanged tree twice gives byte-identical output.
//!
//! ## Entry naming
//!
//! Entry names are relative to the source root and always use `/`, whatever the
//! host separator is. Directory entries end in `/` and carry no data. Empty
//! directories are kept.
//!
//! ## Ownership
//!
//! [`build_bundle`] never removes its destination, not even after a failure. The
//! caller owns the artifact and is responsible for cleaning it up.

use crate::error::{Result, RuntimeError};
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Seek, Write};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, trace};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const COPY_BUF_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

/// One node of the source tree, ready to be written to the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleEntry {
    /// Archive name: relative, `/`-separated, trailing `/` for directories.
    pub name: String,
    /// Location on disk.
    pub path: PathBuf,
    pub kind: EntryKind,
    /// Unix permission bits of the source node, when the platform has them.
    pub mode: Option<u32>,
    /// Size in bytes at walk time. Zero for directories.
    pub size: u64,
}

impl BundleEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Counts of what went into a bundle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BundleSummary {
    pub files: usize,
    pub directories: usize,
}

impl BundleSummary {
    pub fn entries(&self) -> usize {
        self.files + self.directories
    }
}

/// Depth-first, pre-order walk over a source directory.
///
/// The root itself is not yielded. The walk is lazy: directories are read only
/// when reached. It stops after the first error. Build a new one to start over.
pub struct BundleEntries {
    root: PathBuf,
    pending: Vec<PathBuf>,
    started: bool,
    done: bool,
}

impl BundleEntries {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            pending: Vec::new(),
            started: false,
            done: false,
        }
    }

    /// Queue the children of `dir` so they pop in sorted order.
    fn push_children(&mut self, dir: &Path) -> Result<()> {
        let walk_err = |source| RuntimeError::FilesystemWalk {
            path: dir.to_path_buf(),
            source,
        };

        let mut children = Vec::new();
        for entry in fs::read_dir(dir).map_err(walk_err)? {
            children.push(entry.map_err(walk_err)?.path());
        }
        children.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        self.pending.extend(children.into_iter().rev());
        Ok(())
    }

    fn visit(&mut self, path: PathBuf) -> Result<BundleEntry> {
        // Symlinks are not descended into; they are read through as files.
        let meta = fs::symlink_metadata(&path).map_err(|source| RuntimeError::FilesystemWalk {
            path: path.clone(),
            source,
        })?;

        let relative = path.strip_prefix(&self.root).map_err(|_| {
            RuntimeError::FilesystemWalk {
                path: path.clone(),
                source: io::Error::other(format!(
                    "error calculating relative path against '{}'",
                    self.root.display()
                )),
            }
        })?;
        let mut name = archive_name(relative);

        let kind = if meta.is_dir() {
            name.push('/');
            self.push_children(&path)?;
            EntryKind::Directory
        } else {
            EntryKind::File
        };

        Ok(BundleEntry {
            name,
            path,
            kind,
            mode: unix_mode(&meta),
            size: if meta.is_dir() { 0 } else { meta.len() },
        })
    }
}

impl Iterator for BundleEntries {
    type Item = Result<BundleEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if !self.started {
            self.started = true;
            let root = self.root.clone();
            if let Err(e) = self.push_children(&root) {
                self.done = true;
                return Some(Err(e));
            }
        }

        let path = match self.pending.pop() {
            Some(path) => path,
            None => {
                self.done = true;
                return None;
            }
        };

        let entry = self.visit(path);
        if entry.is_err() {
            self.done = true;
            self.pending.clear();
        }
        Some(entry)
    }
}

/// Join the normal components of a relative path with `/`.
pub fn archive_name(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(unix)]
fn unix_mode(meta: &fs::Metadata) -> Option<u32> {
    use std::os::unix::fs::PermissionsExt;
    Some(meta.permissions().mode() & 0o7777)
}

#[cfg(not(unix))]
fn unix_mode(_meta: &fs::Metadata) -> Option<u32> {
    None
}

/// Entries this large need zip64 headers; zip refuses to write them otherwise.
pub fn needs_zip64(size: u64) -> bool {
    size >= u64::from(u32::MAX)
}

fn entry_options(entry: &BundleEntry) -> FileOptions {
    let mut options = FileOptions::default().last_modified_time(zip::DateTime::default());
    if let Some(mode) = entry.mode {
        options = options.unix_permissions(mode);
    }
    match entry.kind {
        EntryKind::Directory => options.compression_method(CompressionMethod::Stored),
        EntryKind::File => options
            .compression_method(CompressionMethod::Deflated)
            .large_file(needs_zip64(entry.size)),
    }
}

/// Write every entry under `source_dir` into a zip archive on `writer`.
///
/// Returns the writer once the archive's central directory has been written.
pub fn write_bundle<W: Write + Seek>(source_dir: &Path, writer: W) -> Result<(W, BundleSummary)> {
    let mut zip = ZipWriter::new(writer);
    let mut summary = BundleSummary::default();

    for entry in BundleEntries::new(source_dir) {
        let entry = entry?;
        let write_err = |source| RuntimeError::BundleWrite {
            path: entry.path.clone(),
            source,
        };
        trace!(name = %entry.name, "adding bundle entry");

        match entry.kind {
            EntryKind::Directory => {
                zip.add_directory(entry.name.as_str(), entry_options(&entry))
                    .map_err(write_err)?;
                summary.directories += 1;
            }
            EntryKind::File => {
                zip.start_file(entry.name.as_str(), entry_options(&entry))
                    .map_err(write_err)?;
                let mut file = File::open(&entry.path).map_err(|source| {
                    RuntimeError::FilesystemWalk {
                        path: entry.path.clone(),
                        source,
                    }
                })?;
                copy_entry(&entry.path, &mut file, &mut zip)?;
                summary.files += 1;
            }
        }
    }

    let writer = zip.finish().map_err(|source| RuntimeError::BundleWrite {
        path: source_dir.to_path_buf(),
        source,
    })?;
    Ok((writer, summary))
}

/// Stream `reader` into the current archive entry through a fixed buffer.
///
/// Read failures are walk errors on `path`; write failures are bundle errors.
fn copy_entry<R: Read, W: Write>(path: &Path, reader: &mut R, writer: &mut W) -> Result<()> {
    let mut buf = [0u8; COPY_BUF_SIZE];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => return Ok(()),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(source) => {
                return Err(RuntimeError::FilesystemWalk {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        writer
            .write_all(&buf[..n])
            .map_err(|e| RuntimeError::BundleWrite {
                path: path.to_path_buf(),
                source: zip::result::ZipError::Io(e),
            })?;
    }
}

/// Bundle `source_dir` into a new archive at `destination`.
///
/// On failure the destination may hold a partial archive; removing it is up to
/// the caller.
pub fn build_bundle(source_dir: &Path, destination: &Path) -> Result<BundleSummary> {
    let file = File::create(destination).map_err(|source| RuntimeError::BundleCreate {
        path: destination.to_path_buf(),
        source,
    })?;
    build_bundle_into(source_dir, file, destination)
}

/// Bundle `source_dir` into `file`, already created at `destination`.
///
/// `destination` is only used for error messages and logging.
pub fn build_bundle_into(
    source_dir: &Path,
    file: File,
    destination: &Path,
) -> Result<BundleSummary> {
    let (mut writer, summary) = write_bundle(source_dir, BufWriter::new(file))?;
    writer.flush().map_err(|e| RuntimeError::BundleWrite {
        path: destination.to_path_buf(),
        source: zip::result::ZipError::Io(e),
    })?;

    debug!(
        source = %source_dir.display(),
        destination = %destination.display(),
        files = summary.files,
        directories = summary.directories,
        "bundle written"
    );
    Ok(summary)
}
