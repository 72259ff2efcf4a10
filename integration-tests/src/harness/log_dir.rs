use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scratch directory of log files, removed on drop.
pub struct LogDir {
    dir: TempDir,
}

impl LogDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// A glob pattern rooted in this directory.
    pub fn glob(&self, pattern: &str) -> String {
        self.join(pattern).to_string_lossy().into_owned()
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.join(name);
        fs::write(&path, contents).expect("failed to write fixture");
        path
    }

    pub fn write_gz(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.join(name);
        let file = fs::File::create(&path).expect("failed to create fixture");
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder
            .write_all(contents.as_bytes())
            .expect("failed to compress fixture");
        encoder.finish().expect("failed to finish gzip stream");
        path
    }

    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.join(name)).unwrap_or_default()
    }

    pub fn exists(&self, name: &str) -> bool {
        self.join(name).exists()
    }

    /// Names of every file in the directory, sorted.
    pub fn file_names(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.dir.path())
            .expect("failed to list temp dir")
            .filter_map(Result::ok)
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

impl Default for LogDir {
    fn default() -> Self {
        Self::new()
    }
}
