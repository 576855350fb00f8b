use std::fmt::{Display, Formatter};
use std::fs::write;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use indicatif::ProgressBar;
use log::debug;
use quick_xml::escape::escape;
use thiserror::Error;
use crate::cli;
use crate::fs_utils::{file_path_relative_to, is_dir, sorted_walk};

pub const DEFAULT_PREFIX: &str = "/com/inform7/IDE";
pub const ARCHIVE_ROOT: &str = "inform";
pub const EXCLUDED_DIR: &str = "licenses";

const PREFIX_REWRITES: [(&str, &str); 2] = [
    ("Documentation/", "inform/"),
    ("Resources/", "inform/"),
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManifestEntry {
    pub path: String,
    pub compressed: bool,
}

impl ManifestEntry {
    pub fn new(path: String) -> Self {
        let compressed = path.ends_with(".html");
        ManifestEntry { path, compressed }
    }
}

impl Display for ManifestEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let attrs = if self.compressed { " compressed=\"true\"" } else { "" };
        write!(f, "<file{attrs}>{0}</file>", escape(self.path.as_str()))
    }
}

/// A gresource manifest: one prefix group listing every bundled file.
#[derive(Clone, Debug)]
pub struct ResourceManifest {
    prefix: String,
    entries: Vec<ManifestEntry>,
}

#[derive(Debug)]
pub struct ResourceManifestBuilder {
    prefix: String,
    entries: Vec<ManifestEntry>,
}

impl ResourceManifest {
    pub fn builder<T: Into<String>>(prefix: T) -> ResourceManifestBuilder {
        ResourceManifestBuilder::new(prefix.into())
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{}", self)
    }

    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Replaces `file_path` with the rendered manifest.
    pub fn save_to<T: AsRef<Path>>(&self, file_path: T) -> Result<(), ManifestError> {
        write(file_path, self.render())?;

        Ok(())
    }
}

impl Display for ResourceManifest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
        writeln!(f, "  <!-- Generated file! Do not edit. -->")?;
        writeln!(f, "  <gresources>")?;
        writeln!(f, "    <gresource prefix=\"{0}\">", escape(self.prefix.as_str()))?;
        for entry in &self.entries {
            writeln!(f, "    {entry}")?;
        }
        writeln!(f, "  </gresource>")?;
        writeln!(f, "</gresources>")
    }
}

impl ResourceManifestBuilder {
    fn new(prefix: String) -> Self {
        ResourceManifestBuilder {
            prefix,
            entries: Vec::new(),
        }
    }

    pub fn finish(self) -> ResourceManifest {
        ResourceManifest {
            prefix: self.prefix,
            entries: self.entries,
        }
    }

    /// Adds one line of a file listing. Directory lines are dropped. Blank lines are dropped
    /// too, rather than written out as an empty `<file></file>` element.
    pub fn with_listed_path(mut self, line: &str) -> Self {
        if let Some(path) = rewrite_listed_path(line) {
            self.entries.push(ManifestEntry::new(path));
        }

        self
    }

    pub fn with_paths_from_reader<R: BufRead>(mut self, reader: R) -> Result<Self, ManifestError> {
        for line in reader.lines() {
            self = self.with_listed_path(&line?);
        }

        Ok(self)
    }

    /// Adds every file under `<src_dir>/inform`, relative to `src_dir`, skipping `licenses` directories.
    pub fn with_files_from_tree<T: AsRef<Path>>(mut self, src_dir: T) -> Result<Self, ManifestError> {
        let src_dir = src_dir.as_ref();
        let archive_root = src_dir.join(ARCHIVE_ROOT);

        let walk_bar = ProgressBar::new_spinner()
            .with_style(cli::walk_progress_style());

        let mut count = 0;
        for entry in sorted_walk(&archive_root, EXCLUDED_DIR) {
            let entry = entry?;
            if is_dir(&entry) {
                continue;
            }

            let relative = file_path_relative_to(entry.path(), src_dir)?;
            debug!("Adding resource {relative}");

            count += 1;
            walk_bar.set_prefix(format!("[{}/?]", count));
            walk_bar.set_message(relative.clone());

            self.entries.push(ManifestEntry::new(relative));
        }

        walk_bar.finish_and_clear();

        Ok(self)
    }
}

fn rewrite_listed_path(line: &str) -> Option<String> {
    let line = line.trim_end();
    if line.is_empty() || line.ends_with('/') {
        return None;
    }

    for (from, to) in PREFIX_REWRITES {
        if let Some(rest) = line.strip_prefix(from) {
            return Some(format!("{to}{rest}"));
        }
    }

    Some(line.to_string())
}

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Failed to walk the resource tree: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("{path} is not under the source root {root}")]
    NotUnderRoot { path: PathBuf, root: PathBuf },
    #[error("{0} is not valid UTF-8")]
    NonUtf8Path(PathBuf),
}
