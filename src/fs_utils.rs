use std::cmp::Ordering;
use std::ffi::OsStr;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};
use crate::resources::ManifestError;

/// Relative path of `file` below `dir`, always joined with `/`.
pub fn file_path_relative_to<TFile: AsRef<Path>, TDir: AsRef<Path>>(file: TFile, dir: TDir) -> Result<String, ManifestError> {
    let file = file.as_ref();
    let dir = dir.as_ref();

    let relative = file.strip_prefix(dir)
        .map_err(|_| ManifestError::NotUnderRoot {
            path: file.to_path_buf(),
            root: dir.to_path_buf(),
        })?;

    let mut parts = Vec::new();
    for component in relative.components() {
        let part = component.as_os_str()
            .to_str()
            .ok_or_else(|| ManifestError::NonUtf8Path(file.to_path_buf()))?;
        parts.push(part);
    }

    Ok(parts.join("/"))
}

/// Depth-first walk of `root`. Within each directory the files come first, then the
/// subdirectories, both ordered by name. Directories named `excluded` are never entered.
pub fn sorted_walk<T: AsRef<Path>>(root: T, excluded: &str) -> impl Iterator<Item = walkdir::Result<DirEntry>> {
    let excluded = excluded.to_owned();

    WalkDir::new(root)
        .sort_by(files_then_dirs)
        .into_iter()
        .filter_entry(move |entry| !is_excluded_dir(entry, &excluded))
}

/// True for directories and for symlinks that point at one. Links are listed but never entered.
pub fn is_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() || (entry.path_is_symlink() && entry.path().is_dir())
}

fn files_then_dirs(a: &DirEntry, b: &DirEntry) -> Ordering {
    is_dir(a)
        .cmp(&is_dir(b))
        .then_with(|| a.file_name().cmp(b.file_name()))
}

fn is_excluded_dir(entry: &DirEntry, excluded: &str) -> bool {
    entry.depth() > 0
        && is_dir(entry)
        && entry.file_name() == OsStr::new(excluded)
}

#[cfg(test)]
mod tests {
    use std::fs::{create_dir_all, write};
    use std::path::Path;
    use tempfile::TempDir;
    use super::{file_path_relative_to, is_dir, sorted_walk};

    #[test]
    fn relative_path_uses_forward_slashes() {
        let root = Path::new("/src/project");
        let file = root.join("inform").join("doc").join("index.html");

        let relative = file_path_relative_to(&file, root).unwrap();

        assert_eq!(relative, "inform/doc/index.html");
    }

    #[test]
    fn file_outside_root_is_rejected() {
        assert!(file_path_relative_to("/elsewhere/a.txt", "/src/project").is_err());
    }

    #[test]
    fn walk_lists_files_before_subdirectories() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        create_dir_all(root.join("a")).unwrap();
        write(root.join("a").join("inner.txt"), "").unwrap();
        write(root.join("z.txt"), "").unwrap();
        write(root.join("b.txt"), "").unwrap();

        let names: Vec<String> = sorted_walk(root, "licenses")
            .map(|entry| entry.unwrap())
            .filter(|entry| entry.depth() > 0)
            .map(|entry| file_path_relative_to(entry.path(), root).unwrap())
            .collect();

        assert_eq!(names, vec!["b.txt", "z.txt", "a", "a/inner.txt"]);
    }

    #[test]
    fn walk_skips_excluded_directory_but_not_root() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("licenses");
        create_dir_all(root.join("licenses")).unwrap();
        write(root.join("licenses").join("gpl.txt"), "").unwrap();
        write(root.join("kept.txt"), "").unwrap();

        let files: Vec<String> = sorted_walk(&root, "licenses")
            .map(|entry| entry.unwrap())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| file_path_relative_to(entry.path(), &root).unwrap())
            .collect();

        assert_eq!(files, vec!["kept.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directory_sorts_with_directories() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        create_dir_all(root.join("real")).unwrap();
        write(root.join("real").join("a.txt"), "").unwrap();
        write(root.join("z.txt"), "").unwrap();
        std::os::unix::fs::symlink(root.join("real"), root.join("link")).unwrap();

        let entries: Vec<(String, bool)> = sorted_walk(root, "licenses")
            .map(|entry| entry.unwrap())
            .filter(|entry| entry.depth() > 0)
            .map(|entry| (file_path_relative_to(entry.path(), root).unwrap(), is_dir(&entry)))
            .collect();

        assert_eq!(
            entries,
            vec![
                ("z.txt".to_string(), false),
                ("link".to_string(), true),
                ("real".to_string(), true),
                ("real/a.txt".to_string(), false),
            ]
        );
    }
}
