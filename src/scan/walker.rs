use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Suffixes of files worth scanning. Matched against the whole file name so
/// a bare `.env` qualifies.
const SCAN_SUFFIXES: [&str; 7] = [".py", ".env", ".js", ".yml", ".yaml", ".json", ".txt"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedFile {
    pub absolute: PathBuf,
    /// Path relative to the workspace root, as recorded in the store.
    pub relative: PathBuf,
}

fn is_candidate(name: &str) -> bool {
    SCAN_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// Lazily enumerates the scannable files under a workspace root. Unreadable
/// directory entries are skipped. Order is filesystem-traversal order and
/// must not be relied upon across runs.
pub fn walk_workspace(root: &Path) -> impl Iterator<Item = WalkedFile> {
    let root = root.to_path_buf();
    WalkDir::new(root.clone())
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .file_name()
                    .to_str()
                    .map(is_candidate)
                    .unwrap_or(false)
        })
        .map(move |entry| {
            let absolute = entry.into_path();
            let relative = absolute
                .strip_prefix(&root)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| absolute.clone());
            WalkedFile { absolute, relative }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn walks_only_allowed_suffixes() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("app.py"), "x").unwrap();
        fs::write(dir.path().join("binary.so"), "x").unwrap();
        fs::write(dir.path().join("readme.md"), "x").unwrap();
        fs::write(dir.path().join("config.yaml"), "x").unwrap();

        let mut names: Vec<_> = walk_workspace(dir.path())
            .map(|f| f.relative.to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["app.py", "config.yaml"]);
    }

    #[test]
    fn bare_dotenv_file_is_included() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".env"), "PORT=8080").unwrap();

        let files: Vec<_> = walk_workspace(dir.path()).collect();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative, PathBuf::from(".env"));
    }

    #[test]
    fn relative_paths_preserve_nesting() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        fs::write(dir.path().join("a/b/settings.json"), "{}").unwrap();

        let files: Vec<_> = walk_workspace(dir.path()).collect();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative, PathBuf::from("a/b/settings.json"));
        assert!(files[0].absolute.is_absolute() || files[0].absolute.starts_with(dir.path()));
    }

    #[test]
    fn empty_workspace_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(walk_workspace(dir.path()).count(), 0);
    }
}
