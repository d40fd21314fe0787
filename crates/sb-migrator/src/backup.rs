//! Backup writer for the one destructive rewrite.

use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

/// Writes a verbatim copy of `content` to a `.backup` sibling of `path`.
///
/// Called exactly once, immediately before the full form-body replacement,
/// the only destructive operation in the system. Returns the backup path.
///
/// # Errors
///
/// Returns the underlying I/O error; the caller treats it as a hard
/// failure and does not proceed with the rewrite.
///
/// # Examples
///
/// ```no_run
/// use sb_migrator::write_backup;
/// use camino::Utf8Path;
///
/// let backup = write_backup(Utf8Path::new("app/contact/page.tsx"), "original text")?;
/// assert_eq!(backup.as_str(), "app/contact/page.tsx.backup");
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn write_backup(path: &Utf8Path, content: &str) -> Result<Utf8PathBuf, io::Error> {
    let backup_path = Utf8PathBuf::from(format!("{path}.backup"));
    fs::write(backup_path.as_std_path(), content)?;
    debug!(path = %backup_path, "Wrote backup");
    Ok(backup_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_backup() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8Path::from_path(dir.path()).expect("utf8");
        let file = root.join("page.tsx");
        fs::write(file.as_std_path(), "current").expect("write");

        let backup = write_backup(&file, "original").expect("backup");
        assert_eq!(backup, root.join("page.tsx.backup"));
        let saved = fs::read_to_string(backup.as_std_path()).expect("read");
        assert_eq!(saved, "original");
        // The original file is untouched
        let current = fs::read_to_string(file.as_std_path()).expect("read");
        assert_eq!(current, "current");
    }

    #[test]
    fn test_write_backup_missing_dir() {
        let result = write_backup(Utf8Path::new("/nonexistent/dir/page.tsx"), "x");
        assert!(result.is_err());
    }
}
