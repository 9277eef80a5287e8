use home::home_dir;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Resolve a path given on the command line, expanding a leading `~`.
///
/// Nothing is checked on disk; a missing config file or staging directory is
/// reported by whoever opens it.
///
/// # Errors
///
/// Returns an error when the path starts with `~` and no home directory is known.
pub fn resolve_user_path(raw: &str) -> Result<PathBuf, String> {
    let path = Path::new(raw);
    match path.strip_prefix("~") {
        Ok(rest) => home_dir()
            .map(|home| home.join(rest))
            .ok_or_else(|| format!("Cannot expand '{}': home directory unknown", raw)),
        Err(_) => Ok(path.to_path_buf()),
    }
}

/// Check that a local file can be handed to an upload.
///
/// # Errors
///
/// Returns a one-line diagnostic naming the file when it is missing, not a
/// regular file, or cannot be opened for reading.
pub fn check_upload_source(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Err(format!("'{}' does not exist", path.display()));
    }
    if !path.is_file() {
        return Err(format!("'{}' is not a regular file", path.display()));
    }
    File::open(path)
        .map(|_| ())
        .map_err(|e| format!("'{}' could not be opened: {}", path.display(), e))
}
