//! File helpers that create missing parent directories before touching a path.
//!
//! Every open/write helper here ensures the full `/path/to/` chain exists
//! first, so callers never have to sequence `create_dir_all` themselves.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

/// Creates any missing directories in the chain `/path/to/` of `/path/to/file`.
pub fn create_missing_dirs<P: AsRef<Path>>(path: P) -> io::Result<()> {
    match path.as_ref().parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

/// Creates (truncating) the file at the given path, creating missing parent directories.
pub fn create<P: AsRef<Path>>(path: P) -> io::Result<File> {
    create_missing_dirs(&path)?;
    File::create(path)
}

/// Opens the file in append mode, creating it and any missing parent directories.
pub fn open_append<P: AsRef<Path>>(path: P) -> io::Result<File> {
    create_missing_dirs(&path)?;
    OpenOptions::new().append(true).create(true).open(path)
}

/// Opens the file in write mode, creating it and any missing parent directories.
pub fn open_write<P: AsRef<Path>>(path: P) -> io::Result<File> {
    create_missing_dirs(&path)?;
    OpenOptions::new().write(true).create(true).open(path)
}

/// Writes data to the file, creating it and any missing parent directories.
pub fn write_file<P: AsRef<Path>>(path: P, data: &[u8]) -> io::Result<()> {
    create_missing_dirs(&path)?;
    fs::write(path, data)
}

/// Checks if the given path exists and is a file.
pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
    fs::metadata(path).map(|meta| meta.is_file()).unwrap_or(false)
}

/// Checks if the given path exists and is a directory.
pub fn folder_exists<P: AsRef<Path>>(path: P) -> bool {
    fs::metadata(path).map(|meta| meta.is_dir()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn write_file_creates_parent_chain() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a/b/c/out.txt");

        write_file(&path, b"payload").unwrap();

        assert!(file_exists(&path));
        assert!(folder_exists(dir.path().join("a/b/c")));
        assert_eq!(fs::read(&path).unwrap(), b"payload");
    }

    #[test]
    fn open_append_appends_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs/app.log");

        {
            use std::io::Write;
            let mut file = open_append(&path).unwrap();
            file.write_all(b"first\n").unwrap();
        }
        {
            use std::io::Write;
            let mut file = open_append(&path).unwrap();
            file.write_all(b"second\n").unwrap();
        }

        let mut content = String::new();
        File::open(&path).unwrap().read_to_string(&mut content).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }

    #[test]
    fn create_truncates_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.txt");

        write_file(&path, b"to-be-replaced").unwrap();
        create(&path).unwrap();

        assert_eq!(fs::metadata(&path).unwrap().len(), 0);
    }

    #[test]
    fn exists_helpers_distinguish_files_and_folders() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("thing");

        assert!(!file_exists(&path));
        assert!(!folder_exists(&path));

        write_file(&path, b"").unwrap();
        assert!(file_exists(&path));
        assert!(!folder_exists(&path));
        assert!(folder_exists(dir.path()));
    }

    #[test]
    fn bare_filename_needs_no_parent() {
        assert!(create_missing_dirs("just-a-name.txt").is_ok());
    }
}
