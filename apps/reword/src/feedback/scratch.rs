//! Scratch files for uploaded attachments.
//!
//! A `ScratchFile` owns its path for exactly as long as it lives: dropping it
//! (normally, on an error path, or when the owning task is cancelled)
//! removes the file.

use std::io;
use std::path::Path;

use tempfile::NamedTempFile;

pub struct ScratchFile {
    file: NamedTempFile,
}

impl ScratchFile {
    /// Creates an empty file in `dir` named after `filename`'s stem plus a
    /// random suffix, so two uploads with the same name never share a path.
    pub fn create(dir: &Path, filename: &str) -> io::Result<Self> {
        let stem = Path::new(filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("attachment");
        let extension = Path::new(filename)
            .extension()
            .and_then(|s| s.to_str())
            .map(|e| format!(".{e}"))
            .unwrap_or_default();

        let file = tempfile::Builder::new()
            .prefix(&format!("{stem}-"))
            .suffix(&extension)
            .tempfile_in(dir)?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Writes the whole attachment to the file.
    pub async fn write_all(&self, bytes: &[u8]) -> io::Result<()> {
        tokio::fs::write(self.path(), bytes).await
    }

    /// Removes the file now, reporting any error instead of ignoring it.
    pub fn remove(self) -> io::Result<()> {
        self.file.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_is_derived_from_attachment_and_unique() {
        let dir = tempfile::tempdir().unwrap();
        let a = ScratchFile::create(dir.path(), "resume.pdf").unwrap();
        let b = ScratchFile::create(dir.path(), "resume.pdf").unwrap();

        let name_a = a.path().file_name().unwrap().to_str().unwrap().to_string();
        assert!(name_a.starts_with("resume-"));
        assert!(name_a.ends_with(".pdf"));
        assert_ne!(a.path(), b.path());
        assert_eq!(a.path().parent().unwrap(), dir.path());
    }

    #[test]
    fn test_directory_components_in_filename_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let file = ScratchFile::create(dir.path(), "../../etc/passwd.pdf").unwrap();
        assert_eq!(file.path().parent().unwrap(), dir.path());
        assert!(file
            .path()
            .file_name()
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("passwd-"));
    }

    #[tokio::test]
    async fn test_write_then_remove() {
        let dir = tempfile::tempdir().unwrap();
        let file = ScratchFile::create(dir.path(), "cv.pdf").unwrap();
        file.write_all(b"%PDF-1.4").await.unwrap();
        assert_eq!(std::fs::read(file.path()).unwrap(), b"%PDF-1.4");

        let path = file.path().to_path_buf();
        file.remove().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_drop_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = ScratchFile::create(dir.path(), "cv.pdf").unwrap();
        let path = file.path().to_path_buf();
        drop(file);
        assert!(!path.exists());
    }
}
