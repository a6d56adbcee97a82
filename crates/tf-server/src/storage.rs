//! Filesystem layout for uploads and generated thumbnails.
//!
//! Uploads live under `{base_dir}/public/uploads/` and are addressed by the
//! public path `/uploads/<filename>`. Thumbnails are written to
//! `{base_dir}/public/uploads/thumbnails/thumb-<stem>.jpg` and exposed as
//! `/uploads/thumbnails/thumb-<stem>.jpg`.
//!
//! Caller-supplied paths never reach the filesystem unchecked: they must
//! reduce to a single plain file name once the public prefix is stripped.

use std::io::Write;
use std::path::{Component, Path, PathBuf};

use tf_core::{Error, Result};

/// Public prefix of upload paths, stripped to obtain the file name.
pub const UPLOADS_PREFIX: &str = "/uploads/";

const THUMBNAILS_DIR: &str = "thumbnails";

/// A sanitized reference to a file inside the uploads directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRef {
    /// Bare file name, e.g. `123-photo.png`.
    pub file_name: String,
    /// Absolute or base-relative path of the source file.
    pub path: PathBuf,
}

impl UploadRef {
    /// `thumb-<stem>.jpg`, whatever the source extension was.
    pub fn thumbnail_name(&self) -> String {
        let stem = Path::new(&self.file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.file_name);
        format!("thumb-{stem}.jpg")
    }

    /// Public path the thumbnail is served under.
    pub fn public_thumbnail_path(&self) -> String {
        format!("{UPLOADS_PREFIX}{THUMBNAILS_DIR}/{}", self.thumbnail_name())
    }
}

/// Uploads directory manager.
#[derive(Debug, Clone)]
pub struct UploadStore {
    uploads_dir: PathBuf,
}

impl UploadStore {
    /// Create a store rooted at `{base_dir}/public/uploads`.
    pub fn new(base_dir: &Path) -> Self {
        Self {
            uploads_dir: base_dir.join("public").join("uploads"),
        }
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    pub fn thumbnails_dir(&self) -> PathBuf {
        self.uploads_dir.join(THUMBNAILS_DIR)
    }

    /// Create the uploads and thumbnails directories if needed.
    pub async fn ensure_dirs(&self) -> Result<()> {
        tokio::fs::create_dir_all(self.thumbnails_dir()).await?;
        Ok(())
    }

    /// Turn a caller-supplied upload path into a reference inside the store.
    ///
    /// Accepts `/uploads/<name>` or a bare `<name>`. Anything that is not a
    /// single normal path component is rejected: `..`, absolute paths,
    /// nested directories, `.`, empty names, backslashes and NUL bytes.
    pub fn resolve(&self, filepath: &str) -> Result<UploadRef> {
        let name = filepath.strip_prefix(UPLOADS_PREFIX).unwrap_or(filepath);
        let file_name = sanitize_file_name(name)?;

        Ok(UploadRef {
            path: self.uploads_dir.join(file_name),
            file_name: file_name.to_string(),
        })
    }

    /// Read the upload's bytes. Anything that is not a regular file, such as
    /// the thumbnails directory, is reported as missing.
    pub async fn read(&self, upload: &UploadRef) -> Result<Vec<u8>> {
        match tokio::fs::metadata(&upload.path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Err(Error::not_found("file", &upload.file_name)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::not_found("file", &upload.file_name));
            }
            Err(e) => return Err(e.into()),
        }

        match tokio::fs::read(&upload.path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::not_found("file", &upload.file_name))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Write thumbnail bytes for `upload`, returning the public path.
    ///
    /// The bytes go to a temporary file in the thumbnails directory that is
    /// renamed into place, so the final path only ever holds a complete file.
    /// Blocking; call from `spawn_blocking`.
    pub fn write_thumbnail(&self, upload: &UploadRef, bytes: &[u8]) -> Result<String> {
        let dir = self.thumbnails_dir();
        std::fs::create_dir_all(&dir)?;

        let final_path = dir.join(upload.thumbnail_name());
        let mut tmp = tempfile::Builder::new()
            .prefix(".thumb-")
            .suffix(".tmp")
            .tempfile_in(&dir)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&final_path).map_err(|e| Error::from(e.error))?;

        tracing::info!(path = %final_path.display(), size = bytes.len(), "Thumbnail written");

        Ok(upload.public_thumbnail_path())
    }
}

fn sanitize_file_name(name: &str) -> Result<&str> {
    let reject = |why: &str| Error::Validation(format!("invalid upload path {name:?}: {why}"));

    if name.is_empty() {
        return Err(reject("empty file name"));
    }
    if name.contains('\0') || name.contains('\\') {
        return Err(reject("illegal character"));
    }
    if name.ends_with('/') {
        return Err(reject("not a file"));
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(name),
        (Some(Component::ParentDir), _) | (_, Some(Component::ParentDir)) => {
            Err(reject("parent directory references are not allowed"))
        }
        (Some(Component::RootDir | Component::Prefix(_)), _) => {
            Err(reject("absolute paths are not allowed"))
        }
        _ => Err(reject("must be a bare file name")),
    }
}
