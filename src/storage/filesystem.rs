//! File system operations
//!
//! The local side of `get`, `send` and the local directory commands.

use std::io::Result;
use std::path::Path;

use log::debug;
use tokio::fs;

/// Local file access used by the shell.
#[allow(async_fn_in_trait)]
pub trait LocalFileStore {
    /// Reads a whole file.
    async fn read_file(&self, path: &Path) -> Result<Vec<u8>>;

    /// Creates or truncates `path` and writes `contents` to it.
    async fn write_file(&self, path: &Path, contents: &[u8]) -> Result<()>;

    /// Names in a directory, sorted, directories suffixed with `/`.
    async fn list_dir(&self, path: &Path) -> Result<Vec<String>>;

    async fn is_dir(&self, path: &Path) -> bool;
}

/// `LocalFileStore` over the real file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskStore;

impl LocalFileStore for DiskStore {
    async fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        let contents = fs::read(path).await?;
        debug!("Read {} bytes from {}", contents.len(), path.display());
        Ok(contents)
    }

    async fn write_file(&self, path: &Path, contents: &[u8]) -> Result<()> {
        fs::write(path, contents).await?;
        debug!("Wrote {} bytes to {}", contents.len(), path.display());
        Ok(())
    }

    async fn list_dir(&self, path: &Path) -> Result<Vec<String>> {
        let mut entries = fs::read_dir(path).await?;
        let mut names = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let mut name = entry.file_name().to_string_lossy().to_string();
            if entry.file_type().await?.is_dir() {
                name.push('/');
            }
            names.push(name);
        }

        names.sort();
        Ok(names)
    }

    async fn is_dir(&self, path: &Path) -> bool {
        fs::metadata(path)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false)
    }
}
