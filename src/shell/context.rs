//! Application context
//!
//! Everything the dispatcher acts on: the active session, the local
//! working directory and the local file store.

use std::path::{Path, PathBuf};

use crate::client::FtpSession;
use crate::storage::{DiskStore, LocalFileStore, resolve_local_path};

pub struct AppContext<F: LocalFileStore = DiskStore> {
    session: FtpSession,
    local_dir: PathBuf,
    store: F,
}

impl<F: LocalFileStore> AppContext<F> {
    pub fn new(session: FtpSession, local_dir: PathBuf, store: F) -> Self {
        Self {
            session,
            local_dir,
            store,
        }
    }

    pub fn session(&self) -> &FtpSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut FtpSession {
        &mut self.session
    }

    pub fn store(&self) -> &F {
        &self.store
    }

    pub fn local_dir(&self) -> &Path {
        &self.local_dir
    }

    /// Resolves a local path typed by the user.
    pub fn resolve(&self, input: &str) -> PathBuf {
        resolve_local_path(&self.local_dir, input)
    }

    /// Changes the local directory; the target must be a directory.
    pub async fn change_local_dir(&mut self, input: &str) -> Result<&Path, String> {
        let target = self.resolve(input);
        if !self.store.is_dir(&target).await {
            return Err(format!("{}: not a directory", target.display()));
        }
        self.local_dir = target;
        Ok(&self.local_dir)
    }
}
