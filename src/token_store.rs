// Per-network eero API tokens: in memory, mirrored to `.eero_token_{id}` files.
// A login in progress keeps its provisional token in `.eero_token_{id}.temp`.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use tracing::{info, warn};

pub struct TokenStore {
    dir: PathBuf,
    tokens: RwLock<HashMap<String, String>>,
}

impl TokenStore {
    /// Opens `dir` (created if missing) and loads tokens for the given network ids.
    pub fn load<'a>(
        dir: impl AsRef<Path>,
        network_ids: impl IntoIterator<Item = &'a str>,
    ) -> anyhow::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        let mut tokens = HashMap::new();
        for id in network_ids {
            let path = token_path(&dir, id);
            match std::fs::read_to_string(&path) {
                Ok(s) if !s.trim().is_empty() => {
                    tokens.insert(id.to_string(), s.trim().to_string());
                }
                Ok(_) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    warn!(network_id = id, error = %e, "failed to read token file");
                }
            }
        }
        info!(loaded = tokens.len(), dir = %dir.display(), "token store ready");
        Ok(Self {
            dir,
            tokens: RwLock::new(tokens),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn get(&self, network_id: &str) -> Option<String> {
        self.read().get(network_id).cloned()
    }

    pub fn is_authenticated(&self, network_id: &str) -> bool {
        self.read().contains_key(network_id)
    }

    pub fn count(&self) -> usize {
        self.read().len()
    }

    /// Stores the provisional token issued when a verification code is sent.
    pub fn save_pending(&self, network_id: &str, token: &str) -> anyhow::Result<()> {
        write_private(&pending_path(&self.dir, network_id), token)
    }

    pub fn pending(&self, network_id: &str) -> anyhow::Result<Option<String>> {
        match std::fs::read_to_string(pending_path(&self.dir, network_id)) {
            Ok(s) => Ok(Some(s.trim().to_string()).filter(|s| !s.is_empty())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Makes a verified token permanent and drops the pending file.
    pub fn promote(&self, network_id: &str, token: &str) -> anyhow::Result<()> {
        write_private(&token_path(&self.dir, network_id), token)?;
        remove_if_exists(&pending_path(&self.dir, network_id))?;
        self.write().insert(network_id.to_string(), token.to_string());
        Ok(())
    }

    pub fn remove(&self, network_id: &str) -> anyhow::Result<()> {
        self.write().remove(network_id);
        remove_if_exists(&token_path(&self.dir, network_id))?;
        remove_if_exists(&pending_path(&self.dir, network_id))?;
        Ok(())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, String>> {
        self.tokens.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, String>> {
        self.tokens.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn token_path(dir: &Path, network_id: &str) -> PathBuf {
    dir.join(format!(".eero_token_{}", network_id))
}

fn pending_path(dir: &Path, network_id: &str) -> PathBuf {
    dir.join(format!(".eero_token_{}.temp", network_id))
}

/// Owner-only from creation; an existing file is narrowed to 0600 as well.
fn write_private(path: &Path, contents: &str) -> anyhow::Result<()> {
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(contents.as_bytes())?;
    Ok(())
}

fn remove_if_exists(path: &Path) -> anyhow::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
