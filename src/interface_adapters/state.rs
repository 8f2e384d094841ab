use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::domain::{Session, SessionStore};

// In-memory session store; the default for hosts without persistence.
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    pub session: Arc<Mutex<Option<Session>>>,
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn commit(&self, session: Session) -> Result<(), String> {
        let mut current = self.session.lock().await;
        *current = Some(session);
        Ok(())
    }

    async fn current(&self) -> Result<Option<Session>, String> {
        let current = self.session.lock().await;
        Ok(current.clone())
    }

    async fn clear(&self) -> Result<bool, String> {
        let mut current = self.session.lock().await;
        Ok(current.take().is_some())
    }
}

// JSON-file session store so a session survives restarts of the host.
#[derive(Clone)]
pub struct FileSessionStore {
    pub path: PathBuf,
    // Serializes writers within this process.
    write_lock: Arc<Mutex<()>>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "session".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn commit(&self, session: Session) -> Result<(), String> {
        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| format!("create {}: {err}", parent.display()))?;
        }

        let bytes = serde_json::to_vec_pretty(&session).map_err(|err| err.to_string())?;

        // Write a sibling temp file and rename it over the target, so readers see
        // either the old session or the new one.
        let tmp_path = self.tmp_path();
        let mut tmp = tokio::fs::File::create(&tmp_path)
            .await
            .map_err(|err| format!("create {}: {err}", tmp_path.display()))?;
        tmp.write_all(&bytes)
            .await
            .map_err(|err| format!("write {}: {err}", tmp_path.display()))?;
        tmp.sync_all()
            .await
            .map_err(|err| format!("sync {}: {err}", tmp_path.display()))?;
        drop(tmp);

        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|err| format!("replace {}: {err}", self.path.display()))
    }

    async fn current(&self) -> Result<Option<Session>, String> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(format!("read {}: {err}", self.path.display())),
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|err| format!("parse {}: {err}", self.path.display()))
    }

    async fn clear(&self) -> Result<bool, String> {
        let _guard = self.write_lock.lock().await;

        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(format!("remove {}: {err}", self.path.display())),
        }
    }
}
