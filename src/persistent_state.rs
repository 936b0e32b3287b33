use crate::archive::Archive;
use crate::model::{Match, NewMatch, Player};
use crate::store::{LadderStore, Records};
use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Ladder records which persist across sessions, kept as a JSON archive on disk.
///
/// Every mutation is written to disk before it becomes visible to readers.
pub struct FileStore {
    path: PathBuf,
    records: Mutex<Records>,
}

impl FileStore {
    /// Opens the archive at `path`, starting empty if it does not exist yet.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let records = match tokio::fs::read(&path).await {
            Ok(data) => {
                let archive = Archive::decode(&data).map_err(|e| {
                    anyhow!(
                        "Could not parse state at `{}`: {}",
                        path.to_string_lossy(),
                        e
                    )
                })?;
                Records {
                    players: archive.players,
                    matches: archive.matches,
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Records::default(),
            Err(e) => {
                return Err(anyhow!(
                    "Could not read state at `{}`: {}",
                    path.to_string_lossy(),
                    e
                ))
            }
        };

        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn save(&self, records: &Records) -> Result<()> {
        let archive = Archive::new(records.players.clone(), records.matches.clone());
        let contents = archive
            .encode()
            .map_err(|e| anyhow!("Could not serialize state: {}", e))?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                anyhow!(
                    "Could not create directory `{}`: {}",
                    parent.to_string_lossy(),
                    e
                )
            })?;
        }

        // Create a temporary file in the same directory.
        let tmp_path = self.path.with_extension("json.new");

        tokio::fs::write(&tmp_path, contents).await.map_err(|e| {
            anyhow!(
                "Could not write state to temporary file `{}`: {}",
                tmp_path.to_string_lossy(),
                e
            )
        })?;

        // Atomically rename the temporary file over the target file.
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| {
                anyhow!(
                    "Could not rename temporary file `{}` to `{}`: {}",
                    tmp_path.to_string_lossy(),
                    self.path.to_string_lossy(),
                    e
                )
            })?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl LadderStore for FileStore {
    async fn list_players(&self) -> Result<Vec<Player>> {
        Ok(self.records.lock().await.players.clone())
    }

    async fn add_player(&self, player: Player) -> Result<Player> {
        let mut records = self.records.lock().await;
        let mut updated = records.clone();
        updated.players.push(player.clone());
        self.save(&updated).await?;
        *records = updated;
        Ok(player)
    }

    async fn list_matches(&self) -> Result<Vec<Match>> {
        Ok(self.records.lock().await.matches.clone())
    }

    async fn create_match(&self, new: NewMatch) -> Result<Match> {
        let mut records = self.records.lock().await;
        let mut updated = records.clone();
        let created = updated.push_match(new)?;
        self.save(&updated).await?;
        *records = updated;
        Ok(created)
    }

    async fn replace_all(&self, players: Vec<Player>, matches: Vec<Match>) -> Result<()> {
        let mut records = self.records.lock().await;
        let updated = Records { players, matches };
        self.save(&updated).await?;
        *records = updated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PlayerId;
    use chrono::Utc;

    fn scratch_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("ladder-test-{}", PlayerId::new()))
            .join("state.json")
    }

    #[tokio::test]
    async fn missing_file_is_an_empty_ladder() {
        let store = FileStore::load(scratch_path()).await.unwrap();
        assert!(store.list_players().await.unwrap().is_empty());
        assert!(store.list_matches().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn records_survive_a_reload() {
        let path = scratch_path();
        let store = FileStore::load(&path).await.unwrap();
        let a = store.add_player(Player::new("Ivan", Utc::now())).await.unwrap();
        let b = store.add_player(Player::new("Olga", Utc::now())).await.unwrap();
        let m = store
            .create_match(NewMatch::new(a.id, b.id, Some(b.id), Utc::now()).unwrap())
            .await
            .unwrap();

        let reloaded = FileStore::load(&path).await.unwrap();

        assert_eq!(reloaded.list_players().await.unwrap(), vec![a, b]);
        assert_eq!(reloaded.list_matches().await.unwrap(), vec![m]);
        assert!(!path.with_extension("json.new").exists());

        if let Some(dir) = path.parent() {
            let _ = tokio::fs::remove_dir_all(dir).await;
        }
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let path = scratch_path();
        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        tokio::fs::write(&path, b"{ nope").await.unwrap();

        assert!(FileStore::load(&path).await.is_err());

        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
    }
}
