use anyhow::Context;
use async_std::path::PathBuf;
use async_std::sync::Mutex;
use async_trait::async_trait;
use log::{info, warn};

use scoreboard::score::{duplicate_teams, initial_records, missing_teams};
use scoreboard::{Score, TeamNumber, TeamScoreRecord};

use crate::persistence::{ScoreStore, WriteOutcome};


// Keeps all records as a pretty-printed JSON array in a single file.
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into(), write_lock: Mutex::new(()) }
    }

    async fn load(&self) -> anyhow::Result<Vec<TeamScoreRecord>> {
        let data = async_std::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read scores file '{}'", self.path.display()))?;
        serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse scores file '{}'", self.path.display()))
    }

    async fn save(&self, records: &[TeamScoreRecord]) -> anyhow::Result<()> {
        let data = serde_json::to_string_pretty(records)?;
        async_std::fs::write(&self.path, data)
            .await
            .with_context(|| format!("Failed to write scores file '{}'", self.path.display()))
    }
}

#[async_trait]
impl ScoreStore for FileStore {
    async fn init(&self) -> anyhow::Result<()> {
        let _guard = self.write_lock.lock().await;
        if self.path.exists().await {
            let records = self.load().await?;
            let duplicates = duplicate_teams(&records);
            if !duplicates.is_empty() {
                warn!("Scores file has duplicate records for teams {duplicates:?}");
            }
            let missing = missing_teams(&records);
            if !missing.is_empty() {
                let missing: Vec<i64> = missing.into_iter().map(TeamNumber::get).collect();
                warn!("Scores file has no records for teams {missing:?}");
            }
            return Ok(());
        }
        self.save(&initial_records()).await?;
        info!("Initialized scores file '{}' with default data", self.path.display());
        Ok(())
    }

    async fn read_all(&self) -> anyhow::Result<Vec<TeamScoreRecord>> { self.load().await }

    async fn write(&self, team: TeamNumber, score: Score) -> anyhow::Result<WriteOutcome> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;
        let Some(record) = records.iter_mut().find(|r| r.team_number == team.get()) else {
            return Ok(WriteOutcome::NotFound);
        };
        record.score = score;
        self.save(&records).await?;
        Ok(WriteOutcome::Written)
    }
}
