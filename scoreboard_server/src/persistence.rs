use async_trait::async_trait;

use scoreboard::{Score, TeamNumber, TeamScoreRecord};


#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    // The store has no record for the team and does not create records on write.
    NotFound,
}

// Durable storage of team scores. Implementations do not coordinate concurrent writers
// beyond keeping each write atomic: the last write wins.
#[async_trait]
pub trait ScoreStore: Send + Sync {
    // Creates the backing storage if needed and seeds one zero record per team when empty.
    async fn init(&self) -> anyhow::Result<()>;

    async fn read_all(&self) -> anyhow::Result<Vec<TeamScoreRecord>>;

    async fn write(&self, team: TeamNumber, score: Score) -> anyhow::Result<WriteOutcome>;

    // Whether the store publishes its own change feed. When it doesn't, the server reports
    // successful writes to subscribers itself.
    fn has_native_change_feed(&self) -> bool { false }
}
