use async_trait::async_trait;
use log::info;
use sqlx::prelude::*;

use scoreboard::score::initial_records;
use scoreboard::{Score, TeamNumber, TeamScoreRecord};

use crate::persistence::{ScoreStore, WriteOutcome};


pub const SCORE_CHANGES_CHANNEL: &str = "score_changes";

// Per-database statements that make the database publish changes of the `scores` table.
pub trait ChangeFeedDialect {
    const CHANGE_FEED_STATEMENTS: &'static [&'static str];
}

impl ChangeFeedDialect for sqlx::Sqlite {
    const CHANGE_FEED_STATEMENTS: &'static [&'static str] = &[];
}

// Every row change is sent to `SCORE_CHANGES_CHANNEL` as a JSON `ChangeEvent`.
impl ChangeFeedDialect for sqlx::Postgres {
    const CHANGE_FEED_STATEMENTS: &'static [&'static str] = &[
        "CREATE OR REPLACE FUNCTION notify_score_change() RETURNS trigger AS $$
        DECLARE
            key BIGINT;
            document JSON;
        BEGIN
            IF TG_OP = 'DELETE' THEN
                key := OLD.team_number;
                document := NULL;
            ELSE
                key := NEW.team_number;
                document := json_build_object('teamNumber', NEW.team_number, 'score', NEW.score);
            END IF;
            PERFORM pg_notify('score_changes', json_build_object(
                'operationType', lower(TG_OP),
                'documentKey', json_build_object('teamNumber', key),
                'fullDocument', document)::text);
            RETURN NULL;
        END;
        $$ LANGUAGE plpgsql",
        "DROP TRIGGER IF EXISTS score_change_trigger ON scores",
        "CREATE TRIGGER score_change_trigger
            AFTER INSERT OR UPDATE OR DELETE ON scores
            FOR EACH ROW EXECUTE FUNCTION notify_score_change()",
    ];
}

pub struct SqlxStore<DB: sqlx::Database> {
    pub pool: sqlx::Pool<DB>,
}

impl<DB: sqlx::Database> Clone for SqlxStore<DB> {
    fn clone(&self) -> Self { Self { pool: self.pool.clone() } }
}

impl SqlxStore<sqlx::Sqlite> {
    pub async fn new(db_address: &str) -> anyhow::Result<Self> {
        let options = sqlx::sqlite::SqliteConnectOptions::new()
            .filename(db_address)
            .create_if_missing(true);
        let pool = sqlx::SqlitePool::connect_with(options).await?;
        Ok(Self { pool })
    }

    // Every connection to ":memory:" is a separate database, so the pool is pinned to
    // a single connection that never expires.
    pub async fn in_memory() -> anyhow::Result<Self> {
        let options = sqlx::sqlite::SqliteConnectOptions::new().in_memory(true);
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }
}

impl SqlxStore<sqlx::Postgres> {
    pub async fn new(db_address: &str) -> anyhow::Result<Self> {
        let pool = sqlx::postgres::PgPoolOptions::new().connect(db_address).await?;
        Ok(Self { pool })
    }

    pub async fn listen_for_changes(&self) -> anyhow::Result<sqlx::postgres::PgListener> {
        let mut listener = sqlx::postgres::PgListener::connect_with(&self.pool).await?;
        listener.listen(SCORE_CHANGES_CHANNEL).await?;
        Ok(listener)
    }
}

#[async_trait]
impl<DB> ScoreStore for SqlxStore<DB>
where
    DB: sqlx::Database + ChangeFeedDialect,
    for<'q> i64: sqlx::Type<DB> + sqlx::Encode<'q, DB> + sqlx::Decode<'q, DB>,
    for<'c> &'c mut DB::Connection: sqlx::Executor<'c, Database = DB>,
    for<'a> DB::Arguments<'a>: sqlx::IntoArguments<'a, DB>,
    for<'s> &'s str: sqlx::ColumnIndex<DB::Row>,
{
    async fn init(&self) -> anyhow::Result<()> {
        sqlx::query::<DB>(
            "CREATE TABLE IF NOT EXISTS scores (
                team_number BIGINT PRIMARY KEY,
                score BIGINT NOT NULL)",
        )
        .execute(&self.pool)
        .await?;
        for statement in DB::CHANGE_FEED_STATEMENTS.iter().copied() {
            sqlx::query::<DB>(statement).execute(&self.pool).await?;
        }

        let num_records: i64 = sqlx::query::<DB>("SELECT COUNT(*) AS num_records FROM scores")
            .fetch_one(&self.pool)
            .await?
            .try_get("num_records")?;
        if num_records > 0 {
            return Ok(());
        }
        let mut txn = self.pool.begin().await?;
        for record in initial_records() {
            sqlx::query::<DB>("INSERT INTO scores (team_number, score) VALUES ($1, $2)")
                .bind(record.team_number)
                .bind(record.score)
                .execute(&mut *txn)
                .await?;
        }
        txn.commit().await?;
        info!("Initialized scores table with default data");
        Ok(())
    }

    async fn read_all(&self) -> anyhow::Result<Vec<TeamScoreRecord>> {
        let rows = sqlx::query::<DB>("SELECT team_number, score FROM scores ORDER BY team_number")
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter()
            .map(|row| -> anyhow::Result<_> {
                Ok(TeamScoreRecord {
                    team_number: row.try_get("team_number")?,
                    score: row.try_get("score")?,
                })
            })
            .collect()
    }

    async fn write(&self, team: TeamNumber, score: Score) -> anyhow::Result<WriteOutcome> {
        sqlx::query::<DB>(
            "INSERT INTO scores (team_number, score) VALUES ($1, $2)
             ON CONFLICT (team_number) DO UPDATE SET score = excluded.score",
        )
        .bind(team.get())
        .bind(score)
        .execute(&self.pool)
        .await?;
        Ok(WriteOutcome::Written)
    }

    fn has_native_change_feed(&self) -> bool { !DB::CHANGE_FEED_STATEMENTS.is_empty() }
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn team(n: i64) -> TeamNumber { TeamNumber::new(n).unwrap() }

    #[async_std::test]
    async fn sqlite_seeds_once() {
        let store = SqlxStore::<sqlx::Sqlite>::in_memory().await.unwrap();
        store.init().await.unwrap();
        assert_eq!(store.read_all().await.unwrap(), initial_records());

        store.write(team(2), 35).await.unwrap();
        // A second init must not reset existing scores.
        store.init().await.unwrap();
        let records = store.read_all().await.unwrap();
        assert_eq!(records.len(), 10);
        assert_eq!(records[1], TeamScoreRecord { team_number: 2, score: 35 });
    }

    #[async_std::test]
    async fn sqlite_write_is_upsert() {
        let store = SqlxStore::<sqlx::Sqlite>::in_memory().await.unwrap();
        store.init().await.unwrap();
        sqlx::query("DELETE FROM scores WHERE team_number = 7")
            .execute(&store.pool)
            .await
            .unwrap();
        assert_eq!(store.read_all().await.unwrap().len(), 9);

        assert_eq!(store.write(team(7), 60).await.unwrap(), WriteOutcome::Written);
        let records = store.read_all().await.unwrap();
        assert_eq!(records.len(), 10);
        assert_eq!(records[6], TeamScoreRecord { team_number: 7, score: 60 });
        assert!(!store.has_native_change_feed());
    }
}
