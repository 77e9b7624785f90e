use super::{NmeaRepository, StoreError};
use crate::database;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteNmeaRepository {
    pool: SqlitePool,
}

impl SqliteNmeaRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens the database at `database_url` and makes sure `GNSS_DATA` exists.
    pub async fn open(database_url: &str) -> Result<Self, StoreError> {
        database::create_pool(database_url).await.map(Self::new)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl NmeaRepository for SqliteNmeaRepository {
    async fn insert(&self, raw: &str) -> Result<i64, StoreError> {
        let result = sqlx::query("INSERT INTO GNSS_DATA (NMEA_DATA) VALUES (?)")
            .bind(raw)
            .execute(&self.pool)
            .await
            .map_err(StoreError::WriteFailed)?;

        Ok(result.last_insert_rowid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn rows(repo: &SqliteNmeaRepository) -> Vec<(i64, String)> {
        sqlx::query_as("SELECT ID, NMEA_DATA FROM GNSS_DATA ORDER BY ID")
            .fetch_all(repo.pool())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn stores_sentence_verbatim() {
        let repo = SqliteNmeaRepository::open("sqlite::memory:").await.unwrap();
        let raw = "$GPRMC,104512.00,A,3714.502715,N,7658.331842,W,0.0,0.0,011024,0.0,E,A*14";

        let id = repo.insert(raw).await.unwrap();

        assert_eq!(rows(&repo).await, vec![(id, raw.to_string())]);
    }

    #[tokio::test]
    async fn quotes_are_data_not_sql() {
        let repo = SqliteNmeaRepository::open("sqlite::memory:").await.unwrap();
        let raw = "$GPRMC'); DROP TABLE GNSS_DATA; --";

        repo.insert(raw).await.unwrap();

        assert_eq!(rows(&repo).await[0].1, raw);
    }

    #[tokio::test]
    async fn duplicates_get_increasing_ids() {
        let repo = SqliteNmeaRepository::open("sqlite::memory:").await.unwrap();

        let first = repo.insert("$GPRMC,dup").await.unwrap();
        let second = repo.insert("$GPRMC,dup").await.unwrap();

        assert!(second > first);
        assert_eq!(rows(&repo).await.len(), 2);
    }

    #[tokio::test]
    async fn write_after_close_fails() {
        let repo = SqliteNmeaRepository::open("sqlite::memory:").await.unwrap();
        repo.close().await;

        assert!(matches!(
            repo.insert("$GPRMC,late").await,
            Err(StoreError::WriteFailed(_))
        ));
    }
}
