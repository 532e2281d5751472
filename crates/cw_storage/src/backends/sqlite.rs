use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use sqlx::Row;
use std::str::FromStr;

use cw_core::{ClassifiedArticle, Error, NewsStore, Recommendation, Result, StoredArticle};

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS news_articles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        url TEXT NOT NULL UNIQUE,
        source TEXT NOT NULL,
        region TEXT NOT NULL DEFAULT 'Global',
        summary TEXT,
        category TEXT,
        threat_type TEXT,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS security_recommendations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        threat_type TEXT NOT NULL,
        recommendation TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
    "#,
    // Add future migrations here
];

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect using the `DATABASE_URL` environment variable. A missing
    /// connection string is a construction-time failure.
    pub async fn from_env() -> Result<Self> {
        let url = std::env::var("DATABASE_URL")
            .map_err(|_| Error::Config("DATABASE_URL is not set".to_string()))?;
        Self::connect(&url).await
    }

    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| Error::Storage(format!("invalid database url: {}", e)))?
            .create_if_missing(true);

        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(|e| Error::Storage(format!("failed to connect to database: {}", e)))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| Error::Storage(format!("failed to run migration {}: {}", i, e)))?;
        }

        Ok(Self { pool })
    }
}

fn row_to_article(row: &sqlx::sqlite::SqliteRow) -> Result<StoredArticle> {
    let created_at: String = row.get("created_at");
    Ok(StoredArticle {
        id: row.get("id"),
        title: row.get("title"),
        url: row.get("url"),
        source: row.get("source"),
        region: row.get("region"),
        summary: row.get::<Option<String>, _>("summary").unwrap_or_default(),
        category: row.get::<Option<String>, _>("category").unwrap_or_default(),
        threat_type: row.get::<Option<String>, _>("threat_type").unwrap_or_default(),
        created_at: parse_timestamp(&created_at)?,
    })
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Storage(format!("failed to parse timestamp: {}", e)))
}

#[async_trait]
impl NewsStore for SqliteStore {
    async fn save_articles(&self, articles: &[ClassifiedArticle]) -> Result<usize> {
        let mut inserted = 0;

        for article in articles {
            // INSERT OR IGNORE keeps the existing record on url collision.
            let result = sqlx::query(
                r#"
                INSERT OR IGNORE INTO news_articles
                (title, url, source, region, summary, category, threat_type, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&article.title)
            .bind(&article.url)
            .bind(&article.source)
            .bind(&article.region)
            .bind(&article.summary)
            .bind(&article.category)
            .bind(&article.threat_type)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Storage(format!("failed to store article: {}", e)))?;

            inserted += result.rows_affected() as usize;
        }

        Ok(inserted)
    }

    async fn recent_articles(&self, window: Duration) -> Result<Vec<StoredArticle>> {
        let cutoff = (Utc::now() - window).to_rfc3339();

        let rows = sqlx::query(
            r#"
            SELECT * FROM news_articles
            WHERE created_at >= ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::Storage(format!("failed to load articles: {}", e)))?;

        rows.iter().map(row_to_article).collect()
    }

    async fn replace_recommendations(&self, recommendations: Vec<Recommendation>) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Error::Storage(format!("failed to begin transaction: {}", e)))?;

        sqlx::query("DELETE FROM security_recommendations")
            .execute(&mut *tx)
            .await
            .map_err(|e| Error::Storage(format!("failed to clear recommendations: {}", e)))?;

        for recommendation in &recommendations {
            sqlx::query(
                r#"
                INSERT INTO security_recommendations (threat_type, recommendation, created_at)
                VALUES (?, ?, ?)
                "#,
            )
            .bind(&recommendation.threat_type)
            .bind(&recommendation.recommendation)
            .bind(recommendation.created_at.to_rfc3339())
            .execute(&mut *tx)
            .await
            .map_err(|e| Error::Storage(format!("failed to store recommendation: {}", e)))?;
        }

        // Dropping the transaction without commit rolls it back, so a failed
        // insert above leaves the previous set intact.
        tx.commit()
            .await
            .map_err(|e| Error::Storage(format!("failed to commit recommendations: {}", e)))?;

        Ok(())
    }

    async fn recent_recommendations(&self, limit: usize) -> Result<Vec<Recommendation>> {
        let rows = sqlx::query(
            r#"
            SELECT threat_type, recommendation, created_at FROM security_recommendations
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::Storage(format!("failed to load recommendations: {}", e)))?;

        rows.iter()
            .map(|row| {
                let created_at: String = row.get("created_at");
                Ok(Recommendation {
                    threat_type: row.get("threat_type"),
                    recommendation: row.get("recommendation"),
                    created_at: parse_timestamp(&created_at)?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn article(url: &str, threat_type: &str) -> ClassifiedArticle {
        ClassifiedArticle {
            title: "Test Article".to_string(),
            url: url.to_string(),
            source: "test".to_string(),
            region: "Kenya".to_string(),
            summary: "body".to_string(),
            category: "Data Breach".to_string(),
            threat_type: threat_type.to_string(),
        }
    }

    async fn store() -> (tempfile::TempDir, SqliteStore) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        let store = SqliteStore::connect(&format!("sqlite://{}", path.display()))
            .await
            .unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_save_and_read_back() {
        let (_dir, store) = store().await;

        let inserted = store
            .save_articles(&[article("https://t/1", "Ransomware")])
            .await
            .unwrap();
        assert_eq!(inserted, 1);

        let stored = store.recent_articles(Duration::hours(24)).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].region, "Kenya");
        assert_eq!(stored[0].threat_type, "Ransomware");
    }

    #[tokio::test]
    async fn test_colliding_url_keeps_existing_record() {
        let (_dir, store) = store().await;

        store
            .save_articles(&[article("https://t/1", "Phishing")])
            .await
            .unwrap();
        let second = store
            .save_articles(&[article("https://t/1", "Ransomware")])
            .await
            .unwrap();
        assert_eq!(second, 0);

        let stored = store.recent_articles(Duration::hours(24)).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].threat_type, "Phishing");
    }

    #[tokio::test]
    async fn test_recommendation_replacement() {
        let (_dir, store) = store().await;

        let rec = |threat: &str| Recommendation {
            threat_type: threat.to_string(),
            recommendation: format!("Protect against {}", threat),
            created_at: Utc::now(),
        };

        store
            .replace_recommendations(vec![rec("Phishing"), rec("DDoS")])
            .await
            .unwrap();
        store.replace_recommendations(vec![rec("Ransomware")]).await.unwrap();

        let stored = store.recent_recommendations(3).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].threat_type, "Ransomware");
    }
}
