#![allow(dead_code)]

//! Store boundary — the pipeline's only view of persistence.
//!
//! `CvStore` is injected into the orchestrator at construction time so tests
//! can substitute doubles; `PgCvStore` is the PostgreSQL implementation used
//! in production. CV records are read-only here; tailored results are
//! append-only snapshots.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use thiserror::Error;
use uuid::Uuid;

use crate::models::cv::CvData;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("stored CV {0} is not a valid CV document: {1}")]
    Corrupt(String, String),

    #[error("invalid record id: {0}")]
    InvalidId(String),
}

/// A stored résumé, owned by a user.
#[derive(Debug, Clone)]
pub struct CvRecord {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub data: CvData,
    pub updated_at: DateTime<Utc>,
}

/// Append-only snapshot persisted after a tailoring run.
#[derive(Debug, Clone)]
pub struct NewTailoredCv {
    pub cv_id: String,
    pub user_id: String,
    pub job_title: String,
    pub company: String,
    pub job_description: String,
    pub tailored_data: Value,
}

#[async_trait]
pub trait CvStore: Send + Sync {
    /// Fetches a CV by id, scoped to its owner. Unknown ids and ids owned by
    /// another principal both read as a miss.
    async fn get_cv(&self, id: &str, owner_id: &str) -> Result<Option<CvRecord>, StoreError>;

    async fn insert_tailored(&self, record: NewTailoredCv) -> Result<(), StoreError>;
}

#[derive(FromRow)]
struct CvRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    data: Value,
    updated_at: DateTime<Utc>,
}

pub struct PgCvStore {
    pool: PgPool,
}

impl PgCvStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CvStore for PgCvStore {
    async fn get_cv(&self, id: &str, owner_id: &str) -> Result<Option<CvRecord>, StoreError> {
        // Ids are opaque strings at this boundary; anything that is not a
        // UUID cannot name a row.
        let (Ok(id), Ok(owner)) = (Uuid::parse_str(id), Uuid::parse_str(owner_id)) else {
            return Ok(None);
        };

        let row = sqlx::query_as::<_, CvRow>(
            "SELECT id, user_id, title, data, updated_at FROM cvs WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let data: CvData = serde_json::from_value(row.data)
            .map_err(|e| StoreError::Corrupt(row.id.to_string(), e.to_string()))?;

        Ok(Some(CvRecord {
            id: row.id.to_string(),
            owner_id: row.user_id.to_string(),
            title: row.title,
            data,
            updated_at: row.updated_at,
        }))
    }

    async fn insert_tailored(&self, record: NewTailoredCv) -> Result<(), StoreError> {
        let cv_id =
            Uuid::parse_str(&record.cv_id).map_err(|_| StoreError::InvalidId(record.cv_id.clone()))?;
        let user_id = Uuid::parse_str(&record.user_id)
            .map_err(|_| StoreError::InvalidId(record.user_id.clone()))?;

        sqlx::query(
            "INSERT INTO tailored_cvs (cv_id, user_id, job_title, company, job_description, tailored_data) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(cv_id)
        .bind(user_id)
        .bind(&record.job_title)
        .bind(&record.company)
        .bind(&record.job_description)
        .bind(&record.tailored_data)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
