//! Job repository
//!
//! Every query is scoped by `created_by`, so a job owned by someone else
//! behaves exactly like a missing row.

use crate::domain::entities::{Job, JobStatus};
use jobtrack_common::Result;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct JobRepository {
    pool: PgPool,
}

impl JobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a job by ID for its owner
    pub async fn find_for_owner(&self, id: Uuid, owner: Uuid) -> Result<Option<Job>> {
        let row = sqlx::query_as::<_, Job>(
            r#"
            SELECT id, company, position, status, created_by, created_at, updated_at
            FROM jobs WHERE id = $1 AND created_by = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// List an owner's jobs, newest first, with an optional status filter
    pub async fn list_for_owner(
        &self,
        owner: Uuid,
        status_filter: Option<JobStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Job>> {
        let rows = sqlx::query_as::<_, Job>(
            r#"
            SELECT id, company, position, status, created_by, created_at, updated_at
            FROM jobs
            WHERE created_by = $1 AND ($2::job_status IS NULL OR status = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(owner)
        .bind(status_filter)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Count an owner's jobs with the same filter as `list_for_owner`
    pub async fn count_for_owner(&self, owner: Uuid, status_filter: Option<JobStatus>) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM jobs
            WHERE created_by = $1 AND ($2::job_status IS NULL OR status = $2)
            "#,
        )
        .bind(owner)
        .bind(status_filter)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Create a new job
    pub async fn create(&self, job: &Job) -> Result<Job> {
        let row = sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs (id, company, position, status, created_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, company, position, status, created_by, created_at, updated_at
            "#,
        )
        .bind(job.id)
        .bind(&job.company)
        .bind(&job.position)
        .bind(job.status)
        .bind(job.created_by)
        .bind(job.created_at)
        .bind(job.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Persist changed fields of an owned job
    pub async fn update(&self, job: &Job) -> Result<Option<Job>> {
        let row = sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs SET
                company = $3, position = $4, status = $5, updated_at = NOW()
            WHERE id = $1 AND created_by = $2
            RETURNING id, company, position, status, created_by, created_at, updated_at
            "#,
        )
        .bind(job.id)
        .bind(job.created_by)
        .bind(&job.company)
        .bind(&job.position)
        .bind(job.status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Delete an owned job, returning the removed row
    pub async fn delete_for_owner(&self, id: Uuid, owner: Uuid) -> Result<Option<Job>> {
        let row = sqlx::query_as::<_, Job>(
            r#"
            DELETE FROM jobs WHERE id = $1 AND created_by = $2
            RETURNING id, company, position, status, created_by, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}
