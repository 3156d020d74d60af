//! Job domain entities
//!
//! A job is one tracked application: a company, the position applied
//! for, and where the application stands. Every job belongs to exactly
//! one user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use jobtrack_common::{Error, Result};

/// Maximum company name length
pub const COMPANY_MAX_LEN: usize = 50;

/// Maximum position title length
pub const POSITION_MAX_LEN: usize = 100;

/// Application status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "job_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Interview,
    Declined,
    #[default]
    Pending,
}

/// Job entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Job {
    pub id: Uuid,
    pub company: String,
    pub position: String,
    pub status: JobStatus,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Create a new job owned by `created_by`
    pub fn new(
        created_by: Uuid,
        company: &str,
        position: &str,
        status: Option<JobStatus>,
    ) -> Result<Self> {
        let company = validate_company(company)?;
        let position = validate_position(position)?;

        let now = Utc::now();
        Ok(Job {
            id: Uuid::new_v4(),
            company,
            position,
            status: status.unwrap_or_default(),
            created_by,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a partial update, validating every field that is present.
    ///
    /// Nothing is modified when any field is rejected.
    pub fn apply(&mut self, changes: JobChanges) -> Result<()> {
        let company = changes.company.as_deref().map(validate_company).transpose()?;
        let position = changes
            .position
            .as_deref()
            .map(validate_position)
            .transpose()?;

        if let Some(company) = company {
            self.company = company;
        }
        if let Some(position) = position {
            self.position = position;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Partial update of a job
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct JobChanges {
    pub company: Option<String>,
    pub position: Option<String>,
    pub status: Option<JobStatus>,
}

impl JobChanges {
    pub fn is_empty(&self) -> bool {
        self.company.is_none() && self.position.is_none() && self.status.is_none()
    }
}

fn validate_company(raw: &str) -> Result<String> {
    validate_text(raw, COMPANY_MAX_LEN, "Company")
}

fn validate_position(raw: &str) -> Result<String> {
    validate_text(raw, POSITION_MAX_LEN, "Position")
}

fn validate_text(raw: &str, max: usize, field: &str) -> Result<String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(Error::Validation(
            "Company or Position fields cannot be empty".to_string(),
        ));
    }
    if value.chars().count() > max {
        return Err(Error::Validation(format!(
            "{} cannot be more than {} characters",
            field, max
        )));
    }
    Ok(value.to_string())
}
