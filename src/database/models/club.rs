use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::core::models::club::{ClubMember, JoinRequest, JoinRequestStatus};
use crate::error::Error;

#[derive(Debug, FromRow)]
pub struct ClubRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub owner: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
pub struct ClubMemberRow {
    pub username: String,
    pub display_name: String,
    pub cohort: String,
    pub joined_at: DateTime<Utc>,
}

impl From<ClubMemberRow> for ClubMember {
    fn from(row: ClubMemberRow) -> Self {
        ClubMember {
            username: row.username,
            display_name: row.display_name,
            cohort: row.cohort,
            joined_at: row.joined_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct JoinRequestRow {
    pub username: String,
    pub display_name: String,
    pub cohort: String,
    pub notes: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub decided_by: Option<String>,
    pub decided_at: Option<DateTime<Utc>>,
}

impl TryFrom<JoinRequestRow> for JoinRequest {
    type Error = Error;

    fn try_from(row: JoinRequestRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<JoinRequestStatus>()
            .map_err(|_| Error::ServerError(format!("unknown join request status {:?} stored for {}", row.status, row.username)))?;
        Ok(JoinRequest {
            username: row.username,
            display_name: row.display_name,
            cohort: row.cohort,
            notes: row.notes,
            status,
            created_at: row.created_at,
            decided_by: row.decided_by,
            decided_at: row.decided_at,
        })
    }
}
