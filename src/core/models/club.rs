use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JoinRequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl JoinRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinRequestStatus::Pending => "PENDING",
            JoinRequestStatus::Approved => "APPROVED",
            JoinRequestStatus::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for JoinRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JoinRequestStatus {
    type Err = Error;

    /// Case-insensitive, so `approved` and `APPROVED` are the same status.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [JoinRequestStatus::Pending, JoinRequestStatus::Approved, JoinRequestStatus::Rejected]
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::BadRequest(format!("Invalid request: status {:?} is not supported", s)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubMember {
    pub username: String,
    pub display_name: String,
    pub cohort: String,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    pub username: String,
    pub display_name: String,
    pub cohort: String,
    pub notes: String,
    pub status: JoinRequestStatus,
    pub created_at: DateTime<Utc>,
    pub decided_by: Option<String>,
    pub decided_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Club {
    pub id: String,
    pub name: String,
    pub description: String,
    pub owner: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub members: Vec<ClubMember>,
    pub join_requests: Vec<JoinRequest>,
}

#[cfg(test)]
impl Club {
    pub fn is_member(&self, username: &str) -> bool {
        self.members.iter().any(|m| m.username == username)
    }

    pub fn join_request(&self, username: &str) -> Option<&JoinRequest> {
        self.join_requests.iter().find(|r| r.username == username)
    }
}

/// The two transitions a pending join request can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Approve,
    Reject,
}

impl Verdict {
    pub fn status(&self) -> JoinRequestStatus {
        match self {
            Verdict::Approve => JoinRequestStatus::Approved,
            Verdict::Reject => JoinRequestStatus::Rejected,
        }
    }
}

impl TryFrom<JoinRequestStatus> for Verdict {
    type Error = Error;

    fn try_from(status: JoinRequestStatus) -> Result<Self, Self::Error> {
        match status {
            JoinRequestStatus::Approved => Ok(Verdict::Approve),
            JoinRequestStatus::Rejected => Ok(Verdict::Reject),
            JoinRequestStatus::Pending => Err(Error::BadRequest(format!("Invalid request: status {:?} is not supported", status.as_str()))),
        }
    }
}

/// A validated decision on the join request of `username` to club `club_id`, made by `caller`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub club_id: String,
    pub username: String,
    pub caller: String,
    pub verdict: Verdict,
}

impl Decision {
    pub fn new(caller: &str, club_id: &str, username: &str, status: &str) -> Result<Self, Error> {
        if caller.is_empty() {
            return Err(Error::BadRequest("Invalid request: caller username is required".into()));
        }
        if club_id.is_empty() {
            return Err(Error::BadRequest("Invalid request: id is required".into()));
        }
        if username.is_empty() {
            return Err(Error::BadRequest("Invalid request: join request username is required".into()));
        }
        // the message names the raw value, not its canonical spelling
        let verdict = Verdict::try_from(status.parse::<JoinRequestStatus>()?).map_err(|_| Error::BadRequest(format!("Invalid request: status {:?} is not supported", status)))?;
        if caller == username {
            return Err(Error::BadRequest("Invalid request: caller cannot process their own join request".into()));
        }
        Ok(Decision {
            club_id: club_id.to_owned(),
            username: username.to_owned(),
            caller: caller.to_owned(),
            verdict,
        })
    }
}
