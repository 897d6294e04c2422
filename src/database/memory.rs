//! In-process club store used by the service and handler tests. A transaction
//! works on a copy of the clubs and writes the clubs it decided on back on
//! commit, unless another transaction decided the same request first.

use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::core::models::club::{Club, ClubMember, JoinRequest, JoinRequestStatus, Verdict};
use crate::core::ports::repository::{ClubCommon, Common, Manager, Store, TxStore};
use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Approve(String, String, String),
    Reject(String, String, String),
}

#[derive(Default)]
struct State {
    clubs: HashMap<String, Club>,
    calls: Vec<Call>,
    transactions: usize,
    commits: usize,
}

#[derive(Clone, Default)]
pub struct MemoryManager {
    state: Arc<Mutex<State>>,
}

impl MemoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_club(&self, id: &str, name: &str, owner: &str) {
        let now = Utc::now();
        let club = Club {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            owner: owner.into(),
            created_at: now,
            updated_at: now,
            members: vec![ClubMember {
                username: owner.into(),
                display_name: owner.into(),
                cohort: String::new(),
                joined_at: now,
            }],
            join_requests: Vec::new(),
        };
        self.state.lock().unwrap().clubs.insert(id.into(), club);
    }

    pub fn add_join_request(&self, id: &str, username: &str, display_name: &str, cohort: &str) {
        let mut state = self.state.lock().unwrap();
        let club = state.clubs.get_mut(id).expect("club must be added first");
        club.join_requests.push(JoinRequest {
            username: username.into(),
            display_name: display_name.into(),
            cohort: cohort.into(),
            notes: String::new(),
            status: JoinRequestStatus::Pending,
            created_at: Utc::now(),
            decided_by: None,
            decided_at: None,
        });
    }

    pub fn club(&self, id: &str) -> Option<Club> {
        self.state.lock().unwrap().clubs.get(id).cloned()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn transactions(&self) -> usize {
        self.state.lock().unwrap().transactions
    }

    pub fn commits(&self) -> usize {
        self.state.lock().unwrap().commits
    }
}

impl Manager for MemoryManager {
    type Tx = MemoryTx;

    async fn tx(&self) -> Result<MemoryTx, Error> {
        let mut state = self.state.lock().unwrap();
        state.transactions += 1;
        Ok(MemoryTx {
            clubs: state.clubs.clone(),
            decided: Vec::new(),
            state: self.state.clone(),
        })
    }
}

pub struct MemoryTx {
    clubs: HashMap<String, Club>,
    // (club id, username) of every request this transaction moved out of pending
    decided: Vec<(String, String)>,
    state: Arc<Mutex<State>>,
}

impl MemoryTx {
    fn transition(&mut self, id: &str, username: &str, caller: &str, verdict: Verdict) -> Result<Club, Error> {
        let club = self.clubs.get_mut(id).ok_or_else(|| Error::NotFound(format!("club {} not found", id)))?;
        if club.owner != caller {
            return Err(Error::Forbidden("only the club owner can process join requests".into()));
        }
        let request = club
            .join_requests
            .iter_mut()
            .find(|r| r.username == username)
            .ok_or_else(|| Error::NotFound(format!("join request for {} not found", username)))?;
        if request.status != JoinRequestStatus::Pending {
            return Err(Error::Conflict(format!("join request for {} has already been {}", username, request.status)));
        }
        let now = Utc::now();
        request.status = verdict.status();
        request.decided_by = Some(caller.into());
        request.decided_at = Some(now);
        let member = ClubMember {
            username: request.username.clone(),
            display_name: request.display_name.clone(),
            cohort: request.cohort.clone(),
            joined_at: now,
        };
        if verdict == Verdict::Approve && !club.is_member(username) {
            club.members.push(member);
        }
        club.updated_at = now;
        self.decided.push((id.into(), username.into()));
        Ok(club.clone())
    }
}

impl ClubCommon for MemoryTx {
    async fn get(&mut self, id: &str) -> Result<Club, Error> {
        self.clubs.get(id).cloned().ok_or_else(|| Error::NotFound(format!("club {} not found", id)))
    }

    async fn approve_join_request(&mut self, id: &str, username: &str, caller: &str) -> Result<Club, Error> {
        self.state.lock().unwrap().calls.push(Call::Approve(id.into(), username.into(), caller.into()));
        self.transition(id, username, caller, Verdict::Approve)
    }

    async fn reject_join_request(&mut self, id: &str, username: &str, caller: &str) -> Result<Club, Error> {
        self.state.lock().unwrap().calls.push(Call::Reject(id.into(), username.into(), caller.into()));
        self.transition(id, username, caller, Verdict::Reject)
    }
}

impl Common for MemoryTx {}

impl Store for MemoryTx {}

impl TxStore for MemoryTx {
    /// Fails with `Error::Conflict` when another transaction committed a
    /// decision on the same request first. Nothing is written in that case.
    async fn commit(mut self) -> Result<(), Error> {
        let mut state = self.state.lock().unwrap();
        for (id, username) in &self.decided {
            let current = state.clubs.get(id).and_then(|club| club.join_request(username)).map(|r| r.status);
            if let Some(status) = current.filter(|s| *s != JoinRequestStatus::Pending) {
                return Err(Error::Conflict(format!("join request for {} has already been {}", username, status)));
            }
        }
        for (id, _) in &self.decided {
            if let Some(club) = self.clubs.remove(id) {
                state.clubs.insert(id.clone(), club);
            }
        }
        state.commits += 1;
        Ok(())
    }

    async fn rollback(self) -> Result<(), Error> {
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn test_uncommitted_transition_is_discarded() {
        let manager = MemoryManager::new();
        manager.add_club("club-42", "Knights", "alice");
        manager.add_join_request("club-42", "bob", "Bob", "1200-1300");
        let mut tx = manager.tx().await.unwrap();
        let club = tx.approve_join_request("club-42", "bob", "alice").await.unwrap();
        assert!(club.is_member("bob"));
        tx.rollback().await.unwrap();
        let club = manager.club("club-42").unwrap();
        assert!(!club.is_member("bob"));
        assert_eq!(club.join_request("bob").unwrap().status, JoinRequestStatus::Pending);
    }

    #[tokio::test]
    async fn test_overlapping_decisions_first_commit_wins() {
        let manager = MemoryManager::new();
        manager.add_club("club-42", "Knights", "alice");
        manager.add_join_request("club-42", "bob", "Bob", "1200-1300");
        let mut approve = manager.tx().await.unwrap();
        let mut reject = manager.tx().await.unwrap();
        approve.approve_join_request("club-42", "bob", "alice").await.unwrap();
        reject.reject_join_request("club-42", "bob", "alice").await.unwrap();
        approve.commit().await.unwrap();
        match reject.commit().await {
            Err(Error::Conflict(msg)) => assert_eq!(msg, "join request for bob has already been APPROVED"),
            other => panic!("expected conflict, got {:?}", other),
        }
        let club = manager.club("club-42").unwrap();
        assert_eq!(club.join_request("bob").unwrap().status, JoinRequestStatus::Approved);
        assert!(club.is_member("bob"));
        assert_eq!(manager.commits(), 1);
    }
}
