use crate::core::models::club::{Club, Decision, Verdict};
use crate::core::ports::repository::{ClubCommon, Manager, TxStore};
use crate::error::Error;

/// Validates a decision and applies it in a single transaction. Store errors
/// are returned as reported; a failed transition is never committed.
pub async fn process_join_request<M>(manager: &M, caller: &str, club_id: &str, username: &str, status: &str) -> Result<Club, Error>
where
    M: Manager,
{
    let decision = Decision::new(caller, club_id, username, status)?;
    let tx = manager.tx().await?;
    decide(tx, &decision).await
}

pub async fn decide<T>(mut storer: T, decision: &Decision) -> Result<Club, Error>
where
    T: TxStore,
{
    let club = match decision.verdict {
        Verdict::Approve => ClubCommon::approve_join_request(&mut storer, &decision.club_id, &decision.username, &decision.caller).await?,
        Verdict::Reject => ClubCommon::reject_join_request(&mut storer, &decision.club_id, &decision.username, &decision.caller).await?,
    };
    storer.commit().await?;
    Ok(club)
}
