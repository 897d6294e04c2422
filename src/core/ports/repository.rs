use crate::core::models::club::Club;
use crate::error::Error;

/// Club persistence. Both transitions must be atomic for a given join request:
/// only a pending request moves, and a request that has already been decided
/// yields `Error::Conflict`.
pub trait ClubCommon {
    async fn get(&mut self, id: &str) -> Result<Club, Error>;
    async fn approve_join_request(&mut self, id: &str, username: &str, caller: &str) -> Result<Club, Error>;
    async fn reject_join_request(&mut self, id: &str, username: &str, caller: &str) -> Result<Club, Error>;
}

pub trait Common: ClubCommon {}

pub trait Store: Common {}

pub trait TxStore: Store {
    async fn commit(self) -> Result<(), Error>;
    async fn rollback(self) -> Result<(), Error>;
}

pub trait Manager {
    type Tx: TxStore;
    async fn tx(&self) -> Result<Self::Tx, Error>;
}
