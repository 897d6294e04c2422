use sqlx::postgres::PgPoolOptions;
use sqlx::{query, query_as, query_scalar, Executor, PgPool, Postgres, Transaction};

use crate::core::models::club::{Club, JoinRequest, JoinRequestStatus, Verdict};
use crate::core::ports::repository::{ClubCommon, Common, Manager, Store, TxStore};
use crate::database::models::club::{ClubMemberRow, ClubRow, JoinRequestRow};
use crate::error::Error;

pub struct PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e>,
{
    executor: E,
}

impl<E> PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }
}

impl<E> PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn transition(&mut self, id: &str, username: &str, caller: &str, verdict: Verdict) -> Result<Club, Error> {
        // row lock serializes decisions on the same club
        let owner: Option<String> = query_scalar("SELECT owner FROM clubs WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut self.executor)
            .await?;
        let owner = owner.ok_or_else(|| Error::NotFound(format!("club {} not found", id)))?;
        if owner != caller {
            return Err(Error::Forbidden("only the club owner can process join requests".into()));
        }
        let updated = query(
            "
        UPDATE club_join_requests
        SET status = $1, decided_by = $2, decided_at = NOW()
        WHERE club_id = $3 AND username = $4 AND status = $5",
        )
        .bind(verdict.status().as_str())
        .bind(caller)
        .bind(id)
        .bind(username)
        .bind(JoinRequestStatus::Pending.as_str())
        .execute(&mut self.executor)
        .await?
        .rows_affected();
        if updated == 0 {
            let status: Option<String> = query_scalar("SELECT status FROM club_join_requests WHERE club_id = $1 AND username = $2")
                .bind(id)
                .bind(username)
                .fetch_optional(&mut self.executor)
                .await?;
            return Err(match status {
                Some(status) => Error::Conflict(format!("join request for {} has already been {}", username, status)),
                None => Error::NotFound(format!("join request for {} not found", username)),
            });
        }
        if verdict == Verdict::Approve {
            query(
                "
            INSERT INTO club_members (club_id, username, display_name, cohort, joined_at)
            SELECT club_id, username, display_name, cohort, NOW()
            FROM club_join_requests
            WHERE club_id = $1 AND username = $2
            ON CONFLICT (club_id, username) DO NOTHING",
            )
            .bind(id)
            .bind(username)
            .execute(&mut self.executor)
            .await?;
        }
        query("UPDATE clubs SET updated_at = NOW() WHERE id = $1").bind(id).execute(&mut self.executor).await?;
        self.get(id).await
    }
}

impl<E> ClubCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn get(&mut self, id: &str) -> Result<Club, Error> {
        let club: ClubRow = query_as("SELECT id, name, description, owner, created_at, updated_at FROM clubs WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut self.executor)
            .await?
            .ok_or_else(|| Error::NotFound(format!("club {} not found", id)))?;
        let members: Vec<ClubMemberRow> = query_as(
            "
        SELECT username, display_name, cohort, joined_at
        FROM club_members
        WHERE club_id = $1
        ORDER BY joined_at, username",
        )
        .bind(id)
        .fetch_all(&mut self.executor)
        .await?;
        let join_requests: Vec<JoinRequestRow> = query_as(
            "
        SELECT username, display_name, cohort, notes, status, created_at, decided_by, decided_at
        FROM club_join_requests
        WHERE club_id = $1
        ORDER BY created_at, username",
        )
        .bind(id)
        .fetch_all(&mut self.executor)
        .await?;
        Ok(Club {
            id: club.id,
            name: club.name,
            description: club.description,
            owner: club.owner,
            created_at: club.created_at,
            updated_at: club.updated_at,
            members: members.into_iter().map(Into::into).collect(),
            join_requests: join_requests.into_iter().map(JoinRequest::try_from).collect::<Result<_, _>>()?,
        })
    }

    async fn approve_join_request(&mut self, id: &str, username: &str, caller: &str) -> Result<Club, Error> {
        self.transition(id, username, caller, Verdict::Approve).await
    }

    async fn reject_join_request(&mut self, id: &str, username: &str, caller: &str) -> Result<Club, Error> {
        self.transition(id, username, caller, Verdict::Reject).await
    }
}

impl<E> Common for PgSqlx<E> where for<'e> &'e mut E: Executor<'e, Database = Postgres> {}

impl<E> Store for PgSqlx<E> where for<'e> &'e mut E: Executor<'e, Database = Postgres> {}

impl TxStore for PgSqlx<Transaction<'static, Postgres>> {
    async fn commit(self) -> Result<(), Error> {
        self.executor.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), Error> {
        self.executor.rollback().await?;
        Ok(())
    }
}

pub struct PgSqlxManager {
    pool: PgPool,
}

impl PgSqlxManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, Error> {
        let pool = PgPoolOptions::new().max_connections(max_connections).connect(url).await?;
        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> Result<(), Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

impl Manager for PgSqlxManager {
    type Tx = PgSqlx<Transaction<'static, Postgres>>;

    async fn tx(&self) -> Result<Self::Tx, Error> {
        let tx = self.pool.begin().await?;
        Ok(PgSqlx::new(tx))
    }
}
