use crate::serde::Deserialize;

/// Body of a join request decision. A missing status deserializes as empty
/// and is rejected by validation, not by parsing.
#[derive(Debug, Deserialize)]
pub struct ProcessJoinRequest {
    #[serde(default)]
    pub status: String,
}
