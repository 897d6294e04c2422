use crate::actix_web::web::{Bytes, Data, Json, Path};
use crate::context::UserInfo;
use crate::core::models::club::Club;
use crate::core::ports::repository::Manager;
use crate::core::services::club as service;
use crate::error::Error;
use crate::request::ProcessJoinRequest;

/// `PUT /clubs/{id}/requests/{username}`: approves or rejects the join request
/// of `username`. A request without a caller is answered with 400.
pub async fn process_join_request<M>(user_info: Option<UserInfo>, path: Path<(String, String)>, body: Bytes, manager: Data<M>) -> Result<Json<Club>, Error>
where
    M: Manager + 'static,
{
    let (id, username) = path.into_inner();
    let caller = user_info.map(|u| u.username).unwrap_or_default();
    if caller.is_empty() {
        return Err(Error::BadRequest("Invalid request: caller username is required".into()));
    }
    let request: ProcessJoinRequest = serde_json::from_slice(&body).map_err(|e| {
        log::warn!("unable to unmarshal join request body for club {}: {}", id, e);
        Error::BadRequest("Invalid request: unable to unmarshal body".into())
    })?;
    match service::process_join_request(manager.get_ref(), &caller, &id, &username, &request.status).await {
        Ok(club) => {
            log::info!("{} set join request of {} to club {} to {}", caller, username, id, request.status);
            Ok(Json(club))
        }
        Err(e) => {
            log::warn!("{} failed to process join request of {} to club {}: {}", caller, username, id, e);
            Err(e)
        }
    }
}
