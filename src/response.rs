use crate::actix_web::http::StatusCode;
use crate::serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    status_code: u16,
    message: String,
}

impl ErrorBody {
    pub fn new(status: StatusCode, message: String) -> Self {
        ErrorBody {
            status_code: status.as_u16(),
            message,
        }
    }
}
