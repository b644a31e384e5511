use actix_web::{http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("YouTube APIエラー: {0}")]
    Upstream(String),
    #[error("内部エラー: {0}")]
    Internal(String),
    #[error("ページが見つかりません")]
    NotFound,
}

impl ConvertError {
    pub fn missing_url() -> Self {
        ConvertError::InvalidInput("URLパラメータが指定されていません".to_string())
    }

    pub fn invalid_playlist_url() -> Self {
        ConvertError::InvalidInput("無効なプレイリストURLです".to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ConvertError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ConvertError::NotFound => StatusCode::NOT_FOUND,
            ConvertError::Upstream(_) | ConvertError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn to_response(&self) -> HttpResponse {
        error_json(self.status_code(), self)
    }
}

pub fn error_json(status: StatusCode, message: impl ToString) -> HttpResponse {
    HttpResponse::build(status)
        .content_type("application/json; charset=UTF-8")
        .json(json!({ "error": message.to_string() }))
}
