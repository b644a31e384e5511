use actix_web::{http::header, web, HttpRequest, HttpResponse, Responder};
use url::form_urlencoded;

use crate::error::ConvertError;
use crate::playlist::{self, ConvertOptions, ConvertedPlaylist};

const DOWNLOAD_DISPOSITION: &str = "attachment; filename=\"playlist.json\"";

#[derive(Debug, Default)]
pub struct ConvertQuery {
    pub url: Option<String>,
    pub ascending: Option<String>,
    pub mode: Option<String>,
}

impl ConvertQuery {
    /// Decodes the raw query string. A repeated key keeps its first value.
    pub fn parse(query_string: &str) -> Self {
        let mut query = ConvertQuery::default();
        for (key, value) in form_urlencoded::parse(query_string.as_bytes()) {
            let slot = match &*key {
                "url" => &mut query.url,
                "ascending" => &mut query.ascending,
                "mode" => &mut query.mode,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        query
    }

    /// Only the literal `"true"` turns reversal on.
    fn ascending(&self) -> bool {
        self.ascending.as_deref() == Some("true")
    }

    fn mode(&self, default_mode: i64) -> i64 {
        self.mode
            .as_deref()
            .and_then(|m| m.trim().parse().ok())
            .unwrap_or(default_mode)
    }
}

async fn run_conversion(
    query: &ConvertQuery,
    state: &crate::AppState,
) -> Result<ConvertedPlaylist, ConvertError> {
    let playlist_url = query.url.as_deref().unwrap_or_default();
    let playlist_id = playlist::extract_playlist_id(playlist_url)?;
    let options = ConvertOptions {
        ascending: query.ascending(),
        mode: query.mode(state.config.playlist.default_mode),
    };
    log::info!(
        "Converting playlist {} (ascending: {}, mode: {})",
        playlist_id,
        options.ascending,
        options.mode
    );

    let items = state
        .youtube
        .fetch_all_items(&playlist_id)
        .await?;
    Ok(playlist::convert(items, options))
}

#[utoipa::path(
    get,
    path = "/convert",
    tag = "playlist",
    params(
        ("url" = String, Query, description = "YouTube playlist URL containing a list parameter"),
        ("ascending" = Option<String>, Query, description = "\"true\" reverses the order returned by YouTube"),
        ("mode" = Option<i64>, Query, description = "Mode stamped on every track (default: 0)")
    ),
    responses(
        (status = 200, description = "Playlist as a downloadable JSON file", body = ConvertedPlaylist),
        (status = 400, description = "Missing or invalid playlist URL"),
        (status = 500, description = "YouTube API or internal failure")
    )
)]
pub async fn convert_playlist(
    req: HttpRequest,
    data: web::Data<crate::AppState>,
) -> impl Responder {
    let query = ConvertQuery::parse(req.query_string());
    let converted = match run_conversion(&query, &data).await {
        Ok(converted) => converted,
        Err(err) => {
            match &err {
                ConvertError::InvalidInput(_) | ConvertError::NotFound => {
                    log::warn!("Rejected conversion request: {}", err)
                }
                ConvertError::Upstream(_) | ConvertError::Internal(_) => {
                    log::error!("Conversion failed: {}", err)
                }
            }
            return err.to_response();
        }
    };

    match serde_json::to_string_pretty(&converted) {
        Ok(body) => HttpResponse::Ok()
            .content_type("application/json; charset=UTF-8")
            .insert_header((header::CONTENT_DISPOSITION, DOWNLOAD_DISPOSITION))
            .body(body),
        Err(e) => ConvertError::Internal(e.to_string()).to_response(),
    }
}
