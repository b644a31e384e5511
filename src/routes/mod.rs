use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::playlist::{ConvertedPlaylist, Track};

pub mod convert;
pub mod frontend;

#[derive(OpenApi)]
#[openapi(
    paths(frontend::index, frontend::health_check, convert::convert_playlist),
    components(schemas(ConvertedPlaylist, Track)),
    tags((name = "playlist", description = "YouTube playlist to player JSON conversion"))
)]
pub struct ApiDoc;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::route().to(frontend::index))
        .route("/health", web::get().to(frontend::health_check))
        .route("/convert", web::route().to(convert::convert_playlist))
        .service(
            SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
        );
}
