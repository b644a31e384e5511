//! Static pages: the conversion form, the health probe and the JSON 404.

use actix_web::{HttpRequest, HttpResponse, Responder};

use crate::error::ConvertError;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="ja">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>YouTubeプレイリスト変換ツール</title>
    <style>
        body { font-family: Arial, sans-serif; max-width: 600px; margin: 2rem auto; padding: 0 1rem; }
        input[type="text"], select { width: 100%; padding: 0.5rem; margin: 0.5rem 0; box-sizing: border-box; }
        label { display: block; margin: 0.5rem 0; }
        button { background: #007bff; color: white; border: none; padding: 0.5rem 1rem; cursor: pointer; }
        .loading { display: none; color: #666; margin-top: 1rem; }
    </style>
</head>
<body>
    <h1>YouTubeプレイリスト変換ツール</h1>
    <input type="text" id="playlistUrl" placeholder="YouTubeプレイリストのURLを貼り付けてください">
    <label><input type="checkbox" id="ascending"> 逆順(古い順)で出力する</label>
    <label>モード
        <select id="mode">
            <option value="0">0: 動画</option>
            <option value="1">1: ライブ</option>
        </select>
    </label>
    <button onclick="convert()">JSONを生成</button>
    <div id="loading" class="loading">処理中...</div>

    <script>
        async function convert() {
            const url = document.getElementById('playlistUrl').value;
            const ascending = document.getElementById('ascending').checked;
            const mode = document.getElementById('mode').value;
            const loading = document.getElementById('loading');

            try {
                loading.style.display = 'block';
                const params = new URLSearchParams({ url, ascending: String(ascending), mode });
                const response = await fetch('/convert?' + params.toString());

                if (!response.ok) {
                    const error = await response.json();
                    throw new Error(error.error);
                }

                const blob = await response.blob();
                const link = document.createElement('a');
                link.href = URL.createObjectURL(blob);
                link.download = 'playlist.json';
                link.click();
            } catch (error) {
                alert('エラーが発生しました: ' + error.message);
            } finally {
                loading.style.display = 'none';
            }
        }
    </script>
</body>
</html>
"#;

#[utoipa::path(
    get,
    path = "/",
    tag = "playlist",
    responses(
        (status = 200, description = "Conversion form", content_type = "text/html")
    )
)]
pub async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=UTF-8")
        .body(INDEX_HTML)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = String)
    )
)]
pub async fn health_check() -> impl Responder {
    log::debug!("Health check endpoint called");
    HttpResponse::Ok().json("YouTube playlist export is running!")
}

pub async fn not_found(req: HttpRequest) -> HttpResponse {
    log::debug!("No route for {} {}", req.method(), req.path());
    ConvertError::NotFound.to_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, web, App};

    #[actix_web::test]
    async fn index_serves_form() {
        let app = test::init_service(App::new().route("/", web::get().to(index))).await;
        let req = test::TestRequest::get().uri("/").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let content_type = resp.headers().get("content-type").unwrap().to_str().unwrap();
        assert!(content_type.starts_with("text/html"));
        let body = test::read_body(resp).await;
        let html = std::str::from_utf8(&body).unwrap();
        assert!(html.contains("/convert?"));
        assert!(html.contains("playlist.json"));
    }

    #[actix_web::test]
    async fn unknown_path_is_json_404() {
        let app = test::init_service(
            App::new()
                .route("/", web::get().to(index))
                .default_service(web::route().to(not_found)),
        )
        .await;
        let req = test::TestRequest::get().uri("/nowhere").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "ページが見つかりません");
    }
}
