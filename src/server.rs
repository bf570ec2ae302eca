//! HTTP front end: `POST /` runs the edit handler, `OPTIONS /` answers CORS
//! preflight, `GET /health` reports liveness.

use crate::{
    config::Config,
    handler::EditHandler,
    models::{cors_headers, HandlerResponse, RequestEnvelope},
};
use actix_web::{
    http::StatusCode, web, App, HttpResponse, HttpResponseBuilder, HttpServer,
};

fn into_http(response: HandlerResponse) -> HttpResponse {
    let status =
        StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut builder = HttpResponseBuilder::new(status);

    for (name, value) in &response.headers {
        builder.insert_header((name.as_str(), value.as_str()));
    }

    if response.body.is_empty() {
        builder.finish()
    } else {
        builder.content_type("application/json").body(response.body)
    }
}

async fn edit_image(handler: web::Data<EditHandler>, body: web::Bytes) -> HttpResponse {
    let response = match RequestEnvelope::from_raw_body(&body) {
        Ok(envelope) => handler.handle(envelope).await,
        Err(e) => {
            log::warn!("Rejected request body: {}", e);
            HandlerResponse::client_error(&e)
        }
    };
    into_http(response)
}

async fn preflight() -> HttpResponse {
    into_http(HandlerResponse::preflight())
}

async fn health() -> HttpResponse {
    let mut builder = HttpResponse::Ok();
    for (name, value) in cors_headers() {
        builder.insert_header((name, value));
    }
    builder.json(serde_json::json!({ "status": "ok" }))
}

/// Registers the routes. `max_body_bytes` bounds the accepted request body.
pub fn configure(handler: EditHandler, max_body_bytes: usize) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::Data::new(handler))
            .app_data(web::PayloadConfig::new(max_body_bytes))
            .route("/", web::post().to(edit_image))
            .route("/", web::method(actix_web::http::Method::OPTIONS).to(preflight))
            .route("/health", web::get().to(health));
    }
}

pub async fn run(config: Config, handler: EditHandler) -> std::io::Result<()> {
    let max_body_bytes = config.max_body_bytes;

    HttpServer::new(move || App::new().configure(configure(handler.clone(), max_body_bytes)))
        .bind((config.host.as_str(), config.port))?
        .run()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bedrock::ImageModel,
        error::Result,
        models::AuditRecord,
        storage::AuditStore,
    };
    use actix_web::test;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct EchoModel;

    #[async_trait]
    impl ImageModel for EchoModel {
        async fn invoke(&self, _: &str, _: Vec<u8>, _: &str, _: &str) -> Result<Vec<u8>> {
            Ok(br#"{"images":["YWJj"]}"#.to_vec())
        }
    }

    struct NullStore;

    #[async_trait]
    impl AuditStore for NullStore {
        async fn put_record(&self, _: &AuditRecord) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "null"
        }
    }

    fn handler() -> EditHandler {
        EditHandler::new(Arc::new(EchoModel), Arc::new(NullStore))
    }

    #[actix_web::test]
    async fn test_post_edit() {
        let app = test::init_service(App::new().configure(configure(handler(), 1024 * 1024))).await;
        let req = test::TestRequest::post()
            .uri("/")
            .set_payload(
                r#"{"prompt":{"text":"t","mode":"INPAINTING"},"mask":"bQ==","base_image":"aQ=="}"#,
            )
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["images"][0], "YWJj");
        assert_eq!(body["model_used"], "titan");
    }

    #[actix_web::test]
    async fn test_empty_post_is_missing_body() {
        let app = test::init_service(App::new().configure(configure(handler(), 1024))).await;
        let req = test::TestRequest::post().uri("/").to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Missing body in request");
    }

    #[actix_web::test]
    async fn test_non_utf8_post_is_invalid_body() {
        let app = test::init_service(App::new().configure(configure(handler(), 1024))).await;
        let req = test::TestRequest::post()
            .uri("/")
            .set_payload(&b"{\"prompt\":\"\xff\"}"[..])
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid request body: "));
    }

    #[actix_web::test]
    async fn test_preflight() {
        let app = test::init_service(App::new().configure(configure(handler(), 1024))).await;
        let req = test::TestRequest::default()
            .method(actix_web::http::Method::OPTIONS)
            .uri("/")
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("access-control-allow-methods").unwrap(),
            "OPTIONS,POST,GET"
        );
    }

    #[actix_web::test]
    async fn test_health() {
        let app = test::init_service(App::new().configure(configure(handler(), 1024))).await;
        let req = test::TestRequest::get().uri("/health").to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
