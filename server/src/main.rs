use crate::api::{ErrorResponse, PushRequest, PushResponse};
use actix_web::{App, HttpResponse, HttpServer, Responder, get, post, web};
use common::PlatformRegistry;
use jpush::JPushPlatformFactory;
use log::*;

mod api;

const DEFAULT_BIND: &str = "127.0.0.1:8888";

#[get("/hello")]
async fn hello() -> impl Responder {
    HttpResponse::Ok().body("Hello World!")
}

#[post("/push")]
async fn push(req: web::Json<PushRequest>, registry: web::Data<PlatformRegistry>) -> HttpResponse {
    let req = req.into_inner();
    info!("Received push request for platform: {}", req.platform);

    let Some(factory) = registry.get_factory(&req.platform) else {
        return HttpResponse::BadRequest().json(ErrorResponse::new(format!(
            "Platform '{}' not found",
            req.platform
        )));
    };

    let platform = match factory.create(req.config) {
        Ok(p) => p,
        Err(e) => {
            return HttpResponse::BadRequest()
                .json(ErrorResponse::new(format!("Failed to create platform: {e}")));
        }
    };

    match platform.send(req.message).await {
        Ok(result) => {
            info!(
                "Push accepted by {}: errcode={} msg_id={}",
                req.platform, result.errcode, result.msg_id
            );
            HttpResponse::Ok().json(PushResponse::new(result))
        }
        Err(e) => {
            warn!("Push via {} failed: {}", req.platform, e);
            HttpResponse::BadGateway().json(ErrorResponse::new(e.to_string()))
        }
    }
}

fn build_registry() -> PlatformRegistry {
    let mut registry = PlatformRegistry::new();
    registry.register(Box::new(JPushPlatformFactory));
    registry
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));

    let registry = build_registry();
    info!("Registered platforms: {:?}", registry.list_platforms());

    let registry_data = web::Data::new(registry);
    let bind = std::env::var("MULTI_PUSH_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
    info!("Listening on {bind}");

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .app_data(registry_data.clone())
            .service(hello)
            .service(push)
    })
    .bind(bind)?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};
    use serde_json::{Value, json};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn app_data() -> web::Data<PlatformRegistry> {
        web::Data::new(build_registry())
    }

    fn notification_message() -> Value {
        json!({
            "sendno": 1,
            "receiver_type": "tag",
            "receiver_value": ["vip"],
            "msg_type": "notification",
            "msg_content": "{\"n_builder_id\":0,\"n_content\":\"hello\"}",
            "platform": ["android", "ios"]
        })
    }

    #[actix_web::test]
    async fn test_hello() {
        let app = test::init_service(App::new().service(hello)).await;
        let req = test::TestRequest::get().uri("/hello").to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "Hello World!");
    }

    #[actix_web::test]
    async fn test_unknown_platform() {
        let app = test::init_service(App::new().app_data(app_data()).service(push)).await;
        let req = test::TestRequest::post()
            .uri("/push")
            .set_json(json!({"platform": "nope", "config": {}, "message": {}}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_invalid_config() {
        let app = test::init_service(App::new().app_data(app_data()).service(push)).await;
        let req = test::TestRequest::post()
            .uri("/push")
            .set_json(json!({"platform": "jpush", "config": {"host": "x"}, "message": {}}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_push_forwards_to_platform() {
        let upstream = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"errcode":0,"errmsg":"","msg_id":"abc123"}"#),
            )
            .expect(1)
            .mount(&upstream)
            .await;

        let app = test::init_service(App::new().app_data(app_data()).service(push)).await;
        let req = test::TestRequest::post()
            .uri("/push")
            .set_json(json!({
                "platform": "jpush",
                "config": {"host": upstream.uri(), "app_key": "k", "master_secret": "s"},
                "message": notification_message()
            }))
            .to_request();
        let resp: PushResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp.result.msg_id, "abc123");
        assert!(resp.result.is_success());
    }

    #[actix_web::test]
    async fn test_push_upstream_unreachable() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let app = test::init_service(App::new().app_data(app_data()).service(push)).await;
        let req = test::TestRequest::post()
            .uri("/push")
            .set_json(json!({
                "platform": "jpush",
                "config": {"host": format!("http://{addr}"), "app_key": "k", "master_secret": "s"},
                "message": notification_message()
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }
}
