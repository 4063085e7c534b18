pub mod auth;
pub mod health;
pub mod swagger;
pub mod users;

use crate::middleware::AuthMiddleware;
use crate::utils::error::AppError;
use actix_web::{web, HttpResponse};

/// Registers every route of the service.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .route("/signin", web::post().to(auth::sign_in))
        .route("/signup", web::post().to(auth::sign_up))
        .service(
            web::scope("/api/v1/users")
                .wrap(AuthMiddleware)
                .route("/me", web::get().to(users::get_me))
                .route("/me", web::patch().to(users::update_me))
                .route("/me", web::delete().to(users::delete_me)),
        );
}

pub(crate) fn error_response(error: &AppError) -> HttpResponse {
    let body = serde_json::json!({
        "success": false,
        "error": error.to_string()
    });

    match error {
        AppError::Unauthorized(_) => HttpResponse::Unauthorized().json(body),
        AppError::NotFound(_) => HttpResponse::NotFound().json(body),
        AppError::InvalidRequest(_) | AppError::UnknownKey(_) => HttpResponse::BadRequest().json(body),
        AppError::DuplicateKey(_) => HttpResponse::Conflict().json(body),
        AppError::InvalidModelType(_)
        | AppError::DuplicateModelType(_)
        | AppError::DatabaseError(_)
        | AppError::Serialization(_) => HttpResponse::InternalServerError().json(body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::database::memory::MemoryStore;
    use crate::database::MongoCollection;
    use crate::models::ModelRegistry;
    use crate::services::auth_service::tests::{test_config, test_users};
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn app_data() -> (web::Data<MongoCollection>, web::Data<AppConfig>) {
        (web::Data::new(test_users()), web::Data::new(test_config()))
    }

    #[actix_web::test]
    async fn test_health() {
        let (users, _) = app_data();
        let app = test::init_service(App::new().app_data(users).configure(configure)).await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["database"], "connected");
    }

    #[actix_web::test]
    async fn test_health_reports_unreachable_database() {
        let store = Arc::new(MemoryStore::new());
        store.set_offline();
        let users = web::Data::new(MongoCollection::new(
            "trip_planner_test",
            "users",
            store,
            Arc::new(ModelRegistry::with_defaults().unwrap()),
        ));
        let app = test::init_service(App::new().app_data(users).configure(configure)).await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "unhealthy");
        assert_eq!(body["database"], "unavailable");
    }

    #[::core::prelude::v1::test]
    fn test_duplicate_key_is_conflict() {
        let resp = error_response(&AppError::DuplicateKey("Email".to_string()));
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn test_signup_signin_and_profile() {
        let (users, config) = app_data();
        let app = test::init_service(
            App::new()
                .app_data(users.clone())
                .app_data(config.clone())
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/signup")
            .set_json(json!({
                "username": "dave",
                "email": "d@x.com",
                "password": "pa55word"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = test::TestRequest::post()
            .uri("/signin")
            .set_json(json!({ "email": "d@x.com", "password": "pa55word" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let token = body["token"].as_str().unwrap().to_string();

        let req = test::TestRequest::patch()
            .uri("/api/v1/users/me")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .set_json(json!({ "last_name": "Smith" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["username"], "dave");
        assert_eq!(body["last_name"], "Smith");

        let req = test::TestRequest::delete()
            .uri("/api/v1/users/me")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/api/v1/users/me")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_bad_password_is_unauthorized() {
        let (users, config) = app_data();
        let app = test::init_service(
            App::new()
                .app_data(users)
                .app_data(config)
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/signin")
            .set_json(json!({ "email": "nobody@x.com", "password": "x" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_profile_requires_token() {
        let (users, config) = app_data();
        let app = test::init_service(
            App::new()
                .app_data(users)
                .app_data(config)
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/v1/users/me").to_request();
        let err = test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(err.as_response_error().status_code(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/api/v1/users/me")
            .insert_header(("Authorization", "Bearer not-a-jwt"))
            .to_request();
        let err = test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(err.as_response_error().status_code(), StatusCode::UNAUTHORIZED);
    }
}
