use crate::api::error_response;
use crate::config::AppConfig;
use crate::database::MongoCollection;
use crate::services::auth_service::{self, AuthResponse, SignInRequest, SignUpRequest};
use actix_web::{web, HttpResponse};

#[utoipa::path(
    post,
    path = "/signin",
    tag = "Auth",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Sign-in successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn sign_in(
    users: web::Data<MongoCollection>,
    config: web::Data<AppConfig>,
    request: web::Json<SignInRequest>,
) -> HttpResponse {
    log::info!("🔐 POST /signin - email: {}", request.email);

    match auth_service::sign_in(&users, &config, &request).await {
        Ok(response) => {
            log::info!("✅ Sign-in successful: {}", request.email);
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log::warn!("❌ Sign-in failed: {} - {}", request.email, e);
            error_response(&e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/signup",
    tag = "Auth",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid request or user already exists")
    )
)]
pub async fn sign_up(
    users: web::Data<MongoCollection>,
    config: web::Data<AppConfig>,
    request: web::Json<SignUpRequest>,
) -> HttpResponse {
    log::info!("📝 POST /signup - email: {}", request.email);

    match auth_service::sign_up(&users, &config, &request).await {
        Ok(response) => {
            log::info!("✅ Account created: {}", request.email);
            HttpResponse::Created().json(response)
        }
        Err(e) => {
            log::warn!("❌ Sign-up failed: {} - {}", request.email, e);
            error_response(&e)
        }
    }
}
