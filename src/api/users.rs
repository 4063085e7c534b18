use crate::api::error_response;
use crate::database::MongoCollection;
use crate::services::auth_service::{Claims, UserInfo};
use crate::services::user_service::{self, UpdateProfileRequest};
use actix_web::{web, HttpResponse};

#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Current user", body = UserInfo),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "User no longer exists")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_me(
    users: web::Data<MongoCollection>,
    claims: web::ReqData<Claims>,
) -> HttpResponse {
    match user_service::get_user(&users, &claims.sub).await {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(e) => {
            log::warn!("❌ GET /users/me failed for {}: {}", claims.sub, e);
            error_response(&e)
        }
    }
}

#[utoipa::path(
    patch,
    path = "/api/v1/users/me",
    tag = "Users",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated user", body = UserInfo),
        (status = 400, description = "Nothing to update"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_me(
    users: web::Data<MongoCollection>,
    claims: web::ReqData<Claims>,
    request: web::Json<UpdateProfileRequest>,
) -> HttpResponse {
    log::info!("🔧 PATCH /users/me - user: {}", claims.sub);

    match user_service::update_profile(&users, &claims.sub, &request).await {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(e) => {
            log::warn!("❌ Profile update failed for {}: {}", claims.sub, e);
            error_response(&e)
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Account deleted"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_me(
    users: web::Data<MongoCollection>,
    claims: web::ReqData<Claims>,
) -> HttpResponse {
    log::info!("🗑️  DELETE /users/me - user: {}", claims.sub);

    match user_service::delete_user(&users, &claims.sub).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "success": true })),
        Err(e) => error_response(&e),
    }
}
