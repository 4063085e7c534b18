use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Itinerary Service API",
        version = "0.1.0",
        description = "Account endpoints for the trip planner.\n\n**Authentication:** `/api/v1/users` endpoints require a JWT Bearer token obtained from `/signin` or `/signup`."
    ),
    paths(
        crate::api::auth::sign_in,
        crate::api::auth::sign_up,
        crate::api::users::get_me,
        crate::api::users::update_me,
        crate::api::users::delete_me,
        crate::api::health::health_check,
    ),
    components(
        schemas(
            crate::services::auth_service::SignInRequest,
            crate::services::auth_service::SignUpRequest,
            crate::services::auth_service::AuthResponse,
            crate::services::auth_service::UserInfo,
            crate::services::user_service::UpdateProfileRequest,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Email/password sign-up and sign-in."),
        (name = "Users", description = "Profile of the authenticated user."),
        (name = "Health", description = "Service health check."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Enter your JWT token"))
                        .build(),
                ),
            );
        }
    }
}
