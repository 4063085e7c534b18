use crate::{
    config::AppConfig,
    database::MongoCollection,
    models::{ModelType, User},
    utils::error::AppError,
};
use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user _id (hex)
    pub email: String,
    pub username: String,
    pub iat: usize,
    pub exp: usize,
    pub jti: String,
    pub aud: String,
    pub iss: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SignUpRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub user: UserInfo,
}

/// Public view of a stored user.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub trip_ids: Vec<String>,
    pub friend_ids: Vec<String>,
    pub invoice_ids: Vec<String>,
    pub last_login: Option<String>,
}

fn hex_ids(ids: &[ObjectId]) -> Vec<String> {
    ids.iter().map(|id| id.to_hex()).collect()
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            trip_ids: hex_ids(&user.trip_ids),
            friend_ids: hex_ids(&user.friend_ids),
            invoice_ids: hex_ids(&user.invoice_ids),
            last_login: user.last_login.map(|dt| dt.to_string()),
        }
    }
}

// Generate JWT token
pub fn generate_jwt(user: &User, config: &AppConfig) -> Result<String, AppError> {
    let sub = user
        .id
        .ok_or_else(|| AppError::InvalidRequest("user has no identifier".to_string()))?
        .to_hex();
    let now = Utc::now();
    let expires = Some(config.jwt_ttl_hours)
        .filter(|hours| *hours > 0)
        .and_then(Duration::try_hours)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or_else(|| {
            AppError::InvalidRequest(format!(
                "JWT_TTL_HOURS out of range: {}",
                config.jwt_ttl_hours
            ))
        })?;
    let iat = now.timestamp() as usize;
    let exp = expires.timestamp() as usize;

    let claims = Claims {
        sub,
        email: user.email.clone(),
        username: user.username.clone(),
        iat,
        exp,
        jti: Uuid::new_v4().to_string(),
        aud: config.jwt_audience.clone(),
        iss: config.jwt_issuer.clone(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_ref()),
    )
    .map_err(|e| AppError::InvalidRequest(format!("Failed to generate token: {}", e)))
}

// Verify JWT token
pub fn verify_token(token: &str, config: &AppConfig) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[config.jwt_audience.as_str()]);

    let mut issuers = HashSet::new();
    issuers.insert(config.jwt_issuer.clone());
    validation.iss = Some(issuers);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_ref()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
}

fn user_exists() -> AppError {
    AppError::InvalidRequest("User already exists".to_string())
}

/// Inserts `user`; a sign-up that lost the race on the unique `Email` index
/// is reported like any other duplicate.
async fn insert_new_user(users: &MongoCollection, user: &User) -> Result<User, AppError> {
    match users.insert_as(user).await {
        Ok(user) => Ok(user),
        Err(AppError::DuplicateKey(e)) => {
            log::warn!("⚠️  Concurrent sign-up for {}: {}", user.email, e);
            Err(user_exists())
        }
        Err(e) => Err(e),
    }
}

// User registration
pub async fn sign_up(
    users: &MongoCollection,
    config: &AppConfig,
    request: &SignUpRequest,
) -> Result<AuthResponse, AppError> {
    let email = request.email.trim().to_lowercase();
    if email.is_empty() || request.username.trim().is_empty() || request.password.is_empty() {
        return Err(AppError::InvalidRequest(
            "Username, email and password are required".to_string(),
        ));
    }

    match users.find_as::<User>(doc! { "Email": &email }).await {
        Ok(_) => return Err(user_exists()),
        Err(AppError::NotFound(_)) => {}
        Err(e) => return Err(e),
    }

    let pass_hash = hash(&request.password, config.bcrypt_cost)
        .map_err(|e| AppError::InvalidRequest(format!("Failed to hash password: {}", e)))?;

    let new_user = User {
        username: request.username.trim().to_string(),
        email,
        first_name: request.first_name.clone().unwrap_or_default(),
        last_name: request.last_name.clone().unwrap_or_default(),
        password: request.password.clone(),
        pass_hash,
        ..Default::default()
    };

    let user = insert_new_user(users, &new_user).await?;
    let token = generate_jwt(&user, config)?;

    Ok(AuthResponse {
        success: true,
        token,
        user: UserInfo::from(&user),
    })
}

// User login
pub async fn sign_in(
    users: &MongoCollection,
    config: &AppConfig,
    request: &SignInRequest,
) -> Result<AuthResponse, AppError> {
    let email = request.email.trim().to_lowercase();
    let invalid = || AppError::Unauthorized("Invalid credentials".to_string());

    let user = match users.find_as::<User>(doc! { "Email": &email }).await {
        Ok(user) => user,
        Err(AppError::NotFound(_)) => return Err(invalid()),
        Err(e) => return Err(e),
    };

    let valid = verify(&request.password, &user.pass_hash).unwrap_or(false);
    if !valid {
        return Err(invalid());
    }

    let id = user.id.ok_or_else(invalid)?;
    let user = users
        .update_document(
            doc! { "_id": id },
            doc! { "$set": { "LastLogin": BsonDateTime::now() } },
            User::MODEL_TYPE,
        )
        .await?
        .into_model::<User>()?;

    let token = generate_jwt(&user, config)?;

    Ok(AuthResponse {
        success: true,
        token,
        user: UserInfo::from(&user),
    })
}
