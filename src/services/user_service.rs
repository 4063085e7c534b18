// Profile management for the authenticated user

use crate::{
    database::MongoCollection,
    models::{ModelType, User},
    services::auth_service::UserInfo,
    utils::error::AppError,
};
use mongodb::bson::{doc, oid::ObjectId, Document};
use serde::Deserialize;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

fn parse_id(user_id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(user_id)
        .map_err(|e| AppError::InvalidRequest(format!("Invalid user id: {}", e)))
}

pub async fn get_user(users: &MongoCollection, user_id: &str) -> Result<UserInfo, AppError> {
    let id = parse_id(user_id)?;
    let user = users
        .find_document(doc! { "_id": id }, User::MODEL_TYPE)
        .await?
        .into_model::<User>()?;

    Ok(UserInfo::from(&user))
}

pub async fn update_profile(
    users: &MongoCollection,
    user_id: &str,
    request: &UpdateProfileRequest,
) -> Result<UserInfo, AppError> {
    let id = parse_id(user_id)?;

    let mut changes = Document::new();
    if let Some(username) = request.username.as_deref().map(str::trim) {
        if username.is_empty() {
            return Err(AppError::InvalidRequest("Username cannot be empty".to_string()));
        }
        changes.insert("Username", username);
    }
    if let Some(first_name) = &request.first_name {
        changes.insert("FirstName", first_name.as_str());
    }
    if let Some(last_name) = &request.last_name {
        changes.insert("LastName", last_name.as_str());
    }
    if changes.is_empty() {
        return Err(AppError::InvalidRequest("Nothing to update".to_string()));
    }

    let user = users
        .update_document(doc! { "_id": id }, doc! { "$set": changes }, User::MODEL_TYPE)
        .await?
        .into_model::<User>()?;

    Ok(UserInfo::from(&user))
}

pub async fn delete_user(users: &MongoCollection, user_id: &str) -> Result<(), AppError> {
    let id = parse_id(user_id)?;
    users
        .delete_document(doc! { "_id": id }, User::MODEL_TYPE)
        .await
}
