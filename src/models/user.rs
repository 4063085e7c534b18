use super::model::{Model, ModelType};
use crate::utils::error::AppError;
use mongodb::bson::{oid::ObjectId, Bson, DateTime, Document};
use serde::{Deserialize, Serialize};

/// Fields written on insert, in document order.
const USER_KEYS: &[&str] = &[
    "ProfileID",
    "Username",
    "FirstName",
    "LastName",
    "PassHash",
    "Email",
    "TripIDs",
    "FriendIDs",
    "InvoiceIDs",
    "LastLogin",
];

/// Documento da collection "users"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", default)]
    pub id: Option<ObjectId>,
    #[serde(rename = "ProfileID", default)]
    pub profile_id: Option<ObjectId>,
    #[serde(rename = "Username", default)]
    pub username: String,
    #[serde(rename = "FirstName", default)]
    pub first_name: String,
    #[serde(rename = "LastName", default)]
    pub last_name: String,
    /// Plaintext password from a request; never persisted.
    #[serde(skip)]
    pub password: String,
    #[serde(rename = "PassHash", default)]
    pub pass_hash: String,
    #[serde(rename = "Email", default)]
    pub email: String,
    #[serde(rename = "TripIDs", default)]
    pub trip_ids: Vec<ObjectId>,
    #[serde(rename = "FriendIDs", default)]
    pub friend_ids: Vec<ObjectId>,
    #[serde(rename = "InvoiceIDs", default)]
    pub invoice_ids: Vec<ObjectId>,
    #[serde(rename = "LastLogin", default)]
    pub last_login: Option<DateTime>,
}

fn id_list(ids: &[ObjectId]) -> Bson {
    Bson::Array(ids.iter().copied().map(Bson::ObjectId).collect())
}

impl Model for User {
    fn keys(&self) -> &'static [&'static str] {
        USER_KEYS
    }

    fn value(&self, key: &str) -> Result<Bson, AppError> {
        let value = match key {
            "ProfileID" => self.profile_id.map(Bson::ObjectId).unwrap_or(Bson::Null),
            "Username" => Bson::String(self.username.clone()),
            "FirstName" => Bson::String(self.first_name.clone()),
            "LastName" => Bson::String(self.last_name.clone()),
            "PassHash" => Bson::String(self.pass_hash.clone()),
            "Email" => Bson::String(self.email.clone()),
            "TripIDs" => id_list(&self.trip_ids),
            "FriendIDs" => id_list(&self.friend_ids),
            "InvoiceIDs" => id_list(&self.invoice_ids),
            "LastLogin" => self.last_login.map(Bson::DateTime).unwrap_or(Bson::Null),
            other => return Err(AppError::UnknownKey(other.to_string())),
        };
        Ok(value)
    }

    fn populate(&mut self, document: Document) -> Result<(), AppError> {
        *self = mongodb::bson::from_document(document)?;
        Ok(())
    }

    fn empty(&self) -> Box<dyn Model> {
        Box::new(User::default())
    }
}

impl ModelType for User {
    const MODEL_TYPE: &'static str = "User";
}
