use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub email: String,

    #[serde(default)]
    pub username: Option<String>,

    // E.164, destination for SMS alerts
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// The authenticated user, injected into request extensions by `auth::inject_current_user`.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUser {
    pub id: ObjectId,
    pub email: String,
    pub username: String,
    pub phone_number: Option<String>,
}

impl From<User> for CurrentUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username.unwrap_or_else(|| u.email.clone()),
            email: u.email,
            phone_number: u.phone_number.filter(|p| !p.trim().is_empty()),
        }
    }
}
