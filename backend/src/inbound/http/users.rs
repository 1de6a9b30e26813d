//! Users API handlers.
//!
//! ```text
//! GET /v1/users/
//! GET /v1/users/{id}
//! ```

use actix_web::{get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::User;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::BearerAuth;
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::state::HttpState;

/// User profile as returned to clients. There is no password field.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct UserResponse {
    #[serde(rename = "_id")]
    #[schema(example = "65b2f0c1a4e5d6f7a8b9c0d1")]
    pub id: String,
    #[schema(example = "student1@effortee.com")]
    pub email: String,
    #[schema(example = "Alice Student")]
    pub name: String,
    #[schema(example = "student")]
    pub role: String,
    #[schema(example = "2025-01-15")]
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id().to_string(),
            email: user.email().as_ref().to_owned(),
            name: user.name().as_ref().to_owned(),
            role: user.role().as_str().to_owned(),
            created_at: user.created_at().to_string(),
        }
    }
}

/// `{"success": true, "count": n, "users": [...]}`
#[derive(Debug, Serialize, ToSchema)]
pub struct UserListEnvelope {
    pub success: bool,
    pub count: usize,
    pub users: Vec<UserResponse>,
}

/// `{"success": true, "user": ...}`
#[derive(Debug, Serialize, ToSchema)]
pub struct UserEnvelope {
    pub success: bool,
    pub user: UserResponse,
}

/// List every user.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use effortee::inbound::http::users::list_users;
///
/// let app = App::new().service(web::scope("/v1/users").service(list_users));
/// ```
#[utoipa::path(
    get,
    path = "/v1/users/",
    responses(
        (status = 200, description = "Users", body = UserListEnvelope),
        (status = 403, description = "Missing or invalid bearer token", body = ErrorEnvelope),
        (status = 500, description = "Persistence failure", body = ErrorEnvelope),
        (status = 503, description = "Store unavailable", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("")]
pub async fn list_users(
    _auth: BearerAuth,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<UserListEnvelope>> {
    let users: Vec<UserResponse> = state
        .users
        .list_users()
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();
    Ok(web::Json(UserListEnvelope {
        success: true,
        count: users.len(),
        users,
    }))
}

/// Fetch one user by storage identity.
#[utoipa::path(
    get,
    path = "/v1/users/{id}",
    params(("id" = String, Path, description = "24-character hex id", example = "65b2f0c1a4e5d6f7a8b9c0d1")),
    responses(
        (status = 200, description = "User", body = UserEnvelope),
        (status = 400, description = "Malformed id", body = ErrorEnvelope),
        (status = 403, description = "Missing or invalid bearer token", body = ErrorEnvelope),
        (status = 404, description = "User not found", body = ErrorEnvelope),
        (status = 500, description = "Persistence failure", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/{id}")]
pub async fn get_user(
    _auth: BearerAuth,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserEnvelope>> {
    let user = state.users.get_user(&path.into_inner()).await?;
    Ok(web::Json(UserEnvelope {
        success: true,
        user: user.into(),
    }))
}
