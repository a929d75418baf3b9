//! User operations. Every call here needs an owner or admin key.

use models::{CreatedUser, GlobalRole, NewUser, User, UserList};
use reqwest::Method;
use serde::Serialize;
use tracing::instrument;

use crate::{Client, ClientError, UserQuery};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RoleChange {
    new_role_name: GlobalRole,
}

impl Client {
    /// `GET /users`
    #[instrument(skip(self))]
    pub async fn list_users(&self, query: &UserQuery) -> Result<UserList, ClientError> {
        self.fetch(self.request(Method::GET, &["users"])?.query(query)).await
    }

    /// `POST /users`; invites in bulk and reports per-user outcomes.
    #[instrument(skip(self, users), fields(count = users.len()))]
    pub async fn create_users(&self, users: &[NewUser]) -> Result<Vec<CreatedUser>, ClientError> {
        self.fetch(self.request(Method::POST, &["users"])?.json(users)).await
    }

    /// `GET /users/{idOrEmail}`
    #[instrument(skip(self))]
    pub async fn get_user(&self, id_or_email: &str, include_role: Option<bool>) -> Result<User, ClientError> {
        let mut request = self.request(Method::GET, &["users", id_or_email])?;
        if let Some(include) = include_role {
            request = request.query(&[("includeRole", include)]);
        }
        self.fetch(request).await
    }

    /// `DELETE /users/{idOrEmail}`
    #[instrument(skip(self))]
    pub async fn delete_user(&self, id_or_email: &str) -> Result<(), ClientError> {
        self.execute(self.request(Method::DELETE, &["users", id_or_email])?).await
    }

    /// `PATCH /users/{idOrEmail}/role`
    #[instrument(skip(self))]
    pub async fn change_user_role(&self, id_or_email: &str, role: GlobalRole) -> Result<(), ClientError> {
        let body = RoleChange { new_role_name: role };
        let request = self
            .request(Method::PATCH, &["users", id_or_email, "role"])?
            .json(&body);
        self.execute(request).await
    }
}
