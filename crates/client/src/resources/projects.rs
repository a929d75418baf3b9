//! Project operations.

use models::{Payload, Project, ProjectList};
use reqwest::Method;
use tracing::instrument;

use crate::{Client, ClientError, PageQuery};

impl Client {
    /// `POST /projects`
    #[instrument(skip(self, project), fields(name = %project.name))]
    pub async fn create_project(&self, project: &Project) -> Result<Project, ClientError> {
        let body = project.to_payload()?;
        self.fetch(self.request(Method::POST, &["projects"])?.json(&body)).await
    }

    /// `GET /projects`
    #[instrument(skip(self))]
    pub async fn list_projects(&self, query: &PageQuery) -> Result<ProjectList, ClientError> {
        self.fetch(self.request(Method::GET, &["projects"])?.query(query)).await
    }

    /// `PUT /projects/{id}`; no content on success.
    #[instrument(skip(self, project))]
    pub async fn update_project(&self, id: &str, project: &Project) -> Result<(), ClientError> {
        let body = project.to_payload()?;
        self.execute(self.request(Method::PUT, &["projects", id])?.json(&body)).await
    }

    /// `DELETE /projects/{id}`; no content on success.
    #[instrument(skip(self))]
    pub async fn delete_project(&self, id: &str) -> Result<(), ClientError> {
        self.execute(self.request(Method::DELETE, &["projects", id])?).await
    }
}
