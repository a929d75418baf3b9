//! Tag operations, including the tags attached to a workflow.

use models::{Payload, Tag, TagId, TagList};
use reqwest::Method;
use tracing::instrument;

use crate::{Client, ClientError, PageQuery};

impl Client {
    /// `POST /tags`
    #[instrument(skip(self, tag), fields(name = %tag.name))]
    pub async fn create_tag(&self, tag: &Tag) -> Result<Tag, ClientError> {
        let body = tag.to_payload()?;
        self.fetch(self.request(Method::POST, &["tags"])?.json(&body)).await
    }

    /// `GET /tags`
    #[instrument(skip(self))]
    pub async fn list_tags(&self, query: &PageQuery) -> Result<TagList, ClientError> {
        self.fetch(self.request(Method::GET, &["tags"])?.query(query)).await
    }

    /// `GET /tags/{id}`
    #[instrument(skip(self))]
    pub async fn get_tag(&self, id: &str) -> Result<Tag, ClientError> {
        self.fetch(self.request(Method::GET, &["tags", id])?).await
    }

    /// `PUT /tags/{id}`
    #[instrument(skip(self, tag))]
    pub async fn update_tag(&self, id: &str, tag: &Tag) -> Result<Tag, ClientError> {
        let body = tag.to_payload()?;
        self.fetch(self.request(Method::PUT, &["tags", id])?.json(&body)).await
    }

    /// `DELETE /tags/{id}`; returns the deleted tag.
    #[instrument(skip(self))]
    pub async fn delete_tag(&self, id: &str) -> Result<Tag, ClientError> {
        self.fetch(self.request(Method::DELETE, &["tags", id])?).await
    }

    /// `GET /workflows/{id}/tags`
    #[instrument(skip(self))]
    pub async fn get_workflow_tags(&self, workflow_id: &str) -> Result<Vec<Tag>, ClientError> {
        self.fetch(self.request(Method::GET, &["workflows", workflow_id, "tags"])?)
            .await
    }

    /// `PUT /workflows/{id}/tags`; replaces the whole set and returns it.
    #[instrument(skip(self, tag_ids))]
    pub async fn update_workflow_tags<S: AsRef<str>>(
        &self,
        workflow_id: &str,
        tag_ids: &[S],
    ) -> Result<Vec<Tag>, ClientError> {
        let body: Vec<TagId> = tag_ids
            .iter()
            .map(|id| TagId { id: id.as_ref().to_string() })
            .collect();
        let request = self
            .request(Method::PUT, &["workflows", workflow_id, "tags"])?
            .json(&body);
        self.fetch(request).await
    }
}
