//! Variable operations.

use models::{Payload, Variable, VariableList};
use reqwest::Method;
use tracing::instrument;

use crate::{Client, ClientError, PageQuery};

impl Client {
    /// `POST /variables`
    #[instrument(skip(self, variable), fields(key = %variable.key))]
    pub async fn create_variable(&self, variable: &Variable) -> Result<Variable, ClientError> {
        let body = variable.to_payload()?;
        self.fetch(self.request(Method::POST, &["variables"])?.json(&body)).await
    }

    /// `GET /variables`
    #[instrument(skip(self))]
    pub async fn list_variables(&self, query: &PageQuery) -> Result<VariableList, ClientError> {
        self.fetch(self.request(Method::GET, &["variables"])?.query(query)).await
    }

    /// `DELETE /variables/{id}`; the platform answers with no content.
    #[instrument(skip(self))]
    pub async fn delete_variable(&self, id: &str) -> Result<(), ClientError> {
        self.execute(self.request(Method::DELETE, &["variables", id])?).await
    }
}
