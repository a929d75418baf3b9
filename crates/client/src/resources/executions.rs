//! Execution operations.

use models::{Execution, ExecutionList};
use reqwest::Method;
use tracing::instrument;

use crate::{Client, ClientError, ExecutionQuery};

impl Client {
    /// `GET /executions`
    #[instrument(skip(self))]
    pub async fn list_executions(&self, query: &ExecutionQuery) -> Result<ExecutionList, ClientError> {
        let request = self.request(Method::GET, &["executions"])?.query(query);
        self.fetch(request).await
    }

    /// `GET /executions/{id}`
    #[instrument(skip(self))]
    pub async fn get_execution(&self, id: &str, include_data: Option<bool>) -> Result<Execution, ClientError> {
        let mut request = self.request(Method::GET, &["executions", id])?;
        if let Some(include) = include_data {
            request = request.query(&[("includeData", include)]);
        }
        self.fetch(request).await
    }

    /// `DELETE /executions/{id}`; returns the deleted execution.
    #[instrument(skip(self))]
    pub async fn delete_execution(&self, id: &str) -> Result<Execution, ClientError> {
        self.fetch(self.request(Method::DELETE, &["executions", id])?).await
    }
}
