//! Workflow operations.

use models::{validate_connections, Payload, TransferRequest, Workflow, WorkflowList};
use reqwest::Method;
use tracing::instrument;

use crate::{Client, ClientError, WorkflowQuery};

impl Client {
    /// `GET /workflows`
    #[instrument(skip(self))]
    pub async fn list_workflows(&self, query: &WorkflowQuery) -> Result<WorkflowList, ClientError> {
        let request = self.request(Method::GET, &["workflows"])?.query(query);
        self.fetch(request).await
    }

    /// `POST /workflows`
    ///
    /// Connections are checked locally first; a workflow whose connections
    /// reference unknown nodes is never sent.
    #[instrument(skip(self, workflow), fields(name = %workflow.name))]
    pub async fn create_workflow(&self, workflow: &Workflow) -> Result<Workflow, ClientError> {
        validate_connections(workflow)?;
        let body = workflow.to_payload()?;
        let request = self.request(Method::POST, &["workflows"])?.json(&body);
        self.fetch(request).await
    }

    /// `GET /workflows/{id}`
    #[instrument(skip(self))]
    pub async fn get_workflow(&self, id: &str) -> Result<Workflow, ClientError> {
        self.fetch(self.request(Method::GET, &["workflows", id])?).await
    }

    /// `PUT /workflows/{id}`
    #[instrument(skip(self, workflow))]
    pub async fn update_workflow(&self, id: &str, workflow: &Workflow) -> Result<Workflow, ClientError> {
        validate_connections(workflow)?;
        let body = workflow.to_payload()?;
        let request = self.request(Method::PUT, &["workflows", id])?.json(&body);
        self.fetch(request).await
    }

    /// `DELETE /workflows/{id}`; returns the deleted workflow.
    #[instrument(skip(self))]
    pub async fn delete_workflow(&self, id: &str) -> Result<Workflow, ClientError> {
        self.fetch(self.request(Method::DELETE, &["workflows", id])?).await
    }

    /// `POST /workflows/{id}/activate`
    #[instrument(skip(self))]
    pub async fn activate_workflow(&self, id: &str) -> Result<Workflow, ClientError> {
        self.fetch(self.request(Method::POST, &["workflows", id, "activate"])?).await
    }

    /// `POST /workflows/{id}/deactivate`
    #[instrument(skip(self))]
    pub async fn deactivate_workflow(&self, id: &str) -> Result<Workflow, ClientError> {
        self.fetch(self.request(Method::POST, &["workflows", id, "deactivate"])?).await
    }

    /// `PUT /workflows/{id}/transfer`
    #[instrument(skip(self))]
    pub async fn transfer_workflow(&self, id: &str, destination_project_id: &str) -> Result<(), ClientError> {
        let body = TransferRequest {
            destination_project_id: destination_project_id.to_string(),
        };
        let request = self.request(Method::PUT, &["workflows", id, "transfer"])?.json(&body);
        self.execute(request).await
    }
}
