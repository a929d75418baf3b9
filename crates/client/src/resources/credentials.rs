//! Credential operations.
//!
//! The platform never returns secret `data`; created and deleted
//! credentials come back with metadata only.

use models::{Credential, CredentialList, Payload, TransferRequest};
use reqwest::Method;
use serde_json::Value;
use tracing::instrument;

use crate::{Client, ClientError, PageQuery};

impl Client {
    /// `GET /credentials`
    #[instrument(skip(self))]
    pub async fn list_credentials(&self, query: &PageQuery) -> Result<CredentialList, ClientError> {
        let request = self.request(Method::GET, &["credentials"])?.query(query);
        self.fetch(request).await
    }

    /// `POST /credentials`
    #[instrument(skip(self, credential), fields(name = %credential.name, kind = %credential.credential_type))]
    pub async fn create_credential(&self, credential: &Credential) -> Result<Credential, ClientError> {
        let body = credential.to_payload()?;
        let request = self.request(Method::POST, &["credentials"])?.json(&body);
        self.fetch(request).await
    }

    /// `DELETE /credentials/{id}`; returns the deleted credential.
    #[instrument(skip(self))]
    pub async fn delete_credential(&self, id: &str) -> Result<Credential, ClientError> {
        self.fetch(self.request(Method::DELETE, &["credentials", id])?).await
    }

    /// `GET /credentials/schema/{type}`; the JSON schema for that
    /// credential type's `data`.
    #[instrument(skip(self))]
    pub async fn get_credential_schema(&self, credential_type: &str) -> Result<Value, ClientError> {
        self.fetch(self.request(Method::GET, &["credentials", "schema", credential_type])?)
            .await
    }

    /// `PUT /credentials/{id}/transfer`
    #[instrument(skip(self))]
    pub async fn transfer_credential(&self, id: &str, destination_project_id: &str) -> Result<(), ClientError> {
        let body = TransferRequest {
            destination_project_id: destination_project_id.to_string(),
        };
        let request = self.request(Method::PUT, &["credentials", id, "transfer"])?.json(&body);
        self.execute(request).await
    }
}
