//! Security audit.

use models::{AuditOptions, AuditReport};
use reqwest::Method;
use serde::Serialize;
use tracing::instrument;

use crate::{Client, ClientError};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AuditBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    additional_options: Option<&'a AuditOptions>,
}

impl Client {
    /// `POST /audit`
    #[instrument(skip(self))]
    pub async fn generate_audit(&self, options: Option<&AuditOptions>) -> Result<AuditReport, ClientError> {
        let body = AuditBody {
            additional_options: options,
        };
        self.fetch(self.request(Method::POST, &["audit"])?.json(&body)).await
    }
}
