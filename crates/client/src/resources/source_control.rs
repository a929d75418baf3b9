//! Source-control pull.

use models::{PullRequest, PullResult};
use reqwest::Method;
use tracing::instrument;

use crate::{Client, ClientError};

impl Client {
    /// `POST /source-control/pull`; requires a configured remote repository.
    #[instrument(skip(self, request))]
    pub async fn pull(&self, request: &PullRequest) -> Result<PullResult, ClientError> {
        self.fetch(self.request(Method::POST, &["source-control", "pull"])?.json(request))
            .await
    }
}
