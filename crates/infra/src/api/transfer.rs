//! File transfers through pre-signed storage URLs
//!
//! Uploads declare an MD5 checksum to the API and repeat it on the storage
//! PUT; downloads are checked against the storage integrity tag before the
//! content is parsed. Neither request goes through the session transport.

use reqwest::{Method, Response};
use scribe_mi_core::{decode_model, model_location, upload_checksum, verify_download};
use scribe_mi_domain::constants::{CHECKSUM_HEADER, INTEGRITY_TAG_HEADER, TASKS_PATH};
use scribe_mi_domain::{
    MiError, Model, Result, SubmitTaskProperties, SubmitTaskRequest, SubmitTaskResponse, Task,
};
use tracing::{debug, info, instrument};

use super::client::{MiClient, RequestOptions};
use crate::errors::InfraError;

impl MiClient {
    /// Submit a file for processing, returning its job id
    ///
    /// # Errors
    /// - failures of the create-task call, as for [`MiClient::call_endpoint`]
    /// - `UploadFailed` when storage rejects the file
    #[instrument(skip(self, file, properties), fields(bytes = file.len(), filetype = ?properties.filetype))]
    pub async fn submit_task(&self, file: &[u8], properties: SubmitTaskProperties) -> Result<String> {
        let checksum = upload_checksum(file);
        let request = SubmitTaskRequest { properties, md5checksum: checksum.clone() };

        let SubmitTaskResponse { jobid, url } =
            self.call_endpoint(TASKS_PATH, RequestOptions::post_json(&request)?).await?;
        debug!(%jobid, "Task created, uploading file");

        let upload = self
            .http
            .request(Method::PUT, &url)
            .header(CHECKSUM_HEADER, checksum.as_str())
            .body(file.to_vec());
        let response = self.http.send(upload).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MiError::UploadFailed {
                status: status.as_u16(),
                reason: reason_phrase(&response),
            });
        }

        info!(%jobid, "File uploaded");
        Ok(jobid)
    }

    /// Download and verify the extracted model of a finished task
    ///
    /// # Errors
    /// - `ModelNotReady` if the task has no model URL
    /// - `DownloadFailed` when storage answers with a non-success status
    /// - `Integrity` when the content does not match the integrity tag
    /// - `ModelShapeMismatch` when verified content is not a model
    #[instrument(skip(self, task), fields(jobid = %task.jobid))]
    pub async fn fetch_model(&self, task: &Task) -> Result<Model> {
        let url = model_location(task)?;

        let response = self.http.send(self.http.request(Method::GET, url)).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MiError::DownloadFailed {
                status: status.as_u16(),
                reason: reason_phrase(&response),
            });
        }

        let tag = response.headers().get(INTEGRITY_TAG_HEADER).and_then(|value| value.to_str().ok()).map(str::to_owned);
        let content = response.bytes().await.map_err(InfraError::from)?;

        verify_download(&content, tag.as_deref())?;
        decode_model(&content)
    }
}

fn reason_phrase(response: &Response) -> String {
    response.status().canonical_reason().unwrap_or("Unknown Status").to_string()
}
