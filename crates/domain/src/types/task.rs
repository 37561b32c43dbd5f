//! MI task types
//!
//! A task is a unit of submitted document-processing work. The remote API
//! owns it; the client only reads, submits and deletes.

use serde::{Deserialize, Serialize};

use crate::validation::{absolute_url, Validate, ValidationError};

/// File formats accepted for submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Pdf,
    Xlsx,
    Xls,
    Xlsm,
    Doc,
    Docx,
    Ppt,
    Pptx,
}

impl FileType {
    pub const ALL: [FileType; 8] = [
        Self::Pdf,
        Self::Xlsx,
        Self::Xls,
        Self::Xlsm,
        Self::Doc,
        Self::Docx,
        Self::Ppt,
        Self::Pptx,
    ];

    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Xlsx => "xlsx",
            Self::Xls => "xls",
            Self::Xlsm => "xlsm",
            Self::Doc => "doc",
            Self::Docx => "docx",
            Self::Ppt => "ppt",
            Self::Pptx => "pptx",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Xls => "application/vnd.ms-excel",
            Self::Xlsm => "application/vnd.ms-excel.sheet.macroEnabled.12",
            Self::Doc => "application/msword",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Ppt => "application/vnd.ms-powerpoint",
            Self::Pptx => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
        }
    }

    /// Look up a file type by extension (case-insensitive, leading dot allowed)
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.');
        Self::ALL.into_iter().find(|t| t.extension().eq_ignore_ascii_case(ext))
    }
}

/// Processing status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Success,
    Deleted,
    PendingUpload,
    Processing,
}

/// Task record as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Task {
    pub jobid: String,
    pub client: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_model_filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_filename: Option<String>,
    pub status: TaskStatus,
    /// Submission time (epoch based, strictly positive)
    pub submitted: i64,
    /// Pre-signed location of the extracted model, once it is ready
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_url: Option<String>,
}

impl Task {
    /// Whether a model can be fetched for this task
    pub fn has_model(&self) -> bool {
        self.model_url.is_some()
    }
}

impl Validate for Task {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.submitted <= 0 {
            return Err(ValidationError::new("submitted", "must be a positive integer"));
        }
        if let Some(url) = &self.model_url {
            absolute_url("modelUrl", url)?;
        }
        Ok(())
    }
}

/// Caller-supplied properties of a file submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitTaskProperties {
    pub filetype: FileType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub companyname: Option<String>,
}

impl SubmitTaskProperties {
    pub fn new(filetype: FileType) -> Self {
        Self { filetype, filename: None, companyname: None }
    }

    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    #[must_use]
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.companyname = Some(company.into());
        self
    }
}

/// Body of the create-task call: properties plus the upload checksum
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitTaskRequest {
    #[serde(flatten)]
    pub properties: SubmitTaskProperties,
    /// Base64 MD5 of the file bytes; the storage PUT carries the same value
    pub md5checksum: String,
}

/// Create-task response: the job id and where to PUT the file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubmitTaskResponse {
    pub jobid: String,
    pub url: String,
}

impl Validate for SubmitTaskResponse {
    fn validate(&self) -> Result<(), ValidationError> {
        absolute_url("url", &self.url)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListTasksResponse {
    pub tasks: Vec<Task>,
}

impl Validate for ListTasksResponse {
    fn validate(&self) -> Result<(), ValidationError> {
        self.tasks.validate().map_err(|e| e.within("tasks"))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample_task() -> serde_json::Value {
        json!({
            "client": "Scribe",
            "jobid": "abcdabcd",
            "status": "SUCCESS",
            "submitted": 99995,
            "modelUrl": "https://bucket.example.com/model.json"
        })
    }

    #[test]
    fn task_deserializes_camel_case() {
        let task: Task = serde_json::from_value(sample_task()).unwrap();
        assert_eq!(task.jobid, "abcdabcd");
        assert_eq!(task.status, TaskStatus::Success);
        assert!(task.has_model());
        assert!(task.validate().is_ok());
    }

    #[test]
    fn task_rejects_unknown_fields() {
        let mut value = sample_task();
        value["unexpected"] = json!(true);
        assert!(serde_json::from_value::<Task>(value).is_err());
    }

    #[test]
    fn task_statuses_use_wire_names() {
        for (wire, status) in [
            ("SUCCESS", TaskStatus::Success),
            ("DELETED", TaskStatus::Deleted),
            ("PENDING_UPLOAD", TaskStatus::PendingUpload),
            ("PROCESSING", TaskStatus::Processing),
        ] {
            let parsed: TaskStatus = serde_json::from_value(json!(wire)).unwrap();
            assert_eq!(parsed, status);
        }
        assert!(serde_json::from_value::<TaskStatus>(json!("FAILED")).is_err());
    }

    #[test]
    fn task_validation_rejects_non_positive_submission_time() {
        let mut value = sample_task();
        value["submitted"] = json!(0);
        let task: Task = serde_json::from_value(value).unwrap();
        let err = task.validate().unwrap_err();
        assert_eq!(err.field, "submitted");
    }

    #[test]
    fn task_validation_rejects_relative_model_url() {
        let mut value = sample_task();
        value["modelUrl"] = json!("mock-url");
        let task: Task = serde_json::from_value(value).unwrap();
        assert_eq!(task.validate().unwrap_err().field, "modelUrl");
    }

    #[test]
    fn submit_request_flattens_properties() {
        let request = SubmitTaskRequest {
            properties: SubmitTaskProperties::new(FileType::Pdf).with_company("Acme"),
            md5checksum: "XrY7u+Ae7tCTyyK7j1rNww==".to_string(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "filetype": "pdf",
                "companyname": "Acme",
                "md5checksum": "XrY7u+Ae7tCTyyK7j1rNww=="
            })
        );
    }

    #[test]
    fn file_types_map_to_mime_types() {
        assert_eq!(FileType::Pdf.mime_type(), "application/pdf");
        assert_eq!(FileType::from_extension(".XLSM"), Some(FileType::Xlsm));
        assert_eq!(FileType::from_extension("txt"), None);
        for file_type in FileType::ALL {
            let wire = serde_json::to_value(file_type).unwrap();
            assert_eq!(wire, json!(file_type.extension()));
        }
    }

    #[test]
    fn list_response_reports_nested_field_path() {
        let mut bad = sample_task();
        bad["submitted"] = json!(-1);
        let response: ListTasksResponse =
            serde_json::from_value(json!({ "tasks": [sample_task(), bad] })).unwrap();
        let err = response.validate().unwrap_err();
        assert_eq!(err.field, "tasks.[1].submitted");
    }
}
