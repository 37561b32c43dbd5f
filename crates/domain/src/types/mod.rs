//! Domain types and models

pub mod auth;
pub mod model;
pub mod task;

pub use auth::{CredentialInput, FederatedCredentials, TokenGrant, Tokens};
pub use model::{
    ConsolidatedModelResponse, DetailedValue, Item, ItemValue, Model, ModelFinancials,
    ModelFundPerformance, PerformanceTable, ScalarValue,
};
pub use task::{
    FileType, ListTasksResponse, SubmitTaskProperties, SubmitTaskRequest, SubmitTaskResponse,
    Task, TaskStatus,
};
