mod client;
mod error;
mod types;

pub use client::{ApiClient, Route};
pub use error::ApiError;
pub use types::{
    HealthStatus, ImageRecord, MessageResponse, ProductDetail, ProductDraft, ProductSummary,
    TaskState, TaskStatus, UploadResponse,
};
