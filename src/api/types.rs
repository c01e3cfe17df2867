use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Success,
    Failure,
    Pending,
    Progress,
    Unknown,
}

impl TaskState {
    pub fn from_label(label: &str) -> Self {
        match label {
            "SUCCESS" => TaskState::Success,
            "FAILURE" => TaskState::Failure,
            "PENDING" => TaskState::Pending,
            "PROGRESS" => TaskState::Progress,
            _ => TaskState::Unknown,
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            TaskState::Success => "✅",
            TaskState::Failure => "❌",
            TaskState::Pending => "⏳",
            TaskState::Progress => "🔄",
            TaskState::Unknown => "❓",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaskStatus {
    pub task_id: String,
    /// Status text exactly as the server sent it.
    pub status: String,
    #[serde(default)]
    pub result: Option<Value>,
}

impl TaskStatus {
    pub fn state(&self) -> TaskState {
        TaskState::from_label(&self.status)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub task_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductSummary {
    pub id: u64,
    pub serial_number: String,
    pub product_name: String,
    pub image_count: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductsResponse {
    pub products: Vec<ProductSummary>,
}

/// Image as embedded in a product detail response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductImage {
    pub id: u64,
    pub input_image_url: String,
    #[serde(default)]
    pub output_image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductDetail {
    pub id: u64,
    pub serial_number: String,
    pub product_name: String,
    #[serde(default)]
    pub images: Vec<ProductImage>,
}

impl ProductDetail {
    pub fn summary(&self) -> String {
        let mut text = format!(
            "Product Details:\n\nID: {}\nSerial: {}\nName: {}\nImages: {}",
            self.id,
            self.serial_number,
            self.product_name,
            self.images.len()
        );
        for image in &self.images {
            let output = image
                .output_image_url
                .as_deref()
                .unwrap_or("Not processed yet");
            text.push_str(&format!(
                "\n  #{} {} -> {}",
                image.id, image.input_image_url, output
            ));
        }
        text
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImageRecord {
    pub id: u64,
    #[serde(default)]
    pub product_id: Option<u64>,
    pub product_name: String,
    pub serial_number: String,
    pub input_image_url: String,
    #[serde(default)]
    pub output_image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImagesResponse {
    pub images: Vec<ImageRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductDraft {
    pub serial_number: String,
    pub product_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}
