use super::error::ApiError;
use super::types::{
    ErrorBody, HealthStatus, ImageRecord, ImagesResponse, MessageResponse, ProductDetail,
    ProductDraft, ProductSummary, ProductsResponse, TaskStatus, UploadResponse,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// An HTTP method plus unescaped path segments, relative to the server base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub method: Method,
    pub segments: Vec<String>,
}

impl Route {
    fn new(method: Method, segments: &[&str]) -> Self {
        Self {
            method,
            segments: segments.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn upload() -> Self {
        Self::new(Method::POST, &["upload"])
    }

    pub fn task_status(task_id: &str) -> Self {
        Self::new(Method::GET, &["status", task_id])
    }

    pub fn products() -> Self {
        Self::new(Method::GET, &["api", "products"])
    }

    pub fn product(id: u64) -> Self {
        Self::new(Method::GET, &["api", "products", &id.to_string()])
    }

    /// POST to the collection when `id` is `None`, PUT to the product otherwise.
    pub fn save_product(id: Option<u64>) -> Self {
        match id {
            Some(id) => Self::new(Method::PUT, &["api", "products", &id.to_string()]),
            None => Self::new(Method::POST, &["api", "products"]),
        }
    }

    pub fn delete_product(id: u64) -> Self {
        Self::new(Method::DELETE, &["api", "products", &id.to_string()])
    }

    pub fn images() -> Self {
        Self::new(Method::GET, &["api", "products", "images"])
    }

    pub fn health() -> Self {
        Self::new(Method::GET, &["health"])
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} /{}", self.method, self.segments.join("/"))
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }

    /// Appends the route's segments to the base URL, percent-encoding each one.
    pub fn url_for(&self, route: &Route) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(&route.segments);
        }
        url
    }

    fn request(&self, route: &Route) -> RequestBuilder {
        self.http.request(route.method.clone(), self.url_for(route))
    }

    async fn execute<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        decode_body(status, &body)
    }

    pub async fn upload_csv(&self, path: &Path) -> Result<UploadResponse, ApiError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ApiError::File {
                path: path.to_path_buf(),
                source,
            })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.csv".to_string());

        let part = Part::bytes(bytes).file_name(file_name).mime_str("text/csv")?;
        let form = Form::new().part("file", part);
        Self::execute(self.request(&Route::upload()).multipart(form)).await
    }

    pub async fn task_status(&self, task_id: &str) -> Result<TaskStatus, ApiError> {
        Self::execute(self.request(&Route::task_status(task_id))).await
    }

    pub async fn list_products(&self) -> Result<Vec<ProductSummary>, ApiError> {
        let response: ProductsResponse = Self::execute(self.request(&Route::products())).await?;
        Ok(response.products)
    }

    pub async fn get_product(&self, id: u64) -> Result<ProductDetail, ApiError> {
        Self::execute(self.request(&Route::product(id))).await
    }

    pub async fn save_product(
        &self,
        id: Option<u64>,
        draft: &ProductDraft,
    ) -> Result<MessageResponse, ApiError> {
        Self::execute(self.request(&Route::save_product(id)).json(draft)).await
    }

    pub async fn delete_product(&self, id: u64) -> Result<MessageResponse, ApiError> {
        Self::execute(self.request(&Route::delete_product(id))).await
    }

    pub async fn list_images(&self) -> Result<Vec<ImageRecord>, ApiError> {
        let response: ImagesResponse = Self::execute(self.request(&Route::images())).await?;
        Ok(response.images)
    }

    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        Self::execute(self.request(&Route::health())).await
    }
}

/// Turns a raw response into `T`, or into `ApiError::Server` for non-2xx statuses.
pub(crate) fn decode_body<T: DeserializeOwned>(
    status: StatusCode,
    body: &[u8],
) -> Result<T, ApiError> {
    if !status.is_success() {
        let message = serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|body| body.error)
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| match status.canonical_reason() {
                Some(reason) => reason.to_string(),
                None => format!("HTTP {}", status.as_u16()),
            });
        return Err(ApiError::Server {
            status: status.as_u16(),
            message,
        });
    }

    Ok(serde_json::from_slice(body)?)
}
