use crate::api::{
    ApiClient, ApiError, HealthStatus, ImageRecord, MessageResponse, ProductDetail, ProductDraft,
    ProductSummary, Route, TaskStatus, UploadResponse,
};
use eframe::egui;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use tokio::runtime::Runtime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailPurpose {
    View,
    Edit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    UploadCsv { path: PathBuf },
    CheckStatus { task_id: String },
    LoadProducts { generation: u64 },
    FetchProduct { id: u64, purpose: DetailPurpose },
    SaveProduct { id: Option<u64>, draft: ProductDraft },
    DeleteProduct { id: u64 },
    LoadImages { generation: u64 },
    CheckHealth,
}

impl Request {
    pub fn route(&self) -> Route {
        match self {
            Request::UploadCsv { .. } => Route::upload(),
            Request::CheckStatus { task_id } => Route::task_status(task_id),
            Request::LoadProducts { .. } => Route::products(),
            Request::FetchProduct { id, .. } => Route::product(*id),
            Request::SaveProduct { id, .. } => Route::save_product(*id),
            Request::DeleteProduct { id } => Route::delete_product(*id),
            Request::LoadImages { .. } => Route::images(),
            Request::CheckHealth => Route::health(),
        }
    }
}

#[derive(Debug)]
pub enum Outcome {
    Uploaded(Result<UploadResponse, ApiError>),
    TaskStatus(Result<TaskStatus, ApiError>),
    Products {
        generation: u64,
        result: Result<Vec<ProductSummary>, ApiError>,
    },
    ProductDetail {
        purpose: DetailPurpose,
        result: Result<ProductDetail, ApiError>,
    },
    ProductSaved(Result<MessageResponse, ApiError>),
    ProductDeleted {
        id: u64,
        result: Result<MessageResponse, ApiError>,
    },
    Images {
        generation: u64,
        result: Result<Vec<ImageRecord>, ApiError>,
    },
    Health(Result<HealthStatus, ApiError>),
}

/// Sends requests off the UI thread and hands back their outcomes.
pub trait Dispatch {
    fn dispatch(&mut self, request: Request);

    /// Outcomes completed since the last call, in completion order.
    fn drain(&mut self) -> Vec<Outcome>;
}

pub async fn execute(client: &ApiClient, request: Request) -> Outcome {
    match request {
        Request::UploadCsv { path } => Outcome::Uploaded(client.upload_csv(&path).await),
        Request::CheckStatus { task_id } => {
            Outcome::TaskStatus(client.task_status(&task_id).await)
        }
        Request::LoadProducts { generation } => Outcome::Products {
            generation,
            result: client.list_products().await,
        },
        Request::FetchProduct { id, purpose } => Outcome::ProductDetail {
            purpose,
            result: client.get_product(id).await,
        },
        Request::SaveProduct { id, draft } => {
            Outcome::ProductSaved(client.save_product(id, &draft).await)
        }
        Request::DeleteProduct { id } => Outcome::ProductDeleted {
            id,
            result: client.delete_product(id).await,
        },
        Request::LoadImages { generation } => Outcome::Images {
            generation,
            result: client.list_images().await,
        },
        Request::CheckHealth => Outcome::Health(client.health().await),
    }
}

pub struct Worker {
    client: Arc<ApiClient>,
    runtime: Runtime,
    sender: Sender<Outcome>,
    receiver: Receiver<Outcome>,
    repaint: Option<egui::Context>,
}

impl Worker {
    pub fn new(client: ApiClient, runtime: Runtime) -> Self {
        let (sender, receiver) = channel();
        Self {
            client: Arc::new(client),
            runtime,
            sender,
            receiver,
            repaint: None,
        }
    }

    /// Wakes the UI whenever a request completes.
    pub fn with_repaint(mut self, ctx: egui::Context) -> Self {
        self.repaint = Some(ctx);
        self
    }
}

impl Dispatch for Worker {
    fn dispatch(&mut self, request: Request) {
        let route = request.route();
        log::info!("{} ({})", route, self.client.url_for(&route));

        let client = Arc::clone(&self.client);
        let sender = self.sender.clone();
        let repaint = self.repaint.clone();

        self.runtime.spawn(async move {
            let outcome = execute(&client, request).await;
            if sender.send(outcome).is_err() {
                log::debug!("Dashboard closed before {} completed", route);
            }
            if let Some(ctx) = repaint {
                ctx.request_repaint();
            }
        });
    }

    fn drain(&mut self) -> Vec<Outcome> {
        self.receiver.try_iter().collect()
    }
}
