use crate::api::{
    ImageRecord, ProductDetail, ProductDraft, ProductSummary, TaskState, TaskStatus,
};
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Upload,
    Tasks,
    Products,
    Images,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Upload, Tab::Tasks, Tab::Products, Tab::Images];

    pub fn name(self) -> &'static str {
        match self {
            Tab::Upload => "upload",
            Tab::Tasks => "tasks",
            Tab::Products => "products",
            Tab::Images => "images",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Tab::Upload => "📤 Upload CSV",
            Tab::Tasks => "🔍 Check Status",
            Tab::Products => "📦 Products",
            Tab::Images => "🖼 Images",
        }
    }

    pub fn from_name(name: &str) -> Option<Tab> {
        Tab::ALL.into_iter().find(|tab| tab.name() == name)
    }

    pub fn is_active(self, active: Tab) -> bool {
        self == active
    }
}

/// Activation flag of every tab button/panel for the given active tab.
pub fn tab_flags(active: Tab) -> [(Tab, bool); 4] {
    Tab::ALL.map(|tab| (tab, tab.is_active(active)))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Modals {
    pub product_form: bool,
    /// URL shown in the image preview, if open.
    pub image_preview: Option<String>,
}

impl Modals {
    pub fn any_open(&self) -> bool {
        self.product_form || self.image_preview.is_some()
    }

    pub fn close_all(&mut self) {
        self.product_form = false;
        self.image_preview = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub text: String,
    pub kind: MessageKind,
    pub expires_at: Instant,
}

/// A transient message region. A new message replaces the old one and its deadline.
#[derive(Debug, Clone, Default)]
pub struct MessageSlot {
    current: Option<Message>,
}

impl MessageSlot {
    pub fn show(&mut self, text: impl Into<String>, kind: MessageKind, now: Instant, ttl: Duration) {
        self.current = Some(Message {
            text: text.into(),
            kind,
            expires_at: now + ttl,
        });
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Message> {
        self.current.as_ref()
    }

    pub fn expire(&mut self, now: Instant) {
        if self
            .current
            .as_ref()
            .is_some_and(|message| now >= message.expires_at)
        {
            self.current = None;
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.current.as_ref().map(|message| message.expires_at)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListView<T> {
    Idle,
    Loading,
    Loaded(Vec<T>),
    Failed(&'static str),
}

pub struct ListTexts {
    pub loading: &'static str,
    pub empty: &'static str,
}

pub const PRODUCT_TEXTS: ListTexts = ListTexts {
    loading: "Loading products...",
    empty: "No products found. Add your first product!",
};

pub const IMAGE_TEXTS: ListTexts = ListTexts {
    loading: "Loading images...",
    empty: "No images found. Upload a CSV to process images!",
};

/// What a table body shows: either real rows or exactly one placeholder row.
#[derive(Debug, PartialEq)]
pub enum Rows<'a, T> {
    Placeholder(&'a str),
    Items(&'a [T]),
}

#[derive(Debug)]
pub struct ListState<T> {
    view: ListView<T>,
    generation: u64,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            view: ListView::Idle,
            generation: 0,
        }
    }
}

impl<T> ListState<T> {
    /// Starts a new load and returns its generation.
    pub fn begin_load(&mut self) -> u64 {
        self.generation += 1;
        self.view = ListView::Loading;
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Applies `view` if `generation` is still the latest load.
    pub fn finish(&mut self, generation: u64, view: ListView<T>) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.view = view;
        true
    }

    #[cfg(test)]
    pub fn view(&self) -> &ListView<T> {
        &self.view
    }

    pub fn rows(&self, texts: &ListTexts) -> Rows<'_, T> {
        match &self.view {
            ListView::Idle | ListView::Loading => Rows::Placeholder(texts.loading),
            ListView::Loaded(items) if items.is_empty() => Rows::Placeholder(texts.empty),
            ListView::Loaded(items) => Rows::Items(items),
            ListView::Failed(text) => Rows::Placeholder(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusCard {
    pub task_id: String,
    pub state: TaskState,
    /// Raw status text, shown even when it is not a known state.
    pub status: String,
    /// Pretty-printed `result`, present only when the payload carried one.
    pub result: Option<String>,
}

impl StatusCard {
    pub fn from_status(status: &TaskStatus) -> Self {
        let result = status
            .result
            .as_ref()
            .filter(|value| is_truthy(value))
            .map(|value| serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()));

        Self {
            task_id: status.task_id.clone(),
            state: status.state(),
            status: status.status.clone(),
            result,
        }
    }

    pub fn title(&self) -> String {
        format!("{} Status: {}", self.state.glyph(), self.status)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductForm {
    /// Stored id of the product being edited; `None` creates a new product.
    pub product_id: Option<u64>,
    pub serial_number: String,
    pub product_name: String,
}

impl ProductForm {
    pub fn editing(detail: &ProductDetail) -> Self {
        Self {
            product_id: Some(detail.id),
            serial_number: detail.serial_number.clone(),
            product_name: detail.product_name.clone(),
        }
    }

    pub fn title(&self) -> &'static str {
        if self.product_id.is_some() {
            "Edit Product"
        } else {
            "Add Product"
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.serial_number.trim().is_empty() && !self.product_name.trim().is_empty()
    }

    pub fn draft(&self) -> ProductDraft {
        ProductDraft {
            serial_number: self.serial_number.clone(),
            product_name: self.product_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub size: Option<u64>,
}

impl SelectedFile {
    pub fn new(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let size = std::fs::metadata(&path).ok().map(|meta| meta.len());
        Self { path, name, size }
    }
}

#[derive(Debug, Default)]
pub struct UploadPanel {
    pub selected: Option<SelectedFile>,
    pub in_flight: bool,
    pub task_ids: Vec<String>,
    pub message: MessageSlot,
}

#[derive(Debug, Default)]
pub struct TaskPanel {
    pub task_id_input: String,
    pub in_flight: bool,
    pub card: Option<StatusCard>,
    pub message: MessageSlot,
    /// When set, a status check fires once this instant is reached.
    pub pending_check: Option<Instant>,
}

#[derive(Debug, Default)]
pub struct ProductPanel {
    pub list: ListState<ProductSummary>,
    pub message: MessageSlot,
    pub form: ProductForm,
    pub saving: bool,
    pub deleting: BTreeSet<u64>,
}

#[derive(Debug, Default)]
pub struct ImagePanel {
    pub list: ListState<ImageRecord>,
    pub message: MessageSlot,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Health {
    #[default]
    Unchecked,
    Checking,
    Healthy { service: Option<String> },
    Degraded(String),
    Unreachable(String),
}

#[derive(Debug)]
pub struct DashboardState {
    pub active_tab: Tab,
    pub modals: Modals,
    pub upload: UploadPanel,
    pub tasks: TaskPanel,
    pub products: ProductPanel,
    pub images: ImagePanel,
    pub health: Health,
    /// Text waiting to be handed to the system clipboard on the next frame.
    pub clipboard: Option<String>,
    pub last_refresh: Instant,
}

impl DashboardState {
    pub fn new(now: Instant) -> Self {
        Self {
            active_tab: Tab::default(),
            modals: Modals::default(),
            upload: UploadPanel::default(),
            tasks: TaskPanel::default(),
            products: ProductPanel::default(),
            images: ImagePanel::default(),
            health: Health::default(),
            clipboard: None,
            last_refresh: now,
        }
    }

    pub fn expire_messages(&mut self, now: Instant) {
        self.upload.message.expire(now);
        self.tasks.message.expire(now);
        self.products.message.expire(now);
        self.images.message.expire(now);
    }

    /// Earliest instant at which some timer-driven state changes.
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.upload.message.deadline(),
            self.tasks.message.deadline(),
            self.products.message.deadline(),
            self.images.message.deadline(),
            // An in-flight check wakes the UI itself when it completes.
            self.tasks.pending_check.filter(|_| !self.tasks.in_flight),
        ]
        .into_iter()
        .flatten()
        .min()
    }
}
