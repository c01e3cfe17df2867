mod dialogs;
mod state;
mod ui;
mod worker;

use crate::api::ApiError;
use crate::config::DashboardConfig;
use derivative::Derivative;
use eframe::{egui, App};
pub use dialogs::{AlertLevel, Dialogs, NativeDialogs};
pub use state::{
    DashboardState, Health, ListView, MessageKind, ProductForm, SelectedFile, StatusCard, Tab,
};
use std::path::PathBuf;
use std::time::{Duration, Instant};
pub use worker::{DetailPurpose, Dispatch, Outcome, Request, Worker};

const DELETE_CONFIRMATION: &str =
    "Are you sure you want to delete this product? This will also delete all associated images.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub message_ttl: Duration,
    pub refresh_interval: Duration,
    pub settle_delay: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            message_ttl: Duration::from_secs(5),
            refresh_interval: Duration::from_secs(30),
            settle_delay: Duration::from_millis(400),
        }
    }
}

impl From<&DashboardConfig> for Timings {
    fn from(config: &DashboardConfig) -> Self {
        Self {
            message_ttl: config.message_timeout(),
            refresh_interval: config.refresh_interval(),
            settle_delay: config.task_settle_delay(),
        }
    }
}

/// View controller: owns all UI state and turns user actions into requests.
#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
pub struct Dashboard<D = Worker, G = NativeDialogs> {
    state: DashboardState,
    timings: Timings,
    #[derivative(Debug = "ignore")]
    dispatcher: D,
    #[derivative(Debug = "ignore")]
    dialogs: G,
}

impl<D: Dispatch, G: Dialogs> Dashboard<D, G> {
    pub fn new(dispatcher: D, dialogs: G, timings: Timings, now: Instant) -> Self {
        Self {
            state: DashboardState::new(now),
            timings,
            dispatcher,
            dialogs,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    fn show(&mut self, tab: Tab, text: impl Into<String>, kind: MessageKind, now: Instant) {
        let ttl = self.timings.message_ttl;
        let slot = match tab {
            Tab::Upload => &mut self.state.upload.message,
            Tab::Tasks => &mut self.state.tasks.message,
            Tab::Products => &mut self.state.products.message,
            Tab::Images => &mut self.state.images.message,
        };
        slot.show(text, kind, now, ttl);
    }

    fn alert_error(&self, server_prefix: &str, error: &ApiError) {
        log::warn!("{}{}", server_prefix, error);
        self.dialogs.alert(
            AlertLevel::Error,
            &error.describe(server_prefix, "Network error: "),
        );
    }

    // ----- tabs -----

    pub fn switch_tab(&mut self, tab: Tab) {
        self.state.active_tab = tab;
        match tab {
            Tab::Products => self.load_products(),
            Tab::Images => self.load_images(),
            Tab::Upload | Tab::Tasks => {}
        }
    }

    pub fn switch_to_named(&mut self, name: &str) {
        match Tab::from_name(name) {
            Some(tab) => self.switch_tab(tab),
            None => log::debug!("Ignoring unknown tab '{}'", name),
        }
    }

    // ----- upload -----

    pub fn select_csv(&mut self, path: PathBuf) {
        let file = SelectedFile::new(path);
        log::info!("Selected CSV {}", file.path.display());
        self.state.upload.selected = Some(file);
    }

    pub fn submit_upload(&mut self, now: Instant) {
        if self.state.upload.in_flight {
            return;
        }
        let Some(file) = self.state.upload.selected.clone() else {
            self.show(Tab::Upload, "Please select a CSV file.", MessageKind::Error, now);
            return;
        };

        self.state.upload.in_flight = true;
        self.show(Tab::Upload, "Uploading and processing...", MessageKind::Info, now);
        self.dispatcher
            .dispatch(Request::UploadCsv { path: file.path });
    }

    // ----- task status -----

    pub fn check_status(&mut self, now: Instant) {
        if self.state.tasks.in_flight {
            return;
        }
        let task_id = self.state.tasks.task_id_input.trim().to_string();
        self.state.tasks.card = None;
        if task_id.is_empty() {
            self.show(Tab::Tasks, "Please enter a task ID", MessageKind::Error, now);
            return;
        }

        self.state.tasks.in_flight = true;
        self.show(Tab::Tasks, "Fetching status...", MessageKind::Info, now);
        self.dispatcher.dispatch(Request::CheckStatus { task_id });
    }

    /// Jumps from an uploaded task to the status tab and checks it once the tab has settled.
    pub fn open_task(&mut self, task_id: &str, now: Instant) {
        self.switch_tab(Tab::Tasks);
        self.state.tasks.task_id_input = task_id.to_string();
        self.state.tasks.pending_check = Some(now + self.timings.settle_delay);
    }

    // ----- products -----

    pub fn load_products(&mut self) {
        let generation = self.state.products.list.begin_load();
        self.state.products.message.clear();
        self.dispatcher
            .dispatch(Request::LoadProducts { generation });
    }

    pub fn open_new_product(&mut self) {
        self.state.products.form = ProductForm::default();
        self.state.modals.product_form = true;
    }

    pub fn submit_product_form(&mut self) {
        if self.state.products.saving {
            return;
        }
        let form = &self.state.products.form;
        let request = Request::SaveProduct {
            id: form.product_id,
            draft: form.draft(),
        };
        self.state.products.saving = true;
        self.dispatcher.dispatch(request);
    }

    pub fn view_product(&mut self, id: u64) {
        self.dispatcher.dispatch(Request::FetchProduct {
            id,
            purpose: DetailPurpose::View,
        });
    }

    pub fn edit_product(&mut self, id: u64) {
        self.dispatcher.dispatch(Request::FetchProduct {
            id,
            purpose: DetailPurpose::Edit,
        });
    }

    pub fn delete_product(&mut self, id: u64) {
        if self.state.products.deleting.contains(&id) {
            return;
        }
        if !self.dialogs.confirm(DELETE_CONFIRMATION) {
            log::debug!("Deletion of product {} cancelled", id);
            return;
        }
        self.state.products.deleting.insert(id);
        self.dispatcher.dispatch(Request::DeleteProduct { id });
    }

    // ----- images -----

    pub fn load_images(&mut self) {
        let generation = self.state.images.list.begin_load();
        self.state.images.message.clear();
        self.dispatcher.dispatch(Request::LoadImages { generation });
    }

    pub fn view_image(&mut self, url: &str) {
        self.state.modals.image_preview = Some(url.to_string());
    }

    pub fn copy_url(&mut self, url: &str) {
        if url.trim().is_empty() {
            self.dialogs.alert(AlertLevel::Error, "Failed to copy URL");
            return;
        }
        self.state.clipboard = Some(url.to_string());
        self.dialogs.alert(AlertLevel::Info, "URL copied to clipboard!");
    }

    // ----- modals -----

    pub fn close_product_modal(&mut self) {
        self.state.modals.product_form = false;
    }

    pub fn close_image_modal(&mut self) {
        self.state.modals.image_preview = None;
    }

    /// A click on the dimmed area around a modal closes whichever modal is open.
    pub fn backdrop_clicked(&mut self) {
        self.state.modals.close_all();
    }

    // ----- health -----

    pub fn check_health(&mut self) {
        self.state.health = Health::Checking;
        self.dispatcher.dispatch(Request::CheckHealth);
    }

    // ----- completion -----

    pub fn apply(&mut self, outcome: Outcome, now: Instant) {
        match outcome {
            Outcome::Uploaded(result) => {
                self.state.upload.in_flight = false;
                match result {
                    Ok(response) => {
                        let text = format!(
                            "✅ Successfully submitted {} task(s) for processing!",
                            response.task_ids.len()
                        );
                        log::info!("Upload accepted with {} task(s)", response.task_ids.len());
                        self.show(Tab::Upload, text, MessageKind::Success, now);
                        self.state.upload.task_ids = response.task_ids;
                        self.state.upload.selected = None;
                    }
                    Err(error) => {
                        log::warn!("Upload failed: {}", error);
                        let text = error.describe("❌ Error: ", "❌ Network error: ");
                        self.show(Tab::Upload, text, MessageKind::Error, now);
                    }
                }
            }
            Outcome::TaskStatus(result) => {
                self.state.tasks.in_flight = false;
                match result {
                    Ok(status) => {
                        self.state.tasks.message.clear();
                        self.state.tasks.card = Some(StatusCard::from_status(&status));
                    }
                    Err(error) => {
                        log::warn!("Status check failed: {}", error);
                        self.state.tasks.card = None;
                        let text = error.describe("❌ Error: ", "❌ Network error: ");
                        self.show(Tab::Tasks, text, MessageKind::Error, now);
                    }
                }
            }
            Outcome::Products { generation, result } => {
                let (view, error) = match result {
                    Ok(products) => (ListView::Loaded(products), None),
                    Err(error) => {
                        let placeholder = failed_placeholder(&error, "Failed to load products");
                        (ListView::Failed(placeholder), Some(error))
                    }
                };
                if !self.state.products.list.finish(generation, view) {
                    log::debug!("Discarding stale product list (generation {})", generation);
                    return;
                }
                if let Some(error) = error {
                    log::warn!("Loading products failed: {}", error);
                    let text = error.describe("❌ Error loading products: ", "❌ Network error: ");
                    self.show(Tab::Products, text, MessageKind::Error, now);
                }
            }
            Outcome::Images { generation, result } => {
                let (view, error) = match result {
                    Ok(images) => (ListView::Loaded(images), None),
                    Err(error) => {
                        let placeholder = failed_placeholder(&error, "Failed to load images");
                        (ListView::Failed(placeholder), Some(error))
                    }
                };
                if !self.state.images.list.finish(generation, view) {
                    log::debug!("Discarding stale image list (generation {})", generation);
                    return;
                }
                if let Some(error) = error {
                    log::warn!("Loading images failed: {}", error);
                    let text = error.describe("❌ Error loading images: ", "❌ Network error: ");
                    self.show(Tab::Images, text, MessageKind::Error, now);
                }
            }
            Outcome::ProductDetail { purpose, result } => match result {
                Ok(detail) => match purpose {
                    DetailPurpose::View => {
                        self.dialogs.alert(AlertLevel::Info, &detail.summary());
                    }
                    DetailPurpose::Edit => {
                        self.state.products.form = ProductForm::editing(&detail);
                        self.state.modals.product_form = true;
                    }
                },
                Err(error) => self.alert_error("Error loading product: ", &error),
            },
            Outcome::ProductSaved(result) => {
                self.state.products.saving = false;
                match result {
                    Ok(response) => {
                        self.close_product_modal();
                        self.load_products();
                        let text = format!("✅ {}", response.message);
                        self.show(Tab::Products, text, MessageKind::Success, now);
                    }
                    Err(error) => self.alert_error("Error: ", &error),
                }
            }
            Outcome::ProductDeleted { id, result } => {
                self.state.products.deleting.remove(&id);
                match result {
                    Ok(response) => {
                        log::info!("Deleted product {}", id);
                        self.load_products();
                        let text = format!("✅ {}", response.message);
                        self.show(Tab::Products, text, MessageKind::Success, now);
                    }
                    Err(error) => self.alert_error("Error: ", &error),
                }
            }
            Outcome::Health(result) => {
                self.state.health = match result {
                    Ok(health) if health.is_healthy() => Health::Healthy {
                        service: health.service,
                    },
                    Ok(health) => Health::Degraded(health.status),
                    Err(error) => {
                        log::warn!("Health check failed: {}", error);
                        Health::Unreachable(error.to_string())
                    }
                };
            }
        }
    }

    /// Advances timers: message expiry, scheduled task checks and list auto-refresh.
    pub fn tick(&mut self, now: Instant) {
        self.state.expire_messages(now);

        // A due check waits for the one already in flight.
        let tasks = &self.state.tasks;
        if !tasks.in_flight && tasks.pending_check.is_some_and(|deadline| now >= deadline) {
            self.state.tasks.pending_check = None;
            self.check_status(now);
        }

        if now.duration_since(self.state.last_refresh) >= self.timings.refresh_interval {
            self.state.last_refresh = now;
            match self.state.active_tab {
                Tab::Products => self.load_products(),
                Tab::Images => self.load_images(),
                Tab::Upload | Tab::Tasks => {}
            }
        }
    }

    /// Applies finished requests, then advances timers.
    pub fn update_state(&mut self, now: Instant) {
        for outcome in self.dispatcher.drain() {
            self.apply(outcome, now);
        }
        self.tick(now);
    }

    /// How long the UI may sleep before a timer needs another frame.
    pub fn next_wakeup(&self, now: Instant) -> Duration {
        let refresh_at = self.state.last_refresh + self.timings.refresh_interval;
        let deadline = self
            .state
            .next_deadline()
            .map_or(refresh_at, |deadline| deadline.min(refresh_at));
        deadline.saturating_duration_since(now)
    }
}

fn failed_placeholder(error: &ApiError, server_text: &'static str) -> &'static str {
    if error.is_server() {
        server_text
    } else {
        "Network error"
    }
}

impl App for Dashboard {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.update_state(now);
        self.render(ctx);

        if let Some(text) = self.state.clipboard.take() {
            ctx.output_mut(|output| output.copied_text = text);
        }
        ctx.request_repaint_after(self.next_wakeup(Instant::now()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{
        HealthStatus, ImageRecord, MessageResponse, ProductDetail, ProductSummary, TaskState,
        TaskStatus, UploadResponse,
    };
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Default, Clone)]
    struct Recorder {
        sent: Rc<RefCell<Vec<Request>>>,
        queued: Rc<RefCell<Vec<Outcome>>>,
    }

    impl Dispatch for Recorder {
        fn dispatch(&mut self, request: Request) {
            self.sent.borrow_mut().push(request);
        }

        fn drain(&mut self) -> Vec<Outcome> {
            self.queued.borrow_mut().drain(..).collect()
        }
    }

    #[derive(Default, Clone)]
    struct Scripted {
        confirm_answer: Rc<Cell<bool>>,
        alerts: Rc<RefCell<Vec<(AlertLevel, String)>>>,
        confirms: Rc<Cell<usize>>,
    }

    impl Dialogs for Scripted {
        fn alert(&self, level: AlertLevel, message: &str) {
            self.alerts.borrow_mut().push((level, message.to_string()));
        }

        fn confirm(&self, _message: &str) -> bool {
            self.confirms.set(self.confirms.get() + 1);
            self.confirm_answer.get()
        }
    }

    struct Harness {
        dashboard: Dashboard<Recorder, Scripted>,
        recorder: Recorder,
        dialogs: Scripted,
        start: Instant,
    }

    impl Harness {
        fn new() -> Self {
            let recorder = Recorder::default();
            let dialogs = Scripted::default();
            let start = Instant::now();
            let dashboard = Dashboard::new(
                recorder.clone(),
                dialogs.clone(),
                Timings::default(),
                start,
            );
            Self {
                dashboard,
                recorder,
                dialogs,
                start,
            }
        }

        fn sent(&self) -> Vec<Request> {
            self.recorder.sent.borrow().clone()
        }

        fn clear_sent(&self) {
            self.recorder.sent.borrow_mut().clear();
        }

        fn at(&self, millis: u64) -> Instant {
            self.start + Duration::from_millis(millis)
        }
    }

    fn server_error(message: &str) -> ApiError {
        ApiError::Server {
            status: 400,
            message: message.to_string(),
        }
    }

    fn transport_error() -> ApiError {
        ApiError::File {
            path: PathBuf::from("gone.csv"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        }
    }

    fn product(id: u64) -> ProductSummary {
        ProductSummary {
            id,
            serial_number: format!("SN-{id}"),
            product_name: format!("Product {id}"),
            image_count: 0,
        }
    }

    #[test]
    fn switching_tabs_loads_list_tabs_once() {
        let mut h = Harness::new();

        h.dashboard.switch_tab(Tab::Products);
        assert_eq!(h.dashboard.state().active_tab, Tab::Products);
        assert_eq!(h.sent(), vec![Request::LoadProducts { generation: 1 }]);

        h.clear_sent();
        h.dashboard.switch_tab(Tab::Images);
        assert_eq!(h.sent(), vec![Request::LoadImages { generation: 1 }]);

        h.clear_sent();
        h.dashboard.switch_tab(Tab::Tasks);
        h.dashboard.switch_tab(Tab::Upload);
        assert!(h.sent().is_empty());
    }

    #[test]
    fn unknown_tab_name_changes_nothing() {
        let mut h = Harness::new();
        h.dashboard.switch_to_named("tasks");
        h.dashboard.switch_to_named("settings");
        assert_eq!(h.dashboard.state().active_tab, Tab::Tasks);
        assert!(h.sent().is_empty());
    }

    #[test]
    fn upload_without_file_is_rejected_locally() {
        let mut h = Harness::new();
        h.dashboard.submit_upload(h.at(0));

        assert!(h.sent().is_empty());
        let message = h.dashboard.state().upload.message.current().unwrap();
        assert_eq!(message.text, "Please select a CSV file.");
        assert_eq!(message.kind, MessageKind::Error);
        assert!(!h.dashboard.state().upload.in_flight);
    }

    #[test]
    fn successful_upload_lists_each_task() {
        let mut h = Harness::new();
        h.dashboard.select_csv(PathBuf::from("/tmp/does-not-exist.csv"));
        h.dashboard.submit_upload(h.at(0));

        assert_eq!(
            h.sent(),
            vec![Request::UploadCsv {
                path: PathBuf::from("/tmp/does-not-exist.csv")
            }]
        );
        assert!(h.dashboard.state().upload.in_flight);

        // a second click while the first upload is running is ignored
        h.dashboard.submit_upload(h.at(10));
        assert_eq!(h.sent().len(), 1);

        h.dashboard.apply(
            Outcome::Uploaded(Ok(UploadResponse {
                task_ids: vec!["a".into(), "b".into()],
            })),
            h.at(100),
        );

        let upload = &h.dashboard.state().upload;
        assert!(!upload.in_flight);
        assert!(upload.selected.is_none());
        assert_eq!(upload.task_ids, vec!["a", "b"]);
        assert_eq!(
            upload.message.current().unwrap().text,
            "✅ Successfully submitted 2 task(s) for processing!"
        );

        h.clear_sent();
        h.dashboard.open_task("b", h.at(200));
        assert_eq!(h.dashboard.state().active_tab, Tab::Tasks);
        assert_eq!(h.dashboard.state().tasks.task_id_input, "b");

        h.dashboard.tick(h.at(599));
        assert!(h.sent().is_empty());
        h.dashboard.tick(h.at(600));
        assert_eq!(
            h.sent(),
            vec![Request::CheckStatus {
                task_id: "b".into()
            }]
        );
    }

    #[test]
    fn due_check_waits_for_the_check_in_flight() {
        let mut h = Harness::new();
        h.dashboard.open_task("a", h.at(0));
        h.dashboard.tick(h.at(400));
        h.dashboard.open_task("b", h.at(500));
        h.dashboard.tick(h.at(900));
        assert_eq!(
            h.sent(),
            vec![Request::CheckStatus {
                task_id: "a".into()
            }]
        );
        assert!(h.dashboard.state().tasks.pending_check.is_some());

        h.dashboard.apply(
            Outcome::TaskStatus(Ok(TaskStatus {
                task_id: "a".into(),
                status: "PENDING".into(),
                result: None,
            })),
            h.at(1_000),
        );
        h.dashboard.tick(h.at(2_000));
        assert_eq!(
            h.sent().last(),
            Some(&Request::CheckStatus {
                task_id: "b".into()
            })
        );
        assert!(h.dashboard.state().tasks.pending_check.is_none());
    }

    #[test]
    fn failed_upload_reenables_the_button() {
        let mut h = Harness::new();
        h.dashboard.select_csv(PathBuf::from("bad.csv"));

        h.dashboard.submit_upload(h.at(0));
        h.dashboard.apply(
            Outcome::Uploaded(Err(server_error("CSV format is incorrect."))),
            h.at(10),
        );
        assert!(!h.dashboard.state().upload.in_flight);
        assert_eq!(
            h.dashboard.state().upload.message.current().unwrap().text,
            "❌ Error: CSV format is incorrect."
        );
        assert!(h.dashboard.state().upload.selected.is_some());

        h.dashboard.submit_upload(h.at(20));
        h.dashboard
            .apply(Outcome::Uploaded(Err(transport_error())), h.at(30));
        assert!(!h.dashboard.state().upload.in_flight);
        assert!(h
            .dashboard
            .state()
            .upload
            .message
            .current()
            .unwrap()
            .text
            .starts_with("❌ Network error: "));
        assert_eq!(h.sent().len(), 2);
    }

    #[test]
    fn empty_task_id_is_rejected_locally() {
        let mut h = Harness::new();
        h.dashboard.state.tasks.task_id_input = "   ".into();
        h.dashboard.check_status(h.at(0));

        assert!(h.sent().is_empty());
        assert_eq!(
            h.dashboard.state().tasks.message.current().unwrap().text,
            "Please enter a task ID"
        );
    }

    #[test]
    fn new_check_replaces_the_previous_card() {
        let mut h = Harness::new();
        h.dashboard.state.tasks.task_id_input = "x".into();
        h.dashboard.check_status(h.at(0));
        h.dashboard.apply(
            Outcome::TaskStatus(Ok(TaskStatus {
                task_id: "x".into(),
                status: "SUCCESS".into(),
                result: None,
            })),
            h.at(10),
        );
        assert!(h.dashboard.state().tasks.card.is_some());

        h.dashboard.state.tasks.task_id_input.clear();
        h.dashboard.check_status(h.at(20));
        assert!(h.dashboard.state().tasks.card.is_none());
        assert_eq!(
            h.dashboard.state().tasks.message.current().unwrap().text,
            "Please enter a task ID"
        );

        h.dashboard.apply(
            Outcome::TaskStatus(Ok(TaskStatus {
                task_id: "x".into(),
                status: "SUCCESS".into(),
                result: None,
            })),
            h.at(30),
        );
        h.dashboard.state.tasks.task_id_input = "y".into();
        h.dashboard.check_status(h.at(40));
        let tasks = &h.dashboard.state().tasks;
        assert!(tasks.card.is_none());
        assert_eq!(tasks.message.current().unwrap().text, "Fetching status...");
    }

    #[test]
    fn status_check_trims_and_renders_card() {
        let mut h = Harness::new();
        h.dashboard.state.tasks.task_id_input = "  x  ".into();
        h.dashboard.check_status(h.at(0));
        assert_eq!(
            h.sent(),
            vec![Request::CheckStatus {
                task_id: "x".into()
            }]
        );

        h.dashboard.apply(
            Outcome::TaskStatus(Ok(TaskStatus {
                task_id: "x".into(),
                status: "SUCCESS".into(),
                result: Some(serde_json::json!({"n": 1})),
            })),
            h.at(50),
        );

        let tasks = &h.dashboard.state().tasks;
        assert!(!tasks.in_flight);
        assert!(tasks.message.current().is_none());
        let card = tasks.card.as_ref().unwrap();
        assert_eq!(card.state, TaskState::Success);
        assert!(card.result.as_deref().unwrap().contains("\"n\": 1"));
    }

    #[test]
    fn product_form_posts_new_and_puts_existing() {
        let mut h = Harness::new();

        h.dashboard.open_new_product();
        assert!(h.dashboard.state().modals.product_form);
        h.dashboard.state.products.form.serial_number = "SN-1".into();
        h.dashboard.state.products.form.product_name = "Lamp".into();
        h.dashboard.submit_product_form();
        assert_eq!(h.sent()[0].route().to_string(), "POST /api/products");

        h.dashboard.apply(
            Outcome::ProductSaved(Ok(MessageResponse {
                message: "Product created successfully".into(),
            })),
            h.at(10),
        );
        assert!(!h.dashboard.state().modals.product_form);
        assert_eq!(h.sent()[1], Request::LoadProducts { generation: 1 });
        assert_eq!(
            h.dashboard.state().products.message.current().unwrap().text,
            "✅ Product created successfully"
        );

        h.clear_sent();
        h.dashboard.edit_product(7);
        h.dashboard.apply(
            Outcome::ProductDetail {
                purpose: DetailPurpose::Edit,
                result: Ok(ProductDetail {
                    id: 7,
                    serial_number: "SN-7".into(),
                    product_name: "Desk".into(),
                    images: Vec::new(),
                }),
            },
            h.at(20),
        );
        assert!(h.dashboard.state().modals.product_form);
        assert_eq!(h.dashboard.state().products.form.title(), "Edit Product");

        h.dashboard.submit_product_form();
        let sent = h.sent();
        assert_eq!(sent.last().unwrap().route().to_string(), "PUT /api/products/7");
    }

    #[test]
    fn failed_save_keeps_modal_and_alerts() {
        let mut h = Harness::new();
        h.dashboard.open_new_product();
        h.dashboard.submit_product_form();
        h.dashboard.apply(
            Outcome::ProductSaved(Err(server_error(
                "Product with this serial number already exists",
            ))),
            h.at(10),
        );

        assert!(h.dashboard.state().modals.product_form);
        assert!(!h.dashboard.state().products.saving);
        let alerts = h.dialogs.alerts.borrow();
        assert_eq!(
            alerts.last().unwrap().1,
            "Error: Product with this serial number already exists"
        );
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut h = Harness::new();

        h.dialogs.confirm_answer.set(false);
        h.dashboard.delete_product(3);
        assert!(h.sent().is_empty());
        assert_eq!(h.dialogs.confirms.get(), 1);

        h.dialogs.confirm_answer.set(true);
        h.dashboard.delete_product(3);
        assert_eq!(h.sent(), vec![Request::DeleteProduct { id: 3 }]);

        h.dashboard.apply(
            Outcome::ProductDeleted {
                id: 3,
                result: Ok(MessageResponse {
                    message: "Product deleted successfully".into(),
                }),
            },
            h.at(10),
        );
        assert_eq!(
            h.sent(),
            vec![
                Request::DeleteProduct { id: 3 },
                Request::LoadProducts { generation: 1 }
            ]
        );
        assert!(h.dashboard.state().products.deleting.is_empty());
    }

    #[test]
    fn view_product_shows_summary_alert() {
        let mut h = Harness::new();
        h.dashboard.view_product(4);
        h.dashboard.apply(
            Outcome::ProductDetail {
                purpose: DetailPurpose::View,
                result: Ok(ProductDetail {
                    id: 4,
                    serial_number: "SN-4".into(),
                    product_name: "Chair".into(),
                    images: Vec::new(),
                }),
            },
            h.at(0),
        );
        let alerts = h.dialogs.alerts.borrow();
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].1.contains("Serial: SN-4"));
        assert!(!h.dashboard.state().modals.product_form);
    }

    #[test]
    fn stale_product_list_is_ignored() {
        let mut h = Harness::new();
        h.dashboard.switch_tab(Tab::Products);
        h.dashboard.load_products();

        h.dashboard.apply(
            Outcome::Products {
                generation: 2,
                result: Ok(vec![product(2)]),
            },
            h.at(10),
        );
        h.dashboard.apply(
            Outcome::Products {
                generation: 1,
                result: Ok(vec![product(1)]),
            },
            h.at(20),
        );

        assert_eq!(
            h.dashboard.state().products.list.view(),
            &ListView::Loaded(vec![product(2)])
        );
    }

    #[test]
    fn list_failures_pick_placeholder_by_error_class() {
        let mut h = Harness::new();
        h.dashboard.switch_tab(Tab::Images);
        h.dashboard.apply(
            Outcome::Images {
                generation: 1,
                result: Err(server_error("boom")),
            },
            h.at(0),
        );
        assert_eq!(
            h.dashboard.state().images.list.view(),
            &ListView::<ImageRecord>::Failed("Failed to load images")
        );
        assert_eq!(
            h.dashboard.state().images.message.current().unwrap().text,
            "❌ Error loading images: boom"
        );

        h.dashboard.load_images();
        h.dashboard.apply(
            Outcome::Images {
                generation: 2,
                result: Err(transport_error()),
            },
            h.at(10),
        );
        assert_eq!(
            h.dashboard.state().images.list.view(),
            &ListView::<ImageRecord>::Failed("Network error")
        );
    }

    #[test]
    fn auto_refresh_reloads_active_list_tab() {
        let mut h = Harness::new();
        h.dashboard.tick(h.at(30_000));
        assert!(h.sent().is_empty());

        h.dashboard.switch_tab(Tab::Images);
        h.clear_sent();
        h.dashboard.tick(h.at(45_000));
        assert!(h.sent().is_empty());
        h.dashboard.tick(h.at(60_000));
        assert_eq!(h.sent(), vec![Request::LoadImages { generation: 2 }]);
    }

    #[test]
    fn messages_clear_themselves() {
        let mut h = Harness::new();
        h.dashboard.submit_upload(h.at(0));
        h.dashboard.tick(h.at(4_999));
        assert!(h.dashboard.state().upload.message.current().is_some());
        h.dashboard.tick(h.at(5_000));
        assert!(h.dashboard.state().upload.message.current().is_none());
    }

    #[test]
    fn backdrop_closes_open_modal() {
        let mut h = Harness::new();
        h.dashboard.view_image("https://x/a.jpg");
        assert!(h.dashboard.state().modals.any_open());
        h.dashboard.backdrop_clicked();
        assert!(!h.dashboard.state().modals.any_open());

        h.dashboard.open_new_product();
        h.dashboard.backdrop_clicked();
        assert!(!h.dashboard.state().modals.product_form);
    }

    #[test]
    fn copy_url_confirms_with_alert() {
        let mut h = Harness::new();
        h.dashboard.copy_url("https://x/a.jpg");
        assert_eq!(
            h.dashboard.state().clipboard.as_deref(),
            Some("https://x/a.jpg")
        );

        h.dashboard.copy_url("");
        let alerts = h.dialogs.alerts.borrow();
        assert_eq!(alerts[0], (AlertLevel::Info, "URL copied to clipboard!".to_string()));
        assert_eq!(alerts[1], (AlertLevel::Error, "Failed to copy URL".to_string()));
    }

    #[test]
    fn health_outcomes_update_badge() {
        let mut h = Harness::new();
        h.dashboard.check_health();
        assert_eq!(h.dashboard.state().health, Health::Checking);
        assert_eq!(h.sent(), vec![Request::CheckHealth]);

        h.dashboard.apply(
            Outcome::Health(Ok(HealthStatus {
                status: "healthy".into(),
                service: Some("image-processing-api".into()),
                timestamp: None,
            })),
            h.at(0),
        );
        assert_eq!(
            h.dashboard.state().health,
            Health::Healthy {
                service: Some("image-processing-api".into())
            }
        );

        h.dashboard
            .apply(Outcome::Health(Err(transport_error())), h.at(0));
        assert!(matches!(h.dashboard.state().health, Health::Unreachable(_)));
    }

    #[test]
    fn queued_outcomes_are_applied_on_update() {
        let mut h = Harness::new();
        h.dashboard.switch_tab(Tab::Products);
        h.recorder.queued.borrow_mut().push(Outcome::Products {
            generation: 1,
            result: Ok(vec![product(1), product(2)]),
        });

        h.dashboard.update_state(h.at(10));
        match h.dashboard.state().products.list.view() {
            ListView::Loaded(items) => assert_eq!(items.len(), 2),
            other => panic!("unexpected view: {other:?}"),
        }
    }
}
