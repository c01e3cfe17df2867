mod api;
mod app;
mod config;
mod utils;

use api::ApiClient;
use app::{Dashboard, NativeDialogs, Timings, Worker};
use config::DashboardConfig;
use eframe::egui;
use std::error::Error;
use std::time::Instant;

fn main() {
    if let Err(e) = run() {
        log::error!("Dashboard failed: {}", e);
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let loaded = config::config_path().and_then(|path| config::load_or_create(&path));
    let (config, config_error) = match loaded {
        Ok(config) => (config, None),
        Err(e) => (DashboardConfig::default(), Some(e)),
    };

    env_logger::Builder::new()
        .filter_level(config.ui.log_level.to_level_filter())
        .parse_default_env()
        .init();

    if let Some(e) = config_error {
        log::warn!("Using default configuration: {}", e);
    }

    let base_url = match config.base_url() {
        Ok(url) => url,
        Err(e) => {
            log::warn!("{}; falling back to the default server", e);
            DashboardConfig::default().base_url()?
        }
    };
    log::info!("Initializing Image Processing Dashboard against {}", base_url);

    let client = ApiClient::new(base_url, config.request_timeout())?;
    let runtime = tokio::runtime::Runtime::new()?;
    let worker = Worker::new(client, runtime);
    let timings = Timings::from(&config);
    let start_tab = config.ui.start_tab.clone();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 680.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Image Processing Dashboard",
        options,
        Box::new(
            move |cc: &eframe::CreationContext<'_>| -> Box<dyn eframe::App> {
                egui_extras::install_image_loaders(&cc.egui_ctx);

                let worker = worker.with_repaint(cc.egui_ctx.clone());
                let mut dashboard = Dashboard::new(worker, NativeDialogs, timings, Instant::now());
                dashboard.switch_to_named(&start_tab);
                dashboard.check_health();
                Box::new(dashboard)
            },
        ),
    )?;

    Ok(())
}
