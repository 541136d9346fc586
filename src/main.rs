use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use winit::event_loop::EventLoop;

mod api;
mod app;
mod config;
mod models;
mod services;
mod state;
mod ui;

fn main() {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("stock_downloader=info".parse().unwrap())
                .add_directive("wgpu=warn".parse().unwrap())
                .add_directive("winit=warn".parse().unwrap()),
        )
        .with_target(true)
        .init();

    info!("📈 Starting Stock Data Downloader...");

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            error!("Failed to create event loop: {}", e);
            return;
        }
    };

    let mut app = app::App::new();
    if let Err(e) = event_loop.run_app(&mut app) {
        error!("Event loop error: {}", e);
    }

    info!("Stock Data Downloader shut down");
}
