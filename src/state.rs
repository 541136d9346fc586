//! Application state: window, GPU surface, form fields and background
//! download plumbing.

use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use tracing::{debug, error, info, warn};
use winit::window::Window;

use crate::api::yahoo::YahooClient;
use crate::config::AppConfig;
use crate::services::chart_service;
use crate::services::download_service::{self, DownloadError, DownloadOutcome};
use crate::ui;

/// Messages sent from background tasks back to the event loop thread.
pub enum BackgroundMessage {
    FetchFinished(Result<DownloadOutcome, DownloadError>),
}

/// Modal feedback shown after a download attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub title: &'static str,
    pub text: String,
}

impl Notification {
    pub fn saved(csv_filename: &str) -> Self {
        Self {
            title: "Success",
            text: format!("Data saved as {}", csv_filename),
        }
    }

    pub fn for_error(err: &DownloadError) -> Self {
        match err {
            DownloadError::EmptyTicker => Self {
                title: "Input Error",
                text: err.to_string(),
            },
            DownloadError::NoData(_) => Self {
                title: "Error",
                text: err.to_string(),
            },
            other => Self {
                title: "Error",
                text: format!("Failed to fetch data: {}", other),
            },
        }
    }

    pub fn render_failure(msg: &str) -> Self {
        Self {
            title: "Error",
            text: format!("Failed to fetch data: {}", msg),
        }
    }
}

pub struct AppState {
    // --- Window and graphics ---
    pub window: Arc<Window>,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub is_surface_configured: bool,
    pub egui_ctx: egui::Context,
    pub egui_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,

    // --- Form state ---
    /// Current content of the ticker entry field.
    pub symbol_input: String,
    /// Tickers offered in the dropdown.
    pub symbols: Vec<String>,
    /// Symbol of the download currently in flight, if any.
    pub fetching_symbol: Option<String>,
    /// Pending modal dialog, dismissed with its OK button.
    pub notification: Option<Notification>,
    /// Texture of the most recently rendered chart.
    pub chart_texture: Option<egui::TextureHandle>,
    pub chart_size: (u32, u32),

    // --- Background communication ---
    pub bg_sender: Sender<BackgroundMessage>,
    pub bg_receiver: Receiver<BackgroundMessage>,
    /// Tokio runtime for async operations.
    pub tokio_runtime: tokio::runtime::Runtime,
    pub client: Arc<YahooClient>,
}

impl AppState {
    pub async fn new(window: Arc<Window>) -> Self {
        let size = window.inner_size();

        // Create background channel
        let (bg_sender, bg_receiver) = mpsc::channel();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .expect("Failed to create render surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to find a suitable GPU adapter");

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await
            .expect("Failed to create GPU device");

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        // Egui setup
        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        // Create tokio runtime for async operations
        let tokio_runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .expect("Failed to create tokio runtime");

        // Load application config
        let app_config = AppConfig::load_default();
        info!(
            "Offering {} tickers, default {}",
            app_config.general.symbols.len(),
            app_config.general.default_symbol
        );

        Self {
            window,
            surface,
            device,
            queue,
            config,
            is_surface_configured: false,
            egui_ctx,
            egui_state,
            egui_renderer,
            symbol_input: app_config.general.default_symbol.clone(),
            symbols: app_config.general.symbols.clone(),
            fetching_symbol: None,
            notification: None,
            chart_texture: None,
            chart_size: (app_config.chart.width, app_config.chart.height),
            bg_sender,
            bg_receiver,
            tokio_runtime,
            client: Arc::new(YahooClient::new()),
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.is_surface_configured = true;
        }
    }

    /// Kick off a background download for the current form input.
    /// Ignored while another download is still running.
    pub fn start_fetch(&mut self) {
        if self.fetching_symbol.is_some() {
            return;
        }

        let raw = self.symbol_input.clone();
        let display_symbol = download_service::normalize_symbol(&raw);
        info!("Download requested for '{}'", display_symbol);
        self.fetching_symbol = Some(display_symbol);

        let sender = self.bg_sender.clone();
        let client = Arc::clone(&self.client);
        self.tokio_runtime.spawn(async move {
            let result = download_service::fetch_and_save(&client, &raw, Path::new(".")).await;
            // The receiver is gone once the window closes; nothing left to notify
            if sender.send(BackgroundMessage::FetchFinished(result)).is_err() {
                debug!("Fetch finished after shutdown, result dropped");
            }
        });
        self.window.request_redraw();
    }

    /// Process any pending messages from background tasks.
    /// Returns true if state changed and the view should refresh.
    pub fn process_background_messages(&mut self) -> bool {
        let mut updated = false;

        // Process all available messages (non-blocking)
        while let Ok(msg) = self.bg_receiver.try_recv() {
            match msg {
                BackgroundMessage::FetchFinished(result) => {
                    self.fetching_symbol = None;
                    match result {
                        Ok(outcome) => self.finish_download(outcome),
                        Err(err) => {
                            match &err {
                                DownloadError::EmptyTicker | DownloadError::NoData(_) => {
                                    warn!("Download rejected: {}", err)
                                }
                                _ => error!("Download failed: {}", err),
                            }
                            self.notification = Some(Notification::for_error(&err));
                        }
                    }
                    updated = true;
                }
            }
        }

        if updated {
            self.window.request_redraw();
        }
        updated
    }

    fn finish_download(&mut self, outcome: DownloadOutcome) {
        let (width, height) = self.chart_size;
        match chart_service::render_close_chart(&outcome.bars, &outcome.symbol, width, height) {
            Ok(image) => {
                let color_image = egui::ColorImage::from_rgb(
                    [image.width as usize, image.height as usize],
                    &image.rgb,
                );
                // Replacing the handle drops the previous chart
                self.chart_texture = Some(self.egui_ctx.load_texture(
                    "price-chart",
                    color_image,
                    egui::TextureOptions::LINEAR,
                ));
                self.notification = Some(Notification::saved(&outcome.csv_filename));
            }
            Err(msg) => {
                error!("Chart rendering failed: {}", msg);
                self.chart_texture = None;
                self.notification = Some(Notification::render_failure(&msg));
            }
        }
    }

    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.window.request_redraw();

        if !self.is_surface_configured {
            return Ok(());
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // Build egui UI
        let raw_input = self.egui_state.take_egui_input(&self.window);
        let egui_ctx = self.egui_ctx.clone();
        let mut form = ui::FormResponse::default();
        let full_output = egui_ctx.run(raw_input, |ctx| {
            form = ui::draw(
                ctx,
                &mut self.symbol_input,
                &self.symbols,
                self.fetching_symbol.as_deref(),
                self.notification.as_ref(),
                self.chart_texture.as_ref(),
            );
        });

        self.egui_state
            .handle_platform_output(&self.window, full_output.platform_output);

        if form.notification_dismissed {
            self.notification = None;
        }
        if form.download_clicked {
            self.start_fetch();
        }

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        // Update egui textures
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        // Update egui buffers
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.95,
                            g: 0.95,
                            b: 0.95,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            // egui-wgpu 0.31 requires RenderPass<'static>, use forget_lifetime()
            let mut render_pass = render_pass.forget_lifetime();
            self.egui_renderer
                .render(&mut render_pass, &paint_jobs, &screen_descriptor);
        }

        // Free egui textures
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::yahoo::FetchError;

    #[test]
    fn notification_titles_follow_error_kind() {
        let input = Notification::for_error(&DownloadError::EmptyTicker);
        assert_eq!(input.title, "Input Error");
        assert_eq!(input.text, "Please select or enter a stock ticker.");

        let no_data = Notification::for_error(&DownloadError::NoData("AAPL".to_string()));
        assert_eq!(no_data.title, "Error");
        assert_eq!(no_data.text, "No data found for AAPL");

        let fetch = Notification::for_error(&DownloadError::Fetch(
            FetchError::UnexpectedResponse("boom (HTTP 500)".to_string()),
        ));
        assert_eq!(fetch.title, "Error");
        assert_eq!(
            fetch.text,
            "Failed to fetch data: unexpected response: boom (HTTP 500)"
        );

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let csv = Notification::for_error(&DownloadError::Csv(csv::Error::from(io)));
        assert_eq!(csv.title, "Error");
        assert!(csv.text.starts_with("Failed to fetch data:"));
        assert!(csv.text.contains("denied"));
    }

    #[test]
    fn success_notification_names_the_file() {
        let n = Notification::saved("AAPL_stock_data.csv");
        assert_eq!(n.title, "Success");
        assert_eq!(n.text, "Data saved as AAPL_stock_data.csv");
    }
}
