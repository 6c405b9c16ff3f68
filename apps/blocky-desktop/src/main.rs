use anyhow::Result;
use blocky_input::{Action, ShapeList, SketchBrush, SurfaceSize, to_clip_space};
use blocky_kernel::{AppState, Config, Joint};
use blocky_render::{FrameReport, FrameScheduler};
use blocky_render_wgpu::{GpuContext, WgpuRenderer};
use blocky_tools::SceneInspector;
use clap::Parser;
use egui::Context as EguiContext;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "blocky-desktop", about = "Blocky animal desktop application")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Initial window width in pixels
    #[arg(long, default_value = "600")]
    width: u32,

    /// Initial window height in pixels
    #[arg(long, default_value = "600")]
    height: u32,
}

/// Everything the window owns apart from GPU resources.
struct DesktopState {
    state: AppState,
    scheduler: FrameScheduler,
    brush: SketchBrush,
    shapes: ShapeList,
    last_report: Option<FrameReport>,
    cursor: Option<(f64, f64)>,
    primary_held: bool,
}

impl DesktopState {
    fn new(config: &Config) -> Self {
        Self {
            state: AppState::new(),
            scheduler: FrameScheduler::new(config),
            brush: SketchBrush::default(),
            shapes: ShapeList::new(),
            last_report: None,
            cursor: None,
            primary_held: false,
        }
    }

    /// Returns `true` when the scene should be redrawn.
    fn dispatch(&mut self, action: &Action) -> bool {
        blocky_input::apply(action, &mut self.state, &self.brush, &mut self.shapes)
    }

    /// Primary button change. A release always ends the drag, even over the
    /// panel; a press over the panel never starts one.
    fn primary_button(
        &mut self,
        pressed: bool,
        over_ui: bool,
        surface: Option<SurfaceSize>,
    ) -> bool {
        if !pressed || over_ui {
            self.primary_held = false;
            return false;
        }
        self.primary_held = true;
        surface.is_some_and(|s| self.sketch_at_cursor(s))
    }

    fn cursor_moved(
        &mut self,
        x: f64,
        y: f64,
        over_ui: bool,
        surface: Option<SurfaceSize>,
    ) -> bool {
        self.cursor = Some((x, y));
        if !self.primary_held || over_ui {
            return false;
        }
        surface.is_some_and(|s| self.sketch_at_cursor(s))
    }

    /// Cursor left the window or the window lost focus.
    fn pointer_lost(&mut self) {
        self.cursor = None;
        self.primary_held = false;
    }

    fn sketch_at_cursor(&mut self, surface: SurfaceSize) -> bool {
        let Some((x, y)) = self.cursor else {
            return false;
        };
        match to_clip_space(x, y, surface) {
            Ok(coords) => self.dispatch(&Action::Sketch(coords)),
            Err(e) => {
                tracing::debug!("ignoring pointer input: {e}");
                false
            }
        }
    }

    /// Build the control panel and collect the actions it produced.
    fn draw_ui(&self, ctx: &EguiContext) -> Vec<Action> {
        let mut actions = Vec::new();
        let summary = SceneInspector::summary(self.scheduler.arena(), &self.state);

        egui::SidePanel::left("controls")
            .default_width(240.0)
            .show(ctx, |ui| {
                ui.heading("Blocky Animal");
                ui.separator();

                for (joint, name) in [(Joint::Yellow, "Yellow"), (Joint::Magenta, "Magenta")] {
                    ui.horizontal(|ui| {
                        ui.label(format!("{name} animation:"));
                        if ui.button("On").clicked() {
                            actions.push(Action::SetAnimation { joint, on: true });
                        }
                        if ui.button("Off").clicked() {
                            actions.push(Action::SetAnimation { joint, on: false });
                        }
                    });
                }
                ui.separator();

                let mut global = self.state.global_angle;
                if ui
                    .add(egui::Slider::new(&mut global, 0.0..=360.0).text("Camera angle"))
                    .changed()
                {
                    actions.push(Action::SetGlobalAngle(global));
                }
                for (joint, name) in [(Joint::Yellow, "Yellow"), (Joint::Magenta, "Magenta")] {
                    let mut degrees = self.state.angle(joint);
                    if ui
                        .add(egui::Slider::new(&mut degrees, -45.0..=45.0).text(name))
                        .changed()
                    {
                        actions.push(Action::SetAngle { joint, degrees });
                    }
                }

                ui.separator();
                match &self.last_report {
                    Some(report) => ui.monospace(report.telemetry.to_string()),
                    None => ui.monospace("no frames yet"),
                };
                ui.small(summary.to_string());
                ui.label(format!("Sketch shapes: {}", self.shapes.len()));
            });

        actions
    }
}

/// GPU resources, created once the window exists.
struct Graphics {
    gpu: GpuContext,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

struct GpuApp {
    desktop: DesktopState,
    scene_capacity: usize,
    initial_size: PhysicalSize<u32>,
    window: Option<Arc<Window>>,
    graphics: Option<Graphics>,
    egui_ctx: EguiContext,
}

impl GpuApp {
    fn new(config: &Config, initial_size: PhysicalSize<u32>) -> Self {
        Self {
            desktop: DesktopState::new(config),
            scene_capacity: config.scene_capacity,
            initial_size,
            window: None,
            graphics: None,
            egui_ctx: EguiContext::default(),
        }
    }

    fn surface_size(&self) -> Option<SurfaceSize> {
        self.graphics.as_ref().map(|g| {
            let (width, height) = g.gpu.size();
            SurfaceSize::new(width, height)
        })
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn redraw(&mut self) {
        let (Some(window), Some(graphics)) = (&self.window, &mut self.graphics) else {
            return;
        };
        let Graphics {
            gpu,
            renderer,
            egui_winit,
            egui_renderer,
        } = graphics;

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.reconfigure();
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        // Controls first, so slider changes show up in this frame.
        let raw_input = egui_winit.take_egui_input(window);
        let desktop = &self.desktop;
        let mut actions = Vec::new();
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            actions = desktop.draw_ui(ctx);
        });
        egui_winit.handle_platform_output(window, full_output.platform_output);
        for action in &actions {
            self.desktop.dispatch(action);
        }

        let report = self.desktop.scheduler.frame(
            &mut self.desktop.state,
            renderer.recorder_mut(),
            Instant::now(),
        );
        self.desktop.last_report = Some(report);
        renderer.submit(&gpu.device, &gpu.queue, &output.texture);

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let (width, height) = gpu.size();
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            egui_renderer.update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            egui_renderer.free_texture(id);
        }

        output.present();
        window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("Blocky Animal")
            .with_inner_size(self.initial_size);
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                tracing::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        let graphics = GpuContext::new(window.clone(), size.width, size.height).and_then(|gpu| {
            let renderer = WgpuRenderer::new(
                &gpu.device,
                gpu.format(),
                size.width,
                size.height,
                self.scene_capacity,
            )?;
            Ok((gpu, renderer))
        });
        let (gpu, renderer) = match graphics {
            Ok(parts) => parts,
            Err(e) => {
                tracing::error!("graphics setup failed: {e}");
                event_loop.exit();
                return;
            }
        };

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&gpu.device, gpu.format(), None, 1, false);

        self.graphics = Some(Graphics {
            gpu,
            renderer,
            egui_winit,
            egui_renderer,
        });
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let consumed = match (&self.window, &mut self.graphics) {
            (Some(window), Some(graphics)) => {
                graphics.egui_winit.on_window_event(window, &event).consumed
            }
            _ => false,
        };

        match event {
            // Pointer state is tracked even when the panel consumed the event.
            WindowEvent::CursorMoved { position, .. } => {
                let surface = self.surface_size();
                if self
                    .desktop
                    .cursor_moved(position.x, position.y, consumed, surface)
                {
                    self.request_redraw();
                }
            }
            WindowEvent::CursorLeft { .. } | WindowEvent::Focused(false) => {
                self.desktop.pointer_lost();
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: btn_state,
                ..
            } => {
                let surface = self.surface_size();
                let pressed = btn_state == ElementState::Pressed;
                if self.desktop.primary_button(pressed, consumed, surface) {
                    self.request_redraw();
                }
            }
            _ if consumed => {}
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(graphics) = &mut self.graphics {
                    graphics.gpu.resize(new_size.width, new_size.height);
                    let (width, height) = graphics.gpu.size();
                    graphics.renderer.resize(&graphics.gpu.device, width, height);
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        self.request_redraw();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = Config::load_or_default(cli.config.as_deref())?;
    config.validate()?;

    tracing::info!("blocky-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(&config, PhysicalSize::new(cli.width, cli.height));
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SURFACE: Option<SurfaceSize> = Some(SurfaceSize::new(400, 400));

    fn desktop() -> DesktopState {
        DesktopState::new(&Config::default())
    }

    #[test]
    fn drag_on_canvas_appends_shapes() {
        let mut d = desktop();
        d.cursor_moved(100.0, 100.0, false, SURFACE);
        assert!(d.primary_button(true, false, SURFACE));
        assert!(d.cursor_moved(120.0, 100.0, false, SURFACE));
        assert_eq!(d.shapes.len(), 2);
    }

    #[test]
    fn moving_without_button_appends_nothing() {
        let mut d = desktop();
        assert!(!d.cursor_moved(100.0, 100.0, false, SURFACE));
        assert!(d.shapes.is_empty());
    }

    #[test]
    fn release_over_panel_ends_drag() {
        let mut d = desktop();
        d.cursor_moved(300.0, 200.0, false, SURFACE);
        d.primary_button(true, false, SURFACE);
        d.cursor_moved(10.0, 200.0, true, SURFACE);
        d.primary_button(false, true, SURFACE);
        assert!(!d.primary_held);

        let before = d.shapes.len();
        assert!(!d.cursor_moved(300.0, 250.0, false, SURFACE));
        assert_eq!(d.shapes.len(), before);
    }

    #[test]
    fn press_over_panel_does_not_sketch() {
        let mut d = desktop();
        d.cursor_moved(10.0, 10.0, true, SURFACE);
        assert!(!d.primary_button(true, true, SURFACE));
        assert!(!d.primary_held);
        assert!(d.shapes.is_empty());
    }

    #[test]
    fn losing_the_pointer_ends_drag() {
        let mut d = desktop();
        d.cursor_moved(200.0, 200.0, false, SURFACE);
        d.primary_button(true, false, SURFACE);
        d.pointer_lost();
        assert!(!d.primary_held);
        assert!(!d.cursor_moved(210.0, 200.0, false, SURFACE));
        assert_eq!(d.shapes.len(), 1);
    }

    #[test]
    fn drag_points_map_to_clip_space() {
        let mut d = desktop();
        d.cursor_moved(200.0, 200.0, false, SURFACE);
        d.primary_button(true, false, SURFACE);
        let coords = d.shapes.shapes()[0].coords;
        assert_eq!((coords.x, coords.y), (0.0, 0.0));
    }
}
