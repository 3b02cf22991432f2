use anyhow::{Context, Result};
use carscene_car::{AppState, SceneConfig};
use carscene_input::{Action, KeyId};
use carscene_render::Renderer;
use carscene_render_wgpu::{FrameBuilder, WgpuRenderer};
use carscene_tools::SceneInspector;
use clap::Parser;
use egui::Context as EguiContext;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, KeyCode, NamedKey, PhysicalKey};
use winit::window::{Window, WindowId};

/// Touchpad pixels that count as one wheel notch.
const PIXELS_PER_LINE: f32 = 50.0;

#[derive(Parser)]
#[command(name = "carscene-desktop", about = "Drive a car around a lit scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scene config file (YAML)
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Text id for a logical key: arrow names, or the typed character.
fn logical_key_id(key: &Key) -> Option<KeyId> {
    match key {
        Key::Named(NamedKey::ArrowUp) => Some(KeyId::text("ArrowUp")),
        Key::Named(NamedKey::ArrowDown) => Some(KeyId::text("ArrowDown")),
        Key::Named(NamedKey::ArrowLeft) => Some(KeyId::text("ArrowLeft")),
        Key::Named(NamedKey::ArrowRight) => Some(KeyId::text("ArrowRight")),
        Key::Character(text) => Some(KeyId::text(text.as_str())),
        _ => None,
    }
}

/// Legacy numeric key code for a physical key.
fn legacy_code(code: KeyCode) -> Option<u32> {
    let value = match code {
        KeyCode::ArrowLeft => 37,
        KeyCode::ArrowUp => 38,
        KeyCode::ArrowRight => 39,
        KeyCode::ArrowDown => 40,
        KeyCode::KeyA => 65,
        KeyCode::KeyB => 66,
        KeyCode::KeyC => 67,
        KeyCode::KeyD => 68,
        KeyCode::KeyE => 69,
        KeyCode::KeyF => 70,
        KeyCode::KeyG => 71,
        KeyCode::KeyH => 72,
        KeyCode::KeyI => 73,
        KeyCode::KeyJ => 74,
        KeyCode::KeyK => 75,
        KeyCode::KeyL => 76,
        KeyCode::KeyM => 77,
        KeyCode::KeyN => 78,
        KeyCode::KeyO => 79,
        KeyCode::KeyP => 80,
        KeyCode::KeyQ => 81,
        KeyCode::KeyR => 82,
        KeyCode::KeyS => 83,
        KeyCode::KeyT => 84,
        KeyCode::KeyU => 85,
        KeyCode::KeyV => 86,
        KeyCode::KeyW => 87,
        KeyCode::KeyX => 88,
        KeyCode::KeyY => 89,
        KeyCode::KeyZ => 90,
        _ => return None,
    };
    Some(value)
}

/// Pick the key id for a key press: the logical key when it is bound,
/// else the physical key's legacy code.
fn key_id(state: &AppState, event: &KeyEvent) -> Option<KeyId> {
    let logical = logical_key_id(&event.logical_key);
    if logical.as_ref().is_some_and(|id| state.is_bound(id)) {
        return logical;
    }
    let code = match event.physical_key {
        PhysicalKey::Code(code) => legacy_code(code).map(KeyId::code),
        PhysicalKey::Unidentified(_) => None,
    };
    code.or(logical)
}

fn draw_hud(ctx: &EguiContext, state: &AppState) {
    let summary = SceneInspector::summary(&state.scene);
    let viewport = state.viewport();

    egui::SidePanel::left("hud")
        .default_width(260.0)
        .show(ctx, |ui| {
            ui.heading("Car Scene");
            ui.separator();
            ui.label(format!("Frames: {}  Ticks: {}", state.frames(), state.ticks()));
            ui.label(format!(
                "Nodes: {}  Meshes: {}  Triangles: {}",
                summary.nodes, summary.meshes, summary.triangles
            ));
            ui.label(format!("Scene events: {}", summary.events));
            ui.label(format!("Viewport: {}x{}", viewport.width, viewport.height));
            let cam = &state.camera;
            ui.label(format!(
                "Camera: ({:.1}, {:.1}, {:.1})",
                cam.position.x, cam.position.y, cam.position.z
            ));
            ui.separator();

            ui.heading("Car");
            match state.car_transform() {
                Some(t) => {
                    ui.label(format!(
                        "Position: ({:.1}, {:.1}, {:.1})",
                        t.position.x, t.position.y, t.position.z
                    ));
                    ui.label(format!("Yaw: {:.1}°", t.rotation.y.to_degrees()));
                }
                None => {
                    ui.label("not built");
                }
            }
            let action = state
                .input
                .current_action(&state.keymap)
                .map_or("-".to_string(), |a| a.to_string());
            ui.label(format!("Action: {action}"));
            ui.separator();

            ui.heading("Keys");
            for action in Action::ALL {
                ui.label(format!(
                    "{action}: {}",
                    state.keymap.keys_for(action).join(" ")
                ));
            }
            ui.separator();
            ui.small("F1: Toggle HUD | LMB drag: Orbit | RMB drag: Pan | Wheel: Zoom");
        });
}

/// GPU and window resources, created once the event loop resumes.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(
        event_loop: &ActiveEventLoop,
        scene_config: &SceneConfig,
        egui_ctx: &EguiContext,
    ) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(scene_config.window.title.clone())
            .with_inner_size(PhysicalSize::new(
                scene_config.window.width,
                scene_config.window.height,
            ));
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("find adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("carscene_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or(surface_caps.formats.first())
            .copied()
            .context("surface has no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(
            &device,
            surface_format,
            config.width,
            config.height,
            scene_config.clear_color(),
        );

        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
    }
}

struct GpuApp {
    state: AppState,
    scene_config: SceneConfig,
    gpu: Option<Gpu>,
    frames: FrameBuilder,
    egui_ctx: EguiContext,
    show_hud: bool,
    dragging: bool,
    panning: bool,
    last_cursor: Option<PhysicalPosition<f64>>,
    last_frame: Instant,
}

impl GpuApp {
    fn new(scene_config: SceneConfig) -> Self {
        let state = AppState::new(
            &scene_config,
            scene_config.window.width,
            scene_config.window.height,
        );
        Self {
            state,
            scene_config,
            gpu: None,
            frames: FrameBuilder::new(),
            egui_ctx: EguiContext::default(),
            show_hud: true,
            dragging: false,
            panning: false,
            last_cursor: None,
            last_frame: Instant::now(),
        }
    }

    fn handle_key(&mut self, event: &KeyEvent) {
        if event.state == ElementState::Released {
            self.state.key_up();
            return;
        }
        if event.physical_key == PhysicalKey::Code(KeyCode::F1) && !event.repeat {
            self.show_hud = !self.show_hud;
            return;
        }
        if let Some(id) = key_id(&self.state, event) {
            self.state.key_down(id);
        }
    }

    fn redraw(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f64();
        self.last_frame = now;
        self.state.frame(dt);

        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        gpu.renderer.upload_geometries(&gpu.device, &self.state.scene);
        let frame = self.frames.render(&self.state.scene, &self.state.camera);
        gpu.renderer.render(&gpu.device, &gpu.queue, &view, &frame);

        let raw_input = gpu.egui_winit.take_egui_input(&gpu.window);
        let show_hud = self.show_hud;
        let state = &self.state;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            if show_hud {
                draw_hud(ctx, state);
            }
        });

        gpu.egui_winit
            .handle_platform_output(&gpu.window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            gpu.egui_renderer
                .update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        gpu.egui_renderer.update_buffers(
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
            gpu.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            gpu.egui_renderer.free_texture(id);
        }

        output.present();
        gpu.window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match Gpu::new(event_loop, &self.scene_config, &self.egui_ctx) {
            Ok(gpu) => {
                let size = gpu.window.inner_size();
                self.state.resize(size.width, size.height);
                self.gpu = Some(gpu);
            }
            Err(e) => {
                tracing::error!("Gpu::new() : {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(gpu) = &mut self.gpu {
            let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                }
                self.state.resize(new_size.width, new_size.height);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.handle_key(&event);
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: btn_state,
                ..
            } => {
                self.dragging = btn_state == ElementState::Pressed;
            }
            WindowEvent::MouseInput {
                button: MouseButton::Right,
                state: btn_state,
                ..
            } => {
                self.panning = btn_state == ElementState::Pressed;
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(last) = self.last_cursor {
                    let (dx, dy) = ((position.x - last.x) as f32, (position.y - last.y) as f32);
                    if self.dragging {
                        self.state.drag(dx, dy);
                    } else if self.panning {
                        self.state.pan_drag(dx, dy);
                    }
                }
                self.last_cursor = Some(position);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_LINE,
                };
                self.state.scroll(lines);
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("carscene-desktop starting");

    let scene_config = match &cli.config {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SceneConfig::default(),
    };

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(scene_config);
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_and_letters_have_legacy_codes() {
        assert_eq!(legacy_code(KeyCode::ArrowUp), Some(38));
        assert_eq!(legacy_code(KeyCode::KeyW), Some(87));
        assert_eq!(legacy_code(KeyCode::KeyV), Some(86));
        assert_eq!(legacy_code(KeyCode::Escape), None);
    }

    #[test]
    fn logical_keys_become_text_ids() {
        assert_eq!(
            logical_key_id(&Key::Named(NamedKey::ArrowLeft)),
            Some(KeyId::text("ArrowLeft"))
        );
        assert_eq!(
            logical_key_id(&Key::Character("W".into())),
            Some(KeyId::text("w"))
        );
        assert_eq!(logical_key_id(&Key::Named(NamedKey::Enter)), None);
    }
}
