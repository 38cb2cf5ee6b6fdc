use crate::config::MAX_DELTA_TIME;
use crate::core::input::{self, InputState};
use crate::core::surface::{self, Surface};
use crate::game::Mode;
use crate::highway::HighwayMode;
use crate::settings::Settings;
use pixels::{Pixels, PixelsBuilder, SurfaceTexture};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use log::{error, info};
use std::{error::Error, sync::Arc, time::Instant};

pub struct App {
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    surface: Surface,
    mode: Box<dyn Mode>,
    input_state: InputState,
    last_frame_time: Instant,
    settings: Settings,
}

impl App {
    fn new(settings: Settings) -> Self {
        App {
            window: None,
            pixels: None,
            surface: Surface::new(),
            mode: Box::new(HighwayMode::new(settings.seed)),
            input_state: input::init_state(),
            last_frame_time: Instant::now(),
            settings,
        }
    }

    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> Result<(), Box<dyn Error>> {
        let edge = surface::WIDTH as u32 * self.settings.window_scale;
        let window_attributes = Window::default_attributes()
            .with_title("Highway 64")
            .with_inner_size(PhysicalSize::new(edge, edge))
            .with_resizable(true);
        let window = Arc::new(event_loop.create_window(window_attributes)?);

        let size = window.inner_size();
        let surface_texture = SurfaceTexture::new(size.width, size.height, window.clone());
        let pixels = PixelsBuilder::new(
            surface::WIDTH as u32,
            surface::HEIGHT as u32,
            surface_texture,
        )
        .enable_vsync(self.settings.vsync)
        .build()?;

        self.window = Some(window);
        self.pixels = Some(pixels);
        self.last_frame_time = Instant::now();
        info!("starting event loop");
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init_graphics(event_loop) {
                error!("failed to initialize graphics: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(window) = self.window.as_ref().cloned() else {
            return;
        };
        if window_id != window.id() {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                info!("close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if new_size.width > 0 && new_size.height > 0 {
                    if let Some(pixels) = &mut self.pixels {
                        if let Err(e) = pixels.resize_surface(new_size.width, new_size.height) {
                            error!("failed to resize surface: {}", e);
                            event_loop.exit();
                        }
                    }
                }
            }
            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if key_event.state == winit::event::ElementState::Pressed {
                    if let winit::keyboard::PhysicalKey::Code(winit::keyboard::KeyCode::Escape) =
                        key_event.physical_key
                    {
                        event_loop.exit();
                        return;
                    }
                }
                input::handle_keyboard_input(&key_event, &mut self.input_state);
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let delta_time = now
                    .duration_since(self.last_frame_time)
                    .as_secs_f32()
                    .min(MAX_DELTA_TIME);
                self.last_frame_time = now;

                self.mode.tick(&mut self.surface, &self.input_state, delta_time);
                self.input_state.end_frame();

                if let Some(pixels) = &mut self.pixels {
                    self.surface.copy_to_rgba(pixels.frame_mut());
                    if let Err(e) = pixels.render() {
                        error!("failed to present frame: {}", e);
                        event_loop.exit();
                    }
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

pub fn run(settings: Settings) -> Result<(), Box<dyn Error>> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new(settings);
    event_loop.run_app(&mut app)?;
    Ok(())
}
