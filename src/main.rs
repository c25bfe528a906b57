use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use scene_viewer::camera::{Camera, ModeBank, ModeKind};
use scene_viewer::cli::Cli;
use scene_viewer::config::Config;
use scene_viewer::core::{Button, Controller, WinitController};
use scene_viewer::frame::FrameClock;
use scene_viewer::lights::SPOT_STEER_STEP;
use scene_viewer::renderer::Renderer;
use scene_viewer::scene::{demo_scene, Scene};

struct App {
    cli: Cli,
    config: Config,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    input: Option<WinitController>,
    camera: Camera,
    bank: ModeBank,
    scene: Scene,
    clock: FrameClock,
}

impl App {
    fn new(cli: Cli, config: Config) -> Self {
        let (scene, cube) = demo_scene();

        let mut bank = config.mode_bank();
        bank.third_person.attached = Some(cube);

        let camera = Camera::new(cli.width, cli.height, config.start_position());

        Self {
            cli,
            config,
            window: None,
            renderer: None,
            input: None,
            camera,
            bank,
            scene,
            clock: FrameClock::new(),
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Self {
            renderer,
            window,
            input,
            camera,
            bank,
            scene,
            clock,
            config,
            ..
        } = self;
        let (Some(renderer), Some(window), Some(input)) =
            (renderer.as_mut(), window.as_ref(), input.as_mut())
        else {
            return;
        };

        if input.is_down(Button::Quit) {
            event_loop.exit();
            return;
        }

        let frame = clock.tick();

        // Mode selection: unconditional assignment, polled while held
        if input.is_down(Button::SelectFirstPerson) {
            bank.switch(camera, ModeKind::FirstPerson);
        }
        if input.is_down(Button::SelectThirdPerson) {
            bank.switch(camera, ModeKind::ThirdPerson);
        }
        if input.is_down(Button::SelectOrbital) {
            bank.switch(camera, ModeKind::Orbital);
        }

        // Spotlight steering
        if input.is_down(Button::SpotYawLeft) {
            scene.lights.spot.yaw(SPOT_STEER_STEP);
        }
        if input.is_down(Button::SpotYawRight) {
            scene.lights.spot.yaw(-SPOT_STEER_STEP);
        }
        if input.is_down(Button::SpotPitchUp) {
            scene.lights.spot.pitch(SPOT_STEER_STEP);
        }
        if input.is_down(Button::SpotPitchDown) {
            scene.lights.spot.pitch(-SPOT_STEER_STEP);
        }

        scene.update(frame.time);
        camera.process_input(input, scene);
        camera.update_view_projection(config.fov_deg, config.near_plane, config.far_plane);

        let mode_label = match camera.mode.kind() {
            ModeKind::FirstPerson => "first person",
            ModeKind::ThirdPerson => "third person",
            ModeKind::Orbital => "orbital",
        };

        if let Err(e) = renderer.render(camera, scene, window, &frame, clock.fps(), mode_label) {
            log::error!("render error: {e}");
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let window = match event_loop.create_window(
                Window::default_attributes()
                    .with_title("Scene Viewer")
                    .with_inner_size(winit::dpi::PhysicalSize::new(
                        self.cli.width,
                        self.cli.height,
                    ))
                    .with_resizable(false),
            ) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    log::error!("failed to create window: {e}");
                    event_loop.exit();
                    return;
                }
            };

            let renderer =
                match pollster::block_on(Renderer::new(window.clone(), &self.scene, self.cli.no_ui))
                {
                    Ok(r) => r,
                    Err(e) => {
                        log::error!("failed to initialize renderer: {e:#}");
                        event_loop.exit();
                        return;
                    }
                };

            self.input = Some(WinitController::new(window.clone()));
            self.window = Some(window);
            self.renderer = Some(renderer);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Let egui see the event first
        if let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) {
            if renderer.handle_event(window, &event) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            other => {
                if let Some(input) = &mut self.input {
                    input.process_event(&other);
                }
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let event_loop = EventLoop::new()?;
    let mut app = App::new(cli, config);

    log::info!(
        "controls: WASD + Space/Ctrl move, Shift boost, 1/2/3 camera modes, \
         left mouse orbits, arrows steer the spotlight, Esc quits"
    );
    event_loop.run_app(&mut app)?;

    Ok(())
}
