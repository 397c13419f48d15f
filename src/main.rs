//! Black cube: an interactive piece of hidden geometry.
//!
//! A slowly turning black cube keeps a secret that only shows when it is
//! viewed straight down one of its corner diagonals. Each secret opens the
//! next tableau: Saturn, a breathing triangle and the Flower of Life. Uses
//! iced for the window and canvas, and nalgebra for the geometry.

use std::time::Duration;

use iced::time::Instant;
use iced::widget::{Column, Row, button, canvas, container, text};
use iced::{Element, Length, Settings, Subscription, Task, Theme, keyboard, window};

mod alignment;
mod breath;
mod camera;
mod clock_gate;
mod cube;
mod input;
mod math;
mod options;
mod scene;
mod sequence;
mod tableau_canvas;

use camera::{Camera, CameraController, Projection};
use cube::CubeBody;
use input::KeyAction;
use options::LaunchOptions;
use scene::{SceneController, Secret, Tableau};
use sequence::TARGET_COUNT;
use tableau_canvas::TableauCanvas;

const CAMERA_DISTANCE: f32 = 15.0;
const CONTROLS_WIDTH: u16 = 220;

/// Messages that the application can receive
#[derive(Debug, Clone)]
pub(crate) enum Message {
    Frame(Instant),
    PointerMoved(f32, f32),
    Orbit(f32, f32),
    Zoom(f32),
    /// Left click or tap on the viewport, with the flower target under it.
    Pressed(Option<u32>),
    Key(KeyAction),
    Show(Tableau),
    ToggleAutoRotate,
    Reset,
}

/// Application state: the scene controller plus everything the canvas needs to draw it.
pub(crate) struct BlackCubeApp {
    scene: SceneController,
    cube: CubeBody,
    camera: Camera,
    camera_controller: CameraController,
    projection: Projection,
    started: Instant,
    last_frame: Option<Instant>,
}

impl BlackCubeApp {
    pub(crate) fn new(options: &LaunchOptions) -> Self {
        let mut scene = SceneController::new();
        if options.magic {
            scene.enable_magic();
        }

        let mut camera = Camera::default();
        let camera_controller = CameraController::new(CAMERA_DISTANCE);
        camera_controller.update_camera(&mut camera);

        Self {
            scene,
            cube: CubeBody::new(),
            camera,
            camera_controller,
            projection: Projection::default(),
            started: Instant::now(),
            last_frame: None,
        }
    }

    pub(crate) fn title(&self) -> &'static str {
        "Black Cube"
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn elapsed(&self, instant: Instant) -> Duration {
        instant.saturating_duration_since(self.started)
    }

    /// Per-frame step: camera, cube body, then the scene's gates.
    fn advance(&mut self, instant: Instant) {
        let dt = self
            .last_frame
            .map_or(0.0, |last| instant.saturating_duration_since(last).as_secs_f32());
        self.last_frame = Some(instant);

        self.camera_controller.update_camera(&mut self.camera);

        let state = self.scene.state();
        self.cube.update(
            dt,
            state.auto_rotate,
            (state.pointer_x, state.pointer_y),
            self.scene.alignment().level.opacity_target(),
        );

        let now = self.elapsed(instant);
        let view_direction = self.camera_controller.view_direction();
        self.scene.tick(now, &view_direction, self.cube.rotation());
    }

    pub(crate) fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Frame(instant) => self.advance(instant),
            Message::PointerMoved(x, y) => self.scene.set_pointer(x, y),
            Message::Orbit(delta_x, delta_y) => {
                self.camera_controller.process_mouse_motion(delta_x, delta_y);
            }
            Message::Zoom(delta) => self.camera_controller.process_scroll(delta),
            Message::Pressed(target) => {
                let now = self.elapsed(Instant::now());
                let wall_clock = chrono::Local::now().time();
                self.scene.on_press(now, &wall_clock, target);
            }
            Message::Key(KeyAction::ToggleAutoRotate) | Message::ToggleAutoRotate => {
                self.scene.toggle_auto_rotate();
            }
            Message::Key(KeyAction::ForceAutoRotate) => self.scene.set_auto_rotate(true),
            Message::Show(tableau) => self.scene.show(tableau),
            Message::Reset => {
                self.scene.reset();
                self.cube = CubeBody::new();
            }
        }

        Task::none()
    }

    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            window::frames().map(Message::Frame),
            keyboard::on_key_press(key_binding),
        ])
    }

    /// Status lines for the active tableau and the unlock flags
    fn status(&self) -> Column<'_, Message> {
        let state = self.scene.state();
        let detail = match state.active_tableau {
            Tableau::Cube => format!("reveal strength {:.3}", self.scene.alignment().strength),
            Tableau::Saturn => format!("strikes {}/3", self.scene.clock().counter()),
            Tableau::Triangle => {
                let breath = self.scene.breath();
                format!(
                    "{} ({:.2}) - hits {}/3",
                    breath.phase(),
                    breath.intensity(),
                    breath.counter()
                )
            }
            Tableau::Flower => {
                let sequence = self.scene.sequence();
                if sequence.is_completed() {
                    "pattern complete".to_owned()
                } else {
                    format!("{}/{TARGET_COUNT}", sequence.clicks_received().len())
                }
            }
        };

        let secrets = [
            ("Cube", Secret::Cube),
            ("Saturn", Secret::Saturn),
            ("Trinity", Secret::Trinity),
        ];
        let header = Column::new().spacing(5).push(text(detail));
        let header = if self.scene.is_magic() {
            header.push(text("magic mode"))
        } else {
            header
        };
        secrets.into_iter().fold(header, |column, (name, secret)| {
            let status = if state.is_unlocked(secret) {
                "unlocked"
            } else {
                "locked"
            };
            column.push(text(format!("{name}: {status}")))
        })
    }

    /// Create the view for the application
    pub(crate) fn view(&self) -> Element<'_, Message> {
        let state = self.scene.state();

        // Left pane with controls
        let navigation = Tableau::ALL.iter().fold(
            Column::new().spacing(5).push(text("Tableaux")),
            |column, &tableau| {
                column.push(
                    button(text(tableau.to_string()))
                        .width(CONTROLS_WIDTH)
                        .on_press_maybe(
                            self.scene
                                .is_available(tableau)
                                .then_some(Message::Show(tableau)),
                        ),
                )
            },
        );

        let mut controls = Column::new().spacing(20).push(navigation);
        if state.active_tableau == Tableau::Cube {
            let label = if state.auto_rotate {
                "Auto-rotate: on"
            } else {
                "Auto-rotate: off"
            };
            controls = controls.push(
                button(text(label))
                    .width(CONTROLS_WIDTH)
                    .on_press(Message::ToggleAutoRotate),
            );
        }
        let controls = controls
            .push(self.status())
            .push(button(text("Reset")).on_press(Message::Reset));

        // Right pane with the active tableau
        let viewport = canvas(TableauCanvas::new(
            &self.scene,
            &self.cube,
            &self.camera,
            self.projection,
        ))
        .width(Length::Fill)
        .height(Length::Fill);

        Row::new()
            .spacing(10)
            .padding(10)
            .push(container(controls).width(Length::Shrink).height(Length::Fill))
            .push(viewport)
            .into()
    }
}

fn key_binding(key: keyboard::Key, _modifiers: keyboard::Modifiers) -> Option<Message> {
    input::key_action(&key).map(Message::Key)
}

/// Entry point for the black cube application
fn main() -> iced::Result {
    env_logger::builder().format_timestamp(None).init();

    let options = LaunchOptions::from_args(std::env::args().skip(1));
    let app = BlackCubeApp::new(&options);
    iced::application(app.title(), BlackCubeApp::update, BlackCubeApp::view)
        .subscription(BlackCubeApp::subscription)
        .theme(BlackCubeApp::theme)
        .settings(Settings {
            antialiasing: true,
            ..Settings::default()
        })
        .run_with(move || (app, Task::none()))
}
