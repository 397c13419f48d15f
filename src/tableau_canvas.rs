//! Canvas program that draws the active tableau.
//!
//! The canvas owns no scene state. It reads the controller, the cube body and
//! the camera each frame, and turns pointer events into `Message`s for the
//! application to apply.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use iced::widget::canvas::{self, Frame, Geometry, Path, Stroke, event};
use iced::{Point, Rectangle, Renderer, Size, Theme, mouse, touch};
use nalgebra::Point2;

use crate::Message;
use crate::alignment::edge_colors;
use crate::camera::{Camera, Projection};
use crate::cube::{CubeBody, EDGES, FACES};
use crate::input::{InputState, normalize_pointer};
use crate::math::{color_from_hex, lerp_color, with_alpha};
use crate::scene::{SceneController, Tableau};
use crate::sequence::{TARGET_RADIUS, metatron_segments, target_at, target_centers};

const BACKGROUND: u32 = 0x15151C;
const CUBE_FACE: u32 = 0x000000;
const PLANET: u32 = 0xC9A66B;
const RING_DIM: u32 = 0x4A4238;
const RING_LIT: u32 = 0xFFE9A8;
const GLOW: u32 = 0xFFD700;
const PETAL: u32 = 0xFFFFFF;

/// Flower-plane units visible across the shorter side of the viewport.
const FLOWER_SPAN: f32 = 7.0;
/// Each petal circle passes through its neighbours' centers.
const PETAL_RADIUS: f32 = 1.0;
const RING_SEGMENTS: usize = 48;

/// Maps the flower plane (y up, origin at the center) onto the viewport.
#[derive(Debug, Clone, Copy)]
struct FlowerViewport {
    center: Point,
    scale: f32,
}

impl FlowerViewport {
    fn new(size: Size) -> Self {
        Self {
            center: Point::new(size.width * 0.5, size.height * 0.5),
            scale: size.width.min(size.height).max(1.0) / FLOWER_SPAN,
        }
    }

    fn to_screen(self, point: Point2<f32>) -> Point {
        Point::new(
            self.center.x + point.x * self.scale,
            self.center.y - point.y * self.scale,
        )
    }

    fn to_flower(self, point: Point) -> Point2<f32> {
        Point2::new(
            (point.x - self.center.x) / self.scale,
            (self.center.y - point.y) / self.scale,
        )
    }
}

pub(crate) struct TableauCanvas<'a> {
    scene: &'a SceneController,
    cube: &'a CubeBody,
    camera: &'a Camera,
    projection: Projection,
}

impl<'a> TableauCanvas<'a> {
    pub(crate) fn new(
        scene: &'a SceneController,
        cube: &'a CubeBody,
        camera: &'a Camera,
        projection: Projection,
    ) -> Self {
        Self {
            scene,
            cube,
            camera,
            projection,
        }
    }

    /// A press at `position`, relative to the canvas.
    fn press_at(&self, position: Point, size: Size) -> Message {
        let target = match self.scene.state().active_tableau {
            Tableau::Flower => target_at(FlowerViewport::new(size).to_flower(position)),
            _ => None,
        };
        Message::Pressed(target)
    }

    fn handle_mouse_event(
        &self,
        state: &mut InputState,
        mouse_event: mouse::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> (event::Status, Option<Message>) {
        match mouse_event {
            mouse::Event::CursorMoved { .. } => {
                let Some(position) = cursor.position_in(bounds) else {
                    return (event::Status::Ignored, None);
                };
                let message = match state.last_position {
                    Some(last) if state.is_right_mouse_pressed => {
                        Message::Orbit(position.x - last.x, position.y - last.y)
                    }
                    _ => {
                        let (x, y) = normalize_pointer(position, bounds.size());
                        Message::PointerMoved(x, y)
                    }
                };
                state.last_position = Some(position);
                (event::Status::Captured, Some(message))
            }
            mouse::Event::ButtonPressed(mouse::Button::Left) => {
                let Some(position) = cursor.position_in(bounds) else {
                    return (event::Status::Ignored, None);
                };
                (
                    event::Status::Captured,
                    Some(self.press_at(position, bounds.size())),
                )
            }
            mouse::Event::ButtonPressed(button) => {
                if cursor.position_in(bounds).is_none() {
                    return (event::Status::Ignored, None);
                }
                state.update_mouse_state(button, true);
                (event::Status::Captured, None)
            }
            mouse::Event::ButtonReleased(button) => {
                state.update_mouse_state(button, false);
                (event::Status::Ignored, None)
            }
            mouse::Event::WheelScrolled { delta } => {
                if cursor.position_in(bounds).is_none() {
                    return (event::Status::Ignored, None);
                }
                let scroll_delta = match delta {
                    mouse::ScrollDelta::Lines { y, .. } => y,
                    mouse::ScrollDelta::Pixels { y, .. } => y * 0.01,
                };
                (event::Status::Captured, Some(Message::Zoom(scroll_delta)))
            }
            mouse::Event::CursorEntered | mouse::Event::CursorLeft => {
                state.last_position = None;
                (event::Status::Ignored, None)
            }
        }
    }

    fn draw_cube(&self, frame: &mut Frame) {
        let size = frame.size();
        let projection = Projection {
            aspect: size.width / size.height.max(1.0),
            ..self.projection
        };

        let corners = self.cube.world_corners();
        let Some(screen) = corners
            .iter()
            .map(|corner| projection.project(self.camera, corner, size))
            .collect::<Option<Vec<_>>>()
        else {
            return;
        };

        // Painter's order: farthest face first.
        let mut faces: Vec<(f32, [usize; 4])> = FACES
            .iter()
            .map(|(corner_loop, _)| {
                let depth = corner_loop
                    .iter()
                    .map(|&i| nalgebra::distance(&corners[i], &self.camera.eye))
                    .sum::<f32>();
                (depth, *corner_loop)
            })
            .collect();
        faces.sort_by(|a, b| b.0.total_cmp(&a.0));

        let face_color = with_alpha(color_from_hex(CUBE_FACE), self.cube.opacity());
        for (_, corner_loop) in faces {
            let path = Path::new(|builder| {
                builder.move_to(screen[corner_loop[0]]);
                for &i in &corner_loop[1..] {
                    builder.line_to(screen[i]);
                }
                builder.close();
            });
            frame.fill(&path, face_color);
        }

        let level = self.scene.alignment().level;
        let colors = edge_colors(level, &self.camera.view_direction(), self.cube.rotation());
        for (&(a, b), color) in EDGES.iter().zip(colors) {
            frame.stroke(
                &Path::line(screen[a], screen[b]),
                Stroke::default().with_color(color).with_width(2.0),
            );
        }
    }

    fn draw_saturn(&self, frame: &mut Frame) {
        let center = frame.center();
        let size = frame.size();
        let radius = size.width.min(size.height) * 0.15;
        let ring_color = lerp_color(RING_DIM, RING_LIT, self.scene.clock().emissive_intensity());
        let ring_stroke = Stroke::default().with_color(ring_color).with_width(6.0);

        let ring_arc = |from: f32, to: f32| {
            Path::new(|builder| {
                for step in 0..=RING_SEGMENTS {
                    let angle = from + (to - from) * step as f32 / RING_SEGMENTS as f32;
                    let point = Point::new(
                        center.x + radius * 2.2 * angle.cos(),
                        center.y + radius * 0.55 * angle.sin(),
                    );
                    if step == 0 {
                        builder.move_to(point);
                    } else {
                        builder.line_to(point);
                    }
                }
            })
        };

        // The far half of the ring passes behind the planet.
        frame.stroke(&ring_arc(PI, TAU), ring_stroke);
        frame.fill(&Path::circle(center, radius), color_from_hex(PLANET));
        frame.stroke(&ring_arc(0.0, PI), ring_stroke);
    }

    fn draw_triangle(&self, frame: &mut Frame) {
        let center = frame.center();
        let size = frame.size();
        let radius = size.width.min(size.height) * 0.3;
        let breath = self.scene.breath();

        let triangle = Path::new(|builder| {
            for k in 0..3 {
                let angle = -FRAC_PI_2 + k as f32 * TAU / 3.0;
                let point = Point::new(
                    center.x + radius * angle.cos(),
                    center.y + radius * angle.sin(),
                );
                if k == 0 {
                    builder.move_to(point);
                } else {
                    builder.line_to(point);
                }
            }
            builder.close();
        });

        if breath.glow_active() {
            frame.stroke(
                &triangle,
                Stroke::default()
                    .with_color(with_alpha(color_from_hex(GLOW), 0.6))
                    .with_width(14.0),
            );
        }
        frame.fill(&triangle, breath.color());
    }

    fn draw_flower(&self, frame: &mut Frame) {
        let viewport = FlowerViewport::new(frame.size());
        let sequence = self.scene.sequence();
        let centers = target_centers();

        for (id, center) in centers.iter().enumerate() {
            let opacity = sequence.target_opacity(id as u32);
            if opacity <= 0.0 {
                continue;
            }
            let screen = viewport.to_screen(*center);
            frame.stroke(
                &Path::circle(screen, PETAL_RADIUS * viewport.scale),
                Stroke::default()
                    .with_color(with_alpha(color_from_hex(PETAL), opacity * 0.6))
                    .with_width(1.5),
            );
            frame.fill(
                &Path::circle(screen, TARGET_RADIUS * viewport.scale),
                with_alpha(color_from_hex(PETAL), opacity * 0.25),
            );
        }

        if !sequence.overlay_visible() {
            return;
        }

        let overlay = Stroke::default()
            .with_color(with_alpha(color_from_hex(GLOW), 0.8))
            .with_width(1.5);
        for (a, b) in metatron_segments() {
            frame.stroke(&Path::line(viewport.to_screen(a), viewport.to_screen(b)), overlay);
        }
        for center in &centers {
            frame.stroke(
                &Path::circle(viewport.to_screen(*center), TARGET_RADIUS * viewport.scale),
                overlay,
            );
        }
    }
}

impl canvas::Program<Message> for TableauCanvas<'_> {
    type State = InputState;

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> (event::Status, Option<Message>) {
        match event {
            canvas::Event::Mouse(mouse_event) => {
                self.handle_mouse_event(state, mouse_event, bounds, cursor)
            }
            canvas::Event::Touch(touch::Event::FingerPressed { position, .. }) => {
                if !bounds.contains(position) {
                    return (event::Status::Ignored, None);
                }
                let local = Point::new(position.x - bounds.x, position.y - bounds.y);
                (
                    event::Status::Captured,
                    Some(self.press_at(local, bounds.size())),
                )
            }
            _ => (event::Status::Ignored, None),
        }
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(Point::ORIGIN, bounds.size(), color_from_hex(BACKGROUND));

        match self.scene.state().active_tableau {
            Tableau::Cube => self.draw_cube(&mut frame),
            Tableau::Saturn => self.draw_saturn(&mut frame),
            Tableau::Triangle => self.draw_triangle(&mut frame),
            Tableau::Flower => self.draw_flower(&mut frame),
        }

        vec![frame.into_geometry()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flower_viewport_round_trips_the_center_target() {
        let viewport = FlowerViewport::new(Size::new(700.0, 700.0));
        assert_eq!(viewport.to_screen(Point2::origin()), Point::new(350.0, 350.0));
        let on_screen = viewport.to_screen(target_centers()[4]);
        assert_eq!(target_at(viewport.to_flower(on_screen)), Some(4));
    }

    #[test]
    fn flower_y_axis_points_up() {
        let viewport = FlowerViewport::new(Size::new(700.0, 700.0));
        let above = viewport.to_flower(Point::new(350.0, 250.0));
        assert!(above.y > 0.0);
    }

    #[test]
    fn presses_resolve_targets_only_on_the_flower() {
        let mut scene = SceneController::new();
        let cube = CubeBody::new();
        let camera = Camera::default();
        let size = Size::new(700.0, 700.0);
        let center = Point::new(350.0, 350.0);

        let canvas = TableauCanvas::new(&scene, &cube, &camera, Projection::default());
        assert!(matches!(canvas.press_at(center, size), Message::Pressed(None)));

        scene.show(Tableau::Flower);
        let canvas = TableauCanvas::new(&scene, &cube, &camera, Projection::default());
        assert!(matches!(canvas.press_at(center, size), Message::Pressed(Some(0))));
        assert!(matches!(
            canvas.press_at(Point::new(5.0, 5.0), size),
            Message::Pressed(None)
        ));
    }
}
