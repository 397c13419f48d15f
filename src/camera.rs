use iced::{Point, Size};
use nalgebra::{Matrix4, Point3, Unit, UnitQuaternion, Vector3};

const MOUSE_SENSITIVITY: f32 = 0.5;
const ZOOM_SENSITIVITY: f32 = 1.0;
const MIN_DISTANCE: f32 = 5.0;
const MAX_DISTANCE: f32 = 50.0;
/// Stops short of the poles, where `up` would be parallel to the line of sight.
const MAX_PITCH: f32 = 89.0;

#[derive(Debug, Clone)]
pub(crate) struct Camera {
    pub(crate) eye: Point3<f32>,
    pub(crate) target: Point3<f32>,
    pub(crate) up: Vector3<f32>,
}

impl Camera {
    pub(crate) fn build_view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.eye, &self.target, &self.up)
    }

    /// Line of sight from the eye toward the target.
    pub(crate) fn view_direction(&self) -> Unit<Vector3<f32>> {
        Unit::new_normalize(self.target - self.eye)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Point3::new(0.0, 0.0, 15.0),
            target: Point3::origin(),
            up: Vector3::y(),
        }
    }
}

/// Orbits the camera around the cube at the origin; yaw and pitch are in degrees.
#[derive(Debug, Clone)]
pub(crate) struct CameraController {
    pub(crate) distance: f32,
    pub(crate) yaw: f32,
    pub(crate) pitch: f32,
}

impl CameraController {
    pub(crate) fn new(distance: f32) -> Self {
        Self {
            distance,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// Orientation of the orbit: pitch about X first, then yaw about Y.
    fn orbit(&self) -> UnitQuaternion<f32> {
        UnitQuaternion::from_euler_angles(-self.pitch.to_radians(), self.yaw.to_radians(), 0.0)
    }

    /// Eye position on the orbit sphere. Zero yaw and pitch sit on +Z.
    pub(crate) fn eye(&self) -> Point3<f32> {
        Point3::from(self.orbit() * Vector3::z() * self.distance)
    }

    /// Line of sight toward the cube, independent of zoom.
    pub(crate) fn view_direction(&self) -> Unit<Vector3<f32>> {
        Unit::new_normalize(-(self.orbit() * Vector3::z()))
    }

    pub(crate) fn update_camera(&self, camera: &mut Camera) {
        camera.eye = self.eye();
        camera.target = Point3::origin();
        camera.up = Vector3::y();
    }

    /// Right-drag by a pixel delta; dragging right swings the eye left.
    pub(crate) fn process_mouse_motion(&mut self, delta_x: f32, delta_y: f32) {
        self.yaw -= delta_x * MOUSE_SENSITIVITY;
        self.pitch = (self.pitch + delta_y * MOUSE_SENSITIVITY).clamp(-MAX_PITCH, MAX_PITCH);
    }

    pub(crate) fn process_scroll(&mut self, delta: f32) {
        self.distance -= delta * ZOOM_SENSITIVITY;
        self.distance = self.distance.clamp(MIN_DISTANCE, MAX_DISTANCE);
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Projection {
    pub(crate) aspect: f32,
    /// Vertical field of view in degrees.
    pub(crate) fovy: f32,
    pub(crate) znear: f32,
    pub(crate) zfar: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            aspect: 800.0 / 600.0,
            fovy: 45.0,
            znear: 0.1,
            zfar: 100.0,
        }
    }
}

impl Projection {
    pub(crate) fn build_projection_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fovy.to_radians(), self.znear, self.zfar)
    }

    /// Projects a world point onto a viewport of `size`, origin top-left.
    ///
    /// Returns `None` for points behind the camera.
    pub(crate) fn project(
        &self,
        camera: &Camera,
        point: &Point3<f32>,
        size: Size,
    ) -> Option<Point> {
        let view_proj = self.build_projection_matrix() * camera.build_view_matrix();
        let clip = view_proj * point.to_homogeneous();
        if clip.w <= f32::EPSILON {
            return None;
        }

        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        Some(Point::new(
            (ndc_x + 1.0) * 0.5 * size.width,
            (1.0 - ndc_y) * 0.5 * size.height,
        ))
    }
}
