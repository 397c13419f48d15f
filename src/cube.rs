//! Black cube geometry and the rotating cube body.
//!
//! The cube is modelled in its local frame as the corners `(±1, ±1, ±1)`.
//! Corner order doubles as a bit pattern: bit 0 is +X, bit 1 is +Y, bit 2 is +Z.

use nalgebra::{Point3, UnitQuaternion, Vector3};

use crate::math::{ease_toward, pointer_rotation};

/// Half of the rendered edge length in world units.
pub(crate) const CUBE_HALF_SIZE: f32 = 2.0;

/// Auto-rotation angular speeds in radians per second.
const AUTO_SPIN_X: f32 = 0.3;
const AUTO_SPIN_Y: f32 = 0.45;

/// Fraction of the remaining gap to the pointer orientation closed per second.
const MANUAL_FOLLOW_RATE: f32 = 6.0;
/// Fraction of the remaining opacity gap closed per second.
const OPACITY_FOLLOW_RATE: f32 = 3.0;

/// The 8 corners of the unit cube in local space.
#[rustfmt::skip]
pub(crate) const CORNERS: [Vector3<f32>; 8] = [
    Vector3::new(-1.0, -1.0, -1.0), // 0
    Vector3::new( 1.0, -1.0, -1.0), // 1
    Vector3::new(-1.0,  1.0, -1.0), // 2
    Vector3::new( 1.0,  1.0, -1.0), // 3
    Vector3::new(-1.0, -1.0,  1.0), // 4
    Vector3::new( 1.0, -1.0,  1.0), // 5
    Vector3::new(-1.0,  1.0,  1.0), // 6
    Vector3::new( 1.0,  1.0,  1.0), // 7
];

/// The 12 edges as pairs of corner indices differing in exactly one bit.
#[rustfmt::skip]
pub(crate) const EDGES: [(usize, usize); 12] = [
    // along X
    (0, 1), (2, 3), (4, 5), (6, 7),
    // along Y
    (0, 2), (1, 3), (4, 6), (5, 7),
    // along Z
    (0, 4), (1, 5), (2, 6), (3, 7),
];

/// The 6 faces as corner loops, each with its outward normal.
#[rustfmt::skip]
pub(crate) const FACES: [([usize; 4], Vector3<f32>); 6] = [
    ([0, 2, 6, 4], Vector3::new(-1.0,  0.0,  0.0)),
    ([1, 5, 7, 3], Vector3::new( 1.0,  0.0,  0.0)),
    ([0, 4, 5, 1], Vector3::new( 0.0, -1.0,  0.0)),
    ([2, 3, 7, 6], Vector3::new( 0.0,  1.0,  0.0)),
    ([0, 1, 3, 2], Vector3::new( 0.0,  0.0, -1.0)),
    ([4, 6, 7, 5], Vector3::new( 0.0,  0.0,  1.0)),
];

/// Local-space midpoint of an edge.
pub(crate) fn edge_midpoint(edge: (usize, usize)) -> Vector3<f32> {
    (CORNERS[edge.0] + CORNERS[edge.1]) * 0.5
}

/// The cube as the scene sees it: current orientation and rendered opacity.
#[derive(Debug, Clone)]
pub(crate) struct CubeBody {
    rotation: UnitQuaternion<f32>,
    opacity: f32,
}

impl CubeBody {
    pub(crate) fn new() -> Self {
        Self {
            rotation: UnitQuaternion::identity(),
            opacity: 1.0,
        }
    }

    pub(crate) fn rotation(&self) -> &UnitQuaternion<f32> {
        &self.rotation
    }

    pub(crate) fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Advances the cube by `dt` seconds.
    ///
    /// With `auto_rotate` the cube spins on its own; otherwise it follows the
    /// orientation implied by the pointer. Opacity always eases toward
    /// `opacity_target`.
    pub(crate) fn update(
        &mut self,
        dt: f32,
        auto_rotate: bool,
        pointer: (f32, f32),
        opacity_target: f32,
    ) {
        if auto_rotate {
            let spin = UnitQuaternion::from_euler_angles(AUTO_SPIN_X * dt, AUTO_SPIN_Y * dt, 0.0);
            self.rotation = spin * self.rotation;
        } else {
            let target = pointer_rotation(pointer.0, pointer.1);
            let k = (MANUAL_FOLLOW_RATE * dt).clamp(0.0, 1.0);
            // Undefined for half-turn gaps; step linearly there instead.
            self.rotation = self
                .rotation
                .try_slerp(&target, k, 1.0e-6)
                .unwrap_or_else(|| self.rotation.nlerp(&target, k));
        }

        self.opacity = ease_toward(self.opacity, opacity_target, OPACITY_FOLLOW_RATE, dt);
    }

    /// Corners in world space, scaled to the rendered size.
    pub(crate) fn world_corners(&self) -> [Point3<f32>; 8] {
        CORNERS.map(|corner| Point3::from(self.rotation * corner * CUBE_HALF_SIZE))
    }
}
