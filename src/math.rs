use std::f32::consts::PI;

use iced::Color;
use nalgebra::UnitQuaternion;

/// Pointer travel from the center to an edge turns the cube by this many radians.
const POINTER_ROTATION_RANGE: f32 = PI;

pub(crate) fn color_from_hex(hex: u32) -> Color {
    Color::from_rgb8(
        ((hex >> 16) & 0xff) as u8,
        ((hex >> 8) & 0xff) as u8,
        (hex & 0xff) as u8,
    )
}

/// Linear interpolation between two `0xRRGGBB` colors, `t` clamped to [0, 1].
pub(crate) fn lerp_color(from: u32, to: u32, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let a = color_from_hex(from);
    let b = color_from_hex(to);
    Color::from_rgb(
        a.r + (b.r - a.r) * t,
        a.g + (b.g - a.g) * t,
        a.b + (b.b - a.b) * t,
    )
}

pub(crate) fn with_alpha(color: Color, alpha: f32) -> Color {
    Color {
        a: alpha.clamp(0.0, 1.0),
        ..color
    }
}

/// Exponential-style approach of `current` toward `target`.
///
/// `rate` is the fraction of the remaining gap closed per second; a large `dt`
/// snaps straight to the target instead of overshooting.
pub(crate) fn ease_toward(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    let k = (rate * dt).clamp(0.0, 1.0);
    current + (target - current) * k
}

/// Orientation the cube should face for a normalized pointer position.
pub(crate) fn pointer_rotation(pointer_x: f32, pointer_y: f32) -> UnitQuaternion<f32> {
    let pitch = -pointer_y.clamp(-1.0, 1.0) * POINTER_ROTATION_RANGE;
    let yaw = pointer_x.clamp(-1.0, 1.0) * POINTER_ROTATION_RANGE;
    UnitQuaternion::from_euler_angles(pitch, yaw, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_channels() {
        let c = color_from_hex(0xFF8000);
        assert_eq!(c.r, 1.0);
        assert!((c.g - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.b, 0.0);
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn lerp_endpoints_and_clamp() {
        assert_eq!(lerp_color(0x333333, 0xFFFFFF, 0.0), color_from_hex(0x333333));
        assert_eq!(lerp_color(0x333333, 0xFFFFFF, 1.0), color_from_hex(0xFFFFFF));
        assert_eq!(lerp_color(0x333333, 0xFFFFFF, 7.0), color_from_hex(0xFFFFFF));
        let mid = lerp_color(0x000000, 0xFFFFFF, 0.5);
        assert!((mid.r - 0.5).abs() < 1e-6);
    }

    #[test]
    fn ease_never_overshoots() {
        assert_eq!(ease_toward(1.0, 0.0, 5.0, 10.0), 0.0);
        let v = ease_toward(1.0, 0.0, 5.0, 0.1);
        assert!(v > 0.0 && v < 1.0);
    }

    #[test]
    fn centered_pointer_is_identity() {
        let r = pointer_rotation(0.0, 0.0);
        assert!(r.angle() < 1e-6);
    }
}
