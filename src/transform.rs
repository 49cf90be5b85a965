//! Keyboard-driven model transform.
//!
//! W/S and A/D translate along the camera's up and right vectors, Q/E step
//! the Y-axis rotation by a fixed angle once per key press, and R/F stretch
//! or squash the model along its Z axis within a clamped range.

use glam::{Mat4, Vec3};
use sdl2::keyboard::Keycode;

use crate::config::ViewerConfig;
use crate::input::UpdateContext;

pub struct ModelTransform {
    pub translation: Vec3,
    pub rotation_deg: f32,
    pub scale_z: f32,
    rotation_latched: bool,
}

impl ModelTransform {
    pub fn new() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation_deg: 0.0,
            scale_z: 1.0,
            rotation_latched: false,
        }
    }

    /// Applies one frame of keyboard input. Translation directions come from
    /// the rows of the view matrix, so movement follows the screen axes.
    pub fn update(&mut self, ctx: &UpdateContext, view: &Mat4, config: &ViewerConfig) {
        let down = |key| ctx.keyboard.down.contains(&key);

        let up = view.row(1).truncate();
        let right = view.row(0).truncate();
        let step = config.move_speed * ctx.delta_time;
        if down(Keycode::W) {
            self.translation += up * step;
        }
        if down(Keycode::S) {
            self.translation -= up * step;
        }
        if down(Keycode::A) {
            self.translation -= right * step;
        }
        if down(Keycode::D) {
            self.translation += right * step;
        }

        // One rotation step per press; the latch only releases once both
        // rotation keys are up.
        let q = down(Keycode::Q);
        let e = down(Keycode::E);
        if q && !self.rotation_latched {
            self.rotation_deg -= config.rotation_step_degrees;
            self.rotation_latched = true;
        }
        if e && !self.rotation_latched {
            self.rotation_deg += config.rotation_step_degrees;
            self.rotation_latched = true;
        }
        if !q && !e {
            self.rotation_latched = false;
        }

        let scale_step = config.scale_speed * ctx.delta_time;
        if down(Keycode::R) {
            self.scale_z = (self.scale_z + scale_step).min(config.scale_max);
        }
        if down(Keycode::F) {
            self.scale_z = (self.scale_z - scale_step).max(config.scale_min);
        }
    }

    /// Composes translation, Y rotation, and Z scale into a model matrix.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_translation(self.translation)
            * Mat4::from_rotation_y(self.rotation_deg.to_radians())
            * Mat4::from_scale(Vec3::new(1.0, 1.0, self.scale_z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyboardState;

    fn test_config() -> ViewerConfig {
        ViewerConfig::new(
            r#"{
                "window": { "title": "test", "width": 800, "height": 600 },
                "clear_color": [0.2, 0.3, 0.3, 1.0],
                "fov_degrees": 45.0,
                "fit_size": 5.0,
                "move_speed": 0.06,
                "rotation_step_degrees": 30.0,
                "scale_speed": 0.06,
                "scale_min": 0.1,
                "scale_max": 5.0
            }"#,
        )
        .unwrap()
    }

    fn keyboard(keys: &[Keycode]) -> KeyboardState {
        KeyboardState {
            down: keys.iter().copied().collect(),
        }
    }

    // Camera on +Z looking at the origin: right is +X, up is +Y.
    fn fixed_view() -> Mat4 {
        Mat4::look_at_rh(Vec3::new(0.0, 0.0, 4.0), Vec3::ZERO, Vec3::Y)
    }

    #[test]
    fn w_and_d_translate_along_screen_axes() {
        let config = test_config();
        let view = fixed_view();
        let mut transform = ModelTransform::new();

        let keys = keyboard(&[Keycode::W]);
        transform.update(&UpdateContext::new(&keys, 1.0), &view, &config);
        assert!((transform.translation - Vec3::new(0.0, 0.06, 0.0)).length() < 1e-5);

        let mut transform = ModelTransform::new();
        let keys = keyboard(&[Keycode::D]);
        transform.update(&UpdateContext::new(&keys, 1.0), &view, &config);
        assert!((transform.translation - Vec3::new(0.06, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn s_and_a_translate_opposite_to_w_and_d() {
        let config = test_config();
        let view = fixed_view();
        let mut transform = ModelTransform::new();

        let keys = keyboard(&[Keycode::S, Keycode::A]);
        transform.update(&UpdateContext::new(&keys, 1.0), &view, &config);
        assert!((transform.translation - Vec3::new(-0.06, -0.06, 0.0)).length() < 1e-5);
    }

    #[test]
    fn translation_scales_with_delta_time() {
        let config = test_config();
        let view = fixed_view();
        let mut transform = ModelTransform::new();

        let keys = keyboard(&[Keycode::W]);
        transform.update(&UpdateContext::new(&keys, 0.5), &view, &config);
        assert!((transform.translation.y - 0.03).abs() < 1e-5);
    }

    #[test]
    fn rotation_steps_once_per_press() {
        let config = test_config();
        let view = fixed_view();
        let mut transform = ModelTransform::new();

        let held = keyboard(&[Keycode::E]);
        transform.update(&UpdateContext::new(&held, 0.016), &view, &config);
        transform.update(&UpdateContext::new(&held, 0.016), &view, &config);
        assert_eq!(transform.rotation_deg, 30.0);

        let released = keyboard(&[]);
        transform.update(&UpdateContext::new(&released, 0.016), &view, &config);
        transform.update(&UpdateContext::new(&held, 0.016), &view, &config);
        assert_eq!(transform.rotation_deg, 60.0);
    }

    #[test]
    fn rotation_latch_is_shared_between_both_keys() {
        let config = test_config();
        let view = fixed_view();
        let mut transform = ModelTransform::new();

        let q = keyboard(&[Keycode::Q]);
        transform.update(&UpdateContext::new(&q, 0.016), &view, &config);
        assert_eq!(transform.rotation_deg, -30.0);

        // Pressing E while Q is still held must not rotate.
        let both = keyboard(&[Keycode::Q, Keycode::E]);
        transform.update(&UpdateContext::new(&both, 0.016), &view, &config);
        assert_eq!(transform.rotation_deg, -30.0);
    }

    #[test]
    fn scale_clamps_at_both_ends() {
        let config = test_config();
        let view = fixed_view();

        let mut transform = ModelTransform::new();
        transform.scale_z = 4.99;
        let grow = keyboard(&[Keycode::R]);
        transform.update(&UpdateContext::new(&grow, 1.0), &view, &config);
        assert_eq!(transform.scale_z, 5.0);

        let mut transform = ModelTransform::new();
        transform.scale_z = 0.11;
        let shrink = keyboard(&[Keycode::F]);
        transform.update(&UpdateContext::new(&shrink, 1.0), &view, &config);
        assert_eq!(transform.scale_z, 0.1);
    }

    #[test]
    fn matrix_applies_scale_then_rotation_then_translation() {
        let mut transform = ModelTransform::new();
        transform.translation = Vec3::new(1.0, 0.0, 0.0);
        transform.rotation_deg = 90.0;
        transform.scale_z = 2.0;

        // (0, 0, 1): Z scale -> (0, 0, 2), +90 deg about Y -> (2, 0, 0),
        // translate -> (3, 0, 0).
        let point = transform.matrix().transform_point3(Vec3::new(0.0, 0.0, 1.0));
        assert!((point - Vec3::new(3.0, 0.0, 0.0)).length() < 1e-5);
    }
}
