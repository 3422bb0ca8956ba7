use camviz_core::{KeyboardOptions, Pose};

use super::{Key, KeyState};

/// Moves `pose` from the held keys.
///
/// Arrows move along local Z (up/down) and X (left/right), `q`/`a` along
/// local Y. `s`/`f` turn about local Y, `e`/`d` about local X and `w`/`r`
/// roll about local Z. Returns whether any key applied.
pub fn control(pose: &mut Pose, keys: &KeyState, options: &KeyboardOptions) -> bool {
    let lin = options.linear;
    let ang = options.angular;
    let mut moved = false;

    let mut apply = |key: Key, f: &dyn Fn(&mut Pose)| {
        if keys.is_down(key) {
            f(pose);
            moved = true;
        }
    };

    apply(Key::Up, &|p| {
        p.translate_z(lin);
    });
    apply(Key::Down, &|p| {
        p.translate_z(-lin);
    });
    apply(Key::Left, &|p| {
        p.translate_x(-lin);
    });
    apply(Key::Right, &|p| {
        p.translate_x(lin);
    });
    apply(Key::Char('q'), &|p| {
        p.translate_y(-lin);
    });
    apply(Key::Char('a'), &|p| {
        p.translate_y(lin);
    });
    apply(Key::Char('s'), &|p| {
        p.rotate_y(ang);
    });
    apply(Key::Char('f'), &|p| {
        p.rotate_y(-ang);
    });
    apply(Key::Char('e'), &|p| {
        p.rotate_x(-ang);
    });
    apply(Key::Char('d'), &|p| {
        p.rotate_x(ang);
    });
    apply(Key::Char('w'), &|p| {
        p.rotate_z(ang);
    });
    apply(Key::Char('r'), &|p| {
        p.rotate_z(-ang);
    });

    moved
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn held(keys: &[Key]) -> KeyState {
        let mut state = KeyState::new();
        for &key in keys {
            state.press(key);
        }
        state
    }

    #[test]
    fn test_no_keys_no_motion() {
        let mut pose = Pose::identity();
        assert!(!control(&mut pose, &KeyState::new(), &KeyboardOptions::default()));
        assert_eq!(pose, Pose::identity());
    }

    #[test]
    fn test_arrows_translate_in_local_frame() {
        let mut pose = Pose::identity();
        let keys = held(&[Key::Up, Key::Right]);
        assert!(control(&mut pose, &keys, &KeyboardOptions::default()));
        let t = pose.translation();
        assert!((t - Vec3::new(0.2, 0.0, 0.2)).length() < 1e-6);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut pose = Pose::identity();
        let keys = held(&[Key::Char('q'), Key::Char('a'), Key::Char('w'), Key::Char('r')]);
        assert!(control(&mut pose, &keys, &KeyboardOptions::default()));
        assert!(pose.translation().length() < 1e-6);
        assert!(pose.rotation().abs_diff_eq(glam::Mat3::IDENTITY, 1e-5));
    }

    #[test]
    fn test_rotation_keys_use_angular_step() {
        let options = KeyboardOptions {
            linear: 0.2,
            angular: 90.0,
        };
        let mut pose = Pose::identity();
        control(&mut pose, &held(&[Key::Char('s')]), &options);
        // A quarter turn about Y swings the forward axis onto the X axis
        let forward = pose.local_axis(camviz_core::Axis::Z);
        assert!((forward.x.abs() - 1.0).abs() < 1e-5);
        assert!(forward.z.abs() < 1e-5);
    }
}
