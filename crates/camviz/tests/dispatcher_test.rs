//! Input dispatcher integration tests.
//!
//! Every test drives a headless compositor through `Dispatcher::tick` with
//! hand-built frames, the same way a host loop would.

use camviz::{
    control, Compositor, Dispatcher, DragState, Flow, FrameInput, InputEvent, Key, MotionType,
    MouseButton, Options, Pose, RecordingRenderer, ReferenceFrame, ScreenExtent, UVec2, Vec2,
    Vec3, WorldConfig,
};
use proptest::prelude::*;

fn compositor() -> Compositor<RecordingRenderer> {
    Compositor::with_size(
        RecordingRenderer::new(),
        Options::default(),
        UVec2::new(200, 100),
    )
}

fn down(button: MouseButton, at: Vec2) -> InputEvent {
    InputEvent::ButtonDown {
        button,
        position: at,
    }
}

fn up(button: MouseButton) -> InputEvent {
    InputEvent::ButtonUp { button }
}

fn wheel(button: MouseButton, at: Vec2) -> [InputEvent; 2] {
    [down(button, at), up(button)]
}

fn viewer<'a>(c: &'a Compositor<RecordingRenderer>, name: &str) -> &'a Pose {
    c.screen(name).unwrap().as_world().unwrap().viewer()
}

fn split_worlds() -> Compositor<RecordingRenderer> {
    let mut c = compositor();
    c.add_3d_world("a", ScreenExtent::fractions(0.0, 0.0, 0.5, 1.0), WorldConfig::new())
        .unwrap();
    c.add_3d_world("b", ScreenExtent::fractions(0.5, 0.0, 1.0, 1.0), WorldConfig::new())
        .unwrap();
    c
}

#[test]
fn test_primary_drag_pans_camera() {
    let mut c = compositor();
    c.add_3d_world("3d", ScreenExtent::FULL, WorldConfig::new())
        .unwrap();
    let mut d = Dispatcher::default();

    let start = Vec2::new(100.0, 50.0);
    d.tick(&mut c, &FrameInput::at(start).with_event(down(MouseButton::Primary, start)));
    assert!(matches!(
        d.state(),
        DragState::Dragging { motion: Some(MotionType::Translate), .. }
    ));
    d.tick(&mut c, &FrameInput::at(Vec2::new(110.0, 50.0)));

    let t = viewer(&c, "3d").translation();
    assert!((t.x - -1.0).abs() < 1e-6, "x = {}", t.x);
    assert_eq!(t.y, 0.0);
    assert_eq!(t.z, 0.0);
}

#[test]
fn test_drag_stays_on_starting_viewport() {
    let mut c = split_worlds();
    let mut d = Dispatcher::default();

    let start = Vec2::new(50.0, 50.0);
    d.tick(&mut c, &FrameInput::at(start).with_event(down(MouseButton::Secondary, start)));
    // Pointer crosses into "b" with the button still held
    d.tick(&mut c, &FrameInput::at(Vec2::new(150.0, 60.0)));

    assert_ne!(*viewer(&c, "a"), Pose::identity());
    assert_eq!(*viewer(&c, "b"), Pose::identity());
    assert!(matches!(
        d.state(),
        DragState::Dragging { screen: Some(name), focus: true, .. } if name == "a"
    ));

    // Releasing over "b" ends the drag; later motion moves nothing
    let a_after = *viewer(&c, "a");
    d.tick(&mut c, &FrameInput::at(Vec2::new(150.0, 60.0)).with_event(up(MouseButton::Secondary)));
    d.tick(&mut c, &FrameInput::at(Vec2::new(170.0, 80.0)));
    assert_eq!(*d.state(), DragState::Idle);
    assert_eq!(d.anchor(), None);
    assert_eq!(*viewer(&c, "a"), a_after);
    assert_eq!(*viewer(&c, "b"), Pose::identity());
}

#[test]
fn test_unfocused_window_ignores_buttons() {
    let mut c = split_worlds();
    let mut d = Dispatcher::default();

    let start = Vec2::new(50.0, 50.0);
    d.tick(
        &mut c,
        &FrameInput::at(start)
            .with_event(down(MouseButton::Primary, start))
            .unfocused(),
    );
    d.tick(&mut c, &FrameInput::at(Vec2::new(80.0, 50.0)));

    assert!(matches!(d.state(), DragState::Dragging { focus: false, .. }));
    assert_eq!(*viewer(&c, "a"), Pose::identity());
}

#[test]
fn test_wheel_dolly_and_roll_tiers() {
    let mut c = compositor();
    c.add_3d_world("3d", ScreenExtent::FULL, WorldConfig::new())
        .unwrap();
    let mut d = Dispatcher::default();
    let at = Vec2::new(20.0, 20.0);

    let mut frame = FrameInput::at(at).with_event(InputEvent::KeyDown(Key::LeftCtrl));
    frame.events.extend(wheel(MouseButton::WheelForward, at));
    d.tick(&mut c, &frame);
    assert!((viewer(&c, "3d").translation().z - 0.5).abs() < 1e-6);

    let mut frame = FrameInput::at(at)
        .with_event(InputEvent::KeyUp(Key::LeftCtrl))
        .with_event(InputEvent::KeyDown(Key::RightCtrl));
    frame.events.extend(wheel(MouseButton::WheelBackward, at));
    d.tick(&mut c, &frame);
    assert!((viewer(&c, "3d").translation().z - -4.5).abs() < 1e-5);

    // Roll modifier: rotation instead of translation
    let before = viewer(&c, "3d").translation();
    let mut frame = FrameInput::at(at)
        .with_event(InputEvent::KeyUp(Key::RightCtrl))
        .with_event(InputEvent::KeyDown(Key::RightAlt));
    frame.events.extend(wheel(MouseButton::WheelForward, at));
    d.tick(&mut c, &frame);
    let pose = viewer(&c, "3d");
    assert_eq!(pose.translation(), before);
    let mut expected = Pose::identity();
    expected.translate_z(-4.5).rotate_z(0.5);
    assert!(pose.matrix().abs_diff_eq(expected.matrix(), 1e-5));
    assert_eq!(*d.state(), DragState::Idle);
}

#[test]
fn test_middle_button_resets_viewer() {
    let mut c = compositor();
    let mut origin = Pose::identity();
    origin.translate_z(-10.0);
    c.add_3d_world("3d", ScreenExtent::FULL, WorldConfig::new().with_pose(origin))
        .unwrap();
    let mut d = Dispatcher::default();
    let at = Vec2::new(20.0, 20.0);

    let mut frame = FrameInput::at(at);
    frame.events.extend(wheel(MouseButton::WheelForward, at));
    d.tick(&mut c, &frame);
    assert_ne!(*viewer(&c, "3d"), origin);

    d.tick(
        &mut c,
        &FrameInput::at(at)
            .with_event(down(MouseButton::Middle, at))
            .with_event(up(MouseButton::Middle)),
    );
    assert_eq!(*viewer(&c, "3d"), origin);
}

#[test]
fn test_lidar_look_rotates_about_local_z() {
    let mut c = compositor();
    c.add_3d_world(
        "lidar",
        ScreenExtent::FULL,
        WorldConfig::new().with_reference(ReferenceFrame::Lidar),
    )
    .unwrap();
    let mut d = Dispatcher::default();
    let origin = *viewer(&c, "lidar");

    let start = Vec2::new(100.0, 50.0);
    d.tick(&mut c, &FrameInput::at(start).with_event(down(MouseButton::Secondary, start)));
    d.tick(&mut c, &FrameInput::at(Vec2::new(110.0, 50.0)));

    let mut expected = origin;
    expected.rotate_x(0.0).rotate_z(-10.0 * 0.05);
    assert!(viewer(&c, "lidar")
        .matrix()
        .abs_diff_eq(expected.matrix(), 1e-5));
}

#[test]
fn test_image_zoom_pan_and_reset() {
    let mut c = compositor();
    c.add_2d_image("rgb", ScreenExtent::FULL, Some(Vec2::new(400.0, 200.0)))
        .unwrap();
    let mut d = Dispatcher::default();
    let center = Vec2::new(100.0, 50.0);

    let mut frame = FrameInput::at(center);
    frame.events.extend(wheel(MouseButton::WheelForward, center));
    d.tick(&mut c, &frame);

    let window = c.screen("rgb").unwrap().as_image().unwrap().window();
    let half = 200.0 / 1.05;
    assert!((window.min.x - (200.0 - half)).abs() < 1e-3);
    assert!((window.max.x - (200.0 + half)).abs() < 1e-3);

    // Dragging left moves the window right in image space
    d.tick(&mut c, &FrameInput::at(center).with_event(down(MouseButton::Primary, center)));
    d.tick(&mut c, &FrameInput::at(center - Vec2::new(5.0, 0.0)));
    let panned = c.screen("rgb").unwrap().as_image().unwrap().window();
    assert!((panned.min.x - (window.min.x + 5.0)).abs() < 1e-3);
    assert_eq!(panned.min.y, window.min.y);

    // Dragging far right would leave the image; the x shift is undone
    d.tick(&mut c, &FrameInput::at(center + Vec2::new(500.0, 0.0)));
    let clamped = c.screen("rgb").unwrap().as_image().unwrap().window();
    assert_eq!(clamped, panned);

    d.tick(&mut c, &FrameInput::at(center).with_event(up(MouseButton::Primary)));
    d.tick(
        &mut c,
        &FrameInput::at(center)
            .with_event(down(MouseButton::Middle, center))
            .with_event(up(MouseButton::Middle)),
    );
    let image = c.screen("rgb").unwrap().as_image().unwrap();
    assert!(!image.is_panned_or_zoomed());
}

#[test]
fn test_stop_signals() {
    let mut c = compositor();
    let mut d = Dispatcher::default();
    assert_eq!(d.tick(&mut c, &FrameInput::at(Vec2::ZERO)), Flow::Continue);
    assert_eq!(
        d.tick(&mut c, &FrameInput::at(Vec2::ZERO).with_event(InputEvent::Quit)),
        Flow::Stop
    );
    assert_eq!(
        d.tick(
            &mut c,
            &FrameInput::at(Vec2::ZERO).with_event(InputEvent::KeyDown(Key::Escape))
        ),
        Flow::Stop
    );
}

#[test]
fn test_pose_report_uses_current_viewport() {
    let mut c = split_worlds();
    let mut d = Dispatcher::default();
    let press = FrameInput::at(Vec2::ZERO).with_event(InputEvent::KeyDown(Key::Char('p')));

    // Nothing selected for drawing yet
    d.tick(&mut c, &press);
    assert_eq!(d.last_pose_report(), None);

    c.screen_mut("b")
        .unwrap()
        .world_mut()
        .unwrap()
        .viewer_mut()
        .translate_x(3.0);
    c.use_screen("b").unwrap();
    d.tick(&mut c, &press);
    let report = d.last_pose_report().unwrap();
    assert_eq!(report, viewer(&c, "b").current7());
    assert_eq!(report.translation(), Vec3::new(3.0, 0.0, 0.0));
}

#[test]
fn test_keyboard_control_with_dispatcher_keys() {
    let mut c = compositor();
    c.add_3d_world("3d", ScreenExtent::FULL, WorldConfig::new())
        .unwrap();
    let mut d = Dispatcher::default();
    d.tick(&mut c, &FrameInput::at(Vec2::ZERO).with_event(InputEvent::KeyDown(Key::Up)));

    let keyboard = d.controls().keyboard;
    let keys = d.keys().clone();
    let pose = c.screen_mut("3d").unwrap().world_mut().unwrap().viewer_mut();
    assert!(control(pose, &keys, &keyboard));
    assert!((viewer(&c, "3d").translation().z - 0.2).abs() < 1e-6);
}

#[test]
fn test_pan_drag_speed_tiers() {
    for (modifier, k) in [(Key::RightCtrl, 1.0_f32), (Key::LeftCtrl, 0.02)] {
        let mut c = compositor();
        c.add_3d_world("3d", ScreenExtent::FULL, WorldConfig::new())
            .unwrap();
        let mut d = Dispatcher::default();

        let start = Vec2::new(100.0, 50.0);
        d.tick(
            &mut c,
            &FrameInput::at(start)
                .with_event(InputEvent::KeyDown(modifier))
                .with_event(down(MouseButton::Primary, start)),
        );
        d.tick(&mut c, &FrameInput::at(Vec2::new(110.0, 45.0)));

        let t = viewer(&c, "3d").translation();
        assert!((t.x - -10.0 * k).abs() < 1e-5, "{modifier:?}: x = {}", t.x);
        assert!((t.y - 5.0 * k).abs() < 1e-5, "{modifier:?}: y = {}", t.y);
        assert_eq!(t.z, 0.0);
    }
}

#[test]
fn test_camera_look_drag_tiers() {
    let tiers = [(None, 0.05_f32), (Some(Key::RightCtrl), 0.25), (Some(Key::LeftCtrl), 0.01)];
    for (modifier, m) in tiers {
        let mut c = compositor();
        c.add_3d_world("3d", ScreenExtent::FULL, WorldConfig::new())
            .unwrap();
        let mut d = Dispatcher::default();

        let start = Vec2::new(100.0, 50.0);
        let mut frame = FrameInput::at(start);
        if let Some(key) = modifier {
            frame = frame.with_event(InputEvent::KeyDown(key));
        }
        d.tick(&mut c, &frame.with_event(down(MouseButton::Secondary, start)));
        // dX = 10, dY = -4
        d.tick(&mut c, &FrameInput::at(Vec2::new(110.0, 46.0)));

        let mut expected = Pose::identity();
        expected.rotate_x(4.0 * m).rotate_y(10.0 * m);
        assert!(
            viewer(&c, "3d").matrix().abs_diff_eq(expected.matrix(), 1e-5),
            "{modifier:?}"
        );
    }
}

#[test]
fn test_image_fast_zoom_and_fast_pan() {
    let mut c = compositor();
    c.add_2d_image("rgb", ScreenExtent::FULL, Some(Vec2::new(400.0, 200.0)))
        .unwrap();
    let mut d = Dispatcher::default();
    let center = Vec2::new(100.0, 50.0);

    let mut frame = FrameInput::at(center).with_event(InputEvent::KeyDown(Key::RightShift));
    frame.events.extend(wheel(MouseButton::WheelForward, center));
    d.tick(&mut c, &frame);

    let window = c.screen("rgb").unwrap().as_image().unwrap().window();
    assert!((window.span().x - 400.0 / 1.2).abs() < 1e-3);
    assert!((window.span().y - 200.0 / 1.2).abs() < 1e-3);
    assert!((window.min.x - (200.0 - 200.0 / 1.2)).abs() < 1e-3);

    d.tick(
        &mut c,
        &FrameInput::at(center)
            .with_event(InputEvent::KeyUp(Key::RightShift))
            .with_event(InputEvent::KeyDown(Key::RightCtrl))
            .with_event(down(MouseButton::Primary, center)),
    );
    d.tick(&mut c, &FrameInput::at(center - Vec2::new(5.0, 0.0)));

    let panned = c.screen("rgb").unwrap().as_image().unwrap().window();
    assert!((panned.min.x - (window.min.x + 25.0)).abs() < 1e-3);
    assert!((panned.max.x - (window.max.x + 25.0)).abs() < 1e-3);
    assert_eq!(panned.min.y, window.min.y);
}

#[test]
fn test_focus_loss_releases_modifiers() {
    let mut c = compositor();
    c.add_3d_world("3d", ScreenExtent::FULL, WorldConfig::new())
        .unwrap();
    let mut d = Dispatcher::default();
    let at = Vec2::new(20.0, 20.0);

    d.tick(&mut c, &FrameInput::at(at).with_event(InputEvent::KeyDown(Key::RightCtrl)));
    assert!(d.keys().is_down(Key::RightCtrl));

    // The key-up lands in another window
    d.tick(&mut c, &FrameInput::at(at).unfocused());
    assert!(!d.keys().is_down(Key::RightCtrl));

    let mut frame = FrameInput::at(at);
    frame.events.extend(wheel(MouseButton::WheelForward, at));
    d.tick(&mut c, &frame);
    assert!((viewer(&c, "3d").translation().z - 1.0).abs() < 1e-6);
}

proptest! {
    #[test]
    fn prop_drag_never_touches_other_viewport(
        path in proptest::collection::vec((0.0f32..200.0, 0.0f32..100.0), 1..20),
        secondary in any::<bool>(),
    ) {
        let mut c = split_worlds();
        let mut d = Dispatcher::default();
        let button = if secondary { MouseButton::Secondary } else { MouseButton::Primary };
        let start = Vec2::new(50.0, 50.0);
        d.tick(&mut c, &FrameInput::at(start).with_event(down(button, start)));
        for (x, y) in path {
            d.tick(&mut c, &FrameInput::at(Vec2::new(x, y)));
        }
        prop_assert_eq!(*viewer(&c, "b"), Pose::identity());
    }
}
