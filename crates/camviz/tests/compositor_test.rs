//! Compositor integration tests: layouts, calibrated views, frame capture and
//! the blocking run loop.

use camviz::{
    run, BBox3D, CamvizError, Color, Compositor, Dispatcher, FrameInput, InputEvent, Key, Options,
    PointCloud, Pose, RecordingRenderer, RenderCommand, ScreenExtent, ScriptedInput, UVec2, Vec2,
    Vec3, ViewState, WorldConfig,
};
use camviz_render::intrinsics_from_rows;

fn compositor(size: UVec2) -> Compositor<RecordingRenderer> {
    Compositor::with_size(RecordingRenderer::with_framebuffer(size), Options::default(), size)
}

fn last_view(c: &Compositor<RecordingRenderer>) -> Option<ViewState> {
    c.renderer().commands().iter().rev().find_map(|cmd| match cmd {
        RenderCommand::LoadView(view) => Some(*view),
        _ => None,
    })
}

#[test]
fn test_calibrated_world_projection() {
    let mut c = compositor(UVec2::new(64, 36));
    let k = intrinsics_from_rows([[1000.0, 0.0, 960.0], [0.0, 1000.0, 540.0], [0.0, 0.0, 1.0]]);
    let config = WorldConfig::new()
        .with_calibration(k, UVec2::new(1920, 1080))
        .with_near_far((0.1_f32, 1000.0_f32));
    c.add_3d_world("cam", ScreenExtent::FULL, config).unwrap();
    c.use_screen("cam").unwrap();

    let p = last_view(&c).unwrap().projection.to_cols_array();
    assert!((p[0] - 2.0 * 1000.0 / 1920.0).abs() < 1e-6);
    assert!((p[5] - 2.0 * 1000.0 / 1080.0).abs() < 1e-6);
    // Centered principal point: no off-axis shift
    assert!(p[8].abs() < 1e-6);
    assert!(p[9].abs() < 1e-6);
    assert_eq!(p[11], -1.0);
}

#[test]
fn test_world_grid_names_and_rects() {
    let mut c = compositor(UVec2::new(400, 200));
    let names = c
        .add_3d_world_grid("view", ScreenExtent::FULL, 2, 2, &WorldConfig::new())
        .unwrap();
    assert_eq!(names, ["view00", "view01", "view10", "view11"]);

    let rect = c.screen("view11").unwrap().rect();
    assert_eq!(rect.left, 200);
    assert_eq!(rect.up, 100);
    assert_eq!(rect.width, 200);
    assert_eq!(rect.height, 100);

    assert!(matches!(
        c.add_3d_world("view01", ScreenExtent::FULL, WorldConfig::new()),
        Err(CamvizError::ViewportExists(_))
    ));
}

#[test]
fn test_viewport_clear_paints_only_its_rect() {
    let mut c = compositor(UVec2::new(40, 20));
    c.add_3d_world(
        "left",
        ScreenExtent::fractions(0.0, 0.0, 0.5, 1.0),
        WorldConfig::new().with_background(Color::RED),
    )
    .unwrap();
    c.clear(Color::BLACK);
    c.use_screen("left").unwrap().clear_screen().unwrap();

    let frame = c.to_image().unwrap();
    assert_eq!(frame.dimensions(), (40, 20));
    assert_eq!(frame.get_pixel(0, 0).0, [255, 0, 0]);
    assert_eq!(frame.get_pixel(19, 19).0, [255, 0, 0]);
    assert_eq!(frame.get_pixel(20, 0).0, [0, 0, 0]);
}

#[test]
fn test_save_and_reload_frame() {
    let mut c = compositor(UVec2::new(16, 8));
    c.add_2d_image("top", ScreenExtent::fractions(0.0, 0.0, 1.0, 0.5), None)
        .unwrap();
    c.clear(Color::BLACK);
    c.screen_mut("top")
        .unwrap()
        .image_mut()
        .unwrap()
        .set_background(Color::WHITE);
    c.use_screen("top").unwrap().clear_screen().unwrap();

    let dir = std::env::temp_dir().join(format!("camviz_save_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = c.save_timestamped(&dir).unwrap();
    assert!(path
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("camviz_"));

    let saved = image::open(&path).unwrap().to_rgba8();
    assert_eq!(saved.dimensions(), (16, 8));
    // Top half is the white viewport, bottom half the black window clear
    assert_eq!(saved.get_pixel(3, 0).0, [255, 255, 255, 255]);
    assert_eq!(saved.get_pixel(3, 7).0, [0, 0, 0, 255]);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_run_draws_until_escape() {
    let mut options = Options::default();
    options.window.max_fps = 0;
    let mut c = Compositor::with_size(RecordingRenderer::new(), options, UVec2::new(100, 50));
    c.add_3d_world("3d", ScreenExtent::FULL, WorldConfig::new())
        .unwrap();

    let at = Vec2::new(10.0, 10.0);
    let mut input = ScriptedInput::new(vec![
        FrameInput::at(at),
        FrameInput::at(at),
        FrameInput::at(at).with_event(InputEvent::KeyDown(Key::Escape)),
        FrameInput::at(at),
    ]);
    let mut dispatcher = Dispatcher::default();

    let mut pose = Pose::identity();
    pose.translate_z(5.0);
    let cloud = PointCloud::new(vec![Vec3::ZERO; 4]).with_pose(pose);
    let bbox = BBox3D::from_size(Vec3::ONE, Pose::identity());

    let mut drawn = 0;
    run(&mut c, &mut dispatcher, &mut input, |c, _| {
        c.clear(Color::BLACK);
        c.use_screen("3d")?.object(&cloud, None)?.object(&bbox, None)?;
        drawn += 1;
        Ok(())
    })
    .unwrap();

    assert_eq!(drawn, 2);
    assert_eq!(c.renderer().frames(), 2);
    assert_eq!(input.remaining(), 1);
    assert_eq!(c.renderer().transform_depth(), 0);
}

#[test]
fn test_run_propagates_frame_errors() {
    let mut options = Options::default();
    options.window.max_fps = 0;
    let mut c = Compositor::with_size(RecordingRenderer::new(), options, UVec2::new(10, 10));
    let mut input = ScriptedInput::new(vec![FrameInput::at(Vec2::ZERO)]);
    let mut dispatcher = Dispatcher::default();

    let result = run(&mut c, &mut dispatcher, &mut input, |c, _| {
        c.use_screen("missing")?;
        Ok(())
    });
    assert!(matches!(result, Err(CamvizError::UnknownViewport(_))));
}
