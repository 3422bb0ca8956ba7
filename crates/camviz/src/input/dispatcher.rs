//! Per-frame input state machine.

use camviz_core::{ControlOptions, PoseSnapshot};
use camviz_render::Renderer;
use glam::Vec2;

use super::{FrameInput, InputEvent, Key, KeyState, MouseButton};
use crate::compositor::Compositor;
use crate::screen::{ReferenceFrame, ScreenKind};

/// What a drag does to the viewport it started on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionType {
    /// 3D: move the camera in its image plane.
    Translate,
    /// 3D: rotate the camera.
    Rotate,
    /// 2D: move the visible image window.
    Pan,
}

/// Whether a pointer button is held, and what was captured when it went down.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// A button is held. Viewport and focus stay pinned to their values at
    /// button-down until the button is released.
    Dragging {
        screen: Option<String>,
        focus: bool,
        motion: Option<MotionType>,
    },
}

/// Result of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Turns per-frame input into camera and image-window changes.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    controls: ControlOptions,
    keys: KeyState,
    state: DragState,
    anchor: Option<Vec2>,
    last_pose_report: Option<PoseSnapshot>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(controls: ControlOptions) -> Self {
        Self {
            controls,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn controls(&self) -> &ControlOptions {
        &self.controls
    }

    #[must_use]
    pub fn keys(&self) -> &KeyState {
        &self.keys
    }

    #[must_use]
    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// Pointer position of the last continuous update while dragging.
    #[must_use]
    pub fn anchor(&self) -> Option<Vec2> {
        self.anchor
    }

    /// Pose printed by the last pose-report key press.
    #[must_use]
    pub fn last_pose_report(&self) -> Option<PoseSnapshot> {
        self.last_pose_report
    }

    /// Processes one frame of input.
    ///
    /// Discrete events are handled in arrival order, then the drag delta is
    /// applied once.
    pub fn tick<R: Renderer>(&mut self, compositor: &mut Compositor<R>, frame: &FrameInput) -> Flow {
        let pointer = frame.pointer;

        let (screen, focus) = match &self.state {
            DragState::Idle => {
                let screen = compositor
                    .screens()
                    .find_at(pointer)
                    .map(|s| s.name().to_string());
                if !frame.window_focused {
                    self.keys.clear();
                }
                let focus = screen.is_some() && frame.window_focused;
                if !focus {
                    self.anchor = None;
                }
                (screen, focus)
            }
            DragState::Dragging { screen, focus, .. } => (screen.clone(), *focus),
        };

        for event in &frame.events {
            match *event {
                InputEvent::Quit => return Flow::Stop,
                InputEvent::KeyDown(Key::Escape) => return Flow::Stop,
                InputEvent::KeyDown(key) => {
                    if key == Key::Char('p') {
                        self.report_pose(compositor);
                    }
                    self.keys.press(key);
                }
                InputEvent::KeyUp(key) => self.keys.release(key),
                InputEvent::ButtonDown { button, position } => {
                    let motion = match &self.state {
                        DragState::Dragging { motion, .. } => *motion,
                        DragState::Idle => None,
                    };
                    self.state = DragState::Dragging {
                        screen: screen.clone(),
                        focus,
                        motion,
                    };
                    if let (true, Some(name)) = (focus, screen.as_deref()) {
                        self.button_down(compositor, name, button, position, pointer);
                    }
                }
                InputEvent::ButtonUp { .. } => {
                    if self.state != DragState::Idle {
                        log::debug!("drag released");
                    }
                    self.state = DragState::Idle;
                    self.anchor = None;
                }
            }
        }

        if let (true, Some(name)) = (focus, screen.as_deref()) {
            self.apply_drag(compositor, name, pointer);
        }
        Flow::Continue
    }

    fn set_motion(&mut self, motion: MotionType, pointer: Vec2) {
        if let DragState::Dragging { motion: m, screen, .. } = &mut self.state {
            log::debug!("{motion:?} drag started on {screen:?}");
            *m = Some(motion);
        }
        self.anchor = Some(pointer);
    }

    fn button_down<R: Renderer>(
        &mut self,
        compositor: &mut Compositor<R>,
        name: &str,
        button: MouseButton,
        position: Vec2,
        pointer: Vec2,
    ) {
        let controls = self.controls;
        let tier = self.keys.tier();
        let Ok(screen) = compositor.screens_mut().get_mut(name) else {
            return;
        };
        let rect = screen.rect();
        match screen.kind_mut() {
            ScreenKind::World3D(world) => match button {
                MouseButton::WheelForward | MouseButton::WheelBackward => {
                    let sign = if button == MouseButton::WheelForward { 1.0 } else { -1.0 };
                    if self.keys.roll_modifier() {
                        world.viewer_mut().rotate_z(sign * controls.roll.pick(tier));
                    } else {
                        world.viewer_mut().translate_z(sign * controls.dolly.pick(tier));
                    }
                }
                MouseButton::Primary => self.set_motion(MotionType::Translate, pointer),
                MouseButton::Secondary => self.set_motion(MotionType::Rotate, pointer),
                MouseButton::Middle => {
                    log::debug!("resetting viewer of '{name}'");
                    world.reset();
                }
            },
            ScreenKind::Image2D(image) => match button {
                MouseButton::Primary => self.set_motion(MotionType::Pan, pointer),
                MouseButton::Middle => image.reset(),
                MouseButton::WheelForward | MouseButton::WheelBackward => {
                    let anchor = image.pointer_to_image(position, &rect);
                    let factor = controls.zoom.factor.pick(self.keys.fast_zoom());
                    if button == MouseButton::WheelForward {
                        image.zoom_in(anchor, factor, controls.zoom.min_fraction);
                    } else {
                        image.zoom_out(anchor, factor);
                    }
                }
                MouseButton::Secondary => {}
            },
        }
    }

    fn apply_drag<R: Renderer>(&mut self, compositor: &mut Compositor<R>, name: &str, pointer: Vec2) {
        let Some(anchor) = self.anchor else {
            return;
        };
        let delta = pointer - anchor;
        self.anchor = Some(pointer);

        let motion = match &self.state {
            DragState::Dragging { motion, .. } => *motion,
            DragState::Idle => None,
        };
        let tier = self.keys.tier();
        let Ok(screen) = compositor.screens_mut().get_mut(name) else {
            return;
        };
        match screen.kind_mut() {
            ScreenKind::World3D(world) => {
                let reference = world.reference();
                let viewer = world.viewer_mut();
                match motion {
                    Some(MotionType::Translate) => {
                        let k = self.controls.pan.pick(tier);
                        viewer.translate_x(-delta.x * k);
                        viewer.translate_y(-delta.y * k);
                    }
                    Some(MotionType::Rotate) => {
                        let m = self.controls.look.pick(tier);
                        viewer.rotate_x(-delta.y * m);
                        match reference {
                            ReferenceFrame::Camera => viewer.rotate_y(delta.x * m),
                            ReferenceFrame::Lidar => viewer.rotate_z(-delta.x * m),
                        };
                    }
                    Some(MotionType::Pan) | None => {}
                }
            }
            ScreenKind::Image2D(image) => {
                let k = self.controls.image_pan.pick(self.keys.fast_pan());
                image.pan(-delta * k);
            }
        }
    }

    fn report_pose<R: Renderer>(&mut self, compositor: &Compositor<R>) {
        let viewer = compositor
            .current_name()
            .and_then(|name| compositor.screens().get(name).ok())
            .and_then(|screen| screen.as_world())
            .map(|world| *world.viewer());
        match viewer {
            Some(pose) => {
                let snapshot = pose.current7();
                log::info!("{snapshot}");
                println!("{snapshot}");
                self.last_pose_report = Some(snapshot);
            }
            None => log::warn!("pose report needs a current 3D viewport"),
        }
    }
}
