// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Interactive zoom and pan for 2D views of a simulation
//!
//! [`ZoomPan`] keeps a zoom scale and pan offset for a viewport and converts
//! points between display space and simulation space. It is driven by
//! abstract [`PointerEvent`]s, so any windowing layer can feed it.
//!
//! # Transform
//!
//! Zooming scales about the centre of the viewport, then the pan offset is
//! applied:
//!
//! ```text
//! centre  = size * (1 - scale) / 2
//! display = coord * scale + centre + pan
//! coord   = (display - centre - pan) / scale
//! ```
//!
//! # Interaction
//!
//! - Dragging with the zoom button zooms: up zooms in, down zooms out. The
//!   point where the drag started stays put on screen, and the zoom rate
//!   grows the longer the drag lasts.
//! - Dragging with any other button pans.
//! - The wheel zooms about the pointer; rotating away (negative) zooms in.
//! - Releasing a button ends any zoom or pan and notifies listeners.
//!
//! A [`ModifierMask`] can require modifier keys for interaction, or disable
//! it entirely.

use std::fmt;
use std::ops::{Add, Sub};
use tracing::debug;

const INITIAL_ZOOM_STEP: f64 = 1.05;
const ZOOM_ACCELERATION: f64 = 0.005;

/// A point in display or simulation coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2 {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate, growing downwards in display space
    pub y: f64,
}

impl Point2 {
    /// Create a point
    pub const fn new(x: f64, y: f64) -> Self {
        Point2 { x, y }
    }

    fn scale(self, factor: f64) -> Self {
        Point2::new(self.x * factor, self.y * factor)
    }
}

impl Add for Point2 {
    type Output = Point2;

    fn add(self, other: Point2) -> Point2 {
        Point2::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Point2 {
    type Output = Point2;

    fn sub(self, other: Point2) -> Point2 {
        Point2::new(self.x - other.x, self.y - other.y)
    }
}

impl fmt::Display for Point2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Pointer buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// Primary button, zooms by default
    Left,
    /// Secondary button, pans by default
    Right,
    /// Middle button
    Middle,
}

/// Set of held modifier keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(u8);

impl Modifiers {
    /// No modifiers
    pub const NONE: Modifiers = Modifiers(0);
    /// Control key
    pub const CONTROL: Modifiers = Modifiers(1);
    /// Shift key
    pub const SHIFT: Modifiers = Modifiers(1 << 1);
    /// Alt key
    pub const ALT: Modifiers = Modifiers(1 << 2);

    /// Union of two modifier sets
    pub const fn with(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 | other.0)
    }

    /// Whether every modifier in `other` is held
    pub const fn contains(self, other: Modifiers) -> bool {
        self.0 & other.0 == other.0
    }
}

/// Which modifier keys must be held for zooming and panning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModifierMask {
    /// Ignore all pointer input
    Disabled,
    /// Interact only while these modifiers are held
    Required(Modifiers),
    /// Interact regardless of modifiers
    #[default]
    Any,
}

impl ModifierMask {
    fn admits(&self, modifiers: Modifiers) -> bool {
        match self {
            ModifierMask::Disabled => false,
            ModifierMask::Required(required) => modifiers.contains(*required),
            ModifierMask::Any => true,
        }
    }
}

/// Pointer input fed to [`ZoomPan::handle_event`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// A button went down
    Pressed {
        /// Pointer position in display space
        position: Point2,
        /// Button pressed
        button: Button,
        /// Modifier keys held
        modifiers: Modifiers,
    },
    /// The pointer moved with a button held
    Dragged {
        /// Pointer position in display space
        position: Point2,
        /// Button held
        button: Button,
        /// Modifier keys held
        modifiers: Modifiers,
    },
    /// A button went up
    Released {
        /// Pointer position in display space
        position: Point2,
        /// Button released
        button: Button,
        /// Modifier keys held
        modifiers: Modifiers,
    },
    /// The wheel turned
    Wheel {
        /// Pointer position in display space
        position: Point2,
        /// Notches turned; negative is away from the user
        rotation: i32,
        /// Modifier keys held
        modifiers: Modifiers,
    },
}

/// Callbacks fired when an interaction finishes
///
/// Both methods default to doing nothing.
pub trait ZoomPanListener {
    /// A zoom drag has ended
    fn zoom_ended(&mut self) {}

    /// A pan drag has ended
    fn pan_ended(&mut self) {}
}

/// Identifies a registered [`ZoomPanListener`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Translation then uniform scale, in that order, mapping simulation
/// coordinates to display coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    /// Translation applied first
    pub translation: Point2,
    /// Uniform scale applied second
    pub scale: f64,
}

/// Zoom and pan state for one viewport
pub struct ZoomPan {
    width: f64,
    height: f64,
    zoom_scale: f64,
    zoom_step: f64,
    pan_offset: Point2,
    zoom_anchor: Point2,
    last_position: Option<Point2>,
    zooming: bool,
    panning: bool,
    captured: bool,
    mask: ModifierMask,
    zoom_button: Button,
    listeners: Vec<(ListenerId, Box<dyn ZoomPanListener>)>,
    next_listener: u64,
}

impl ZoomPan {
    /// Create an identity view over a `width` x `height` viewport
    pub fn new(width: f64, height: f64) -> Self {
        ZoomPan {
            width,
            height,
            zoom_scale: 1.0,
            zoom_step: INITIAL_ZOOM_STEP,
            pan_offset: Point2::default(),
            zoom_anchor: Point2::default(),
            last_position: None,
            zooming: false,
            panning: false,
            captured: false,
            mask: ModifierMask::default(),
            zoom_button: Button::Left,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    /// Return to scale 1 with no pan
    ///
    /// Listeners, modifier mask and zoom button are kept.
    pub fn reset(&mut self) {
        self.zoom_scale = 1.0;
        self.zoom_step = INITIAL_ZOOM_STEP;
        self.pan_offset = Point2::default();
        self.last_position = None;
        self.zooming = false;
        self.panning = false;
        self.captured = false;
    }

    /// Resize the viewport
    ///
    /// The zoom centre moves with the viewport; scale and pan are kept.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Viewport size as `(width, height)`
    pub fn viewport(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Require modifier keys for interaction, or disable it
    pub fn set_modifier_mask(&mut self, mask: ModifierMask) {
        self.mask = mask;
    }

    /// Choose the button that zooms; every other button pans
    pub fn set_zoom_button(&mut self, button: Button) {
        self.zoom_button = button;
    }

    /// Current zoom scale
    pub fn zoom_scale(&self) -> f64 {
        self.zoom_scale
    }

    /// Current pan offset in display units
    pub fn pan_offset(&self) -> Point2 {
        self.pan_offset
    }

    /// Whether a zoom drag is in progress
    pub fn is_zooming(&self) -> bool {
        self.zooming
    }

    /// Whether a pan drag is in progress
    pub fn is_panning(&self) -> bool {
        self.panning
    }

    /// Whether a button is held on the view
    pub fn is_mouse_captured(&self) -> bool {
        self.captured
    }

    /// Register a listener
    pub fn add_listener(&mut self, listener: Box<dyn ZoomPanListener>) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Unregister a listener, handing it back
    pub fn remove_listener(&mut self, id: ListenerId) -> Option<Box<dyn ZoomPanListener>> {
        let index = self.listeners.iter().position(|(i, _)| *i == id)?;
        Some(self.listeners.remove(index).1)
    }

    /// Map a display point to simulation coordinates
    pub fn display_to_coord(&self, p: Point2) -> Point2 {
        (p - self.translation()).scale(1.0 / self.zoom_scale)
    }

    /// Map a simulation point to display coordinates
    pub fn coord_to_display(&self, p: Point2) -> Point2 {
        p.scale(self.zoom_scale) + self.translation()
    }

    /// The current mapping for a renderer to apply
    pub fn transform(&self) -> ViewTransform {
        ViewTransform {
            translation: self.translation(),
            scale: self.zoom_scale,
        }
    }

    fn translation(&self) -> Point2 {
        let centre = Point2::new(
            self.width * (1.0 - self.zoom_scale) / 2.0,
            self.height * (1.0 - self.zoom_scale) / 2.0,
        );
        centre + self.pan_offset
    }

    /// Feed one pointer event
    pub fn handle_event(&mut self, event: PointerEvent) {
        if self.mask == ModifierMask::Disabled {
            return;
        }

        match event {
            PointerEvent::Released { .. } => self.end_interaction(),
            PointerEvent::Pressed {
                position,
                modifiers,
                ..
            } => {
                if self.mask.admits(modifiers) {
                    self.captured = true;
                    self.zoom_anchor = position;
                    self.last_position = Some(position);
                }
            }
            PointerEvent::Dragged {
                position,
                button,
                modifiers,
            } => {
                if self.mask.admits(modifiers) {
                    self.drag(position, button);
                }
            }
            PointerEvent::Wheel {
                position,
                rotation,
                modifiers,
            } => {
                if self.mask.admits(modifiers) {
                    self.zoom_anchor = position;
                    if rotation < 0 {
                        self.zoom_by(self.zoom_step);
                    } else if rotation > 0 {
                        self.zoom_by(1.0 / self.zoom_step);
                    }
                }
            }
        }
    }

    fn drag(&mut self, position: Point2, button: Button) {
        let Some(last) = self.last_position else {
            return;
        };

        if button == self.zoom_button {
            self.zooming = true;
            if position.y < last.y {
                self.zoom_by(self.zoom_step);
            } else if position.y > last.y {
                self.zoom_by(1.0 / self.zoom_step);
            }
            self.zoom_step += ZOOM_ACCELERATION;
        } else {
            self.panning = true;
            self.pan_offset = self.pan_offset + (position - last);
        }
        self.last_position = Some(position);
    }

    /// Scale by `factor`, keeping the zoom anchor fixed on screen
    fn zoom_by(&mut self, factor: f64) {
        let anchor = self.zoom_anchor;
        let coord = self.display_to_coord(anchor);
        self.zoom_scale *= factor;
        let moved = self.coord_to_display(coord);
        self.pan_offset = self.pan_offset + (anchor - moved);
    }

    fn end_interaction(&mut self) {
        let zoom_ended = std::mem::take(&mut self.zooming);
        let pan_ended = std::mem::take(&mut self.panning);
        self.zoom_step = INITIAL_ZOOM_STEP;
        self.captured = false;
        self.last_position = None;

        if zoom_ended || pan_ended {
            debug!(
                scale = self.zoom_scale,
                pan = %self.pan_offset,
                zoom_ended,
                pan_ended,
                "view interaction ended"
            );
        }
        for (_, listener) in self.listeners.iter_mut() {
            if zoom_ended {
                listener.zoom_ended();
            }
            if pan_ended {
                listener.pan_ended();
            }
        }
    }
}

impl fmt::Debug for ZoomPan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZoomPan")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("zoom_scale", &self.zoom_scale)
            .field("pan_offset", &self.pan_offset)
            .field("zooming", &self.zooming)
            .field("panning", &self.panning)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    const EPS: f64 = 1e-9;

    fn close(a: Point2, b: Point2) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
    }

    fn press(x: f64, y: f64, button: Button) -> PointerEvent {
        PointerEvent::Pressed {
            position: Point2::new(x, y),
            button,
            modifiers: Modifiers::NONE,
        }
    }

    fn drag(x: f64, y: f64, button: Button) -> PointerEvent {
        PointerEvent::Dragged {
            position: Point2::new(x, y),
            button,
            modifiers: Modifiers::NONE,
        }
    }

    fn release(button: Button) -> PointerEvent {
        PointerEvent::Released {
            position: Point2::default(),
            button,
            modifiers: Modifiers::NONE,
        }
    }

    #[derive(Default)]
    struct Counter {
        zooms: Rc<Cell<u32>>,
        pans: Rc<Cell<u32>>,
    }

    impl ZoomPanListener for Counter {
        fn zoom_ended(&mut self) {
            self.zooms.set(self.zooms.get() + 1);
        }

        fn pan_ended(&mut self) {
            self.pans.set(self.pans.get() + 1);
        }
    }

    #[test]
    fn test_identity_on_creation() {
        let view = ZoomPan::new(800.0, 600.0);
        let p = Point2::new(12.5, -3.0);
        assert_eq!(view.zoom_scale(), 1.0);
        assert!(close(view.display_to_coord(p), p));
        assert!(close(view.coord_to_display(p), p));
        assert!(!view.is_mouse_captured());
    }

    #[test]
    fn test_pan_drag_moves_offset() {
        let mut view = ZoomPan::new(100.0, 100.0);
        view.handle_event(press(10.0, 10.0, Button::Right));
        assert!(view.is_mouse_captured());
        view.handle_event(drag(15.0, 12.0, Button::Right));
        view.handle_event(drag(20.0, 20.0, Button::Right));

        assert!(view.is_panning());
        assert!(close(view.pan_offset(), Point2::new(10.0, 10.0)));
        assert!(close(view.coord_to_display(Point2::new(0.0, 0.0)), Point2::new(10.0, 10.0)));
    }

    #[test]
    fn test_drag_up_zooms_in_about_press_point() {
        let mut view = ZoomPan::new(200.0, 100.0);
        let anchor = Point2::new(30.0, 70.0);
        let anchor_coord = view.display_to_coord(anchor);

        view.handle_event(press(anchor.x, anchor.y, Button::Left));
        view.handle_event(drag(30.0, 60.0, Button::Left));
        view.handle_event(drag(30.0, 50.0, Button::Left));

        assert!(view.is_zooming());
        assert!((view.zoom_scale() - 1.05 * 1.055).abs() < EPS);
        assert!(close(view.coord_to_display(anchor_coord), anchor));
    }

    #[test]
    fn test_drag_down_zooms_out() {
        let mut view = ZoomPan::new(100.0, 100.0);
        view.handle_event(press(50.0, 50.0, Button::Left));
        view.handle_event(drag(50.0, 60.0, Button::Left));
        assert!((view.zoom_scale() - 1.0 / 1.05).abs() < EPS);
    }

    #[test]
    fn test_release_resets_step_and_notifies() {
        let mut view = ZoomPan::new(100.0, 100.0);
        let counter = Counter::default();
        let zooms = Rc::clone(&counter.zooms);
        let pans = Rc::clone(&counter.pans);
        view.add_listener(Box::new(counter));

        view.handle_event(press(50.0, 50.0, Button::Left));
        view.handle_event(drag(50.0, 40.0, Button::Left));
        view.handle_event(release(Button::Left));
        assert_eq!((zooms.get(), pans.get()), (1, 0));
        assert!(!view.is_zooming());
        assert!(!view.is_mouse_captured());

        // Step is back to its initial value for the next drag
        let before = view.zoom_scale();
        view.handle_event(press(50.0, 50.0, Button::Left));
        view.handle_event(drag(50.0, 40.0, Button::Left));
        assert!((view.zoom_scale() / before - 1.05).abs() < EPS);

        // A release with nothing in progress notifies nobody
        view.handle_event(release(Button::Left));
        view.handle_event(release(Button::Left));
        assert_eq!(zooms.get(), 2);
        assert_eq!(pans.get(), 0);
    }

    #[test]
    fn test_removed_listener_is_not_notified() {
        let mut view = ZoomPan::new(100.0, 100.0);
        let counter = Counter::default();
        let pans = Rc::clone(&counter.pans);
        let id = view.add_listener(Box::new(counter));
        assert!(view.remove_listener(id).is_some());
        assert!(view.remove_listener(id).is_none());

        view.handle_event(press(0.0, 0.0, Button::Right));
        view.handle_event(drag(5.0, 0.0, Button::Right));
        view.handle_event(release(Button::Right));
        assert_eq!(pans.get(), 0);
    }

    #[test]
    fn test_wheel_zoom_keeps_pointer_fixed() {
        let mut view = ZoomPan::new(400.0, 300.0);
        let pointer = Point2::new(100.0, 250.0);
        let coord = view.display_to_coord(pointer);

        view.handle_event(PointerEvent::Wheel {
            position: pointer,
            rotation: -1,
            modifiers: Modifiers::NONE,
        });
        assert!((view.zoom_scale() - 1.05).abs() < EPS);
        assert!(close(view.coord_to_display(coord), pointer));

        view.handle_event(PointerEvent::Wheel {
            position: pointer,
            rotation: 1,
            modifiers: Modifiers::NONE,
        });
        assert!((view.zoom_scale() - 1.0).abs() < EPS);
        assert!(close(view.coord_to_display(coord), pointer));
    }

    #[test]
    fn test_modifier_mask() {
        let mut view = ZoomPan::new(100.0, 100.0);
        view.set_modifier_mask(ModifierMask::Required(Modifiers::SHIFT));

        view.handle_event(press(0.0, 0.0, Button::Right));
        view.handle_event(drag(5.0, 5.0, Button::Right));
        assert!(!view.is_panning());

        let held = Modifiers::SHIFT.with(Modifiers::CONTROL);
        view.handle_event(PointerEvent::Pressed {
            position: Point2::new(0.0, 0.0),
            button: Button::Right,
            modifiers: held,
        });
        view.handle_event(PointerEvent::Dragged {
            position: Point2::new(5.0, 5.0),
            button: Button::Right,
            modifiers: held,
        });
        assert!(view.is_panning());
    }

    #[test]
    fn test_disabled_mask_ignores_everything() {
        let mut view = ZoomPan::new(100.0, 100.0);
        view.set_modifier_mask(ModifierMask::Disabled);
        view.handle_event(press(0.0, 0.0, Button::Left));
        view.handle_event(drag(0.0, -5.0, Button::Left));
        view.handle_event(PointerEvent::Wheel {
            position: Point2::new(0.0, 0.0),
            rotation: -3,
            modifiers: Modifiers::NONE,
        });
        assert_eq!(view.zoom_scale(), 1.0);
        assert!(!view.is_mouse_captured());
    }

    #[test]
    fn test_zoom_button_swap() {
        let mut view = ZoomPan::new(100.0, 100.0);
        view.set_zoom_button(Button::Right);
        view.handle_event(press(50.0, 50.0, Button::Left));
        view.handle_event(drag(50.0, 40.0, Button::Left));
        assert!(view.is_panning());
        assert!(!view.is_zooming());
        assert_eq!(view.zoom_scale(), 1.0);
    }

    #[test]
    fn test_reset_and_viewport() {
        let mut view = ZoomPan::new(100.0, 100.0);
        view.handle_event(press(10.0, 10.0, Button::Left));
        view.handle_event(drag(10.0, 0.0, Button::Left));
        view.reset();
        assert_eq!(view.zoom_scale(), 1.0);
        assert_eq!(view.pan_offset(), Point2::default());
        assert!(!view.is_zooming());

        view.set_viewport(200.0, 50.0);
        assert_eq!(view.viewport(), (200.0, 50.0));
        let t = view.transform();
        assert_eq!(t.scale, 1.0);
        assert!(close(t.translation, Point2::default()));
    }
}
