// src/selection_logic.rs
// Selection state machine. No druid dependency: the overlay widget feeds it events
// and acts on the returned `Response`.

use log::debug;

use crate::selection::{Bounds, CaptureRegion, Point, SelectionRect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Left,
    Right,
    Other,
}

/// 交互状态
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Interaction {
    /// No gesture in progress. The rectangle may still hold a finished selection.
    Idle,
    /// The free corner follows the pointer.
    Drawing,
    /// The whole rectangle follows the pointer; `anchor` is the last pointer position.
    Dragging { anchor: Point },
    /// Context menu is up, rectangle is frozen.
    MenuOpen,
}

/// What the overlay has to do after feeding an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    Ignored,
    Repaint,
    OpenMenu,
    Hide,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionMachine {
    rect: SelectionRect,
    state: Interaction,
    bounds: Bounds,
}

impl SelectionMachine {
    pub fn new(bounds: Bounds) -> Self {
        SelectionMachine {
            rect: SelectionRect::EMPTY,
            state: Interaction::Idle,
            bounds,
        }
    }

    pub fn rect(&self) -> SelectionRect {
        self.rect
    }

    pub fn state(&self) -> Interaction {
        self.state
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// The surface changed size under us. The rectangle is left as is and
    /// gets clipped again when a region is captured.
    pub fn resize(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    /// Normalized rectangle to highlight, if there is one.
    pub fn spotlight(&self) -> Option<SelectionRect> {
        let r = self.rect().normalized();
        (!r.is_empty() || self.state == Interaction::Drawing).then_some(r)
    }

    pub fn press(&mut self, button: Button, pos: Point) -> Response {
        match self.state {
            // A click while the menu is up only dismisses it.
            Interaction::MenuOpen => {
                debug!("menu dismissed by press at ({}, {})", pos.x, pos.y);
                self.state = Interaction::Idle;
                Response::Ignored
            }
            _ if button != Button::Left => Response::Ignored,
            Interaction::Idle | Interaction::Drawing | Interaction::Dragging { .. } => {
                // Containment must be tested against the normalized rectangle.
                self.rect.normalize();
                if !self.rect.is_empty() && self.rect.contains(pos) {
                    debug!("dragging selection from ({}, {})", pos.x, pos.y);
                    self.state = Interaction::Dragging { anchor: pos };
                    Response::Ignored
                } else {
                    self.rect = SelectionRect::at(pos);
                    self.state = Interaction::Drawing;
                    Response::Repaint
                }
            }
        }
    }

    pub fn motion(&mut self, pos: Point) -> Response {
        match self.state {
            Interaction::Drawing => {
                self.rect.end = pos;
                Response::Repaint
            }
            Interaction::Dragging { anchor } => {
                self.rect.translate(pos.x - anchor.x, pos.y - anchor.y);
                self.rect.clamp_within(self.bounds);
                self.state = Interaction::Dragging { anchor: pos };
                Response::Repaint
            }
            Interaction::Idle | Interaction::MenuOpen => Response::Ignored,
        }
    }

    pub fn release(&mut self, button: Button, _pos: Point) -> Response {
        match (self.state, button) {
            (Interaction::MenuOpen, _) => Response::Ignored,
            (_, Button::Right) => {
                self.state = Interaction::MenuOpen;
                Response::OpenMenu
            }
            (Interaction::Drawing | Interaction::Dragging { .. }, _) => {
                self.state = Interaction::Idle;
                Response::Repaint
            }
            (Interaction::Idle, _) => Response::Ignored,
        }
    }

    pub fn escape(&mut self) -> Response {
        self.finish();
        Response::Hide
    }

    /// Back to `Idle` with an empty rectangle.
    pub fn finish(&mut self) {
        self.rect = SelectionRect::EMPTY;
        self.state = Interaction::Idle;
    }

    pub fn capture_region(&self) -> Option<CaptureRegion> {
        self.rect.capture_region(self.bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> SelectionMachine {
        SelectionMachine::new(Bounds::new(1920.0, 1080.0))
    }

    fn draw(m: &mut SelectionMachine, from: (f64, f64), to: (f64, f64)) {
        m.press(Button::Left, Point::new(from.0, from.1));
        m.motion(Point::new(to.0, to.1));
        m.release(Button::Left, Point::new(to.0, to.1));
    }

    #[test]
    fn press_starts_drawing_at_click_point() {
        let mut m = machine();
        assert_eq!(m.press(Button::Left, Point::new(40.0, 60.0)), Response::Repaint);
        assert_eq!(m.state(), Interaction::Drawing);
        assert_eq!(m.rect(), SelectionRect::new(40.0, 60.0, 40.0, 60.0));
    }

    #[test]
    fn draw_then_release_keeps_rectangle() {
        let mut m = machine();
        draw(&mut m, (100.0, 100.0), (300.0, 250.0));
        assert_eq!(m.state(), Interaction::Idle);
        assert_eq!(m.rect(), SelectionRect::new(100.0, 100.0, 300.0, 250.0));
        assert_eq!(
            m.capture_region(),
            Some(CaptureRegion { x: 100, y: 100, width: 200, height: 150 })
        );
    }

    #[test]
    fn motion_without_press_is_ignored() {
        let mut m = machine();
        assert_eq!(m.motion(Point::new(10.0, 10.0)), Response::Ignored);
        assert_eq!(m.rect(), SelectionRect::EMPTY);
    }

    #[test]
    fn press_inside_drags_and_keeps_size() {
        let mut m = machine();
        draw(&mut m, (100.0, 100.0), (300.0, 250.0));

        m.press(Button::Left, Point::new(150.0, 150.0));
        assert!(matches!(m.state(), Interaction::Dragging { .. }));
        m.motion(Point::new(160.0, 145.0));
        m.motion(Point::new(170.0, 140.0));
        m.release(Button::Left, Point::new(170.0, 140.0));

        assert_eq!(m.rect(), SelectionRect::new(120.0, 90.0, 320.0, 240.0));
        assert_eq!(m.rect().width(), 200.0);
        assert_eq!(m.rect().height(), 150.0);
        assert_eq!(m.state(), Interaction::Idle);
    }

    #[test]
    fn press_inside_reversed_rectangle_still_drags() {
        let mut m = machine();
        draw(&mut m, (300.0, 250.0), (100.0, 100.0));
        m.press(Button::Left, Point::new(150.0, 150.0));
        assert!(matches!(m.state(), Interaction::Dragging { .. }));
        assert_eq!(m.rect(), SelectionRect::new(100.0, 100.0, 300.0, 250.0));
    }

    #[test]
    fn press_outside_starts_a_fresh_rectangle() {
        let mut m = machine();
        draw(&mut m, (100.0, 100.0), (300.0, 250.0));
        m.press(Button::Left, Point::new(500.0, 500.0));
        assert_eq!(m.state(), Interaction::Drawing);
        assert_eq!(m.rect(), SelectionRect::at(Point::new(500.0, 500.0)));
    }

    #[test]
    fn drag_past_left_edge_clamps_without_resizing() {
        let mut m = machine();
        draw(&mut m, (20.0, 500.0), (120.0, 600.0));
        m.press(Button::Left, Point::new(50.0, 550.0));
        // left edge would land on x = -30
        m.motion(Point::new(0.0, 550.0));
        assert_eq!(m.rect(), SelectionRect::new(0.0, 500.0, 100.0, 600.0));
    }

    #[test]
    fn drag_is_incremental_after_clamping() {
        let mut m = machine();
        draw(&mut m, (20.0, 500.0), (120.0, 600.0));
        m.press(Button::Left, Point::new(50.0, 550.0));
        m.motion(Point::new(-100.0, 550.0));
        m.motion(Point::new(-90.0, 550.0));
        assert_eq!(m.rect(), SelectionRect::new(10.0, 500.0, 110.0, 600.0));
    }

    #[test]
    fn right_click_opens_one_menu_without_touching_rectangle() {
        let mut m = machine();
        draw(&mut m, (100.0, 100.0), (300.0, 250.0));
        let before = m.rect();

        m.press(Button::Right, Point::new(400.0, 400.0));
        assert_eq!(m.release(Button::Right, Point::new(400.0, 400.0)), Response::OpenMenu);
        assert_eq!(m.state(), Interaction::MenuOpen);
        assert_eq!(m.release(Button::Right, Point::new(400.0, 400.0)), Response::Ignored);
        assert_eq!(m.motion(Point::new(10.0, 10.0)), Response::Ignored);
        assert_eq!(m.rect(), before);
    }

    #[test]
    fn press_while_menu_open_dismisses_and_keeps_rectangle() {
        let mut m = machine();
        draw(&mut m, (100.0, 100.0), (300.0, 250.0));
        m.release(Button::Right, Point::new(400.0, 400.0));

        assert_eq!(m.press(Button::Left, Point::new(500.0, 500.0)), Response::Ignored);
        assert_eq!(m.state(), Interaction::Idle);
        assert_eq!(m.rect(), SelectionRect::new(100.0, 100.0, 300.0, 250.0));
    }

    #[test]
    fn other_buttons_do_not_start_a_selection() {
        let mut m = machine();
        assert_eq!(m.press(Button::Other, Point::new(5.0, 5.0)), Response::Ignored);
        assert_eq!(m.state(), Interaction::Idle);
    }

    #[test]
    fn escape_resets_from_every_state() {
        let mut drawing = machine();
        drawing.press(Button::Left, Point::new(10.0, 10.0));
        drawing.motion(Point::new(50.0, 50.0));

        let mut dragging = machine();
        draw(&mut dragging, (10.0, 10.0), (50.0, 50.0));
        dragging.press(Button::Left, Point::new(20.0, 20.0));
        dragging.motion(Point::new(25.0, 25.0));

        let mut selected = machine();
        draw(&mut selected, (10.0, 10.0), (50.0, 50.0));

        let mut menu = machine();
        draw(&mut menu, (10.0, 10.0), (50.0, 50.0));
        menu.release(Button::Right, Point::new(20.0, 20.0));

        for mut m in [drawing, dragging, selected, menu] {
            assert_eq!(m.escape(), Response::Hide);
            assert_eq!(m.rect(), SelectionRect::EMPTY);
            assert_eq!(m.state(), Interaction::Idle);
        }
    }

    #[test]
    fn click_without_drag_has_no_region() {
        let mut m = machine();
        m.press(Button::Left, Point::new(10.0, 10.0));
        m.release(Button::Left, Point::new(10.0, 10.0));
        assert_eq!(m.capture_region(), None);
        assert_eq!(m.spotlight(), None);
    }

    #[test]
    fn resized_surface_clips_capture_region() {
        let mut m = machine();
        draw(&mut m, (1700.0, 900.0), (1900.0, 1000.0));
        m.resize(Bounds::new(1800.0, 950.0));
        assert_eq!(
            m.capture_region(),
            Some(CaptureRegion { x: 1700, y: 900, width: 100, height: 50 })
        );
    }
}
