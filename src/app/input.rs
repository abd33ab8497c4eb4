//! Per-frame pointer state.
//!
//! The window layer injects winit events; the viewer queries the result once
//! per frame. Besides held buttons and deltas this tracks *clicks*: a left
//! press and release that moved less than [`CLICK_DRAG_THRESHOLD`] pixels, so
//! that ending an orbit drag does not also pick whatever is under the cursor.

use std::collections::HashSet;

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta};

/// Maximum cursor travel, in pixels, between press and release for the pair to
/// count as a click.
pub const CLICK_DRAG_THRESHOLD: f32 = 4.0;

#[derive(Debug, Clone, Default)]
pub struct Input {
    pressed_mouse: HashSet<MouseButton>,
    just_pressed_mouse: HashSet<MouseButton>,
    just_released_mouse: HashSet<MouseButton>,

    /// `None` until the first cursor event.
    mouse_position: Option<Vec2>,
    mouse_delta: Vec2,
    scroll_delta: Vec2,

    screen_size: Vec2,

    press_position: Option<Vec2>,
    click: Option<Vec2>,
}

impl Input {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========== System API (called by the window layer) ==========

    /// Clears transient state (just pressed/released, deltas, clicks).
    pub fn start_frame(&mut self) {
        self.just_pressed_mouse.clear();
        self.just_released_mouse.clear();
        self.mouse_delta = Vec2::ZERO;
        self.scroll_delta = Vec2::ZERO;
        self.click = None;
    }

    pub fn inject_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.pressed_mouse.insert(button) {
                    self.just_pressed_mouse.insert(button);
                    if button == MouseButton::Left {
                        self.press_position = Some(self.mouse_position());
                    }
                }
            }
            ElementState::Released => {
                if self.pressed_mouse.remove(&button) {
                    self.just_released_mouse.insert(button);
                    if button == MouseButton::Left
                        && let Some(pressed_at) = self.press_position.take()
                        && pressed_at.distance(self.mouse_position()) <= CLICK_DRAG_THRESHOLD
                    {
                        self.click = Some(self.mouse_position());
                    }
                }
            }
        }
    }

    pub fn inject_mouse_position(&mut self, x: f32, y: f32) {
        let new_pos = Vec2::new(x, y);
        if let Some(previous) = self.mouse_position {
            self.mouse_delta += new_pos - previous;
        }
        self.mouse_position = Some(new_pos);
    }

    pub fn inject_scroll(&mut self, delta: MouseScrollDelta) {
        match delta {
            MouseScrollDelta::LineDelta(x, y) => {
                self.scroll_delta += Vec2::new(x, y);
            }
            MouseScrollDelta::PixelDelta(pos) => {
                const PIXEL_SCALE: f32 = 0.01;
                self.scroll_delta += Vec2::new(pos.x as f32, pos.y as f32) * PIXEL_SCALE;
            }
        }
    }

    pub fn inject_resize(&mut self, width: u32, height: u32) {
        self.screen_size = Vec2::new(width as f32, height as f32);
    }

    // ========== Queries ==========

    #[must_use]
    pub fn get_mouse_button(&self, button: MouseButton) -> bool {
        self.pressed_mouse.contains(&button)
    }

    #[must_use]
    pub fn get_mouse_button_down(&self, button: MouseButton) -> bool {
        self.just_pressed_mouse.contains(&button)
    }

    #[must_use]
    pub fn get_mouse_button_up(&self, button: MouseButton) -> bool {
        self.just_released_mouse.contains(&button)
    }

    #[must_use]
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position.unwrap_or(Vec2::ZERO)
    }

    #[must_use]
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    #[must_use]
    pub fn scroll_delta(&self) -> Vec2 {
        self.scroll_delta
    }

    #[must_use]
    pub fn screen_size(&self) -> Vec2 {
        self.screen_size
    }

    /// Cursor position of a left click completed this frame.
    #[must_use]
    pub fn click(&self) -> Option<Vec2> {
        self.click
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_release_in_place_is_a_click() {
        let mut input = Input::new();
        input.inject_mouse_position(100.0, 200.0);
        input.inject_mouse_button(MouseButton::Left, ElementState::Pressed);
        input.inject_mouse_position(102.0, 201.0);
        input.inject_mouse_button(MouseButton::Left, ElementState::Released);

        assert_eq!(input.click(), Some(Vec2::new(102.0, 201.0)));

        input.start_frame();
        assert_eq!(input.click(), None);
    }

    #[test]
    fn drag_is_not_a_click() {
        let mut input = Input::new();
        input.inject_mouse_position(100.0, 200.0);
        input.inject_mouse_button(MouseButton::Left, ElementState::Pressed);
        input.inject_mouse_position(160.0, 200.0);
        input.inject_mouse_button(MouseButton::Left, ElementState::Released);

        assert_eq!(input.click(), None);
        assert!(input.get_mouse_button_up(MouseButton::Left));
        assert_eq!(input.mouse_delta(), Vec2::new(60.0, 0.0));
    }

    #[test]
    fn right_button_never_clicks() {
        let mut input = Input::new();
        input.inject_mouse_position(10.0, 10.0);
        input.inject_mouse_button(MouseButton::Right, ElementState::Pressed);
        input.inject_mouse_button(MouseButton::Right, ElementState::Released);

        assert_eq!(input.click(), None);
    }

    #[test]
    fn drag_starting_at_origin_has_delta() {
        let mut input = Input::new();
        input.inject_mouse_position(0.0, 0.0);
        input.inject_mouse_button(MouseButton::Left, ElementState::Pressed);
        input.inject_mouse_position(30.0, -10.0);

        assert_eq!(input.mouse_delta(), Vec2::new(30.0, -10.0));
    }

    #[test]
    fn first_cursor_event_has_no_delta() {
        let mut input = Input::new();
        input.inject_mouse_position(640.0, 360.0);

        assert_eq!(input.mouse_delta(), Vec2::ZERO);
        assert_eq!(input.mouse_position(), Vec2::new(640.0, 360.0));
    }
}
