use std::collections::HashSet;

use glam::Vec2;
use winit::{
    dpi::{PhysicalPosition, PhysicalSize},
    event::{ElementState, MouseButton, VirtualKeyCode, WindowEvent},
};

use crate::stage::{HostInput, Viewport};

/// Turns window events into [`HostInput`]. Held keys are tracked so that key
/// repeat does not fire the skip action more than once per press.
pub struct EventManager {
    keys_held: HashSet<VirtualKeyCode>,
}

impl EventManager {
    pub fn new() -> Self {
        Self {
            keys_held: HashSet::new(),
        }
    }

    pub fn translate(&mut self, event: &WindowEvent) -> Option<HostInput> {
        match event {
            WindowEvent::CursorMoved { position, .. } => Some(pointer(*position)),
            WindowEvent::MouseInput { state, button, .. } => mouse(*button, *state),
            WindowEvent::KeyboardInput { input, .. } => self.key(input.virtual_keycode, input.state),
            WindowEvent::Resized(size) => Some(resized(*size)),
            _ => None,
        }
    }

    pub fn key(&mut self, keycode: Option<VirtualKeyCode>, state: ElementState) -> Option<HostInput> {
        let keycode = keycode?;
        match state {
            ElementState::Pressed => {
                let initial = self.keys_held.insert(keycode);
                let skip_key = matches!(keycode, VirtualKeyCode::Return | VirtualKeyCode::Space);
                (initial && skip_key).then_some(HostInput::Skip)
            }
            ElementState::Released => {
                self.keys_held.remove(&keycode);
                None
            }
        }
    }
}

fn pointer(position: PhysicalPosition<f64>) -> HostInput {
    HostInput::PointerMoved(Vec2::new(position.x as f32, position.y as f32))
}

fn mouse(button: MouseButton, state: ElementState) -> Option<HostInput> {
    (button == MouseButton::Left && state == ElementState::Pressed).then_some(HostInput::Skip)
}

fn resized(size: PhysicalSize<u32>) -> HostInput {
    HostInput::Resized(Viewport::new(size.width as f32, size.height as f32))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_skip_keys_fire_once_per_press() {
        let mut events = EventManager::new();
        let enter = Some(VirtualKeyCode::Return);
        assert_eq!(events.key(enter, ElementState::Pressed), Some(HostInput::Skip));
        assert_eq!(events.key(enter, ElementState::Pressed), None);
        assert_eq!(events.key(enter, ElementState::Released), None);
        assert_eq!(events.key(enter, ElementState::Pressed), Some(HostInput::Skip));

        assert_eq!(
            events.key(Some(VirtualKeyCode::Space), ElementState::Pressed),
            Some(HostInput::Skip)
        );
        assert_eq!(events.key(Some(VirtualKeyCode::A), ElementState::Pressed), None);
        assert_eq!(events.key(None, ElementState::Pressed), None);
    }

    #[test]
    fn test_click_and_pointer() {
        assert_eq!(
            mouse(MouseButton::Left, ElementState::Pressed),
            Some(HostInput::Skip)
        );
        assert_eq!(mouse(MouseButton::Left, ElementState::Released), None);
        assert_eq!(mouse(MouseButton::Right, ElementState::Pressed), None);
        assert_eq!(
            pointer(PhysicalPosition::new(12.5, 3.0)),
            HostInput::PointerMoved(Vec2::new(12.5, 3.0))
        );
        assert_eq!(
            resized(PhysicalSize::new(640, 480)),
            HostInput::Resized(Viewport::new(640.0, 480.0))
        );
    }
}
