//! Platform abstraction layer
//!
//! Turns raw keyboard events into per-tick [`TickInput`]. Keys are matched by
//! physical code (`KeyboardEvent.code`) so the layout does not matter.

use glam::Vec2;

use crate::sim::TickInput;

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Keys the game listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Confirm,
    Forward,
    Back,
    Left,
    Right,
    Jump,
    Teleport,
    Restart,
}

impl Key {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "Enter" => Some(Key::Confirm),
            "KeyW" => Some(Key::Forward),
            "KeyS" => Some(Key::Back),
            "KeyA" => Some(Key::Left),
            "KeyD" => Some(Key::Right),
            "Space" => Some(Key::Jump),
            "KeyE" => Some(Key::Teleport),
            "KeyR" => Some(Key::Restart),
            _ => None,
        }
    }

    /// Keys that act once per physical press rather than while held
    pub fn is_one_shot(self) -> bool {
        matches!(self, Key::Confirm | Key::Teleport | Key::Restart)
    }
}

/// Held keys plus presses not yet consumed by a tick
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: Vec<Key>,
    pressed: Vec<Key>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a keydown. Auto-repeat never re-triggers a one-shot key.
    pub fn key_down(&mut self, key: Key, repeat: bool) {
        let already_held = self.is_held(key);
        if !already_held {
            self.held.push(key);
        }
        if key.is_one_shot() && !repeat && !already_held && !self.pressed.contains(&key) {
            self.pressed.push(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.retain(|&k| k != key);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Drop everything, e.g. when the window loses focus
    pub fn release_all(&mut self) {
        self.held.clear();
        self.pressed.clear();
    }

    /// Build the input for the next tick and consume pending presses
    pub fn take_input(&mut self, look_delta: Vec2) -> TickInput {
        let pressed = std::mem::take(&mut self.pressed);
        TickInput {
            forward: self.is_held(Key::Forward),
            back: self.is_held(Key::Back),
            left: self.is_held(Key::Left),
            right: self.is_held(Key::Right),
            jump: self.is_held(Key::Jump),
            confirm: pressed.contains(&Key::Confirm),
            teleport: pressed.contains(&Key::Teleport),
            restart: pressed.contains(&Key::Restart),
            look_delta,
        }
    }
}
