//! Keyboard input mapping
//!
//! Tracks which steering keys are held and turns them into a horizontal
//! velocity for the next tick. Only left/right is supported.

use std::collections::BTreeSet;

use crate::sim::TickInput;

/// Recognized key identifiers (`KeyboardEvent.key` values)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    A,
    D,
}

impl Key {
    /// Map a DOM key identifier; anything else is ignored
    pub fn from_key_str(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Key::ArrowLeft),
            "ArrowRight" => Some(Key::ArrowRight),
            "a" => Some(Key::A),
            "d" => Some(Key::D),
            _ => None,
        }
    }

    fn is_left(&self) -> bool {
        matches!(self, Key::ArrowLeft | Key::A)
    }

    fn is_right(&self) -> bool {
        matches!(self, Key::ArrowRight | Key::D)
    }
}

/// Held-key set and the velocity derived from it
#[derive(Debug, Clone, Default)]
pub struct InputMapper {
    held: BTreeSet<Key>,
    dx: f32,
}

impl InputMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key pressed; returns true if the key is a steering key
    pub fn key_down(&mut self, key: &str, speed: f32) -> bool {
        let Some(key) = Key::from_key_str(key) else {
            return false;
        };
        self.held.insert(key);
        self.recompute(speed);
        true
    }

    /// Key released; returns true if the key is a steering key
    pub fn key_up(&mut self, key: &str, speed: f32) -> bool {
        let Some(key) = Key::from_key_str(key) else {
            return false;
        };
        self.held.remove(&key);
        self.recompute(speed);
        true
    }

    /// Right wins when both directions are held
    fn recompute(&mut self, speed: f32) {
        self.dx = 0.0;
        if self.held.iter().any(Key::is_left) {
            self.dx = -speed;
        }
        if self.held.iter().any(Key::is_right) {
            self.dx = speed;
        }
    }

    /// Current desired horizontal velocity
    pub fn dx(&self) -> f32 {
        self.dx
    }

    /// Drop every held key (e.g. on focus loss)
    pub fn clear(&mut self) {
        self.held.clear();
        self.dx = 0.0;
    }

    pub fn tick_input(&self) -> TickInput {
        TickInput { dx: self.dx }
    }
}
