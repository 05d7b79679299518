//! Platform abstraction layer
//!
//! The simulation never owns a window. It draws through a [`RenderSurface`],
//! reads keys through [`Keyboard`] and measures frames with a [`Clock`].
//! Headless implementations live here for the native binary and tests.

pub mod clock;
pub mod headless;

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use clock::{Clock, ManualClock, SystemClock};
pub use headless::HeadlessSurface;

/// Keys the game queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Escape,
    Space,
}

/// Window events drained once per rendered frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Closed,
    KeyPressed(Key),
    KeyReleased(Key),
}

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// A shape handed to the surface, positioned by its center
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Drawable {
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Rectangle {
        center: Vec2,
        size: Vec2,
        color: Color,
    },
}

impl Drawable {
    pub fn center(&self) -> Vec2 {
        match *self {
            Drawable::Circle { center, .. } | Drawable::Rectangle { center, .. } => center,
        }
    }

    pub fn set_center(&mut self, pos: Vec2) {
        match self {
            Drawable::Circle { center, .. } | Drawable::Rectangle { center, .. } => *center = pos,
        }
    }

    pub fn set_color(&mut self, fill: Color) {
        match self {
            Drawable::Circle { color, .. } | Drawable::Rectangle { color, .. } => *color = fill,
        }
    }
}

/// On-demand keyboard state
pub trait Keyboard {
    fn is_key_pressed(&self, key: Key) -> bool;
}

/// Window-like target the game renders to and polls
pub trait RenderSurface: Keyboard {
    fn clear(&mut self, color: Color);
    fn draw(&mut self, drawable: &Drawable);
    /// Present the frame; may block on vsync
    fn display(&mut self);
    fn set_title(&mut self, title: &str);
    fn set_framerate_limit(&mut self, fps: u32);
    fn close(&mut self);
    fn is_open(&self) -> bool;
    /// Next pending window event, if any
    fn poll_event(&mut self) -> Option<Event>;
}
