//! Window-less render surface
//!
//! Records what would have been drawn and serves scripted key state and
//! events. Used by the native binary and by tests.

use std::collections::{HashSet, VecDeque};

use super::{Color, Drawable, Event, Key, Keyboard, RenderSurface};

#[derive(Debug)]
pub struct HeadlessSurface {
    open: bool,
    title: String,
    framerate_limit: Option<u32>,
    clear_color: Color,
    pressed: HashSet<Key>,
    events: VecDeque<Event>,
    /// Drawables submitted since the last clear
    pending: Vec<Drawable>,
    /// Drawables of the last displayed frame
    presented: Vec<Drawable>,
    frames: u64,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self {
            open: true,
            title: String::new(),
            framerate_limit: None,
            clear_color: Color::BLACK,
            pressed: HashSet::new(),
            events: VecDeque::new(),
            pending: Vec::new(),
            presented: Vec::new(),
            frames: 0,
        }
    }

    /// Hold a key down until released
    pub fn press(&mut self, key: Key) {
        self.pressed.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.pressed.remove(&key);
    }

    /// Queue an event for the next `poll_event`
    pub fn push_event(&mut self, event: Event) {
        self.events.push_back(event);
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn framerate_limit(&self) -> Option<u32> {
        self.framerate_limit
    }

    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    /// Drawables of the last displayed frame
    pub fn presented(&self) -> &[Drawable] {
        &self.presented
    }

    /// Number of frames displayed so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Keyboard for HeadlessSurface {
    fn is_key_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }
}

impl RenderSurface for HeadlessSurface {
    fn clear(&mut self, color: Color) {
        self.clear_color = color;
        self.pending.clear();
    }

    fn draw(&mut self, drawable: &Drawable) {
        self.pending.push(*drawable);
    }

    fn display(&mut self) {
        self.presented = std::mem::take(&mut self.pending);
        self.frames += 1;
    }

    fn set_title(&mut self, title: &str) {
        self.title.clear();
        self.title.push_str(title);
    }

    fn set_framerate_limit(&mut self, fps: u32) {
        self.framerate_limit = Some(fps);
    }

    fn close(&mut self) {
        self.open = false;
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn poll_event(&mut self) -> Option<Event> {
        self.events.pop_front()
    }
}
