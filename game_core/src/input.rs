use std::{collections::VecDeque, fmt, str::FromStr};

use crossbeam_channel::Receiver;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Key {
    W,
    A,
    S,
    D,
    Escape,
    Other(u32),
}

impl FromStr for Key {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s.trim().to_ascii_lowercase().as_str() {
            "w" => Key::W,
            "a" => Key::A,
            "s" => Key::S,
            "d" => Key::D,
            "escape" | "esc" => Key::Escape,
            other => match other.parse::<u32>() {
                Ok(code) => Key::Other(code),
                Err(_) => return Err(format!("unknown key '{s}'")),
            },
        };
        Ok(key)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::W => f.write_str("w"),
            Key::A => f.write_str("a"),
            Key::S => f.write_str("s"),
            Key::D => f.write_str("d"),
            Key::Escape => f.write_str("escape"),
            Key::Other(code) => write!(f, "{code}"),
        }
    }
}

impl TryFrom<String> for Key {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        key.to_string()
    }
}

/// Discrete input delivered to the loop once per poll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Quit,
    KeyPress(Key),
    KeyRelease(Key),
    /// Absolute position in drawing-surface units.
    PointerMove { x: f64, y: f64 },
}

impl InputEvent {
    /// Window close, or any Escape key event.
    #[inline]
    pub fn is_quit(&self) -> bool {
        matches!(
            self,
            InputEvent::Quit
                | InputEvent::KeyPress(Key::Escape)
                | InputEvent::KeyRelease(Key::Escape)
        )
    }
}

/// Non-blocking event queue. `None` means "empty for now", not "closed".
pub trait InputSource {
    fn poll(&mut self) -> Option<InputEvent>;
}

impl InputSource for VecDeque<InputEvent> {
    #[inline]
    fn poll(&mut self) -> Option<InputEvent> {
        self.pop_front()
    }
}

impl<I: InputSource + ?Sized> InputSource for Box<I> {
    #[inline]
    fn poll(&mut self) -> Option<InputEvent> {
        (**self).poll()
    }
}

/// Drains events pushed from another thread.
///
/// A disconnected sender reads as an empty queue; a producer that wants the
/// loop to stop must send [`InputEvent::Quit`].
pub struct ChannelInput {
    rx: Receiver<InputEvent>,
}

impl ChannelInput {
    #[inline]
    pub fn new(rx: Receiver<InputEvent>) -> Self {
        Self { rx }
    }
}

impl InputSource for ChannelInput {
    #[inline]
    fn poll(&mut self) -> Option<InputEvent> {
        self.rx.try_recv().ok()
    }
}
