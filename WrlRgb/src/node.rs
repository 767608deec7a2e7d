//! Color node value type
//!
//! A [`ColorNode`] is the name that precedes a `Transform` keyword in a
//! VRML document together with the three channels of the `diffuseColor`
//! that follows it.

use std::fmt;

use crate::error::{Error, Result};

/// Minimum color channel value
pub const COLOR_VALUE_MIN: f32 = 0.0;
/// Maximum color channel value
pub const COLOR_VALUE_MAX: f32 = 1.0;

/// One of the three color channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Red => write!(f, "red"),
            Channel::Green => write!(f, "green"),
            Channel::Blue => write!(f, "blue"),
        }
    }
}

/// A named RGB triple with every channel in `[0.0, 1.0]`.
///
/// Equality compares the channels only; two nodes with different names but
/// the same color are equal. Verify and replace rely on this.
#[derive(Debug, Clone, Default)]
pub struct ColorNode {
    name: String,
    red: f32,
    green: f32,
    blue: f32,
}

impl ColorNode {
    /// Create an empty node (no name, black).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node from a name and three channel values.
    pub fn with_rgb(name: impl Into<String>, red: f32, green: f32, blue: f32) -> Result<Self> {
        let mut node = Self::new();
        node.set_name(name);
        node.set_red(red)?;
        node.set_green(green)?;
        node.set_blue(blue)?;
        Ok(node)
    }

    /// Reset to an empty node.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn red(&self) -> f32 {
        self.red
    }

    pub fn green(&self) -> f32 {
        self.green
    }

    pub fn blue(&self) -> f32 {
        self.blue
    }

    /// Read a channel by tag.
    pub fn channel(&self, channel: Channel) -> f32 {
        match channel {
            Channel::Red => self.red,
            Channel::Green => self.green,
            Channel::Blue => self.blue,
        }
    }

    pub fn set_red(&mut self, value: f32) -> Result<()> {
        self.set_channel(Channel::Red, value)
    }

    pub fn set_green(&mut self, value: f32) -> Result<()> {
        self.set_channel(Channel::Green, value)
    }

    pub fn set_blue(&mut self, value: f32) -> Result<()> {
        self.set_channel(Channel::Blue, value)
    }

    /// Set a channel, leaving the node untouched if `value` is out of range.
    pub fn set_channel(&mut self, channel: Channel, value: f32) -> Result<()> {
        if value.is_nan() {
            return Err(Error::ColorValueNotANumber { channel });
        }
        if value < COLOR_VALUE_MIN {
            return Err(Error::ColorValueBelowZero { channel, value });
        }
        if value > COLOR_VALUE_MAX {
            return Err(Error::ColorValueAboveOne { channel, value });
        }

        let slot = match channel {
            Channel::Red => &mut self.red,
            Channel::Green => &mut self.green,
            Channel::Blue => &mut self.blue,
        };
        *slot = value;
        Ok(())
    }

    /// Whether the name survives a whitespace-delimited round trip.
    pub fn has_portable_name(&self) -> bool {
        !self.name.is_empty() && !self.name.chars().any(char::is_whitespace)
    }
}

impl PartialEq for ColorNode {
    fn eq(&self, other: &Self) -> bool {
        self.red == other.red && self.green == other.green && self.blue == other.blue
    }
}

/// Formats as `<name> <red> <green> <blue>`.
impl fmt::Display for ColorNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.name, self.red, self.green, self.blue)
    }
}
