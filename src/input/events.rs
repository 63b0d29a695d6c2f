//! Pointer event types and surface-local coordinate translation.

use std::fmt;
use std::str::FromStr;

/// On-screen position of a surface's top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SurfaceOffset {
    pub left: f64,
    pub top: f64,
}

impl SurfaceOffset {
    pub fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }

    /// Converts raw input-device coordinates into surface-local ones.
    pub fn translate(&self, raw: PointerPosition) -> PointerPosition {
        PointerPosition {
            x: raw.x - self.left,
            y: raw.y - self.top,
        }
    }
}

/// A pointer position, either raw or surface-local depending on context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl PointerPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for PointerPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl FromStr for PointerPosition {
    type Err = String;

    /// Parses `"X,Y"` (whitespace around either number is ignored).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| format!("expected X,Y but got '{s}'"))?;
        let parse = |part: &str| {
            part.trim()
                .parse::<f64>()
                .map_err(|err| format!("invalid coordinate '{}': {}", part.trim(), err))
        };
        Ok(Self {
            x: parse(x)?,
            y: parse(y)?,
        })
    }
}

/// Discrete events a slot reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoardEvent {
    /// A click on the drawing surface, already translated to surface-local space
    PointCaptured(PointerPosition),
    /// The slot's Clear control was pressed
    Clear,
    /// The slot was (re)activated
    Activate,
}
