//! Shapes shared with the renderer: the drawing context wrapper and one
//! falling red packet.

use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::color::{ParseRgbError, Rgb};

/// Logical size of a canvas backing surface.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CanvasParams {
    pub width: f64,
    pub height: f64,
}

/// A 2D context paired with the size of its surface.
#[derive(Clone, Debug)]
pub struct CanvasContext<C = CanvasRenderingContext2d> {
    pub ctx: C,
    pub params: CanvasParams,
}

impl<C> CanvasContext<C> {
    pub fn new(ctx: C, width: f64, height: f64) -> Self {
        Self { ctx, params: CanvasParams { width, height } }
    }
}

/// One falling packet.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RedPacket<I = HtmlImageElement> {
    pub id: u32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Fall distance per tick.
    pub speed: f64,
    /// Current angle.
    pub rotate: f64,
    /// Angle added per tick.
    pub rotate_speed: f64,
    /// Shared with the image cache, which keeps the owning entry.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub image_el: I,
    /// Unique among live packets; see [`crate::hash_color`].
    pub sub_hit_color: String,
    pub z_index: i32,
}

impl<I> RedPacket<I> {
    /// The hit color as channels, for matching against hit-buffer pixels.
    pub fn hit_rgb(&self) -> Result<Rgb, ParseRgbError> {
        self.sub_hit_color.parse()
    }
}
