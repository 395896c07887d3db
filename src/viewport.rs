//! Design-pixel to viewport sizing. Layouts are drawn against a 750px wide
//! mock, where 750 design pixels span 100vw.

use crate::error::{Result, UtilError, describe_js};

pub const DESIGN_WIDTH: f64 = 750.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportScale {
    pub design_width: f64,
}

impl Default for ViewportScale {
    fn default() -> Self {
        Self { design_width: DESIGN_WIDTH }
    }
}

impl ViewportScale {
    pub fn new(design_width: f64) -> Self {
        Self { design_width }
    }

    /// Design pixels as vw units.
    pub fn to_vw(&self, pixel: f64) -> f64 {
        pixel * (100.0 / self.design_width)
    }

    /// Design pixels as live pixels for a viewport `viewport_width` wide.
    pub fn to_px(&self, pixel: f64, viewport_width: f64) -> f64 {
        self.to_vw(pixel) * (viewport_width / 100.0)
    }
}

/// [`ViewportScale::to_px`] with the 750px design width.
pub fn px2vw_size(pixel: f64, viewport_width: f64) -> f64 {
    ViewportScale::default().to_px(pixel, viewport_width)
}

/// `window.innerWidth` at call time.
pub fn viewport_width() -> Result<f64> {
    let win = web_sys::window().ok_or(UtilError::NoWindow)?;
    let width = win
        .inner_width()
        .map_err(|e| UtilError::Viewport(describe_js(&e)))?;
    width
        .as_f64()
        .ok_or_else(|| UtilError::Viewport("innerWidth is not a number".to_string()))
}
