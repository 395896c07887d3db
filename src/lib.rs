//! Red packet rain helpers.
//!
//! Small utilities used by the falling red packet canvas effect: random spawn
//! values, unique hit-test colors, a filename-keyed image cache and
//! design-pixel to viewport sizing. The renderer and game loop live on the JS
//! side; this crate exposes both a Rust API and a `wasm_bindgen` surface that
//! keeps the JS helper names.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

pub mod color;
pub mod config;
mod error;
pub mod image_cache;
pub mod logging;
pub mod random;
pub mod types;
pub mod viewport;

pub use color::{ColorSet, DEFAULT_MAX_COLOR_ATTEMPTS, Rgb, hash_color, random_color};
pub use config::Settings;
pub use error::{Result, UtilError};
pub use image_cache::{HtmlImageLoader, ImageCache, ImageLoader};
pub use random::{
    OsRandom, RandomSource, RandomValue, SeededRandom, random_arbitrary, random_arbitrary_fixed,
    random_value,
};
pub use types::{CanvasContext, CanvasParams, RedPacket};
pub use viewport::{ViewportScale, px2vw_size, viewport_width};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    let level = SETTINGS.with(|s| s.borrow().level_filter());
    logging::init(level);
}

// -----------------------------------------------------------------------------
// Browser-side state. Rust callers should build their own ImageCache and
// RandomSource instead of going through these.
// -----------------------------------------------------------------------------

thread_local! {
    static SETTINGS: RefCell<Settings> = RefCell::new(Settings::default());
    static RNG: RefCell<OsRandom> = RefCell::new(OsRandom::new());
    static IMAGES: RefCell<Option<Rc<ImageCache<HtmlImageLoader>>>> = const { RefCell::new(None) };
}

fn browser_images() -> Result<Rc<ImageCache<HtmlImageLoader>>> {
    IMAGES.with(|cell| {
        let existing = cell.borrow().clone();
        if let Some(cache) = existing {
            return Ok(cache);
        }
        let asset_dir = SETTINGS.with(|s| s.borrow().asset_dir.clone());
        let cache = Rc::new(ImageCache::with_asset_dir(
            HtmlImageLoader::from_document()?,
            asset_dir,
        ));
        cell.replace(Some(cache.clone()));
        Ok(cache)
    })
}

// -----------------------------------------------------------------------------
// JS surface
// -----------------------------------------------------------------------------

/// Number in `[min, max]`, or a one-decimal string when `fixed` is set.
#[wasm_bindgen(js_name = getRandomArbitrary)]
pub fn get_random_arbitrary(min: f64, max: f64, fixed: Option<bool>) -> JsValue {
    let value = RNG.with(|rng| random_value(&mut *rng.borrow_mut(), min, max, fixed.unwrap_or(false)));
    match value {
        RandomValue::Whole(v) => JsValue::from_f64(v as f64),
        RandomValue::Fixed(s) => JsValue::from_str(&s),
    }
}

#[wasm_bindgen(js_name = getRandomColor)]
pub fn get_random_color() -> String {
    RNG.with(|rng| random_color(&mut *rng.borrow_mut()))
}

#[wasm_bindgen(js_name = getHashColor)]
pub fn get_hash_color(hash_color_list: Vec<String>) -> std::result::Result<String, JsValue> {
    let attempts = SETTINGS.with(|s| s.borrow().max_color_attempts);
    let color = RNG.with(|rng| hash_color(&mut *rng.borrow_mut(), &hash_color_list, attempts))?;
    Ok(color)
}

/// Design pixels scaled to the current `window.innerWidth`.
#[wasm_bindgen(js_name = getPx2VWSize)]
pub fn get_px2vw_size(pixel: f64) -> std::result::Result<f64, JsValue> {
    let scale = SETTINGS.with(|s| s.borrow().scale());
    Ok(scale.to_px(pixel, viewport_width()?))
}

/// Resolves to the `HTMLImageElement` for `file_name`, loading it on first use.
#[wasm_bindgen(js_name = loadImages)]
pub fn load_image(file_name: String) -> js_sys::Promise {
    wasm_bindgen_futures::future_to_promise(async move {
        let cache = browser_images()?;
        let image = cache.load(&file_name).await?;
        Ok(image.into())
    })
}

/// Replaces the browser settings from JSON. Loaded images are kept unless the
/// asset directory changes, in which case the next load starts a fresh cache.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn configure(settings_json: &str) -> std::result::Result<(), JsValue> {
    let settings = Settings::from_json(settings_json)?;
    log::set_max_level(settings.level_filter());
    let moved = SETTINGS.with(|s| !s.borrow().same_asset_dir(&settings));
    if moved {
        log::debug!("asset dir changed to {}, dropping image cache", settings.asset_dir);
        IMAGES.with(|cell| cell.replace(None));
    }
    SETTINGS.with(|s| s.replace(settings));
    Ok(())
}
