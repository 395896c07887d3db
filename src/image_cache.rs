//! Image loading and caching for packet sprites.
//!
//! Images are keyed by filename and resolved under an asset directory
//! (`../assets/` by default, relative to the module base URL). Entries are
//! never evicted. Two first-time loads of the same file that overlap both hit
//! the loader; the later one to finish owns the cache slot.

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlImageElement, Url};

use crate::error::{Result, UtilError, describe_js};

pub const DEFAULT_ASSET_DIR: &str = "../assets/";

/// Fetches and decodes one image from a path relative to some base.
pub trait ImageLoader {
    type Image: Clone;

    fn load(&self, path: &str) -> impl Future<Output = std::result::Result<Self::Image, String>>;
}

pub struct ImageCache<L: ImageLoader> {
    loader: L,
    asset_dir: String,
    entries: RefCell<HashMap<String, L::Image>>,
}

impl<L: ImageLoader> ImageCache<L> {
    pub fn new(loader: L) -> Self {
        Self::with_asset_dir(loader, DEFAULT_ASSET_DIR)
    }

    pub fn with_asset_dir(loader: L, asset_dir: impl Into<String>) -> Self {
        let mut asset_dir = asset_dir.into();
        if !asset_dir.is_empty() && !asset_dir.ends_with('/') {
            asset_dir.push('/');
        }
        Self { loader, asset_dir, entries: RefCell::new(HashMap::new()) }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn asset_path(&self, filename: &str) -> String {
        format!("{}{}", self.asset_dir, filename)
    }

    pub fn get(&self, filename: &str) -> Option<L::Image> {
        self.entries.borrow().get(filename).cloned()
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.entries.borrow().contains_key(filename)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Returns the cached image for `filename`, loading it first on a miss.
    /// Failed loads are reported and leave the cache untouched.
    pub async fn load(&self, filename: &str) -> Result<L::Image> {
        if let Some(image) = self.get(filename) {
            log::trace!("image cache hit: {filename}");
            return Ok(image);
        }
        let path = self.asset_path(filename);
        log::debug!("image cache miss: {filename}, loading {path}");
        let image = self.loader.load(&path).await.map_err(|cause| {
            log::warn!("image load failed for {filename}: {cause}");
            UtilError::ImageLoad { filename: filename.to_string(), cause }
        })?;
        self.entries
            .borrow_mut()
            .insert(filename.to_string(), image.clone());
        Ok(image)
    }
}

/// Loads images through `<img>` elements, resolving paths against `base`.
#[derive(Clone, Debug)]
pub struct HtmlImageLoader {
    base: String,
}

impl HtmlImageLoader {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    /// Uses the document base URI as the module base.
    pub fn from_document() -> Result<Self> {
        let doc = web_sys::window()
            .and_then(|w| w.document())
            .ok_or(UtilError::NoWindow)?;
        let base = doc
            .base_uri()
            .map_err(|e| UtilError::Config(describe_js(&e)))?
            .ok_or_else(|| UtilError::Config("document has no base URI".to_string()))?;
        Ok(Self::new(base))
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn resolve(&self, path: &str) -> std::result::Result<String, String> {
        Url::new_with_base(path, &self.base)
            .map(|url| url.href())
            .map_err(|e| describe_js(&e))
    }
}

impl ImageLoader for HtmlImageLoader {
    type Image = HtmlImageElement;

    fn load(&self, path: &str) -> impl Future<Output = std::result::Result<HtmlImageElement, String>> {
        let href = self.resolve(path);
        async move {
            let href = href?;
            let image = HtmlImageElement::new().map_err(|e| describe_js(&e))?;
            let settled = js_sys::Promise::new(&mut |resolve, reject| {
                image.set_onload(Some(&resolve));
                image.set_onerror(Some(&reject));
            });
            image.set_src(&href);
            let outcome = JsFuture::from(settled).await;
            image.set_onload(None);
            image.set_onerror(None);
            match outcome {
                Ok(_) => Ok(image),
                Err(e) if e.is_instance_of::<web_sys::Event>() => Err(format!("{href} did not load")),
                Err(e) => Err(describe_js(&e)),
            }
        }
    }
}
