//! Lumen Core - collaborators around the path tracing core.
//!
//! This crate provides:
//!
//! - **Image decoding**: `ImageData`, the pixel source behind image-mapped textures
//! - **Render settings**: `RenderSettings`, optional JSON overrides for a render
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::{ImageData, RenderSettings};
//!
//! let earth = ImageData::open("earthmap.jpg");
//! println!("{}x{}", earth.width(), earth.height());
//!
//! let settings = RenderSettings::load("render.json")?;
//! ```

pub mod image_data;
pub mod settings;

// Re-export commonly used types
pub use image_data::{ImageData, ImageLoadError, ImageLoadResult};
pub use settings::{RenderSettings, SettingsError, SettingsResult};
