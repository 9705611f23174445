//! Image decoding for image-mapped textures.
//!
//! Images are decoded with the `image` crate, converted from sRGB to linear and stored as
//! 8-bit RGB. A file that cannot be found or decoded becomes an empty image: renders
//! still complete, and the texture sampling it shows a debug color instead.

use std::env;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Environment variable naming a directory that is searched first for texture images.
pub const IMAGE_DIR_ENV: &str = "RTW_IMAGES";

/// How many parent directories are searched for an `images/` folder.
const PARENT_SEARCH_DEPTH: usize = 6;

/// Returned by [`ImageData::pixel`] when there is no image data.
pub const MISSING_PIXEL: [u8; 3] = [255, 0, 255];

/// Errors that can occur while loading an image.
#[derive(Error, Debug)]
pub enum ImageLoadError {
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("image '{0}' not found in any search location")]
    NotFound(String),

    #[error("{width}x{height} RGB image needs {expected} bytes, got {actual}")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

pub type ImageLoadResult<T> = Result<T, ImageLoadError>;

/// Decoded image: linear RGB bytes, row-major, top row first.
#[derive(Clone, Debug, Default)]
pub struct ImageData {
    width: u32,
    height: u32,
    bytes: Vec<u8>,
}

impl ImageData {
    /// An image with no pixels.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap already-decoded RGB bytes. `bytes` must hold `width * height * 3` values.
    pub fn from_rgb8(width: u32, height: u32, bytes: Vec<u8>) -> ImageLoadResult<Self> {
        let expected = width as usize * height as usize * 3;
        if bytes.len() != expected {
            return Err(ImageLoadError::BufferSize {
                width,
                height,
                expected,
                actual: bytes.len(),
            });
        }

        Ok(Self {
            width,
            height,
            bytes,
        })
    }

    /// Load from an exact path.
    pub fn load(path: &Path) -> ImageLoadResult<Self> {
        let img = image::open(path).map_err(|source| ImageLoadError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        let bytes = rgb
            .into_raw()
            .into_iter()
            .map(|b| float_to_byte(srgb_to_linear(b)))
            .collect();

        Self::from_rgb8(width, height, bytes)
    }

    /// Find `name` in the usual locations and load the first match.
    pub fn find(name: &str) -> ImageLoadResult<Self> {
        for candidate in search_paths(name) {
            if !candidate.is_file() {
                continue;
            }
            match Self::load(&candidate) {
                Ok(image) => {
                    log::debug!(
                        "Loaded image {} ({}x{})",
                        candidate.display(),
                        image.width,
                        image.height
                    );
                    return Ok(image);
                }
                Err(err) => log::warn!("{}", err),
            }
        }
        Err(ImageLoadError::NotFound(name.to_string()))
    }

    /// Like [`ImageData::find`], but a failure is logged and yields an empty image.
    pub fn open(name: &str) -> Self {
        Self::find(name).unwrap_or_else(|err| {
            log::error!("Could not load image file '{}': {}", name, err);
            Self::empty()
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// RGB bytes at `(x, y)`, with coordinates clamped into the image.
    pub fn pixel(&self, x: i32, y: i32) -> [u8; 3] {
        if self.is_empty() {
            return MISSING_PIXEL;
        }

        let x = x.clamp(0, self.width as i32 - 1) as usize;
        let y = y.clamp(0, self.height as i32 - 1) as usize;
        let idx = (y * self.width as usize + x) * 3;

        [self.bytes[idx], self.bytes[idx + 1], self.bytes[idx + 2]]
    }
}

/// Candidate locations for an image, in search order.
pub fn search_paths(name: &str) -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(PARENT_SEARCH_DEPTH + 3);

    if let Ok(dir) = env::var(IMAGE_DIR_ENV) {
        paths.push(Path::new(&dir).join(name));
    }
    paths.push(PathBuf::from(name));

    let mut prefix = PathBuf::new();
    for _ in 0..=PARENT_SEARCH_DEPTH {
        paths.push(prefix.join("images").join(name));
        prefix.push("..");
    }

    paths
}

/// Convert sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

fn float_to_byte(value: f32) -> u8 {
    if value <= 0.0 {
        0
    } else if value >= 1.0 {
        255
    } else {
        (256.0 * value) as u8
    }
}
