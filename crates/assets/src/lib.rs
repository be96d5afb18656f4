//! Asset loading: skybox cubemap faces decoded from disk.
//!
//! # Invariants
//! - A missing or corrupt face never aborts loading; it is replaced by a
//!   solid fallback and the rest still load.
//! - Every face handed to the renderer has the same square size.

use bolts_render::{CubemapImages, FaceImage};
use image::imageops::FilterType;
use std::path::{Path, PathBuf};

/// Color of a face that failed to load.
pub const FALLBACK_RGBA: [u8; 4] = [255, 0, 255, 255];

/// Edge length used when no face loads at all.
const FALLBACK_SIZE: u32 = 2;

/// File names of the six faces, in `+X, -X, +Y, -Y, +Z, -Z` order.
pub const FACE_NAMES: [&str; 6] = [
    "right.jpg",
    "left.jpg",
    "top.jpg",
    "bottom.jpg",
    "front.jpg",
    "back.jpg",
];

/// Errors from loading a single face.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot decode {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// Paths of the six cubemap faces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CubemapFaces {
    pub paths: [PathBuf; 6],
}

impl CubemapFaces {
    /// The standard face names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            paths: FACE_NAMES.map(|name| dir.join(name)),
        }
    }
}

impl Default for CubemapFaces {
    fn default() -> Self {
        Self::in_dir("skybox")
    }
}

/// Source of decoded skybox images.
pub trait AssetLoader {
    /// Load all six faces. Never fails; see [`CubemapImages::loaded`] for
    /// how many came from disk.
    fn load_cubemap(&self, faces: &CubemapFaces) -> CubemapImages;
}

/// Loads faces from the filesystem with the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileAssetLoader;

impl FileAssetLoader {
    pub fn new() -> Self {
        Self
    }

    /// Decode one image file to RGBA8.
    pub fn load_face(&self, path: &Path) -> Result<FaceImage, AssetError> {
        let io_err = |source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        };
        // sniff the content first; face files are not always what their
        // extension claims
        let reader = image::ImageReader::open(path)
            .map_err(io_err)?
            .with_guessed_format()
            .map_err(io_err)?;
        let img = reader.decode().map_err(|e| match e {
            image::ImageError::IoError(source) => io_err(source),
            source => AssetError::Decode {
                path: path.to_path_buf(),
                source,
            },
        })?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        tracing::debug!(path = %path.display(), width, height, "decoded skybox face");
        Ok(FaceImage {
            width,
            height,
            rgba: rgba.into_raw(),
        })
    }
}

impl AssetLoader for FileAssetLoader {
    fn load_cubemap(&self, faces: &CubemapFaces) -> CubemapImages {
        let decoded: Vec<Option<FaceImage>> = faces
            .paths
            .iter()
            .enumerate()
            .map(|(i, path)| match self.load_face(path) {
                Ok(face) => Some(face),
                Err(e) => {
                    tracing::warn!(face = i, error = %e, "skybox face failed, using fallback");
                    None
                }
            })
            .collect();

        let loaded = decoded.iter().filter(|f| f.is_some()).count();
        let size = decoded
            .iter()
            .flatten()
            .map(|f| f.width.max(f.height))
            .max()
            .unwrap_or(FALLBACK_SIZE);

        let mut faces = decoded
            .into_iter()
            .map(|face| match face {
                Some(face) => fit_square(face, size),
                None => FaceImage::solid(size, FALLBACK_RGBA),
            });
        let faces: [FaceImage; 6] = std::array::from_fn(|_| {
            faces
                .next()
                .unwrap_or_else(|| FaceImage::solid(size, FALLBACK_RGBA))
        });

        tracing::info!(loaded, size, "{loaded}/6 skybox faces loaded");
        CubemapImages { faces, loaded }
    }
}

/// Resize `face` to `size` x `size` unless it already is.
fn fit_square(face: FaceImage, size: u32) -> FaceImage {
    if face.width == size && face.height == size {
        return face;
    }
    let Some(buffer) = image::RgbaImage::from_raw(face.width, face.height, face.rgba) else {
        return FaceImage::solid(size, FALLBACK_RGBA);
    };
    let resized = image::imageops::resize(&buffer, size, size, FilterType::Triangle);
    FaceImage {
        width: size,
        height: size,
        rgba: resized.into_raw(),
    }
}
