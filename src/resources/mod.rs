/**
 * This module contains all logic for loading shader sources and texture
 * images from external files. Assets are resolved relative to the working
 * directory under `./assets/`.
 */
use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::data_structures::texture::Texture;
use crate::error::TextureError;

fn asset_path(file_name: &str) -> PathBuf {
    // TODO: pass env for absolute path from lib caller
    Path::new("./").join("assets").join(file_name)
}

pub fn load_string(file_name: &str) -> std::io::Result<String> {
    std::fs::read_to_string(asset_path(file_name))
}

pub fn load_binary(file_name: &str) -> std::io::Result<Vec<u8>> {
    std::fs::read(asset_path(file_name))
}

/// Read and decode an image asset into an RGBA8 pixel buffer.
///
/// Fails with an error value when the file cannot be opened or decoded; no
/// GPU resource is touched, so the failure leaves nothing allocated.
pub fn load_rgba(file_name: &str) -> Result<RgbaImage, TextureError> {
    let data = load_binary(file_name).map_err(|source| TextureError::Io {
        path: file_name.to_string(),
        source,
    })?;
    let img = image::load_from_memory(&data).map_err(|source| TextureError::ImageLoad {
        path: file_name.to_string(),
        source,
    })?;
    Ok(img.to_rgba8())
}

/// Load an image asset into a GPU texture with fixed sampling state.
pub fn load_texture(
    file_name: &str,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> Result<Texture, TextureError> {
    let rgba = load_rgba(file_name)?;
    Ok(Texture::from_rgba(device, queue, &rgba, Some(file_name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_image_is_an_error_value() {
        let result = load_rgba("definitely-not-present.png");
        assert!(matches!(result, Err(TextureError::Io { .. })));
    }
}
