use std::path::Path;

use anyhow::{bail, Context};
use image::ColorType;
use noise_composer::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Installs a formatting subscriber honoring `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

/// Writes `tensor` as an 8-bit PNG. Samples are clamped to `[0, 1]`.
pub fn save_png(tensor: &Tensor, path: impl AsRef<Path>) -> anyhow::Result<()> {
    let path = path.as_ref();
    let Shape {
        height,
        width,
        channels,
    } = tensor.shape;
    let color = match channels {
        1 => ColorType::L8,
        3 => ColorType::Rgb8,
        4 => ColorType::Rgba8,
        n => bail!("cannot encode a {n}-channel tensor as PNG"),
    };

    let bytes: Vec<u8> = tensor
        .data
        .iter()
        .map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
        .collect();
    image::save_buffer(
        path,
        &bytes,
        u32::try_from(width)?,
        u32::try_from(height)?,
        color,
    )
    .with_context(|| format!("failed to write {}", path.display()))?;

    info!("Wrote {}x{} image to {}.", width, height, path.display());
    Ok(())
}
