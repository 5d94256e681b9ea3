use std::{
    fs::OpenOptions,
    io::{ErrorKind, Write as _},
    path::{Path, PathBuf},
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::Context as _;

use crate::foundation::error::{StripError, StripResult};

/// Output of one compositor run: the whole strip as a PNG.
///
/// Previews are immutable and replaced as a unit; cloning shares the encoded bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct StripPreview {
    pub width: u32,
    pub height: u32,
    /// Compositor run that produced this image, counting from 1.
    pub run: u64,
    png: Arc<[u8]>,
}

impl std::fmt::Debug for StripPreview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripPreview")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("run", &self.run)
            .field("png_bytes", &self.png.len())
            .finish()
    }
}

impl StripPreview {
    pub fn new(width: u32, height: u32, run: u64, png: impl Into<Arc<[u8]>>) -> Self {
        Self {
            width,
            height,
            run,
            png: png.into(),
        }
    }

    pub fn png(&self) -> &[u8] {
        &self.png
    }

    /// Decode back to straight-alpha pixels.
    pub fn to_rgba(&self) -> StripResult<image::RgbaImage> {
        let img = image::load_from_memory_with_format(&self.png, image::ImageFormat::Png)
            .map_err(|e| StripError::decode(format!("decode preview png: {e}")))?;
        Ok(img.to_rgba8())
    }

    /// Write the PNG into `dir` under a name no earlier download used.
    ///
    /// Returns the path written.
    pub fn save_download(&self, dir: &Path) -> StripResult<PathBuf> {
        self.save_download_at(dir, SystemTime::now())
    }

    pub fn save_download_at(&self, dir: &Path, now: SystemTime) -> StripResult<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create download directory '{}'", dir.display()))?;

        let stem = download_stem(now);
        for attempt in 0u32.. {
            let name = if attempt == 0 {
                format!("{stem}.png")
            } else {
                format!("{stem}-{attempt}.png")
            };
            let path = dir.join(name);
            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(f) => f,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(anyhow::Error::new(e)
                        .context(format!("create download file '{}'", path.display()))
                        .into());
                }
            };
            file.write_all(&self.png)
                .with_context(|| format!("write download file '{}'", path.display()))?;
            tracing::info!(path = %path.display(), bytes = self.png.len(), "strip saved");
            return Ok(path);
        }
        Err(StripError::render("no free download file name"))
    }
}

/// `photostrip-<unix-millis>`; times before the epoch count as 0.
pub fn download_stem(now: SystemTime) -> String {
    let millis = now
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    format!("photostrip-{millis}")
}
