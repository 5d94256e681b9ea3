use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;

use crate::foundation::error::{StripError, StripResult};

/// Runtime options for a booth session.
///
/// Every field has a default, so a JSON file only needs the keys it overrides.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoothOpts {
    /// Quiet period after the last input change before the strip is regenerated.
    pub quiet_period_ms: u64,
    /// Countdown length before a frame is grabbed.
    pub countdown_secs: u32,
    /// Corner radius of the rounded frame clip.
    pub corner_radius: f64,
    /// Maximum number of stamps on a strip.
    pub max_stamps: usize,
    /// Root directory that template image references are resolved against.
    pub assets_root: PathBuf,
    /// Extra directory scanned for `.ttf`/`.otf`/`.ttc` fonts.
    pub fonts_dir: Option<PathBuf>,
    /// Where downloaded strips are written.
    pub output_dir: PathBuf,
}

impl Default for BoothOpts {
    fn default() -> Self {
        Self {
            quiet_period_ms: 250,
            countdown_secs: 3,
            corner_radius: crate::foundation::core::FRAME_CORNER_RADIUS,
            max_stamps: 10,
            assets_root: PathBuf::from("."),
            fonts_dir: None,
            output_dir: PathBuf::from("."),
        }
    }
}

impl BoothOpts {
    pub fn from_json_file(path: &Path) -> StripResult<Self> {
        let f = File::open(path)
            .with_context(|| format!("open booth config '{}'", path.display()))?;
        let opts: Self = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| StripError::serde(format!("parse booth config: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    pub fn validate(&self) -> StripResult<()> {
        if self.quiet_period_ms == 0 {
            return Err(StripError::validation("quiet_period_ms must be > 0"));
        }
        if !self.corner_radius.is_finite() || self.corner_radius < 0.0 {
            return Err(StripError::validation(
                "corner_radius must be a finite value >= 0",
            ));
        }
        if self.max_stamps == 0 {
            return Err(StripError::validation("max_stamps must be > 0"));
        }
        Ok(())
    }

    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.quiet_period_ms)
    }
}
