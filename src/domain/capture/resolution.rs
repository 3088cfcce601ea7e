//! Resolution value object

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::domain::error::InvalidSelection;

/// Capture resolution in pixels.
/// Both dimensions are validated to be non-zero on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Resolution {
    width: u32,
    height: u32,
}

impl Resolution {
    /// Create a resolution, rejecting zero dimensions
    pub fn new(width: u32, height: u32) -> Result<Self, InvalidSelection> {
        if width == 0 || height == 0 {
            return Err(InvalidSelection::MalformedResolution {
                input: format!("{}x{}", width, height),
            });
        }
        Ok(Self { width, height })
    }

    pub const fn width(&self) -> u32 {
        self.width
    }

    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Short label like "720p"; 2160 lines reads as "4K"
    pub fn label(&self) -> String {
        match self.height {
            2160 => "4K".to_string(),
            h => format!("{}p", h),
        }
    }

    /// Size in the `WxH` form FFmpeg expects for `-video_size`
    pub fn as_video_size(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

impl FromStr for Resolution {
    type Err = InvalidSelection;

    /// Parse "1280x720" (case-insensitive separator)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || InvalidSelection::MalformedResolution {
            input: s.to_string(),
        };

        let lower = s.trim().to_lowercase();
        let (w, h) = lower.split_once('x').ok_or_else(malformed)?;
        let width: u32 = w.trim().parse().map_err(|_| malformed())?;
        let height: u32 = h.trim().parse().map_err(|_| malformed())?;

        Self::new(width, height).map_err(|_| malformed())
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}×{}", self.width, self.height)
    }
}
