//! Capability catalog
//!
//! Maps the numeric keys a user picks (recording type, resolution) to
//! concrete capture parameters. Keys are 1-based, in listing order.

use serde::Serialize;

use crate::domain::error::InvalidSelection;

use super::{CaptureMode, Resolution};

/// Default resolution set, 360p through 4K
pub const DEFAULT_RESOLUTIONS: [(u32, u32); 5] = [
    (640, 360),
    (1280, 720),
    (1920, 1080),
    (2560, 1440),
    (3840, 2160),
];

/// Default resolution key (1280x720)
pub const DEFAULT_RESOLUTION_KEY: u32 = 2;

/// Default recording type key (screen with audio)
pub const DEFAULT_MODE_KEY: u32 = 2;

/// A validated pair of catalog lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub mode: CaptureMode,
    pub resolution: Resolution,
}

/// Catalog row used for listings
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry<T> {
    pub key: u32,
    pub label: String,
    pub value: T,
}

/// Lookup tables for recording types and resolutions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityCatalog {
    resolutions: Vec<Resolution>,
}

impl CapabilityCatalog {
    /// Build a catalog with a custom resolution set.
    /// An empty list falls back to the defaults.
    pub fn with_resolutions(resolutions: Vec<Resolution>) -> Self {
        if resolutions.is_empty() {
            return Self::default();
        }
        Self { resolutions }
    }

    /// Number of recording type keys
    pub fn mode_count(&self) -> u32 {
        CaptureMode::ALL.len() as u32
    }

    /// Number of resolution keys
    pub fn resolution_count(&self) -> u32 {
        self.resolutions.len() as u32
    }

    /// Look up a recording type by key
    pub fn lookup_mode(&self, key: u32) -> Result<CaptureMode, InvalidSelection> {
        key.checked_sub(1)
            .and_then(|idx| CaptureMode::ALL.get(idx as usize).copied())
            .ok_or(InvalidSelection::UnknownMode {
                key,
                max: self.mode_count(),
            })
    }

    /// Look up a resolution by key
    pub fn lookup_resolution(&self, key: u32) -> Result<Resolution, InvalidSelection> {
        key.checked_sub(1)
            .and_then(|idx| self.resolutions.get(idx as usize).copied())
            .ok_or(InvalidSelection::UnknownResolution {
                key,
                max: self.resolution_count(),
            })
    }

    /// Validate both keys at once
    pub fn select(&self, mode_key: u32, resolution_key: u32) -> Result<Selection, InvalidSelection> {
        Ok(Selection {
            mode: self.lookup_mode(mode_key)?,
            resolution: self.lookup_resolution(resolution_key)?,
        })
    }

    /// Recording types with their keys
    pub fn modes(&self) -> Vec<CatalogEntry<CaptureMode>> {
        CaptureMode::ALL
            .iter()
            .enumerate()
            .map(|(idx, mode)| CatalogEntry {
                key: idx as u32 + 1,
                label: mode.label().to_string(),
                value: *mode,
            })
            .collect()
    }

    /// Resolutions with their keys
    pub fn resolutions(&self) -> Vec<CatalogEntry<Resolution>> {
        self.resolutions
            .iter()
            .enumerate()
            .map(|(idx, res)| CatalogEntry {
                key: idx as u32 + 1,
                label: res.label(),
                value: *res,
            })
            .collect()
    }
}

impl Default for CapabilityCatalog {
    fn default() -> Self {
        let resolutions = DEFAULT_RESOLUTIONS
            .iter()
            .filter_map(|(w, h)| Resolution::new(*w, *h).ok())
            .collect();
        Self { resolutions }
    }
}
