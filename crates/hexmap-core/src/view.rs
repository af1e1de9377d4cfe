//! Pan and zoom state of the board view.
//!
//! The engine only stores this transform (it is part of the saved game) and
//! recentres it on reset. Front ends use it to turn pointer positions into
//! physical coordinates before hit-testing.

use crate::hex::PhysicalCoordinate;
use serde::{Deserialize, Serialize};

/// Screen pixels per unit of physical space at zoom level 0
pub const BASE_ZOOM: f64 = 100.0;

/// Scale factor between two consecutive zoom levels
pub const ZOOM_STEP: f64 = 1.2;

pub const MIN_ZOOM_LEVEL: i32 = -12;
pub const MAX_ZOOM_LEVEL: i32 = 12;

/// Maps physical coordinates to screen pixels: `screen = physical * zoom + offset`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ViewTransform {
    /// Screen position of the physical origin
    pub offset: PhysicalCoordinate,
    /// Discrete zoom step, 0 = [`BASE_ZOOM`]
    pub zoom_level: i32,
}

impl ViewTransform {
    pub fn new(offset: PhysicalCoordinate, zoom_level: i32) -> Self {
        Self {
            offset,
            zoom_level: zoom_level.clamp(MIN_ZOOM_LEVEL, MAX_ZOOM_LEVEL),
        }
    }

    /// Origin in the middle of a viewport of `size`, default zoom
    pub fn centered(size: PhysicalCoordinate) -> Self {
        Self::new(size / 2.0, 0)
    }

    /// Convert a save file's raw scalar zoom to the nearest zoom level
    pub fn from_legacy_zoom(offset: PhysicalCoordinate, zoom: f64) -> Self {
        if !zoom.is_finite() || zoom <= 0.0 {
            return Self::new(offset, 0);
        }
        let level = ((zoom / BASE_ZOOM).ln() / ZOOM_STEP.ln()).round();
        let level = level.clamp(f64::from(MIN_ZOOM_LEVEL), f64::from(MAX_ZOOM_LEVEL)) as i32;
        Self::new(offset, level)
    }

    /// Pixels per physical unit
    pub fn zoom(&self) -> f64 {
        BASE_ZOOM * ZOOM_STEP.powi(self.zoom_level)
    }

    pub fn to_screen(&self, physical: PhysicalCoordinate) -> PhysicalCoordinate {
        physical * self.zoom() + self.offset
    }

    pub fn to_physical(&self, screen: PhysicalCoordinate) -> PhysicalCoordinate {
        (screen - self.offset) / self.zoom()
    }

    /// Drag the view so that the content under `from` ends up under `to`
    pub fn pan(&self, from: PhysicalCoordinate, to: PhysicalCoordinate) -> Self {
        Self::new(self.offset + (to - from), self.zoom_level)
    }

    /// Zoom by `steps` levels keeping the content under `screen` in place
    pub fn zoom_at(&self, screen: PhysicalCoordinate, steps: i32) -> Self {
        let anchor = self.to_physical(screen);
        let zoomed = Self::new(self.offset, self.zoom_level.saturating_add(steps));
        Self::new(screen - anchor * zoomed.zoom(), zoomed.zoom_level)
    }
}
