//! Coarse orientation used as the storage key prefix.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use crate::metadata::StreamGeometry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
    Other,
}

impl Orientation {
    /// Classify by the truncated quotient `width / height`: 1 is landscape
    /// (1:1 up to, not including, 2:1), 0 is portrait, anything else is other.
    /// Existing keys depend on these exact boundaries. A zero height has no
    /// quotient and is other.
    pub fn classify(geometry: StreamGeometry) -> Self {
        match geometry.width.checked_div(geometry.height) {
            Some(1) => Orientation::Landscape,
            Some(0) => Orientation::Portrait,
            _ => Orientation::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
            Orientation::Other => "other",
        }
    }
}

impl From<StreamGeometry> for Orientation {
    fn from(geometry: StreamGeometry) -> Self {
        Orientation::classify(geometry)
    }
}

impl Display for Orientation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}
