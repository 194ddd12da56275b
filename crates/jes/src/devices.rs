//! Named viewport breakpoints used by `@device` directives.
//!
//! ```text
//! mobile         ..575px
//! tablet   576px ..1023px
//! laptop  1024px ..1439px
//! desktop 1440px ..
//! ```

use phf::phf_map;

use crate::error::DirectiveError;

/// Width bounds of a named device. `None` means the range is open on that end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeviceRange {
    pub lower: Option<&'static str>,
    pub upper: Option<&'static str>,
}

impl DeviceRange {
    /// The `(min-width:…)` clause for the lower bound, if there is one.
    pub fn min_width(&self) -> Option<String> {
        self.lower.map(|width| format!("(min-width:{width})"))
    }

    /// The `(max-width:…)` clause for the upper bound, if there is one.
    pub fn max_width(&self) -> Option<String> {
        self.upper.map(|width| format!("(max-width:{width})"))
    }
}

/// Map of device names to their width bounds.
pub static DEVICE_RANGES: phf::Map<&'static str, DeviceRange> = phf_map! {
    "mobile" => DeviceRange { lower: None, upper: Some("575px") },
    "tablet" => DeviceRange { lower: Some("576px"), upper: Some("1023px") },
    "laptop" => DeviceRange { lower: Some("1024px"), upper: Some("1439px") },
    "desktop" => DeviceRange { lower: Some("1440px"), upper: None },
};

/// Looks up a device by name.
pub fn device_range(name: &str) -> Result<DeviceRange, DirectiveError> {
    DEVICE_RANGES
        .get(name)
        .copied()
        .ok_or_else(|| DirectiveError::UnknownDevice(name.to_string()))
}
