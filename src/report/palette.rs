//! Chart colors.

/// Individual provider line and markers
pub const DARK_PURPLE: &str = "#9467bd";
/// Provider comet tails
pub const LIGHT_PURPLE: &str = "#c5b0d5";
/// Clinic line on clinic pages and clinic markers
pub const DARK_ORANGE: &str = "#ff7f0e";
/// Clinic line on provider pages and clinic comet tails
pub const LIGHT_ORANGE: &str = "#ffbb78";
/// Organization line on the organization page
pub const DARK_BLUE: &str = "#1f77b4";
/// Organization line on provider and clinic pages
pub const LIGHT_BLUE: &str = "#aec7e8";
/// Target rule and label
pub const DARK_GREEN: &str = "#2ca02c";
