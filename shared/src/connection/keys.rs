//! Field names of persisted connection payloads.

pub const PATTERN: &str = "pattern";
pub const STRING: &str = "string";
pub const TEXT: &str = "text";
pub const TINSEL_COLOR: &str = "color";

pub const ELEMENT_ID: &str = "id";
pub const ELEMENT_TAG: &str = "tag";

pub const TEXT_VALUE: &str = "value";
pub const TEXT_STYLING: &str = "styling";

// Color fields. `CustomColor` appears both at the top level (raw numeric
// color) and inside an element's `tag`.
pub const CUSTOM_COLOR: &str = "CustomColor";
pub const CAPTURED_COLOR: &str = "CapturedColor";
pub const CAPTURED_RGB: &str = "CapturedRGB";
pub const ORIGINAL_COLOR: &str = "OriginalColor";
