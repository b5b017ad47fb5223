pub const FIELD_BODY: &str = "body";
pub const FIELD_BODY_MARKDOWN: &str = "bodyMarkdown";
pub const FIELD_ASSETS: &str = "assets";
pub const FIELD_ASSETS_NEW: &str = "assetsNew";
pub const FIELD_NAME: &str = "name";

pub const DEFAULT_ASSET_EXTENSION: &str = ".AppImage";
pub const DEFAULT_LEGACY_ARCHITECTURES: [&str; 2] = ["aarch64", "armv7l"];

pub const LOG_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S.%f";
pub const LOG_LEVEL: &str = "debug";

pub const BANNER_LOAD: &str = "=== Load json ===";
pub const BANNER_HTML: &str = "=== Make html version of body ===";
pub const BANNER_SPLIT: &str = "=== Split release assets ===";
pub const BANNER_WRITE: &str = "=== Write json ===";
