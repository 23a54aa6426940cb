//! Application constants

/// Logical prefix for every uploaded media object key
pub const UPLOAD_KEY_PREFIX: &str = "properties/";

/// Maximum size of a single uploaded file part (50 MB)
pub const MAX_UPLOAD_PART_SIZE: usize = 50 * 1024 * 1024;

/// Maximum number of images attached to a property listing
pub const MAX_PROPERTY_IMAGES: usize = 10;

/// Request body ceiling for multipart routes: every file at its limit plus form fields
pub const MAX_MULTIPART_BODY_SIZE: usize = MAX_PROPERTY_IMAGES * MAX_UPLOAD_PART_SIZE + 1024 * 1024;

/// Admin access tokens expire 24 hours after issuance
pub const ACCESS_TOKEN_EXPIRY_HOURS: i64 = 24;

/// Upper bound (exclusive) of the random suffix in generated object keys
pub const OBJECT_KEY_SUFFIX_RANGE: u32 = 1_000_000_000;

/// Property type used when the listing form leaves it blank
pub const DEFAULT_PROPERTY_TYPE: &str = "Villa";

/// Property status used when the listing form leaves it blank
pub const DEFAULT_PROPERTY_STATUS: &str = "For Sale";
