//! Request body and path extractors with structured rejections.

pub mod enhanced_json;
pub mod enhanced_path;
pub mod sanitized_json;
pub mod validated_json;

pub use self::enhanced_json::Json;
pub use self::enhanced_path::Path;
pub use self::sanitized_json::SanitizedJson;
pub use self::validated_json::ValidateJson;
