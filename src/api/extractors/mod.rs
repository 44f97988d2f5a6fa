//! Custom axum extractors.

mod current_user;
mod validated_json;

pub use current_user::{AdminUser, CurrentUser};
pub use validated_json::ValidatedJson;
