// Error handling - layered into internal (service/store) and API-facing types

pub mod api;
pub mod internal;

pub use api::{AuthError, AuthErrorResponse, ValidationDetail};
pub use internal::InternalError;
