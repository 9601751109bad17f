// Internal types shared across services, stores, and the API layer
pub mod audit;
pub mod auth;
pub mod context;
pub mod identity;
pub mod token;

pub use context::{RequestContext, RequestId, RequestSource};
pub use identity::{AgencyType, KycStatus, Role, UserStatus};
pub use token::TokenPurpose;
