// Services layer - Business logic and orchestration
pub mod crypto;
pub mod identity_service;
pub mod mailer;
pub mod token_service;
pub mod validation;

pub use identity_service::IdentityService;
pub use mailer::MailerService;
pub use token_service::TokenService;
