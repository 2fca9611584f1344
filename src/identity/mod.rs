// Public API - what other modules can use
pub use handlers::whoami;
pub use models::{Identity, GUEST_FALLBACK_NAME};
pub use resolver::IdentityResolver;
pub use session::SessionContext;

// Internal modules
pub mod directory;
pub mod handlers;
pub mod models;
pub mod resolver;
pub mod session;
