pub mod auth_token;
pub mod current_session;
pub mod validated_json;

pub use auth_token::AuthToken;
pub use current_session::CurrentSession;
pub use validated_json::ValidatedJson;
