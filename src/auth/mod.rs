pub mod handlers;
pub mod session;

pub use session::{Provider, User, UserSessions};
