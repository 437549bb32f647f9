//! Application services - orchestrate ports on behalf of the HTTP layer.

mod comment;
mod session;
mod user;

pub use comment::CommentService;
pub use session::{SessionService, SessionTokens};
pub use user::{RegisterUser, UserService};

#[cfg(test)]
pub(crate) mod fakes;
