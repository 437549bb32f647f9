//! Domain entities - the core business objects.

mod comment;
mod session;
mod user;

pub use comment::{Comment, CommentFilter, CommentPatch, NewComment};
pub use session::Session;
pub use user::User;
