//! Application services - orchestrate ports to carry out use cases.

mod account;
mod chat;
mod forum;

pub use account::{AccountService, Registration, Session, is_valid_email};
pub use chat::{ChatService, ChatTurn, MAX_MESSAGE_CHARS, validate_message};
pub use forum::{Actor, ForumRepositories, ForumService, ListPosts, NewPost};
