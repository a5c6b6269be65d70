//! SeaORM entities mirroring the migration schema.

pub mod category;
pub mod chat_log;
pub mod post;
pub mod reply;
pub mod user;
