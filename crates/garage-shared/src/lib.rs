//! # Garage Shared
//!
//! Wire types shared by the API server and the chat client.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
