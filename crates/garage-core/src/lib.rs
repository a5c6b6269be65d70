//! # Garage Core
//!
//! The domain layer of the Garage forum.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! forum rules, the chatbot fallback and the daily usage governor.

pub mod chat;
pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::DomainError;
