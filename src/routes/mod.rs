//! Route modules for the Summarizer server

pub mod export;
pub mod files;
pub mod health;
pub mod summarize;
