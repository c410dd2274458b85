//! HTTP handlers and the text-generation provider client.

pub mod gemini;
pub mod handler;
