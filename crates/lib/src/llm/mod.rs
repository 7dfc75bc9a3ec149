//! Generation backend client (Gemini).
//!
//! Single-shot text generation from a raw prompt; no history, no streaming.

mod gemini;

pub use gemini::{GeminiClient, GeminiError};
