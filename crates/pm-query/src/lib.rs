//! Query intent engine: answers free-text operator questions.
//!
//! Questions are matched against an ordered list of intent rules (first
//! match wins), a target device is resolved when the intent needs one, and
//! a plain-text answer is rendered from the repository and the health
//! evaluator. Unrecognized questions get the help text; nothing here fails.

pub mod engine;
pub mod intents;
pub mod render;
pub mod resolve;

pub use engine::{QueryContext, answer};
pub use intents::{Intent, classify_intent};
pub use resolve::{Resolution, resolve_device};
