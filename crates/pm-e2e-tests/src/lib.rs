//! End-to-end integration tests for Playback Monitor.
//!
//! All tests live in `tests/`; this library is intentionally empty.
