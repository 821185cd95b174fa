//! Test doubles and fixtures shared by unit tests.

mod fixture;
mod recording;

pub use fixture::TestProject;
pub use recording::{RecordingChangeStore, RecordingConsole, RecordingRunner};
