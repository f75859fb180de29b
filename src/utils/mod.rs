//! Adapters around the solver core.
//!
//! - **`codec`**: Parses the delimited-text matrix encoding (`"1,2;3,4"`) used on the command
//!   line and formats a [`crate::Spectrum`] back into comma-joined lines.
//!
//! - **`perf`**: Reads process memory statistics on Linux for the stability sweep binary.

pub mod codec;
pub mod perf;
