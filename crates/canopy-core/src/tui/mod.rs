//! CLI prompts using cliclack (Charm-style inline prompts)
//!
//! Compiled only with the `tui` feature; `lib.rs` gates the module.

mod prompts;

pub use prompts::{run_add, run_init, AddArgs, InitArgs};
