//! extmake-lib: build orchestration for multi-task extension packages
//!
//! This crate assembles per-task output directories ready for packaging:
//! - `manifest`: typed readers for `make-options.json`, `task.json` and `make.json`
//! - `resources`: pattern-driven resource copying, planned first and then executed
//! - `fetch`: idempotent acquisition of external archives and files
//! - `common`: build-once shared modules fanned out into every referencing task
//! - `driver`: the `clean` / `build` state machine over the declared task list

pub mod common;
pub mod consts;
pub mod driver;
pub mod error;
pub mod events;
pub mod fetch;
pub mod manifest;
pub mod paths;
pub mod resources;
pub mod toolchain;
pub mod util;

pub use driver::{BuildReport, Command, Driver, TaskReport};
pub use error::{BuildError, ErrorKind};
pub use events::{BuildEvent, BuildObserver, Step};
pub use paths::Layout;
