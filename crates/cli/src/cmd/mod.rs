mod build;
mod clean;

pub use build::cmd_build;
pub use clean::cmd_clean;
