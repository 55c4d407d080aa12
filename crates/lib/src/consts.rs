pub const APP_NAME: &str = "extmake";

/// Project-level options file naming the ordered task list.
pub const OPTIONS_FILE: &str = "make-options.json";
/// Per-task identity manifest.
pub const TASK_DEF_FILE: &str = "task.json";
/// Per-task and per-module build manifest.
pub const BUILD_MANIFEST_FILE: &str = "make.json";

pub const BUILD_DIR_NAME: &str = "_build";
pub const DOWNLOAD_DIR_NAME: &str = "_download";
pub const COMMON_DIR_NAME: &str = "Common";
pub const TESTS_DIR_NAME: &str = "Tests";
/// Where copied modules land inside a task output unless `dest` says otherwise.
pub const PS_MODULES_DIR: &str = "ps_modules";

pub const BUILD_DIR_ENV: &str = "EXTMAKE_BUILD_DIR";
pub const DOWNLOAD_DIR_ENV: &str = "EXTMAKE_DOWNLOAD_DIR";

/// Written next to a cached download once it is fully on disk.
pub const DOWNLOAD_COMPLETE_MARKER: &str = ".completed";
/// Hex characters of the URL hash used to name download cache entries.
pub const URL_KEY_LEN: usize = 16;

pub const DEFAULT_TASK_RESOURCES: &[&str] = &[
  "*.js", "*.json", "*.md", "*.ps1", "*.psm1", "*.png", "*.svg", "Strings", "lib.json",
];

pub const DEFAULT_EXTENSION_RESOURCES: &[&str] = &["vss-extension.json", "*.md", "images", "LICENSE*"];
