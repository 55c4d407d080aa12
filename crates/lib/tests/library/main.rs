//! End-to-end build scenarios through the public library API.

mod build_tests;
mod common;
