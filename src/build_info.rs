//! Commit and date stamped in by `build.rs`, shown by `squares --version`.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));
