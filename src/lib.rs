pub mod app;
pub mod commands;
pub mod config;
pub mod diagnostics;
pub mod particle;
pub mod profiler;
pub mod renderer;
pub mod simulation;
pub mod spawn;
pub mod text_mask;

#[cfg(feature = "profiling")]
use once_cell::sync::Lazy;
#[cfg(feature = "profiling")]
use parking_lot::Mutex;

#[cfg(feature = "profiling")]
pub static PROFILER: Lazy<Mutex<profiler::Profiler>> =
    Lazy::new(|| Mutex::new(profiler::Profiler::new()));
