// Allow dead code for items that are part of the public API but only used in tests
#![allow(dead_code)]

pub mod config;
pub mod pipeline;
pub mod progress;
pub mod rewriter;
pub mod segmenter;
