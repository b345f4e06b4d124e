//! Batch image-generation harness around the OpenAI image APIs.
//!
//! One logical prompt is fanned out into `count` independent generation
//! jobs that run under a bounded worker pool with per-call retry; results
//! are reconciled into an ordered, named set of image files regardless of
//! completion order.

pub mod cli;
pub mod config;
pub mod error;
pub mod paths;
pub mod scenarios;
pub mod services;
