//! STR→AVI conversion.
//!
//! Ties the PlayStation decoder to the AVI writer and adds what a frontend
//! needs around them: conversion options, persistent settings, progress
//! events, and a quick stream probe.

pub mod error;
pub mod options;
pub mod pipeline;
pub mod probe;
pub mod settings;

pub use error::ConvertError;
pub use options::ConvertOptions;
pub use pipeline::{
    ConversionReport, convert_avi_to_str, convert_str_to_avi, convert_str_to_avi_with,
    convert_stream, default_output_path,
};
pub use probe::{StreamInfo, probe_file, probe_stream};
pub use settings::{Settings, load_settings, save_settings, settings_path};

// Re-exported so frontends need only this crate for the common types.
pub use stravi_avi::AviInfo;
pub use stravi_core::{ConvertProgress, Geometry};
pub use stravi_psx::mdec::{MAX_HEIGHT, MAX_WIDTH};
