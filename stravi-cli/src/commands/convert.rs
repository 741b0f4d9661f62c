use std::cell::Cell;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use stravi_core::util::format_bytes_approx;
use stravi_lib::{
    ConvertOptions, ConvertProgress, Geometry, convert_avi_to_str, convert_str_to_avi_with,
    default_output_path, load_settings,
};

use crate::CliError;
use crate::cli_types::SizeArgs;

/// Convert one STR file to AVI.
pub(crate) fn run_str2avi(
    input: &Path,
    output: Option<PathBuf>,
    fps: Option<u32>,
    size: SizeArgs,
    quiet: bool,
) -> Result<(), CliError> {
    let output = output.unwrap_or_else(|| default_output_path(input));

    let mut options = ConvertOptions::from_settings(&load_settings());
    if let Some(fps) = fps {
        options = options.fps(fps);
    }
    if let (Some(width), Some(height)) = (size.width, size.height) {
        options = options.geometry_override(Some(Geometry::new(width, height)));
    }

    log::info!(
        "{} {} -> {}",
        "Converting".if_supports_color(Stdout, |t| t.bold()),
        input.display().if_supports_color(Stdout, |t| t.cyan()),
        output.display().if_supports_color(Stdout, |t| t.cyan()),
    );

    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::with_template(
                "  {spinner:.cyan} [{bar:30.cyan/blue}] {bytes}/{total_bytes} {msg}",
            )
            .expect("static pattern")
            .progress_chars("=> "),
        );
        pb
    };

    let written = Cell::new(0u64);
    let dropped = Cell::new(0u64);
    let progress_callback = |progress: &ConvertProgress| match progress {
        ConvertProgress::Started { total_bytes } => {
            pb.set_length(total_bytes.unwrap_or(0));
        }
        ConvertProgress::Reading { bytes_read, .. } => {
            pb.set_position(*bytes_read);
        }
        ConvertProgress::FrameWritten { .. } => {
            written.set(written.get() + 1);
            pb.set_message(format!("{} frames", written.get()));
        }
        ConvertProgress::FrameDropped { .. } => {
            dropped.set(dropped.get() + 1);
            pb.set_message(format!(
                "{} frames, {} dropped",
                written.get(),
                dropped.get()
            ));
        }
        ConvertProgress::Completed { .. } => {
            pb.finish_and_clear();
        }
    };

    let result = convert_str_to_avi_with(input, &output, &options, &progress_callback);
    pb.finish_and_clear();
    let report = result?;

    log::info!(
        "  {} {} frames at {} fps, {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        report.frames_written,
        report.fps,
        report.geometry.if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!(
        "  {}",
        format!(
            "{} sectors read, {} video, {} skipped",
            report.sectors_read, report.video_sectors, report.skipped_sectors
        )
        .if_supports_color(Stdout, |t| t.dimmed()),
    );
    if report.frames_dropped > 0 {
        log::warn!(
            "  {} {} frames dropped",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            report.frames_dropped,
        );
    }
    if report.trailing_bytes > 0 {
        log::info!(
            "  {}",
            format!("Ignored {} trailing bytes", report.trailing_bytes)
                .if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    log::info!(
        "  Wrote {} ({})",
        output.display().if_supports_color(Stdout, |t| t.cyan()),
        format_bytes_approx(report.output_bytes),
    );
    Ok(())
}

/// AVI→STR: reports that the direction is not implemented.
pub(crate) fn run_avi2str(input: &Path) -> Result<(), CliError> {
    convert_avi_to_str(input)?;
    Ok(())
}
