use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use stravi_avi::AviInfo;
use stravi_core::util::format_bytes_approx;
use stravi_lib::{StreamInfo, load_settings, probe_file};

use crate::CliError;

fn is_avi(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("avi"))
}

/// Print a summary of an STR or AVI file.
pub(crate) fn run_probe(input: &Path) -> Result<(), CliError> {
    log::info!(
        "{}",
        input.display().if_supports_color(Stdout, |t| t.bold()),
    );
    if is_avi(input) {
        print_avi(&AviInfo::from_path(input)?);
    } else {
        print_str(&probe_file(input)?);
    }
    Ok(())
}

fn print_str(info: &StreamInfo) {
    let fps = load_settings().conversion.fps;

    log::info!(
        "  Size:      {} ({} sectors)",
        format_bytes_approx(info.total_bytes),
        info.sectors
    );
    log::info!(
        "  Sectors:   {} video, {} other",
        info.video_sectors,
        info.other_sectors
    );
    match info.geometry {
        Some(g) => log::info!("  Frames:    {} at {}", info.frames, g),
        None => log::info!(
            "  Frames:    {}",
            "none".if_supports_color(Stdout, |t| t.dimmed())
        ),
    }
    if !info.channels.is_empty() {
        let channels: Vec<String> = info.channels.iter().map(|c| c.to_string()).collect();
        log::info!("  Channels:  {}", channels.join(", "));
    }
    if let Some(msf) = info.first_video_address {
        log::info!("  Starts at: {} (LBA {})", msf, msf.to_lba());
    }
    if let (Some(first), Some(last)) = (info.first_frame, info.last_frame) {
        log::info!("  Numbers:   {} to {}", first, last);
    }
    if let Some(secs) = info.duration_secs(fps) {
        log::info!("  Duration:  {:.1} s at {} fps", secs, fps);
    }
    if !info.mdec_versions.is_empty() {
        let versions: Vec<String> = info.mdec_versions.iter().map(|v| v.to_string()).collect();
        log::info!("  Bitstream: version {}", versions.join(", "));
    }
    if info.frames_dropped > 0 || info.orphan_chunks > 0 || info.bad_headers > 0 {
        log::warn!(
            "  {} {} incomplete frames, {} stray chunks, {} bad frame headers",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            info.frames_dropped,
            info.orphan_chunks,
            info.bad_headers,
        );
    }
    if info.trailing_bytes > 0 {
        log::info!(
            "  {}",
            format!("{} trailing bytes", info.trailing_bytes)
                .if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
}

fn print_avi(info: &AviInfo) {
    log::info!(
        "  Size:      {} (RIFF says {} bytes)",
        format_bytes_approx(info.file_size),
        info.riff_size as u64 + 8
    );
    log::info!(
        "  Video:     {}x{}, {} bpp, {}",
        info.width,
        info.height,
        info.bit_count,
        info.handler
            .map(|h| h.to_string())
            .unwrap_or_else(|| "?".to_string())
    );
    match info.fps() {
        Some(fps) => log::info!("  Rate:      {:.2} fps", fps),
        None => log::info!("  Rate:      unknown"),
    }
    log::info!(
        "  Frames:    {} declared, {} stored ({})",
        info.total_frames,
        info.frame_chunks,
        format_bytes_approx(info.frame_bytes)
    );
    match info.index_entries {
        Some(n) => log::info!("  Index:     {} entries", n),
        None => log::info!(
            "  Index:     {}",
            "missing".if_supports_color(Stdout, |t| t.yellow())
        ),
    }
}
