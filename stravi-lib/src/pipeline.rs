//! STR→AVI conversion pipeline.
//!
//! One forward pass over the input: read a sector, keep it if it carries
//! video, feed its payload to the frame assembler, decode each completed
//! frame and append it to the AVI output. Damaged sectors and frames are
//! skipped and counted; only I/O failures stop the conversion.

use std::ffi::OsString;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, Write};
use std::path::{Path, PathBuf};

use stravi_avi::{AviConfig, AviMuxer};
use stravi_core::{ConvertProgress, Geometry};
use stravi_psx::sector::{SectorKind, classify_sector, sector_address};
use stravi_psx::{CompressedFrame, DroppedFrame, FrameAssembler, MdecDecoder, SectorReader};

use crate::error::ConvertError;
use crate::options::ConvertOptions;
use crate::settings::load_settings;

/// Counts gathered during one conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionReport {
    /// Complete 2352-byte sectors read.
    pub sectors_read: u64,
    /// Sectors that passed the video checks.
    pub video_sectors: u64,
    /// Sectors ignored: non-video, or video with an unusable chunk header.
    pub skipped_sectors: u64,
    pub frames_written: u64,
    /// Frames that were started but not written: incomplete, undecodable,
    /// or of a different size than the rest of the stream.
    pub frames_dropped: u64,
    /// Bytes after the last complete sector.
    pub trailing_bytes: u64,
    /// Size of the frames in the output.
    pub geometry: Geometry,
    pub fps: u32,
    /// Size of the AVI file.
    pub output_bytes: u64,
}

/// Convert an STR file next to itself (`movie.str` → `movie.avi`) using
/// the saved settings.
pub fn convert_str_to_avi(input: &Path) -> Result<ConversionReport, ConvertError> {
    let options = ConvertOptions::from_settings(&load_settings());
    convert_str_to_avi_with(input, &default_output_path(input), &options, &|_| {})
}

/// Convert an STR file to `output`, reporting progress through `progress`.
pub fn convert_str_to_avi_with(
    input: &Path,
    output: &Path,
    options: &ConvertOptions,
    progress: &dyn Fn(&ConvertProgress),
) -> Result<ConversionReport, ConvertError> {
    let file = File::open(input).map_err(|e| ConvertError::file(input, e))?;
    let total_bytes = file.metadata().ok().map(|m| m.len());
    let out = File::create(output).map_err(|e| ConvertError::file(output, e))?;

    log::info!("Converting {} -> {}", input.display(), output.display());

    let (writer, report) = convert_stream(
        BufReader::new(file),
        BufWriter::new(out),
        options,
        total_bytes,
        progress,
    )?;
    writer
        .into_inner()
        .map_err(|e| ConvertError::file(output, e.into_error()))?;

    log::info!(
        "Wrote {} frames ({}) to {}",
        report.frames_written,
        report.geometry,
        output.display()
    );
    Ok(report)
}

/// AVI→STR is not implemented; re-encoding MDEC is out of reach.
pub fn convert_avi_to_str(input: &Path) -> Result<(), ConvertError> {
    Err(ConvertError::unsupported(format!(
        "cannot convert {} to STR: AVI to STR encoding is not implemented",
        input.display()
    )))
}

/// `<input stem>.avi` in the input's directory.
pub fn default_output_path(input: &Path) -> PathBuf {
    let out = input.with_extension("avi");
    if out == input {
        let mut name = OsString::from(input.as_os_str());
        name.push(".avi");
        return PathBuf::from(name);
    }
    out
}

/// Run the pipeline over any sector stream.
///
/// `total_bytes` is only used for progress reporting. Returns the writer
/// positioned at the end of the finished AVI.
pub fn convert_stream<R: Read, W: Write + Seek>(
    reader: R,
    writer: W,
    options: &ConvertOptions,
    total_bytes: Option<u64>,
    progress: &dyn Fn(&ConvertProgress),
) -> Result<(W, ConversionReport), ConvertError> {
    progress(&ConvertProgress::started(total_bytes));

    let mut sectors = SectorReader::new(reader);
    let mut assembler = FrameAssembler::new();
    let mut sink = FrameSink::new(writer, options, progress);

    while let Some(sector) = sectors.next_sector()? {
        let index = sink.report.sectors_read;
        sink.report.sectors_read += 1;

        match classify_sector(sector) {
            SectorKind::Video => {
                sink.report.video_sectors += 1;
                match assembler.push(stravi_psx::extract_payload(sector)) {
                    Ok(Some(frame)) => sink.push(frame)?,
                    Ok(None) => {}
                    Err(e) => {
                        log::debug!("Skipping sector {}: {}", index, e);
                        sink.report.skipped_sectors += 1;
                    }
                }
            }
            kind => {
                match sector_address(sector) {
                    Some(msf) => log::debug!("Skipping sector {} ({}): {}", index, msf, kind),
                    None => log::debug!("Skipping sector {}: {}", index, kind),
                }
                sink.report.skipped_sectors += 1;
            }
        }

        sink.record_drops(assembler.take_dropped());
        progress(&ConvertProgress::reading(sectors.bytes_read(), total_bytes));
    }

    if assembler.has_pending() {
        log::debug!("Input ended with a frame still incomplete");
    }
    assembler.finish();
    sink.record_drops(assembler.take_dropped());
    sink.report.trailing_bytes = sectors.trailing_bytes() as u64;
    if sink.report.trailing_bytes > 0 {
        log::info!(
            "Ignored {} bytes after the last whole sector",
            sink.report.trailing_bytes
        );
    }

    sink.finish()
}

/// Decodes frames and writes them out, opening the AVI on the first one.
struct FrameSink<'a, W: Write + Seek> {
    options: &'a ConvertOptions,
    progress: &'a dyn Fn(&ConvertProgress),
    report: ConversionReport,
    writer: Option<W>,
    muxer: Option<AviMuxer<W>>,
    decoder: Option<MdecDecoder>,
    /// Size of the first frame that decoded; every later frame must match.
    stream_geometry: Option<Geometry>,
}

impl<'a, W: Write + Seek> FrameSink<'a, W> {
    fn new(writer: W, options: &'a ConvertOptions, progress: &'a dyn Fn(&ConvertProgress)) -> Self {
        Self {
            options,
            progress,
            report: ConversionReport {
                fps: options.fps,
                ..Default::default()
            },
            writer: Some(writer),
            muxer: None,
            decoder: None,
            stream_geometry: None,
        }
    }

    fn push(&mut self, frame: CompressedFrame) -> Result<(), ConvertError> {
        let geometry = self.options.decode_geometry(frame.geometry);

        if let Some(stream_geometry) = self.stream_geometry.filter(|g| *g != geometry) {
            let reason = format!("size {geometry} differs from stream size {stream_geometry}");
            self.drop_frame(frame.frame_number, reason);
            return Ok(());
        }

        // Until a frame decodes, each new size gets a fresh decoder.
        let decoder = match self.decoder.take() {
            Some(decoder) if decoder.geometry() == geometry => decoder,
            _ => match MdecDecoder::new(geometry) {
                Ok(decoder) => decoder,
                Err(e) => {
                    self.drop_frame(frame.frame_number, e.to_string());
                    return Ok(());
                }
            },
        };
        let decoder = self.decoder.insert(decoder);

        let rgb = match decoder.decode(&frame.data) {
            Ok(rgb) => rgb,
            Err(e) => {
                self.drop_frame(frame.frame_number, e.to_string());
                return Ok(());
            }
        };

        self.stream_geometry = Some(geometry);
        self.open_muxer(geometry)?;
        if let Some(muxer) = self.muxer.as_mut() {
            muxer.write_frame(&rgb)?;
            let index = self.report.frames_written;
            self.report.frames_written += 1;
            log::debug!("Wrote frame {} (stream frame {})", index, frame.frame_number);
            (self.progress)(&ConvertProgress::FrameWritten {
                index,
                frame_number: frame.frame_number,
            });
        }
        Ok(())
    }

    fn open_muxer(&mut self, geometry: Geometry) -> Result<(), ConvertError> {
        if self.muxer.is_some() {
            return Ok(());
        }
        if let Some(writer) = self.writer.take() {
            let config = AviConfig::new(geometry, self.options.fps);
            self.muxer = Some(AviMuxer::open(writer, config)?);
        }
        Ok(())
    }

    fn record_drops(&mut self, dropped: Vec<DroppedFrame>) {
        for d in dropped {
            self.report.frames_dropped += 1;
            (self.progress)(&ConvertProgress::dropped(
                Some(d.frame_number),
                d.reason.to_string(),
            ));
        }
    }

    fn drop_frame(&mut self, frame_number: u32, reason: String) {
        log::warn!("Dropping frame {}: {}", frame_number, reason);
        self.report.frames_dropped += 1;
        (self.progress)(&ConvertProgress::dropped(Some(frame_number), reason));
    }

    fn finish(mut self) -> Result<(W, ConversionReport), ConvertError> {
        // A stream with nothing decodable still yields a valid, empty file.
        let geometry = self
            .stream_geometry
            .unwrap_or(self.options.fallback_geometry);
        self.open_muxer(geometry)?;

        let muxer = self
            .muxer
            .take()
            .ok_or_else(|| ConvertError::Io(std::io::Error::other("AVI output was never opened")))?;
        let (writer, summary) = muxer.finalize()?;

        self.report.geometry = summary.config.geometry();
        self.report.output_bytes = summary.file_size;
        (self.progress)(&ConvertProgress::Completed {
            frames: self.report.frames_written,
        });
        Ok((writer, self.report))
    }
}

#[cfg(test)]
#[path = "tests/pipeline_tests.rs"]
mod tests;
