//! Frame assembly from STR chunks.
//!
//! Video payloads arrive in stream order. A frame opens on chunk 0, grows
//! by one chunk at a time, and is emitted as soon as its declared byte
//! size is reached. Anything that breaks the chunk sequence drops the
//! frame being built; the next chunk 0 starts over.

use std::fmt;

use stravi_core::{Geometry, StrError};

use crate::chunk::{ChunkHeader, chunk_data};

/// One complete compressed frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedFrame {
    pub frame_number: u32,
    /// Dimensions declared in the chunk headers.
    pub geometry: Geometry,
    /// Exactly `frame_size` bytes of MDEC bitstream.
    pub data: Vec<u8>,
}

/// Why a partially assembled frame was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Chunk 0 of another frame arrived first.
    Interrupted,
    /// A chunk was missing, repeated, or belonged to another frame.
    OutOfOrder,
    /// The stream ended mid-frame.
    Truncated,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interrupted => write!(f, "interrupted by the next frame"),
            Self::OutOfOrder => write!(f, "chunk sequence broken"),
            Self::Truncated => write!(f, "stream ended mid-frame"),
        }
    }
}

/// A frame that was started but never completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedFrame {
    pub frame_number: u32,
    pub received_bytes: usize,
    pub expected_bytes: usize,
    pub reason: DropReason,
}

impl fmt::Display for DroppedFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "frame {} ({}/{} bytes): {}",
            self.frame_number, self.received_bytes, self.expected_bytes, self.reason
        )
    }
}

#[derive(Debug)]
struct PendingFrame {
    frame_number: u32,
    geometry: Geometry,
    frame_size: usize,
    chunk_count: u16,
    next_chunk: u16,
    data: Vec<u8>,
}

impl PendingFrame {
    fn start(header: &ChunkHeader) -> Self {
        Self {
            frame_number: header.frame_number,
            geometry: header.geometry(),
            frame_size: header.frame_size as usize,
            chunk_count: header.chunk_count,
            next_chunk: 0,
            data: Vec::with_capacity(header.frame_size as usize),
        }
    }

    fn accepts(&self, header: &ChunkHeader) -> bool {
        header.frame_number == self.frame_number
            && header.chunk_number == self.next_chunk
            && header.chunk_count == self.chunk_count
            && header.frame_size as usize == self.frame_size
    }

    fn into_dropped(self, reason: DropReason) -> DroppedFrame {
        DroppedFrame {
            frame_number: self.frame_number,
            received_bytes: self.data.len(),
            expected_bytes: self.frame_size,
            reason,
        }
    }
}

/// Accumulates chunk data until a frame is complete.
#[derive(Debug, Default)]
pub struct FrameAssembler {
    pending: Option<PendingFrame>,
    dropped: Vec<DroppedFrame>,
    frames_emitted: u64,
    frames_dropped: u64,
    orphan_chunks: u64,
    count_only: bool,
}

impl FrameAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop keeping details of dropped frames; only the counter grows.
    /// For callers that never call [`take_dropped`](Self::take_dropped).
    pub fn count_drops_only(&mut self) {
        self.count_only = true;
        self.dropped.clear();
    }

    /// Feed one video payload.
    ///
    /// Returns the completed frame when this payload finishes one. An
    /// error means the payload's chunk header is unusable; the payload is
    /// ignored and any frame in progress is kept.
    pub fn push(&mut self, payload: &[u8]) -> Result<Option<CompressedFrame>, StrError> {
        let header = ChunkHeader::parse(payload)?;

        let mut pending = if header.is_first() {
            if let Some(old) = self.pending.take() {
                self.drop_pending(old, DropReason::Interrupted);
            }
            PendingFrame::start(&header)
        } else {
            match self.pending.take() {
                Some(p) if p.accepts(&header) => p,
                Some(p) => {
                    self.drop_pending(p, DropReason::OutOfOrder);
                    self.orphan_chunks += 1;
                    return Ok(None);
                }
                None => {
                    log::debug!(
                        "Ignoring chunk {}/{} of frame {} with no frame open",
                        header.chunk_number,
                        header.chunk_count,
                        header.frame_number
                    );
                    self.orphan_chunks += 1;
                    return Ok(None);
                }
            }
        };

        let data = chunk_data(payload);
        let wanted = (pending.frame_size - pending.data.len()).min(data.len());
        pending.data.extend_from_slice(&data[..wanted]);
        pending.next_chunk += 1;

        if pending.data.len() >= pending.frame_size {
            self.frames_emitted += 1;
            log::debug!(
                "Assembled frame {} ({} bytes, {} chunks)",
                pending.frame_number,
                pending.frame_size,
                pending.next_chunk
            );
            if !header.is_last() {
                log::debug!(
                    "Frame {} complete at chunk {} of {}; later chunks count as orphans",
                    pending.frame_number,
                    header.chunk_number + 1,
                    header.chunk_count
                );
            }
            return Ok(Some(CompressedFrame {
                frame_number: pending.frame_number,
                geometry: pending.geometry,
                data: pending.data,
            }));
        }

        self.pending = Some(pending);
        Ok(None)
    }

    /// Close the stream. An unfinished frame is recorded as truncated.
    pub fn finish(&mut self) {
        if let Some(p) = self.pending.take() {
            self.drop_pending(p, DropReason::Truncated);
        }
    }

    /// Frames dropped since the last call.
    pub fn take_dropped(&mut self) -> Vec<DroppedFrame> {
        std::mem::take(&mut self.dropped)
    }

    pub fn frames_emitted(&self) -> u64 {
        self.frames_emitted
    }

    /// Total frames dropped, including ones already taken.
    pub fn frames_dropped(&self) -> u64 {
        self.frames_dropped
    }

    /// Chunks that arrived with no matching frame open.
    pub fn orphan_chunks(&self) -> u64 {
        self.orphan_chunks
    }

    /// True while a frame is partially assembled.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn drop_pending(&mut self, pending: PendingFrame, reason: DropReason) {
        let dropped = pending.into_dropped(reason);
        log::warn!("Dropping {}", dropped);
        self.frames_dropped += 1;
        if !self.count_only {
            self.dropped.push(dropped);
        }
    }
}

/// Lazy, one-pass sequence of compressed frames over a payload iterator.
///
/// Payloads with unusable chunk headers are skipped. When the payloads run
/// out, an unfinished frame is dropped and iteration ends.
pub struct CompressedFrames<I> {
    payloads: I,
    assembler: FrameAssembler,
    finished: bool,
}

impl<I> CompressedFrames<I> {
    pub fn assembler(&self) -> &FrameAssembler {
        &self.assembler
    }

    pub fn assembler_mut(&mut self) -> &mut FrameAssembler {
        &mut self.assembler
    }
}

impl<I, P> Iterator for CompressedFrames<I>
where
    I: Iterator<Item = P>,
    P: AsRef<[u8]>,
{
    type Item = CompressedFrame;

    fn next(&mut self) -> Option<CompressedFrame> {
        for payload in self.payloads.by_ref() {
            match self.assembler.push(payload.as_ref()) {
                Ok(Some(frame)) => return Some(frame),
                Ok(None) => {}
                Err(e) => log::debug!("Skipping payload: {}", e),
            }
        }
        if !self.finished {
            self.finished = true;
            self.assembler.finish();
        }
        None
    }
}

/// Assemble frames lazily from video payloads in stream order.
pub fn frames<I>(payloads: I) -> CompressedFrames<I::IntoIter>
where
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    CompressedFrames {
        payloads: payloads.into_iter(),
        assembler: FrameAssembler::new(),
        finished: false,
    }
}

#[cfg(test)]
#[path = "tests/assembler_tests.rs"]
mod tests;
