use crate::frame::{Byte, FRAME_LEN, Frame, FramingError};
use std::cmp::Ordering;

/// Reassembles fixed-length frames from a stream of arbitrarily sized reads.
///
/// The meter does not delimit frames; the only boundary is the fixed length.
/// Chunks are appended to an internal buffer until exactly [`FRAME_LEN`]
/// bytes have accumulated, at which point a [`Frame`] is emitted and the
/// buffer is cleared for the next cycle.
#[derive(Debug, Default)]
pub struct PacketAssembler {
    buffer: Vec<Byte>,
}

impl PacketAssembler {
    pub fn new() -> Self {
        Self { buffer: Vec::with_capacity(FRAME_LEN) }
    }

    /// Appends a chunk and extracts a frame if one just completed.
    ///
    /// Returns `Ok(None)` while the buffer is still short of a full frame.
    /// A buffer that grows past [`FRAME_LEN`] means the stream lost frame
    /// alignment; the buffer is reset so assembly can resume at the next
    /// response, and the fault is reported to the caller.
    pub fn feed(&mut self, chunk: &[Byte]) -> Result<Option<Frame>, FramingError> {
        self.buffer.extend_from_slice(chunk);

        match self.buffer.len().cmp(&FRAME_LEN) {
            Ordering::Less => Ok(None),
            Ordering::Equal => {
                let frame = Frame::try_from(self.buffer.as_slice())?;
                self.buffer.clear();
                Ok(Some(frame))
            }
            Ordering::Greater => {
                let len = self.buffer.len();
                self.buffer.clear();
                Err(FramingError::Overrun { len })
            }
        }
    }

    /// Bytes currently accumulated towards the next frame.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_split_into_uneven_chunks() {
        let bytes: Vec<u8> = (0..FRAME_LEN as u32).map(|i| (i % 251) as u8).collect();
        let mut assembler = PacketAssembler::new();

        assert_eq!(assembler.feed(&bytes[..1]).unwrap(), None);
        assert_eq!(assembler.feed(&bytes[1..50]).unwrap(), None);
        let frame = assembler.feed(&bytes[50..]).unwrap().unwrap();

        assert_eq!(frame.as_bytes().as_slice(), bytes.as_slice());
        assert_eq!(assembler.pending(), 0);
    }

    #[test]
    fn short_input_yields_no_frame() {
        let mut assembler = PacketAssembler::new();
        assert_eq!(assembler.feed(&[0u8; 64]).unwrap(), None);
        assert_eq!(assembler.feed(&[0u8; 65]).unwrap(), None);
        assert_eq!(assembler.pending(), 129);
    }

    #[test]
    fn single_exact_chunk() {
        let mut assembler = PacketAssembler::new();
        let frame = assembler.feed(&[0x7Eu8; FRAME_LEN]).unwrap();
        assert!(frame.is_some());
        assert_eq!(assembler.pending(), 0);
    }

    #[test]
    fn oversized_chunk_is_a_framing_fault() {
        let mut assembler = PacketAssembler::new();
        let result = assembler.feed(&[0u8; FRAME_LEN + 1]);
        assert_eq!(result, Err(FramingError::Overrun { len: FRAME_LEN + 1 }));
        // state is reset, not left holding the garbage
        assert_eq!(assembler.pending(), 0);
    }

    #[test]
    fn overrun_across_chunks_resets_state() {
        let mut assembler = PacketAssembler::new();
        assert_eq!(assembler.feed(&[0u8; 100]).unwrap(), None);
        let result = assembler.feed(&[0u8; 100]);
        assert_eq!(result, Err(FramingError::Overrun { len: 200 }));
        assert_eq!(assembler.pending(), 0);
    }

    #[test]
    fn frame_after_overrun_recovers() {
        let mut assembler = PacketAssembler::new();
        assembler.feed(&[0u8; FRAME_LEN + 20]).unwrap_err();

        let frame = assembler.feed(&[0x55u8; FRAME_LEN]).unwrap();
        assert!(frame.is_some());
        assert_eq!(assembler.pending(), 0);
    }

    #[test]
    fn consecutive_frames_from_one_assembler() {
        let mut assembler = PacketAssembler::new();

        let first = assembler.feed(&[0x01u8; FRAME_LEN]).unwrap().unwrap();
        let second = assembler.feed(&[0x02u8; FRAME_LEN]).unwrap().unwrap();

        assert_eq!(first.as_bytes()[0], 0x01);
        assert_eq!(second.as_bytes()[0], 0x02);
    }
}
