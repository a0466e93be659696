pub(crate) type Byte = u8;

/// Length of one complete meter response.
pub const FRAME_LEN: usize = 130;

/// Request byte that makes the meter emit one frame.
pub const POLL_REQUEST: Byte = 0xF0;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum FramingError {
    /// The assembly buffer grew past [`FRAME_LEN`]; the buffer was reset.
    #[error("accumulated {len} bytes, more than the {FRAME_LEN}-byte frame")]
    Overrun { len: usize },
    /// A buffer of the wrong size was offered as a complete frame.
    #[error("a frame is exactly {FRAME_LEN} bytes, got {len}")]
    InvalidFrameSize { len: usize },
}

/// One complete 130-byte binary response from the meter.
///
/// Holding a `Frame` is proof of length: decoding never has to re-check it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame([Byte; FRAME_LEN]);

impl Frame {
    pub fn as_bytes(&self) -> &[Byte; FRAME_LEN] {
        &self.0
    }
}

impl From<[Byte; FRAME_LEN]> for Frame {
    fn from(bytes: [Byte; FRAME_LEN]) -> Self {
        Frame(bytes)
    }
}

impl TryFrom<&[Byte]> for Frame {
    type Error = FramingError;

    fn try_from(bytes: &[Byte]) -> Result<Self, Self::Error> {
        let array: [Byte; FRAME_LEN] = bytes
            .try_into()
            .map_err(|_| FramingError::InvalidFrameSize { len: bytes.len() })?;

        Ok(Frame(array))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_from_exact_slice() {
        let bytes = vec![0xABu8; FRAME_LEN];
        let frame = Frame::try_from(bytes.as_slice()).unwrap();
        assert_eq!(frame.as_bytes().len(), FRAME_LEN);
        assert_eq!(frame.as_bytes()[0], 0xAB);
    }

    #[test]
    fn frame_rejects_short_slice() {
        let bytes = vec![0u8; FRAME_LEN - 1];
        assert_eq!(
            Frame::try_from(bytes.as_slice()),
            Err(FramingError::InvalidFrameSize { len: FRAME_LEN - 1 })
        );
    }

    #[test]
    fn frame_rejects_long_slice() {
        let bytes = vec![0u8; FRAME_LEN + 3];
        assert_eq!(
            Frame::try_from(bytes.as_slice()),
            Err(FramingError::InvalidFrameSize { len: FRAME_LEN + 3 })
        );
    }
}
