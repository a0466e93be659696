use meter_protocol::POLL_REQUEST;
use serialport::SerialPort;
use std::{io, time::Duration};

/// A connected byte stream to the meter.
///
/// Reads are timed waits: an implementation must return
/// [`io::ErrorKind::TimedOut`] (or `WouldBlock`) when no data arrives within
/// its timeout, so the acquisition loop can re-check its stop flag instead of
/// hanging on a silent device.
pub trait MeterLink {
    /// Sends the one-byte poll request.
    fn send_poll(&mut self) -> io::Result<()>;

    /// Reads whatever bytes are available, up to `buf.len()`.
    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// Meter link over a serial port, e.g. the TTY an RFCOMM channel is bound to.
pub struct SerialMeterLink {
    port: Box<dyn SerialPort>,
}

impl SerialMeterLink {
    /// Opens the named port with the given baud rate and read timeout.
    pub fn open(path: &str, baud_rate: u32, timeout: Duration) -> serialport::Result<Self> {
        let port = serialport::new(path, baud_rate).timeout(timeout).open()?;

        Ok(Self { port })
    }
}

impl MeterLink for SerialMeterLink {
    fn send_poll(&mut self) -> io::Result<()> {
        self.port.write_all(&[POLL_REQUEST])
    }

    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.port.read(buf)
    }
}
