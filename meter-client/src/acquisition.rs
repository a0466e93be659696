use crate::link::MeterLink;
use crate::sink::RecordSink;
use crate::window::SlidingWindow;
use meter_protocol::{FRAME_LEN, PacketAssembler, Telemetry};
use std::{
    io,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::Duration,
};
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum AcquisitionError {
    #[error("transport fault: {0}")]
    Transport(#[from] io::Error),
    #[error("sink failure: {0}")]
    Sink(#[source] anyhow::Error),
}

/// Drives the poll/read/decode/dispatch cycle against one meter.
///
/// Strictly sequential: one poll byte out, one timed read in, assembler fed,
/// and on a completed frame the decoded sample goes into the sliding window
/// and to every registered sink, in registration order. Framing faults reset
/// the assembler and the loop resumes; transport faults end the session.
/// Whatever way the loop exits, the sinks are flushed and closed exactly once.
pub struct AcquisitionLoop<L: MeterLink> {
    link: L,
    assembler: PacketAssembler,
    window: SlidingWindow,
    sinks: Vec<Box<dyn RecordSink>>,
    stop: Arc<AtomicBool>,
    poll_delay: Duration,
    framing_faults: u64,
    finished: bool,
}

impl<L: MeterLink> AcquisitionLoop<L> {
    pub fn new(
        link: L,
        stop: Arc<AtomicBool>,
        poll_delay: Duration,
        window_capacity: usize,
    ) -> Self {
        Self {
            link,
            assembler: PacketAssembler::new(),
            window: SlidingWindow::new(window_capacity),
            sinks: Vec::new(),
            stop,
            poll_delay,
            framing_faults: 0,
            finished: false,
        }
    }

    pub fn add_sink(&mut self, sink: Box<dyn RecordSink>) {
        self.sinks.push(sink);
    }

    /// Recent samples, oldest first.
    pub fn window(&self) -> &SlidingWindow {
        &self.window
    }

    /// Framing faults seen so far in this session.
    pub fn framing_faults(&self) -> u64 {
        self.framing_faults
    }

    /// Runs until the stop flag is raised or a transport fault occurs.
    pub fn run(&mut self) -> Result<(), AcquisitionError> {
        if self.finished {
            warn!("acquisition loop already ran, ignoring");
            return Ok(());
        }

        let outcome = self.acquire();
        self.finished = true;
        outcome.and(self.shutdown())
    }

    fn acquire(&mut self) -> Result<(), AcquisitionError> {
        let mut buf = [0u8; FRAME_LEN];

        while !self.stop.load(Ordering::Relaxed) {
            self.link.send_poll()?;

            match self.link.read_chunk(&mut buf) {
                Ok(0) => {
                    return Err(AcquisitionError::Transport(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "meter closed the stream",
                    )));
                }
                Ok(n) => match self.assembler.feed(&buf[..n]) {
                    Ok(Some(frame)) => self.dispatch(Telemetry::from(&frame))?,
                    Ok(None) => {}
                    Err(fault) => {
                        self.framing_faults += 1;
                        warn!(%fault, total = self.framing_faults, "assembler reset");
                    }
                },
                // A quiet cycle: keep polling so the stop flag stays observable
                // even when the device never answers.
                Err(e) if is_timeout(&e) => {}
                Err(e) => return Err(e.into()),
            }

            thread::sleep(self.poll_delay);
        }

        Ok(())
    }

    fn dispatch(&mut self, sample: Telemetry) -> Result<(), AcquisitionError> {
        self.window.push(sample.clone());
        for sink in &mut self.sinks {
            sink.record(&sample).map_err(AcquisitionError::Sink)?;
        }
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), AcquisitionError> {
        debug!(framing_faults = self.framing_faults, "closing sinks");

        let mut failure = None;
        for sink in &mut self.sinks {
            if let Err(e) = sink.close() {
                warn!(error = %e, "failed to close sink");
                failure.get_or_insert(e);
            }
        }

        match failure {
            None => Ok(()),
            Some(e) => Err(AcquisitionError::Sink(e)),
        }
    }
}

fn is_timeout(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
    )
}
