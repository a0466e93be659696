use meter_protocol::Telemetry;
use std::collections::VecDeque;

/// Default history depth for live views.
pub const DEFAULT_CAPACITY: usize = 20;

/// Bounded, insertion-ordered buffer of recent samples.
///
/// Pushing past capacity evicts the oldest sample, so consumers always see
/// the latest `capacity` measurements in acquisition order.
#[derive(Debug)]
pub struct SlidingWindow {
    samples: VecDeque<Telemetry>,
    capacity: usize,
}

impl SlidingWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, sample: Telemetry) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Current contents, oldest first. Does not mutate the window.
    pub fn snapshot(&self) -> Vec<&Telemetry> {
        self.samples.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl Default for SlidingWindow {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meter_protocol::{FRAME_LEN, Frame};

    fn sample(voltage_mv: i16) -> Telemetry {
        let mut bytes = [0u8; FRAME_LEN];
        bytes[2..4].copy_from_slice(&voltage_mv.to_be_bytes());
        Telemetry::from(&Frame::from(bytes))
    }

    #[test]
    fn fills_up_to_capacity_without_eviction() {
        let mut window = SlidingWindow::new(20);
        for i in 0..20 {
            window.push(sample(i));
        }
        assert_eq!(window.len(), 20);
        assert_eq!(window.snapshot()[0].voltage_v, 0.0);
    }

    #[test]
    fn evicts_oldest_first_and_keeps_order() {
        let mut window = SlidingWindow::new(20);
        for i in 0..25 {
            window.push(sample(i));
        }

        let snapshot = window.snapshot();
        assert_eq!(snapshot.len(), 20);
        // first 5 evicted, the rest in original relative order
        for (i, telemetry) in snapshot.iter().enumerate() {
            assert_eq!(telemetry.voltage_v, f64::from(i as i16 + 5) / 1000.0);
        }
    }

    #[test]
    fn snapshot_does_not_drain() {
        let mut window = SlidingWindow::new(3);
        window.push(sample(1));
        assert_eq!(window.snapshot().len(), 1);
        assert_eq!(window.snapshot().len(), 1);
        assert_eq!(window.len(), 1);
    }
}
