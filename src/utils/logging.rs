use log::{Level, log_enabled};
use std::time::Instant;

/// Scoped trace of a single collision packet.
pub struct PacketTrace {
    world: u64,
    depth: u32,
    start: Option<Instant>,
}

impl PacketTrace {
    pub fn new(world: u64, depth: u32) -> Self {
        let start = if log_enabled!(Level::Trace) {
            log::trace!("packet start world={world} depth={depth}");
            Some(Instant::now())
        } else {
            None
        };
        Self { world, depth, start }
    }
}

impl Drop for PacketTrace {
    fn drop(&mut self) {
        if let Some(start) = self.start {
            log::trace!(
                "packet end world={} depth={} ({} µs)",
                self.world,
                self.depth,
                start.elapsed().as_micros()
            );
        }
    }
}
