use std::cell::Cell;

/// Plain copy of the counters held by [`CollisionStats`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub queries: u64,
    pub rejected_queries: u64,
    pub sweeps: u64,
    pub responses: u64,
    pub resolve_passes: u64,
}

/// Per-world query telemetry. Counters are updated through `&self`.
#[derive(Debug, Default)]
pub struct CollisionStats {
    queries: Cell<u64>,
    rejected_queries: Cell<u64>,
    sweeps: Cell<u64>,
    responses: Cell<u64>,
    resolve_passes: Cell<u64>,
}

fn bump(counter: &Cell<u64>) {
    counter.set(counter.get().wrapping_add(1));
}

impl CollisionStats {
    pub fn record_query(&self) {
        bump(&self.queries);
    }

    pub fn record_rejection(&self) {
        bump(&self.rejected_queries);
    }

    pub fn record_sweep(&self) {
        bump(&self.sweeps);
    }

    pub fn record_response(&self) {
        bump(&self.responses);
    }

    pub fn record_pass(&self) {
        bump(&self.resolve_passes);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            queries: self.queries.get(),
            rejected_queries: self.rejected_queries.get(),
            sweeps: self.sweeps.get(),
            responses: self.responses.get(),
            resolve_passes: self.resolve_passes.get(),
        }
    }

    pub fn reset(&self) {
        self.queries.set(0);
        self.rejected_queries.set(0);
        self.sweeps.set(0);
        self.responses.set(0);
        self.resolve_passes.set(0);
    }

    pub fn report(&self) {
        let stats = self.snapshot();
        if stats.queries == 0 && stats.rejected_queries == 0 {
            return;
        }

        log::info!(
            "collision stats: {} queries ({} rejected), {} sweeps, {} responses, {} resolve passes",
            stats.queries,
            stats.rejected_queries,
            stats.sweeps,
            stats.responses,
            stats.resolve_passes
        );
    }
}
