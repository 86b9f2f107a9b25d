use rustc_hash::FxHashSet;

use galena_shared::coords::LocalPos;

/// Advisory set of coordinates with an edit in flight. Callers check
/// before tagging and untag once the edit and its re-mesh complete; a
/// caller that observes "busy" decides itself whether to reject, queue,
/// or retry. This is a signal, not a lock: nothing here blocks.
#[derive(Debug, Default)]
pub struct BusyBlocks {
    in_flight: FxHashSet<LocalPos>,
}

impl BusyBlocks {
    pub fn check(&self, local: LocalPos) -> bool {
        self.in_flight.contains(&local)
    }

    pub fn tag(&mut self, local: LocalPos) {
        self.in_flight.insert(local);
    }

    pub fn untag(&mut self, local: LocalPos) {
        self.in_flight.remove(&local);
    }

    pub fn len(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_empty(&self) -> bool {
        self.in_flight.is_empty()
    }
}
