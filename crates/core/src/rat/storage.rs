//! Addressable storage with synchronous (one-tick) read latency.
//!
//! Models a memory bank the way the snapshot-table technology behaves: a read
//! requested during tick N produces its data during tick N+1, and writes
//! staged during a tick land at the next boundary. One read and one write per
//! tick. A write and a read of the same slot staged in the same tick resolve
//! write-first, so a snapshot written at capture time is always visible to
//! the rollback read that follows it.

/// An addressable bank of `T` slots with one-tick read latency.
#[derive(Debug)]
pub struct SyncMem<T: Clone> {
    slots: Vec<T>,
    read_addr: Option<usize>,
    read_data: Option<T>,
    write_req: Option<(usize, T)>,
}

impl<T: Clone> SyncMem<T> {
    /// Creates a bank of `depth` slots, each initialized to `init`.
    pub fn new(depth: usize, init: T) -> Self {
        Self {
            slots: vec![init; depth],
            read_addr: None,
            read_data: None,
            write_req: None,
        }
    }

    /// Number of slots.
    #[inline]
    pub const fn depth(&self) -> usize {
        self.slots.len()
    }

    /// Requests a read of `addr`; the data is available from
    /// [`take_response`](Self::take_response) during the next tick.
    pub fn read_req(&mut self, addr: usize) {
        debug_assert!(self.read_addr.is_none(), "one read request per tick");
        self.read_addr = Some(addr);
    }

    /// Consumes the response to the read requested last tick, if any.
    pub fn take_response(&mut self) -> Option<T> {
        self.read_data.take()
    }

    /// Stages a write of `data` to `addr`, visible from the next tick.
    pub fn write(&mut self, addr: usize, data: T) {
        debug_assert!(self.write_req.is_none(), "one write per tick");
        self.write_req = Some((addr, data));
    }

    /// Commits the tick boundary: applies the staged write, then services the
    /// pending read request.
    pub fn update(&mut self) {
        if let Some((addr, data)) = self.write_req.take() {
            self.slots[addr] = data;
        }
        self.read_data = self.read_addr.take().map(|addr| self.slots[addr].clone());
    }
}
