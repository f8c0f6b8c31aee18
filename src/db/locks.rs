use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per room, serializing the read-check-write sequence of
/// booking creation for that room within this process.
///
/// Entries live only while a request holds or waits for them, so ids that
/// never existed or rooms that were deleted leave nothing behind.
#[derive(Debug, Default)]
pub struct RoomLocks {
    rooms: DashMap<i64, Arc<Mutex<()>>>,
}

impl RoomLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, room_id: i64) -> RoomGuard<'_> {
        let lock = self.rooms.entry(room_id).or_default().clone();
        RoomGuard {
            locks: self,
            room_id,
            guard: Some(lock.lock_owned().await),
        }
    }

    /// Rooms currently held or waited on.
    pub fn tracked(&self) -> usize {
        self.rooms.len()
    }
}

/// Exclusive access to one room until dropped.
#[derive(Debug)]
pub struct RoomGuard<'a> {
    locks: &'a RoomLocks,
    room_id: i64,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for RoomGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Only the map's own reference left: nobody holds or waits.
        self.locks
            .rooms
            .remove_if(&self.room_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}
