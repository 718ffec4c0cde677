// SPDX-License-Identifier: MIT

//! The Locker↔Spawner handshake channel (spec.md §4.2/§9: "a shared
//! bidirectional integer channel `sync`"). Per the design note's
//! suggested tagged-variant rewrite, this is modelled as two half
//! channels — a reservation flowing Spawner → Locker and a release
//! flowing Locker → Spawner — so each message's direction is a type-level
//! fact rather than a runtime convention.

use tokio::sync::mpsc;

/// One of `nbSlots` worker positions, circulated as the waiting token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot(pub usize);

/// Build a connected pair of halves with the given handshake buffer.
pub fn channel(capacity: usize) -> (SpawnerHalf, LockerHalf) {
    let (reserve_tx, reserve_rx) = mpsc::channel(capacity);
    let (release_tx, release_rx) = mpsc::channel(capacity);
    (
        SpawnerHalf {
            reserve_tx,
            release_rx,
        },
        LockerHalf {
            reserve_rx,
            release_tx,
        },
    )
}

/// The Spawner's end: offers a reserved slot, and is told back if the
/// reservation could not be honored.
pub struct SpawnerHalf {
    reserve_tx: mpsc::Sender<Slot>,
    release_rx: mpsc::Receiver<Slot>,
}

impl SpawnerHalf {
    /// Offer `slot` to the Locker as a waiting token. Blocks until the
    /// Locker is ready to receive a candidate, matching the source's
    /// unbuffered-channel semantics.
    pub async fn reserve(&self, slot: Slot) -> Result<(), Slot> {
        self.reserve_tx.send(slot).await.map_err(|e| e.0)
    }

    /// Wait for a previously reserved slot to be handed back because the
    /// Locker's claim attempt failed.
    pub async fn recv_returned(&mut self) -> Option<Slot> {
        self.release_rx.recv().await
    }
}

/// The Locker's end: waits for a reservation, and hands it back on
/// failure.
pub struct LockerHalf {
    reserve_rx: mpsc::Receiver<Slot>,
    release_tx: mpsc::Sender<Slot>,
}

impl LockerHalf {
    pub async fn recv_reserved(&mut self) -> Option<Slot> {
        self.reserve_rx.recv().await
    }

    /// Return the reservation: the claim attempt for this slot failed.
    pub async fn give_back(&self, slot: Slot) -> Result<(), Slot> {
        self.release_tx.send(slot).await.map_err(|e| e.0)
    }
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
