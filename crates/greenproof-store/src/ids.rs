//! Record id generation.
//!
//! Ids are 12 bytes: creation time in seconds, 5 random bytes chosen once
//! per generator, and a 24-bit counter starting at a random value. Two
//! generators collide only if they draw the same random bytes.

use std::sync::atomic::{AtomicU32, Ordering};

use greenproof_core::{record_id_bytes, ActionId, ProofId};

/// Source of unique record ids for one store instance.
#[derive(Debug)]
pub struct IdGenerator {
    random: [u8; 5],
    counter: AtomicU32,
}

impl IdGenerator {
    /// A generator with fresh random state.
    pub fn new() -> Self {
        Self::with_state(rand::random(), rand::random::<u32>() & 0x00ff_ffff)
    }

    /// A generator with fixed state, for reproducible ids.
    pub fn with_state(random: [u8; 5], counter: u32) -> Self {
        Self {
            random,
            counter: AtomicU32::new(counter),
        }
    }

    pub fn next_action_id(&self, now_ms: i64) -> ActionId {
        ActionId::from_bytes(self.next_bytes(now_ms))
    }

    pub fn next_proof_id(&self, now_ms: i64) -> ProofId {
        ProofId::from_bytes(self.next_bytes(now_ms))
    }

    fn next_bytes(&self, now_ms: i64) -> [u8; 12] {
        let count = self.counter.fetch_add(1, Ordering::Relaxed);
        let secs = (now_ms / 1000).clamp(0, u32::MAX as i64) as u32;
        record_id_bytes(secs, self.random, count)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
