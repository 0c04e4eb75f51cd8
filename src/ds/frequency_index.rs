//! Frequency buckets over entry handles for O(1) LFU victim selection.
//!
//! The index does not own entries. It tracks [`SlotId`] handles issued by the
//! engine's recency list and files each one under its current access count.
//! Buckets form a chain ordered by frequency, and `min_freq` names the head
//! of that chain, so "lowest populated frequency" never needs a search.
//!
//! ```text
//!   members: FxHashMap<SlotId, Member { freq, prev, next }>
//!   buckets: FxHashMap<u64, Bucket { head, tail, prev, next }>
//!
//!   min_freq = 1
//!      │
//!      ▼
//!   freq=1: head ─► [id_7] ◄──► [id_2] ◄── tail      (id_2 entered first)
//!      │ next
//!      ▼
//!   freq=3: head ─► [id_4] ◄── tail
//! ```
//!
//! New members are pushed at the bucket head; victims are taken from the
//! bucket tail, which gives FIFO order among entries sharing a frequency.
//! A bucket is unlinked and dropped the moment its last member leaves.

use rustc_hash::FxHashMap;

use crate::ds::slot_arena::SlotId;
use crate::error::InvariantError;

#[derive(Debug, Clone, Copy)]
struct Member {
    freq: u64,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

#[derive(Debug, Default, Clone, Copy)]
struct Bucket {
    head: Option<SlotId>,
    tail: Option<SlotId>,
    prev: Option<u64>,
    next: Option<u64>,
}

/// Frequency → bucket-of-handles index with O(1) insert, touch, remove and
/// minimum lookup.
#[derive(Debug, Default)]
pub struct FrequencyIndex {
    members: FxHashMap<SlotId, Member>,
    buckets: FxHashMap<u64, Bucket>,
    min_freq: u64,
}

impl FrequencyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            members: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            buckets: FxHashMap::default(),
            min_freq: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: SlotId) -> bool {
        self.members.contains_key(&id)
    }

    /// Number of non-empty buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Current frequency of `id`.
    pub fn frequency(&self, id: SlotId) -> Option<u64> {
        self.members.get(&id).map(|member| member.freq)
    }

    /// Lowest populated frequency, `None` when empty.
    pub fn min_freq(&self) -> Option<u64> {
        (self.min_freq != 0).then_some(self.min_freq)
    }

    /// Files a new handle at frequency 1. Returns `false` if already tracked.
    pub fn insert(&mut self, id: SlotId) -> bool {
        if self.members.contains_key(&id) {
            return false;
        }
        self.members.insert(
            id,
            Member {
                freq: 1,
                prev: None,
                next: None,
            },
        );
        if !self.buckets.contains_key(&1) {
            let next = self.min_freq().filter(|&min| min > 1);
            self.insert_bucket(1, None, next);
        }
        self.push_front(1, id);
        self.min_freq = 1;
        true
    }

    /// Moves `id` to the next frequency bucket and returns the new frequency.
    ///
    /// At `u64::MAX` the count saturates and the handle is only refreshed
    /// within its bucket.
    pub fn touch(&mut self, id: SlotId) -> Option<u64> {
        let current = self.members.get(&id)?.freq;
        if current == u64::MAX {
            self.unlink(current, id)?;
            self.push_front(current, id);
            return Some(current);
        }
        let next_freq = current + 1;

        let (prev_bucket, next_bucket) = {
            let bucket = self.buckets.get(&current)?;
            (bucket.prev, bucket.next)
        };

        self.unlink(current, id)?;
        let emptied = self.bucket_is_empty(current);
        if emptied {
            self.remove_bucket(current, prev_bucket, next_bucket);
            if self.min_freq == current {
                self.min_freq = next_bucket.unwrap_or(0);
            }
        }

        if !self.buckets.contains_key(&next_freq) {
            let prev = if emptied { prev_bucket } else { Some(current) };
            self.insert_bucket(next_freq, prev, next_bucket);
        }

        if let Some(member) = self.members.get_mut(&id) {
            member.freq = next_freq;
        }
        self.push_front(next_freq, id);
        if self.min_freq == 0 || next_freq < self.min_freq {
            self.min_freq = next_freq;
        }
        Some(next_freq)
    }

    /// Stops tracking `id`; returns the frequency it had.
    pub fn remove(&mut self, id: SlotId) -> Option<u64> {
        let freq = self.members.get(&id)?.freq;
        self.unlink(freq, id)?;

        if self.bucket_is_empty(freq) {
            let (prev, next) = {
                let bucket = self.buckets.get(&freq)?;
                (bucket.prev, bucket.next)
            };
            self.remove_bucket(freq, prev, next);
            if self.min_freq == freq {
                self.min_freq = next.unwrap_or(0);
            }
        }

        self.members.remove(&id).map(|member| member.freq)
    }

    /// Eviction candidate: oldest handle in the lowest bucket.
    pub fn peek_min(&self) -> Option<(SlotId, u64)> {
        let freq = self.min_freq()?;
        let id = self.buckets.get(&freq)?.tail?;
        Some((id, freq))
    }

    /// Removes and returns the eviction candidate.
    #[cfg(test)]
    pub(crate) fn pop_min(&mut self) -> Option<(SlotId, u64)> {
        let (id, _) = self.peek_min()?;
        self.remove(id).map(|freq| (id, freq))
    }

    /// Handles at `freq` from newest to oldest.
    #[cfg(test)]
    pub(crate) fn iter_bucket(&self, freq: u64) -> BucketIter<'_> {
        BucketIter {
            index: self,
            current: self.buckets.get(&freq).and_then(|bucket| bucket.head),
        }
    }

    /// Populated frequencies in ascending order, following the bucket chain.
    #[cfg(test)]
    pub(crate) fn frequencies(&self) -> Vec<u64> {
        let mut out = Vec::with_capacity(self.buckets.len());
        let mut current = self.min_freq();
        while let Some(freq) = current {
            out.push(freq);
            current = self.buckets.get(&freq).and_then(|bucket| bucket.next);
        }
        out
    }

    pub fn clear(&mut self) {
        self.members.clear();
        self.buckets.clear();
        self.min_freq = 0;
    }

    /// Verifies chain order, bucket membership and the absence of empty buckets.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.members.is_empty() {
            if !self.buckets.is_empty() || self.min_freq != 0 {
                return Err(InvariantError::new(
                    "frequency index: empty index still has buckets",
                ));
            }
            return Ok(());
        }
        if !self.buckets.contains_key(&self.min_freq) {
            return Err(InvariantError::new(format!(
                "frequency index: min_freq {} has no bucket",
                self.min_freq
            )));
        }

        let mut seen = 0usize;
        let mut previous_freq: Option<u64> = None;
        let mut current = Some(self.min_freq);
        while let Some(freq) = current {
            let bucket = self.buckets.get(&freq).ok_or_else(|| {
                InvariantError::new(format!("frequency index: dangling bucket link {}", freq))
            })?;
            if bucket.prev != previous_freq {
                return Err(InvariantError::new(format!(
                    "frequency index: bucket {} has prev {:?}, expected {:?}",
                    freq, bucket.prev, previous_freq
                )));
            }
            if previous_freq.is_some_and(|p| p >= freq) {
                return Err(InvariantError::new("frequency index: buckets out of order"));
            }
            if bucket.head.is_none() {
                return Err(InvariantError::new(format!(
                    "frequency index: bucket {} is empty",
                    freq
                )));
            }

            let mut last = None;
            let mut node = bucket.head;
            while let Some(id) = node {
                let member = self.members.get(&id).ok_or_else(|| {
                    InvariantError::new(format!("frequency index: unknown member {:?}", id))
                })?;
                if member.freq != freq {
                    return Err(InvariantError::new(format!(
                        "frequency index: member {:?} has freq {} but sits in bucket {}",
                        id, member.freq, freq
                    )));
                }
                if member.prev != last {
                    return Err(InvariantError::new(format!(
                        "frequency index: member {:?} prev link broken",
                        id
                    )));
                }
                seen += 1;
                if seen > self.members.len() {
                    return Err(InvariantError::new("frequency index: cycle detected"));
                }
                last = Some(id);
                node = member.next;
            }
            if bucket.tail != last {
                return Err(InvariantError::new(format!(
                    "frequency index: bucket {} tail mismatch",
                    freq
                )));
            }
            previous_freq = Some(freq);
            current = bucket.next;
        }

        if seen != self.members.len() {
            return Err(InvariantError::new(format!(
                "frequency index: {} members reachable, {} tracked",
                seen,
                self.members.len()
            )));
        }
        Ok(())
    }

    fn bucket_is_empty(&self, freq: u64) -> bool {
        self.buckets
            .get(&freq)
            .map(|bucket| bucket.head.is_none())
            .unwrap_or(true)
    }

    fn insert_bucket(&mut self, freq: u64, prev: Option<u64>, next: Option<u64>) {
        self.buckets.insert(
            freq,
            Bucket {
                head: None,
                tail: None,
                prev,
                next,
            },
        );
        if let Some(prev) = prev {
            if let Some(bucket) = self.buckets.get_mut(&prev) {
                bucket.next = Some(freq);
            }
        }
        if let Some(next) = next {
            if let Some(bucket) = self.buckets.get_mut(&next) {
                bucket.prev = Some(freq);
            }
        }
    }

    fn remove_bucket(&mut self, freq: u64, prev: Option<u64>, next: Option<u64>) {
        if let Some(prev) = prev {
            if let Some(bucket) = self.buckets.get_mut(&prev) {
                bucket.next = next;
            }
        }
        if let Some(next) = next {
            if let Some(bucket) = self.buckets.get_mut(&next) {
                bucket.prev = prev;
            }
        }
        self.buckets.remove(&freq);
    }

    fn push_front(&mut self, freq: u64, id: SlotId) {
        let Some(bucket) = self.buckets.get_mut(&freq) else {
            return;
        };
        let old_head = bucket.head;
        if old_head.is_none() {
            bucket.tail = Some(id);
        }
        bucket.head = Some(id);

        if let Some(member) = self.members.get_mut(&id) {
            member.prev = None;
            member.next = old_head;
        }
        if let Some(old_head) = old_head {
            if let Some(member) = self.members.get_mut(&old_head) {
                member.prev = Some(id);
            }
        }
    }

    fn unlink(&mut self, freq: u64, id: SlotId) -> Option<()> {
        let (prev, next) = {
            let member = self.members.get(&id)?;
            (member.prev, member.next)
        };

        if let Some(prev) = prev {
            if let Some(member) = self.members.get_mut(&prev) {
                member.next = next;
            }
        } else {
            self.buckets.get_mut(&freq)?.head = next;
        }
        if let Some(next) = next {
            if let Some(member) = self.members.get_mut(&next) {
                member.prev = prev;
            }
        } else {
            self.buckets.get_mut(&freq)?.tail = prev;
        }

        if let Some(member) = self.members.get_mut(&id) {
            member.prev = None;
            member.next = None;
        }
        Some(())
    }
}

/// Iterator over the handles in one bucket, newest first.
#[cfg(test)]
pub(crate) struct BucketIter<'a> {
    index: &'a FrequencyIndex,
    current: Option<SlotId>,
}

#[cfg(test)]
impl Iterator for BucketIter<'_> {
    type Item = SlotId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.index.members.get(&id)?.next;
        Some(id)
    }
}
