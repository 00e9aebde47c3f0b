//! A bump allocator holding clause records in a single word vector.
//!
//! A record is laid out as
//! `[flags, len, lit_0, .., lit_{len-1}, (pad), act_lo, act_hi, sig_lo, sig_hi, lbd, forward]`.
//! The literal array is padded to an even number of words so that the tail
//! stays 8-byte aligned relative to the record start.
use {
    super::ClauseId,
    crate::types::*,
    tracing::debug,
};

const HEAD_WORDS: usize = 2;
const TAIL_WORDS: usize = 6;
const WORD_BYTES: usize = std::mem::size_of::<u32>();
/// per-clause allowance used by the live space estimate, in bytes.
pub const CLAUSE_ALIGNMENT: usize = 8;

const TAIL_ACTIVITY: usize = 0;
const TAIL_SIGNATURE: usize = 2;
const TAIL_LBD: usize = 4;
const TAIL_FORWARD: usize = 5;

/// An event reported to the hook of [`ClauseArena::garbage_collect`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Relocation {
    /// a live clause was copied to a new handle.
    Moved { from: ClauseId, to: ClauseId },
    /// a deleted clause was dropped.
    Dropped(ClauseId),
}

/// Clause storage. Handles are word offsets, so they stay valid across
/// reallocation and become stale after garbage collection.
#[derive(Clone, Debug)]
pub struct ClauseArena {
    words: Vec<u32>,
    /// the number of words available before the next reallocation
    capacity: usize,
    /// all allocated records in allocation order, including deleted ones
    index: Vec<ClauseId>,
    num_present: usize,
    num_deleted: usize,
    present_words: usize,
    /// extra words added to the estimate at each collection
    slack: usize,
    /// the number of reallocations
    pub num_realloc: usize,
}

impl Default for ClauseArena {
    fn default() -> Self {
        ClauseArena::new(4 * 1024 * 1024, 4 * 1024 * 1024)
    }
}

#[inline]
fn padded(len: usize) -> usize {
    (len + 1) & !1
}

#[inline]
fn record_words(len: usize) -> usize {
    HEAD_WORDS + padded(len) + TAIL_WORDS
}

impl ClauseArena {
    /// make an arena of `bytes` bytes which adds `slack_bytes` at each collection.
    pub fn new(bytes: usize, slack_bytes: usize) -> Self {
        let capacity = bytes / WORD_BYTES;
        ClauseArena {
            words: Vec::with_capacity(capacity),
            capacity,
            index: Vec::new(),
            num_present: 0,
            num_deleted: 0,
            present_words: 0,
            slack: slack_bytes / WORD_BYTES,
            num_realloc: 0,
        }
    }
    /// the byte size of a record holding `len` literals.
    pub fn record_bytes(len: usize) -> usize {
        record_words(len) * WORD_BYTES
    }
    /// store `lits` as a new record and return its handle; tail metadata is zero.
    pub fn allocate(&mut self, lits: &[Lit]) -> ClauseId {
        let need = record_words(lits.len());
        self.reserve(need);
        let cid = ClauseId::from(self.words.len());
        self.words.push(0);
        self.words.push(lits.len() as u32);
        self.words.extend(lits.iter().map(|l| u32::from(*l)));
        if lits.len() % 2 == 1 {
            self.words.push(0);
        }
        self.words.extend([0; TAIL_WORDS]);
        self.index.push(cid);
        self.num_present += 1;
        self.present_words += need;
        cid
    }
    /// grow the storage if `need` words don't fit. Existing handles stay valid.
    fn reserve(&mut self, need: usize) {
        let used = self.words.len();
        if need < self.capacity - used {
            return;
        }
        let target = used + used / 2 + need;
        debug!(
            kib = target * WORD_BYTES / 1024,
            "extending clause space"
        );
        self.words.reserve_exact(target - used);
        self.capacity = target;
        self.num_realloc += 1;
    }

    //
    //## record accessors
    //
    #[inline]
    fn base(cid: ClauseId) -> usize {
        usize::from(cid)
    }
    #[inline]
    fn tail(&self, cid: ClauseId) -> usize {
        let base = Self::base(cid);
        base + HEAD_WORDS + padded(self.words[base + 1] as usize)
    }
    /// return the number of literals.
    #[inline]
    pub fn len(&self, cid: ClauseId) -> usize {
        self.words[Self::base(cid) + 1] as usize
    }
    /// return the `i`-th literal.
    #[inline]
    pub fn lit(&self, cid: ClauseId, i: usize) -> Lit {
        debug_assert!(i < self.len(cid));
        Lit::from_index(self.words[Self::base(cid) + HEAD_WORDS + i] as usize)
    }
    /// overwrite the `i`-th literal.
    #[inline]
    pub fn set_lit(&mut self, cid: ClauseId, i: usize, lit: Lit) {
        debug_assert!(i < self.len(cid));
        #[cfg(feature = "boundary_check")]
        assert!(
            !self.is(cid, FlagClause::DELETED),
            "{cid} is modified after deletion"
        );
        self.words[Self::base(cid) + HEAD_WORDS + i] = u32::from(lit);
    }
    /// exchange two literals.
    #[inline]
    pub fn swap_lits(&mut self, cid: ClauseId, i: usize, j: usize) {
        let base = Self::base(cid) + HEAD_WORDS;
        self.words.swap(base + i, base + j);
    }
    /// return an iterator over the literals.
    pub fn lits(&self, cid: ClauseId) -> impl Iterator<Item = Lit> + '_ {
        let base = Self::base(cid) + HEAD_WORDS;
        self.words[base..base + self.len(cid)]
            .iter()
            .map(|w| Lit::from_index(*w as usize))
    }
    /// return a copy of the literals.
    pub fn to_vec(&self, cid: ClauseId) -> Vec<Lit> {
        self.lits(cid).collect::<Vec<_>>()
    }
    #[inline]
    pub fn flags(&self, cid: ClauseId) -> FlagClause {
        FlagClause::from_bits_retain(self.words[Self::base(cid)])
    }
    #[inline]
    pub fn is(&self, cid: ClauseId, flag: FlagClause) -> bool {
        self.flags(cid).contains(flag)
    }
    #[inline]
    pub fn turn_on(&mut self, cid: ClauseId, flag: FlagClause) {
        self.words[Self::base(cid)] |= flag.bits();
    }
    #[inline]
    pub fn turn_off(&mut self, cid: ClauseId, flag: FlagClause) {
        self.words[Self::base(cid)] &= !flag.bits();
    }
    pub fn activity(&self, cid: ClauseId) -> f64 {
        let t = self.tail(cid) + TAIL_ACTIVITY;
        f64::from_bits(self.words[t] as u64 | (self.words[t + 1] as u64) << 32)
    }
    pub fn set_activity(&mut self, cid: ClauseId, val: f64) {
        let t = self.tail(cid) + TAIL_ACTIVITY;
        let bits = val.to_bits();
        self.words[t] = bits as u32;
        self.words[t + 1] = (bits >> 32) as u32;
    }
    /// a Bloom filter over literal indices.
    pub fn signature(&self, cid: ClauseId) -> u64 {
        let t = self.tail(cid) + TAIL_SIGNATURE;
        self.words[t] as u64 | (self.words[t + 1] as u64) << 32
    }
    pub fn set_signature(&mut self, cid: ClauseId, sig: u64) {
        let t = self.tail(cid) + TAIL_SIGNATURE;
        self.words[t] = sig as u32;
        self.words[t + 1] = (sig >> 32) as u32;
    }
    pub fn lbd(&self, cid: ClauseId) -> u32 {
        self.words[self.tail(cid) + TAIL_LBD]
    }
    pub fn set_lbd(&mut self, cid: ClauseId, lbd: u32) {
        let t = self.tail(cid) + TAIL_LBD;
        self.words[t] = lbd;
    }
    /// the new handle of a clause moved by a collection; valid on the arena
    /// returned by [`ClauseArena::garbage_collect`].
    pub fn forward(&self, cid: ClauseId) -> Option<ClauseId> {
        self.is(cid, FlagClause::MOVED)
            .then(|| ClauseId::from(self.words[self.tail(cid) + TAIL_FORWARD] as usize))
    }

    //
    //## life cycle
    //
    /// mark a clause dead. The space is reclaimed by the next collection.
    pub fn delete(&mut self, cid: ClauseId) {
        assert!(
            !self.is(cid, FlagClause::DELETED),
            "{cid} is deleted twice"
        );
        self.turn_on(cid, FlagClause::DELETED);
        self.num_present -= 1;
        self.num_deleted += 1;
        self.present_words -= record_words(self.len(cid));
    }
    #[inline]
    pub fn is_present(&self, cid: ClauseId) -> bool {
        !self.is(cid, FlagClause::DELETED)
    }
    /// return an iterator over present clauses in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = ClauseId> + '_ {
        self.index.iter().copied().filter(|c| self.is_present(*c))
    }
    /// the number of live clauses.
    pub fn num_present(&self) -> usize {
        self.num_present
    }
    /// the number of clauses deleted since the last collection.
    pub fn num_deleted(&self) -> usize {
        self.num_deleted
    }
    /// the number of records, dead or alive.
    pub fn num_clauses(&self) -> usize {
        self.index.len()
    }
    pub fn used_bytes(&self) -> usize {
        self.words.len() * WORD_BYTES
    }
    pub fn present_bytes(&self) -> usize {
        self.present_words * WORD_BYTES
    }
    pub fn capacity_bytes(&self) -> usize {
        self.capacity * WORD_BYTES
    }
    /// return `true` if a collection pays off now.
    pub fn needs_collection(&self) -> bool {
        if (self.num_present as f64) * 0.5 < self.num_deleted as f64 {
            return true;
        }
        let estimate = self.present_bytes() + CLAUSE_ALIGNMENT * self.num_clauses();
        2 * estimate < self.used_bytes()
    }
    /// copy every live clause into a fresh arena in allocation order.
    /// `hook` is called with the old arena once per clause. The old arena is
    /// returned so that stale handles can be mapped through [`forward`](`ClauseArena::forward`).
    pub fn garbage_collect<F>(&mut self, mut hook: F) -> ClauseArena
    where
        F: FnMut(&ClauseArena, Relocation),
    {
        let estimate =
            self.present_words + CLAUSE_ALIGNMENT / WORD_BYTES * self.num_present;
        let size = estimate + estimate / 2 + self.slack;
        let mut fresh = ClauseArena {
            words: Vec::with_capacity(size),
            capacity: size,
            index: Vec::with_capacity(self.num_present),
            num_present: 0,
            num_deleted: 0,
            present_words: 0,
            slack: self.slack,
            num_realloc: self.num_realloc,
        };
        let before = self.used_bytes();
        for from in std::mem::take(&mut self.index) {
            if self.is(from, FlagClause::DELETED) {
                hook(self, Relocation::Dropped(from));
                continue;
            }
            let base = Self::base(from);
            let end = base + record_words(self.len(from));
            let to = ClauseId::from(fresh.words.len());
            fresh.words.extend_from_slice(&self.words[base..end]);
            fresh.index.push(to);
            fresh.num_present += 1;
            fresh.present_words += end - base;
            let tail = self.tail(from);
            self.words[tail + TAIL_FORWARD] = u32::from(to);
            self.turn_on(from, FlagClause::MOVED);
            hook(self, Relocation::Moved { from, to });
        }
        debug_assert!(fresh.words.len() <= estimate);
        debug!(
            before_kib = before / 1024,
            after_kib = fresh.used_bytes() / 1024,
            clauses = fresh.num_present,
            "collected clause space"
        );
        std::mem::replace(self, fresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lits(v: &[i32]) -> Vec<Lit> {
        v.iter().map(|i| Lit::from(*i)).collect()
    }

    #[test]
    fn test_record_layout() {
        let mut arena = ClauseArena::new(1024, 1024);
        let c1 = arena.allocate(&lits(&[1, -2, 3]));
        let c2 = arena.allocate(&lits(&[4, 5]));
        assert_eq!(usize::from(c2) - usize::from(c1), ClauseArena::record_bytes(3) / 4);
        assert_eq!(arena.to_vec(c1), lits(&[1, -2, 3]));
        assert_eq!(arena.activity(c1), 0.0);
        assert_eq!(arena.signature(c1), 0);
        assert_eq!(arena.lbd(c1), 0);
        arena.set_activity(c1, 2.5e60);
        arena.set_signature(c1, u64::MAX - 7);
        arena.set_lbd(c1, 3);
        assert_eq!(arena.activity(c1), 2.5e60);
        assert_eq!(arena.signature(c1), u64::MAX - 7);
        assert_eq!(arena.lbd(c1), 3);
        assert_eq!(arena.to_vec(c2), lits(&[4, 5]));
        arena.swap_lits(c1, 0, 2);
        assert_eq!(arena.lit(c1, 0), Lit::from(3i32));
    }

    #[test]
    fn test_realloc_keeps_handles() {
        let mut arena = ClauseArena::new(64, 64);
        let cids = (1..40)
            .map(|i| arena.allocate(&lits(&[i, -(i + 1), i + 2])))
            .collect::<Vec<_>>();
        assert!(0 < arena.num_realloc);
        assert!(arena.used_bytes() <= arena.capacity_bytes());
        for (i, cid) in cids.iter().enumerate() {
            let i = i as i32 + 1;
            assert_eq!(arena.to_vec(*cid), lits(&[i, -(i + 1), i + 2]));
        }
    }

    #[test]
    fn test_garbage_collect() {
        let mut arena = ClauseArena::new(1024, 256);
        let c1 = arena.allocate(&lits(&[1, 2]));
        let c2 = arena.allocate(&lits(&[-1, 2, 3]));
        let c3 = arena.allocate(&lits(&[-3]));
        arena.set_activity(c3, 7.0);
        assert!(!arena.needs_collection());
        arena.delete(c2);
        assert_eq!(arena.num_present(), 2);
        let mut events = Vec::new();
        let old = arena.garbage_collect(|old, ev| {
            if let Relocation::Moved { from, to } = ev {
                assert_eq!(old.forward(from), Some(to));
            }
            events.push(ev);
        });
        assert_eq!(old.forward(c1), Some(c1));
        assert_eq!(old.forward(c2), None);
        assert_eq!(events.len(), 3);
        assert_eq!(events[1], Relocation::Dropped(c2));
        let Relocation::Moved { to: n3, .. } = events[2] else {
            panic!("c3 should move");
        };
        assert_eq!(events[0], Relocation::Moved { from: c1, to: c1 });
        assert_eq!(arena.to_vec(n3), lits(&[-3]));
        assert_eq!(arena.activity(n3), 7.0);
        assert_eq!(arena.num_deleted(), 0);
        assert_eq!(arena.iter().count(), 2);
        assert!(!arena.is(n3, FlagClause::MOVED));
    }

    #[test]
    fn test_collection_trigger() {
        let mut arena = ClauseArena::new(1024, 256);
        let cids = (1..=3)
            .map(|i| arena.allocate(&lits(&[i, i + 1, i + 2])))
            .collect::<Vec<_>>();
        arena.delete(cids[0]);
        assert!(!arena.needs_collection());
        arena.delete(cids[1]);
        assert!(arena.needs_collection());
        arena.garbage_collect(|_, _| ());
        assert!(!arena.needs_collection());
        assert_eq!(arena.present_bytes(), arena.used_bytes());
    }
}
