use {super::ClauseId, crate::types::*};

/// API for 'watcher list' like `register`, `detach_with` and so on.
pub trait WatchDBIF {
    /// make a new binary 'watch', and add it to this watcher list.
    fn register_binary(&mut self, implied: Lit, cid: ClauseId);
    /// make a new 'watch' of a long clause, and add it to this watcher list.
    fn register_long(&mut self, blocker: Lit, cid: ClauseId);
    /// remove a clause which id is `cid` from the watcher list. *O(n)* operation.
    fn detach_with(&mut self, cid: ClauseId);
}

/// An entry of the watch list of a literal `L`; it is examined when `L` becomes false.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Watch {
    /// a binary clause `L ∨ implied`.
    Binary { implied: Lit, cid: ClauseId },
    /// a longer clause watching `L`, with a cached literal of it.
    Long { cid: ClauseId, blocker: Lit },
}

impl Watch {
    #[inline]
    pub fn cid(&self) -> ClauseId {
        match self {
            Watch::Binary { cid, .. } | Watch::Long { cid, .. } => *cid,
        }
    }
    /// point to the clause at its new handle after a collection.
    #[inline]
    pub fn set_cid(&mut self, to: ClauseId) {
        match self {
            Watch::Binary { cid, .. } | Watch::Long { cid, .. } => *cid = to,
        }
    }
}

impl WatchDBIF for Vec<Watch> {
    fn register_binary(&mut self, implied: Lit, cid: ClauseId) {
        self.push(Watch::Binary { implied, cid });
    }
    fn register_long(&mut self, blocker: Lit, cid: ClauseId) {
        self.push(Watch::Long { cid, blocker });
    }
    fn detach_with(&mut self, cid: ClauseId) {
        if let Some(n) = self.iter().position(|w| w.cid() == cid) {
            self.swap_remove(n);
            return;
        }
        panic!("{cid} isn't in the watcher list");
    }
}
