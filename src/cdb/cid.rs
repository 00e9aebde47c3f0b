use {super::ClauseId, std::fmt};

impl From<usize> for ClauseId {
    #[inline]
    fn from(u: usize) -> ClauseId {
        debug_assert!(u <= u32::MAX as usize, "clause space overflow");
        ClauseId { ordinal: u as u32 }
    }
}

impl From<ClauseId> for usize {
    #[inline]
    fn from(cid: ClauseId) -> usize {
        cid.ordinal as usize
    }
}

impl From<ClauseId> for u32 {
    #[inline]
    fn from(cid: ClauseId) -> u32 {
        cid.ordinal
    }
}

impl fmt::Debug for ClauseId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}C", self.ordinal)
    }
}

impl fmt::Display for ClauseId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}C", self.ordinal)
    }
}
