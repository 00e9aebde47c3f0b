use {
    super::VarId,
    std::{fmt, ops::Not},
};

/// Literal encoded on an unsigned integer: `2 * var + polarity`.
///
/// # Examples
///
/// ```
/// use uipsat::types::*;
/// assert_eq!(Lit::from(1i32), Lit::from((0, true)));
/// assert_eq!(Lit::from(-1i32), Lit::from((0, false)));
/// assert_eq!(!Lit::from(1i32), Lit::from(-1i32));
/// assert_eq!(i32::from(Lit::from(-3i32)), -3);
/// assert_eq!(usize::from(Lit::from(2i32)), 3);
/// ```
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Lit {
    ordinal: u32,
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}L", i32::from(self))
    }
}

impl fmt::Debug for Lit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}L", i32::from(self))
    }
}

/// convert literals to `[i32]` (for debug).
pub fn i32s(v: &[Lit]) -> Vec<i32> {
    v.iter().map(|l| i32::from(*l)).collect::<Vec<_>>()
}

impl From<(VarId, bool)> for Lit {
    #[inline]
    fn from((vi, b): (VarId, bool)) -> Self {
        Lit {
            ordinal: ((vi as u32) << 1) | (b as u32),
        }
    }
}

impl From<i32> for Lit {
    /// DIMACS integer to literal. Zero is not a literal; use
    /// [`Lit::try_from_dimacs`] where the input isn't trusted.
    #[inline]
    fn from(x: i32) -> Self {
        debug_assert!(x != 0, "zero is not a literal");
        Lit {
            ordinal: ((x.unsigned_abs() - 1) << 1) | ((0 < x) as u32),
        }
    }
}

impl From<Lit> for bool {
    /// - positive Lit (= odd u32) => true
    /// - negative Lit (= even u32) => false
    #[inline]
    fn from(l: Lit) -> bool {
        (l.ordinal & 1) != 0
    }
}

impl From<Lit> for usize {
    #[inline]
    fn from(l: Lit) -> usize {
        l.ordinal as usize
    }
}

impl From<&Lit> for usize {
    #[inline]
    fn from(l: &Lit) -> usize {
        l.ordinal as usize
    }
}

impl From<Lit> for u32 {
    #[inline]
    fn from(l: Lit) -> u32 {
        l.ordinal
    }
}

impl From<Lit> for i32 {
    #[inline]
    fn from(l: Lit) -> i32 {
        i32::from(&l)
    }
}

impl From<&Lit> for i32 {
    #[inline]
    fn from(l: &Lit) -> i32 {
        let v = (l.ordinal >> 1) as i32 + 1;
        if (l.ordinal & 1) != 0 {
            v
        } else {
            -v
        }
    }
}

impl Not for Lit {
    type Output = Lit;
    #[inline]
    fn not(self) -> Self {
        Lit {
            ordinal: self.ordinal ^ 1,
        }
    }
}

impl Lit {
    /// rebuild a literal from its index; the inverse of `usize::from`.
    #[inline]
    pub fn from_index(ordinal: usize) -> Lit {
        Lit {
            ordinal: ordinal as u32,
        }
    }
    /// return the literal of `x` if it is a legal DIMACS literal over `num_vars` vars.
    pub fn try_from_dimacs(x: i32, num_vars: usize) -> Option<Lit> {
        if x == 0 || num_vars < x.unsigned_abs() as usize {
            None
        } else {
            Some(Lit::from(x))
        }
    }
    /// the var of this literal.
    #[inline]
    pub fn vi(self) -> VarId {
        (self.ordinal >> 1) as VarId
    }
    /// the bit used in a clause signature.
    #[inline]
    pub fn signature(self) -> u64 {
        1u64 << (self.ordinal % 64)
    }
}
