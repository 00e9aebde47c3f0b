use bitflags::bitflags;

/// API for object properties.
pub trait FlagIF {
    type FlagType;
    /// return true if the flag in on.
    fn is(&self, flag: Self::FlagType) -> bool;
    /// set the flag.
    fn set(&mut self, f: Self::FlagType, b: bool);
    // toggle the flag.
    fn toggle(&mut self, flag: Self::FlagType);
    /// toggle the flag off.
    fn turn_off(&mut self, flag: Self::FlagType);
    /// toggle the flag on.
    fn turn_on(&mut self, flag: Self::FlagType);
}

bitflags! {
    /// Flags stored in the header of a clause record.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
    pub struct FlagClause: u32 {
        /// a clause is registered in watch lists (or the unit/empty lists).
        const INSTALLED    = 0b0000_0001;
        /// a clause belongs to the input and is never reduced.
        const ESSENTIAL    = 0b0000_0010;
        /// a clause is uninstalled by reduction but kept for reinstatement.
        const FROZEN       = 0b0000_0100;
        /// a clause is marked by a preprocessor.
        const MARKED       = 0b0000_1000;
        /// a clause is dead and will be dropped at the next collection.
        const DELETED      = 0b0001_0000;
        /// LBD of a clause got smaller during propagation.
        const IMPROVED     = 0b0010_0000;
        /// a clause was copied away by garbage collection.
        const MOVED        = 0b0100_0000;
    }
}

bitflags! {
    /// Misc flags used by vars.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
    pub struct FlagVar: u8 {
        /// * the previous assigned value of a Var.
        const PHASE        = 0b0000_0001;
        /// a var is removed by a preprocessor.
        const DELETED      = 0b0000_0010;
        /// the value in the built model.
        const MODEL        = 0b0000_0100;
    }
}

bitflags! {
    /// Per-var scratch flags of conflict analysis; cleared after each conflict.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
    pub struct FlagLearn: u8 {
        /// a var has any flag on, so it must be cleared later.
        const TOUCHED      = 0b0000_0001;
        /// a var was visited by the cut.
        const MARKED       = 0b0000_0010;
        /// the minimization check of a var is memoized.
        const MIN_CHECKED  = 0b0001_0000;
        /// memoized result: the var is implied by the cut.
        const MIN_IMPLIED  = 0b0010_0000;
        /// a var belongs to the first-UIP cut.
        const IN_CUT       = 0b0100_0000;
        /// a var belongs to the minimized clause.
        const IN_MIN       = 0b1000_0000;
    }
}

macro_rules! impl_flag_if {
    ($flag: ty) => {
        impl FlagIF for $flag {
            type FlagType = $flag;
            #[inline]
            fn is(&self, flag: Self::FlagType) -> bool {
                self.contains(flag)
            }
            #[inline]
            fn set(&mut self, f: Self::FlagType, b: bool) {
                <$flag>::set(self, f, b);
            }
            #[inline]
            fn toggle(&mut self, flag: Self::FlagType) {
                <$flag>::toggle(self, flag);
            }
            #[inline]
            fn turn_off(&mut self, flag: Self::FlagType) {
                self.remove(flag);
            }
            #[inline]
            fn turn_on(&mut self, flag: Self::FlagType) {
                self.insert(flag);
            }
        }
    };
}

impl_flag_if!(FlagClause);
impl_flag_if!(FlagVar);
impl_flag_if!(FlagLearn);
