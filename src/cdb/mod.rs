/// the clause arena
pub mod arena;
/// methods on `ClauseId`
mod cid;
/// methods on `ClauseDB`
mod db;
/// methods on `Watch` and `WatchDB`
mod watch;

pub use self::{
    arena::{ClauseArena, Relocation},
    watch::{Watch, WatchDBIF},
};

use crate::{assign::AssignIF, types::*};

/// API for clause management like [`input_clause`](`crate::cdb::ClauseDBIF::input_clause`),
/// [`install`](`crate::cdb::ClauseDBIF::install`), [`freeze`](`crate::cdb::ClauseDBIF::freeze`),
/// and so on.
pub trait ClauseDBIF: ActivityIF<ClauseId> + Instantiate {
    /// extend the per-literal lists for a new var.
    fn new_var(&mut self);
    /// allocate a clause. It isn't installed yet.
    fn new_clause(&mut self, lits: &[Lit]) -> ClauseId;
    /// allocate, set essential, and install an input clause.
    fn input_clause(&mut self, lits: &[Lit]) -> ClauseId;
    /// register a clause to watch lists, or to the unit or empty list.
    fn install(&mut self, cid: ClauseId);
    /// undo `install`. The clause must not be an antecedent.
    fn uninstall<A>(&mut self, asg: &A, cid: ClauseId)
    where
        A: AssignIF;
    /// make an uninstalled clause dead.
    fn delete_clause(&mut self, cid: ClauseId);
    /// protect a clause from reduction.
    fn set_essential(&mut self, cid: ClauseId);
    fn unset_essential(&mut self, cid: ClauseId);
    /// set the preprocessor mark.
    fn mark(&mut self, cid: ClauseId);
    fn unmark(&mut self, cid: ClauseId);
    /// uninstall a clause but keep it for `unfreeze`.
    fn freeze<A>(&mut self, asg: &A, cid: ClauseId)
    where
        A: AssignIF;
    /// flag a clause that was never installed as frozen.
    fn quick_freeze(&mut self, cid: ClauseId);
    /// reinstall a frozen clause.
    fn unfreeze(&mut self, cid: ClauseId);
    /// return the number of literals agreeing with their saved phase.
    fn psm<A>(&self, asg: &A, cid: ClauseId) -> usize
    where
        A: AssignIF;
    /// return `true` if the clause is the antecedent of its first literal.
    fn is_antecedent<A>(&self, asg: &A, cid: ClauseId) -> bool
    where
        A: AssignIF;
    /// return `true` if the clause contains `lit`.
    fn contains(&self, cid: ClauseId, lit: Lit) -> bool;
    /// build occurrence lists of all present clauses and keep them updated.
    fn construct_occur(&mut self);
    /// drop occurrence lists.
    fn destruct_occur(&mut self);
    /// return the present clauses containing `lit`. Requires `construct_occur`.
    fn occur(&self, lit: Lit) -> &[ClauseId];
    /// remove every clause containing `lit`, essential or not.
    /// No var may be assigned.
    fn expell_containing<A>(&mut self, asg: &A, lit: Lit)
    where
        A: AssignIF;
    /// return `true` if garbage collection pays off now.
    fn check_garbage(&self) -> bool;
    /// return the literals of installed unit clauses.
    fn units(&self) -> &[Lit];
    /// return `true` if an empty clause is installed.
    fn has_empty(&self) -> bool;
}

/// Clause identifier: the word offset of a record in the arena.
/// Note: ids are changed by 'garbage collection'.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ClauseId {
    /// a sequence number.
    ordinal: u32,
}

/// Clause database
///
///```
/// use uipsat::{cdb::ClauseDB, config::Config, types::*};
/// let cdb = ClauseDB::instantiate(&Config::default(), &CNFDescription::default());
/// assert_eq!(cdb.num_active, 0);
///```
#[derive(Clone, Debug)]
pub struct ClauseDB {
    /// container of clauses
    pub arena: ClauseArena,
    /// container of watch literals, indexed by the falsified literal
    pub watcher: Vec<Vec<Watch>>,
    /// occurrence lists, valid only while `maintain_occur`
    occur: Vec<Vec<ClauseId>>,
    maintain_occur: bool,
    /// installed unit clauses
    pub(crate) units: Vec<Lit>,
    /// installed empty clauses
    pub(crate) empties: Vec<ClauseId>,

    //
    //## clause activity
    //
    pub(crate) activity_inc: f64,
    activity_factor: f64,

    //
    //## statistics
    //
    /// the number of installed clauses.
    pub num_active: usize,
    /// the number of essential clauses.
    pub num_essential: usize,
    /// the number of garbage collections.
    pub num_collect: usize,
    /// the number of deleted clauses.
    pub num_deleted: usize,
}
