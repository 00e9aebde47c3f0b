/// implement boolean constraint propagation, backjump
use {
    super::{AssignIF, AssignReason, AssignStack, Conflict, VarHeapIF},
    crate::{
        cdb::{ClauseDB, Watch, WatchDBIF},
        types::*,
    },
};

/// API for Boolean Constraint Propagation like
/// [`propagate`](`crate::assign::PropagateIF::propagate`),
/// [`push_assign`](`crate::assign::PropagateIF::push_assign`),
/// [`backjump`](`crate::assign::PropagateIF::backjump`), and so on.
pub trait PropagateIF {
    /// open a new decision level. No assignment may be pending.
    fn push_level(&mut self);
    /// assign a literal at the current level.
    ///
    /// ## Caveat
    /// Callers have to assure the var is unassigned.
    fn push_assign(&mut self, l: Lit, reason: AssignReason);
    /// undo the last assignment.
    fn pop_assign(&mut self);
    /// undo the current level.
    fn pop_level(&mut self);
    /// execute *backjump*: pop levels until level `lv`.
    fn backjump(&mut self, lv: DecisionLevel);
    /// execute *boolean constraint propagation* or *unit propagation*.
    fn propagate(&mut self, cdb: &mut ClauseDB) -> Result<(), Conflict>;
}

impl PropagateIF for AssignStack {
    fn push_level(&mut self) {
        assert!(!self.remains(), "opening a level with pending assignments");
        self.trail_lim.push(self.trail.len());
    }
    fn push_assign(&mut self, l: Lit, reason: AssignReason) {
        let vi = l.vi();
        assert!(self.assign[vi].is_none(), "{l} is assigned twice");
        debug_assert!(!self.var_is_deleted(vi), "assigning a deleted var");
        self.assign[vi] = Some(bool::from(l));
        self.level[vi] = self.decision_level();
        self.reason[vi] = reason;
        self.var_flags[vi].set(FlagVar::PHASE, bool::from(l));
        self.num_assigned += 1;
        self.trail.push(l);
    }
    fn pop_assign(&mut self) {
        let Some(l) = self.trail.pop() else {
            panic!("pop from the empty trail");
        };
        let vi = l.vi();
        self.assign[vi] = None;
        self.reason[vi] = AssignReason::None;
        self.num_assigned -= 1;
        if !self.var_order.contains(vi) {
            self.insert_heap(vi);
        }
    }
    fn pop_level(&mut self) {
        let Some(start) = self.trail_lim.last().copied() else {
            panic!("pop from level 0");
        };
        self.q_head = self.q_head.min(start);
        while start < self.trail.len() {
            self.pop_assign();
        }
        self.trail_lim.pop();
    }
    fn backjump(&mut self, lv: DecisionLevel) {
        while lv < self.decision_level() {
            self.pop_level();
        }
    }
    fn propagate(&mut self, cdb: &mut ClauseDB) -> Result<(), Conflict> {
        while let Some(p) = self.trail.get(self.q_head).copied() {
            self.q_head += 1;
            self.num_propagation += 1;
            let false_lit = !p;
            let mut watches = std::mem::take(&mut cdb.watcher[usize::from(false_lit)]);
            let n = watches.len();
            let mut rp = 0;
            let mut wp = 0;
            let mut conflict = None;
            while rp < n {
                let w = watches[rp];
                rp += 1;
                match w {
                    Watch::Binary { implied, .. } => {
                        watches[wp] = w;
                        wp += 1;
                        match self.assigned(implied) {
                            Some(true) => (),
                            Some(false) => {
                                conflict = Some(Conflict::Binary(false_lit, implied));
                                break;
                            }
                            None => self.push_assign(implied, AssignReason::BinaryLink(false_lit)),
                        }
                    }
                    Watch::Long { cid, blocker } => {
                        if self.assigned(blocker) == Some(true) {
                            watches[wp] = w;
                            wp += 1;
                            continue;
                        }
                        // the other watch goes to position 0
                        if cdb.arena.lit(cid, 0) == false_lit {
                            cdb.arena.swap_lits(cid, 0, 1);
                        }
                        debug_assert_eq!(cdb.arena.lit(cid, 1), false_lit);
                        let first = cdb.arena.lit(cid, 0);
                        let first_value = self.assigned(first);
                        if first_value == Some(true) {
                            watches[wp] = Watch::Long { cid, blocker: first };
                            wp += 1;
                            continue;
                        }
                        let len = cdb.arena.len(cid);
                        if let Some(k) = (2..len)
                            .find(|k| self.assigned(cdb.arena.lit(cid, *k)) != Some(false))
                        {
                            let lk = cdb.arena.lit(cid, k);
                            cdb.arena.swap_lits(cid, 1, k);
                            cdb.watcher[usize::from(lk)].register_long(first, cid);
                            continue;
                        }
                        watches[wp] = Watch::Long { cid, blocker: first };
                        wp += 1;
                        if first_value.is_some() {
                            conflict = Some(Conflict::Clause(cid));
                            break;
                        }
                        self.push_assign(first, AssignReason::Implication(cid));
                        let current = cdb.arena.lbd(cid);
                        let lbd = self.compute_lbd(cdb.arena.lits(cid));
                        if lbd + 1 < current {
                            cdb.arena.set_lbd(cid, lbd);
                            cdb.arena.turn_on(cid, FlagClause::IMPROVED);
                        }
                    }
                }
            }
            while rp < n {
                watches[wp] = watches[rp];
                wp += 1;
                rp += 1;
            }
            watches.truncate(wp);
            debug_assert!(cdb.watcher[usize::from(false_lit)].is_empty());
            cdb.watcher[usize::from(false_lit)] = watches;
            if let Some(c) = conflict {
                return Err(c);
            }
        }
        Ok(())
    }
}
