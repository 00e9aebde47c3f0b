use {
    super::{ClauseArena, ClauseDB, ClauseDBIF, ClauseId, Relocation, WatchDBIF},
    crate::{
        assign::{AssignIF, AssignReason, AssignStack},
        types::*,
    },
    tracing::debug,
};

impl Default for ClauseDB {
    fn default() -> ClauseDB {
        ClauseDB {
            arena: ClauseArena::default(),
            watcher: Vec::new(),
            occur: Vec::new(),
            maintain_occur: false,
            units: Vec::new(),
            empties: Vec::new(),
            activity_inc: 1.0,
            activity_factor: 1.05,
            num_active: 0,
            num_essential: 0,
            num_collect: 0,
            num_deleted: 0,
        }
    }
}

impl Instantiate for ClauseDB {
    fn instantiate(config: &Config, cnf: &CNFDescription) -> ClauseDB {
        let nv = cnf.num_of_variables;
        ClauseDB {
            arena: ClauseArena::new(config.arena_bytes, config.gc_slack_bytes),
            watcher: vec![Vec::new(); 2 * nv],
            activity_factor: config.clause_activity_factor,
            ..ClauseDB::default()
        }
    }
}

impl ActivityIF<ClauseId> for ClauseDB {
    #[inline]
    fn activity(&self, cid: ClauseId) -> f64 {
        self.arena.activity(cid)
    }
    fn set_activity(&mut self, cid: ClauseId, val: f64) {
        self.arena.set_activity(cid, val);
    }
    fn bump_activity(&mut self, cid: ClauseId) {
        let a = self.arena.activity(cid) + self.activity_inc;
        self.arena.set_activity(cid, a);
        if ACTIVITY_LIMIT < a {
            let cids = self.arena.iter().collect::<Vec<_>>();
            for c in cids {
                let x = self.arena.activity(c);
                self.arena.set_activity(c, x / a);
            }
            self.activity_inc /= a;
        }
    }
    fn update_activity_inc(&mut self) {
        self.activity_inc *= self.activity_factor;
    }
}

impl ClauseDBIF for ClauseDB {
    fn new_var(&mut self) {
        self.watcher.push(Vec::new());
        self.watcher.push(Vec::new());
        if self.maintain_occur {
            self.occur.push(Vec::new());
            self.occur.push(Vec::new());
        }
    }
    fn new_clause(&mut self, lits: &[Lit]) -> ClauseId {
        let cid = self.arena.allocate(lits);
        let sig = lits.iter().fold(0, |s, l| s | l.signature());
        self.arena.set_signature(cid, sig);
        if self.maintain_occur {
            for l in lits {
                self.occur[usize::from(l)].push(cid);
            }
        }
        cid
    }
    fn input_clause(&mut self, lits: &[Lit]) -> ClauseId {
        let cid = self.new_clause(lits);
        self.set_essential(cid);
        self.install(cid);
        cid
    }
    fn install(&mut self, cid: ClauseId) {
        assert!(
            !self.arena.is(cid, FlagClause::INSTALLED),
            "{cid} is installed twice"
        );
        match self.arena.len(cid) {
            0 => self.empties.push(cid),
            1 => self.units.push(self.arena.lit(cid, 0)),
            2 => {
                let (l0, l1) = (self.arena.lit(cid, 0), self.arena.lit(cid, 1));
                self.watcher[usize::from(l0)].register_binary(l1, cid);
                self.watcher[usize::from(l1)].register_binary(l0, cid);
            }
            _ => {
                let (l0, l1) = (self.arena.lit(cid, 0), self.arena.lit(cid, 1));
                self.watcher[usize::from(l0)].register_long(l1, cid);
                self.watcher[usize::from(l1)].register_long(l0, cid);
            }
        }
        self.arena.turn_on(cid, FlagClause::INSTALLED);
        self.num_active += 1;
    }
    fn uninstall<A>(&mut self, asg: &A, cid: ClauseId)
    where
        A: AssignIF,
    {
        assert!(
            !self.is_antecedent(asg, cid),
            "{cid} is uninstalled while being a reason"
        );
        assert!(
            self.arena.is(cid, FlagClause::INSTALLED),
            "{cid} isn't installed"
        );
        match self.arena.len(cid) {
            0 => {
                let Some(i) = self.empties.iter().position(|c| *c == cid) else {
                    panic!("{cid} isn't in the empty list");
                };
                self.empties.swap_remove(i);
            }
            1 => {
                let l0 = self.arena.lit(cid, 0);
                let Some(i) = self.units.iter().position(|l| *l == l0) else {
                    panic!("{cid} isn't in the unit list");
                };
                self.units.remove(i);
            }
            _ => {
                let (l0, l1) = (self.arena.lit(cid, 0), self.arena.lit(cid, 1));
                self.watcher[usize::from(l0)].detach_with(cid);
                self.watcher[usize::from(l1)].detach_with(cid);
            }
        }
        self.arena.turn_off(cid, FlagClause::INSTALLED);
        self.num_active -= 1;
    }
    fn delete_clause(&mut self, cid: ClauseId) {
        assert!(
            !self.arena.is(cid, FlagClause::ESSENTIAL),
            "deleting essential {cid}"
        );
        assert!(
            !self.arena.is(cid, FlagClause::INSTALLED),
            "deleting installed {cid}"
        );
        if self.maintain_occur {
            for l in self.arena.to_vec(cid) {
                let list = &mut self.occur[usize::from(l)];
                if let Some(i) = list.iter().position(|c| *c == cid) {
                    list.swap_remove(i);
                }
            }
        }
        self.arena.delete(cid);
        self.num_deleted += 1;
    }
    fn set_essential(&mut self, cid: ClauseId) {
        assert!(!self.arena.is(cid, FlagClause::ESSENTIAL));
        self.arena.turn_on(cid, FlagClause::ESSENTIAL);
        self.num_essential += 1;
    }
    fn unset_essential(&mut self, cid: ClauseId) {
        assert!(self.arena.is(cid, FlagClause::ESSENTIAL));
        self.arena.turn_off(cid, FlagClause::ESSENTIAL);
        self.num_essential -= 1;
    }
    fn mark(&mut self, cid: ClauseId) {
        self.arena.turn_on(cid, FlagClause::MARKED);
    }
    fn unmark(&mut self, cid: ClauseId) {
        self.arena.turn_off(cid, FlagClause::MARKED);
    }
    fn freeze<A>(&mut self, asg: &A, cid: ClauseId)
    where
        A: AssignIF,
    {
        assert!(!self.arena.is(cid, FlagClause::FROZEN), "{cid} is frozen twice");
        self.uninstall(asg, cid);
        self.arena.turn_on(cid, FlagClause::FROZEN);
    }
    fn quick_freeze(&mut self, cid: ClauseId) {
        assert!(!self.arena.is(cid, FlagClause::INSTALLED));
        assert!(!self.arena.is(cid, FlagClause::FROZEN));
        self.arena.turn_on(cid, FlagClause::FROZEN);
    }
    fn unfreeze(&mut self, cid: ClauseId) {
        assert!(self.arena.is(cid, FlagClause::FROZEN), "{cid} isn't frozen");
        self.install(cid);
        self.arena.turn_off(cid, FlagClause::FROZEN);
    }
    fn psm<A>(&self, asg: &A, cid: ClauseId) -> usize
    where
        A: AssignIF,
    {
        self.arena
            .lits(cid)
            .filter(|l| asg.phase(l.vi()) == bool::from(*l))
            .count()
    }
    fn is_antecedent<A>(&self, asg: &A, cid: ClauseId) -> bool
    where
        A: AssignIF,
    {
        if self.arena.len(cid) < 3 {
            return false;
        }
        let vi = self.arena.lit(cid, 0).vi();
        asg.assign(vi).is_some() && asg.reason(vi) == AssignReason::Implication(cid)
    }
    fn contains(&self, cid: ClauseId, lit: Lit) -> bool {
        self.arena.signature(cid) & lit.signature() != 0 && self.arena.lits(cid).any(|l| l == lit)
    }
    fn construct_occur(&mut self) {
        assert!(!self.maintain_occur, "occurrence lists exist");
        self.maintain_occur = true;
        self.rebuild_occur();
    }
    fn destruct_occur(&mut self) {
        assert!(self.maintain_occur, "no occurrence lists");
        self.maintain_occur = false;
        self.occur.clear();
    }
    fn occur(&self, lit: Lit) -> &[ClauseId] {
        debug_assert!(self.maintain_occur);
        &self.occur[usize::from(lit)]
    }
    fn expell_containing<A>(&mut self, asg: &A, lit: Lit)
    where
        A: AssignIF,
    {
        assert!(asg.trail().is_empty(), "expelling with assigned vars");
        let targets = self
            .arena
            .iter()
            .filter(|c| self.contains(*c, lit))
            .collect::<Vec<_>>();
        for cid in targets {
            if self.arena.is(cid, FlagClause::ESSENTIAL) {
                self.unset_essential(cid);
            }
            if self.arena.is(cid, FlagClause::INSTALLED) {
                self.uninstall(asg, cid);
            }
            self.delete_clause(cid);
        }
    }
    fn check_garbage(&self) -> bool {
        self.arena.needs_collection()
    }
    fn units(&self) -> &[Lit] {
        &self.units
    }
    fn has_empty(&self) -> bool {
        !self.empties.is_empty()
    }
}

impl ClauseDB {
    fn rebuild_occur(&mut self) {
        self.occur = vec![Vec::new(); self.watcher.len()];
        for cid in self.arena.iter() {
            for l in self.arena.lits(cid) {
                self.occur[usize::from(l)].push(cid);
            }
        }
    }
    /// compact the arena and rewrite every handle held by watch lists,
    /// the empty list, antecedents, and occurrence lists.
    pub fn collect_garbage(&mut self, asg: &mut AssignStack) {
        let before = self.arena.used_bytes();
        let old = self.arena.garbage_collect(|old, event| {
            if let Relocation::Dropped(cid) = event {
                assert!(
                    !old.is(cid, FlagClause::INSTALLED),
                    "{cid} is dropped while installed"
                );
            }
        });
        let forward = |cid: ClauseId| match old.forward(cid) {
            Some(to) => to,
            None => panic!("{cid} is referred but dropped"),
        };
        for w in self.watcher.iter_mut().flat_map(|wl| wl.iter_mut()) {
            let to = forward(w.cid());
            w.set_cid(to);
        }
        for c in self.empties.iter_mut() {
            *c = forward(*c);
        }
        for lit in asg.trail.iter() {
            let vi = lit.vi();
            if let AssignReason::Implication(cid) = asg.reason[vi] {
                asg.reason[vi] = AssignReason::Implication(forward(cid));
            }
        }
        if self.maintain_occur {
            self.rebuild_occur();
        }
        self.num_collect += 1;
        debug!(
            before_kib = before / 1024,
            after_kib = self.arena.used_bytes() / 1024,
            capacity_kib = self.arena.capacity_bytes() / 1024,
            "clause garbage collection"
        );
    }
    /// return the number of installed clauses which aren't essential.
    pub fn num_learnt(&self) -> usize {
        self.num_active - self.num_essential.min(self.num_active)
    }
}
