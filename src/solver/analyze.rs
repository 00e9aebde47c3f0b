//! Conflict Analysis: first-UIP cut, minimization and clause building.
use {
    crate::{
        assign::{AssignIF, AssignStack, Conflict},
        cdb::ClauseDB,
        types::*,
    },
    std::fmt,
};

/// Scratch space of conflict analysis.
#[derive(Clone, Debug, Default)]
pub struct Learner {
    /// per-var flags; cleared by `reset`
    flags: Vec<FlagLearn>,
    /// vars with some flag on
    touched: Vec<VarId>,
    /// the falsified literals of the cut; slot 0 is the UIP
    cut: Vec<Lit>,
    /// the levels below the current one seen by the cut, one bit per `level % 64`
    level_signature: u64,
    /// the worklist of minimization: a var and the index of its next cause
    stack: Vec<(VarId, usize)>,
    /// the learnt clause
    learnt: Vec<Lit>,
}

impl Instantiate for Learner {
    fn instantiate(_: &Config, cnf: &CNFDescription) -> Self {
        Learner {
            flags: vec![FlagLearn::empty(); cnf.num_of_variables],
            ..Learner::default()
        }
    }
}

impl fmt::Display for Learner {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Learner[cut:{:?}, learnt:{:?}]",
            i32s(&self.cut),
            i32s(&self.learnt)
        )
    }
}

impl Learner {
    /// extend the per-var flags for a new var.
    pub fn new_var(&mut self) {
        self.flags.push(FlagLearn::empty());
    }
    /// return the clause made by the last `analyze`.
    pub fn learnt(&self) -> &[Lit] {
        &self.learnt
    }
    /// return the size of the cut made by the last `analyze`.
    pub fn cut_len(&self) -> usize {
        self.cut.len()
    }
    /// build a learnt clause from a conflict above the assumption level.
    /// The UIP comes first, then the literal with the highest level.
    pub fn analyze(&mut self, asg: &mut AssignStack, cdb: &mut ClauseDB, conflict: Conflict) {
        debug_assert!(self.touched.is_empty());
        self.cut.push(Lit::from_index(0));
        let current = asg.decision_level();
        let mut link = 0;
        match conflict {
            Conflict::Clause(cid) => {
                cdb.bump_activity(cid);
                for k in 0..cdb.arena.len(cid) {
                    link += self.visit(asg, cdb.arena.lit(cid, k), current);
                }
            }
            Conflict::Binary(l1, l2) => {
                link += self.visit(asg, l1, current);
                link += self.visit(asg, l2, current);
            }
            Conflict::Fact(_) | Conflict::Empty | Conflict::None => {
                panic!("analyzing an unresolvable conflict: {conflict}")
            }
        }
        let mut i = asg.trail().len();
        loop {
            assert!(asg.len_upto(current - 1) < i, "no UIP at level {current}");
            i -= 1;
            let p = asg.trail()[i];
            let vi = p.vi();
            if !self.flags[vi].is(FlagLearn::MARKED) {
                continue;
            }
            link -= 1;
            if link == 0 {
                self.set_flag(vi, FlagLearn::IN_CUT | FlagLearn::IN_MIN);
                self.level_signature |= 1 << (current % 64);
                self.cut[0] = !p;
                break;
            }
            match asg.reason(vi) {
                AssignReason::Implication(cid) => {
                    cdb.bump_activity(cid);
                    for k in 1..cdb.arena.len(cid) {
                        link += self.visit(asg, cdb.arena.lit(cid, k), current);
                    }
                }
                AssignReason::BinaryLink(l) => {
                    link += self.visit(asg, l, current);
                }
                AssignReason::Decision(_) => (),
                AssignReason::None => panic!("{p} on the trail has no reason"),
            }
        }
        self.minimize(asg, cdb);
        self.build(asg);
    }
    /// clear the flags and buffers for the next conflict.
    pub fn reset(&mut self) {
        for vi in self.touched.drain(..) {
            self.flags[vi] = FlagLearn::empty();
        }
        self.cut.clear();
        self.level_signature = 0;
        self.stack.clear();
    }

    /// mark the var of a falsified literal; return 1 if it is at the current level.
    fn visit(&mut self, asg: &mut AssignStack, lit: Lit, current: DecisionLevel) -> usize {
        let vi = lit.vi();
        if self.flags[vi].is(FlagLearn::MARKED) {
            return 0;
        }
        self.set_flag(vi, FlagLearn::MARKED);
        asg.bump_activity(vi);
        let lv = asg.level(vi);
        if lv < current {
            self.set_flag(vi, FlagLearn::IN_CUT | FlagLearn::IN_MIN);
            self.level_signature |= 1 << (lv % 64);
            self.cut.push(lit);
            0
        } else {
            1
        }
    }
    fn set_flag(&mut self, vi: VarId, flag: FlagLearn) {
        if !self.flags[vi].is(FlagLearn::TOUCHED) {
            self.touched.push(vi);
        }
        self.flags[vi].insert(flag | FlagLearn::TOUCHED);
    }
    /// drop cut members implied by the other members.
    fn minimize(&mut self, asg: &AssignStack, cdb: &ClauseDB) {
        // the UIP stays
        for i in 1..self.cut.len() {
            let vi = self.cut[i].vi();
            if matches!(asg.reason(vi), AssignReason::Decision(_)) {
                continue;
            }
            let mut k = 0;
            let redundant = loop {
                match cause(asg, cdb, vi, k) {
                    None => break true,
                    Some(u) if self.is_implied(asg, cdb, u) => k += 1,
                    Some(_) => break false,
                }
            };
            if redundant {
                self.flags[vi].remove(FlagLearn::IN_MIN);
            }
        }
    }
    /// the memoized checks which don't need expansion.
    fn quick_check(&self, asg: &AssignStack, vi: VarId) -> Option<bool> {
        let lv = asg.level(vi);
        if self.level_signature & (1 << (lv % 64)) == 0 && lv != 1 {
            return Some(false);
        }
        let flags = self.flags[vi];
        if flags.is(FlagLearn::IN_CUT) || lv == 1 {
            return Some(true);
        }
        if matches!(asg.reason(vi), AssignReason::Decision(_)) {
            return Some(false);
        }
        if flags.is(FlagLearn::MIN_CHECKED) {
            return Some(flags.is(FlagLearn::MIN_IMPLIED));
        }
        None
    }
    /// return `true` if `root` is implied by the cut and level-1 facts.
    fn is_implied(&mut self, asg: &AssignStack, cdb: &ClauseDB, root: VarId) -> bool {
        if let Some(b) = self.quick_check(asg, root) {
            return b;
        }
        self.stack.clear();
        self.stack.push((root, 0));
        while let Some((vi, k)) = self.stack.last().copied() {
            let Some(u) = cause(asg, cdb, vi, k) else {
                self.stack.pop();
                self.set_flag(vi, FlagLearn::MIN_CHECKED | FlagLearn::MIN_IMPLIED);
                continue;
            };
            if let Some(top) = self.stack.last_mut() {
                top.1 += 1;
            }
            match self.quick_check(asg, u) {
                Some(true) => (),
                Some(false) => {
                    for i in 0..self.stack.len() {
                        let w = self.stack[i].0;
                        self.set_flag(w, FlagLearn::MIN_CHECKED);
                    }
                    self.stack.clear();
                    return false;
                }
                None => self.stack.push((u, 0)),
            }
        }
        true
    }
    fn build(&mut self, asg: &AssignStack) {
        self.learnt.clear();
        self.learnt.push(self.cut[0]);
        let mut max_level = 0;
        for l in self.cut.iter().skip(1) {
            if !self.flags[l.vi()].is(FlagLearn::IN_MIN) {
                continue;
            }
            let lv = asg.level(l.vi());
            self.learnt.push(*l);
            if max_level < lv {
                max_level = lv;
                let last = self.learnt.len() - 1;
                self.learnt.swap(1, last);
            }
        }
    }
}

/// return the var of the `k`-th cause of an implied var.
fn cause(asg: &AssignStack, cdb: &ClauseDB, vi: VarId, k: usize) -> Option<VarId> {
    match asg.reason(vi) {
        AssignReason::Implication(cid) => {
            (k + 1 < cdb.arena.len(cid)).then(|| cdb.arena.lit(cid, k + 1).vi())
        }
        AssignReason::BinaryLink(l) => (k == 0).then(|| l.vi()),
        AssignReason::Decision(_) | AssignReason::None => None,
    }
}
