/// main struct AssignStack
use {
    super::{AssignIF, AssignReason, VarHeapIF, VarIdHeap},
    crate::types::*,
    std::fmt,
};

/// A record of assignment. It's called 'trail' in Glucose.
#[derive(Clone, Debug)]
pub struct AssignStack {
    //
    //## per-var state
    //
    pub(crate) assign: Vec<Option<bool>>,
    pub(crate) level: Vec<DecisionLevel>,
    pub(crate) reason: Vec<AssignReason>,
    pub(crate) var_flags: Vec<FlagVar>,

    //
    //## trail
    //
    /// record of assignment
    pub(crate) trail: Vec<Lit>,
    /// the start of each decision level in `trail`
    pub(crate) trail_lim: Vec<usize>,
    /// the number of propagated assignments
    pub(crate) q_head: usize,

    //
    //## VSIDS
    //
    pub(crate) activity: Vec<f64>,
    pub(crate) activity_inc: f64,
    pub(crate) activity_factor: f64,
    pub(crate) var_order: VarIdHeap,

    //
    //## preprocessing and assumptions
    //
    /// union-find parents over literal indices
    equiv: Vec<Lit>,
    pub(crate) assumptions: Vec<Lit>,
    assumed: Vec<bool>,

    /// level stamps used by LBD computation
    lbd_temp: Vec<usize>,
    lbd_key: usize,

    //
    //## Statistics
    //
    /// the number of vars.
    pub num_vars: usize,
    /// the number of vars not deleted.
    pub num_present_vars: usize,
    /// the number of assigned vars.
    pub num_assigned: usize,
    pub(crate) num_decision: usize,
    pub(crate) num_propagation: usize,
}

impl Default for AssignStack {
    fn default() -> AssignStack {
        AssignStack {
            assign: Vec::new(),
            level: Vec::new(),
            reason: Vec::new(),
            var_flags: Vec::new(),
            trail: Vec::new(),
            trail_lim: Vec::new(),
            q_head: 0,
            activity: Vec::new(),
            activity_inc: 1.0,
            activity_factor: 1.05,
            var_order: VarIdHeap::default(),
            equiv: Vec::new(),
            assumptions: Vec::new(),
            assumed: Vec::new(),
            lbd_temp: Vec::new(),
            lbd_key: 0,
            num_vars: 0,
            num_present_vars: 0,
            num_assigned: 0,
            num_decision: 0,
            num_propagation: 0,
        }
    }
}

impl From<&AssignStack> for Vec<i32> {
    fn from(asg: &AssignStack) -> Vec<i32> {
        asg.trail.iter().map(|l| i32::from(*l)).collect::<Vec<_>>()
    }
}

impl Instantiate for AssignStack {
    fn instantiate(config: &Config, cnf: &CNFDescription) -> AssignStack {
        let mut asg = AssignStack {
            activity_factor: config.var_activity_factor,
            ..AssignStack::default()
        };
        for _ in 0..cnf.num_of_variables {
            asg.new_var();
        }
        asg
    }
}

impl AssignIF for AssignStack {
    fn num_vars(&self) -> usize {
        self.num_vars
    }
    #[inline]
    fn decision_level(&self) -> DecisionLevel {
        self.trail_lim.len() as DecisionLevel
    }
    #[inline]
    fn assigned(&self, l: Lit) -> Option<bool> {
        self.assign[l.vi()].map(|b| b == bool::from(l))
    }
    #[inline]
    fn assign(&self, vi: VarId) -> Option<bool> {
        self.assign[vi]
    }
    #[inline]
    fn level(&self, vi: VarId) -> DecisionLevel {
        self.level[vi]
    }
    #[inline]
    fn reason(&self, vi: VarId) -> AssignReason {
        self.reason[vi]
    }
    #[inline]
    fn phase(&self, vi: VarId) -> bool {
        self.var_flags[vi].is(FlagVar::PHASE)
    }
    fn trail(&self) -> &[Lit] {
        &self.trail
    }
    fn len_upto(&self, lv: DecisionLevel) -> usize {
        self.trail_lim.get(lv as usize).map_or(self.trail.len(), |n| *n)
    }
    fn remains(&self) -> bool {
        self.q_head < self.trail.len()
    }
    fn at_leaf(&self) -> bool {
        self.num_assigned == self.num_present_vars
    }
    fn var_is_deleted(&self, vi: VarId) -> bool {
        self.var_flags[vi].is(FlagVar::DELETED)
    }
}

impl ActivityIF<VarId> for AssignStack {
    #[inline]
    fn activity(&self, vi: VarId) -> f64 {
        self.activity[vi]
    }
    fn set_activity(&mut self, vi: VarId, val: f64) {
        self.activity[vi] = val;
    }
    fn bump_activity(&mut self, vi: VarId) {
        let a = self.activity[vi] + self.activity_inc;
        self.activity[vi] = a;
        if ACTIVITY_LIMIT < a {
            // dividing by the same value keeps the heap order.
            for x in self.activity.iter_mut() {
                *x /= a;
            }
            self.activity_inc /= a;
        }
        self.update_heap(vi);
    }
    fn update_activity_inc(&mut self) {
        self.activity_inc *= self.activity_factor;
    }
}

impl AssignStack {
    /// allocate a var: unassigned, inside the heap.
    pub fn new_var(&mut self) -> VarId {
        let vi = self.num_vars;
        self.assign.push(None);
        self.level.push(0);
        self.reason.push(AssignReason::None);
        self.var_flags.push(FlagVar::empty());
        self.activity.push(0.0);
        self.var_order.push_var(vi);
        self.equiv.push(Lit::from((vi, false)));
        self.equiv.push(Lit::from((vi, true)));
        self.assumed.push(false);
        self.assumed.push(false);
        self.num_vars += 1;
        self.num_present_vars += 1;
        self.insert_heap(vi);
        vi
    }
    /// remove a var from the search. It must be unassigned.
    pub fn delete_var(&mut self, vi: VarId) {
        assert!(self.assign[vi].is_none(), "deleting an assigned var");
        assert!(!self.var_flags[vi].is(FlagVar::DELETED), "deleting a var twice");
        self.var_flags[vi].turn_on(FlagVar::DELETED);
        self.num_present_vars -= 1;
        self.remove_from_heap(vi);
    }
    /// return the model value made by `build_model`.
    pub fn model_value(&self, vi: VarId) -> bool {
        self.var_flags[vi].is(FlagVar::MODEL)
    }
    pub(crate) fn set_model(&mut self, vi: VarId, b: bool) {
        self.var_flags[vi].set(FlagVar::MODEL, b);
    }
    /// return the number of distinct levels among the assigned literals.
    pub fn compute_lbd<I>(&mut self, lits: I) -> u32
    where
        I: IntoIterator<Item = Lit>,
    {
        let lv = self.decision_level() as usize;
        if self.lbd_temp.len() <= lv {
            self.lbd_temp.resize(lv + 1, 0);
        }
        self.lbd_key += 1;
        let key = self.lbd_key;
        let mut cnt: u32 = 0;
        for l in lits {
            let vi = l.vi();
            if self.assign[vi].is_none() {
                continue;
            }
            let lv = self.level[vi] as usize;
            if self.lbd_temp[lv] != key {
                self.lbd_temp[lv] = key;
                cnt += 1;
            }
        }
        cnt.min(u16::MAX as u32)
    }

    //
    //## literal equivalence
    //
    /// return the representative of `lit`'s equivalence class.
    pub fn lit_equivalent(&mut self, lit: Lit) -> Lit {
        let mut root = lit;
        while self.equiv[usize::from(root)] != root {
            root = self.equiv[usize::from(root)];
        }
        let mut l = lit;
        while l != root {
            let next = self.equiv[usize::from(l)];
            self.equiv[usize::from(l)] = root;
            l = next;
        }
        root
    }
    /// merge the classes of `l1` and `l2`, and those of their negations.
    /// The literal with the smaller index becomes the root.
    pub fn lit_join(&mut self, l1: Lit, l2: Lit) {
        let r1 = self.lit_equivalent(l1);
        let r2 = self.lit_equivalent(l2);
        assert!(r1 != !r2, "joining a literal with its negation");
        if r1 == r2 {
            return;
        }
        let (root, child) = if r1 < r2 { (r1, r2) } else { (r2, r1) };
        self.equiv[usize::from(child)] = root;
        self.equiv[usize::from(!child)] = !root;
    }

    //
    //## assumptions
    //
    pub fn is_assumed(&self, lit: Lit) -> bool {
        self.assumed[usize::from(lit)]
    }
    /// add an assumption used by the next `start`.
    pub fn assumption_enable(&mut self, lit: Lit) {
        assert!(!self.assumed[usize::from(lit)], "{lit} is already assumed");
        assert!(self.assign[lit.vi()].is_none(), "assuming an assigned var");
        self.assumed[usize::from(lit)] = true;
        self.assumptions.push(lit);
    }
    pub fn assumption_disable(&mut self, lit: Lit) {
        assert!(self.assumed[usize::from(lit)], "{lit} isn't assumed");
        assert!(self.assign[lit.vi()].is_none(), "dropping an assigned assumption");
        self.assumed[usize::from(lit)] = false;
        if let Some(i) = self.assumptions.iter().position(|l| *l == lit) {
            self.assumptions.remove(i);
        }
    }
}

impl fmt::Display for AssignStack {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let levels = (0..self.trail_lim.len())
            .map(|lv| {
                let end = self.trail_lim.get(lv + 1).copied().unwrap_or(self.trail.len());
                i32s(&self.trail[self.trail_lim[lv]..end])
            })
            .collect::<Vec<_>>();
        write!(
            f,
            "ASG:: trail({}, propagated {}) by level: {:?}",
            self.trail.len(),
            self.q_head,
            levels,
        )
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::assign::PropagateIF};

    fn lit(i: i32) -> Lit {
        Lit::from(i)
    }

    fn stack(n: usize) -> AssignStack {
        let cnf = CNFDescription {
            num_of_variables: n,
            ..CNFDescription::default()
        };
        AssignStack::instantiate(&Config::default(), &cnf)
    }

    #[test]
    fn test_levels() {
        let mut asg = stack(4);
        assert_eq!(asg.decision_level(), 0);
        asg.push_level();
        asg.push_assign(lit(1), AssignReason::Decision(1));
        asg.q_head = asg.trail.len();
        asg.push_level();
        asg.push_assign(lit(-2), AssignReason::Decision(2));
        asg.push_assign(lit(3), AssignReason::BinaryLink(lit(2)));
        assert_eq!(asg.decision_level(), 2);
        assert_eq!(asg.level(1), 2);
        assert_eq!(asg.assigned(lit(2)), Some(false));
        assert_eq!(asg.assigned(lit(-2)), Some(true));
        assert!(!asg.phase(1));
        assert_eq!(asg.len_upto(1), 1);
        assert_eq!(asg.num_assigned, 3);
        asg.backjump(1);
        assert_eq!(asg.decision_level(), 1);
        assert_eq!(asg.trail, vec![lit(1)]);
        assert_eq!(asg.assign(2), None);
        assert_eq!(asg.reason(2), AssignReason::None);
        assert!(asg.var_order.contains(1));
        assert!(!asg.phase(1));
        assert!(!asg.at_leaf());
        asg.backjump(0);
        assert_eq!(asg.num_assigned, 0);
    }

    #[test]
    fn test_lbd() {
        let mut asg = stack(5);
        for (i, l) in [1, 2, -3].iter().enumerate() {
            asg.push_level();
            asg.push_assign(lit(*l), AssignReason::Decision(i as DecisionLevel + 1));
            asg.q_head = asg.trail.len();
        }
        asg.push_assign(lit(4), AssignReason::BinaryLink(lit(3)));
        assert_eq!(asg.compute_lbd([lit(-1), lit(-2), lit(3), lit(-4), lit(5)]), 3);
        assert_eq!(asg.compute_lbd([lit(-3), lit(-4)]), 1);
    }

    #[test]
    fn test_equivalence() {
        let mut asg = stack(4);
        asg.lit_join(lit(3), lit(-2));
        assert_eq!(asg.lit_equivalent(lit(3)), lit(-2));
        assert_eq!(asg.lit_equivalent(lit(-3)), lit(2));
        asg.lit_join(lit(4), lit(3));
        assert_eq!(asg.lit_equivalent(lit(4)), lit(-2));
        assert_eq!(asg.lit_equivalent(lit(-4)), lit(2));
        assert_eq!(asg.lit_equivalent(lit(1)), lit(1));
    }

    #[test]
    fn test_assumptions() {
        let mut asg = stack(3);
        asg.assumption_enable(lit(2));
        asg.assumption_enable(lit(-3));
        assert!(asg.is_assumed(lit(2)));
        assert!(!asg.is_assumed(lit(-2)));
        asg.assumption_disable(lit(2));
        assert_eq!(asg.assumptions, vec![lit(-3)]);
    }

    #[test]
    fn test_delete_var() {
        let mut asg = stack(3);
        asg.delete_var(1);
        assert!(asg.var_is_deleted(1));
        assert!(!asg.var_order.contains(1));
        asg.push_level();
        asg.push_assign(lit(1), AssignReason::Decision(1));
        asg.push_assign(lit(3), AssignReason::Decision(1));
        assert!(asg.at_leaf());
    }
}
