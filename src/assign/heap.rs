/// Heap struct for selecting decision vars
use {
    super::AssignStack,
    crate::types::*,
    std::fmt,
};

/// A binary max-heap over vars keyed by activity.
///
/// `heap` is a permutation of all vars; its first `len` slots form the heap,
/// the rest are the vars currently out of it. `idxs[vi]` is the slot of `vi`.
#[derive(Clone, Debug, Default)]
pub struct VarIdHeap {
    heap: Vec<VarId>,
    idxs: Vec<usize>,
    len: usize,
}

impl fmt::Display for VarIdHeap {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            " - seek pointer - nth -> var: {:?}\n - var -> nth: {:?}",
            &self.heap[..self.len],
            self.idxs,
        )
    }
}

impl VarIdHeap {
    /// register one more var, out of the heap.
    pub fn push_var(&mut self, vi: VarId) {
        debug_assert_eq!(vi, self.heap.len());
        self.heap.push(vi);
        self.idxs.push(vi);
    }
    #[inline]
    pub fn contains(&self, vi: VarId) -> bool {
        self.idxs[vi] < self.len
    }
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
    #[inline]
    pub fn peek(&self) -> Option<VarId> {
        (0 < self.len).then(|| self.heap[0])
    }
    /// exchange the contents of two slots.
    #[inline]
    fn swap(&mut self, i: usize, j: usize) {
        let (vi, vj) = (self.heap[i], self.heap[j]);
        self.heap.swap(i, j);
        self.idxs.swap(vi, vj);
    }
}

pub trait VarHeapIF {
    /// restore the heap order after the activity of `vi` grew.
    fn update_heap(&mut self, vi: VarId);
    /// insert `vi` if it's absent.
    fn insert_heap(&mut self, vi: VarId);
    /// remove and return the var with the largest activity.
    fn get_heap_root(&mut self) -> Option<VarId>;
    fn percolate_up(&mut self, start: usize);
    fn percolate_down(&mut self, start: usize);
    /// remove `vi` if it's in.
    fn remove_from_heap(&mut self, vi: VarId);
}

impl VarHeapIF for AssignStack {
    fn update_heap(&mut self, vi: VarId) {
        if self.var_order.contains(vi) {
            let start = self.var_order.idxs[vi];
            self.percolate_up(start);
        }
    }
    fn insert_heap(&mut self, vi: VarId) {
        if self.var_order.contains(vi) {
            return;
        }
        let i = self.var_order.idxs[vi];
        let n = self.var_order.len;
        self.var_order.swap(i, n);
        self.var_order.len += 1;
        self.percolate_up(n);
    }
    fn get_heap_root(&mut self) -> Option<VarId> {
        if self.var_order.is_empty() {
            return None;
        }
        let vs = self.var_order.heap[0];
        let n = self.var_order.len - 1;
        self.var_order.swap(0, n);
        self.var_order.len = n;
        if 1 < n {
            self.percolate_down(0);
        }
        Some(vs)
    }
    fn percolate_up(&mut self, start: usize) {
        let mut q = start;
        let vq = self.var_order.heap[q];
        let aq = self.activity[vq];
        while 0 < q {
            let p = (q - 1) / 2;
            let vp = self.var_order.heap[p];
            if self.activity[vp] < aq {
                // move down the current parent, and make it empty
                self.var_order.heap[q] = vp;
                self.var_order.idxs[vp] = q;
                q = p;
            } else {
                break;
            }
        }
        self.var_order.heap[q] = vq;
        self.var_order.idxs[vq] = q;
    }
    fn percolate_down(&mut self, start: usize) {
        let n = self.var_order.len;
        let mut i = start;
        let vi = self.var_order.heap[i];
        let ai = self.activity[vi];
        loop {
            let l = 2 * i + 1; // left
            if n <= l {
                break;
            }
            let vl = self.var_order.heap[l];
            let r = l + 1; // right
            let (target, vc) = if r < n
                && self.activity[vl] < self.activity[self.var_order.heap[r]]
            {
                (r, self.var_order.heap[r])
            } else {
                (l, vl)
            };
            if ai < self.activity[vc] {
                self.var_order.heap[i] = vc;
                self.var_order.idxs[vc] = i;
                i = target;
            } else {
                break;
            }
        }
        self.var_order.heap[i] = vi;
        self.var_order.idxs[vi] = i;
    }
    fn remove_from_heap(&mut self, vi: VarId) {
        if !self.var_order.contains(vi) {
            return;
        }
        let s = self.var_order.idxs[vi];
        let n = self.var_order.len - 1;
        self.var_order.swap(s, n);
        self.var_order.len = n;
        if s < n {
            let moved = self.var_order.heap[s];
            self.percolate_up(s);
            let s = self.var_order.idxs[moved];
            self.percolate_down(s);
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::assign::AssignIF,
        proptest::prelude::*,
    };

    fn stack_with(activities: &[f64]) -> AssignStack {
        let cnf = CNFDescription {
            num_of_variables: activities.len(),
            ..CNFDescription::default()
        };
        let mut asg = AssignStack::instantiate(&Config::default(), &cnf);
        for (vi, a) in activities.iter().enumerate() {
            asg.set_activity(vi, *a);
            asg.update_heap(vi);
        }
        asg
    }

    #[test]
    fn test_heap_order() {
        let mut asg = stack_with(&[0.5, 3.0, 1.0, 2.0]);
        assert_eq!(asg.var_order.peek(), Some(1));
        assert_eq!(asg.get_heap_root(), Some(1));
        assert_eq!(asg.get_heap_root(), Some(3));
        assert!(!asg.var_order.contains(1));
        asg.insert_heap(1);
        assert_eq!(asg.get_heap_root(), Some(1));
        asg.remove_from_heap(2);
        assert_eq!(asg.get_heap_root(), Some(0));
        assert_eq!(asg.get_heap_root(), None);
        assert_eq!(asg.num_vars(), 4);
    }

    proptest! {
        #[test]
        fn prop_heap_pops_in_activity_order(
            acts in prop::collection::vec(0.0f64..1000.0, 1..60),
            bumps in prop::collection::vec(0usize..60, 0..40),
            removes in prop::collection::hash_set(0usize..60, 0..10),
        ) {
            let mut asg = stack_with(&acts);
            for b in bumps.iter().filter(|b| **b < acts.len()) {
                let a = asg.activity[*b] + 100.0;
                asg.set_activity(*b, a);
                asg.update_heap(*b);
            }
            let removed = removes.iter().filter(|r| **r < acts.len()).count();
            for r in removes.iter().filter(|r| **r < acts.len()) {
                asg.remove_from_heap(*r);
                prop_assert!(!asg.var_order.contains(*r));
            }
            let mut last = f64::MAX;
            let mut popped = 0;
            while let Some(vi) = asg.get_heap_root() {
                prop_assert!(asg.activity[vi] <= last);
                last = asg.activity[vi];
                popped += 1;
            }
            prop_assert_eq!(popped, acts.len() - removed);
        }
    }
}
