//! Model extension: records left by preprocessors to restore removed vars.
use {
    crate::{
        assign::{AssignIF, AssignStack},
        cdb::{ClauseDB, ClauseDBIF},
        types::*,
    },
    std::fmt,
};

/// How to give a removed var its value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Extension {
    /// a literal that holds in every model.
    Fact(Lit),
    /// the var is false iff the literal is true.
    Equivalent(VarId, Lit),
    /// the var was resolved away; these clauses contained its negative literal.
    Distributed(VarId, Vec<Vec<Lit>>),
    /// a clause removed as blocked on the literal.
    Blocked(Vec<Lit>, Lit),
}

/// The stack of extension records; replayed in reverse.
#[derive(Clone, Debug, Default)]
pub struct ExtensionStack {
    records: Vec<Extension>,
}

impl fmt::Display for ExtensionStack {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Extension[{} records]", self.records.len())
    }
}

impl ExtensionStack {
    pub fn len(&self) -> usize {
        self.records.len()
    }
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
    pub fn push_fact(&mut self, fact: Lit) {
        self.records.push(Extension::Fact(fact));
    }
    /// `zero_equivalent` is equivalent to the negative literal of `vi`.
    pub fn push_equivalent(&mut self, vi: VarId, zero_equivalent: Lit) {
        self.records.push(Extension::Equivalent(vi, zero_equivalent));
    }
    /// save the present clauses containing the negative literal of `vi`.
    /// Requires occurrence lists.
    pub fn push_distributed(&mut self, cdb: &ClauseDB, vi: VarId) {
        let clauses = cdb
            .occur(Lit::from((vi, false)))
            .iter()
            .filter(|c| cdb.arena.is_present(**c))
            .map(|c| cdb.arena.to_vec(*c))
            .collect::<Vec<_>>();
        self.push_distributed_clauses(vi, clauses);
    }
    pub fn push_distributed_clauses(&mut self, vi: VarId, clauses: Vec<Vec<Lit>>) {
        self.records.push(Extension::Distributed(vi, clauses));
    }
    pub fn push_blocked(&mut self, clause: Vec<Lit>, blocking: Lit) {
        self.records.push(Extension::Blocked(clause, blocking));
    }
    /// extend the current assignment by the records and store it as the model.
    pub fn build_model(&self, asg: &mut AssignStack) {
        let mut model = (0..asg.num_vars())
            .map(|vi| asg.assign(vi))
            .collect::<Vec<Option<bool>>>();
        let holds = |model: &[Option<bool>], l: Lit| model[l.vi()] == Some(bool::from(l));
        let satisfied =
            |model: &[Option<bool>], clause: &[Lit]| clause.iter().any(|l| holds(model, *l));
        for record in self.records.iter().rev() {
            match record {
                Extension::Fact(l) => model[l.vi()] = Some(bool::from(*l)),
                Extension::Equivalent(vi, zero_equivalent) => {
                    model[*vi] = Some(!holds(&model, *zero_equivalent));
                }
                Extension::Distributed(vi, clauses) => {
                    model[*vi] = Some(true);
                    if !clauses.iter().all(|c| satisfied(&model, c)) {
                        model[*vi] = Some(false);
                    }
                }
                Extension::Blocked(clause, blocking) => {
                    if !satisfied(&model, clause) {
                        model[blocking.vi()] = Some(bool::from(*blocking));
                    }
                }
            }
        }
        for (vi, b) in model.iter().enumerate() {
            asg.set_model(vi, b.unwrap_or(false));
        }
    }
}
