// Copyright (c) 2017 King's College London
// created by the Software Development Team <http://soft-dev.org/>
//
// The Universal Permissive License (UPL), Version 1.0
//
// Subject to the condition set forth below, permission is hereby granted to any person obtaining a
// copy of this software, associated documentation and/or data (collectively the "Software"), free
// of charge and under any and all copyright rights in the Software, and any and all patent rights
// owned or freely licensable by each licensor hereunder covering either (i) the unmodified
// Software as contributed to or provided by such licensor, or (ii) the Larger Works (as defined
// below), to deal in both
//
// (a) the Software, and
// (b) any piece of software and/or hardware listed in the lrgrwrks.txt file
// if one is included with the Software (each a "Larger Work" to which the Software is contributed
// by such licensors),
//
// without restriction, including without limitation the rights to copy, create derivative works
// of, display, perform, and distribute the Software and make, use, sell, offer for sale, import,
// export, have made, and have sold the Software and the Larger Work(s), and to sublicense the
// foregoing rights on either these or other terms.
//
// This license is subject to the following condition: The above copyright notice and either this
// complete permission notice or at a minimum a reference to the UPL must be included in all copies
// or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
// BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
// DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! §4.D: compiling an expression into a flat list of clauses, and those
//! clauses into the disjuncts (connector jets) a word may use.

use std::collections::HashSet;

use crate::connector::{Connector, Direction};
use crate::expr::{Exp, ExpKind};
use crate::intern::Sym;

/// One `AND`-branch of an expanded expression: a flat run of connectors
/// in the order they appeared, plus the summed/maxed cost along the way
/// to get there.
#[derive(Clone, Debug)]
pub struct Clause {
    pub cost: f32,
    pub maxcost: f32,
    pub connectors: Vec<Connector>
}

/// Expand `exp` into its clauses (spec.md §4.D). The number of clauses
/// returned satisfies spec.md §8 property 2 (`#(Conn)=1`, `#(Or)=Σ`,
/// `#(And)=Π`), ignoring `cost_cutoff` — clause costs are still computed
/// so the caller can filter.
pub fn build_clauses(exp: &Exp) -> Vec<Clause> {
    let mut out = match &exp.kind {
        ExpKind::Null => vec![Clause { cost: 0.0, maxcost: 0.0, connectors: Vec::new() }],
        ExpKind::Connector(c) => vec![Clause {
            cost: 0.0,
            maxcost: 0.0,
            connectors: vec![Connector::new(c.name, c.direction, c.multi, c.length_limit)]
        }],
        ExpKind::Or(children) => {
            let mut v = Vec::new();
            for child in children {
                v.extend(build_clauses(child));
            }
            v
        }
        ExpKind::And(children) => {
            let mut acc = vec![Clause { cost: 0.0, maxcost: 0.0, connectors: Vec::new() }];
            for child in children {
                let child_clauses = build_clauses(child);
                let mut next = Vec::with_capacity(acc.len() * child_clauses.len().max(1));
                for a in &acc {
                    for b in &child_clauses {
                        let mut connectors = a.connectors.clone();
                        connectors.extend(b.connectors.iter().cloned());
                        next.push(Clause {
                            cost: a.cost + b.cost,
                            maxcost: a.maxcost.max(b.maxcost),
                            connectors
                        });
                    }
                }
                acc = next;
            }
            acc
        }
    };
    for c in &mut out {
        c.cost += exp.cost;
        c.maxcost = c.maxcost.max(exp.cost);
    }
    out
}

/// A word's per-disjunct alternative: a left jet (left-pointing
/// connectors, nearest-to-owner first) and a right jet (right-pointing,
/// nearest-to-owner first), a cost, and a back-pointer to the owning
/// word's interned surface string.
#[derive(Clone, Debug)]
pub struct Disjunct {
    pub left_jet: Vec<Connector>,
    pub right_jet: Vec<Connector>,
    pub cost: f32,
    pub word: Sym
}

impl Disjunct {
    pub fn is_empty(&self) -> bool {
        self.left_jet.is_empty() && self.right_jet.is_empty()
    }
}

fn clause_to_disjunct(word: Sym, clause: &Clause) -> Disjunct {
    let mut left_jet: Vec<Connector> = clause
        .connectors
        .iter()
        .filter(|c| c.direction == Direction::Left)
        .cloned()
        .collect();
    // Clause order is left-to-right as written; the left jet is stored
    // nearest-to-owner first, which is the *reverse* of that order.
    left_jet.reverse();
    let right_jet: Vec<Connector> = clause
        .connectors
        .iter()
        .filter(|c| c.direction == Direction::Right)
        .cloned()
        .collect();
    Disjunct { left_jet, right_jet, cost: clause.cost, word }
}

fn jet_key(jet: &[Connector]) -> Vec<(Sym, Direction, bool, u16)> {
    jet.iter().map(|c| (c.name, c.direction, c.multi, c.length_limit)).collect()
}

/// Collapse structurally-identical disjuncts (spec.md §4.D
/// de-duplication): same cost bit-pattern, same two jets by
/// (name, direction, multi, length_limit).
pub fn dedup_disjuncts(disjuncts: &mut Vec<Disjunct>) {
    let mut seen = HashSet::new();
    disjuncts.retain(|d| {
        let key = (d.cost.to_bits(), jet_key(&d.left_jet), jet_key(&d.right_jet));
        seen.insert(key)
    });
}

/// Compile `exp` (the dictionary expression for `word`) into its
/// deduplicated disjunct list, dropping any clause whose `maxcost`
/// exceeds `cost_cutoff` (the `disjunct_cost` parse option).
pub fn build_disjuncts(word: Sym, exp: &Exp, cost_cutoff: f32) -> Vec<Disjunct> {
    let clauses = build_clauses(exp);
    let mut disjuncts: Vec<Disjunct> = clauses
        .iter()
        .filter(|cl| cl.maxcost <= cost_cutoff)
        .map(|cl| clause_to_disjunct(word, cl))
        .collect();
    dedup_disjuncts(&mut disjuncts);
    disjuncts
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::intern::StringPool;

    fn leaf(pool: &mut StringPool, name: &str, dir: Direction) -> Exp {
        let sym = pool.intern(name);
        Exp::connector(0.0, sym, dir, false, u16::MAX)
    }

    #[test]
    fn and_of_left_and_right_splits_into_jets() {
        let mut pool = StringPool::new();
        let word = pool.intern("cat");
        let a = leaf(&mut pool, "D", Direction::Left);
        let b = leaf(&mut pool, "S", Direction::Right);
        let exp = Exp::and(0.0, vec![a, b]);
        let ds = build_disjuncts(word, &exp, f32::MAX);
        assert_eq!(ds.len(), 1);
        assert_eq!(ds[0].left_jet.len(), 1);
        assert_eq!(ds[0].right_jet.len(), 1);
        assert_eq!(pool.resolve(ds[0].left_jet[0].name), "D");
        assert_eq!(pool.resolve(ds[0].right_jet[0].name), "S");
    }

    #[test]
    fn or_produces_one_disjunct_per_branch() {
        let mut pool = StringPool::new();
        let word = pool.intern("run");
        let a = leaf(&mut pool, "A", Direction::Right);
        let b = leaf(&mut pool, "B", Direction::Right);
        let exp = Exp::or(0.0, vec![a, b]);
        let ds = build_disjuncts(word, &exp, f32::MAX);
        assert_eq!(ds.len(), 2);
    }

    #[test]
    fn cost_cutoff_drops_expensive_clauses() {
        let mut pool = StringPool::new();
        let word = pool.intern("w");
        let cheap = leaf(&mut pool, "A", Direction::Right);
        let mut costly = leaf(&mut pool, "B", Direction::Right);
        costly.cost = 5.0;
        let exp = Exp::or(0.0, vec![cheap, costly]);
        let ds = build_disjuncts(word, &exp, 1.0);
        assert_eq!(ds.len(), 1);
        assert_eq!(pool.resolve(ds[0].right_jet[0].name), "A");
    }

    #[test]
    fn identical_disjuncts_collapse() {
        let mut pool = StringPool::new();
        let word = pool.intern("w");
        let a1 = leaf(&mut pool, "A", Direction::Right);
        let a2 = leaf(&mut pool, "A", Direction::Right);
        let exp = Exp::or(0.0, vec![a1, a2]);
        let ds = build_disjuncts(word, &exp, f32::MAX);
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn left_jet_is_nearest_first() {
        let mut pool = StringPool::new();
        let word = pool.intern("w");
        // Clause order left-to-right: D- then C- ("D C" both pointing left).
        let d = leaf(&mut pool, "D", Direction::Left);
        let c = leaf(&mut pool, "C", Direction::Left);
        let exp = Exp::and(0.0, vec![d, c]);
        let ds = build_disjuncts(word, &exp, f32::MAX);
        // nearest-to-owner first means the *last*-written connector (C) comes first.
        assert_eq!(pool.resolve(ds[0].left_jet[0].name), "C");
        assert_eq!(pool.resolve(ds[0].left_jet[1].name), "D");
    }
}
