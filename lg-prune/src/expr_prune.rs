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

//! §4.E: expression pruning. A connector is *live* iff some connector
//! on some word on the other side could match it; dead connectors
//! collapse their owning node (and ancestors) to `Null`.

use fnv::FnvHashSet;
use lg_expr::{connectors_match, Direction, Exp, ExpKind, StringPool};

/// Prune every word's expression list to a fixpoint (spec.md §4.E:
/// "Repeat until a sweep changes nothing").
pub fn prune_expressions(pool: &StringPool, word_exps: &mut [Vec<Exp>]) {
    loop {
        let mut changed = false;

        // L->R: a `-` connector is dead unless some `+` connector to its
        // left has already been seen.
        let mut seen_right: FnvHashSet<String> = FnvHashSet::default();
        for exps in word_exps.iter_mut() {
            for e in exps.iter_mut() {
                let (new_e, ch) = purge(pool, e, Direction::Left, &seen_right);
                changed |= ch;
                *e = new_e;
            }
            for e in exps.iter() {
                collect_names(pool, e, Direction::Right, &mut seen_right);
            }
        }

        // R->L: symmetric, sweeping from the right.
        let mut seen_left: FnvHashSet<String> = FnvHashSet::default();
        for exps in word_exps.iter_mut().rev() {
            for e in exps.iter_mut() {
                let (new_e, ch) = purge(pool, e, Direction::Right, &seen_left);
                changed |= ch;
                *e = new_e;
            }
            for e in exps.iter() {
                collect_names(pool, e, Direction::Left, &mut seen_left);
            }
        }

        if !changed {
            break;
        }
    }
}

/// Rebuild `exp` with any connector of `dead_direction` not matched by
/// `seen` collapsed to `Null`, propagating the collapse per spec.md
/// §4.E's `purge` (And-with-null -> null, Or drops null operands,
/// single-operand And/Or simplifies). Returns the rebuilt tree and
/// whether anything changed; a collapsed wrapper node folds its own
/// cost into the surviving child so later disjunct-cost accounting
/// (`lg-expr::disjunct::build_clauses`) stays correct.
fn purge(pool: &StringPool, exp: &Exp, dead_direction: Direction, seen: &FnvHashSet<String>) -> (Exp, bool) {
    match &exp.kind {
        ExpKind::Null => (exp.clone(), false),
        ExpKind::Connector(c) => {
            if c.direction == dead_direction {
                let name = pool.resolve(c.name);
                let live = seen.iter().any(|s| connectors_match(name, s));
                if !live {
                    return (Exp::null(exp.cost), true);
                }
            }
            (exp.clone(), false)
        }
        ExpKind::And(children) => {
            let mut changed = false;
            let mut new_children = Vec::with_capacity(children.len());
            let mut has_null = false;
            for c in children {
                let (nc, ch) = purge(pool, c, dead_direction, seen);
                changed |= ch;
                has_null |= nc.is_null();
                new_children.push(nc);
            }
            if has_null {
                return (Exp::null(exp.cost), true);
            }
            if new_children.len() == 1 {
                let mut only = new_children.into_iter().next().unwrap();
                only.cost += exp.cost;
                return (only, true);
            }
            (Exp { cost: exp.cost, kind: ExpKind::And(new_children) }, changed)
        }
        ExpKind::Or(children) => {
            let mut changed = false;
            let mut new_children = Vec::with_capacity(children.len());
            for c in children {
                let (nc, ch) = purge(pool, c, dead_direction, seen);
                changed |= ch;
                if nc.is_null() {
                    changed = true;
                } else {
                    new_children.push(nc);
                }
            }
            if new_children.is_empty() {
                return (Exp::null(exp.cost), true);
            }
            if new_children.len() == 1 {
                let mut only = new_children.into_iter().next().unwrap();
                only.cost += exp.cost;
                return (only, true);
            }
            (Exp { cost: exp.cost, kind: ExpKind::Or(new_children) }, changed)
        }
    }
}

/// Collect the names of every (still-live) connector of `direction`
/// reachable in `exp`, for seeding the opposite sweep's `seen` set.
fn collect_names(pool: &StringPool, exp: &Exp, direction: Direction, out: &mut FnvHashSet<String>) {
    match &exp.kind {
        ExpKind::Null => {}
        ExpKind::Connector(c) => {
            if c.direction == direction {
                out.insert(pool.resolve(c.name).to_string());
            }
        }
        ExpKind::And(children) | ExpKind::Or(children) => {
            for c in children {
                collect_names(pool, c, direction, out);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use lg_expr::Direction;

    fn conn(pool: &mut StringPool, name: &str, dir: Direction) -> Exp {
        let sym = pool.intern(name);
        Exp::connector(0.0, sym, dir, false, u16::MAX)
    }

    #[test]
    fn unmatched_connector_is_pruned_to_null() {
        let mut pool = StringPool::new();
        // word0 has a lone right-pointing "Z" connector that nothing
        // else in the sentence can ever match.
        let mut words = vec![vec![conn(&mut pool, "Z", Direction::Right)], vec![conn(&mut pool, "S", Direction::Left)]];
        prune_expressions(&pool, &mut words);
        assert!(words[0][0].is_null());
        assert!(words[1][0].is_null());
    }

    #[test]
    fn matched_pair_survives() {
        let mut pool = StringPool::new();
        let mut words = vec![vec![conn(&mut pool, "S", Direction::Right)], vec![conn(&mut pool, "S", Direction::Left)]];
        prune_expressions(&pool, &mut words);
        assert!(!words[0][0].is_null());
        assert!(!words[1][0].is_null());
    }

    #[test]
    fn and_with_dead_operand_collapses_whole_node() {
        let mut pool = StringPool::new();
        let live = conn(&mut pool, "S", Direction::Right);
        let dead = conn(&mut pool, "Z", Direction::Right);
        let and_exp = Exp::and(0.0, vec![live, dead]);
        let mut words = vec![vec![and_exp], vec![conn(&mut pool, "S", Direction::Left)]];
        prune_expressions(&pool, &mut words);
        assert!(words[0][0].is_null());
    }
}
