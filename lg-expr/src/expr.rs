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

//! The expression AST that dictionary entries compile down from
//! (spec.md §3): `AND`/`OR`/`CONNECTOR`/`NULL`, each node carrying a
//! non-negative cost.

use crate::connector::Direction;
use crate::intern::{StringPool, Sym};

/// The connector payload of an `ExpKind::Connector` leaf. Distinct from
/// [`crate::connector::Connector`]: an `ExpConnector` has no
/// `nearest_word`/`farthest_word` yet — those only exist once a
/// connector has been placed on a concrete [`crate::disjunct::Disjunct`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct ExpConnector {
    pub name: Sym,
    pub direction: Direction,
    pub multi: bool,
    pub length_limit: u16
}

#[derive(Clone, Debug)]
pub enum ExpKind {
    Connector(ExpConnector),
    And(Vec<Exp>),
    Or(Vec<Exp>),
    Null
}

/// One node of the expression tree. Trees are immutable once built;
/// pruning (`lg-prune`) produces new trees rather than mutating in place.
#[derive(Clone, Debug)]
pub struct Exp {
    pub cost: f32,
    pub kind: ExpKind
}

impl Exp {
    pub fn connector(cost: f32, name: Sym, direction: Direction, multi: bool, length_limit: u16) -> Self {
        Exp {
            cost,
            kind: ExpKind::Connector(ExpConnector { name, direction, multi, length_limit })
        }
    }

    pub fn and(cost: f32, children: Vec<Exp>) -> Self {
        debug_assert!(!children.is_empty(), "And operands must not be empty");
        Exp { cost, kind: ExpKind::And(children) }
    }

    pub fn or(cost: f32, children: Vec<Exp>) -> Self {
        debug_assert!(!children.is_empty(), "Or operands must not be empty");
        Exp { cost, kind: ExpKind::Or(children) }
    }

    /// `Or([And([])])`: the idiom for "this connector sequence is
    /// optional" (spec.md §3 invariants).
    pub fn optional(cost: f32, inner: Exp) -> Self {
        Exp::or(cost, vec![inner, Exp { cost: 0.0, kind: ExpKind::And(Vec::new()) }])
    }

    pub fn null(cost: f32) -> Self {
        Exp { cost, kind: ExpKind::Null }
    }

    pub fn is_null(&self) -> bool {
        matches!(self.kind, ExpKind::Null)
    }

    /// Closed-form disjunct count ignoring cost cutoff (spec.md §8
    /// property 2): used by tests to check the compiler against this
    /// invariant without materializing disjuncts.
    pub fn disjunct_count(&self) -> u64 {
        match &self.kind {
            ExpKind::Null => 1,
            ExpKind::Connector(_) => 1,
            ExpKind::Or(children) => children.iter().map(Exp::disjunct_count).sum(),
            ExpKind::And(children) => children.iter().map(Exp::disjunct_count).product::<u64>().max(1)
        }
    }
}

/// A dictionary's boolean-like formula (spec.md §1 item 2: "dictionary
/// boolean-like formulas"), expressed with plain connector-name strings
/// rather than interned `Sym`s. This is the format the external
/// `Dictionary` collaborator (see `lg-dict`) hands to the core; the core
/// owns turning it into an [`Exp`] against its own sentence-scoped
/// [`StringPool`]. Keeping the two types distinct is what lets a
/// dictionary be shared, read-only, across many concurrently-parsing
/// sentences (spec.md §5) without sharing an intern pool.
#[derive(Clone, Debug)]
pub enum SurfaceExpKind {
    Connector { name: String, direction: Direction, multi: bool, length_limit: u16 },
    And(Vec<SurfaceExp>),
    Or(Vec<SurfaceExp>),
    Null
}

#[derive(Clone, Debug)]
pub struct SurfaceExp {
    pub cost: f32,
    pub kind: SurfaceExpKind
}

impl SurfaceExp {
    pub fn connector(cost: f32, name: impl Into<String>, direction: Direction, multi: bool, length_limit: u16) -> Self {
        SurfaceExp {
            cost,
            kind: SurfaceExpKind::Connector { name: name.into(), direction, multi, length_limit }
        }
    }

    pub fn and(cost: f32, children: Vec<SurfaceExp>) -> Self {
        SurfaceExp { cost, kind: SurfaceExpKind::And(children) }
    }

    pub fn or(cost: f32, children: Vec<SurfaceExp>) -> Self {
        SurfaceExp { cost, kind: SurfaceExpKind::Or(children) }
    }

    pub fn null(cost: f32) -> Self {
        SurfaceExp { cost, kind: SurfaceExpKind::Null }
    }

    /// §4.D's "expression-to-disjunct compiler" entry point: intern this
    /// formula's connector names into `pool` and produce the immutable
    /// [`Exp`] tree the rest of the pipeline works with.
    pub fn compile(&self, pool: &mut StringPool) -> Exp {
        let kind = match &self.kind {
            SurfaceExpKind::Null => ExpKind::Null,
            SurfaceExpKind::Connector { name, direction, multi, length_limit } => {
                let sym = pool.intern(name);
                ExpKind::Connector(ExpConnector { name: sym, direction: *direction, multi: *multi, length_limit: *length_limit })
            }
            SurfaceExpKind::And(children) => ExpKind::And(children.iter().map(|c| c.compile(pool)).collect()),
            SurfaceExpKind::Or(children) => ExpKind::Or(children.iter().map(|c| c.compile(pool)).collect())
        };
        Exp { cost: self.cost, kind }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::intern::StringPool;

    fn conn(pool: &mut StringPool, name: &str, dir: Direction) -> Exp {
        let sym = pool.intern(name);
        Exp::connector(0.0, sym, dir, false, u16::MAX)
    }

    #[test]
    fn disjunct_count_matches_closed_form() {
        let mut pool = StringPool::new();
        let a = conn(&mut pool, "A", Direction::Left);
        let b = conn(&mut pool, "B", Direction::Right);
        let c = conn(&mut pool, "C", Direction::Right);
        let or_bc = Exp::or(0.0, vec![b, c]);
        let and_expr = Exp::and(0.0, vec![a, or_bc]);
        // A & (B or C) => 2 disjuncts
        assert_eq!(and_expr.disjunct_count(), 2);
    }

    #[test]
    fn surface_exp_compiles_and_interns() {
        let mut pool = StringPool::new();
        let surface = SurfaceExp::and(
            0.0,
            vec![
                SurfaceExp::connector(0.0, "Ds", Direction::Left, false, u16::MAX),
                SurfaceExp::connector(0.1, "Ss", Direction::Right, false, u16::MAX),
            ]
        );
        let exp = surface.compile(&mut pool);
        match &exp.kind {
            ExpKind::And(children) => {
                assert_eq!(children.len(), 2);
                match &children[0].kind {
                    ExpKind::Connector(c) => assert_eq!(pool.resolve(c.name), "Ds"),
                    _ => panic!("expected connector")
                }
            }
            _ => panic!("expected And")
        }
    }
}
