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

//! §4.J: parse-set construction. Mirrors `count.rs`'s recursion exactly,
//! but instead of returning a count it builds an explicit DAG of
//! [`ParseSet`]/[`ParseChoice`] nodes, each annotated with the pair of
//! links it would contribute to a materialized linkage. Linkage
//! extraction (`extract.rs`) walks this DAG; it never touches `count.rs`
//! again.

use std::rc::Rc;

use fnv::FnvHashMap;
use lg_expr::{Direction, Disjunct, StringPool};
use lg_prune::FastMatchIndex;

use crate::conn_ref::{do_match, ConnRef, WordIdx};
use crate::count::{multi_variants, CountEngine, CountKey, LeftBound};

/// A disjunct occurrence: which word, which disjunct on that word. Used
/// to record which disjunct a linkage ultimately settles on for a word
/// (`ld`/`md`/`rd` in the original).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct DisjunctRef {
    pub word: WordIdx,
    pub disjunct: usize
}

impl DisjunctRef {
    fn from_conn(c: Option<ConnRef>) -> Option<DisjunctRef> {
        c.map(|c| DisjunctRef { word: c.word, disjunct: c.disjunct })
    }
}

/// One link a [`ParseChoice`] may emit. `lc.is_none()` means "no link
/// here" (the original's `NULL` `Connector *` convention for a link
/// field, not "no boundary connector"). `lw` is `None` only when the
/// link's left endpoint is the left-wall sentinel, which never happens
/// for an emitted link in practice (the wall is always a real word).
#[derive(Clone, Copy, Debug)]
pub struct ChoiceLink {
    pub lw: LeftBound,
    pub rw: WordIdx,
    pub lc: Option<ConnRef>,
    pub rc: Option<ConnRef>
}

/// One way to continue a parse from a given `(lw, rw, lc, rc, null_count)`
/// subproblem: a left continuation and a right continuation, each a
/// further [`ParseSet`], plus the (up to two) links this choice
/// contributes and the disjuncts it pins down.
pub struct ParseChoice {
    pub left_set: Rc<ParseSet>,
    pub left_link: ChoiceLink,
    pub right_set: Rc<ParseSet>,
    pub right_link: ChoiceLink,
    pub ld: Option<DisjunctRef>,
    pub md: Option<DisjunctRef>,
    pub rd: Option<DisjunctRef>
}

/// All the ways to continue a parse from one subproblem. `count` is the
/// subproblem's total (copied in from the counting memo so
/// [`extract.rs`]'s index arithmetic doesn't need a second lookup).
pub struct ParseSet {
    pub count: u64,
    pub choices: Vec<ParseChoice>
}

fn dummy_set() -> Rc<ParseSet> {
    Rc::new(ParseSet { count: 1, choices: Vec::new() })
}

fn empty_set(count: u64) -> ParseSet {
    ParseSet { count, choices: Vec::new() }
}

fn left_bound_next(lw: LeftBound) -> WordIdx {
    match lw {
        None => 0,
        Some(w) => w + 1
    }
}

/// Builds the parse-set DAG for one `null_count`, reusing a completed
/// [`CountEngine`]'s memo as the authority on which subproblems are
/// reachable at all (spec.md §4.J: "reuses the counts already computed").
pub struct ParseSetBuilder<'a> {
    pool: &'a StringPool,
    words: &'a [Vec<Disjunct>],
    matcher: &'a FastMatchIndex,
    counts: &'a CountEngine<'a>,
    islands_ok: bool,
    table: FnvHashMap<CountKey, Rc<ParseSet>>
}

impl<'a> ParseSetBuilder<'a> {
    pub fn new(pool: &'a StringPool, words: &'a [Vec<Disjunct>], matcher: &'a FastMatchIndex, counts: &'a CountEngine<'a>, islands_ok: bool) -> Self {
        ParseSetBuilder { pool, words, matcher, counts, islands_ok, table: FnvHashMap::default() }
    }

    /// Entry point. `null_count` is the caller-visible null-word target;
    /// the original passes `null_count + 1` to the first recursive call
    /// (`do_parse`'s `do_count(..., null_count+1)` convention), kept here
    /// for parity with `driver.rs`'s matching top-level `count()` call.
    pub fn build(&mut self, null_count: u32) -> Option<Rc<ParseSet>> {
        self.mk_parse_set(None, self.words.len(), None, None, null_count + 1)
    }

    fn head(&self, w: WordIdx, di: usize, side: Direction) -> Option<ConnRef> {
        let jet = match side {
            Direction::Left => &self.words[w][di].left_jet,
            Direction::Right => &self.words[w][di].right_jet
        };
        if jet.is_empty() {
            None
        } else {
            Some(ConnRef::shallow(w, di, side))
        }
    }

    fn mk_parse_set(&mut self, lw: LeftBound, rw: WordIdx, lc: Option<ConnRef>, rc: Option<ConnRef>, null_count: u32) -> Option<Rc<ParseSet>> {
        let key = CountKey { lw, rw, lc, rc, null_count };
        let count = self.counts.lookup(&key).unwrap_or(0);
        if count == 0 {
            return None;
        }

        if let Some(set) = self.table.get(&key) {
            return Some(Rc::clone(set));
        }

        let set = Rc::new(self.build_set(lw, rw, lc, rc, null_count, count));
        self.table.insert(key, Rc::clone(&set));
        Some(set)
    }

    fn build_set(&mut self, lw: LeftBound, rw: WordIdx, lc: Option<ConnRef>, rc: Option<ConnRef>, null_count: u32, count: u64) -> ParseSet {
        if rw == left_bound_next(lw) {
            return empty_set(count);
        }

        let mut set = empty_set(count);

        if lc.is_none() && rc.is_none() {
            if !self.islands_ok && lw.is_some() {
                return set;
            }
            if null_count == 0 {
                return set;
            }
            let w = left_bound_next(lw);
            for di in 0..self.words[w].len() {
                if self.words[w][di].left_jet.is_empty() {
                    let right_head = self.head(w, di, Direction::Right);
                    if let Some(rs) = self.mk_parse_set(Some(w), rw, right_head, None, null_count - 1) {
                        set.choices.push(ParseChoice {
                            left_set: dummy_set(),
                            left_link: ChoiceLink { lw, rw: w, lc: None, rc: None },
                            right_set: rs,
                            right_link: ChoiceLink { lw: Some(w), rw, lc: None, rc: None },
                            ld: None,
                            md: None,
                            rd: None
                        });
                    }
                }
            }
            if let Some(rs) = self.mk_parse_set(Some(w), rw, None, None, null_count - 1) {
                set.choices.push(ParseChoice {
                    left_set: dummy_set(),
                    left_link: ChoiceLink { lw, rw: w, lc: None, rc: None },
                    right_set: rs,
                    right_link: ChoiceLink { lw: Some(w), rw, lc: None, rc: None },
                    ld: None,
                    md: None,
                    rd: None
                });
            }
            return set;
        }

        let start_word = match lc {
            Some(c) => c.connector(self.words).nearest_word.map(|n| n as usize).unwrap_or(left_bound_next(lw)),
            None => left_bound_next(lw)
        };
        let end_word = match rc {
            Some(c) => c.connector(self.words).nearest_word.map(|n| n as usize + 1).unwrap_or(rw),
            None => rw
        };

        for w in start_word..end_word.min(rw) {
            let lc_conn = lc.map(|r| *r.connector(self.words));
            let rc_conn = rc.map(|r| *r.connector(self.words));
            let matches = self.matcher.form_match_list(self.pool, self.words, w, lc_conn.as_ref(), rc_conn.as_ref());

            for di in matches {
                let left_head = self.head(w, di, Direction::Left);
                let right_head = self.head(w, di, Direction::Right);
                let md = Some(DisjunctRef { word: w, disjunct: di });

                let lw_bound = lw.unwrap_or(usize::MAX);
                let l_match = lc.is_some() && left_head.is_some() && do_match(self.pool, self.words, lc, left_head, lw_bound, w);
                let r_match = right_head.is_some() && rc.is_some() && do_match(self.pool, self.words, right_head, rc, w, rw);

                for null_l in 0..=null_count {
                    let null_r = null_count - null_l;

                    let left_variants = if l_match { multi_variants(self.words, lc, left_head) } else { Vec::new() };
                    let right_variants = if r_match { multi_variants(self.words, right_head, rc) } else { Vec::new() };

                    let mut left_choices: Vec<(Rc<ParseSet>, Option<ConnRef>, Option<ConnRef>)> = Vec::new();
                    for &(lc_v, lh_v) in &left_variants {
                        if let Some(s) = self.mk_parse_set(lw, w, lc_v, lh_v, null_l) {
                            left_choices.push((s, lc_v, lh_v));
                        }
                    }
                    let mut right_choices: Vec<(Rc<ParseSet>, Option<ConnRef>, Option<ConnRef>)> = Vec::new();
                    for &(rh_v, rc_v) in &right_variants {
                        if let Some(s) = self.mk_parse_set(Some(w), rw, rh_v, rc_v, null_r) {
                            right_choices.push((s, rh_v, rc_v));
                        }
                    }

                    for (ls, lc_v, lh_v) in &left_choices {
                        for (rs, rh_v, rc_v) in &right_choices {
                            set.choices.push(ParseChoice {
                                left_set: Rc::clone(ls),
                                left_link: ChoiceLink { lw, rw: w, lc: *lc_v, rc: *lh_v },
                                right_set: Rc::clone(rs),
                                right_link: ChoiceLink { lw: Some(w), rw, lc: *rh_v, rc: *rc_v },
                                ld: DisjunctRef::from_conn(left_head),
                                md,
                                rd: DisjunctRef::from_conn(right_head)
                            });
                        }
                    }

                    if !left_choices.is_empty() {
                        if let Some(rset) = self.mk_parse_set(Some(w), rw, right_head, rc, null_r) {
                            for (ls, lc_v, _) in &left_choices {
                                set.choices.push(ParseChoice {
                                    left_set: Rc::clone(ls),
                                    left_link: ChoiceLink { lw, rw: w, lc: *lc_v, rc: None },
                                    right_set: Rc::clone(&rset),
                                    right_link: ChoiceLink { lw: Some(w), rw, lc: None, rc },
                                    ld: DisjunctRef::from_conn(left_head),
                                    md,
                                    rd: None
                                });
                            }
                        }
                    }
                    if lc.is_none() && !right_choices.is_empty() {
                        if let Some(lset) = self.mk_parse_set(lw, w, lc, left_head, null_l) {
                            for (rs, _, rc_v) in &right_choices {
                                set.choices.push(ParseChoice {
                                    left_set: Rc::clone(&lset),
                                    left_link: ChoiceLink { lw, rw: w, lc: None, rc: None },
                                    right_set: Rc::clone(rs),
                                    right_link: ChoiceLink { lw: Some(w), rw, lc: None, rc: *rc_v },
                                    ld: None,
                                    md,
                                    rd: DisjunctRef::from_conn(right_head)
                                });
                            }
                        }
                    }
                }
            }
        }

        set
    }
}
