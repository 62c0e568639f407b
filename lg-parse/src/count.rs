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

//! §4.I: the memoized counting recursion. `count(lw, rw, lc, rc, n)` is
//! the number of planar linkages of words `lw+1..rw-1` with boundary
//! obligations `lc`/`rc` and exactly `n` null-linked words.

use std::time::Instant;

use fnv::FnvHashMap;
use lg_expr::{Disjunct, StringPool};
use lg_prune::FastMatchIndex;
use log::{debug, trace};

use crate::conn_ref::{do_match, ConnRef, WordIdx};
use crate::options::ResourceLimits;

/// `lw = None` is the left-wall sentinel (`-1` in the original source;
/// spec.md §9 recommends an explicit variant over the sentinel int).
pub type LeftBound = Option<WordIdx>;

fn left_bound_next(lw: LeftBound) -> WordIdx {
    match lw {
        None => 0,
        Some(w) => w + 1
    }
}

#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct CountKey {
    pub lw: LeftBound,
    pub rw: WordIdx,
    pub lc: Option<ConnRef>,
    pub rc: Option<ConnRef>,
    pub null_count: u32
}

/// spec.md §4.I "Clamp total at INT_MAX to guard overflow."
pub const MAX_COUNT: u64 = i32::MAX as u64;

/// Every `CHECK_STRIDE`-th memo miss, the counter polls the resource
/// budget (spec.md §4.I "Resource check", §5 "every ~450 000 memo
/// lookups"). Kept far smaller here since a Rust reimplementation's
/// per-lookup cost differs from the C original's; the stride is a
/// tuning constant, not semantics.
const CHECK_STRIDE: u32 = 4096;

/// §4.I + §9's memo-sizing note ("roughly 2^(12 + L/4), capped at
/// 2^24"): the engine instead uses an open-growth `FnvHashMap`, which
/// self-sizes; the constant is kept only as the `with_capacity` hint so
/// the first few resizes are avoided on longer sentences.
pub fn memo_capacity_hint(sentence_len: usize) -> usize {
    let shift = if sentence_len >= 10 { 12 + sentence_len / 4 } else { 12 };
    1usize << shift.min(20)
}

/// Owns the counting memo and the resource-exhaustion flag for one
/// sentence's parse at one `null_count`. Shared (immutably, bar the
/// memo) by `lg_parse::parse_set`'s second pass, which re-derives
/// `Parse_set`s from the same counts.
pub struct CountEngine<'a> {
    pub pool: &'a StringPool,
    pub words: &'a [Vec<Disjunct>],
    pub matcher: &'a FastMatchIndex,
    pub islands_ok: bool,
    memo: FnvHashMap<CountKey, u64>,
    limits: ResourceLimits,
    started: Instant,
    misses: u32,
    exhausted: bool
}

impl<'a> CountEngine<'a> {
    pub fn new(pool: &'a StringPool, words: &'a [Vec<Disjunct>], matcher: &'a FastMatchIndex, islands_ok: bool, limits: ResourceLimits) -> Self {
        CountEngine {
            pool,
            words,
            matcher,
            islands_ok,
            memo: FnvHashMap::with_capacity_and_hasher(memo_capacity_hint(words.len()), Default::default()),
            limits,
            started: Instant::now(),
            misses: 0,
            exhausted: false
        }
    }

    pub fn exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn lookup(&self, key: &CountKey) -> Option<u64> {
        self.memo.get(key).copied()
    }

    /// §4.I "Pseudocount optimization": a negative lookup (not in the
    /// memo) does not prove the subproblem is non-zero; only a present
    /// zero entry does.
    pub fn pseudocount(&self, lw: LeftBound, rw: WordIdx, lc: Option<ConnRef>, rc: Option<ConnRef>, null_count: u32) -> bool {
        match self.lookup(&CountKey { lw, rw, lc, rc, null_count }) {
            Some(0) => false,
            _ => true
        }
    }

    fn poll_resources(&mut self) {
        self.misses += 1;
        if self.misses % CHECK_STRIDE != 0 {
            return;
        }
        if let Some(max) = self.limits.max_parse_time {
            if self.started.elapsed() > max {
                debug!("counting recursion exhausted its time budget; short-circuiting remaining subproblems to zero");
                self.exhausted = true;
            }
        }
    }

    /// spec.md §4.I recurrence.
    pub fn count(&mut self, lw: LeftBound, rw: WordIdx, lc: Option<ConnRef>, rc: Option<ConnRef>, null_count: u32) -> u64 {
        let key = CountKey { lw, rw, lc, rc, null_count };
        if let Some(c) = self.memo.get(&key) {
            return *c;
        }

        self.poll_resources();
        if self.exhausted {
            self.memo.insert(key, 0);
            return 0;
        }

        let result = self.compute(lw, rw, lc, rc, null_count);
        self.memo.insert(key, result);
        result
    }

    fn compute(&mut self, lw: LeftBound, rw: WordIdx, lc: Option<ConnRef>, rc: Option<ConnRef>, null_count: u32) -> u64 {
        if rw == left_bound_next(lw) {
            return if lc.is_none() && rc.is_none() && null_count == 0 { 1 } else { 0 };
        }

        if lc.is_none() && rc.is_none() {
            if !self.islands_ok && lw.is_some() {
                let lw_i = lw.unwrap() as i64;
                let expected = rw as i64 - lw_i - 1;
                return if expected >= 0 && null_count as i64 == expected { 1 } else { 0 };
            }
            if null_count == 0 {
                return 0;
            }
            let w = left_bound_next(lw);
            let mut total = 0u64;
            for di in 0..self.words[w].len() {
                if self.words[w][di].left_jet.is_empty() {
                    let head = if self.words[w][di].right_jet.is_empty() { None } else { Some(ConnRef::shallow(w, di, lg_expr::Direction::Right)) };
                    let c = self.count(Some(w), rw, head, None, null_count - 1);
                    total = total.saturating_add(c).min(MAX_COUNT);
                }
            }
            let c = self.count(Some(w), rw, None, None, null_count - 1);
            total = total.saturating_add(c).min(MAX_COUNT);
            return total;
        }

        let start_word = match lc {
            Some(c) => c.connector(self.words).nearest_word.map(|n| n as usize).unwrap_or(left_bound_next(lw)),
            None => left_bound_next(lw)
        };
        let end_word = match rc {
            Some(c) => c.connector(self.words).nearest_word.map(|n| n as usize + 1).unwrap_or(rw),
            None => rw
        };

        let mut total = 0u64;
        for w in start_word..end_word.min(rw) {
            let lc_conn = lc.map(|r| *r.connector(self.words));
            let rc_conn = rc.map(|r| *r.connector(self.words));
            let matches = self.matcher.form_match_list(self.pool, self.words, w, lc_conn.as_ref(), rc_conn.as_ref());
            for di in matches {
                let left_head = if self.words[w][di].left_jet.is_empty() { None } else { Some(ConnRef::shallow(w, di, lg_expr::Direction::Left)) };
                let right_head = if self.words[w][di].right_jet.is_empty() { None } else { Some(ConnRef::shallow(w, di, lg_expr::Direction::Right)) };

                let lw_bound = lw.unwrap_or(usize::MAX); // only used when lc is Some, in which case lw is Some too for do_match's aw
                let l_match = lc.is_some() && left_head.is_some() && do_match(self.pool, self.words, lc, left_head, lw_bound, w);
                let r_match = right_head.is_some() && rc.is_some() && do_match(self.pool, self.words, right_head, rc, w, rw);

                let words = self.words;
                for null_l in 0..=null_count {
                    let null_r = null_count - null_l;
                    let mut left_pcount = false;
                    let mut right_pcount = false;

                    let left_variants = multi_variants(words, lc, left_head);
                    let right_variants = multi_variants(words, right_head, rc);

                    if l_match {
                        for &(lc_v, lh_v) in &left_variants {
                            if self.pseudocount(lw, Some(w).unwrap(), lc_v, lh_v, null_l) {
                                left_pcount = true;
                                break;
                            }
                        }
                    }
                    if r_match {
                        for &(rh_v, rc_v) in &right_variants {
                            if self.pseudocount(Some(w), rw, rh_v, rc_v, null_r) {
                                right_pcount = true;
                                break;
                            }
                        }
                    }

                    let mut pseudototal = left_pcount && right_pcount;
                    if !pseudototal && left_pcount {
                        pseudototal = self.pseudocount(Some(w), rw, right_head, rc, null_r);
                    }
                    if !pseudototal && lc.is_none() && right_pcount {
                        pseudototal = self.pseudocount(lw, Some(w).unwrap(), lc, left_head, null_l);
                    }
                    if !pseudototal {
                        continue;
                    }

                    let mut left_count = 0u64;
                    if l_match {
                        for &(lc_v, lh_v) in &left_variants {
                            left_count = left_count.saturating_add(self.count_boundary(lw, w, lc_v, lh_v, null_l));
                        }
                    }
                    let mut right_count = 0u64;
                    if r_match {
                        for &(rh_v, rc_v) in &right_variants {
                            right_count = right_count.saturating_add(self.count_boundary_right(w, rw, rh_v, rc_v, null_r));
                        }
                    }

                    total = total.saturating_add(left_count.saturating_mul(right_count)).min(MAX_COUNT);

                    if left_count > 0 {
                        let c = self.count(Some(w), rw, right_head, rc, null_r);
                        total = total.saturating_add(left_count.saturating_mul(c)).min(MAX_COUNT);
                    }
                    if lc.is_none() && right_count > 0 {
                        let c = self.count(lw, w, lc, left_head, null_l);
                        total = total.saturating_add(right_count.saturating_mul(c)).min(MAX_COUNT);
                    }

                    if total >= MAX_COUNT {
                        return MAX_COUNT;
                    }
                }
            }
        }
        total
    }

    #[allow(clippy::too_many_arguments)]
    fn count_boundary(&mut self, lw: LeftBound, w: WordIdx, lc_v: Option<ConnRef>, lh_v: Option<ConnRef>, null_l: u32) -> u64 {
        self.count(lw, w, lc_v, lh_v, null_l)
    }

    fn count_boundary_right(&mut self, w: WordIdx, rw: WordIdx, rh_v: Option<ConnRef>, rc_v: Option<ConnRef>, null_r: u32) -> u64 {
        self.count(w, rw, rh_v, rc_v, null_r)
    }
}

/// The `(a', b')` multi-connector variants spec.md §4.I lists: advancing
/// a multi-connector to its successor still leaves it available, so a
/// `multi` connector contributes an extra variant alongside the
/// always-present "both advance" one. Mirrors `count.c`'s `leftcount`
/// accumulation over `le`/`le->next` and `d->left`/`d->left->next`
/// (here generalised to either side by passing `(lc, left_head)` or
/// `(right_head, rc)`). Not deduplicated: a `multi` connector's extra
/// variant is a genuinely distinct subproblem from the advance-both one,
/// and both must be summed.
pub(crate) fn multi_variants(words: &[Vec<Disjunct>], a: Option<ConnRef>, b: Option<ConnRef>) -> Vec<(Option<ConnRef>, Option<ConnRef>)> {
    let a_next = a.and_then(|r| r.next(words));
    let b_next = b.and_then(|r| r.next(words));
    let a_multi = a.map(|r| r.multi(words)).unwrap_or(false);
    let b_multi = b.map(|r| r.multi(words)).unwrap_or(false);

    let mut out = vec![(a_next, b_next)];
    if a_multi {
        out.push((a, b_next));
    }
    if b_multi {
        out.push((a_next, b));
    }
    if a_multi && b_multi {
        out.push((a, b));
    }
    out
}
