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

//! §4.F: power pruning. Tightens each surviving connector's
//! `nearest_word`/`farthest_word` reach bounds and drops any disjunct
//! that has a connector no partner can ever satisfy.
//!
//! This is a complexity-simplified reimplementation: rather than
//! maintaining the original's per-word `L_table`/`R_table` hashed by
//! uppercase prefix and alternating explicit left-to-right /
//! right-to-left passes, it recomputes reachability directly against
//! the current (shrinking) disjunct lists to a fixpoint. The two are
//! observationally equivalent for spec.md §8 property 3 (pruning is a
//! conservative filter): both converge to "every surviving connector
//! has at least one still-alive, in-range, name-matching partner", and
//! both monotonically shrink the disjunct sets on each iteration.

use lg_expr::{connectors_match, Disjunct};

#[derive(Clone, Copy, Debug)]
pub struct PowerPruneOptions {
    pub islands_ok: bool
}

impl Default for PowerPruneOptions {
    fn default() -> Self {
        PowerPruneOptions { islands_ok: false }
    }
}

/// spec.md §4.F's five consistency conditions between a connector `l`
/// on word `lw` and a candidate partner `r` on word `rw` (`lw < rw`),
/// minus the bound-based conditions that are achieved for free by this
/// module's fixpoint iteration (see module docs).
#[allow(clippy::too_many_arguments)]
fn consistent(lw: usize, rw: usize, l_shallow: bool, l_deepest: bool, l_multi: bool, l_limit: u16, r_shallow: bool, r_deepest: bool, r_multi: bool, r_limit: u16, islands_ok: bool) -> bool {
    if !l_shallow && !r_shallow {
        return false;
    }
    if rw - lw == 1 && !(l_deepest && r_deepest) {
        return false;
    }
    if !islands_ok && !(l_deepest && r_deepest) && !l_multi && !r_multi {
        return false;
    }
    let limit = l_limit.min(r_limit);
    (rw - lw) as u16 <= limit
}

/// Does any disjunct on `words[w2]` (for `w2` in `range`) have an
/// opposite-direction connector consistent with `(w, c)`? If so, widen
/// `nearest`/`farthest` (word-index bounds, in the direction away from
/// `w`) and return true.
#[allow(clippy::too_many_arguments)]
fn scan_side(
    pool: &lg_expr::StringPool,
    words: &[Vec<Disjunct>],
    w: usize,
    name: &str,
    shallow: bool,
    deepest: bool,
    multi: bool,
    limit: u16,
    range: std::ops::Range<usize>,
    left_partner: bool,
    islands_ok: bool
) -> Option<(u32, u32)> {
    let mut nearest: Option<u32> = None;
    let mut farthest: Option<u32> = None;
    for w2 in range {
        for d2 in &words[w2] {
            let jet = if left_partner { &d2.right_jet } else { &d2.left_jet };
            for (ci2, c2) in jet.iter().enumerate() {
                let is_shallow2 = ci2 == 0;
                let is_deepest2 = ci2 == jet.len() - 1;
                let (lw, rw, ls, ld, lm, ll, rs, rd, rm, rl) = if left_partner {
                    (w2, w, is_shallow2, is_deepest2, c2.multi, c2.length_limit, shallow, deepest, multi, limit)
                } else {
                    (w, w2, shallow, deepest, multi, limit, is_shallow2, is_deepest2, c2.multi, c2.length_limit)
                };
                if !connectors_match(name, pool.resolve(c2.name)) {
                    continue;
                }
                if !consistent(lw, rw, ls, ld, lm, ll, rs, rd, rm, rl, islands_ok) {
                    continue;
                }
                let w2u = w2 as u32;
                nearest = Some(match nearest {
                    None => w2u,
                    Some(n) => {
                        if left_partner {
                            n.max(w2u)
                        } else {
                            n.min(w2u)
                        }
                    }
                });
                farthest = Some(match farthest {
                    None => w2u,
                    Some(f) => {
                        if left_partner {
                            f.min(w2u)
                        } else {
                            f.max(w2u)
                        }
                    }
                });
            }
        }
    }
    nearest.zip(farthest)
}

/// Prune every word's disjunct list to a fixpoint (spec.md §4.F
/// "Termination: no bound changed and no disjunct killed in the last
/// pass").
pub fn power_prune(pool: &lg_expr::StringPool, words: &mut [Vec<Disjunct>], opts: PowerPruneOptions) {
    loop {
        let mut changed = false;
        for w in 0..words.len() {
            let mut kill = Vec::new();
            for di in 0..words[w].len() {
                let mut dead = false;
                let left_len = words[w][di].left_jet.len();
                for ci in 0..left_len {
                    let (name, limit, multi) = {
                        let c = &words[w][di].left_jet[ci];
                        (pool.resolve(c.name).to_string(), c.length_limit, c.multi)
                    };
                    let shallow = ci == 0;
                    let deepest = ci == left_len - 1;
                    match scan_side(pool, words, w, &name, shallow, deepest, multi, limit, 0..w, true, opts.islands_ok) {
                        Some((nearest, farthest)) => {
                            let c = &mut words[w][di].left_jet[ci];
                            if c.nearest_word != Some(nearest) || c.farthest_word != Some(farthest) {
                                changed = true;
                            }
                            c.nearest_word = Some(nearest);
                            c.farthest_word = Some(farthest);
                        }
                        None => {
                            dead = true;
                            break;
                        }
                    }
                }
                if !dead {
                    let right_len = words[w][di].right_jet.len();
                    for ci in 0..right_len {
                        let (name, limit, multi) = {
                            let c = &words[w][di].right_jet[ci];
                            (pool.resolve(c.name).to_string(), c.length_limit, c.multi)
                        };
                        let shallow = ci == 0;
                        let deepest = ci == right_len - 1;
                        match scan_side(pool, words, w, &name, shallow, deepest, multi, limit, (w + 1)..words.len(), false, opts.islands_ok) {
                            Some((nearest, farthest)) => {
                                let c = &mut words[w][di].right_jet[ci];
                                if c.nearest_word != Some(nearest) || c.farthest_word != Some(farthest) {
                                    changed = true;
                                }
                                c.nearest_word = Some(nearest);
                                c.farthest_word = Some(farthest);
                            }
                            None => {
                                dead = true;
                                break;
                            }
                        }
                    }
                }
                if dead {
                    kill.push(di);
                }
            }
            if !kill.is_empty() {
                changed = true;
                for &di in kill.iter().rev() {
                    words[w].remove(di);
                }
            }
        }
        if !changed {
            break;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use lg_expr::{Connector, Direction, StringPool};

    fn disjunct(pool: &mut StringPool, left: &[&str], right: &[&str]) -> Disjunct {
        let word = pool.intern("w");
        Disjunct {
            left_jet: left.iter().map(|n| Connector::new(pool.intern(n), Direction::Left, false, u16::MAX)).collect(),
            right_jet: right.iter().map(|n| Connector::new(pool.intern(n), Direction::Right, false, u16::MAX)).collect(),
            cost: 0.0,
            word
        }
    }

    #[test]
    fn unreachable_connector_kills_disjunct() {
        let mut pool = StringPool::new();
        let w0 = disjunct(&mut pool, &[], &["Z"]);
        let w1 = disjunct(&mut pool, &["S"], &[]);
        let mut words = vec![vec![w0], vec![w1]];
        power_prune(&pool, &mut words, PowerPruneOptions::default());
        assert!(words[0].is_empty());
        assert!(words[1].is_empty());
    }

    #[test]
    fn reachable_pair_survives_and_gets_bounds() {
        let mut pool = StringPool::new();
        let w0 = disjunct(&mut pool, &[], &["S"]);
        let w1 = disjunct(&mut pool, &["S"], &[]);
        let mut words = vec![vec![w0], vec![w1]];
        power_prune(&pool, &mut words, PowerPruneOptions::default());
        assert_eq!(words[0].len(), 1);
        assert_eq!(words[1].len(), 1);
        assert_eq!(words[0][0].right_jet[0].nearest_word, Some(1));
        assert_eq!(words[1][0].left_jet[0].nearest_word, Some(0));
    }

    #[test]
    fn adjacent_non_deepest_connector_is_inconsistent() {
        // word0's right connector is not deepest (there's another
        // connector behind it) while word1 is immediately adjacent:
        // spec.md's "if lw+1 = rw then both are deepest" rule kills it.
        let mut pool = StringPool::new();
        let w0 = disjunct(&mut pool, &[], &["S", "O"]);
        let w1 = disjunct(&mut pool, &["S"], &[]);
        let mut words = vec![vec![w0], vec![w1]];
        power_prune(&pool, &mut words, PowerPruneOptions::default());
        assert!(words[0].is_empty());
        assert!(words[1].is_empty());
    }
}
