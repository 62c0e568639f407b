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

//! §4.H: the fast-match index. For each word, two per-direction hash
//! tables keyed by the uppercase prefix of a disjunct's shallowest
//! connector in that direction, so `form_match_list` can narrow its
//! candidates before running the full connector-match test.

use fnv::{FnvHashMap, FnvHashSet};
use lg_expr::{connectors_match, Connector, Disjunct, StringPool};

fn uppercase_prefix(name: &str) -> &str {
    let len = name.bytes().take_while(|b| b.is_ascii_uppercase()).count();
    &name[..len]
}

/// Per-sentence index built once after pruning settles (spec.md §4.H).
/// `left_tables[w]`/`right_tables[w]` bucket `w`'s own disjunct indices
/// by the uppercase prefix of their shallowest left/right connector.
pub struct FastMatchIndex {
    left_tables: Vec<FnvHashMap<String, Vec<usize>>>,
    right_tables: Vec<FnvHashMap<String, Vec<usize>>>
}

impl FastMatchIndex {
    pub fn build(pool: &StringPool, words: &[Vec<Disjunct>]) -> Self {
        let mut left_tables = Vec::with_capacity(words.len());
        let mut right_tables = Vec::with_capacity(words.len());
        for disjuncts in words {
            let mut lt: FnvHashMap<String, Vec<usize>> = FnvHashMap::default();
            let mut rt: FnvHashMap<String, Vec<usize>> = FnvHashMap::default();
            for (di, d) in disjuncts.iter().enumerate() {
                if let Some(c) = d.left_jet.first() {
                    lt.entry(uppercase_prefix(pool.resolve(c.name)).to_string()).or_default().push(di);
                }
                if let Some(c) = d.right_jet.first() {
                    rt.entry(uppercase_prefix(pool.resolve(c.name)).to_string()).or_default().push(di);
                }
            }
            left_tables.push(lt);
            right_tables.push(rt);
        }
        FastMatchIndex { left_tables, right_tables }
    }

    /// spec.md §4.H `form_match_list`: the disjuncts on `w` whose shallow
    /// left connector could match `lc` (owned by `lw < w`) and/or whose
    /// shallow right connector could match `rc` (owned by `rw > w`).
    /// Duplicates — a disjunct matched on both sides — are eliminated.
    /// Returns indices into `words[w]`.
    pub fn form_match_list(&self, pool: &StringPool, words: &[Vec<Disjunct>], w: usize, lc: Option<&Connector>, rc: Option<&Connector>) -> Vec<usize> {
        let mut out: FnvHashSet<usize> = FnvHashSet::default();
        if let Some(lc) = lc {
            let prefix = uppercase_prefix(pool.resolve(lc.name));
            if let Some(idxs) = self.left_tables[w].get(prefix) {
                for &di in idxs {
                    if connectors_match(pool.resolve(lc.name), pool.resolve(words[w][di].left_jet[0].name)) {
                        out.insert(di);
                    }
                }
            }
        }
        if let Some(rc) = rc {
            let prefix = uppercase_prefix(pool.resolve(rc.name));
            if let Some(idxs) = self.right_tables[w].get(prefix) {
                for &di in idxs {
                    if connectors_match(pool.resolve(rc.name), pool.resolve(words[w][di].right_jet[0].name)) {
                        out.insert(di);
                    }
                }
            }
        }
        out.into_iter().collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use lg_expr::Direction;

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
    fn matches_by_shallow_connector_only() {
        let mut pool = StringPool::new();
        let d0 = disjunct(&mut pool, &["S"], &[]);
        let d1 = disjunct(&mut pool, &["O"], &[]);
        let words = vec![vec![], vec![d0, d1]];
        let idx = FastMatchIndex::build(&pool, &words);
        let lc = Connector::new(pool.intern("S"), Direction::Right, false, u16::MAX);
        let found = idx.form_match_list(&pool, &words, 1, Some(&lc), None);
        assert_eq!(found, vec![0]);
    }

    #[test]
    fn union_of_left_and_right_hits_is_deduplicated() {
        let mut pool = StringPool::new();
        let d0 = disjunct(&mut pool, &["S"], &["O"]);
        let words = vec![vec![], vec![d0]];
        let idx = FastMatchIndex::build(&pool, &words);
        let lc = Connector::new(pool.intern("S"), Direction::Right, false, u16::MAX);
        let rc = Connector::new(pool.intern("O"), Direction::Left, false, u16::MAX);
        let found = idx.form_match_list(&pool, &words, 1, Some(&lc), Some(&rc));
        assert_eq!(found, vec![0]);
    }
}
