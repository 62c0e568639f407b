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

//! A `ConnRef` identifies one connector occurrence: which word, which
//! disjunct on that word, which jet, and how deep into the jet. This is
//! the Rust stand-in for the original's `Connector *` pointer identity
//! (spec.md §9: "use an explicit ... rather than a sentinel integer" —
//! the same idea applied to connector identity, not just the word-index
//! sentinel). Two `ConnRef`s are equal iff they name the same connector
//! occurrence, which is exactly the identity the counting memo keys on.

use lg_expr::{Connector, Direction, Disjunct};

pub type WordIdx = usize;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ConnRef {
    pub word: WordIdx,
    pub disjunct: usize,
    pub side: Direction,
    pub pos: usize
}

impl ConnRef {
    pub fn shallow(word: WordIdx, disjunct: usize, side: Direction) -> Self {
        ConnRef { word, disjunct, side, pos: 0 }
    }

    fn jet<'a>(&self, words: &'a [Vec<Disjunct>]) -> &'a [Connector] {
        let d = &words[self.word][self.disjunct];
        match self.side {
            Direction::Left => &d.left_jet,
            Direction::Right => &d.right_jet
        }
    }

    pub fn connector<'a>(&self, words: &'a [Vec<Disjunct>]) -> &'a Connector {
        &self.jet(words)[self.pos]
    }

    /// The next-deeper connector in the same jet, or `None` if `self`
    /// was already the deepest (the jet is now exhausted).
    pub fn next(&self, words: &[Vec<Disjunct>]) -> Option<ConnRef> {
        if self.pos + 1 < self.jet(words).len() {
            Some(ConnRef { pos: self.pos + 1, ..*self })
        } else {
            None
        }
    }

    pub fn multi(&self, words: &[Vec<Disjunct>]) -> bool {
        self.connector(words).multi
    }
}

/// §4.I `do_match`: do connectors `a` (owned by word `aw`) and `b`
/// (owned by word `bw`, `aw < bw`) match, respecting both connectors'
/// `length_limit`?
pub fn do_match(pool: &lg_expr::StringPool, words: &[Vec<Disjunct>], a: Option<ConnRef>, b: Option<ConnRef>, aw: WordIdx, bw: WordIdx) -> bool {
    let (a, b) = match (a, b) {
        (Some(a), Some(b)) => (a, b),
        _ => return false
    };
    let ca = a.connector(words);
    let cb = b.connector(words);
    let dist = (bw - aw) as u16;
    if dist > ca.length_limit || dist > cb.length_limit {
        return false;
    }
    lg_expr::connectors_match(pool.resolve(ca.name), pool.resolve(cb.name))
}
