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

//! Connectors: the typed, directed half-links attached to words (spec.md §3).

use std::fmt;

use crate::intern::{StringPool, Sym};

/// Which way a connector points from the word that owns it.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// `-`: points at a word to the left.
    Left,
    /// `+`: points at a word to the right.
    Right
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Direction::Left => "-",
            Direction::Right => "+"
        })
    }
}

/// A directed half-link. `name` is interned; `nearest_word`/`farthest_word`
/// start unset and are tightened by power pruning (`lg-prune`).
///
/// Connector instances are owned per-disjunct (matching the original's
/// per-disjunct `Connector` allocations): two connectors with the same
/// `name` on different disjuncts are different `Connector` values even
/// though their `name` interns to the same `Sym`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Connector {
    pub name: Sym,
    pub direction: Direction,
    pub multi: bool,
    pub length_limit: u16,
    pub nearest_word: Option<u32>,
    pub farthest_word: Option<u32>
}

impl Connector {
    pub fn new(name: Sym, direction: Direction, multi: bool, length_limit: u16) -> Self {
        Connector {
            name,
            direction,
            multi,
            length_limit,
            nearest_word: None,
            farthest_word: None
        }
    }
}

fn uppercase_prefix_len(s: &[u8]) -> usize {
    s.iter().take_while(|&&b| b.is_ascii_uppercase()).count()
}

/// Do connector names `s` and `t` match, per spec.md §3?
///
/// Uppercase prefixes must be equal. In the remaining (subscript)
/// positions each character must be equal or one of the two must be `*`;
/// if one name's subscript runs out before the other's, the missing
/// positions are treated as wildcards (there is no remaining constraint
/// to violate) — this resolves the "implicit padding" wording in spec.md
/// §3 the same way both sides, rather than only permitting the shorter
/// side to be `s`.
pub fn connectors_match(s: &str, t: &str) -> bool {
    let sb = s.as_bytes();
    let tb = t.as_bytes();
    let up_s = uppercase_prefix_len(sb);
    let up_t = uppercase_prefix_len(tb);
    if up_s != up_t || sb[..up_s] != tb[..up_t] {
        return false;
    }
    let rest_s = &sb[up_s..];
    let rest_t = &tb[up_t..];
    let n = rest_s.len().max(rest_t.len());
    for i in 0..n {
        let cs = rest_s.get(i).copied().unwrap_or(b'*');
        let ct = rest_t.get(i).copied().unwrap_or(b'*');
        if cs != ct && cs != b'*' && ct != b'*' {
            return false;
        }
    }
    true
}

/// The character-wise meet of two matching connector names: the label
/// used for the link they form. Grounded on `intersect_strings()` in
/// `analyze-linkage.c` of the original sources, generalized to a
/// standalone pure function over `&str` rather than a sentence-owned
/// string-set allocation.
///
/// Returns `None` if `s` and `t` do not match; the `^` sentinel in
/// spec.md §3 is therefore never observable from outside this function.
pub fn connector_meet(s: &str, t: &str) -> Option<String> {
    if !connectors_match(s, t) {
        return None;
    }
    let sb = s.as_bytes();
    let tb = t.as_bytes();
    let up = uppercase_prefix_len(sb);
    let mut out = Vec::with_capacity(sb.len().max(tb.len()));
    out.extend_from_slice(&sb[..up]);
    let rest_s = &sb[up..];
    let rest_t = &tb[up..];
    let n = rest_s.len().max(rest_t.len());
    for i in 0..n {
        let cs = rest_s.get(i).copied();
        let ct = rest_t.get(i).copied();
        let c = match (cs, ct) {
            (Some(a), Some(b)) if a == b => a,
            (Some(b'*'), Some(b)) => b,
            (Some(a), Some(b'*')) => a,
            (Some(a), None) => a,
            (None, Some(b)) => b,
            _ => unreachable!("connectors_match guarantees compatibility")
        };
        out.push(c);
    }
    Some(String::from_utf8(out).expect("connector names are ASCII"))
}

/// Resolve and match two connectors' interned names.
pub fn connectors_match_in(pool: &StringPool, a: &Connector, b: &Connector) -> bool {
    connectors_match(pool.resolve(a.name), pool.resolve(b.name))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn exact_match() {
        assert!(connectors_match("Ss", "Ss"));
        assert_eq!(connector_meet("Ss", "Ss").as_deref(), Some("Ss"));
    }

    #[test]
    fn wildcard_match() {
        assert!(connectors_match("Ss", "S*"));
        assert_eq!(connector_meet("Ss", "S*").as_deref(), Some("Ss"));
        assert!(connectors_match("S*", "Sp"));
        assert_eq!(connector_meet("S*", "Sp").as_deref(), Some("Sp"));
    }

    #[test]
    fn uppercase_mismatch_fails() {
        assert!(!connectors_match("Ss", "Os"));
        assert_eq!(connector_meet("Ss", "Os"), None);
    }

    #[test]
    fn subscript_mismatch_fails() {
        assert!(!connectors_match("Ss", "Sp"));
    }

    #[test]
    fn short_subscript_is_wildcard() {
        assert!(connectors_match("S", "Ss"));
        assert_eq!(connector_meet("S", "Ss").as_deref(), Some("Ss"));
    }
}
