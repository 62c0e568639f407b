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

//! §4.K: linkage extraction. Walks a [`ParseSet`] DAG built by
//! `parse_set.rs` to materialize one concrete linkage, either the
//! deterministic k-th one (`extract_linkage`) or a uniformly-random one
//! over the choice lists at each level (`extract_random_linkage`,
//! matching `list_random_links`'s non-count-weighted sampling exactly —
//! it is a faithful port, not a fix, of that quirk).

use rand::Rng;
use thiserror::Error;

use crate::conn_ref::{ConnRef, WordIdx};
use crate::parse_set::{DisjunctRef, ParseChoice, ParseSet};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("linkage index {index} is out of range for a parse set of size {size}")]
    IndexOutOfRange { index: u64, size: u64 }
}

/// One emitted link between two words' chosen disjuncts.
#[derive(Clone, Copy, Debug)]
pub struct Link {
    pub lw: WordIdx,
    pub rw: WordIdx,
    pub lc: ConnRef,
    pub rc: ConnRef
}

/// The raw result of walking a [`ParseSet`]: the links chosen, and which
/// disjunct each word settled on. `driver.rs` wraps this with word texts
/// and connector name strings for the public `Linkage` type (§6).
#[derive(Clone, Debug, Default)]
pub struct RawLinkage {
    pub links: Vec<Link>,
    pub chosen_disjuncts: Vec<Option<DisjunctRef>>
}

impl RawLinkage {
    fn new(num_words: usize) -> Self {
        RawLinkage { links: Vec::new(), chosen_disjuncts: vec![None; num_words] }
    }

    fn issue(&mut self, lw: WordIdx, rw: WordIdx, lc: ConnRef, rc: ConnRef, ld: Option<DisjunctRef>, rd: Option<DisjunctRef>) {
        self.links.push(Link { lw, rw, lc, rc });
        if let Some(ld) = ld {
            self.chosen_disjuncts[lw] = Some(ld);
        }
        if let Some(rd) = rd {
            self.chosen_disjuncts[rw] = Some(rd);
        }
    }

    fn issue_choice(&mut self, pc: &ParseChoice) {
        if let (Some(lw), Some(lc), Some(rc)) = (pc.left_link.lw, pc.left_link.lc, pc.left_link.rc) {
            self.issue(lw, pc.left_link.rw, lc, rc, pc.ld, pc.md);
        }
        if let (Some(lw), Some(lc), Some(rc)) = (pc.right_link.lw, pc.right_link.lc, pc.right_link.rc) {
            self.issue(lw, pc.right_link.rw, lc, rc, pc.md, pc.rd);
        }
    }
}

/// The deterministic k-th linkage (`list_links`): descends the choice
/// whose `[left_count*right_count)` range contains `index`, splitting the
/// remaining index between the two continuations by the same
/// div/mod-by-left-count arithmetic the count recurrence used to produce
/// those totals in the first place.
pub fn extract_linkage(set: &ParseSet, index: u64, num_words: usize) -> Result<RawLinkage, ExtractError> {
    let mut linkage = RawLinkage::new(num_words);
    list_links(&mut linkage, set, index)?;
    Ok(linkage)
}

fn list_links(linkage: &mut RawLinkage, set: &ParseSet, index: u64) -> Result<(), ExtractError> {
    if set.choices.is_empty() {
        return Ok(());
    }

    let mut remaining = index;
    let mut chosen: Option<&ParseChoice> = None;
    for pc in &set.choices {
        let n = pc.left_set.count.saturating_mul(pc.right_set.count);
        if remaining < n {
            chosen = Some(pc);
            break;
        }
        remaining -= n;
    }

    let pc = chosen.ok_or(ExtractError::IndexOutOfRange { index, size: set.count })?;
    linkage.issue_choice(pc);
    list_links(linkage, &pc.left_set, remaining % pc.left_set.count)?;
    list_links(linkage, &pc.right_set, remaining / pc.left_set.count)
}

/// A uniformly-random linkage among the sentence's full linkage count,
/// sampled level by level (`list_random_links`): at each `ParseSet`, pick
/// one of its choices uniformly at random, not weighted by how many
/// linkages that choice represents downstream. This under- and
/// over-samples some linkages relative to a true uniform draw over the
/// whole linkage set, exactly as the original does.
pub fn extract_random_linkage(set: &ParseSet, num_words: usize, rng: &mut impl Rng) -> RawLinkage {
    let mut linkage = RawLinkage::new(num_words);
    list_random_links(&mut linkage, set, rng);
    linkage
}

fn list_random_links(linkage: &mut RawLinkage, set: &ParseSet, rng: &mut impl Rng) {
    if set.choices.is_empty() {
        return;
    }
    let i = rng.gen_range(0..set.choices.len());
    let pc = &set.choices[i];
    linkage.issue_choice(pc);
    list_random_links(linkage, &pc.left_set, rng);
    list_random_links(linkage, &pc.right_set, rng);
}
