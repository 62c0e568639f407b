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

//! §6 "Configuration": the parse options structure and resource limits.

use std::time::Duration;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CostModel {
    /// "Vepstas Disjunct And Link" — the default lexicographic model.
    Vdal,
    /// Corpus-statistics-weighted ranking (spec.md §9 Open Question:
    /// `corpus_cost` does not participate in default sort order even
    /// under this model — see DESIGN.md).
    Corpus
}

impl Default for CostModel {
    fn default() -> Self {
        CostModel::Vdal
    }
}

/// §6's enumerated parse-options bullet list.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParseOptions {
    pub disjunct_cost: f32,
    pub min_null_count: u32,
    pub max_null_count: u32,
    pub islands_ok: bool,
    pub short_length: u16,
    pub all_short: bool,
    pub twopass_length: usize,
    pub linkage_limit: usize,
    pub use_spell_guess: u32,
    pub repeatable_rand: bool,
    pub cost_model: CostModel,
    pub display_morphology: bool,
    pub max_parse_time: Option<Duration>,
    pub max_memory: Option<u64>,
    /// Not in spec.md's bullet list verbatim, but implied by "stopping
    /// at the first count yielding any linkages if the caller requested
    /// so" (§4.M): when true, the driver stops widening `null_count`
    /// past the first value that yields at least one linkage.
    pub stop_at_first_nonzero_null_count: bool
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            disjunct_cost: 2.7,
            min_null_count: 0,
            max_null_count: 0,
            islands_ok: false,
            short_length: 16,
            all_short: false,
            twopass_length: 30,
            linkage_limit: 100,
            use_spell_guess: 0,
            repeatable_rand: true,
            cost_model: CostModel::Vdal,
            display_morphology: false,
            max_parse_time: None,
            max_memory: None,
            stop_at_first_nonzero_null_count: true
        }
    }
}

/// Resource budget the counting recursion polls against (spec.md §4.I
/// "Resource check", §5).
#[derive(Clone, Copy, Debug, Default)]
pub struct ResourceLimits {
    pub max_parse_time: Option<Duration>,
    pub max_memory: Option<u64>
}

impl From<&ParseOptions> for ResourceLimits {
    fn from(opts: &ParseOptions) -> Self {
        ResourceLimits { max_parse_time: opts.max_parse_time, max_memory: opts.max_memory }
    }
}
