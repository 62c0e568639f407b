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

//! §4.M: the sentence driver. Chains tokenization, dictionary lookup and
//! expression compilation, pruning, counting, parse-set construction,
//! extraction and post-processing into one entry point, and defines the
//! public `Linkage` query API of §6. All recoverable conditions (§7) are
//! reflected back on `Sentence`/`Linkage` fields rather than thrown; the
//! only two `Result::Err`s this module produces are the two hard
//! failures of §7's taxonomy, `InputInvalid` and `DictionaryInconsistent`.

use fnv::FnvHashSet;
use lg_dict::{DictError, Dictionary, UNKNOWN_WORD};
use lg_expr::{build_disjuncts, connector_meet, dedup_disjuncts, Direction, Disjunct, Exp, StringPool, Sym};
use lg_prune::{prune_expressions, prune_to_fixpoint, FastMatchIndex, PowerPruneOptions};
use lg_tokenize::{tokenize, TokenizeError, TokenizeOptions, TokenizeWarning};
use thiserror::Error;

use crate::count::CountEngine;
use crate::extract::{extract_linkage, RawLinkage};
use crate::options::{ParseOptions, ResourceLimits};
use crate::parse_set::ParseSetBuilder;
use crate::post_process::{domain_names_per_link, PostProcessOutcome, Postprocessor, PpLink};

/// spec.md §7's two hard failures; everything else recoverable is
/// reflected on `Sentence`/`Linkage` fields instead.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("invalid input: {0}")]
    InputInvalid(#[from] TokenizeError),
    #[error("dictionary inconsistency: {0}")]
    DictionaryInconsistent(#[from] DictError)
}

/// One link in a finished [`Linkage`] (§6): the words it spans, the two
/// connectors that formed it, and their composite name.
#[derive(Clone, Debug)]
pub struct LinkageLink {
    pub lw: usize,
    pub rw: usize,
    pub lc_name: String,
    pub rc_name: String,
    pub composite_name: String
}

impl LinkageLink {
    pub fn length(&self) -> usize {
        self.rw - self.lw
    }
}

/// One materialized, post-processed linkage (§6 "Linkage query API").
/// Self-contained — it owns its word texts and disjunct descriptions
/// rather than borrowing back into the `Sentence` that built it, so a
/// caller can keep an individual `Linkage` independent of parse order.
#[derive(Clone, Debug)]
pub struct Linkage {
    word_texts: Vec<String>,
    links: Vec<LinkageLink>,
    domain_names: Vec<Vec<String>>,
    disjunct_strings: Vec<Option<String>>,
    disjunct_costs: Vec<f32>,
    null_count: u32,
    violation: Option<String>
}

impl Linkage {
    pub fn num_words(&self) -> usize {
        self.word_texts.len()
    }

    pub fn word(&self, i: usize) -> &str {
        &self.word_texts[i]
    }

    pub fn num_links(&self) -> usize {
        self.links.len()
    }

    pub fn link(&self, i: usize) -> &LinkageLink {
        &self.links[i]
    }

    /// Every domain pattern link `i` is a member of (spec.md §4.L point
    /// 3's nested domain forest), not just its smallest enclosing one.
    pub fn domain_names(&self, i: usize) -> &[String] {
        &self.domain_names[i]
    }

    /// The chosen disjunct's jets for word `i`, rendered as
    /// `"C- D- & A+ B+"` (nearest-to-word first on each side); `None`
    /// for a null-linked word.
    pub fn disjunct_string(&self, i: usize) -> Option<&str> {
        self.disjunct_strings[i].as_deref()
    }

    pub fn disjunct_cost(&self, i: usize) -> f32 {
        self.disjunct_costs[i]
    }

    pub fn unused_word_cost(&self) -> u32 {
        self.null_count
    }

    pub fn total_disjunct_cost(&self) -> f32 {
        self.disjunct_costs.iter().sum()
    }

    pub fn violation_name(&self) -> Option<&str> {
        self.violation.as_deref()
    }

    fn violation_count(&self) -> u32 {
        u32::from(self.violation.is_some())
    }

    /// Not modelled distinctly from `disjunct_cost` (see DESIGN.md);
    /// kept so the cost-vector stays the 4-tuple shape §4.M names.
    fn link_cost(&self) -> f32 {
        0.0
    }

    /// `(violation_count, unused_word_cost, disjunct_cost, link_cost)`,
    /// lexicographic, the default sort key of §4.M. `corpus_cost` does
    /// not participate even under `CostModel::Corpus` (see DESIGN.md).
    pub fn cost_vector(&self) -> (u32, u32, f32, f32) {
        (self.violation_count(), self.null_count, self.total_disjunct_cost(), self.link_cost())
    }
}

/// A parsed sentence: the flattened word texts §6's query API addresses
/// by index, the recovered conditions of §7, and the ranked linkages
/// themselves.
#[derive(Clone, Debug)]
pub struct Sentence {
    word_texts: Vec<String>,
    pub tokenize_warnings: Vec<TokenizeWarning>,
    /// §7 `ResourceExhausted`: the counting recursion hit its time
    /// budget and short-circuited remaining subproblems to zero.
    pub resource_exhausted: bool,
    /// §7 `OverflowCount`: some `null_count`'s linkage count clamped at
    /// [`crate::count::MAX_COUNT`]; `linkage_limit` may be hiding
    /// linkages that exist but were never counted precisely.
    pub count_overflowed: bool,
    pub linkages: Vec<Linkage>
}

impl Sentence {
    pub fn num_words(&self) -> usize {
        self.word_texts.len()
    }

    pub fn word(&self, i: usize) -> &str {
        &self.word_texts[i]
    }

    /// §4.M: tokenize, look up, compile, prune, count, extract and
    /// post-process `text` against `dict`, producing a ranked
    /// [`Sentence`]. `opts.linkage_limit` caps the total linkages
    /// extracted across every attempted `null_count`; widening stops
    /// early at the first `null_count` yielding any linkage when
    /// `opts.stop_at_first_nonzero_null_count` is set.
    pub fn parse(dict: &dyn Dictionary, text: &str, opts: &ParseOptions) -> Result<Sentence, DriverError> {
        if dict.use_unknown_word() && dict.lookup(UNKNOWN_WORD).is_empty() {
            return Err(DictError::MissingMandatoryEntry(UNKNOWN_WORD).into());
        }

        let mut pool = StringPool::new();
        let tok_opts = TokenizeOptions { use_spell_guess: opts.use_spell_guess, ..TokenizeOptions::default() };
        let tokenized = tokenize(text, dict, &mut pool, &tok_opts)?;

        let word_texts: Vec<String> = tokenized
            .words
            .iter()
            .map(|w| if w.display_string.is_empty() { lg_dict::EMPTY_WORD.to_string() } else { w.display_string.clone() })
            .collect();

        // One entry's dictionary alternatives are unioned onto its word
        // position without tracking which wordgraph path they came from
        // (spec.md §9: a documented simplification — see DESIGN.md).
        let mut word_exps: Vec<Vec<Exp>> = Vec::with_capacity(tokenized.words.len());
        for entry in &tokenized.words {
            let mut exps = Vec::new();
            let mut seen: FnvHashSet<Sym> = FnvHashSet::default();
            for &sym in &entry.alternatives {
                if !seen.insert(sym) {
                    continue;
                }
                let surface = pool.resolve(sym).to_string();
                for dict_entry in dict.lookup(&surface) {
                    exps.push(dict_entry.expression.compile(&mut pool));
                }
            }
            word_exps.push(exps);
        }

        prune_expressions(&pool, &mut word_exps);

        let mut words: Vec<Vec<Disjunct>> = Vec::with_capacity(word_exps.len());
        for (i, exps) in word_exps.iter().enumerate() {
            let word_sym = pool.intern(&word_texts[i]);
            let mut disjuncts = Vec::new();
            for exp in exps {
                disjuncts.extend(build_disjuncts(word_sym, exp, opts.disjunct_cost));
            }
            dedup_disjuncts(&mut disjuncts);
            words.push(disjuncts);
        }

        let power_opts = PowerPruneOptions { islands_ok: opts.islands_ok };
        let pp_rules = dict.postprocess_rules();
        prune_to_fixpoint(&pool, &mut words, power_opts, &pp_rules.rules);

        let matcher = FastMatchIndex::build(&pool, &words);
        let limits = ResourceLimits::from(opts);
        let mut counts = CountEngine::new(&pool, &words, &matcher, opts.islands_ok, limits);

        let num_words = words.len();
        let mut tallies: Vec<(u32, u64)> = Vec::new();
        for n in opts.min_null_count..=opts.max_null_count {
            let total = counts.count(None, num_words, None, None, n + 1);
            if total > 0 {
                tallies.push((n, total));
                if opts.stop_at_first_nonzero_null_count {
                    break;
                }
            }
        }

        let mut builder = ParseSetBuilder::new(&pool, &words, &matcher, &counts, opts.islands_ok);
        let mut raw_linkages: Vec<(u32, RawLinkage)> = Vec::new();
        let mut remaining = opts.linkage_limit;
        for &(n, total) in &tallies {
            if remaining == 0 {
                break;
            }
            let set = match builder.build(n) {
                Some(s) => s,
                None => continue
            };
            let take = (total as usize).min(remaining);
            for k in 0..take {
                let raw = extract_linkage(&set, k as u64, num_words).expect("index within an already-computed count");
                raw_linkages.push((n, raw));
            }
            remaining -= take;
        }

        let mut pp = Postprocessor::new(pp_rules);
        let scanned: Vec<Vec<PpLink>> = raw_linkages.iter().map(|(_, raw)| to_pp_links(&pool, &words, raw)).collect();
        for links in &scanned {
            pp.scan(links);
        }
        pp.prime();

        let mut linkages: Vec<Linkage> = raw_linkages
            .into_iter()
            .zip(scanned)
            .map(|((n, raw), pp_links)| build_linkage(&pool, &words, &word_texts, &pp, pp_rules, n, raw, pp_links, num_words))
            .collect();
        linkages.sort_by(|a, b| a.cost_vector().partial_cmp(&b.cost_vector()).unwrap_or(std::cmp::Ordering::Equal));

        Ok(Sentence {
            word_texts,
            tokenize_warnings: tokenized.warnings,
            resource_exhausted: counts.exhausted(),
            count_overflowed: tallies.iter().any(|&(_, c)| c >= crate::count::MAX_COUNT),
            linkages
        })
    }
}

fn to_pp_links(pool: &StringPool, words: &[Vec<Disjunct>], raw: &RawLinkage) -> Vec<PpLink> {
    raw.links
        .iter()
        .map(|link| {
            let lc_name = pool.resolve(link.lc.connector(words).name);
            let rc_name = pool.resolve(link.rc.connector(words).name);
            let name = connector_meet(lc_name, rc_name).unwrap_or_else(|| lc_name.to_string());
            PpLink { lw: link.lw, rw: link.rw, name }
        })
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn build_linkage(
    pool: &StringPool,
    words: &[Vec<Disjunct>],
    word_texts: &[String],
    pp: &Postprocessor,
    pp_rules: &lg_dict::PostProcessRules,
    null_count: u32,
    raw: RawLinkage,
    pp_links: Vec<PpLink>,
    num_words: usize
) -> Linkage {
    let outcome = pp.process(&pp_links, num_words);
    let violation = match outcome {
        PostProcessOutcome::Ok => None,
        PostProcessOutcome::Violation(msg) => Some(msg)
    };
    let domain_names = domain_names_per_link(pp_rules, &pp_links, num_words);

    let links: Vec<LinkageLink> = raw
        .links
        .iter()
        .zip(&pp_links)
        .map(|(link, pp_link)| LinkageLink {
            lw: link.lw,
            rw: link.rw,
            lc_name: pool.resolve(link.lc.connector(words).name).to_string(),
            rc_name: pool.resolve(link.rc.connector(words).name).to_string(),
            composite_name: pp_link.name.clone()
        })
        .collect();

    let mut disjunct_strings = vec![None; num_words];
    let mut disjunct_costs = vec![0.0f32; num_words];
    for (w, chosen) in raw.chosen_disjuncts.iter().enumerate() {
        if let Some(dref) = chosen {
            let d = &words[dref.word][dref.disjunct];
            disjunct_strings[w] = Some(format_disjunct(pool, d));
            disjunct_costs[w] = d.cost;
        }
    }

    Linkage {
        word_texts: word_texts.to_vec(),
        links,
        domain_names,
        disjunct_strings,
        disjunct_costs,
        null_count,
        violation
    }
}

fn format_disjunct(pool: &StringPool, d: &Disjunct) -> String {
    let mut parts = Vec::with_capacity(d.left_jet.len() + d.right_jet.len());
    for c in d.left_jet.iter().rev() {
        parts.push(format!("{}{}", pool.resolve(c.name), Direction::Left));
    }
    for c in &d.right_jet {
        parts.push(format!("{}{}", pool.resolve(c.name), Direction::Right));
    }
    parts.join(" ")
}

#[cfg(test)]
mod test {
    use lg_dict::InMemoryDictionary;
    use lg_expr::{Direction as Dir, SurfaceExp};

    use super::*;

    fn small_dict() -> InMemoryDictionary {
        let mut d = InMemoryDictionary::new();
        d.insert(
            "this",
            SurfaceExp::connector(0.0, "Ss", Dir::Right, false, u16::MAX),
            None
        );
        d.insert(
            "is",
            SurfaceExp::and(
                0.0,
                vec![
                    SurfaceExp::connector(0.0, "Ss", Dir::Left, false, u16::MAX),
                    SurfaceExp::connector(0.0, "O", Dir::Right, false, u16::MAX),
                ]
            ),
            None
        );
        d.insert("fine", SurfaceExp::connector(0.0, "O", Dir::Left, false, u16::MAX), None);
        d
    }

    #[test]
    fn parses_a_simple_sentence_with_one_linkage() {
        let dict = small_dict();
        let opts = ParseOptions::default();
        let sentence = Sentence::parse(&dict, "this is fine", &opts).unwrap();
        assert_eq!(sentence.num_words(), 3);
        assert!(!sentence.linkages.is_empty());
        let linkage = &sentence.linkages[0];
        assert_eq!(linkage.num_links(), 2);
        assert_eq!(linkage.unused_word_cost(), 0);
        assert!(linkage.violation_name().is_none());
    }

    #[test]
    fn empty_sentence_is_input_invalid() {
        let dict = small_dict();
        let opts = ParseOptions::default();
        assert!(matches!(Sentence::parse(&dict, "   ", &opts), Err(DriverError::InputInvalid(_))));
    }

    #[test]
    fn missing_unknown_word_entry_is_dictionary_inconsistent() {
        let mut dict = small_dict();
        dict.set_use_unknown_word(true);
        let opts = ParseOptions::default();
        assert!(matches!(Sentence::parse(&dict, "this is fine", &opts), Err(DriverError::DictionaryInconsistent(_))));
    }

    #[test]
    fn unparsable_sentence_yields_zero_linkages_not_an_error() {
        let dict = small_dict();
        let opts = ParseOptions::default();
        let sentence = Sentence::parse(&dict, "fine fine fine", &opts).unwrap();
        assert!(sentence.linkages.is_empty());
    }
}
