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

//! §4.C: splitting an input sentence into the wordgraph DAG and the
//! flattened word array the rest of the pipeline consumes.

use fnv::FnvHashSet;
use lg_dict::{AffixClass, Dictionary};
use lg_expr::{StringPool, Sym};
use log::{debug, warn};

use crate::gword::{status, Gword, MorphemeType, NodeIdx, WordGraph};

/// spec.md §9: "the source's `MAX_SPLITS` cap is a safety valve; its
/// numeric value is not load-bearing". Kept as a `ParseOptions`-adjacent
/// constant, not hard-coded into the splitter, so tests can lower it.
pub const DEFAULT_SPLIT_CAP: u32 = 32;

#[derive(Clone, Debug)]
pub struct TokenizeOptions {
    /// §6 `use_spell_guess`: max run-on/similar-word guesses per unknown
    /// word; 0 disables spell-guessing.
    pub use_spell_guess: u32,
    pub split_cap: u32
}

impl Default for TokenizeOptions {
    fn default() -> Self {
        TokenizeOptions { use_spell_guess: 0, split_cap: DEFAULT_SPLIT_CAP }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TokenizeError {
    #[error("empty sentence")]
    EmptySentence
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum TokenizeWarning {
    /// §7 `OverSplitCap`: recovered by halting further splitting on that
    /// token and continuing.
    OverSplitCap { token: String }
}

/// One flattened word-array position (spec.md §3 "Word array entry").
/// `disjunct_list`/`expression_list` are populated later by `lg-parse`'s
/// driver, which is the component that owns the dictionary lookup +
/// `lg-expr` compilation step; this crate only knows about subwords.
#[derive(Clone, Debug)]
pub struct WordArrayEntry {
    pub display_string: String,
    pub alternatives: Vec<Sym>,
    /// Parallel to `alternatives`: the DAG node each alternative subword
    /// came from, for callers that need to walk back to `Gword` status.
    pub nodes: Vec<NodeIdx>,
    pub optional: bool
}

pub struct TokenizeOutput {
    pub dag: WordGraph,
    pub words: Vec<WordArrayEntry>,
    pub warnings: Vec<TokenizeWarning>
}

#[derive(Clone, Debug)]
struct Piece {
    text: String,
    morpheme_type: MorphemeType,
    status: status::Status,
    regex_name: Option<String>
}

impl Piece {
    fn new(text: impl Into<String>, morpheme_type: MorphemeType, status: status::Status) -> Piece {
        Piece { text: text.into(), morpheme_type, status, regex_name: None }
    }
}

type Alt = Vec<Piece>;

const RPUNC_CHARS: &[char] = &['.', ',', '!', '?', ';', ':', ')', ']', '}', '"', '\''];
const LPUNC_CHARS: &[char] = &['(', '[', '{', '"', '\''];

fn is_capital_initial(s: &str) -> bool {
    s.chars().next().map(|c| c.is_uppercase()).unwrap_or(false)
}

fn to_lower(s: &str) -> String {
    s.to_lowercase()
}

/// Step 1: literal dictionary lookup.
fn literal_alt(token: &str, dict: &dyn Dictionary) -> Option<Alt> {
    if dict.lookup(token).is_empty() {
        return None;
    }
    Some(vec![Piece::new(token, MorphemeType::Word, status::IN_DICT)])
}

/// Step 2: repeated right-stripping of punctuation, and (where a units
/// class is defined) numeric-stem + unit-suffix splitting. Bounded by
/// `split_cap`.
fn right_strip_alts(token: &str, dict: &dyn Dictionary, split_cap: u32) -> Vec<Alt> {
    let mut out = Vec::new();
    let rpunc: FnvHashSet<&str> = dict.affix_class(AffixClass::RPunc).iter().map(String::as_str).collect();
    let units: Vec<&str> = dict.affix_class(AffixClass::Units).iter().map(String::as_str).collect();

    // Units: "12ft" -> "12" (numeric stem) + "ft" (unit).
    for unit in &units {
        if let Some(stem) = token.strip_suffix(unit) {
            if !stem.is_empty() && stem.chars().all(|c| c.is_ascii_digit()) {
                out.push(vec![
                    Piece::new(stem, MorphemeType::Stem, status::IN_DICT),
                    Piece::new(*unit, MorphemeType::Suffix, status::IN_DICT),
                ]);
            }
        }
    }

    // Iteratively strip trailing punctuation characters (dict-listed
    // RPUNC takes priority; fall back to the builtin RPUNC_CHARS set so
    // the splitter still makes progress against a dictionary with no
    // affix classes configured).
    let mut rest = token;
    let mut trailers: Vec<String> = Vec::new();
    let mut splits = 0;
    loop {
        if splits >= split_cap {
            break;
        }
        let last = match rest.chars().last() {
            Some(c) => c,
            None => break
        };
        let last_str = last.to_string();
        let strips_as_dict_rpunc = rpunc.contains(last_str.as_str());
        let strips_as_builtin = RPUNC_CHARS.contains(&last);
        if !strips_as_dict_rpunc && !strips_as_builtin {
            break;
        }
        rest = &rest[..rest.len() - last.len_utf8()];
        trailers.push(last_str);
        splits += 1;
        if !dict.lookup(rest).is_empty() || rest.is_empty() {
            break;
        }
    }
    if !trailers.is_empty() && !rest.is_empty() {
        let mut alt = vec![Piece::new(rest, MorphemeType::Word, status::IN_DICT)];
        for t in trailers.iter().rev() {
            alt.push(Piece::new(t.clone(), MorphemeType::Suffix, status::IN_DICT));
        }
        out.push(alt);
    }
    out
}

/// Step 3: left-stripping of quote/bracket punctuation.
fn left_strip_alts(token: &str, dict: &dyn Dictionary) -> Vec<Alt> {
    let lpunc: FnvHashSet<&str> = dict
        .affix_class(AffixClass::LPunc)
        .iter()
        .map(String::as_str)
        .chain(dict.affix_class(AffixClass::Quotes).iter().map(String::as_str))
        .collect();
    let mut out = Vec::new();
    let mut rest = token;
    let mut leaders: Vec<String> = Vec::new();
    loop {
        let first = match rest.chars().next() {
            Some(c) => c,
            None => break
        };
        let first_str = first.to_string();
        if !lpunc.contains(first_str.as_str()) && !LPUNC_CHARS.contains(&first) {
            break;
        }
        leaders.push(first_str);
        rest = &rest[first.len_utf8()..];
        if !dict.lookup(rest).is_empty() || rest.is_empty() {
            break;
        }
    }
    if !leaders.is_empty() && !rest.is_empty() {
        let mut alt = Vec::new();
        for l in &leaders {
            alt.push(Piece::new(l.clone(), MorphemeType::Prefix, status::IN_DICT));
        }
        alt.push(Piece::new(rest, MorphemeType::Word, status::IN_DICT));
        out.push(alt);
    }
    out
}

/// Step 4: language-configured affix splits (prefix/stem/suffix, plus
/// Hebrew-style multi-prefix splitting).
fn affix_alts(token: &str, dict: &dyn Dictionary) -> Vec<Alt> {
    let mut out = Vec::new();
    let pres = dict.affix_class(AffixClass::Pre);
    let sufs = dict.affix_class(AffixClass::Suf);
    let mpres = dict.affix_class(AffixClass::MPre);
    let stem_subscr = dict.affix_class(AffixClass::StemSubscr).first().map(String::as_str).unwrap_or(".=");

    for pre in pres {
        if let Some(rest) = token.strip_prefix(pre.as_str()) {
            if rest.is_empty() {
                continue;
            }
            let stem_name = format!("{rest}{stem_subscr}");
            if !dict.lookup(&stem_name).is_empty() || !dict.lookup(rest).is_empty() {
                out.push(vec![
                    Piece::new(pre.clone(), MorphemeType::Prefix, status::IN_DICT),
                    Piece::new(rest, MorphemeType::Stem, status::IN_DICT),
                ]);
            }
            for suf in sufs {
                if let Some(stem) = rest.strip_suffix(suf.as_str()) {
                    if stem.is_empty() {
                        continue;
                    }
                    let stem_name = format!("{stem}{stem_subscr}");
                    if !dict.lookup(&stem_name).is_empty() {
                        out.push(vec![
                            Piece::new(pre.clone(), MorphemeType::Prefix, status::IN_DICT),
                            Piece::new(stem, MorphemeType::Stem, status::IN_DICT),
                            Piece::new(suf.clone(), MorphemeType::Suffix, status::IN_DICT),
                        ]);
                    }
                }
            }
        }
    }

    // Multi-prefix splitting (Hebrew-style): peel more than one PRE
    // entry off the front before reaching the stem.
    if !mpres.is_empty() {
        let mut rest = token;
        let mut prefixes = Vec::new();
        'outer: loop {
            for mpre in mpres {
                if let Some(r) = rest.strip_prefix(mpre.as_str()) {
                    if r.is_empty() {
                        break 'outer;
                    }
                    prefixes.push(mpre.clone());
                    rest = r;
                    continue 'outer;
                }
            }
            break;
        }
        if !prefixes.is_empty() && !dict.lookup(rest).is_empty() {
            let mut alt: Alt = prefixes.iter().map(|p| Piece::new(p.clone(), MorphemeType::Prefix, status::IN_DICT)).collect();
            alt.push(Piece::new(rest, MorphemeType::Stem, status::IN_DICT));
            out.push(alt);
        }
    }

    for suf in sufs {
        if let Some(stem) = token.strip_suffix(suf.as_str()) {
            if stem.is_empty() {
                continue;
            }
            let stem_name = format!("{stem}{stem_subscr}");
            if !dict.lookup(&stem_name).is_empty() {
                out.push(vec![
                    Piece::new(stem, MorphemeType::Stem, status::IN_DICT),
                    Piece::new(suf.clone(), MorphemeType::Suffix, status::IN_DICT),
                ]);
            }
        }
    }
    out
}

/// Step 5: capitalization handling.
fn capitalization_alt(token: &str, capitalizable: bool) -> Option<(Alt, status::Status)> {
    if !is_capital_initial(token) || !capitalizable {
        return None;
    }
    let lower = to_lower(token);
    if lower == token {
        return None;
    }
    Some((vec![Piece::new(lower, MorphemeType::Word, status::IN_DICT | status::FIRST_UPPER)], status::FIRST_UPPER))
}

/// Step 6: regex classification.
fn regex_alt(token: &str, dict: &dyn Dictionary) -> Option<Alt> {
    let name = dict.regex_match(token)?;
    if dict.lookup(&name).is_empty() {
        return None;
    }
    let mut piece = Piece::new(token, MorphemeType::Unknown, status::REGEX_MATCH);
    piece.regex_name = Some(name);
    Some(vec![piece])
}

/// Step 7: spell-guess alternatives — here, a run-on split: the token
/// contains no digits and is unknown, so try splitting it at every
/// position into two dictionary words.
fn spell_guess_alts(token: &str, dict: &dyn Dictionary, max_guesses: u32) -> Vec<Alt> {
    if max_guesses == 0 || token.chars().any(|c| c.is_ascii_digit()) {
        return Vec::new();
    }
    let mut out = Vec::new();
    let chars: Vec<char> = token.chars().collect();
    for split in 1..chars.len() {
        if out.len() as u32 >= max_guesses {
            break;
        }
        let left: String = chars[..split].iter().collect();
        let right: String = chars[split..].iter().collect();
        if !dict.lookup(&left).is_empty() && !dict.lookup(&right).is_empty() {
            out.push(vec![
                Piece::new(left, MorphemeType::Word, status::SPELL_GUESS | status::RUNON),
                Piece::new(right, MorphemeType::Word, status::SPELL_GUESS | status::RUNON),
            ]);
        }
    }
    out
}

/// Step 8: fallback to `UNKNOWN-WORD`.
fn unknown_alt(token: &str, dict: &dyn Dictionary) -> Option<Alt> {
    if !dict.use_unknown_word() {
        return None;
    }
    Some(vec![Piece::new(token, MorphemeType::Unknown, 0)])
}

/// §4.C "Redundancy prevention": drop a candidate whose first subword
/// duplicates (or, when that first subword is unknown, is a prefix of)
/// an already-issued alternative's first subword.
fn prune_redundant(alts: Vec<Alt>, dict: &dyn Dictionary) -> Vec<Alt> {
    let mut kept: Vec<Alt> = Vec::new();
    'next: for alt in alts {
        if alt.is_empty() {
            continue;
        }
        let first = &alt[0].text;
        for prev in &kept {
            let prev_first = &prev[0].text;
            if prev_first == first {
                continue 'next;
            }
            let prev_unknown = dict.lookup(prev_first).is_empty();
            if prev_unknown && first.starts_with(prev_first.as_str()) {
                continue 'next;
            }
        }
        kept.push(alt);
    }
    kept
}

fn compute_alternatives(
    token: &str,
    dict: &dyn Dictionary,
    opts: &TokenizeOptions,
    capitalizable: bool,
    warnings: &mut Vec<TokenizeWarning>
) -> Vec<Alt> {
    let mut alts = Vec::new();
    if let Some(a) = literal_alt(token, dict) {
        alts.push(a);
    }
    let right = right_strip_alts(token, dict, opts.split_cap);
    if right.len() as u32 + alts.len() as u32 > opts.split_cap {
        warnings.push(TokenizeWarning::OverSplitCap { token: token.to_string() });
    }
    alts.extend(right);
    alts.extend(left_strip_alts(token, dict));
    alts.extend(affix_alts(token, dict));
    if let Some((a, _)) = capitalization_alt(token, capitalizable) {
        alts.push(a);
    }
    if let Some(a) = regex_alt(token, dict) {
        alts.push(a);
    }
    if alts.is_empty() {
        alts.extend(spell_guess_alts(token, dict, opts.use_spell_guess));
    }
    if alts.is_empty() {
        if let Some(a) = unknown_alt(token, dict) {
            alts.push(a);
        }
    }
    let alts = prune_redundant(alts, dict);
    if alts.len() as u32 > opts.split_cap {
        warn!("token {token:?} exceeded split cap ({}); truncating alternatives", opts.split_cap);
        return alts.into_iter().take(opts.split_cap as usize).collect();
    }
    alts
}

fn is_sentence_boundary_prev(prev_raw: Option<&str>) -> bool {
    match prev_raw {
        None => true,
        Some(p) => p.ends_with(':') || p.ends_with('"') || p.ends_with('\u{2018}') || p.ends_with('-')
    }
}

/// Append one raw token's alternatives to the DAG/word array, returning
/// the new right-hand frontier of nodes to link the next token from.
fn emit_token(
    dag: &mut WordGraph,
    pool: &mut StringPool,
    words: &mut Vec<WordArrayEntry>,
    prev_frontier: Vec<NodeIdx>,
    unsplit_word: NodeIdx,
    alts: Vec<Alt>
) -> Vec<NodeIdx> {
    if alts.is_empty() {
        return prev_frontier;
    }
    let max_len = alts.iter().map(Vec::len).max().unwrap_or(0);
    let empty_sym = pool.intern(lg_dict::EMPTY_WORD);
    let base_pos = words.len();
    for _ in 0..max_len {
        words.push(WordArrayEntry { display_string: String::new(), alternatives: Vec::new(), nodes: Vec::new(), optional: false });
    }

    let mut chain_tails = Vec::new();
    for alt in &alts {
        let alt_len = alt.len();
        let mut alt_id: Option<NodeIdx> = None;
        let mut chain_prev: Vec<NodeIdx> = prev_frontier.clone();
        for slot in 0..max_len {
            let node = if slot < alt_len {
                let piece = &alt[slot];
                let sym = pool.intern(&piece.text);
                let node = dag.push(Gword {
                    subword: sym,
                    morpheme_type: piece.morpheme_type,
                    status: piece.status,
                    unsplit_word,
                    alternative_id: alt_id.unwrap_or(NodeIdx(u32::MAX)),
                    prev: Vec::new(),
                    next: Vec::new(),
                    regex_name: piece.regex_name.clone()
                });
                if alt_id.is_none() {
                    alt_id = Some(node);
                    dag.get_mut(node).alternative_id = node;
                } else {
                    dag.get_mut(node).alternative_id = alt_id.unwrap();
                }
                let entry = &mut words[base_pos + slot];
                entry.alternatives.push(sym);
                entry.nodes.push(node);
                if entry.display_string.is_empty() {
                    entry.display_string = piece.text.clone();
                }
                node
            } else {
                // Pad shorter alternatives so every path spans the same
                // index range (spec.md §4.C "Flattening").
                let node = dag.push(Gword {
                    subword: empty_sym,
                    morpheme_type: MorphemeType::Empty,
                    status: 0,
                    unsplit_word,
                    alternative_id: alt_id.unwrap_or(NodeIdx(u32::MAX)),
                    prev: Vec::new(),
                    next: Vec::new(),
                    regex_name: None
                });
                let entry = &mut words[base_pos + slot];
                entry.alternatives.push(empty_sym);
                entry.nodes.push(node);
                node
            };
            for &p in &chain_prev {
                dag.link(p, node);
            }
            chain_prev = vec![node];
        }
        chain_tails.push(chain_prev[0]);
    }
    words[base_pos].optional = alts.len() > 1;
    chain_tails
}

/// Tokenize `sentence` against `dict`, producing the wordgraph DAG and
/// the flattened word array (spec.md §4.C).
pub fn tokenize(sentence: &str, dict: &dyn Dictionary, pool: &mut StringPool, opts: &TokenizeOptions) -> Result<TokenizeOutput, TokenizeError> {
    let raw_tokens: Vec<&str> = sentence.split_whitespace().collect();
    if raw_tokens.is_empty() {
        return Err(TokenizeError::EmptySentence);
    }

    let mut dag = WordGraph::new(pool);
    let mut words = Vec::new();
    let mut warnings = Vec::new();
    let mut frontier = vec![dag.source];

    if dict.left_wall_defined() {
        let wall = lg_dict::LEFT_WALL;
        let alt = vec![vec![Piece::new(wall, MorphemeType::Wall, status::IN_DICT)]];
        let unsplit = dag.source;
        frontier = emit_token(&mut dag, pool, &mut words, frontier, unsplit, alt);
    }

    for (i, &tok) in raw_tokens.iter().enumerate() {
        let capitalizable = is_sentence_boundary_prev(if i == 0 { None } else { Some(raw_tokens[i - 1]) });
        let alts = compute_alternatives(tok, dict, opts, capitalizable, &mut warnings);
        if alts.is_empty() {
            debug!("token {tok:?} produced no alternatives; sentence will be unparsable unless UNKNOWN-WORD is available");
        }
        let unsplit = *frontier.first().unwrap_or(&dag.source);
        frontier = emit_token(&mut dag, pool, &mut words, frontier, unsplit, alts);
    }

    if dict.right_wall_defined() {
        let wall = lg_dict::RIGHT_WALL;
        let alt = vec![vec![Piece::new(wall, MorphemeType::Wall, status::IN_DICT)]];
        let unsplit = dag.sink;
        frontier = emit_token(&mut dag, pool, &mut words, frontier, unsplit, alt);
    }

    for node in frontier {
        dag.link(node, dag.sink);
    }

    Ok(TokenizeOutput { dag, words, warnings })
}

#[cfg(test)]
mod test {
    use super::*;
    use lg_dict::{InMemoryDictionary, UNKNOWN_WORD};
    use lg_expr::SurfaceExp;

    fn basic_dict() -> InMemoryDictionary {
        let mut d = InMemoryDictionary::new();
        for w in ["this", "is", "a", "test", "The", "the", "cat", "sat", "on", "mat"] {
            d.insert(w, SurfaceExp::null(0.0), None);
        }
        d.set_affix_class(AffixClass::RPunc, vec![".".into(), ",".into()]);
        d
    }

    #[test]
    fn simple_sentence_flattens_one_word_per_token() {
        let dict = basic_dict();
        let mut pool = StringPool::new();
        let out = tokenize("this is a test", &dict, &mut pool, &TokenizeOptions::default()).unwrap();
        assert_eq!(out.words.len(), 4);
        for w in &out.words {
            assert_eq!(w.alternatives.len(), 1);
        }
        assert!(out.dag.check_invariants().is_ok());
    }

    #[test]
    fn trailing_punctuation_is_right_stripped() {
        let dict = basic_dict();
        let mut pool = StringPool::new();
        let out = tokenize("The cat sat on the mat.", &dict, &mut pool, &TokenizeOptions::default()).unwrap();
        // "mat." splits into "mat" + "." -> two word-array positions for that token.
        assert!(out.words.len() >= 6);
        assert!(out.dag.check_invariants().is_ok());
    }

    #[test]
    fn empty_sentence_is_input_invalid() {
        let dict = basic_dict();
        let mut pool = StringPool::new();
        assert!(matches!(tokenize("   ", &dict, &mut pool, &TokenizeOptions::default()), Err(TokenizeError::EmptySentence)));
    }

    #[test]
    fn unknown_word_fallback_when_enabled() {
        let mut dict = basic_dict();
        dict.set_use_unknown_word(true);
        dict.insert(UNKNOWN_WORD, SurfaceExp::null(0.0), None);
        let mut pool = StringPool::new();
        let out = tokenize("xyzzy plugh", &dict, &mut pool, &TokenizeOptions::default()).unwrap();
        assert_eq!(out.words.len(), 2);
        assert_eq!(pool.resolve(out.words[0].alternatives[0]), "xyzzy");
        assert_eq!(pool.resolve(out.words[1].alternatives[0]), "plugh");
    }
}
