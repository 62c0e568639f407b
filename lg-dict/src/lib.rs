//! The dictionary trait boundary (spec.md §6) and an in-memory reference
//! implementation used by the test suite and `demos/parse_demo`. Reading
//! real dictionary files (`.dict`/affix files) is explicitly out of
//! scope (spec.md §1); callers hand this crate already-parsed entries.
//!
//! The core (`lg-tokenize`, `lg-prune`, `lg-parse`) only ever sees the
//! [`Dictionary`] trait, never this module's concrete type, so a real
//! embedding application can supply its own dictionary (e.g. one backed
//! by the on-disk `.dict` format) without the core crates depending on
//! a file format.

pub mod special_words;

use std::collections::HashMap;

use fnv::FnvHashMap;
use lg_expr::SurfaceExp;
use regex::Regex;
use thiserror::Error;

pub use special_words::{EMPTY_WORD, LEFT_WALL, RIGHT_WALL, UNKNOWN_WORD};

/// One dictionary entry: a surface string's expression, and (for
/// diagnostics) which source file it came from.
#[derive(Clone, Debug)]
pub struct Entry {
    pub surface_string: String,
    pub expression: SurfaceExp,
    pub source_file_tag: Option<String>
}

/// The affix-class vocabulary a tokenizer consults (spec.md §6).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum AffixClass {
    RPunc,
    LPunc,
    Units,
    Bullets,
    Quotes,
    Pre,
    Suf,
    MPre,
    StemSubscr
}

/// One "contains-one"/"contains-none"/"form-a-cycle"/"bounded" rule
/// (spec.md §4.L). `trigger` is a link-name pattern (matched with the
/// connector-matching rules of spec.md §3, treating the rule's pattern
/// as one side of the match); `criteria` lists the patterns the rule
/// checks for.
#[derive(Clone, Debug)]
pub struct PpRule {
    pub family: PpRuleFamily,
    pub trigger: String,
    pub criteria: Vec<String>,
    /// Present only for "bounded" rules: the domain-name this rule
    /// bounds (spec.md §4.L last bullet).
    pub domain_name: Option<String>
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PpRuleFamily {
    ContainsOneGlobal,
    ContainsOne,
    ContainsNone,
    FormACycle,
    Bounded
}

/// The four domain-building DFS shapes spec.md §4.L point 2 names
/// (normal / urfl / urfl-only / left-domain). Only `Normal` has
/// production-grade English rule coverage in the kept dictionary
/// sources; the other three are modelled with the narrower,
/// documented behavior `post-process.c`'s `urfl_*`/`left_*` DFS
/// variants show rather than claimed as fully equivalent to it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DomainVariant {
    /// Starter link itself may or may not join the domain (dictionary
    /// controlled); DFS stops at `restricted`-listed connectors only
    /// when stepping to a word left of both the domain root and the
    /// current word.
    Normal,
    /// Starter link always joins the domain; DFS additionally refuses
    /// to continue through any connector in the rule set's restricted
    /// list regardless of word order.
    Urfl,
    /// Starter link never joins the domain; DFS is rooted at the
    /// starter's left word and additionally will not step rightward
    /// past the starter's right word.
    UrflOnly,
    /// Starter link never joins the domain; DFS refuses to revisit the
    /// starter's right-hand word (mirrors `left_depth_first_search`).
    LeftDomain
}

/// One link-name pattern that starts a new post-process domain, and
/// which DFS shape to build it with.
#[derive(Clone, Debug)]
pub struct DomainStarter {
    pub pattern: String,
    pub variant: DomainVariant
}

/// The rule sets a dictionary's postprocessor knot exposes (spec.md
/// §4.L). Link names that should start a new post-process *domain* are
/// listed separately from the rule families themselves, mirroring the
/// original's split between `knowledge.c`'s domain-starter list and its
/// rule tables.
#[derive(Clone, Debug, Default)]
pub struct PostProcessRules {
    pub rules: Vec<PpRule>,
    /// Link-name patterns that start a new domain when seen as the root
    /// of a DFS, each tagged with which DFS shape to use.
    pub domain_starters: Vec<DomainStarter>,
    /// Connector-name patterns a `Urfl`/`UrflOnly` domain's DFS refuses
    /// to step through (spec.md §4.L's "per-domain restricted-connector
    /// rules").
    pub restricted_connectors: Vec<String>
}

#[derive(Debug, Error)]
pub enum DictError {
    #[error("dictionary is missing mandatory entry {0:?}")]
    MissingMandatoryEntry(&'static str),
    #[error("invalid regex {name:?}: {source}")]
    InvalidRegex {
        name: String,
        #[source]
        source: regex::Error
    }
}

/// §6: "A dictionary exposes..." — the boundary the core parses against.
/// The core never writes through this trait.
pub trait Dictionary {
    /// Subscripted lookups are distinct entries: `word` and
    /// `word.subscript` must be looked up as different strings by the
    /// caller (the dictionary itself does no subscript-stripping).
    fn lookup(&self, word: &str) -> Vec<Entry>;

    /// The regex class name a word matches, if any (spec.md §4.C step 6).
    fn regex_match(&self, word: &str) -> Option<String>;

    /// The words/strings in an affix class (spec.md §6).
    fn affix_class(&self, class: AffixClass) -> &[String];

    fn postprocess_rules(&self) -> &PostProcessRules;

    /// Connector-name patterns that are exempt from short-length limits.
    fn unlimited_set(&self) -> &[String];

    /// Connector-name patterns eligible for the "andable" capitalization
    /// heuristic (spec.md §4.C step 5 consults this indirectly via
    /// `<marker-entity>`/`<marker-common-entity>`).
    fn andable_set(&self) -> &[String];

    fn has_empty_word(&self) -> bool;
    fn left_wall_defined(&self) -> bool;
    fn right_wall_defined(&self) -> bool;
    fn use_unknown_word(&self) -> bool;
}

/// A plain, in-process [`Dictionary`] built by the embedding application
/// (or by tests/`demos/parse_demo`) by inserting entries directly —
/// the reference implementation spec.md §1 says the core treats
/// "dictionary file/regex parsers" as an external collaborator.
#[derive(Debug, Default)]
pub struct InMemoryDictionary {
    entries: FnvHashMap<String, Vec<Entry>>,
    regexes: Vec<(Regex, String)>,
    affix_classes: HashMap<AffixClass, Vec<String>>,
    pp_rules: PostProcessRules,
    unlimited: Vec<String>,
    andable: Vec<String>,
    use_unknown_word: bool
}

impl InMemoryDictionary {
    pub fn new() -> Self {
        InMemoryDictionary::default()
    }

    pub fn insert(&mut self, word: impl Into<String>, expression: SurfaceExp, source_file_tag: Option<String>) {
        let word = word.into();
        self.entries.entry(word.clone()).or_default().push(Entry {
            surface_string: word,
            expression,
            source_file_tag
        });
    }

    /// Register a regex class; `name` must itself be a dictionary word
    /// (spec.md §4.C step 6: "a regex whose name is defined as a word").
    pub fn add_regex(&mut self, pattern: &str, name: impl Into<String>) -> Result<(), DictError> {
        let name = name.into();
        let re = Regex::new(pattern).map_err(|source| DictError::InvalidRegex { name: name.clone(), source })?;
        self.regexes.push((re, name));
        Ok(())
    }

    pub fn set_affix_class(&mut self, class: AffixClass, words: Vec<String>) {
        self.affix_classes.insert(class, words);
    }

    pub fn set_unlimited_set(&mut self, patterns: Vec<String>) {
        self.unlimited = patterns;
    }

    pub fn set_andable_set(&mut self, patterns: Vec<String>) {
        self.andable = patterns;
    }

    pub fn set_use_unknown_word(&mut self, v: bool) {
        self.use_unknown_word = v;
    }

    pub fn postprocess_rules_mut(&mut self) -> &mut PostProcessRules {
        &mut self.pp_rules
    }

    /// Surface the mandatory checks of spec.md §7 `DictionaryInconsistent`:
    /// `UNKNOWN-WORD` must exist if the dictionary claims
    /// `use_unknown_word`.
    pub fn validate(&self) -> Result<(), DictError> {
        if self.use_unknown_word && !self.entries.contains_key(UNKNOWN_WORD) {
            return Err(DictError::MissingMandatoryEntry(UNKNOWN_WORD));
        }
        Ok(())
    }
}

impl Dictionary for InMemoryDictionary {
    fn lookup(&self, word: &str) -> Vec<Entry> {
        self.entries.get(word).cloned().unwrap_or_default()
    }

    fn regex_match(&self, word: &str) -> Option<String> {
        self.regexes.iter().find(|(re, _)| re.is_match(word)).map(|(_, name)| name.clone())
    }

    fn affix_class(&self, class: AffixClass) -> &[String] {
        self.affix_classes.get(&class).map(|v| v.as_slice()).unwrap_or(&[])
    }

    fn postprocess_rules(&self) -> &PostProcessRules {
        &self.pp_rules
    }

    fn unlimited_set(&self) -> &[String] {
        &self.unlimited
    }

    fn andable_set(&self) -> &[String] {
        &self.andable
    }

    fn has_empty_word(&self) -> bool {
        self.entries.contains_key(EMPTY_WORD)
    }

    fn left_wall_defined(&self) -> bool {
        self.entries.contains_key(LEFT_WALL)
    }

    fn right_wall_defined(&self) -> bool {
        self.entries.contains_key(RIGHT_WALL)
    }

    fn use_unknown_word(&self) -> bool {
        self.use_unknown_word
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use lg_expr::Direction;

    #[test]
    fn lookup_distinguishes_subscripts() {
        let mut dict = InMemoryDictionary::new();
        dict.insert("run", SurfaceExp::null(0.0), None);
        dict.insert("run.v", SurfaceExp::null(0.0), None);
        assert_eq!(dict.lookup("run").len(), 1);
        assert_eq!(dict.lookup("run.v").len(), 1);
        assert!(dict.lookup("run.n").is_empty());
    }

    #[test]
    fn multiple_entries_per_word_are_alternatives() {
        let mut dict = InMemoryDictionary::new();
        dict.insert("can", SurfaceExp::connector(0.0, "A", Direction::Right, false, u16::MAX), Some("verb".into()));
        dict.insert("can", SurfaceExp::connector(0.0, "B", Direction::Right, false, u16::MAX), Some("noun".into()));
        assert_eq!(dict.lookup("can").len(), 2);
    }

    #[test]
    fn regex_match_requires_registered_pattern() {
        let mut dict = InMemoryDictionary::new();
        dict.add_regex(r"^[0-9]+$", "NUMBER").unwrap();
        assert_eq!(dict.regex_match("1984").as_deref(), Some("NUMBER"));
        assert_eq!(dict.regex_match("abc"), None);
    }

    #[test]
    fn validate_requires_unknown_word_entry() {
        let mut dict = InMemoryDictionary::new();
        dict.set_use_unknown_word(true);
        assert!(dict.validate().is_err());
        dict.insert(UNKNOWN_WORD, SurfaceExp::null(0.0), None);
        assert!(dict.validate().is_ok());
    }
}
