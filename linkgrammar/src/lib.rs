//! A single facade crate over `lg-expr`, `lg-tokenize`, `lg-dict`,
//! `lg-prune` and `lg-parse`: everything an embedding application needs
//! to parse a sentence against a [`Dictionary`] and walk the resulting
//! linkages, re-exported from one place. The `lg-*` crates remain the
//! layered implementation (spec.md §2's module boundaries); this crate
//! adds nothing of its own beyond the re-exports.

pub use lg_dict::{
    AffixClass, DictError, Dictionary, DomainStarter, DomainVariant, Entry, InMemoryDictionary, PostProcessRules, PpRule, PpRuleFamily,
    EMPTY_WORD, LEFT_WALL, RIGHT_WALL, UNKNOWN_WORD
};
pub use lg_expr::{
    build_clauses, build_disjuncts, connector_meet, connectors_match, Clause, Connector, Direction, Disjunct, Exp, ExpConnector, ExpKind, StringPool,
    SurfaceExp, SurfaceExpKind, Sym
};
pub use lg_parse::{
    domain_names_per_link, CostModel, DriverError, ExtractError, Link, Linkage, LinkageLink, ParseOptions, PostProcessOutcome, Postprocessor, PpLink,
    RawLinkage, ResourceLimits, Sentence
};
pub use lg_prune::{power_prune, prune_expressions, prune_to_fixpoint, FastMatchIndex, PowerPruneOptions};
pub use lg_tokenize::{tokenize, Gword, MorphemeType, NodeIdx, TokenizeError, TokenizeOptions, TokenizeOutput, TokenizeWarning, WordArrayEntry, WordGraph};

#[cfg(test)]
mod test {
    use lg_expr::{Direction, SurfaceExp};

    use super::*;

    #[test]
    fn facade_reexports_parse_a_sentence() {
        let mut dict = InMemoryDictionary::new();
        dict.insert("birds", SurfaceExp::connector(0.0, "Sp", Direction::Right, false, u16::MAX), None);
        dict.insert("fly", SurfaceExp::connector(0.0, "Sp", Direction::Left, false, u16::MAX), None);

        let opts = ParseOptions::default();
        let sentence = Sentence::parse(&dict, "birds fly", &opts).unwrap();
        assert_eq!(sentence.num_words(), 2);
        assert!(!sentence.linkages.is_empty());
    }
}
