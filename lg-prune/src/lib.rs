//! Expression pruning (§4.E), power pruning (§4.F), post-process
//! pruning (§4.G) and the fast-match index (§4.H) that the counting
//! recursion in `lg-parse` is built on.

pub mod expr_prune;
pub mod fast_match;
pub mod power_prune;
pub mod pp_prune;

pub use expr_prune::prune_expressions;
pub use fast_match::FastMatchIndex;
pub use power_prune::{power_prune, PowerPruneOptions};
pub use pp_prune::pp_prune;

/// Run §4.F and §4.G alternately until neither removes anything
/// (spec.md §4.G: "Alternates with §4.F ... until neither removes
/// anything").
pub fn prune_to_fixpoint(
    pool: &lg_expr::StringPool,
    words: &mut [Vec<lg_expr::Disjunct>],
    power_opts: PowerPruneOptions,
    pp_rules: &[lg_dict::PpRule]
) {
    loop {
        let before: usize = words.iter().map(Vec::len).sum();
        power_prune(pool, words, power_opts);
        pp_prune(pool, words, pp_rules);
        let after: usize = words.iter().map(Vec::len).sum();
        if after == before {
            break;
        }
    }
}
