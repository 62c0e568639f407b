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

//! §4.G: post-process pruning. Drops any disjunct whose trigger
//! connector names a "contains-one" rule that cannot possibly be
//! satisfied anywhere in the sentence, given the connectors still
//! surviving on other disjuncts.
//!
//! Open Question (recorded in DESIGN.md): spec.md's wording ("for every
//! uppercase-prefix pattern of each criterion name, some name in M
//! matches each subscript hole") describes the *per-rule* satisfiability
//! test but not whether a rule's several criteria are OR'd or AND'd. We
//! follow `post-process.c`'s own "contains one" naming and §4.L's later
//! phrasing ("at least one criterion link-name must also appear"): a
//! rule is satisfiable iff *some* criterion name matches *some* surviving
//! connector name in the multiset.

use fnv::FnvHashMap;
use lg_dict::{PpRule, PpRuleFamily};
use lg_expr::{connectors_match, Disjunct, StringPool};

/// Multiset of connector names across every surviving disjunct, keyed by
/// the raw (uninterned) string so a single name's count can be
/// decremented independently of any one disjunct's interning pool.
fn build_multiset(pool: &StringPool, words: &[Vec<Disjunct>]) -> FnvHashMap<String, u32> {
    let mut m: FnvHashMap<String, u32> = FnvHashMap::default();
    for disjuncts in words {
        for d in disjuncts {
            for c in d.left_jet.iter().chain(d.right_jet.iter()) {
                *m.entry(pool.resolve(c.name).to_string()).or_insert(0) += 1;
            }
        }
    }
    m
}

fn rule_satisfiable(rule: &PpRule, multiset: &FnvHashMap<String, u32>) -> bool {
    rule.criteria.iter().any(|criterion| multiset.keys().any(|name| connectors_match(criterion, name)))
}

/// Does any connector on `d` trigger a "contains-one" rule that
/// `multiset` proves can never be satisfied? Only `ContainsOne` rules
/// are fed to this pass (spec.md §4.G); the other families are domain-
/// or whole-linkage-scoped tests that only make sense once a linkage
/// exists, and are left to the post-processor.
fn disjunct_triggers_dead_rule(pool: &StringPool, d: &Disjunct, rules: &[PpRule], multiset: &FnvHashMap<String, u32>) -> bool {
    d.left_jet.iter().chain(d.right_jet.iter()).any(|c| {
        let name = pool.resolve(c.name);
        rules
            .iter()
            .filter(|r| matches!(r.family, PpRuleFamily::ContainsOne))
            .any(|r| connectors_match(&r.trigger, name) && !rule_satisfiable(r, multiset))
    })
}

/// Run §4.G to a fixpoint: drop disjuncts with a dead-rule trigger,
/// rebuild the multiset, repeat until a pass removes nothing. Returns
/// whether anything was removed (callers alternate this with power
/// pruning — spec.md §4.G "Alternates with §4.F... until neither
/// removes anything").
pub fn pp_prune(pool: &StringPool, words: &mut [Vec<Disjunct>], rules: &[PpRule]) -> bool {
    if rules.is_empty() {
        return false;
    }
    let mut changed_any = false;
    loop {
        let multiset = build_multiset(pool, words);
        let mut changed = false;
        for w in words.iter_mut() {
            let before = w.len();
            w.retain(|d| !disjunct_triggers_dead_rule(pool, d, rules, &multiset));
            if w.len() != before {
                changed = true;
            }
        }
        changed_any |= changed;
        if !changed {
            break;
        }
    }
    changed_any
}

#[cfg(test)]
mod test {
    use super::*;
    use lg_expr::{Connector, Direction};

    fn disjunct(pool: &mut StringPool, left: &[&str], right: &[&str]) -> Disjunct {
        let word = pool.intern("w");
        Disjunct {
            left_jet: left.iter().map(|n| Connector::new(pool.intern(n), Direction::Left, false, u16::MAX)).collect(),
            right_jet: right.iter().map(|n| Connector::new(pool.intern(n), Direction::Right, false, u16::MAX)).collect(),
            cost: 0.0,
            word
        }
    }

    #[test]
    fn unsatisfiable_rule_drops_triggering_disjunct() {
        let mut pool = StringPool::new();
        let d0 = disjunct(&mut pool, &[], &["CV"]);
        let mut words = vec![vec![d0]];
        let rules = vec![PpRule {
            family: PpRuleFamily::ContainsOne,
            trigger: "CV".into(),
            criteria: vec!["Wd".into()],
            domain_name: None
        }];
        // Nothing in the sentence ever has a "Wd" connector, so the rule
        // can never be satisfied and the disjunct bearing CV is dropped.
        let changed = pp_prune(&pool, &mut words, &rules);
        assert!(changed);
        assert!(words[0].is_empty());
    }

    #[test]
    fn satisfiable_rule_keeps_disjunct() {
        let mut pool = StringPool::new();
        let d0 = disjunct(&mut pool, &[], &["CV"]);
        let d1 = disjunct(&mut pool, &["Wd"], &[]);
        let mut words = vec![vec![d0], vec![d1]];
        let rules = vec![PpRule {
            family: PpRuleFamily::ContainsOne,
            trigger: "CV".into(),
            criteria: vec!["Wd".into()],
            domain_name: None
        }];
        let changed = pp_prune(&pool, &mut words, &rules);
        assert!(!changed);
        assert_eq!(words[0].len(), 1);
        assert_eq!(words[1].len(), 1);
    }

    #[test]
    fn no_rules_is_a_no_op() {
        let mut pool = StringPool::new();
        let d0 = disjunct(&mut pool, &[], &["CV"]);
        let mut words = vec![vec![d0]];
        assert!(!pp_prune(&pool, &mut words, &[]));
        assert_eq!(words[0].len(), 1);
    }

    #[test]
    fn contains_none_rule_is_not_fed_to_this_pass() {
        // A ContainsNone rule is satisfied by *absence* of its criteria,
        // the opposite test from ContainsOne's rule_satisfiable. Feeding
        // it through this pass would read "no Wd anywhere" as
        // unsatisfiable and wrongly drop every CV-bearing disjunct; since
        // this pass only ever looks at ContainsOne rules, the disjunct
        // must survive untouched regardless of what the rule says.
        let mut pool = StringPool::new();
        let d0 = disjunct(&mut pool, &[], &["CV"]);
        let mut words = vec![vec![d0]];
        let rules = vec![PpRule {
            family: PpRuleFamily::ContainsNone,
            trigger: "CV".into(),
            criteria: vec!["Wd".into()],
            domain_name: None
        }];
        let changed = pp_prune(&pool, &mut words, &rules);
        assert!(!changed);
        assert_eq!(words[0].len(), 1);
    }
}
