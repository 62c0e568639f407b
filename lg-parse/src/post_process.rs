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

//! §4.L: the post-processor. Runs after a linkage has been materialized
//! (`parse_set.rs`/`extract.rs`): builds an undirected link graph over
//! the linkage's words, partitions it into "domains" rooted at
//! domain-starting links, nests the domains into a forest, then checks
//! each post-process rule family against that structure. The first
//! rule a linkage fails is recorded as its violation; the linkage
//! itself is not discarded here (the sentence driver decides whether a
//! flagged linkage still counts as valid).

use fnv::FnvHashSet;
use lg_dict::{DomainVariant, PostProcessRules, PpRule, PpRuleFamily};

/// One link in a materialized linkage, as the post-processor needs it:
/// word endpoints and the link's composite name. `driver.rs` builds
/// this from a [`crate::extract::RawLinkage`] by resolving each link's
/// `ConnRef` pair to its composite connector name.
#[derive(Clone, Debug)]
pub struct PpLink {
    pub lw: usize,
    pub rw: usize,
    pub name: String
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PostProcessOutcome {
    Ok,
    Violation(String)
}

/// Link-name pattern matching (`post_process_match` in the original):
/// uppercase-letter runs in `pattern` must match exactly; `#` in
/// `pattern` matches anything; a candidate shorter than `pattern` is
/// padded with `*`, which only an explicit `*` in `pattern` matches. A
/// leading lowercase character in `candidate` (the head/dependent
/// indicator link-grammar prefixes some link names with) is skipped.
fn pp_match(pattern: &str, candidate: &str) -> bool {
    let s = pattern.as_bytes();
    let t_full = candidate.as_bytes();
    if t_full.is_empty() {
        return false;
    }
    let t = if t_full[0].is_ascii_lowercase() { &t_full[1..] } else { t_full };

    let mut si = 0usize;
    let mut ti = 0usize;
    loop {
        let sc = s.get(si).copied().unwrap_or(0);
        let tc = t.get(ti).copied().unwrap_or(0);
        if !(sc.is_ascii_uppercase() || tc.is_ascii_uppercase()) {
            break;
        }
        if sc != tc {
            return false;
        }
        si += 1;
        ti += 1;
    }
    while si < s.len() {
        if s[si] != b'#' {
            let c = if ti < t.len() { t[ti] } else { b'*' };
            if s[si] != c {
                return false;
            }
        }
        si += 1;
        if ti < t.len() {
            ti += 1;
        }
    }
    true
}

fn matches_any(patterns: &[String], candidate: &str) -> bool {
    patterns.iter().any(|p| pp_match(p, candidate))
}

fn adjacency(links: &[PpLink], num_words: usize) -> Vec<Vec<(usize, usize)>> {
    let mut adj = vec![Vec::new(); num_words];
    for (idx, link) in links.iter().enumerate() {
        adj[link.lw].push((link.rw, idx));
        adj[link.rw].push((link.lw, idx));
    }
    adj
}

struct Domain {
    pattern: String,
    start_link: usize,
    /// Every link the domain's DFS swept up.
    members: Vec<usize>
}

#[allow(clippy::too_many_arguments)]
fn depth_first_search(adj: &[Vec<(usize, usize)>], visited: &mut [bool], domain: &mut Domain, links: &[PpLink], restricted: &[String], w: usize, root: usize, start_link: usize) {
    visited[w] = true;
    for &(nb, lidx) in &adj[w] {
        if nb < w && lidx != start_link {
            domain.members.push(lidx);
        }
    }
    for &(nb, lidx) in &adj[w] {
        let blocked = nb < root && nb < w && matches_any(restricted, &links[lidx].name);
        if !visited[nb] && nb != root && !blocked {
            depth_first_search(adj, visited, domain, links, restricted, nb, root, start_link);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn bad_depth_first_search(adj: &[Vec<(usize, usize)>], visited: &mut [bool], domain: &mut Domain, links: &[PpLink], restricted: &[String], w: usize, root: usize, start_link: usize) {
    visited[w] = true;
    for &(nb, lidx) in &adj[w] {
        if nb < w && lidx != start_link && w != root {
            domain.members.push(lidx);
        }
    }
    for &(nb, lidx) in &adj[w] {
        let blocked = nb < root && nb < w && matches_any(restricted, &links[lidx].name);
        if !visited[nb] && !(w == root && nb < w) && !blocked {
            bad_depth_first_search(adj, visited, domain, links, restricted, nb, root, start_link);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn d_depth_first_search(adj: &[Vec<(usize, usize)>], visited: &mut [bool], domain: &mut Domain, links: &[PpLink], restricted: &[String], w: usize, root: usize, right: usize, start_link: usize) {
    visited[w] = true;
    for &(nb, lidx) in &adj[w] {
        if nb < w && lidx != start_link && w != root {
            domain.members.push(lidx);
        }
    }
    for &(nb, lidx) in &adj[w] {
        let blocked = nb < root && nb < w && matches_any(restricted, &links[lidx].name);
        if !visited[nb] && !(w == root && nb >= right) && !(w == root && nb < root) && !blocked {
            d_depth_first_search(adj, visited, domain, links, restricted, nb, root, right, start_link);
        }
    }
}

fn left_depth_first_search(adj: &[Vec<(usize, usize)>], visited: &mut [bool], domain: &mut Domain, links: &[PpLink], restricted: &[String], w: usize, right: usize, start_link: usize) {
    visited[w] = true;
    for &(nb, lidx) in &adj[w] {
        if nb < w && lidx != start_link {
            domain.members.push(lidx);
        }
    }
    for &(nb, _lidx) in &adj[w] {
        if !visited[nb] && nb != right {
            // Past the starter link, continue with the regular walk, rooted at `right`.
            depth_first_search(adj, visited, domain, links, restricted, nb, right, start_link);
        }
    }
}

fn build_domains(rules: &PostProcessRules, links: &[PpLink], num_words: usize) -> Vec<Domain> {
    let adj = adjacency(links, num_words);
    let mut domains = Vec::new();

    for (link_idx, link) in links.iter().enumerate() {
        let starter = match rules.domain_starters.iter().find(|s| pp_match(&s.pattern, &link.name)) {
            Some(s) => s,
            None => continue
        };

        let mut visited = vec![false; num_words];
        let mut domain = Domain { pattern: starter.pattern.clone(), start_link: link_idx, members: Vec::new() };

        match starter.variant {
            DomainVariant::Normal => {
                depth_first_search(&adj, &mut visited, &mut domain, links, &rules.restricted_connectors, link.rw, link.lw, link_idx);
            }
            DomainVariant::Urfl => {
                domain.members.push(link_idx);
                bad_depth_first_search(&adj, &mut visited, &mut domain, links, &rules.restricted_connectors, link.rw, link.lw, link_idx);
            }
            DomainVariant::UrflOnly => {
                d_depth_first_search(&adj, &mut visited, &mut domain, links, &rules.restricted_connectors, link.lw, link.lw, link.rw, link_idx);
            }
            DomainVariant::LeftDomain => {
                left_depth_first_search(&adj, &mut visited, &mut domain, links, &rules.restricted_connectors, link.lw, link.rw, link_idx);
            }
        }

        domains.push(domain);
    }

    domains.sort_by_key(|d| d.members.len());
    domains
}

fn contained_in(d1: &Domain, d2: &Domain) -> bool {
    d1.members.iter().all(|l| d2.members.contains(l))
}

/// For each link, the smallest domain containing it (spec.md §4.L point
/// 3's "leaf list = links in this domain but no smaller one"). Domains
/// are already sorted ascending by size, so the first match in array
/// order is the smallest.
fn domain_children(domains: &[Domain], num_links: usize) -> Vec<Vec<usize>> {
    let mut children = vec![Vec::new(); domains.len()];
    for link_idx in 0..num_links {
        if let Some(d) = domains.iter().position(|d| d.members.contains(&link_idx)) {
            children[d].push(link_idx);
        }
    }
    children
}

fn apply_contains_one(rule: &PpRule, domains: &[Domain], children: &[Vec<usize>], links: &[PpLink]) -> bool {
    for (d, leaves) in domains.iter().zip(children) {
        let _ = d;
        let triggered = leaves.iter().any(|&l| pp_match(&rule.trigger, &links[l].name));
        if triggered {
            let satisfied = leaves.iter().any(|&l| matches_any(&rule.criteria, &links[l].name));
            if !satisfied {
                return false;
            }
        }
    }
    true
}

fn apply_contains_none(rule: &PpRule, domains: &[Domain], children: &[Vec<usize>], links: &[PpLink]) -> bool {
    for (d, leaves) in domains.iter().zip(children) {
        let _ = d;
        let triggered = leaves.iter().any(|&l| pp_match(&rule.trigger, &links[l].name));
        if triggered && leaves.iter().any(|&l| matches_any(&rule.criteria, &links[l].name)) {
            return false;
        }
    }
    true
}

fn apply_contains_one_globally(rule: &PpRule, links: &[PpLink]) -> bool {
    let triggered = links.iter().any(|l| pp_match(&rule.trigger, &l.name));
    if !triggered {
        return true;
    }
    links.iter().any(|l| matches_any(&rule.criteria, &l.name))
}

fn reachable_without(adj: &[Vec<(usize, usize)>], visited: &mut [bool], a: usize, b: usize, w: usize) {
    visited[w] = true;
    for &(nb, _lidx) in &adj[w] {
        if !visited[nb] && !(w == a && nb == b) && !(w == b && nb == a) {
            reachable_without(adj, visited, a, b, nb);
        }
    }
}

fn apply_must_form_a_cycle(rule: &PpRule, links: &[PpLink], num_words: usize) -> bool {
    let adj = adjacency(links, num_words);
    for link in links {
        if !matches_any(&rule.criteria, &link.name) {
            continue;
        }
        let mut visited = vec![false; num_words];
        reachable_without(&adj, &mut visited, link.lw, link.rw, link.lw);
        if !visited[link.rw] {
            return false;
        }
    }
    true
}

fn apply_bounded(rule: &PpRule, domains: &[Domain], links: &[PpLink]) -> bool {
    let domain_name = match &rule.domain_name {
        Some(n) => n,
        None => return true
    };
    for d in domains {
        if !pp_match(domain_name, &d.pattern) {
            continue;
        }
        let root_lw = links[d.start_link].lw;
        if d.members.iter().any(|&l| links[l].lw < root_lw) {
            return false;
        }
    }
    true
}

fn violation_message(rule: &PpRule) -> String {
    match rule.family {
        PpRuleFamily::ContainsOneGlobal => format!("'{}' appears without any of its required companions anywhere in the sentence", rule.trigger),
        PpRuleFamily::ContainsOne => format!("a domain containing '{}' has none of its required companions", rule.trigger),
        PpRuleFamily::ContainsNone => format!("a domain containing '{}' has a forbidden companion", rule.trigger),
        PpRuleFamily::FormACycle => "a link that must close a cycle does not".to_string(),
        PpRuleFamily::Bounded => format!("a link in domain '{}' reaches left of its domain root", rule.domain_name.as_deref().unwrap_or("?"))
    }
}

/// For each link, the patterns of every domain that contains it (not
/// just its smallest one), mirroring the original's per-link
/// `d_type_array`. `driver.rs` exposes this as `Linkage::domain_names`.
pub fn domain_names_per_link(rules: &PostProcessRules, links: &[PpLink], num_words: usize) -> Vec<Vec<String>> {
    let domains = build_domains(rules, links, num_words);
    let mut names = vec![Vec::new(); links.len()];
    for d in &domains {
        for &l in &d.members {
            names[l].push(d.pattern.clone());
        }
    }
    names
}

/// Owns which rules are known irrelevant for the current sentence
/// (spec.md §4.L "Rule pruning"): once [`Postprocessor::scan`] has seen
/// every linkage's link names, any rule whose trigger matches none of
/// them can never fire and is skipped by `process`.
pub struct Postprocessor<'a> {
    rules: &'a PostProcessRules,
    seen_link_names: FnvHashSet<String>,
    irrelevant: FnvHashSet<usize>,
    primed: bool
}

impl<'a> Postprocessor<'a> {
    pub fn new(rules: &'a PostProcessRules) -> Self {
        Postprocessor { rules, seen_link_names: FnvHashSet::default(), irrelevant: FnvHashSet::default(), primed: false }
    }

    pub fn scan(&mut self, links: &[PpLink]) {
        for link in links {
            self.seen_link_names.insert(link.name.clone());
        }
    }

    pub fn prime(&mut self) {
        if self.primed {
            return;
        }
        self.primed = true;
        if self.seen_link_names.is_empty() {
            return;
        }
        for (i, rule) in self.rules.rules.iter().enumerate() {
            if matches!(rule.family, PpRuleFamily::ContainsOneGlobal | PpRuleFamily::ContainsOne | PpRuleFamily::ContainsNone) && !self.seen_link_names.iter().any(|n| pp_match(&rule.trigger, n))
            {
                self.irrelevant.insert(i);
            }
        }
    }

    pub fn process(&self, links: &[PpLink], num_words: usize) -> PostProcessOutcome {
        for (i, rule) in self.rules.rules.iter().enumerate() {
            if rule.family != PpRuleFamily::ContainsOneGlobal || self.irrelevant.contains(&i) {
                continue;
            }
            if !apply_contains_one_globally(rule, links) {
                return PostProcessOutcome::Violation(violation_message(rule));
            }
        }

        let domains = build_domains(self.rules, links, num_words);
        let children = domain_children(&domains, links.len());

        for (i, rule) in self.rules.rules.iter().enumerate() {
            if self.irrelevant.contains(&i) {
                continue;
            }
            let ok = match rule.family {
                PpRuleFamily::ContainsOneGlobal => true,
                PpRuleFamily::ContainsOne => apply_contains_one(rule, &domains, &children, links),
                PpRuleFamily::ContainsNone => apply_contains_none(rule, &domains, &children, links),
                PpRuleFamily::FormACycle => apply_must_form_a_cycle(rule, links, num_words),
                PpRuleFamily::Bounded => apply_bounded(rule, &domains, links)
            };
            if !ok {
                return PostProcessOutcome::Violation(violation_message(rule));
            }
        }

        PostProcessOutcome::Ok
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use lg_dict::DomainStarter;

    fn link(lw: usize, rw: usize, name: &str) -> PpLink {
        PpLink { lw, rw, name: name.to_string() }
    }

    #[test]
    fn pp_match_uppercase_must_match_exactly() {
        assert!(pp_match("Ss", "Ss"));
        assert!(!pp_match("Ss", "Sp"));
    }

    #[test]
    fn pp_match_hash_is_wildcard_lowercase_tail() {
        assert!(pp_match("S#", "Ss"));
        assert!(pp_match("S#", "S"));
    }

    #[test]
    fn pp_match_skips_leading_lowercase_head_indicator() {
        assert!(pp_match("Ss", "dSs"));
    }

    #[test]
    fn contains_one_globally_passes_when_trigger_absent() {
        let rule = PpRule { family: PpRuleFamily::ContainsOneGlobal, trigger: "W".to_string(), criteria: vec!["X".to_string()], domain_name: None };
        let links = vec![link(0, 1, "Ss")];
        assert!(apply_contains_one_globally(&rule, &links));
    }

    #[test]
    fn contains_one_globally_fails_without_companion() {
        let rule = PpRule { family: PpRuleFamily::ContainsOneGlobal, trigger: "Ss".to_string(), criteria: vec!["Wd".to_string()], domain_name: None };
        let links = vec![link(0, 1, "Ss")];
        assert!(!apply_contains_one_globally(&rule, &links));
    }

    #[test]
    fn must_form_a_cycle_detects_bridge() {
        let rule = PpRule { family: PpRuleFamily::FormACycle, trigger: String::new(), criteria: vec!["Cc".to_string()], domain_name: None };
        let links = vec![link(0, 1, "Cc")];
        assert!(!apply_must_form_a_cycle(&rule, &links, 2));
    }

    #[test]
    fn must_form_a_cycle_passes_with_redundant_path() {
        let rule = PpRule { family: PpRuleFamily::FormACycle, trigger: String::new(), criteria: vec!["Cc".to_string()], domain_name: None };
        let links = vec![link(0, 1, "Cc"), link(1, 2, "Xx"), link(2, 0, "Xx")];
        assert!(apply_must_form_a_cycle(&rule, &links, 3));
    }

    #[test]
    fn domain_pruning_marks_irrelevant_trigger() {
        let rules = PostProcessRules {
            rules: vec![PpRule { family: PpRuleFamily::ContainsOneGlobal, trigger: "Zz".to_string(), criteria: vec![], domain_name: None }],
            domain_starters: vec![DomainStarter { pattern: "Ss".to_string(), variant: DomainVariant::Normal }],
            restricted_connectors: vec![]
        };
        let mut pp = Postprocessor::new(&rules);
        pp.scan(&[link(0, 1, "Ss")]);
        pp.prime();
        assert!(pp.irrelevant.contains(&0));
    }
}
