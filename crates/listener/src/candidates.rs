// SPDX-License-Identifier: MIT

//! Pure (non-I/O) candidate-tuple construction, kept separate from the
//! polling loop so the Cartesian-product/invariant-grouping logic can be
//! unit- and property-tested without a filesystem.

use pmjq_core::{Transition, TransitionConfig, TransitionIdGen};

/// Decode a linear index into per-dimension indices such that the last
/// dimension varies fastest (spec.md §4.1 "Tie-break / ordering").
fn decode(mut linear: usize, lens: &[usize]) -> Vec<usize> {
    let mut idx = vec![0usize; lens.len()];
    for i in (0..lens.len()).rev() {
        idx[i] = linear % lens[i];
        linear /= lens[i];
    }
    idx
}

/// Build every viable `Transition` for one poll tick.
///
/// `lists[i]` is the set of entry names in `config.input_patterns[i]`'s
/// directory that matched that pattern, in whatever order the caller's
/// directory listing produced. A tuple is skipped (not emitted) when its
/// inputs' invariant expansions disagree — spec.md §3 invariant 4.
pub fn build_candidates(
    config: &TransitionConfig,
    lists: &[Vec<String>],
    ids: &TransitionIdGen,
) -> Vec<Transition> {
    let lens: Vec<usize> = lists.iter().map(Vec::len).collect();
    if lens.iter().any(|&l| l == 0) {
        return Vec::new();
    }
    let total: usize = lens.iter().product();
    let seed = Transition::seed(config.clone());

    let mut out = Vec::new();
    'tuples: for linear in 0..total {
        let idx = decode(linear, &lens);
        let mut transition = seed.clone_with_fresh_id(ids);
        transition.custodian = "dirlister";

        for (pattern_idx, &name_idx) in idx.iter().enumerate() {
            let pattern = &config.input_patterns[pattern_idx];
            let name = &lists[pattern_idx][name_idx];

            let captures = match pattern.captures(name) {
                Some(c) => c,
                None => continue 'tuples, // shouldn't happen: lists are pre-filtered
            };

            let invariant = match &config.invariant_template {
                Some(tmpl) => pmjq_template::expand_invariant(tmpl, &captures, name),
                None => name.clone(),
            };

            if pattern_idx == 0 {
                transition.invariant = Some(invariant);
            } else if transition.invariant.as_deref() != Some(invariant.as_str()) {
                continue 'tuples;
            }

            // NamedMatches/positional captures reflect the *last* matched
            // input, per spec.md §4.1 step 3c.
            transition.named_matches.clear();
            for group_name in pattern.regex().capture_names().flatten() {
                if let Some(m) = captures.name(group_name) {
                    transition
                        .named_matches
                        .insert(group_name.to_string(), m.as_str().to_string());
                }
            }
            transition.positional_matches.clear();
            for i in 1..captures.len() {
                if let Some(m) = captures.get(i) {
                    transition.positional_matches.push(m.as_str().to_string());
                } else {
                    transition.positional_matches.push(String::new());
                }
            }

            transition.input_files.push(name.clone());
            transition
                .input_paths
                .push(pattern.dir().join(name));
        }

        for output in config.output_templates.iter() {
            let expanded = pmjq_template::expand(output.template(), &transition);
            transition.output_paths.push(output.dir().join(expanded));
        }

        out.push(transition);
    }

    out
}

#[cfg(test)]
#[path = "candidates_tests.rs"]
mod tests;
