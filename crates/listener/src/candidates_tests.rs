// SPDX-License-Identifier: MIT

use super::*;
use pmjq_core::{DirPattern, DirTemplate};
use std::path::PathBuf;
use std::sync::Arc;

fn config_with(
    input_patterns: Vec<DirPattern>,
    output_templates: Vec<DirTemplate>,
    invariant_template: Option<&str>,
) -> TransitionConfig {
    TransitionConfig {
        input_patterns: Arc::new(input_patterns),
        output_templates: Arc::new(output_templates),
        error_templates: Arc::new(vec![]),
        log_template: None,
        invariant_template: invariant_template.map(|s| Arc::new(s.to_string())),
        cmd_template: Arc::new("cat".to_string()),
        quit_when_empty: false,
    }
}

#[test]
fn single_input_single_output_happy_path() {
    let config = config_with(
        vec![DirPattern::parse("in/.*").unwrap()],
        vec![DirTemplate::parse("out/", "{{.Input 0}}").unwrap()],
        None,
    );
    let ids = TransitionIdGen::new();
    let got = build_candidates(&config, &[vec!["foo".to_string()]], &ids);

    assert_eq!(got.len(), 1);
    assert_eq!(got[0].input_files, vec!["foo".to_string()]);
    assert_eq!(got[0].input_paths, vec![PathBuf::from("in/foo")]);
    assert_eq!(got[0].output_paths, vec![PathBuf::from("out/foo")]);
}

#[test]
fn empty_candidate_list_yields_no_transitions() {
    let config = config_with(vec![DirPattern::parse("in/.*").unwrap()], vec![], None);
    let ids = TransitionIdGen::new();
    assert!(build_candidates(&config, &[vec![]], &ids).is_empty());
}

#[test]
fn invariant_mismatch_filters_out_tuple() {
    let config = config_with(
        vec![
            DirPattern::parse(r"left/(?P<k>[a-z]+)\.l").unwrap(),
            DirPattern::parse(r"right/(?P<k>[a-z]+)\.r").unwrap(),
        ],
        vec![DirTemplate::parse("out/", "{{.Input 0}}").unwrap()],
        Some("{{.NamedMatches.k}}"),
    );
    let ids = TransitionIdGen::new();
    let lists = vec![
        vec!["a.l".to_string(), "b.l".to_string()],
        vec!["a.r".to_string(), "c.r".to_string()],
    ];
    let got = build_candidates(&config, &lists, &ids);

    assert_eq!(got.len(), 1, "only the (a.l, a.r) tuple should survive");
    assert_eq!(got[0].input_files, vec!["a.l".to_string(), "a.r".to_string()]);
    assert_eq!(got[0].invariant.as_deref(), Some("a"));
}

#[test]
fn last_index_varies_fastest() {
    let config = config_with(
        vec![
            DirPattern::parse("a/.*").unwrap(),
            DirPattern::parse("b/.*").unwrap(),
        ],
        vec![],
        Some("ok"),
    );
    let ids = TransitionIdGen::new();
    let lists = vec![
        vec!["x0".to_string(), "x1".to_string()],
        vec!["y0".to_string(), "y1".to_string()],
    ];
    let got = build_candidates(&config, &lists, &ids);

    let pairs: Vec<(String, String)> = got
        .iter()
        .map(|t| (t.input_files[0].clone(), t.input_files[1].clone()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("x0".to_string(), "y0".to_string()),
            ("x0".to_string(), "y1".to_string()),
            ("x1".to_string(), "y0".to_string()),
            ("x1".to_string(), "y1".to_string()),
        ]
    );
}

#[test]
fn repeated_ticks_over_unchanged_listing_produce_the_same_set() {
    let config = config_with(vec![DirPattern::parse("in/.*").unwrap()], vec![], None);
    let ids = TransitionIdGen::new();
    let lists = vec![vec!["a".to_string(), "b".to_string(), "c".to_string()]];

    let first: Vec<String> = build_candidates(&config, &lists, &ids)
        .into_iter()
        .map(|t| t.input_files[0].clone())
        .collect();
    let second: Vec<String> = build_candidates(&config, &lists, &ids)
        .into_iter()
        .map(|t| t.input_files[0].clone())
        .collect();

    let mut first_sorted = first.clone();
    let mut second_sorted = second.clone();
    first_sorted.sort();
    second_sorted.sort();
    assert_eq!(first_sorted, second_sorted);
}