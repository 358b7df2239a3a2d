//! Architecture contract tests.

mod support;

use support::architecture::{lines_containing, non_export_lines_in_mod_files, path_exists};

#[test]
fn domain_has_no_framework_or_outer_layer_imports() {
    let hits = lines_containing(
        "src/domain",
        &[
            "crate::adapter",
            "crate::infrastructure",
            "crate::application",
            "crate::port",
            "tokio::",
            "reqwest::",
        ],
    );

    assert!(
        hits.is_empty(),
        "found forbidden imports in domain layer: {hits:#?}"
    );
}

#[test]
fn application_does_not_reach_into_adapters_or_wiring() {
    let hits = lines_containing(
        "src/application",
        &["crate::adapter", "crate::infrastructure", "reqwest::"],
    );

    assert!(
        hits.is_empty(),
        "found outer-layer imports in application layer: {hits:#?}"
    );
}

#[test]
fn ports_depend_only_on_domain() {
    let hits = lines_containing(
        "src/port",
        &["crate::adapter", "crate::infrastructure", "crate::application"],
    );

    assert!(hits.is_empty(), "found outer-layer imports in ports: {hits:#?}");
}

#[test]
fn exchange_adapters_do_not_know_each_other() {
    let hits = lines_containing("src/adapter/outbound/binance", &["kraken"]);
    assert!(hits.is_empty(), "binance adapter references kraken: {hits:#?}");

    let hits = lines_containing("src/adapter/outbound/kraken", &["binance"]);
    assert!(hits.is_empty(), "kraken adapter references binance: {hits:#?}");
}

#[test]
fn mod_rs_is_export_only() {
    let violations = non_export_lines_in_mod_files("src");
    assert!(
        violations.is_empty(),
        "found non-export content in mod.rs files: {violations:#?}"
    );
}

#[test]
fn cli_commands_live_in_their_own_files() {
    for command in ["run", "scan", "check"] {
        let path = format!("src/adapter/inbound/cli/{command}.rs");
        assert!(path_exists(&path), "missing {path}");
    }
}
