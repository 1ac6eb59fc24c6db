//! Property-based tests for credential files and result histograms.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use arvak_adapter_qudora::api::parse_results;
use arvak_adapter_qudora::credentials::parse_credentials;
use arvak_adapter_qudora::{CredentialResolver, CredentialSource, FixedEnv, QudoraError};
use proptest::prelude::*;
use serde_json::json;

/// Credential values: anything without a colon, line break or edge whitespace.
fn arb_value() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_.+/=-]{1,40}"
}

fn arb_padding() -> impl Strategy<Value = String> {
    "[ \t]{0,3}"
}

/// A `<key> : <value>` line with random padding around both sides.
fn padded_line(key: &'static str) -> impl Strategy<Value = (String, String)> {
    (arb_value(), arb_padding(), arb_padding(), arb_padding(), arb_padding()).prop_map(
        move |(value, a, b, c, d)| (format!("{a}{key}{b}:{c}{value}{d}"), value),
    )
}

fn parse(contents: &str) -> Result<arvak_adapter_qudora::Credentials, QudoraError> {
    parse_credentials(contents, Path::new("prop_config"))
}

proptest! {
    #[test]
    fn prop_padded_file_parses_trimmed_values(
        (key_line, key) in padded_line("key"),
        (refresh_line, refresh) in padded_line("refresh"),
        (time_line, time) in padded_line("time"),
        blank_lines in 0usize..3,
    ) {
        let contents = format!(
            "{key_line}\n{}{refresh_line}\n{time_line}\n",
            "\n".repeat(blank_lines)
        );

        let creds = parse(&contents).unwrap();
        prop_assert_eq!(creds.api_key, key);
        prop_assert_eq!(creds.refresh_key, Some(refresh));
        prop_assert_eq!(creds.retrieved_at, Some(time));
    }

    #[test]
    fn prop_line_order_is_irrelevant(
        key in arb_value(),
        refresh in arb_value(),
        lines in Just(vec![0usize, 1, 2]).prop_shuffle(),
    ) {
        let all = [
            format!("key : {key}"),
            format!("refresh : {refresh}"),
            "time : ".to_string(),
        ];
        let contents: Vec<&str> = lines.iter().map(|&i| all[i].as_str()).collect();

        let creds = parse(&contents.join("\n")).unwrap();
        prop_assert_eq!(creds.api_key, key);
        prop_assert_eq!(creds.refresh_key, Some(refresh));
        prop_assert_eq!(creds.retrieved_at, None);
    }

    #[test]
    fn prop_extra_colon_is_rejected(
        key in arb_value(),
        left in arb_value(),
        right in arb_value(),
    ) {
        let contents = format!("key : {key}\nrefresh : {left}:{right}\n");
        let is_malformed = matches!(parse(&contents), Err(QudoraError::MalformedConfig { .. }));
        prop_assert!(is_malformed);
    }

    #[test]
    fn prop_unknown_key_is_rejected(
        name in "[a-z]{1,12}".prop_filter("known key", |k| !["key", "refresh", "time"].contains(&k.as_str())),
        value in arb_value(),
    ) {
        let contents = format!("key : a\nrefresh : b\n{name} : {value}\n");
        let is_malformed = matches!(parse(&contents), Err(QudoraError::MalformedConfig { .. }));
        prop_assert!(is_malformed);
    }

    #[test]
    fn prop_inline_credentials_override_file(
        inline in arb_value(),
        key in arb_value(),
    ) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "key : {key}\nrefresh : r").unwrap();

        let resolver = CredentialResolver::new(Some(file.path().display().to_string()))
            .with_env(Arc::new(FixedEnv::new().with_inline_credentials(inline.clone())));
        let resolved = resolver.resolve().unwrap();

        prop_assert_eq!(resolved.source, CredentialSource::Environment);
        prop_assert_eq!(resolved.credentials.api_key, inline);
        prop_assert_eq!(resolved.credentials.refresh_key, None);
    }

    #[test]
    fn prop_histograms_survive_translation(
        histograms in prop::collection::vec(
            prop::collection::btree_map("[01]{1,6}", 0u64..10_000, 0..8),
            1..5,
        ),
    ) {
        let encoded: Vec<String> = histograms
            .iter()
            .map(|h| serde_json::to_string(h).unwrap())
            .collect();
        let response = json!([{"status": "Completed", "result": encoded}]);

        let result = parse_results(&response).unwrap();
        prop_assert_eq!(result.len(), histograms.len());
        for (translated, expected) in result.results().iter().zip(&histograms) {
            let counts: BTreeMap<String, u64> = translated
                .counts
                .iter()
                .map(|(bits, count)| (bits.to_string(), count))
                .collect();
            prop_assert_eq!(&counts, expected);
            prop_assert_eq!(translated.register.as_str(), "__global__");
        }
    }
}
