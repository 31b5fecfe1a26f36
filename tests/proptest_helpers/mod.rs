#![allow(dead_code)]

use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};
use serde_json::{json, Value};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Sort keys mixing case, accents, digits, punctuation and spaces.
pub fn arb_key() -> BoxedStrategy<String> {
    prop_oneof![
        4 => "[a-zA-Z]{0,8}",
        2 => "[a-z]{1,3}[0-9]{1,4}",
        1 => "[a-z0-9 ._-]{0,8}",
        1 => prop::sample::select(vec![
            "Ácido", "acido", "Genômica", "genomica", "ção", "Émbl", "embl", "2bit", "v10", "v2",
        ])
        .prop_map(str::to_owned),
    ]
    .boxed()
}

/// Records of one field plus a tag identifying the original position.
pub fn arb_records(key_field: &'static str, max_len: usize) -> BoxedStrategy<Value> {
    prop::collection::vec(prop::option::weighted(0.9, arb_key()), 0..max_len)
        .prop_map(move |keys| {
            let records = keys
                .into_iter()
                .enumerate()
                .map(|(tag, key)| match key {
                    Some(key) => json!({ key_field: key, "tag": tag }),
                    None => json!({ "tag": tag }),
                })
                .collect();
            Value::Array(records)
        })
        .boxed()
}

/// Arbitrary JSON of bounded depth, used to feed validators garbage.
pub fn arb_json() -> BoxedStrategy<Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-zA-Z0-9_ .:/-]{0,12}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map(
                prop::sample::select(vec![
                    "id", "name", "term", "slug", "extension", "area", "area_ids", "references",
                    "url", "type", "title", "pipeline_examples", "tools", "other",
                ]),
                inner,
                0..6
            )
            .prop_map(|m| Value::Object(m.into_iter().map(|(k, v)| (k.to_owned(), v)).collect())),
        ]
    })
    .boxed()
}
