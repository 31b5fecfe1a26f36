//! Fuzz target for JSON dataset files.
//!
//! Arbitrary bytes are parsed as a dataset file; anything that parses is
//! run through every validator and sorter, checking for panics and for
//! sorts that do not come out sorted.

#![no_main]

use std::path::Path;

use bioformats_tidy::sort::Sorter;
use bioformats_tidy::{store, validation, DatasetKind};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }
    let Ok(content) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(value) = store::parse(Path::new("fuzz.json"), content) else {
        return;
    };

    for kind in DatasetKind::ALL {
        let _ = validation::validate(kind, &value, Some(&value));
        let sorter = Sorter::for_dataset(kind);
        if let Ok(sorted) = sorter.sort(&value) {
            assert!(sorter.is_sorted(&serde_json::Value::Array(sorted)));
        }
    }
});
