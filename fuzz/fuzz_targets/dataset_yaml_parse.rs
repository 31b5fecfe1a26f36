//! Fuzz target for YAML dataset files.

#![no_main]

use std::path::Path;

use bioformats_tidy::{store, validation, DatasetKind};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1024 * 1024 {
        return;
    }
    let Ok(content) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(value) = store::parse(Path::new("fuzz.yaml"), content) {
        for kind in DatasetKind::ALL {
            let _ = validation::validate(kind, &value, None);
        }
    }
});
