//! Fuzz target for record collation.
//!
//! Splits the input in two and checks that comparison is antisymmetric.

#![no_main]

use bioformats_tidy::sort::collate::compare;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let mid = (0..=text.len() / 2)
        .rev()
        .find(|&i| text.is_char_boundary(i))
        .unwrap_or(0);
    let (a, b) = text.split_at(mid);
    for numeric in [false, true] {
        assert_eq!(compare(a, b, numeric), compare(b, a, numeric).reverse());
    }
});
