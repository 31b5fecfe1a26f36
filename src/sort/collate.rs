//! Locale-aware string comparison used to order records.
//!
//! Records are ordered with the CLDR collation for Portuguese (Brazil) at
//! primary strength, the way the catalog's readers expect: case and
//! accents are ignored (`Ácido` == `acido`), `ø` sorts with `o`, `ß` with
//! `ss`, and punctuation follows the CLDR order (`_` < `-` < `.` < `+`).
//! With `numeric` set, digit runs compare by value, so `v2` sorts before
//! `v10`.

use std::cmp::Ordering;

use icu_collator::{Collator, CollatorOptions, Numeric, Strength};
use icu_locid::locale;

thread_local! {
    static PLAIN: Collator = collator(Numeric::Off);
    static NUMERIC: Collator = collator(Numeric::On);
}

fn collator(numeric: Numeric) -> Collator {
    let mut options = CollatorOptions::new();
    options.strength = Some(Strength::Primary);
    options.numeric = Some(numeric);
    Collator::try_new(&locale!("pt-BR").into(), options)
        .expect("pt-BR collation data is compiled in")
}

/// Compares two strings at primary strength.
pub fn compare(a: &str, b: &str, numeric: bool) -> Ordering {
    let collator = if numeric { &NUMERIC } else { &PLAIN };
    collator.with(|c| c.compare(a, b))
}
