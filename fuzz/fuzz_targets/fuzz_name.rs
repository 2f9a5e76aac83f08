// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use std::path::Path;

use sortscribe::attempt_log::categorize_feedback;
use sortscribe::naming::{validate, MAX_NAME_LEN};
use sortscribe::taxonomy::{NamingTaxonomy, TaxonomyRouter};

#[derive(Arbitrary, Debug)]
struct Input {
    name: String,
    source: String,
    feedback: String,
}

fuzz_target!(|input: Input| {
    if validate(&input.name) {
        assert!(input.name.chars().count() <= MAX_NAME_LEN);
        assert!(input.name.starts_with(|c: char| c.is_ascii_lowercase()));
    }

    let taxonomy = NamingTaxonomy::standard();
    let router = TaxonomyRouter::new(&taxonomy);
    let root = Path::new("/data-home");
    let routed = router.route(&input.name, root, Some(Path::new(&input.source)));
    assert!(routed.starts_with(root.join("filetree/roots")));
    assert_eq!(routed, router.route(&input.name, root, Some(Path::new(&input.source))));

    let tags = categorize_feedback(&input.feedback);
    assert_eq!(tags.is_empty(), input.feedback.is_empty());
});
