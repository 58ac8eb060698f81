use std::collections::BTreeSet;

use sdf_reader::sdf::{SynonymNormalizer, SynonymPatterns};
use sdf_reader::SdfError;

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn two_chain_shorthand_drops_chain_annotations() {
    let normalizer = SynonymNormalizer::default();
    assert_eq!(
        normalizer.normalize("PC(16:0(1)/18:1(9Z))"),
        set(&["PC(16:0(1)/18:1(9Z))", "PC(16:0/18:1)", "FA(16:0)", "FA(18:1)"])
    );
    assert_eq!(
        normalizer.normalize("PE(18:0/20:4)"),
        set(&["PE(18:0/20:4)", "FA(18:0)", "FA(20:4)"])
    );
}

#[test]
fn headgroup_abbreviations_are_substituted() {
    let normalizer = SynonymNormalizer::default();
    assert_eq!(
        normalizer.normalize("TG(16:0/18:1/18:2)"),
        set(&["TG(16:0/18:1/18:2)", "TAG(16:0/18:1/18:2)"])
    );
    assert_eq!(
        normalizer.normalize("DG(16:0/18:1)"),
        set(&["DG(16:0/18:1)", "DAG(16:0/18:1)", "FA(16:0)", "FA(18:1)"])
    );
}

#[test]
fn fatty_acid_shorthand_is_canonicalized() {
    let normalizer = SynonymNormalizer::default();
    assert_eq!(normalizer.normalize("C18:1n-9"), set(&["C18:1n-9", "FA(18:1)"]));
    assert_eq!(normalizer.normalize("18:1(9Z)"), set(&["18:1(9Z)", "FA(18:1)"]));
    assert_eq!(normalizer.normalize("C16:0"), set(&["C16:0", "FA(16:0)"]));
}

#[test]
fn lists_are_split_trimmed_and_kept() {
    let normalizer = SynonymNormalizer::default();
    assert_eq!(
        normalizer.normalize(" Oleic acid ;C18:1n-9;; "),
        set(&["Oleic acid", "C18:1n-9", "FA(18:1)"])
    );
    assert!(normalizer.normalize("").is_empty());
    assert!(normalizer.normalize(" ; ;").is_empty());
}

#[test]
fn non_matching_names_contribute_only_themselves() {
    let normalizer = SynonymNormalizer::default();
    for name in ["cholesterol", "PC(O-16:0/18:1)", "((", "Ω-3", "FA(", "TG(", "C:"] {
        assert_eq!(normalizer.normalize(name), set(&[name]), "unexpected expansion of {}", name);
    }
}

#[test]
fn headgroup_table_is_configurable() {
    let normalizer = SynonymNormalizer::default()
        .with_headgroup("PE", "GPEtn")
        .with_delimiter('|');
    assert_eq!(normalizer.headgroups().get("TG").map(String::as_str), Some("TAG"));
    assert_eq!(
        normalizer.normalize("PE(16:0/18:1)|cephalin"),
        set(&[
            "PE(16:0/18:1)",
            "GPEtn(16:0/18:1)",
            "FA(16:0)",
            "FA(18:1)",
            "cephalin",
        ])
    );

    let extended = SynonymNormalizer::default().with_headgroups([("MG", "MAG"), ("TG", "TAGL")]);
    assert_eq!(extended.headgroups().len(), 3);
    assert_eq!(
        extended.normalize("MG(18:1)"),
        set(&["MG(18:1)", "MAG(18:1)"])
    );
    assert_eq!(
        extended.normalize("TG(16:0/18:1/18:2)"),
        set(&["TG(16:0/18:1/18:2)", "TAGL(16:0/18:1/18:2)"])
    );

    let bare = SynonymNormalizer::new(&SynonymPatterns::default(), Vec::<(&str, &str)>::new()).expect("patterns");
    assert_eq!(bare.normalize("TG(16:0/18:1/18:2)"), set(&["TG(16:0/18:1/18:2)"]));
}

#[test]
fn invalid_patterns_are_rejected() {
    let patterns = SynonymPatterns {
        two_chain: "(unclosed".to_string(),
        ..SynonymPatterns::default()
    };
    let result = SynonymNormalizer::new(&patterns, [("TG", "TAG")]);
    assert!(matches!(result, Err(SdfError::InvalidPattern(_))));
}
