use matchlens::diff::{generate_diff, render_markup, DiffKind, DiffSegment};
use rstest::rstest;
use std::str::FromStr;

fn seg(kind: DiffKind, text: &str) -> DiffSegment {
    DiffSegment {
        kind,
        text: text.to_string(),
    }
}

use DiffKind::{Delete, Equal, Insert};

#[rstest]
#[case("cat", "cat", vec![seg(Equal, "cat")])]
#[case("", "", vec![seg(Equal, "")])]
#[case("cat", "cot", vec![seg(Equal, "c"), seg(Delete, "a"), seg(Insert, "o"), seg(Equal, "t")])]
#[case("", "abc", vec![seg(Insert, "abc")])]
#[case("abc", "", vec![seg(Delete, "abc")])]
#[case("abcd", "abxd", vec![seg(Equal, "ab"), seg(Delete, "c"), seg(Insert, "x"), seg(Equal, "d")])]
#[case("walter", "walt", vec![seg(Equal, "walt"), seg(Delete, "er")])]
#[case("jon", "john", vec![seg(Equal, "jo"), seg(Insert, "h"), seg(Equal, "n")])]
#[case("smith", "smyth", vec![seg(Equal, "sm"), seg(Delete, "i"), seg(Insert, "y"), seg(Equal, "th")])]
fn test_generate_diff(#[case] left: &str, #[case] right: &str, #[case] expected: Vec<DiffSegment>) {
    assert_eq!(generate_diff(left, right), expected);
}

#[test]
fn test_multibyte_characters() {
    let segs = generate_diff("zoë", "zoe");
    assert_eq!(segs, vec![seg(Equal, "zo"), seg(Delete, "ë"), seg(Insert, "e")]);
}

#[test]
fn test_long_inputs_still_align() {
    // Long enough that frequent characters are dropped from the anchor index.
    let left = "a".repeat(150) + "XYZ" + &"a".repeat(150);
    let right = "a".repeat(150) + "XQZ" + &"a".repeat(150);
    let segs = generate_diff(&left, &right);
    assert_eq!(render_markup(&segs), format!("{}X[-Y-]{{+Q+}}Z{}", "a".repeat(150), "a".repeat(150)));
}

#[test]
fn test_markup() {
    let segs = generate_diff("1012412351", "1012412359");
    assert_eq!(render_markup(&segs), "101241235[-1-]{+9+}");
}

#[test]
fn test_kind_names() {
    assert_eq!(DiffKind::Delete.to_string(), "delete");
    assert_eq!(DiffKind::from_str("insert").unwrap(), DiffKind::Insert);
    let json = serde_json::to_string(&seg(Equal, "a")).unwrap();
    assert_eq!(json, r#"{"kind":"equal","text":"a"}"#);
}
