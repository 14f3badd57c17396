//! proptest generators for component CSS

use proptest::prelude::*;

fn selector() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("&".to_string()),
        "& [a-z]{1,6}",
        "& \\.[a-z]{1,6}",
        "&:hover",
        "\\.[a-z]{1,6}( > [a-z]{1,4})?",
    ]
}

fn declaration() -> impl Strategy<Value = String> {
    ("[a-z]{1,6}(-[a-z]{1,6})?", "[a-z0-9]{1,6}").prop_map(|(name, value)| format!("{name}: {value};"))
}

/// Whitespace and comments that may sit between tokens
fn gap() -> impl Strategy<Value = String> {
    ("[ \t\n]{0,3}", proptest::option::of("/\\*[a-z ]{0,8}\\*/"), "[ \t\n]{0,3}")
        .prop_map(|(before, comment, after)| format!("{before}{}{after}", comment.unwrap_or_default()))
}

fn style_rule() -> impl Strategy<Value = String> {
    (selector(), gap(), prop::collection::vec((gap(), declaration()), 0..4), gap()).prop_map(
        |(selector, open, declarations, close)| {
            let body: String = declarations.into_iter().map(|(gap, decl)| gap + &decl).collect();
            format!("{selector}{open}{{{body}{close}}}")
        },
    )
}

fn top_level_rule() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => style_rule(),
        1 => (
            prop_oneof![Just("@media print"), Just("@media (max-width: 600px)"), Just("@supports (display: grid)")],
            prop::collection::vec((gap(), style_rule()), 1..3),
            gap(),
        )
            .prop_map(|(prelude, inner, close)| {
                let body: String = inner.into_iter().map(|(gap, rule)| gap + &rule).collect();
                format!("{prelude} {{{body}{close}}}")
            }),
    ]
}

/// Brace-balanced CSS and the number of top-level rules in it
pub(crate) fn balanced_css() -> impl Strategy<Value = (String, usize)> {
    (prop::collection::vec((gap(), top_level_rule()), 0..6), gap()).prop_map(|(rules, trailing)| {
        let count = rules.len();
        let css: String = rules.into_iter().map(|(gap, rule)| gap + &rule).collect();
        (css + &trailing, count)
    })
}
