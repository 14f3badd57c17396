//! CSS rule splitter
//!
//! Cuts raw CSS into top-level rules by brace depth. At-rule blocks such
//! as `@media` come out as one unit, inner rules included.

/// Strip block comments and collapse whitespace runs to a single space.
///
/// Comments become whitespace, so cleaning is idempotent. An unterminated
/// comment is left as-is.
pub fn clean_css(css: &str) -> String {
    let mut stripped = String::with_capacity(css.len());
    let mut rest = css;
    while let Some(start) = rest.find("/*") {
        match rest[start + 2..].find("*/") {
            Some(len) => {
                stripped.push_str(&rest[..start]);
                stripped.push(' ');
                rest = &rest[start + 2 + len + 2..];
            }
            None => break,
        }
    }
    stripped.push_str(rest);

    let mut cleaned = String::with_capacity(stripped.len());
    for word in stripped.split_whitespace() {
        if !cleaned.is_empty() {
            cleaned.push(' ');
        }
        cleaned.push_str(word);
    }
    cleaned
}

/// Split CSS into top-level rules, in source order.
///
/// A rule closes when the brace depth returns to zero right after a `}`.
/// Rule text is not trimmed: joining the result reproduces the cleaned
/// input when braces balance. A trailing unbalanced buffer is dropped.
pub fn split_rules(css: &str) -> Vec<String> {
    let cleaned = clean_css(css);
    let mut rules = Vec::new();
    let mut buffer = String::new();
    let mut depth: i32 = 0;

    for c in cleaned.chars() {
        buffer.push(c);
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    rules.push(std::mem::take(&mut buffer));
                }
            }
            _ => {}
        }
    }

    if !buffer.trim().is_empty() {
        tracing::debug!(dangling = %buffer, "discarding unterminated CSS");
    }

    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::css_strategies::balanced_css;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn test_split_join_roundtrip_for_balanced_css((css, count) in balanced_css()) {
            let cleaned = clean_css(&css);
            let rules = split_rules(&css);

            prop_assert_eq!(rules.concat(), cleaned.clone());
            prop_assert_eq!(rules.len(), count);
            prop_assert_eq!(clean_css(&cleaned), cleaned);
        }

        #[test]
        fn test_clean_is_idempotent_for_any_text(text in "[a-z/* \t\n{}]{0,48}") {
            let once = clean_css(&text);
            prop_assert_eq!(clean_css(&once), once);
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(split_rules("").is_empty());
        assert!(split_rules("   \n\t ").is_empty());
        assert_eq!(clean_css(""), "");
    }

    #[test]
    fn test_clean_strips_comments_and_whitespace() {
        let css = "/* header */\n.a {\n    color: red; /* inline */\n}\n";
        assert_eq!(clean_css(css), ".a { color: red; }");
    }

    #[test]
    fn test_clean_is_idempotent() {
        let inputs = [
            ".a { color: red; }",
            "  /* x */ .a{color:red}\n\n.b  { margin : 0 }  ",
            "//*x*/* y */ .c { }",
            "@media (max-width: 600px) {\n  & { color: red; }\n}",
            "/* never closed .d { }",
        ];
        for input in inputs {
            let once = clean_css(input);
            assert_eq!(clean_css(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn test_unterminated_comment_is_kept() {
        assert_eq!(clean_css(".a { } /* open"), ".a { } /* open");
    }

    #[test]
    fn test_split_preserves_order() {
        let rules = split_rules(".a { color: red; } .b { color: blue; } .a { color: green; }");
        assert_eq!(
            rules,
            vec![".a { color: red; }", " .b { color: blue; }", " .a { color: green; }"]
        );
    }

    #[test]
    fn test_split_then_join_reproduces_cleaned_input() {
        let inputs = [
            ".a { color: red; }\n\n/* gap */ .b { color: blue; }",
            "& { color: red; } & .child { color: blue; }",
            "@media print { .a { display: none; } .b { color: black; } } .c { margin: 0; }",
            "@supports (display: grid) { @media (min-width: 1px) { .x { display: grid; } } }",
        ];
        for input in inputs {
            assert_eq!(split_rules(input).concat(), clean_css(input), "input: {input:?}");
        }
    }

    #[test]
    fn test_media_block_is_one_unit() {
        let rules = split_rules("@media (max-width: 600px) { & { color: red; } }");
        assert_eq!(rules, vec!["@media (max-width: 600px) { & { color: red; } }"]);
    }

    #[test]
    fn test_unbalanced_trailing_rule_is_dropped() {
        let rules = split_rules(".a { color: red; } .b { color: blue;");
        assert_eq!(rules, vec![".a { color: red; }"]);
    }

    #[test]
    fn test_stray_close_brace_swallows_remainder() {
        let rules = split_rules(".a { } } .b { }");
        assert_eq!(rules, vec![".a { }"]);
    }
}
