//! Constructable stylesheets
//!
//! A sheet holds an ordered list of rules. Each insertion is validated
//! with lightningcss and must contain exactly one rule.

use fos_dom::SheetId;
use lightningcss::stylesheet::{ParserOptions, StyleSheet};

use crate::CssError;

/// Stylesheet object adopted by a document or shadow root
#[derive(Debug, Clone)]
pub struct CssStyleSheet {
    id: SheetId,
    rules: Vec<String>,
}

impl CssStyleSheet {
    pub fn new(id: SheetId) -> Self {
        Self {
            id,
            rules: Vec::new(),
        }
    }

    pub fn id(&self) -> SheetId {
        self.id
    }

    /// Insert one rule at `index`, returning the index on success
    pub fn insert_rule(&mut self, rule: &str, index: usize) -> Result<usize, CssError> {
        if index > self.rules.len() {
            return Err(CssError::IndexOutOfBounds {
                index,
                len: self.rules.len(),
            });
        }

        let rule = rule.trim();
        validate_rule(rule)?;
        self.rules.insert(index, rule.to_string());
        Ok(index)
    }

    pub fn delete_rule(&mut self, index: usize) -> Result<String, CssError> {
        if index >= self.rules.len() {
            return Err(CssError::IndexOutOfBounds {
                index,
                len: self.rules.len(),
            });
        }
        Ok(self.rules.remove(index))
    }

    pub fn rules(&self) -> &[String] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Serialized sheet, one rule per line
    pub fn css_text(&self) -> String {
        self.rules.join("\n")
    }
}

fn validate_rule(rule: &str) -> Result<(), CssError> {
    let malformed = |message: String| CssError::MalformedRule {
        rule: rule.to_string(),
        message,
    };

    let parsed = StyleSheet::parse(rule, ParserOptions::default())
        .map_err(|e| malformed(e.to_string()))?;

    match parsed.rules.0.len() {
        1 => Ok(()),
        0 => Err(malformed("no rule found".to_string())),
        n => Err(malformed(format!("expected a single rule, found {n}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet() -> CssStyleSheet {
        CssStyleSheet::new(SheetId::new(1))
    }

    #[test]
    fn test_insert_rules_in_order() {
        let mut sheet = sheet();
        assert_eq!(sheet.insert_rule(".a { color: red; }", 0), Ok(0));
        assert_eq!(sheet.insert_rule(" .b { color: blue; }", 1), Ok(1));
        assert_eq!(sheet.insert_rule(".first { margin: 0; }", 0), Ok(0));

        assert_eq!(
            sheet.rules(),
            &[".first { margin: 0; }", ".a { color: red; }", ".b { color: blue; }"]
        );
    }

    #[test]
    fn test_media_rule_is_single_rule() {
        let mut sheet = sheet();
        let rule = "@media (max-width: 600px) { [styles-key=\"k\"] { color: red; } }";
        assert!(sheet.insert_rule(rule, 0).is_ok());
        assert_eq!(sheet.len(), 1);
    }

    #[test]
    fn test_rejects_malformed_rule() {
        let mut sheet = sheet();
        let err = sheet.insert_rule("%%% { color: red; }", 0).unwrap_err();

        assert!(matches!(err, CssError::MalformedRule { .. }));
        assert!(sheet.is_empty());
    }

    #[test]
    fn test_rejects_multiple_rules() {
        let mut sheet = sheet();
        assert!(sheet.insert_rule(".a { } .b { }", 0).is_err());
        assert!(sheet.insert_rule("   ", 0).is_err());
    }

    #[test]
    fn test_index_out_of_bounds() {
        let mut sheet = sheet();
        assert_eq!(
            sheet.insert_rule(".a { }", 3),
            Err(CssError::IndexOutOfBounds { index: 3, len: 0 })
        );
        assert!(sheet.delete_rule(0).is_err());
    }

    #[test]
    fn test_delete_rule() {
        let mut sheet = sheet();
        sheet.insert_rule(".a { color: red; }", 0).unwrap();
        assert_eq!(sheet.delete_rule(0).unwrap(), ".a { color: red; }");
        assert_eq!(sheet.css_text(), "");
    }
}
