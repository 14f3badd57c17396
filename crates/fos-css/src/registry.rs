//! Style registry
//!
//! Content-addressed cache of scoped stylesheets, one per (owner, key).
//! A cache hit costs a map lookup plus an adoption check; rules are only
//! parsed and inserted when a sheet is created.

use std::collections::HashMap;

use fos_dom::{Document, ShadowRoot, SheetId, StyleOwner, StyleSheetOwner};

use crate::key::scope_selectors;
use crate::splitter::split_rules;
use crate::{CssStyleSheet, StyleKey};

/// Cached sheet for one (owner, key)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSheetEntry {
    pub owner: StyleOwner,
    pub key: StyleKey,
    pub sheet: SheetId,
    /// Rules have been inserted
    pub inserted: bool,
}

/// Registry counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryStats {
    /// Lookups served by an adopted entry
    pub hits: u64,
    /// Lookups that created a sheet
    pub misses: u64,
    /// Entries recreated because their sheet was no longer adopted
    pub stale: u64,
    pub rules_inserted: u64,
    pub rules_rejected: u64,
}

impl RegistryStats {
    /// Hit rate in percent
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64 * 100.0
        }
    }
}

/// Stylesheet cache owned by the application root
#[derive(Debug)]
pub struct StyleRegistry {
    sheets: HashMap<SheetId, CssStyleSheet>,
    entries: HashMap<(StyleOwner, StyleKey), StyleSheetEntry>,
    next_sheet_id: u32,
    stats: RegistryStats,
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self {
            sheets: HashMap::new(),
            entries: HashMap::new(),
            next_sheet_id: 1,
            stats: RegistryStats::default(),
        }
    }

    /// Look up the sheet for `(owner, key)`, creating and adopting one if
    /// there is none or the cached one was detached from the owner.
    pub fn get_or_create(&mut self, owner: &dyn StyleSheetOwner, key: &StyleKey) -> StyleSheetEntry {
        let scope = owner.style_owner();
        let adopted = owner.adopted_style_sheets();
        let cache_key = (scope, key.clone());

        if let Some(entry) = self.entries.get(&cache_key) {
            if adopted.contains(entry.sheet) {
                self.stats.hits += 1;
                return entry.clone();
            }
            tracing::debug!(key = %key, sheet = ?entry.sheet, "cached sheet detached; recreating");
            let stale = entry.sheet;
            self.sheets.remove(&stale);
            self.stats.stale += 1;
        }

        let sheet = SheetId::new(self.next_sheet_id);
        self.next_sheet_id += 1;
        self.sheets.insert(sheet, CssStyleSheet::new(sheet));
        adopted.push(sheet);
        self.stats.misses += 1;

        let entry = StyleSheetEntry {
            owner: scope,
            key: key.clone(),
            sheet,
            inserted: false,
        };
        self.entries.insert(cache_key, entry.clone());
        tracing::debug!(key = %key, sheet = ?sheet, owner = ?scope, "stylesheet created");
        entry
    }

    /// Make sure `owner` has a sheet for `key` filled with `css`.
    ///
    /// `&` is rewritten to the key selector and each top-level rule is
    /// inserted on its own; a rejected rule is logged and skipped. On a
    /// cache hit nothing is parsed.
    pub fn ensure_styles(&mut self, owner: &dyn StyleSheetOwner, key: &StyleKey, css: &str) -> SheetId {
        let entry = self.get_or_create(owner, key);
        if entry.inserted {
            return entry.sheet;
        }

        let scoped = scope_selectors(css, key);
        self.insert_rules(entry.sheet, &scoped);
        if let Some(cached) = self.entries.get_mut(&(entry.owner, entry.key)) {
            cached.inserted = true;
        }
        entry.sheet
    }

    /// Sheet for an explicit id in a document
    pub fn create_style_sheet(&mut self, document: &Document, id: &str) -> SheetId {
        self.get_or_create(document, &StyleKey::new(id)).sheet
    }

    /// Sheet for an explicit id in a shadow root
    pub fn create_shadow_style_sheet(&mut self, root: &ShadowRoot, id: &str) -> SheetId {
        self.get_or_create(root, &StyleKey::new(id)).sheet
    }

    /// Insert every top-level rule of `css` at the end of a sheet. Returns
    /// how many were accepted.
    pub fn insert_rules(&mut self, sheet: SheetId, css: &str) -> usize {
        let Some(target) = self.sheets.get_mut(&sheet) else {
            tracing::warn!(sheet = ?sheet, "insert into unknown stylesheet");
            return 0;
        };

        let mut inserted = 0;
        for rule in split_rules(css) {
            match target.insert_rule(&rule, target.len()) {
                Ok(_) => inserted += 1,
                Err(err) => {
                    tracing::warn!(sheet = ?sheet, error = %err, "skipping style rule");
                    self.stats.rules_rejected += 1;
                }
            }
        }
        self.stats.rules_inserted += inserted as u64;
        inserted
    }

    pub fn sheet(&self, id: SheetId) -> Option<&CssStyleSheet> {
        self.sheets.get(&id)
    }

    pub fn sheet_mut(&mut self, id: SheetId) -> Option<&mut CssStyleSheet> {
        self.sheets.get_mut(&id)
    }

    pub fn entry(&self, owner: StyleOwner, key: &StyleKey) -> Option<&StyleSheetEntry> {
        self.entries.get(&(owner, key.clone()))
    }

    /// CSS of every sheet the owner adopts, in adoption order
    pub fn css_text(&self, owner: &dyn StyleSheetOwner) -> String {
        owner
            .adopted_style_sheets()
            .to_vec()
            .into_iter()
            .filter_map(|id| self.sheets.get(&id))
            .map(CssStyleSheet::css_text)
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Drop every entry and sheet of a destroyed owner. Returns the number
    /// of entries removed.
    pub fn release_owner(&mut self, owner: StyleOwner) -> usize {
        let before = self.entries.len();
        let sheets = &mut self.sheets;
        self.entries.retain(|(scope, _), entry| {
            if *scope == owner {
                sheets.remove(&entry.sheet);
                false
            } else {
                true
            }
        });
        before - self.entries.len()
    }

    /// Drop the entries of a shadow root that is going away
    pub fn release_shadow_root(&mut self, root: &ShadowRoot) -> usize {
        self.release_owner(root.style_owner())
    }

    pub fn stats(&self) -> &RegistryStats {
        &self.stats
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
