//! Adopted stylesheet lists
//!
//! Documents and shadow roots each keep an ordered list of adopted sheet
//! handles. The sheet objects themselves live in the style registry.

use std::cell::RefCell;
use std::rc::Rc;

use crate::{DocumentId, ShadowRootId};

/// Stylesheet handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SheetId(u32);

impl SheetId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Scope that owns an adopted stylesheet list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleOwner {
    Document(DocumentId),
    Shadow(ShadowRootId),
}

/// Live, ordered list of adopted sheets. Clones share the same list.
#[derive(Debug, Clone, Default)]
pub struct AdoptedStyleSheets {
    sheets: Rc<RefCell<Vec<SheetId>>>,
}

impl AdoptedStyleSheets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, sheet: SheetId) -> bool {
        self.sheets.borrow().contains(&sheet)
    }

    /// Append a sheet unless it is already adopted
    pub fn push(&self, sheet: SheetId) {
        let mut sheets = self.sheets.borrow_mut();
        if !sheets.contains(&sheet) {
            sheets.push(sheet);
        }
    }

    pub fn remove(&self, sheet: SheetId) -> bool {
        let mut sheets = self.sheets.borrow_mut();
        let before = sheets.len();
        sheets.retain(|&s| s != sheet);
        sheets.len() != before
    }

    pub fn clear(&self) {
        self.sheets.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.sheets.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.borrow().is_empty()
    }

    /// Snapshot in adoption order
    pub fn to_vec(&self) -> Vec<SheetId> {
        self.sheets.borrow().clone()
    }
}

/// Document or shadow root that can adopt stylesheets
pub trait StyleSheetOwner {
    fn style_owner(&self) -> StyleOwner;

    fn adopted_style_sheets(&self) -> &AdoptedStyleSheets;
}
