//! Bidirectional app-name ↔ grid-symbol table.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::{Error, Result};

/// Cell value for an empty region.
pub const EMPTY: char = '.';
/// Cell value where two or more different apps overlap.
pub const OVERLAP: char = 'X';
/// Symbol painted for apps missing from the table; never decoded.
pub const UNKNOWN: char = '?';

/// Built-in assignments, in symbol order. `X` is skipped because it marks
/// overlaps.
const BUILTIN: &[(&str, char)] = &[
    ("Finder", '0'),
    ("Arc", '1'),
    ("Safari", '2'),
    ("Google Chrome", '3'),
    ("Firefox", '4'),
    ("Terminal", '5'),
    ("iTerm2", '6'),
    ("Visual Studio Code", '7'),
    ("Xcode", '8'),
    ("Cursor", '9'),
    ("Slack", 'A'),
    ("Discord", 'B'),
    ("Messages", 'C'),
    ("Mail", 'D'),
    ("Notes", 'E'),
    ("Calendar", 'F'),
    ("Figma", 'G'),
    ("Sketch", 'H'),
    ("Spotify", 'I'),
    ("Music", 'J'),
    ("Zoom", 'K'),
    ("Microsoft Teams", 'L'),
    ("Notion", 'M'),
    ("Obsidian", 'N'),
    ("Preview", 'O'),
    ("TablePlus", 'P'),
    ("Warp", 'Q'),
    ("Ghostty", 'R'),
    ("System Settings", 'S'),
    ("Photoshop", 'T'),
    ("Microsoft Word", 'U'),
    ("Microsoft Excel", 'V'),
    ("Keynote", 'W'),
    ("Alacritty", 'Y'),
    ("Postman", 'Z'),
];

/// Shared table built once from the built-in assignments.
static BUILTIN_TABLE: Lazy<SymbolTable> = Lazy::new(|| SymbolTable {
    by_name: BUILTIN.iter().map(|&(n, s)| (n.to_string(), s)).collect(),
    by_symbol: BUILTIN.iter().map(|&(n, s)| (s, n.to_string())).collect(),
});

/// Exact-match mapping between application names and single-character
/// symbols.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    /// Name → symbol.
    by_name: HashMap<String, char>,
    /// Symbol → name.
    by_symbol: HashMap<char, String>,
}

impl SymbolTable {
    /// The built-in 35-entry table.
    pub fn builtin() -> &'static Self {
        &BUILTIN_TABLE
    }

    /// Build a custom table. Symbols must be ASCII digits or uppercase
    /// letters other than `X`, and both names and symbols must be unique.
    pub fn new<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, char)>,
        S: Into<String>,
    {
        let mut by_name = HashMap::new();
        let mut by_symbol = HashMap::new();
        for (name, sym) in entries {
            let name = name.into();
            if !is_assignable(sym) {
                return Err(Error::InvalidInput(format!(
                    "symbol '{sym}' for '{name}' is reserved or not alphanumeric"
                )));
            }
            if by_symbol.contains_key(&sym) {
                return Err(Error::InvalidInput(format!("symbol '{sym}' assigned twice")));
            }
            if by_name.contains_key(&name) {
                return Err(Error::InvalidInput(format!("app '{name}' assigned twice")));
            }
            by_name.insert(name.clone(), sym);
            by_symbol.insert(sym, name);
        }
        Ok(Self { by_name, by_symbol })
    }

    /// Symbol for `app`, if the exact name is present.
    pub fn symbol_for(&self, app: &str) -> Option<char> {
        self.by_name.get(app).copied()
    }

    /// Symbol for `app`, or [`UNKNOWN`].
    pub fn symbol_or_unknown(&self, app: &str) -> char {
        self.symbol_for(app).unwrap_or(UNKNOWN)
    }

    /// App name owning `symbol`, if any.
    pub fn app_for(&self, symbol: char) -> Option<&str> {
        self.by_symbol.get(&symbol).map(String::as_str)
    }

    /// Number of assigned symbols.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// True when no symbols are assigned.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// True for characters that may be assigned to an app.
fn is_assignable(sym: char) -> bool {
    (sym.is_ascii_digit() || sym.is_ascii_uppercase()) && sym != OVERLAP
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_is_bidirectional_and_full() {
        let table = SymbolTable::builtin();
        assert_eq!(table.len(), 35);
        for &(name, sym) in BUILTIN {
            assert_eq!(table.symbol_for(name), Some(sym));
            assert_eq!(table.app_for(sym), Some(name));
        }
        assert_eq!(table.app_for(OVERLAP), None);
        assert_eq!(table.app_for(UNKNOWN), None);
    }

    #[test]
    fn lookup_is_exact_match() {
        let table = SymbolTable::builtin();
        assert_eq!(table.symbol_for("Arc"), Some('1'));
        assert_eq!(table.symbol_for("arc"), None);
        assert_eq!(table.symbol_or_unknown("Nope"), UNKNOWN);
    }

    #[test]
    fn custom_table_rejects_reserved_and_duplicates() {
        assert!(SymbolTable::new([("A", 'X')]).is_err());
        assert!(SymbolTable::new([("A", '.')]).is_err());
        assert!(SymbolTable::new([("A", '1'), ("B", '1')]).is_err());
        assert!(SymbolTable::new([("A", '1'), ("A", '2')]).is_err());
        let t = SymbolTable::new([("Editor", 'E')]).unwrap();
        assert_eq!(t.app_for('E'), Some("Editor"));
    }
}
