// This file is part of the product FontShelf.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! The catalog of uploaded fonts and the groups built from them.
//!
//! Every mutation here is a pure in-memory transform. Group invariants are
//! checked when a group is created or edited and re-established when a font
//! is removed; nothing re-validates the whole document on unrelated reads.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

/// Fewest fonts a group may reference while it exists.
pub const MIN_GROUP_FONTS: usize = 2;

pub const ASSET_URL_PREFIX: &str = "/uploads/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Font {
    pub name: String,
    pub path: String,
}

impl Font {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let path = format!("{}{}", ASSET_URL_PREFIX, name);
        Self { name, path }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub fonts: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    fonts: Vec<Font>,
    #[serde(default)]
    groups: Vec<Group>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    DuplicateGroup(String),
    TooFewFonts { count: usize },
    UnknownFonts(Vec<String>),
    GroupNotFound(String),
    InvalidRequest(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::DuplicateGroup(name) => {
                write!(f, "A group named '{}' already exists", name)
            }
            CatalogError::TooFewFonts { count } => write!(
                f,
                "A group needs at least {} fonts, got {}",
                MIN_GROUP_FONTS, count
            ),
            CatalogError::UnknownFonts(names) => {
                write!(f, "Unknown fonts: {}", names.join(", "))
            }
            CatalogError::GroupNotFound(name) => write!(f, "Group not found: {}", name),
            CatalogError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
        }
    }
}

impl Error for CatalogError {}

/// What a font removal did to the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontRemoval {
    pub removed: bool,
    /// Groups that lost the font but still meet the minimum.
    pub shrunk_groups: Vec<String>,
    /// Groups dropped because they fell below the minimum.
    pub dropped_groups: Vec<String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fonts(&self) -> &[Font] {
        &self.fonts
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn font(&self, name: &str) -> Option<&Font> {
        self.fonts.iter().find(|font| font.name == name)
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|group| group.name == name)
    }

    pub fn has_font(&self, name: &str) -> bool {
        self.font(name).is_some()
    }

    pub fn has_group(&self, name: &str) -> bool {
        self.group(name).is_some()
    }

    /// Inserts `font`, replacing any record with the same name in place.
    /// Repeated records left by older documents collapse into one.
    pub fn add_font(&mut self, font: Font) {
        match self.fonts.iter().position(|existing| existing.name == font.name) {
            Some(index) => {
                let name = font.name.clone();
                self.fonts[index] = font;
                let mut seen = false;
                self.fonts.retain(|existing| {
                    if existing.name != name {
                        return true;
                    }
                    let keep = !seen;
                    seen = true;
                    keep
                });
            }
            None => self.fonts.push(font),
        }
    }

    /// Removes the font and cascades into every group that references it.
    pub fn remove_font(&mut self, name: &str) -> FontRemoval {
        let before = self.fonts.len();
        self.fonts.retain(|font| font.name != name);
        let removed = self.fonts.len() != before;

        let mut removal = FontRemoval {
            removed,
            ..FontRemoval::default()
        };

        for group in &mut self.groups {
            let referenced = group.fonts.len();
            group.fonts.retain(|font| font != name);
            if group.fonts.len() == referenced {
                continue;
            }
            if group.fonts.len() < MIN_GROUP_FONTS {
                removal.dropped_groups.push(group.name.clone());
            } else {
                removal.shrunk_groups.push(group.name.clone());
            }
        }
        self.groups.retain(|group| group.fonts.len() >= MIN_GROUP_FONTS);

        removal
    }

    pub fn create_group(&mut self, name: &str, fonts: Vec<String>) -> Result<&Group, CatalogError> {
        validate_group_name(name)?;
        if self.has_group(name) {
            return Err(CatalogError::DuplicateGroup(name.to_string()));
        }
        self.validate_font_list(&fonts)?;

        self.groups.push(Group {
            name: name.to_string(),
            fonts,
        });
        Ok(&self.groups[self.groups.len() - 1])
    }

    /// Renames a group and/or replaces its font list. Nothing changes unless
    /// every supplied field is valid.
    pub fn edit_group(
        &mut self,
        old_name: &str,
        new_name: Option<&str>,
        fonts: Option<Vec<String>>,
    ) -> Result<&Group, CatalogError> {
        let index = self
            .groups
            .iter()
            .position(|group| group.name == old_name)
            .ok_or_else(|| CatalogError::GroupNotFound(old_name.to_string()))?;

        if new_name.is_none() && fonts.is_none() {
            return Err(CatalogError::InvalidRequest(
                "Provide a new name, a font list, or both".to_string(),
            ));
        }

        if let Some(new_name) = new_name {
            validate_group_name(new_name)?;
            if new_name != old_name && self.has_group(new_name) {
                return Err(CatalogError::DuplicateGroup(new_name.to_string()));
            }
        }
        if let Some(fonts) = fonts.as_ref() {
            self.validate_font_list(fonts)?;
        }

        let group = &mut self.groups[index];
        if let Some(new_name) = new_name {
            group.name = new_name.to_string();
        }
        if let Some(fonts) = fonts {
            group.fonts = fonts;
        }
        Ok(&self.groups[index])
    }

    pub fn remove_group(&mut self, name: &str) -> bool {
        let before = self.groups.len();
        self.groups.retain(|group| group.name != name);
        self.groups.len() != before
    }

    fn validate_font_list(&self, fonts: &[String]) -> Result<(), CatalogError> {
        if fonts.len() < MIN_GROUP_FONTS {
            return Err(CatalogError::TooFewFonts { count: fonts.len() });
        }

        let mut unknown: Vec<String> = Vec::new();
        for font in fonts {
            if !self.has_font(font) && !unknown.contains(font) {
                unknown.push(font.clone());
            }
        }
        if unknown.is_empty() {
            Ok(())
        } else {
            Err(CatalogError::UnknownFonts(unknown))
        }
    }
}

fn validate_group_name(name: &str) -> Result<(), CatalogError> {
    if name.trim().is_empty() {
        return Err(CatalogError::InvalidRequest(
            "Group name cannot be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    fn catalog_with_fonts(fonts: &[&str]) -> Catalog {
        let mut catalog = Catalog::new();
        for font in fonts {
            catalog.add_font(Font::new(*font));
        }
        catalog
    }

    #[test]
    fn font_path_points_at_uploads() {
        let font = Font::new("Roboto.ttf");
        assert_eq!(font.path, "/uploads/Roboto.ttf");
    }

    #[test]
    fn add_font_replaces_same_name() {
        let mut catalog = catalog_with_fonts(&["Roboto.ttf", "Verdana.ttf"]);
        catalog.add_font(Font::new("Roboto.ttf"));
        assert_eq!(catalog.fonts().len(), 2);
        assert_eq!(catalog.fonts()[0].name, "Roboto.ttf");
    }

    #[test]
    fn add_font_collapses_repeated_records() {
        let mut catalog: Catalog = serde_json::from_str(
            r#"{"fonts":[{"name":"A.ttf","path":"/uploads/A.ttf"},{"name":"B.ttf","path":"/uploads/B.ttf"},{"name":"A.ttf","path":"/old/A.ttf"}]}"#,
        )
        .expect("parse");
        catalog.add_font(Font::new("A.ttf"));
        let listed: Vec<&str> = catalog.fonts().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(listed, vec!["A.ttf", "B.ttf"]);
        assert_eq!(catalog.font("A.ttf").map(|f| f.path.as_str()), Some("/uploads/A.ttf"));
    }

    #[test]
    fn missing_groups_key_loads_as_empty() {
        let catalog: Catalog = serde_json::from_str(r#"{"fonts":[]}"#).expect("parse");
        assert!(catalog.groups().is_empty());
        let catalog: Catalog = serde_json::from_str("{}").expect("parse");
        assert!(catalog.fonts().is_empty());
    }

    #[test]
    fn create_group_keeps_font_order_verbatim() {
        let mut catalog = catalog_with_fonts(&["A.ttf", "B.ttf", "C.ttf"]);
        let group = catalog
            .create_group("Trio", names(&["C.ttf", "A.ttf", "C.ttf"]))
            .expect("create");
        assert_eq!(group.fonts, names(&["C.ttf", "A.ttf", "C.ttf"]));
    }

    #[test]
    fn create_group_rejects_duplicate_name_without_changes() {
        let mut catalog = catalog_with_fonts(&["A.ttf", "B.ttf"]);
        catalog
            .create_group("Pair", names(&["A.ttf", "B.ttf"]))
            .expect("create");
        let before = catalog.clone();

        let result = catalog.create_group("Pair", names(&["B.ttf", "A.ttf"]));
        assert_eq!(result, Err(CatalogError::DuplicateGroup("Pair".to_string())));
        assert_eq!(catalog, before);
    }

    #[test]
    fn create_group_requires_two_fonts() {
        let mut catalog = catalog_with_fonts(&["A.ttf"]);
        assert_eq!(
            catalog.create_group("Solo", names(&["A.ttf"])),
            Err(CatalogError::TooFewFonts { count: 1 })
        );
        assert_eq!(
            catalog.create_group("None", Vec::new()),
            Err(CatalogError::TooFewFonts { count: 0 })
        );
        assert!(catalog.groups().is_empty());
    }

    #[test]
    fn create_group_reports_every_unknown_font() {
        let mut catalog = catalog_with_fonts(&["A.ttf"]);
        let result = catalog.create_group(
            "Broken",
            names(&["X.ttf", "A.ttf", "Y.ttf", "X.ttf"]),
        );
        assert_eq!(
            result,
            Err(CatalogError::UnknownFonts(names(&["X.ttf", "Y.ttf"])))
        );
    }

    #[test]
    fn create_group_rejects_blank_name() {
        let mut catalog = catalog_with_fonts(&["A.ttf", "B.ttf"]);
        assert!(matches!(
            catalog.create_group("  ", names(&["A.ttf", "B.ttf"])),
            Err(CatalogError::InvalidRequest(_))
        ));
    }

    #[test]
    fn remove_font_shrinks_and_drops_groups() {
        let mut catalog = catalog_with_fonts(&["A.ttf", "B.ttf", "C.ttf"]);
        catalog
            .create_group("Pair", names(&["A.ttf", "B.ttf"]))
            .expect("pair");
        catalog
            .create_group("Trio", names(&["A.ttf", "B.ttf", "C.ttf"]))
            .expect("trio");
        catalog
            .create_group("Other", names(&["B.ttf", "C.ttf"]))
            .expect("other");

        let removal = catalog.remove_font("A.ttf");

        assert!(removal.removed);
        assert_eq!(removal.dropped_groups, names(&["Pair"]));
        assert_eq!(removal.shrunk_groups, names(&["Trio"]));
        assert!(!catalog.has_font("A.ttf"));
        assert!(!catalog.has_group("Pair"));
        assert_eq!(
            catalog.group("Trio").map(|g| g.fonts.clone()),
            Some(names(&["B.ttf", "C.ttf"]))
        );
        assert_eq!(
            catalog.group("Other").map(|g| g.fonts.clone()),
            Some(names(&["B.ttf", "C.ttf"]))
        );
    }

    #[test]
    fn remove_font_removes_repeated_references() {
        let mut catalog = catalog_with_fonts(&["A.ttf", "B.ttf"]);
        catalog
            .create_group("Echo", names(&["A.ttf", "A.ttf", "B.ttf"]))
            .expect("create");
        let removal = catalog.remove_font("A.ttf");
        assert_eq!(removal.dropped_groups, names(&["Echo"]));
        assert!(catalog.groups().is_empty());
    }

    #[test]
    fn remove_missing_font_reports_not_removed() {
        let mut catalog = catalog_with_fonts(&["A.ttf"]);
        let removal = catalog.remove_font("Missing.ttf");
        assert_eq!(removal, FontRemoval::default());
        assert_eq!(catalog.fonts().len(), 1);
    }

    #[test]
    fn remove_font_cleans_stale_references_without_font_record() {
        let mut catalog: Catalog = serde_json::from_str(
            r#"{"fonts":[{"name":"B.ttf","path":"/uploads/B.ttf"}],"groups":[{"name":"Stale","fonts":["Gone.ttf","B.ttf"]}]}"#,
        )
        .expect("parse");
        let removal = catalog.remove_font("Gone.ttf");
        assert!(!removal.removed);
        assert_eq!(removal.dropped_groups, names(&["Stale"]));
    }

    #[test]
    fn edit_group_requires_existing_group_and_a_change() {
        let mut catalog = catalog_with_fonts(&["A.ttf", "B.ttf"]);
        assert_eq!(
            catalog.edit_group("Missing", Some("New"), None),
            Err(CatalogError::GroupNotFound("Missing".to_string()))
        );
        catalog
            .create_group("Pair", names(&["A.ttf", "B.ttf"]))
            .expect("create");
        assert!(matches!(
            catalog.edit_group("Pair", None, None),
            Err(CatalogError::InvalidRequest(_))
        ));
    }

    #[test]
    fn edit_group_renames_and_replaces_fonts() {
        let mut catalog = catalog_with_fonts(&["A.ttf", "B.ttf", "C.ttf"]);
        catalog
            .create_group("Pair", names(&["A.ttf", "B.ttf"]))
            .expect("create");

        let group = catalog
            .edit_group("Pair", Some("Sans"), Some(names(&["B.ttf", "C.ttf"])))
            .expect("edit");
        assert_eq!(group.name, "Sans");
        assert_eq!(group.fonts, names(&["B.ttf", "C.ttf"]));
        assert!(!catalog.has_group("Pair"));
    }

    #[test]
    fn edit_group_with_unknown_fonts_leaves_group_unchanged() {
        let mut catalog = catalog_with_fonts(&["A.ttf", "B.ttf"]);
        catalog
            .create_group("Pair", names(&["A.ttf", "B.ttf"]))
            .expect("create");
        let before = catalog.clone();

        let result = catalog.edit_group(
            "Pair",
            Some("Renamed"),
            Some(names(&["A.ttf", "Q.ttf", "Z.ttf"])),
        );
        assert_eq!(
            result,
            Err(CatalogError::UnknownFonts(names(&["Q.ttf", "Z.ttf"])))
        );
        assert_eq!(catalog, before);
    }

    #[test]
    fn edit_group_rejects_rename_onto_another_group() {
        let mut catalog = catalog_with_fonts(&["A.ttf", "B.ttf"]);
        catalog
            .create_group("One", names(&["A.ttf", "B.ttf"]))
            .expect("one");
        catalog
            .create_group("Two", names(&["B.ttf", "A.ttf"]))
            .expect("two");

        assert_eq!(
            catalog.edit_group("One", Some("Two"), None),
            Err(CatalogError::DuplicateGroup("Two".to_string()))
        );
        assert!(catalog.edit_group("One", Some("One"), None).is_ok());
    }

    #[test]
    fn remove_group_is_idempotent() {
        let mut catalog = catalog_with_fonts(&["A.ttf", "B.ttf"]);
        catalog
            .create_group("Pair", names(&["A.ttf", "B.ttf"]))
            .expect("create");
        assert!(catalog.remove_group("Pair"));
        assert!(!catalog.remove_group("Pair"));
        assert!(catalog.groups().is_empty());
        assert_eq!(catalog.fonts().len(), 2);
    }

    #[test]
    fn document_shape_matches_persisted_layout() {
        let mut catalog = catalog_with_fonts(&["A.ttf", "B.ttf"]);
        catalog
            .create_group("Pair", names(&["A.ttf", "B.ttf"]))
            .expect("create");
        let value = serde_json::to_value(&catalog).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({
                "fonts": [
                    {"name": "A.ttf", "path": "/uploads/A.ttf"},
                    {"name": "B.ttf", "path": "/uploads/B.ttf"}
                ],
                "groups": [{"name": "Pair", "fonts": ["A.ttf", "B.ttf"]}]
            })
        );
    }
}
