//! Themes: named bundles of per-category visual attributes
//!
//! A theme assigns one [`TextAttribute`] to each syntactic category.
//! Themes are immutable data; the rule compiler captures the attributes
//! it needs, so no live theme reference is ever touched from the
//! per-block hot path.

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::style::{Color, TextAttribute, Weight};

/// Syntactic categories a theme assigns attributes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Language keywords
    Keyword,
    /// Type names
    Type,
    /// Class names
    Class,
    /// Function names
    Function,
    /// Double-quoted string literals
    Quote,
    /// Single-line comments
    Comment,
    /// Multi-line (block) comments
    BlockComment,
    /// Constants and enum-like values
    Constant,
}

impl Category {
    /// Key used for this category in theme files
    pub fn name(&self) -> &'static str {
        match self {
            Category::Keyword => "keyword",
            Category::Type => "type",
            Category::Class => "class",
            Category::Function => "function",
            Category::Quote => "quote",
            Category::Comment => "comment",
            Category::BlockComment => "block-comment",
            Category::Constant => "constant",
        }
    }
}

/// A named bundle of category attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Theme name (e.g. "dusk")
    pub name: String,
    pub keyword: TextAttribute,
    pub type_name: TextAttribute,
    pub class_name: TextAttribute,
    pub function: TextAttribute,
    pub quote: TextAttribute,
    pub comment: TextAttribute,
    pub block_comment: TextAttribute,
    pub constant: TextAttribute,
}

impl Theme {
    /// Get the attribute for a category
    pub fn attr(&self, category: Category) -> TextAttribute {
        match category {
            Category::Keyword => self.keyword,
            Category::Type => self.type_name,
            Category::Class => self.class_name,
            Category::Function => self.function,
            Category::Quote => self.quote,
            Category::Comment => self.comment,
            Category::BlockComment => self.block_comment,
            Category::Constant => self.constant,
        }
    }

    /// Replace the attribute for a category
    pub fn set_attr(&mut self, category: Category, attr: TextAttribute) {
        match category {
            Category::Keyword => self.keyword = attr,
            Category::Type => self.type_name = attr,
            Category::Class => self.class_name = attr,
            Category::Function => self.function = attr,
            Category::Quote => self.quote = attr,
            Category::Comment => self.comment = attr,
            Category::BlockComment => self.block_comment = attr,
            Category::Constant => self.constant = attr,
        }
    }

    /// Load a theme from a TOML file
    ///
    /// Missing categories keep the default palette's attribute, so a
    /// theme file only has to override what it cares about.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(Self::parse(&contents))
    }

    /// Parse theme TOML contents
    ///
    /// Unknown keys and malformed values are ignored, like the rest of
    /// the editor's config handling: a broken theme file still yields a
    /// usable theme.
    pub fn parse(contents: &str) -> Self {
        let mut theme = Self::default();

        let table: toml::Table = match contents.parse() {
            Ok(table) => table,
            Err(_) => return theme,
        };

        if let Some(name) = table.get("name").and_then(|v| v.as_str()) {
            theme.name = name.to_string();
        }

        for category in ALL_CATEGORIES {
            if let Some(value) = table.get(category.name()).and_then(|v| v.as_table()) {
                let mut attr = theme.attr(category);
                if let Some(color) = value
                    .get("color")
                    .and_then(|v| v.as_str())
                    .and_then(Color::parse)
                {
                    attr.color = color;
                }
                if let Some(weight) = value.get("weight").and_then(|v| v.as_str()) {
                    attr.weight = match weight {
                        "bold" => Weight::Bold,
                        _ => Weight::Normal,
                    };
                }
                if let Some(italic) = value.get("italic").and_then(|v| v.as_bool()) {
                    attr.italic = italic;
                }
                theme.set_attr(category, attr);
            }
        }

        theme
    }
}

/// All categories, in theme-file order
pub const ALL_CATEGORIES: [Category; 8] = [
    Category::Keyword,
    Category::Type,
    Category::Class,
    Category::Function,
    Category::Quote,
    Category::Comment,
    Category::BlockComment,
    Category::Constant,
];

impl Default for Theme {
    /// The built-in "dusk" palette, used when no theme is configured
    fn default() -> Self {
        Self {
            name: "dusk".to_string(),
            keyword: TextAttribute::colored(Color::new(0xc5, 0x86, 0xc0)).with_bold(),
            type_name: TextAttribute::colored(Color::new(0x4e, 0xc9, 0xb0)),
            class_name: TextAttribute::colored(Color::new(0xd7, 0xba, 0x7d)),
            function: TextAttribute::colored(Color::new(0x56, 0x9c, 0xd6)),
            quote: TextAttribute::colored(Color::new(0x6a, 0xa8, 0x4f)),
            comment: TextAttribute::colored(Color::new(0x80, 0x80, 0x80)).with_italic(),
            block_comment: TextAttribute::colored(Color::new(0x80, 0x80, 0x80)).with_italic(),
            constant: TextAttribute::colored(Color::new(0xd1, 0x69, 0x69)),
        }
    }
}
