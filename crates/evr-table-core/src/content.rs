//! Content fragment model.
//!
//! Fragments are the structured, presentation-ready output of this crate.
//! They carry templates, parameters and style hints; turning them into
//! markup is the job of whatever consumes them.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::values::display_value;

lazy_static! {
    /// `$$` escape, `${name}` or `$name`
    static ref TEMPLATE_PARAM: Regex = Regex::new(r"\$(?:(\$)|\{(\w+)\}|(\w+))").unwrap();
}

/// Style hints for a single element (a template parameter, a parent cell,
/// a table body).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ElementStyling {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl ElementStyling {
    pub fn classes(classes: &[&str]) -> Self {
        Self {
            classes: classes.iter().map(|c| c.to_string()).collect(),
            tag: None,
        }
    }

    pub fn tag(tag: impl Into<String>) -> Self {
        Self {
            classes: Vec::new(),
            tag: Some(tag.into()),
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

/// Style hints attached to a fragment or template.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Styling {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    /// Per-parameter styling, keyed by template parameter name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, ElementStyling>,

    /// Styling for the enclosing element (e.g. the table cell)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ElementStyling>,

    /// Styling for a table body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<ElementStyling>,
}

impl Styling {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_classes(mut self, classes: &[&str]) -> Self {
        self.classes = classes.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, styling: ElementStyling) -> Self {
        self.params.insert(name.into(), styling);
        self
    }

    pub fn with_parent(mut self, styling: ElementStyling) -> Self {
        self.parent = Some(styling);
        self
    }

    pub fn with_body(mut self, styling: ElementStyling) -> Self {
        self.body = Some(styling);
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// A text template with `$name` parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StringTemplate {
    pub template: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styling: Option<Styling>,
}

impl StringTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            params: BTreeMap::new(),
            tag: None,
            styling: None,
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_styling(mut self, styling: Styling) -> Self {
        self.styling = Some(styling);
        self
    }

    /// Substitute parameters into the template.
    ///
    /// Unknown parameter names are left as written.
    pub fn to_plain_text(&self) -> String {
        TEMPLATE_PARAM
            .replace_all(&self.template, |caps: &Captures| {
                if caps.get(1).is_some() {
                    return "$".to_string();
                }
                let name = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());
                match self.params.get(name) {
                    Some(value) => display_value(value),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}

/// A unit of renderable content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "content_block_type", rename_all = "snake_case")]
pub enum ContentFragment {
    #[serde(rename = "string_template")]
    TemplatedString {
        string_template: StringTemplate,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        styling: Option<Styling>,
    },

    Table {
        header_row: Vec<String>,

        table: Vec<Vec<TableCell>>,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        styling: Option<Styling>,
    },

    #[serde(rename = "content_block_container")]
    Container {
        content_blocks: Vec<ContentFragment>,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        styling: Option<Styling>,
    },

    #[serde(rename = "collapse")]
    Collapsible {
        collapse_toggle_link: String,

        collapse: Vec<ContentFragment>,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        styling: Option<Styling>,
    },
}

impl ContentFragment {
    pub fn template(string_template: StringTemplate) -> Self {
        Self::TemplatedString {
            string_template,
            styling: None,
        }
    }

    pub fn table(header_row: &[&str], table: Vec<Vec<TableCell>>) -> Self {
        Self::Table {
            header_row: header_row.iter().map(|h| h.to_string()).collect(),
            table,
            styling: None,
        }
    }

    pub fn container(content_blocks: Vec<ContentFragment>) -> Self {
        Self::Container {
            content_blocks,
            styling: None,
        }
    }

    pub fn collapsible(toggle_link: impl Into<String>, collapse: Vec<ContentFragment>) -> Self {
        Self::Collapsible {
            collapse_toggle_link: toggle_link.into(),
            collapse,
            styling: None,
        }
    }

    /// Replace the fragment-level styling.
    pub fn with_styling(mut self, new_styling: Styling) -> Self {
        match &mut self {
            Self::TemplatedString { styling, .. }
            | Self::Table { styling, .. }
            | Self::Container { styling, .. }
            | Self::Collapsible { styling, .. } => *styling = Some(new_styling),
        }
        self
    }

    pub fn styling(&self) -> Option<&Styling> {
        match self {
            Self::TemplatedString { styling, .. }
            | Self::Table { styling, .. }
            | Self::Container { styling, .. }
            | Self::Collapsible { styling, .. } => styling.as_ref(),
        }
    }

    pub fn as_string_template(&self) -> Option<&StringTemplate> {
        match self {
            Self::TemplatedString {
                string_template, ..
            } => Some(string_template),
            _ => None,
        }
    }

    /// Header and body of a table fragment.
    pub fn as_table(&self) -> Option<(&[String], &[Vec<TableCell>])> {
        match self {
            Self::Table {
                header_row, table, ..
            } => Some((header_row, table)),
            _ => None,
        }
    }

    /// Flatten to readable text, one line per table row or child block.
    pub fn to_plain_text(&self) -> String {
        match self {
            Self::TemplatedString {
                string_template, ..
            } => string_template.to_plain_text(),
            Self::Table {
                header_row, table, ..
            } => {
                let mut lines = Vec::with_capacity(table.len() + 1);
                lines.push(header_row.join(" | "));
                for row in table {
                    let cells: Vec<String> = row.iter().map(TableCell::to_plain_text).collect();
                    lines.push(cells.join(" | "));
                }
                lines.join("\n")
            }
            Self::Container { content_blocks, .. } => content_blocks
                .iter()
                .map(ContentFragment::to_plain_text)
                .collect::<Vec<_>>()
                .join("\n"),
            Self::Collapsible {
                collapse_toggle_link,
                ..
            } => collapse_toggle_link.clone(),
        }
    }
}

/// One cell of a table fragment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TableCell {
    Fragment(ContentFragment),
    Fragments(Vec<ContentFragment>),
    Value(Value),
}

impl TableCell {
    pub fn to_plain_text(&self) -> String {
        match self {
            Self::Fragment(fragment) => fragment.to_plain_text(),
            Self::Fragments(fragments) => fragments
                .iter()
                .map(ContentFragment::to_plain_text)
                .collect::<Vec<_>>()
                .join(" "),
            Self::Value(value) => display_value(value),
        }
    }
}

impl From<Value> for TableCell {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<&str> for TableCell {
    fn from(value: &str) -> Self {
        Self::Value(Value::String(value.to_string()))
    }
}

impl From<String> for TableCell {
    fn from(value: String) -> Self {
        Self::Value(Value::String(value))
    }
}

impl From<ContentFragment> for TableCell {
    fn from(fragment: ContentFragment) -> Self {
        Self::Fragment(fragment)
    }
}

/// The expectation column of a result row.
///
/// A lone description fragment stays inline; once evidence is attached the
/// cell becomes a list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum DescriptionCell {
    Inline(ContentFragment),
    List(Vec<ContentFragment>),
}

impl DescriptionCell {
    pub fn fragments(&self) -> &[ContentFragment] {
        match self {
            Self::Inline(fragment) => std::slice::from_ref(fragment),
            Self::List(fragments) => fragments,
        }
    }

    pub fn to_plain_text(&self) -> String {
        self.fragments()
            .iter()
            .map(ContentFragment::to_plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// The observed value column of a result row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ObservedValue {
    Text(String),
    Fragment(ContentFragment),
}

impl ObservedValue {
    /// Shown when no observed value can be computed.
    pub const PLACEHOLDER: &'static str = "--";

    pub fn placeholder() -> Self {
        Self::Text(Self::PLACEHOLDER.to_string())
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Fragment(_) => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.as_text() == Some(Self::PLACEHOLDER)
    }

    pub fn to_plain_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Fragment(fragment) => fragment.to_plain_text(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RowCells(ContentFragment, DescriptionCell, ObservedValue);

/// One result row: `[status, expectation, observed value]`.
///
/// Serialized as a three-element array.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "RowCells", into = "RowCells")]
pub struct TableRow {
    pub status: ContentFragment,
    pub description: DescriptionCell,
    pub observed_value: ObservedValue,
}

impl From<RowCells> for TableRow {
    fn from(RowCells(status, description, observed_value): RowCells) -> Self {
        Self {
            status,
            description,
            observed_value,
        }
    }
}

impl From<TableRow> for RowCells {
    fn from(row: TableRow) -> Self {
        RowCells(row.status, row.description, row.observed_value)
    }
}

impl TableRow {
    /// The row as generic table cells.
    pub fn cells(&self) -> [TableCell; 3] {
        let description = match &self.description {
            DescriptionCell::Inline(fragment) => TableCell::Fragment(fragment.clone()),
            DescriptionCell::List(fragments) => TableCell::Fragments(fragments.clone()),
        };
        let observed = match &self.observed_value {
            ObservedValue::Text(text) => TableCell::from(text.clone()),
            ObservedValue::Fragment(fragment) => TableCell::Fragment(fragment.clone()),
        };
        [TableCell::Fragment(self.status.clone()), description, observed]
    }
}

/// A finished results table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "content_block_type", rename = "table")]
pub struct ContentBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<ContentFragment>,

    pub header_row: Vec<String>,

    pub table: Vec<TableRow>,

    #[serde(default)]
    pub styling: Styling,
}
