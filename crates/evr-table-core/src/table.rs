//! Table assembly.
//!
//! Rows are composed in input order, wrapped in a content block, and then
//! finalized: the header row is fixed and, when every row succeeded, the
//! block is marked hideable for a "succeeded-only" view.

use tracing::debug;

use crate::config::RenderConfig;
use crate::content::{ContentBlock, ContentFragment, StringTemplate};
use crate::result::EvaluationResult;
use crate::row::RowComposer;
use crate::status::StatusKind;

pub const HEADER_ROW: [&str; 3] = ["Status", "Expectation", "Observed Value"];

/// Block class that lets a "hide succeeded" view drop the whole table.
pub const HIDE_SUCCEEDED_SECTION_CLASS: &str =
    "hide-succeeded-validations-column-section-target-child";

/// Renders evaluation results into a table content block.
pub struct TableRenderer {
    composer: RowComposer,
    config: RenderConfig,
}

impl TableRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            composer: RowComposer::new(),
            config,
        }
    }

    pub fn with_composer(mut self, composer: RowComposer) -> Self {
        self.composer = composer;
        self
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render all results. Returns `None` for an empty input.
    pub fn render(&self, results: &[EvaluationResult]) -> Option<ContentBlock> {
        if results.is_empty() {
            return None;
        }

        let mut has_failed = false;
        let mut rows = Vec::with_capacity(results.len());
        for result in results {
            has_failed |= !StatusKind::classify(result).is_success();
            rows.extend(self.composer.build_row(
                result,
                Some(&self.config.element_styling),
                self.config.include_column_name,
            ));
        }
        debug!(rows = rows.len(), has_failed, "Rendered results table");

        let block = ContentBlock {
            header: self
                .config
                .header
                .as_ref()
                .map(|h| ContentFragment::template(StringTemplate::new(h.clone()))),
            header_row: Vec::new(),
            table: rows,
            styling: self.config.block_styling(),
        };

        Some(finalize(block, has_failed))
    }
}

/// Fix the header row and, if nothing failed, mark the block hideable.
pub fn finalize(block: ContentBlock, has_failed: bool) -> ContentBlock {
    let ContentBlock {
        header,
        table,
        mut styling,
        ..
    } = block;
    if !has_failed && !styling.has_class(HIDE_SUCCEEDED_SECTION_CLASS) {
        styling.classes.push(HIDE_SUCCEEDED_SECTION_CLASS.to_string());
    }

    ContentBlock {
        header,
        header_row: HEADER_ROW.iter().map(|h| h.to_string()).collect(),
        table,
        styling,
    }
}
