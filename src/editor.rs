use crate::command::Command;
use crate::context::{self, Operator};
use crate::error::Result;
use crate::model::buffer::Buffer;
use crate::model::config::AppConfig;
use crate::motion::BoundaryService;
use crate::region_set::{self, MoveOutcome};

/// A buffer together with the configuration and services commands run with.
pub struct Editor {
    pub buffer: Buffer,
    pub config: AppConfig,
    boundaries: Option<Box<dyn BoundaryService>>,
}

impl Editor {
    pub fn new(mut buffer: Buffer, config: AppConfig) -> Self {
        buffer.set_column_width(config.layout.column_width);
        let boundaries = default_boundaries(&config);

        Self {
            buffer,
            config,
            boundaries,
        }
    }

    /// Replace the word segmentation service; `None` falls back to plain word motion.
    pub fn with_boundaries(mut self, boundaries: Option<Box<dyn BoundaryService>>) -> Self {
        self.boundaries = boundaries;
        self
    }

    pub fn boundary_service_name(&self) -> Option<&'static str> {
        self.boundaries.as_deref().map(|service| service.name())
    }

    /// Run `command` over every selection as a single edit.
    ///
    /// On error the buffer and its selections are left as they were.
    pub fn run(&mut self, command: Command) -> Result<MoveOutcome> {
        let request = command.request(&self.config.movement);
        let boundaries = self.boundaries.as_deref();

        let outcome = self
            .buffer
            .transaction(|buffer| region_set::grab_text(buffer, request, boundaries))?;

        tracing::info!(
            command = command.name(),
            regions = outcome.regions,
            moved = outcome.inserted,
            "command finished"
        );
        Ok(outcome)
    }

    /// See [`context::query_context`].
    pub fn query_context(
        &self,
        key: &str,
        operator: Operator,
        operand: bool,
        match_all: bool,
    ) -> Option<bool> {
        context::query_context(&self.buffer, key, operator, operand, match_all)
    }
}

#[cfg(feature = "granular")]
fn default_boundaries(config: &AppConfig) -> Option<Box<dyn BoundaryService>> {
    if config.movement.granular_subwords {
        Some(Box::new(crate::motion::GranularSegmenter))
    } else {
        None
    }
}

#[cfg(not(feature = "granular"))]
fn default_boundaries(config: &AppConfig) -> Option<Box<dyn BoundaryService>> {
    if config.movement.granular_subwords {
        tracing::debug!("granular subwords requested but not compiled in");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MoveError;
    use crate::model::cursor::Selection;

    fn editor(text: &str, selections: &[Selection]) -> Editor {
        let mut buffer = Buffer::from_text(text);
        buffer.select(selections.iter().copied());
        Editor::new(buffer, AppConfig::default())
    }

    #[test]
    fn test_run_applies_config_width() {
        let config = AppConfig::from_toml("[layout]\ncolumn_width = 0.0\n").unwrap();
        let mut buffer = Buffer::from_text("a\nb\n");
        buffer.select([Selection::caret(0)]);
        let mut editor = Editor::new(buffer, config);

        let err = editor.run(Command::MoveTextDown { times: 1 }).unwrap_err();
        assert!(matches!(err, MoveError::PreconditionViolation(_)));
        assert_eq!(editor.buffer.text(), "a\nb\n");
        assert_eq!(editor.buffer.selections.len(), 1);
    }

    #[test]
    fn test_horizontal_unit_from_config() {
        let config = AppConfig::from_toml("[movement]\nhorizontal_unit = \"word\"\n").unwrap();
        let mut buffer = Buffer::from_text("ab cd ef");
        buffer.select([Selection::new(0, 3)]);
        let mut editor = Editor::new(buffer, config);

        editor.run(Command::MoveTextRight { by: None }).unwrap();
        assert_eq!(editor.buffer.text(), "cdab  ef");
    }

    #[test]
    fn test_without_service_falls_back() {
        let mut editor = editor("HTTPServer x", &[Selection::new(11, 12)]).with_boundaries(None);
        assert_eq!(editor.boundary_service_name(), None);

        editor.run(Command::MoveSubwordLeft).unwrap();
        assert_eq!(editor.buffer.text(), "xHTTPServer ");
    }

    #[cfg(feature = "granular")]
    #[test]
    fn test_granular_service_splits_acronyms() {
        let mut editor = editor("HTTPServer x", &[Selection::new(11, 12)]);
        assert_eq!(editor.boundary_service_name(), Some("granular"));

        editor.run(Command::MoveSubwordLeft).unwrap();
        assert_eq!(editor.buffer.text(), "HTTPxServer ");
    }

    #[test]
    fn test_query_context() {
        let editor = editor("one\ntwo\n", &[Selection::new(0, 4)]);
        assert_eq!(
            editor.query_context(context::EMPTY_OR_FULL_LINES_KEY, Operator::Equal, true, true),
            Some(true)
        );
    }
}
