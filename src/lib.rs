//! Granular text moving for multi-cursor editors.
//!
//! Every selection detaches a unit of text (a line, a character, a word, a
//! subword, or an empty span that travels to the start or end of its line),
//! the unit moves, and it is put back, all in one edit. See
//! [`region_set::grab_text`] for the engine and [`Editor`] for the command
//! surface.

pub mod command;
pub mod context;
pub mod editor;
pub mod error;
pub mod model;
pub mod motion;
pub mod region;
pub mod region_set;

pub use command::{Bulk, Command};
pub use editor::Editor;
pub use error::MoveError;
pub use model::buffer::Buffer;
pub use model::config::AppConfig;
pub use model::cursor::{Selection, SelectionSet, Span};
pub use model::unit::{Direction, Unit};
pub use model::view::TextView;
pub use motion::{BoundaryService, PrimitiveMotion};
pub use region_set::{MoveOutcome, MoveRequest, grab_text};
