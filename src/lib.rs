//! Galaxy morphology classification for cosmological simulation catalogues.
//!
//! Load a catalogue ([`data::loader::load_file`]), which classifies every
//! galaxy on the way in; aggregate it ([`data::aggregate`]); chart it
//! ([`chart`]) or browse it in the viewer ([`app::GalMorphApp`]).

pub mod app;
pub mod chart;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod state;
pub mod ui;

pub use error::{GalMorphError, Result};
