//! # Fluent Voice Domain
//!
//! Shared domain objects for the fluent-voice unit concatenation pipeline.
//!
//! The types here describe recorded speech material (`Datagram`, `Unit`),
//! what the prosody model wants from it (`Target`), and the pairing the
//! unit-selection search produced (`SelectedUnit`). They carry no I/O and
//! are shared between the audio store, the unit database and the
//! concatenator.

pub mod audio_format;
pub mod datagram;
pub mod selected_unit;
pub mod target;
pub mod unit;
pub mod voice_error;

// Re-export core types
pub use audio_format::AudioFormat;
pub use datagram::Datagram;
pub use selected_unit::SelectedUnit;
pub use target::Target;
pub use unit::Unit;
pub use voice_error::VoiceError;

/// Prelude module containing commonly used types.
pub mod prelude {
    pub use crate::{AudioFormat, Datagram, SelectedUnit, Target, Unit, VoiceError};
}
