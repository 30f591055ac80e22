//! # Fluent Voice Concat
//!
//! Waveform concatenation for unit-selection speech synthesis.
//!
//! Given the units a selection search picked, [`OverlapUnitConcatenator`]
//!
//! 1. fetches each unit's pitch-period frames from a [`Timeline`], plus one
//!    right-context frame where the recording continues into material the
//!    search did not place next ([`context`]);
//! 2. fits silence units to their predicted pause length by inserting or
//!    removing frames in the middle, leaving speech timing untouched
//!    ([`duration`]);
//! 3. joins everything with pitch-synchronous overlap-add into a pull-based
//!    [`AudioStream`] ([`overlap`]).
//!
//! ```no_run
//! use std::sync::Arc;
//! use fluent_voice_concat::prelude::*;
//!
//! # fn main() -> Result<(), VoiceError> {
//! # let (timeline, database, units): (InMemoryTimeline, InMemoryUnitDatabase, Vec<SelectedUnit>) = todo!();
//! let concatenator = OverlapUnitConcatenator::builder()
//!     .timeline(Arc::new(timeline))
//!     .database(Arc::new(database))
//!     .build()?;
//! concatenator.concatenate(&units)?.write_wav("utterance.wav")?;
//! # Ok(()) }
//! ```

pub mod concatenator;
pub mod config;
pub mod context;
pub mod database;
pub mod duration;
pub mod logging;
pub mod overlap;
pub mod source;
pub mod stream;
pub mod timeline;
pub mod unit_data;

pub use concatenator::{OverlapUnitConcatenator, OverlapUnitConcatenatorBuilder, UnitConcatenator};
pub use config::ConcatConfig;
pub use database::{InMemoryUnitDatabase, UnitDatabase, UnitDatabaseBuilder};
pub use source::{BufferedSource, SampleSource};
pub use stream::AudioStream;
pub use timeline::{InMemoryTimeline, Timeline};
pub use unit_data::UnitData;

/// Prelude module containing commonly used types.
pub mod prelude {
    pub use crate::{
        AudioStream, ConcatConfig, InMemoryTimeline, InMemoryUnitDatabase, OverlapUnitConcatenator,
        Timeline, UnitConcatenator, UnitDatabase,
    };
    pub use fluent_voice_domain::prelude::*;
}
