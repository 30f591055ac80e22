//! The unit concatenator: selected units in, continuous audio out.

use std::sync::Arc;

use fluent_voice_domain::{AudioFormat, SelectedUnit, VoiceError};
use tracing::{debug, debug_span, info_span};

use crate::{
    config::ConcatConfig,
    context::{UnitToTimeline, resolve_units},
    database::UnitDatabase,
    duration::reconcile_durations,
    overlap::DatagramOverlapSource,
    source::BufferedSource,
    stream::AudioStream,
    timeline::Timeline,
};

/// Turns a selected unit sequence into audio.
pub trait UnitConcatenator: Send + Sync {
    /// Format of the produced audio.
    fn audio_format(&self) -> AudioFormat;

    /// Render one utterance. Fails as a whole; no partial audio is returned.
    fn concatenate(&self, units: &[SelectedUnit]) -> Result<AudioStream, VoiceError>;
}

/// Concatenator joining units with pitch-synchronous overlap-add.
///
/// Holds only shared, read-only collaborators, so one instance can serve
/// several utterances concurrently.
pub struct OverlapUnitConcatenator {
    timeline: Arc<dyn Timeline>,
    database: Arc<dyn UnitDatabase>,
    config: ConcatConfig,
    format: AudioFormat,
}

impl OverlapUnitConcatenator {
    /// Create a new [OverlapUnitConcatenatorBuilder].
    pub fn builder() -> OverlapUnitConcatenatorBuilder {
        ConcatenatorParts::builder()
    }

    /// Active configuration.
    pub fn config(&self) -> &ConcatConfig {
        &self.config
    }
}

impl UnitConcatenator for OverlapUnitConcatenator {
    fn audio_format(&self) -> AudioFormat {
        self.format
    }

    fn concatenate(&self, units: &[SelectedUnit]) -> Result<AudioStream, VoiceError> {
        let span = info_span!("concatenate", units = units.len());
        let _enter = span.enter();

        let mut records = {
            let _s = debug_span!("resolve_context").entered();
            resolve_units(units, self.timeline.as_ref(), self.database.as_ref())?
        };

        {
            let _s = debug_span!("reconcile_durations").entered();
            reconcile_durations(
                units,
                &mut records,
                &self.format,
                self.config.parallel_reconcile,
            )?;
        }

        let total: u64 = records.iter().map(|r| r.unit_duration).sum();
        let contexts = records.iter().filter(|r| r.right_context.is_some()).count();
        let source = DatagramOverlapSource::from_records(records)?;
        debug!(
            samples = total,
            seconds = self.format.samples_to_seconds(total),
            right_contexts = contexts,
            "utterance assembled"
        );

        Ok(AudioStream::from_source(
            BufferedSource::new(source, self.config.buffer_samples),
            self.format,
            self.config.block_samples,
        ))
    }
}

/// Parts for an [OverlapUnitConcatenator]. Used to create an
/// [OverlapUnitConcatenatorBuilder] that validates on build.
#[derive(typed_builder::TypedBuilder)]
#[builder(
    builder_method(vis = ""),
    builder_type(name = OverlapUnitConcatenatorBuilder, vis = "pub"),
    build_method(into = Result<OverlapUnitConcatenator, VoiceError>, vis = "pub"))
]
struct ConcatenatorParts {
    timeline: Arc<dyn Timeline>,
    database: Arc<dyn UnitDatabase>,
    #[builder(default)]
    config: ConcatConfig,
}

impl From<ConcatenatorParts> for Result<OverlapUnitConcatenator, VoiceError> {
    fn from(value: ConcatenatorParts) -> Self {
        value.config.validate()?;

        let rate = value.timeline.sample_rate();
        // rejects zero rates on either side
        UnitToTimeline::new(value.database.unit_sample_rate(), rate)?;
        if value.timeline.total_duration() == 0 {
            return Err(VoiceError::Configuration(
                "timeline holds no audio".to_string(),
            ));
        }
        if let Some(expected) = value.config.expected_sample_rate {
            if expected != rate {
                return Err(VoiceError::Configuration(format!(
                    "timeline is recorded at {rate} Hz, expected {expected} Hz"
                )));
            }
        }

        Ok(OverlapUnitConcatenator {
            timeline: value.timeline,
            database: value.database,
            config: value.config,
            format: AudioFormat::pcm16_mono(rate),
        })
    }
}
