//! Duration reconciliation.
//!
//! Speech units keep their natural recorded timing. Silence units are
//! fitted to the predicted pause length: a synthetic zero frame is inserted
//! in the middle when the recording is too short, and frames are removed
//! from the middle outwards when it is too long. Zero-length frames are
//! database defects and are scrubbed from every unit first.

use fluent_voice_domain::{AudioFormat, Datagram, SelectedUnit, VoiceError};
use tracing::{debug, info, warn};

use crate::unit_data::{UnitData, total_duration};

/// Longest pause a single silence unit may ask for: a full 16-bit WAV data
/// chunk.
pub const MAX_SILENCE_SAMPLES: u64 = u32::MAX as u64 / 2;

/// Drop zero-length frames, keeping order. Returns the number removed.
pub fn remove_zero_length(frames: &mut Vec<Datagram>) -> usize {
    let before = frames.len();
    frames.retain(|d| !d.is_zero_length());
    before - frames.len()
}

/// Fit a non-empty silence frame run to `target` samples.
///
/// `target` must already be at least the first frame's duration.
pub fn fit_silence(frames: Vec<Datagram>, natural: u64, target: u64) -> Vec<Datagram> {
    let n = frames.len();
    let mid = n.div_ceil(2);

    if natural < target {
        let mut out = frames;
        out.insert(mid, Datagram::zero(target - natural));
        return out;
    }

    // right cursor: first frame of the right half; left cursor: last kept
    // frame of the left half. Frame 0 always survives.
    let mut remaining = natural;
    let mut right = mid;
    let mut left = mid as isize - 1;
    while remaining > target && right < n {
        remaining -= frames[right].duration();
        right += 1;
        if remaining > target && left > 0 {
            remaining -= frames[left as usize].duration();
            left -= 1;
        }
    }

    let keep_left = (left + 1) as usize;
    let mut out = Vec::with_capacity(keep_left + n - right);
    out.extend_from_slice(&frames[..keep_left]);
    out.extend_from_slice(&frames[right..]);
    out
}

/// Final frame sequence for one unit, independent of its neighbours.
///
/// Fails only for a silence target whose duration is not a finite number
/// of seconds or exceeds [`MAX_SILENCE_SAMPLES`].
pub fn reconcile_frames(
    selected: &SelectedUnit,
    mut frames: Vec<Datagram>,
    format: &AudioFormat,
) -> Result<Vec<Datagram>, VoiceError> {
    let dropped = remove_zero_length(&mut frames);
    if dropped > 0 {
        warn!(unit = %selected, dropped, "unit contains zero-length datagrams, removing them");
    }
    let natural = total_duration(&frames);

    if !selected.is_silence() {
        return Ok(frames);
    }

    let seconds = selected.target.duration_seconds;
    if !seconds.is_finite() {
        return Err(VoiceError::InvalidTarget(format!(
            "{selected}: silence duration {seconds} s"
        )));
    }
    let mut target = format.seconds_to_samples(seconds);
    if target > MAX_SILENCE_SAMPLES {
        return Err(VoiceError::InvalidTarget(format!(
            "{selected}: silence of {target} samples"
        )));
    }
    match frames.first() {
        Some(first) => {
            let period = first.duration();
            if target < period {
                info!(
                    unit = %selected,
                    requested_s = seconds,
                    adjusted_s = format.samples_to_seconds(period),
                    "adjusting silence target to at least one period"
                );
                target = period;
            }
            Ok(fit_silence(frames, natural, target))
        }
        None => Ok(vec![Datagram::zero(target)]),
    }
}

/// Reconcile one working record in place.
pub fn reconcile_unit(
    selected: &SelectedUnit,
    data: &mut UnitData,
    format: &AudioFormat,
) -> Result<(), VoiceError> {
    let frames = reconcile_frames(selected, std::mem::take(&mut data.frames), format)?;
    data.unit_duration = total_duration(&frames);
    data.frames = frames;
    Ok(())
}

/// Reconcile every unit of an utterance.
///
/// Units are independent of each other, so with the `parallel` feature and
/// `parallel` set the work is spread over the rayon pool.
pub fn reconcile_durations(
    units: &[SelectedUnit],
    records: &mut [UnitData],
    format: &AudioFormat,
    parallel: bool,
) -> Result<(), VoiceError> {
    debug_assert_eq!(units.len(), records.len());

    if parallel {
        reconcile_parallel(units, records, format)?;
    } else {
        reconcile_sequential(units, records, format)?;
    }
    debug!(units = units.len(), parallel, "durations reconciled");
    Ok(())
}

fn reconcile_sequential(
    units: &[SelectedUnit],
    records: &mut [UnitData],
    format: &AudioFormat,
) -> Result<(), VoiceError> {
    for (selected, data) in units.iter().zip(records.iter_mut()) {
        reconcile_unit(selected, data, format)?;
    }
    Ok(())
}

#[cfg(feature = "parallel")]
fn reconcile_parallel(
    units: &[SelectedUnit],
    records: &mut [UnitData],
    format: &AudioFormat,
) -> Result<(), VoiceError> {
    use rayon::prelude::*;

    units
        .par_iter()
        .zip(records.par_iter_mut())
        .try_for_each(|(selected, data)| reconcile_unit(selected, data, format))
}

#[cfg(not(feature = "parallel"))]
fn reconcile_parallel(
    units: &[SelectedUnit],
    records: &mut [UnitData],
    format: &AudioFormat,
) -> Result<(), VoiceError> {
    reconcile_sequential(units, records, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fluent_voice_domain::{Target, Unit};

    /// 1 kHz so that seconds map onto sample counts without rounding.
    const FMT: AudioFormat = AudioFormat::pcm16_mono(1_000);

    fn frames(durations: &[u64]) -> Vec<Datagram> {
        durations
            .iter()
            .enumerate()
            .map(|(i, &d)| Datagram::from_samples(&vec![i as i16 + 1; d as usize]))
            .collect()
    }

    fn durations(frames: &[Datagram]) -> Vec<u64> {
        frames.iter().map(Datagram::duration).collect()
    }

    fn silence(target_samples: u64) -> SelectedUnit {
        SelectedUnit::new(
            Unit::new(0, 0, 0),
            Target::silence(target_samples as f32 / 1_000.0),
        )
    }

    fn speech(target_samples: u64) -> SelectedUnit {
        SelectedUnit::new(
            Unit::new(0, 0, 0),
            Target::speech("a", target_samples as f32 / 1_000.0),
        )
    }

    #[test]
    fn insertion_lands_at_ceil_half() {
        for n in 0..=4u64 {
            let input = frames(&vec![2; n as usize]);
            let out = reconcile_frames(&silence(2 * n + 5), input, &FMT).unwrap();
            let expected_at = (n as usize).div_ceil(2);
            assert_eq!(out.len(), n as usize + 1, "n = {n}");
            assert_eq!(out[expected_at], Datagram::zero(5));
            assert_eq!(total_duration(&out), 2 * n + 5);
        }
    }

    #[test]
    fn inserts_gap_into_short_pause() {
        let out = reconcile_frames(&silence(12), frames(&[3, 4]), &FMT).unwrap();
        assert_eq!(durations(&out), vec![3, 5, 4]);
        assert_eq!(out[1], Datagram::zero(5));
    }

    #[test]
    fn removes_from_the_middle_outwards() {
        // mid = 2: drop index 2 (10 -> 7), then index 1 (7 -> 3)
        let input = frames(&[3, 4, 3]);
        let out = reconcile_frames(&silence(6), input.clone(), &FMT).unwrap();
        assert_eq!(out, vec![input[0].clone()]);
        assert_eq!(total_duration(&out), 3);
    }

    #[test]
    fn removal_stops_once_under_target() {
        // mid = 3: drop 3 (12 -> 10) reaches the target, left untouched
        let input = frames(&[2, 2, 2, 2, 2, 2]);
        let out = reconcile_frames(&silence(10), input.clone(), &FMT).unwrap();
        assert_eq!(out.len(), 5);
        assert_eq!(&out[..3], &input[..3]);
        assert_eq!(&out[3..], &input[4..]);
    }

    #[test]
    fn removal_alternates_right_then_left() {
        let input = frames(&[1, 1, 1, 1, 1, 1, 1]);
        // mid = 4; right drops 4, left drops 3, right drops 5
        let out = reconcile_frames(&silence(4), input.clone(), &FMT).unwrap();
        assert_eq!(
            out,
            vec![
                input[0].clone(),
                input[1].clone(),
                input[2].clone(),
                input[6].clone()
            ]
        );
    }

    #[test]
    fn removal_never_drops_the_first_frame() {
        let input = frames(&[2, 5, 5, 5]);
        let out = reconcile_frames(&silence(2), input.clone(), &FMT).unwrap();
        assert_eq!(out, vec![input[0].clone()]);
    }

    #[test]
    fn removal_terminates_within_target_for_any_target() {
        let input = frames(&[3, 1, 4, 1, 5, 9, 2, 6]);
        let natural = total_duration(&input);
        for target in 3..=natural {
            let out = fit_silence(input.clone(), natural, target);
            assert!(total_duration(&out) <= target, "target {target}");
            assert_eq!(out[0], input[0]);
        }
    }

    #[test]
    fn short_target_is_clamped_to_one_period() {
        let out = reconcile_frames(&silence(1), frames(&[4, 4, 4]), &FMT).unwrap();
        assert_eq!(total_duration(&out), 4);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn empty_silence_becomes_one_zero_frame() {
        let out = reconcile_frames(&silence(7), Vec::new(), &FMT).unwrap();
        assert_eq!(out, vec![Datagram::zero(7)]);
    }

    #[test]
    fn speech_passes_through_after_scrubbing() {
        let input = frames(&[3, 0, 4, 0, 0, 5]);
        let out = reconcile_frames(&speech(1), input.clone(), &FMT).unwrap();
        assert_eq!(out, vec![input[0].clone(), input[2].clone(), input[5].clone()]);
    }

    #[test]
    fn scrubbing_counts_removed_frames() {
        let mut input = frames(&[0, 2, 0, 3]);
        assert_eq!(remove_zero_length(&mut input), 2);
        assert_eq!(durations(&input), vec![2, 3]);
    }

    #[test]
    fn record_duration_tracks_final_frames() {
        let mut data = UnitData::new(frames(&[3, 4]), None);
        reconcile_unit(&silence(12), &mut data, &FMT).unwrap();
        assert_eq!(data.unit_duration, 12);
        assert_eq!(data.frames.len(), 3);
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let units: Vec<SelectedUnit> = (0..16)
            .map(|i| if i % 2 == 0 { silence(i * 3 + 1) } else { speech(5) })
            .collect();
        let fresh = || -> Vec<UnitData> {
            (0..16)
                .map(|i| UnitData::new(frames(&[2, 0, 3, 4][..(i % 4) + 1]), None))
                .collect()
        };
        let mut seq = fresh();
        let mut par = fresh();
        reconcile_durations(&units, &mut seq, &FMT, false).unwrap();
        reconcile_durations(&units, &mut par, &FMT, true).unwrap();
        assert_eq!(seq, par);
    }

    #[test]
    fn non_finite_silence_target_is_rejected() {
        for seconds in [f32::INFINITY, f32::NEG_INFINITY, f32::NAN] {
            let pause = SelectedUnit::new(Unit::new(0, 0, 0), Target::silence(seconds));
            for input in [Vec::new(), frames(&[3, 4])] {
                let err = reconcile_frames(&pause, input, &FMT).unwrap_err();
                assert!(matches!(err, VoiceError::InvalidTarget(_)), "{seconds}: {err}");
            }
        }
    }

    #[test]
    fn oversized_silence_target_is_rejected() {
        let pause = SelectedUnit::new(Unit::new(0, 0, 0), Target::silence(1e30));
        let err = reconcile_frames(&pause, Vec::new(), &FMT).unwrap_err();
        assert!(matches!(err, VoiceError::InvalidTarget(_)));
    }

    #[test]
    fn speech_ignores_its_duration_target() {
        let talk = SelectedUnit::new(Unit::new(0, 0, 0), Target::speech("a", f32::NAN));
        let out = reconcile_frames(&talk, frames(&[3, 4]), &FMT).unwrap();
        assert_eq!(durations(&out), vec![3, 4]);
    }

    #[test]
    fn one_bad_target_fails_the_whole_utterance() {
        let units = vec![
            silence(5),
            speech(3),
            SelectedUnit::new(Unit::new(0, 0, 0), Target::silence(f32::INFINITY)),
        ];
        for parallel in [false, true] {
            let mut records: Vec<UnitData> =
                (0..3).map(|_| UnitData::new(frames(&[2, 2]), None)).collect();
            let err = reconcile_durations(&units, &mut records, &FMT, parallel).unwrap_err();
            assert!(matches!(err, VoiceError::InvalidTarget(_)));
        }
    }
}
