//! Prosodic targets predicted for each output position.

use serde::{Deserialize, Serialize};

/// What the prosody model wants a unit to sound like.
///
/// Only the duration and the silence flag drive concatenation; `f0` is
/// carried for callers that log or post-process pitch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    /// Phone or half-phone label, used in log output.
    pub label: String,
    /// Desired duration in seconds.
    pub duration_seconds: f32,
    /// Pauses may be stretched or shortened freely.
    #[serde(default)]
    pub is_silence: bool,
    /// Predicted fundamental frequency in Hz.
    #[serde(default)]
    pub f0: Option<f32>,
}

impl Target {
    /// A voiced or unvoiced speech target.
    pub fn speech(label: impl Into<String>, duration_seconds: f32) -> Self {
        Self {
            label: label.into(),
            duration_seconds,
            is_silence: false,
            f0: None,
        }
    }

    /// A pause target.
    pub fn silence(duration_seconds: f32) -> Self {
        Self {
            label: "_".to_string(),
            duration_seconds,
            is_silence: true,
            f0: None,
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_with_defaults() {
        let t: Target =
            serde_json::from_str(r#"{"label":"a","duration_seconds":0.08}"#).expect("valid json");
        assert_eq!(t, Target::speech("a", 0.08));
    }

    #[test]
    fn silence_constructor_sets_flag() {
        let t = Target::silence(0.2);
        assert!(t.is_silence);
        assert_eq!(t.f0, None);
    }
}
