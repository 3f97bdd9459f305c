//! Actions placed on tiles.
//!
//! Only the payload shape is checked here. Whether a known action carries the fields it needs is
//! decided when the actions are indexed, see [`crate::timeline::event_index`].

use serde::Deserialize;

/// An action on a floor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Action {
    /// Floor of the action. Floor 0 is the start tile; floor `n` is the `n - 1`th entry of the
    /// tile list.
    pub floor: usize,
    /// Kind and payload of the action.
    #[serde(flatten)]
    pub kind: ActionKind,
}

/// Kind of an [`Action`], tagged by `eventType`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "eventType")]
pub enum ActionKind {
    /// Changes the speed of the planets.
    SetSpeed {
        /// `"Bpm"` or `"Multiplier"`. Older charts omit it and always use `beatsPerMinute`.
        #[serde(rename = "speedType", default)]
        speed_type: Option<String>,
        /// New BPM, used unless `speed_type` is `"Multiplier"`.
        #[serde(rename = "beatsPerMinute", default)]
        beats_per_minute: Option<f64>,
        /// Factor relative to the current BPM, used when `speed_type` is `"Multiplier"`.
        #[serde(rename = "bpmMultiplier", default)]
        bpm_multiplier: Option<f64>,
    },
    /// Reverses the rotation direction.
    Twirl,
    /// Holds the planet for extra beats.
    Pause {
        /// Extra beats.
        #[serde(default)]
        duration: Option<f64>,
    },
    /// Changes the number of planets.
    MultiPlanet {
        /// `"TwoPlanets"` or `"ThreePlanets"`.
        #[serde(default)]
        planets: Option<String>,
    },
    /// Any other action, such as decorations and camera movement.
    #[serde(other)]
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_known_and_unknown_actions() {
        let actions: Vec<Action> = serde_json::from_str(
            r#"[
                {"floor": 3, "eventType": "SetSpeed", "speedType": "Multiplier", "beatsPerMinute": 100, "bpmMultiplier": 2},
                {"floor": 4, "eventType": "Twirl"},
                {"floor": 5, "eventType": "Pause", "duration": 1.5, "countdownTicks": 0},
                {"floor": 6, "eventType": "MultiPlanet", "planets": "ThreePlanets"},
                {"floor": 7, "eventType": "MoveCamera", "duration": 1, "relativeTo": "Player"}
            ]"#,
        )
        .unwrap();
        assert_eq!(
            actions,
            vec![
                Action {
                    floor: 3,
                    kind: ActionKind::SetSpeed {
                        speed_type: Some("Multiplier".into()),
                        beats_per_minute: Some(100.0),
                        bpm_multiplier: Some(2.0),
                    },
                },
                Action {
                    floor: 4,
                    kind: ActionKind::Twirl,
                },
                Action {
                    floor: 5,
                    kind: ActionKind::Pause {
                        duration: Some(1.5)
                    },
                },
                Action {
                    floor: 6,
                    kind: ActionKind::MultiPlanet {
                        planets: Some("ThreePlanets".into())
                    },
                },
                Action {
                    floor: 7,
                    kind: ActionKind::Other,
                },
            ]
        );
    }
}
