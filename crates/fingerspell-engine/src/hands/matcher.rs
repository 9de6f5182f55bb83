use std::collections::HashMap;
use serde::Deserialize;
use crate::input::frame::XrFrame;
use super::joint::Handedness;
use super::library::PoseLibrary;

/// Anything that can answer "is this hand currently making that pose?".
pub trait PoseSource {
    /// `debounce_ms` is a smoothing window: the pose counts if it was
    /// recognised at any point within the last `debounce_ms` milliseconds.
    fn is_pose(&self, hand: Handedness, pose: &str, debounce_ms: f32) -> bool;
}

/// Matcher tuning.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Largest library distance (mm) still accepted as a match.
    pub max_distance_mm: f32,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self { max_distance_mm: 120.0 }
    }
}

#[derive(Debug, Default)]
struct HandTrack {
    /// Library index and distance of this frame's best match.
    current: Option<(usize, f32)>,
    /// Last time (matcher clock, ms) each library pose was the accepted match.
    last_matched: HashMap<usize, f64>,
}

/// Classifies tracked hands against a `PoseLibrary`, one frame at a time.
#[derive(Debug, Default)]
pub struct PoseMatcher {
    library: PoseLibrary,
    config: MatcherConfig,
    now_ms: f64,
    tracks: [HandTrack; 2],
}

impl PoseMatcher {
    pub fn new(library: PoseLibrary, config: MatcherConfig) -> Self {
        Self {
            library,
            config,
            now_ms: 0.0,
            tracks: Default::default(),
        }
    }

    /// Swap in a new library; match history refers to old indices and is dropped.
    pub fn set_library(&mut self, library: PoseLibrary) {
        log::info!("pose library loaded: {} poses", library.len());
        self.library = library;
        self.tracks = Default::default();
    }

    pub fn library(&self) -> &PoseLibrary {
        &self.library
    }

    pub fn set_config(&mut self, config: MatcherConfig) {
        self.config = config;
    }

    /// Advance the matcher clock by `dt` seconds and classify both hands.
    pub fn update(&mut self, frame: &XrFrame, dt: f32) {
        self.now_ms += dt as f64 * 1000.0;

        for hand in Handedness::BOTH {
            let best = frame.hand(hand).and_then(|skeleton| {
                let joints = skeleton.wrist_relative_mm();
                self.library
                    .poses_for(hand)
                    .map(|(idx, pose)| (idx, pose.distance(&joints)))
                    .filter(|&(_, d)| d <= self.config.max_distance_mm)
                    .min_by(|a, b| a.1.total_cmp(&b.1))
            });

            let track = &mut self.tracks[hand.index()];
            if let Some((idx, _)) = best {
                let changed = track.current.map(|(prev, _)| prev) != Some(idx);
                if changed {
                    if let Some(pose) = self.library.get(idx) {
                        log::debug!("{} hand pose: {}", hand.as_str(), pose.name());
                    }
                }
                track.last_matched.insert(idx, self.now_ms);
            }
            track.current = best;
        }
    }

    /// Name of the pose the hand matches this frame.
    pub fn current_pose(&self, hand: Handedness) -> Option<&str> {
        let (idx, _) = self.tracks[hand.index()].current?;
        self.library.get(idx).map(|p| p.name())
    }

    /// Distance to the best match this frame, in millimetres.
    pub fn current_distance(&self, hand: Handedness) -> Option<f32> {
        self.tracks[hand.index()].current.map(|(_, d)| d)
    }
}

impl PoseSource for PoseMatcher {
    fn is_pose(&self, hand: Handedness, pose: &str, debounce_ms: f32) -> bool {
        // A name may have several recordings; the latest match of any counts.
        let track = &self.tracks[hand.index()];
        self.library
            .poses_named(hand, pose)
            .filter_map(|(idx, _)| track.last_matched.get(&idx).copied())
            .max_by(f64::total_cmp)
            .is_some_and(|at| self.now_ms - at <= debounce_ms.max(0.0) as f64)
    }
}
