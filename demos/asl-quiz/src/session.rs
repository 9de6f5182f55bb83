use fingerspell_engine::XrMode;
use url::Url;

/// How the page should offer the experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPlan {
    Ar,
    Vr,
    /// No immersive mode: offer a link that opens the page on a headset.
    WebLaunch,
}

impl SessionPlan {
    /// Prefer AR, then VR.
    pub fn choose(ar_supported: bool, vr_supported: bool) -> Self {
        if ar_supported {
            SessionPlan::Ar
        } else if vr_supported {
            SessionPlan::Vr
        } else {
            SessionPlan::WebLaunch
        }
    }

    pub fn code(self) -> u32 {
        match self {
            SessionPlan::Ar => 0,
            SessionPlan::Vr => 1,
            SessionPlan::WebLaunch => 2,
        }
    }
}

const AR_FEATURES: [&str; 6] = [
    "anchors",
    "plane-detection",
    "hit-test",
    "mesh-detection",
    "hand-tracking",
    "local-floor",
];
const VR_FEATURES: [&str; 1] = ["hand-tracking"];

/// Required session features for a mode.
pub fn features(mode: XrMode) -> &'static [&'static str] {
    match mode {
        XrMode::Ar => &AR_FEATURES,
        XrMode::Vr => &VR_FEATURES,
    }
}

const WEB_LAUNCH_BASE: &str = "https://www.oculus.com/open_url/";

/// Headset launch link for `page`.
pub fn web_launch_url(page: &str) -> Result<Url, url::ParseError> {
    Url::parse_with_params(WEB_LAUNCH_BASE, &[("url", page)])
}

/// One-shot requests to the host, due some time after an AR session starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionRequest {
    RestoreAnchors,
    RoomCapture,
}

/// Clock for the delayed AR session requests.
#[derive(Debug, Default)]
pub struct SessionTimers {
    elapsed: f32,
    planes: u32,
    restore_at: Option<f32>,
    capture_at: Option<f32>,
}

impl SessionTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the timers. VR sessions have neither anchors nor planes.
    pub fn start(&mut self, mode: XrMode, restore_delay: f32, capture_delay: f32) {
        *self = Self::default();
        if mode == XrMode::Ar {
            self.restore_at = Some(restore_delay);
            self.capture_at = Some(capture_delay);
        }
    }

    pub fn stop(&mut self) {
        *self = Self::default();
    }

    pub fn planes_detected(&mut self, count: u32) {
        self.planes = count;
    }

    /// Advance by `dt` seconds; returns the requests that fell due.
    pub fn tick(&mut self, dt: f32) -> Vec<SessionRequest> {
        self.elapsed += dt.max(0.0);
        let mut due = Vec::new();

        if self.restore_at.is_some_and(|at| self.elapsed >= at) {
            self.restore_at = None;
            due.push(SessionRequest::RestoreAnchors);
        }
        if self.capture_at.is_some_and(|at| self.elapsed >= at) {
            self.capture_at = None;
            if self.planes == 0 {
                due.push(SessionRequest::RoomCapture);
            } else {
                log::debug!("{} planes known, skipping room capture", self.planes);
            }
        }
        due
    }
}
