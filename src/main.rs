//! AR Lab Core - Headless demo entry point
//!
//! Wires the detection session to a scripted detector and console sinks so
//! the belief-fusion pipeline can be exercised without a camera, a real
//! classifier, or any UI.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use ar_lab_core::constants;
use ar_lab_core::logic::catalog::{EquipmentCatalog, EquipmentInfo};
use ar_lab_core::logic::session::collaborators::{
    Camera, Detector, DetectorError, Frame, InfoSink, OverlaySink, VoiceSink,
};
use ar_lab_core::logic::session::types::{
    BoundingBox, Observation, OverlayDetection, SessionConfig, TrackedDetection,
};
use ar_lab_core::DetectionSession;

// ============================================================================
// DEMO COLLABORATORS
// ============================================================================

struct DemoCamera {
    frames: u64,
}

impl Camera for DemoCamera {
    fn capture_frame(&mut self) -> Frame {
        self.frames += 1;
        Frame {
            id: self.frames,
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Cycles through generic classifier labels with jittered confidence,
/// standing in for a real object-classifier backend.
struct DemoDetector {
    script: Vec<&'static str>,
    cursor: usize,
}

#[async_trait]
impl Detector for DemoDetector {
    async fn detect(&mut self, frame: &Frame) -> Result<Vec<Observation>, DetectorError> {
        // Model inference latency
        tokio::time::sleep(Duration::from_millis(30)).await;

        let label = self.script[self.cursor % self.script.len()];
        self.cursor += 1;

        if label.is_empty() {
            return Ok(Vec::new());
        }

        let mut rng = rand::thread_rng();
        let confidence: f32 = rng.gen_range(0.45..0.95);
        log::debug!("Frame {}: '{}' at {:.2}", frame.id, label, confidence);

        Ok(vec![Observation {
            label: label.to_string(),
            confidence,
            bbox: BoundingBox {
                x: 120.0,
                y: 80.0,
                width: 160.0,
                height: 200.0,
            },
        }])
    }
}

struct ConsoleOverlay;

impl OverlaySink for ConsoleOverlay {
    fn add_detection(&self, id: &str, overlay: OverlayDetection) {
        log::info!(
            "[overlay] + {} -> {} ({:.1}%)",
            id,
            overlay.identity,
            overlay.score * 100.0
        );
    }
    fn remove_detection(&self, id: &str) {
        log::info!("[overlay] - {}", id);
    }
    fn clear_all(&self) {
        log::info!("[overlay] cleared");
    }
    fn set_animating(&self, animating: bool) {
        log::info!("[overlay] animation {}", if animating { "on" } else { "off" });
    }
}

struct ConsoleInfo;

impl InfoSink for ConsoleInfo {
    fn show_equipment(&self, detection: &TrackedDetection, info: &EquipmentInfo) {
        log::info!(
            "[info] {} ({:.1}%) - {}",
            info.name,
            detection.equipment_confidence * 100.0,
            info.description
        );
        for warning in &info.safety_warnings {
            log::info!("[info]   ! {}", warning);
        }
    }
    fn clear(&self) {
        log::info!("[info] no equipment detected");
    }
}

struct ConsoleVoice;

impl VoiceSink for ConsoleVoice {
    fn announce(&self, text: &str) {
        log::info!("[voice] {}", text);
    }
}

// ============================================================================
// MAIN
// ============================================================================

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!(
        "Starting {} v{} (headless demo)...",
        constants::APP_NAME,
        constants::APP_VERSION
    );

    let catalog = EquipmentCatalog::builtin();
    log::info!("Equipment catalog loaded: {} identities", catalog.len());

    let session = DetectionSession::new(
        DemoCamera { frames: 0 },
        DemoDetector {
            // Empty slots model ticks where nothing is in view
            script: vec!["cup", "cup", "bottle", "", "glass beaker", "cup", ""],
            cursor: 0,
        },
        Arc::new(ConsoleOverlay),
        Arc::new(ConsoleInfo),
        Arc::new(ConsoleVoice),
        catalog,
        SessionConfig {
            interval: Duration::from_millis(constants::get_detection_interval_ms()),
            detection_threshold: constants::get_detection_threshold(),
        },
    );

    session.start();
    tokio::time::sleep(Duration::from_secs(3)).await;

    // Tighten the cadence mid-session; takes effect on the next tick
    session.set_interval(Duration::from_millis(250));
    tokio::time::sleep(Duration::from_secs(2)).await;

    session.stop();

    let stats = session.statistics();
    log::info!(
        "Session summary: {} detections, {} unique, most likely: {} (score {:.2})",
        stats.total_detections,
        stats.unique_equipment,
        stats.most_likely.identity.as_deref().unwrap_or("none"),
        stats.most_likely.score
    );
}
