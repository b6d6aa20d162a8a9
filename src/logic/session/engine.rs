//! Detection Session - the per-tick control loop
//!
//! Drives the belief engine on a fixed cadence: pulls one frame, asks the
//! external detector for observations, filters by threshold, recomputes
//! beliefs per observation, appends winners to the history ledger, and
//! diffs the resulting detection set against the previously displayed
//! overlay set.
//!
//! ## Tick overlap
//! All pipeline work runs inside the single spawned loop task and the
//! detector call is awaited inline, so ticks are strictly serialized. A
//! slow detector delays the next tick (`MissedTickBehavior::Delay`); two
//! ticks can never mutate the belief maps or the tracked set concurrently.
//!
//! ## Cancellation
//! `stop()` flips the running flag and aborts the loop task. The flag is
//! re-checked after the detector await and once more under the tracked-set
//! lock before the overlay diff is applied, so an in-flight call that
//! completes after `stop()` discards its results instead of applying them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use uuid::Uuid;

use crate::constants::INITIAL_LIKELIHOOD;
use crate::logic::catalog::EquipmentCatalog;
use crate::logic::recognizer::belief::BeliefEngine;
use crate::logic::recognizer::history::HistoryLedger;
use crate::logic::recognizer::types::DetectionStatistics;
use super::collaborators::{Camera, Detector, InfoSink, OverlaySink, VoiceSink};
use super::types::{Observation, OverlayDetection, SessionConfig, SessionState, TrackedDetection};

// ============================================================================
// SHARED STATE
// ============================================================================

struct SessionShared {
    session_id: Uuid,
    running: AtomicBool,
    config: RwLock<SessionConfig>,
    catalog: RwLock<EquipmentCatalog>,
    engine: Mutex<BeliefEngine>,
    ledger: Mutex<HistoryLedger>,
    /// Detections from the previous tick, in batch order. The first entry
    /// is the one surfaced to the info sink.
    tracked: Mutex<Vec<TrackedDetection>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

// ============================================================================
// SESSION
// ============================================================================

pub struct DetectionSession<C, D, O, I, V> {
    camera: Arc<AsyncMutex<C>>,
    detector: Arc<AsyncMutex<D>>,
    overlay: Arc<O>,
    info: Arc<I>,
    voice: Arc<V>,
    shared: Arc<SessionShared>,
}

impl<C, D, O, I, V> Clone for DetectionSession<C, D, O, I, V> {
    fn clone(&self) -> Self {
        Self {
            camera: self.camera.clone(),
            detector: self.detector.clone(),
            overlay: self.overlay.clone(),
            info: self.info.clone(),
            voice: self.voice.clone(),
            shared: self.shared.clone(),
        }
    }
}

impl<C, D, O, I, V> DetectionSession<C, D, O, I, V>
where
    C: Camera + Send + 'static,
    D: Detector + Send + 'static,
    O: OverlaySink + Send + Sync + 'static,
    I: InfoSink + Send + Sync + 'static,
    V: VoiceSink + Send + Sync + 'static,
{
    pub fn new(
        camera: C,
        detector: D,
        overlay: Arc<O>,
        info: Arc<I>,
        voice: Arc<V>,
        catalog: EquipmentCatalog,
        config: SessionConfig,
    ) -> Self {
        let mut engine = BeliefEngine::new();
        let identities = catalog.identities();
        engine.initialize_uniform_priors(&identities);
        for identity in &identities {
            engine.set_likelihood(identity, INITIAL_LIKELIHOOD);
        }

        Self {
            camera: Arc::new(AsyncMutex::new(camera)),
            detector: Arc::new(AsyncMutex::new(detector)),
            overlay,
            info,
            voice,
            shared: Arc::new(SessionShared {
                session_id: Uuid::new_v4(),
                running: AtomicBool::new(false),
                config: RwLock::new(config),
                catalog: RwLock::new(catalog),
                engine: Mutex::new(engine),
                ledger: Mutex::new(HistoryLedger::default()),
                tracked: Mutex::new(Vec::new()),
                task: Mutex::new(None),
            }),
        }
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Begin the periodic detection loop. No-op when already running.
    pub fn start(&self) {
        if self.shared.running.swap(true, Ordering::SeqCst) {
            log::debug!("start() ignored: session already running");
            return;
        }

        log::info!(
            "Detection session {} starting (interval {:?})",
            self.shared.session_id,
            self.shared.config.read().interval
        );

        self.overlay.set_animating(true);
        self.voice.announce("AR system started. Initializing detection.");

        let session = self.clone();
        let handle = tokio::spawn(async move { session.run_loop().await });
        *self.shared.task.lock() = Some(handle);
    }

    /// Cancel the loop, clear all tracked detections and their visual
    /// representation, and announce. Idempotent: a second call is a no-op.
    pub fn stop(&self) {
        if !self.shared.running.swap(false, Ordering::SeqCst) {
            log::debug!("stop() ignored: session already idle");
            return;
        }

        if let Some(handle) = self.shared.task.lock().take() {
            handle.abort();
        }

        self.overlay.set_animating(false);
        self.clear_detections();
        self.overlay.clear_all();
        self.voice.announce("AR system stopped");

        log::info!("Detection session {} stopped", self.shared.session_id);
    }

    pub fn state(&self) -> SessionState {
        if self.shared.running.load(Ordering::SeqCst) {
            SessionState::Running
        } else {
            SessionState::Idle
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.shared.session_id
    }

    fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    // ------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------

    /// Set the minimum confidence for observations. Values outside [0, 1]
    /// are rejected. Takes effect on the next tick.
    pub fn set_detection_threshold(&self, threshold: f32) {
        if (0.0..=1.0).contains(&threshold) {
            self.shared.config.write().detection_threshold = threshold;
            log::info!("Detection threshold set to {:.2}", threshold);
        } else {
            log::debug!("Rejected detection threshold {} (outside [0,1])", threshold);
        }
    }

    /// Change the tick cadence. Takes effect after the current sleep.
    pub fn set_interval(&self, interval: std::time::Duration) {
        self.shared.config.write().interval = interval;
    }

    /// Replace the identity catalog. Priors are re-initialized uniformly
    /// over the new identities; takes effect on the next tick.
    pub fn set_catalog(&self, catalog: EquipmentCatalog) {
        let identities = catalog.identities();
        {
            let mut engine = self.shared.engine.lock();
            engine.reset();
            engine.initialize_uniform_priors(&identities);
            for identity in &identities {
                engine.set_likelihood(identity, INITIAL_LIKELIHOOD);
            }
        }
        *self.shared.catalog.write() = catalog;
        log::info!("Equipment catalog replaced: {} identities", identities.len());
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Detections from the most recent tick, in batch order.
    pub fn tracked_detections(&self) -> Vec<TrackedDetection> {
        self.shared.tracked.lock().clone()
    }

    /// Read-only snapshot of ledger state plus current posteriors.
    ///
    /// Lock order matches the tick pipeline (engine before ledger), and the
    /// engine guard is released before the ledger is taken, so this is safe
    /// to call from any thread while the session is Running.
    pub fn statistics(&self) -> DetectionStatistics {
        let posteriors = self.shared.engine.lock().posteriors();
        let ledger = self.shared.ledger.lock();
        DetectionStatistics {
            total_detections: ledger.len(),
            unique_equipment: ledger.unique_identities(),
            most_likely: ledger.most_likely(),
            posteriors,
        }
    }

    // ------------------------------------------------------------------
    // Clearing
    // ------------------------------------------------------------------

    /// Drop every tracked detection: each id is removed from the overlay,
    /// then the sink and info display are wiped.
    pub fn clear_detections(&self) {
        let previous: Vec<TrackedDetection> = {
            let mut tracked = self.shared.tracked.lock();
            std::mem::take(&mut *tracked)
        };

        for detection in &previous {
            self.overlay.remove_detection(&detection.id);
        }
        self.info.clear();

        if !previous.is_empty() {
            log::debug!("Cleared {} tracked detections", previous.len());
        }
    }

    /// Empty the history ledger and stored posteriors. Priors and
    /// likelihoods keep their values. Engine-before-ledger, same order as
    /// the tick pipeline; each guard is a dropped temporary.
    pub fn clear_history(&self) {
        self.shared.engine.lock().clear_posteriors();
        self.shared.ledger.lock().clear();
    }

    // ------------------------------------------------------------------
    // Tick pipeline
    // ------------------------------------------------------------------

    async fn run_loop(&self) {
        let mut period = self.shared.config.read().interval;
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if !self.is_running() {
                break;
            }
            self.run_tick().await;
            if !self.is_running() {
                break;
            }

            let wanted = self.shared.config.read().interval;
            if wanted != period {
                period = wanted;
                ticker = interval_at(Instant::now() + period, period);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                log::info!("Detection interval changed to {:?}", period);
            }
        }

        log::debug!("Detection loop exited");
    }

    /// One pass of the detection pipeline.
    async fn run_tick(&self) {
        let frame = self.camera.lock().await.capture_frame();

        let observations = match self.detector.lock().await.detect(&frame).await {
            Ok(observations) => observations,
            Err(e) => {
                log::warn!("Detection failed on frame {}: {}", frame.id, e);
                Vec::new()
            }
        };

        // A stop() racing the in-flight detector call wins: discard results.
        if !self.is_running() {
            log::debug!("Discarding results for frame {}: session stopped", frame.id);
            return;
        }

        let threshold = self.shared.config.read().detection_threshold;
        let surviving: Vec<Observation> = observations
            .into_iter()
            .filter(|o| o.confidence >= threshold)
            .collect();

        if surviving.is_empty() {
            if !self.shared.tracked.lock().is_empty() {
                self.clear_detections();
            }
            return;
        }

        let candidates = self.shared.catalog.read().identities();
        let mut new_detections: Vec<TrackedDetection> = Vec::with_capacity(surviving.len());

        {
            let mut engine = self.shared.engine.lock();
            let mut ledger = self.shared.ledger.lock();

            for (index, observation) in surviving.iter().enumerate() {
                let id = format!("det_{}_{}", index, observation.label);

                let beliefs =
                    engine.update_belief(&observation.label, observation.confidence, &candidates);
                let (equipment, posterior) = beliefs
                    .first()
                    .map(|b| (b.identity.clone(), b.posterior))
                    .unwrap_or_else(|| ("unknown".to_string(), 0.0));

                ledger.add(&equipment, observation.confidence * posterior);

                new_detections.push(TrackedDetection {
                    id,
                    bbox: observation.bbox,
                    detected_class: observation.label.clone(),
                    class_confidence: observation.confidence,
                    equipment,
                    equipment_confidence: posterior,
                    beliefs,
                });
            }
        }

        self.apply_overlay_diff(new_detections);
    }

    /// Reconcile the new detection set with the previously displayed one.
    /// Ids present in both sets are left untouched; the whole tracked set
    /// is replaced afterwards.
    fn apply_overlay_diff(&self, new_detections: Vec<TrackedDetection>) {
        let mut tracked = self.shared.tracked.lock();

        // stop() flips the running flag before it takes this lock to clear
        // the overlay. A tick that loses that race must not repopulate the
        // overlay or the tracked set after the wipe.
        if !self.is_running() {
            log::debug!("Discarding overlay diff: session stopped");
            return;
        }

        for old in tracked.iter() {
            if !new_detections.iter().any(|d| d.id == old.id) {
                self.overlay.remove_detection(&old.id);
            }
        }

        for new in &new_detections {
            if !tracked.iter().any(|d| d.id == new.id) {
                self.overlay.add_detection(
                    &new.id,
                    OverlayDetection {
                        bbox: new.bbox,
                        identity: new.equipment.clone(),
                        score: new.equipment_confidence,
                    },
                );
            }
        }

        *tracked = new_detections;

        if let Some(top) = tracked.first() {
            if let Some(info) = self.shared.catalog.read().get(&top.equipment) {
                self.info.show_equipment(top, info);
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
