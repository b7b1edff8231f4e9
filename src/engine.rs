//! SpatEngine and SpatRenderer: the control and audio halves of the dispatcher

use crate::{Error, Result};
use parking_lot::Mutex;
use spatium_core::{
    Dimension, FieldSettings, GainSmoother, GainVector, SnapshotCell, SourceState, SpatConfig,
    SpeakerSetup,
};
use spatium_dsp::{DistanceResponse, SpatMode, Spatializer, Triplet};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Control-context state. Only touched by layout edits and mode switches.
#[derive(Debug)]
struct ControlState {
    config: SpatConfig,
    mode: SpatMode,
    dimension: Option<Dimension>,
    /// Layout behind the published snapshot; cleared by a mode switch.
    layout: Option<SpeakerSetup>,
}

/// Control-context half of the panning engine.
///
/// Owns the active mode and layout, builds [`Spatializer`] snapshots and
/// publishes them to every [`SpatRenderer`] created from it. A layout that
/// cannot be analyzed is refused and the previous snapshot stays in force.
///
/// # Example
///
/// ```
/// use spatium::prelude::*;
///
/// let engine = SpatEngine::builder().max_outputs(8).build()?;
/// let mut renderer = engine.renderer();
///
/// engine.set_layout(SpeakerSetup::from_angles(&[
///     (1, 45.0, 0.0),
///     (2, -45.0, 0.0),
///     (3, 135.0, 0.0),
///     (4, -135.0, 0.0),
/// ])?)?;
///
/// let gains = renderer.compute_gains(&SourceState::new(45.0, 0.0));
/// assert!((gains.as_slice()[0] - 1.0).abs() < 1e-4);
/// # Ok::<(), spatium::Error>(())
/// ```
#[derive(Debug)]
pub struct SpatEngine {
    shared: Arc<SnapshotCell<Spatializer>>,
    state: Mutex<ControlState>,
}

impl SpatEngine {
    /// Create a new engine builder
    pub fn builder() -> crate::SpatEngineBuilder {
        crate::SpatEngineBuilder::default()
    }

    pub(crate) fn from_parts(
        config: SpatConfig,
        mode: SpatMode,
        dimension: Option<Dimension>,
    ) -> Self {
        Self {
            shared: Arc::new(SnapshotCell::new(Spatializer::Pending(mode))),
            state: Mutex::new(ControlState {
                config,
                mode,
                dimension,
                layout: None,
            }),
        }
    }

    /// Switch rendering mode.
    ///
    /// The previous covering set and field layout are discarded: sources
    /// render silence until [`set_layout`](Self::set_layout) supplies a
    /// layout for the new mode. Selecting the active mode again is a no-op.
    pub fn set_mode(&self, mode: SpatMode) -> u64 {
        let mut state = self.state.lock();
        if state.mode == mode {
            debug!("Mode {:?} already active", mode);
            return self.shared.version();
        }
        state.mode = mode;
        state.layout = None;
        let version = self.shared.publish(Spatializer::Pending(mode));
        info!("Switched to {:?} mode (version {}), waiting for a layout", mode, version);
        version
    }

    /// Analyze `setup` for the active mode and publish the result.
    ///
    /// Returns the published snapshot version. On failure nothing is
    /// published and the previous layout keeps rendering.
    pub fn set_layout(&self, setup: SpeakerSetup) -> Result<u64> {
        let mut state = self.state.lock();
        let version = self.publish(&state, &setup)?;
        state.layout = Some(setup);
        Ok(version)
    }

    /// Force pairs or triplets for vector-base mode (`None` detects from the
    /// layout). Re-analyzes the current layout if there is one.
    pub fn set_dimension(&self, dimension: Option<Dimension>) -> Result<()> {
        let mut state = self.state.lock();
        let previous = state.dimension;
        state.dimension = dimension;
        if let Some(layout) = state.layout.clone() {
            if let Err(e) = self.publish(&state, &layout) {
                state.dimension = previous;
                return Err(e);
            }
        }
        Ok(())
    }

    /// Replace the field-panning parameters. Re-analyzes the current layout
    /// if there is one.
    pub fn set_field_settings(&self, field: FieldSettings) -> Result<()> {
        field.validate()?;
        let mut state = self.state.lock();
        let previous = std::mem::replace(&mut state.config.field, field);
        if let Some(layout) = state.layout.clone() {
            if let Err(e) = self.publish(&state, &layout) {
                state.config.field = previous;
                return Err(e);
            }
        }
        Ok(())
    }

    /// Rebuild and republish the current layout.
    ///
    /// Fails with [`NoLayout`](spatium_dsp::Error::NoLayout) when no layout
    /// was supplied since the last mode switch.
    pub fn rebuild(&self) -> Result<u64> {
        let state = self.state.lock();
        let layout = state.layout.as_ref().ok_or(spatium_dsp::Error::NoLayout)?;
        self.publish(&state, layout)
    }

    fn publish(&self, state: &ControlState, setup: &SpeakerSetup) -> Result<u64> {
        let spatializer = Spatializer::build(state.mode, setup, state.dimension, &state.config)
            .map_err(|e| {
                warn!("Refused {:?} layout of {} speakers: {}", state.mode, setup.len(), e);
                Error::from(e)
            })?;

        let elements = spatializer.covering_set().map_or(0, |set| set.len());
        let field_speakers = spatializer
            .field_layout()
            .map_or(0, |layout| layout.speakers().len());
        let version = self.shared.publish(spatializer);
        info!(
            "Published {:?} layout: {} speakers, {} covering elements, {} field speakers (version {})",
            state.mode,
            setup.len(),
            elements,
            field_speakers,
            version
        );
        Ok(version)
    }

    /// Audio-context handle reading this engine's snapshots.
    ///
    /// Buffers are sized here, so create renderers on the control context.
    pub fn renderer(&self) -> SpatRenderer {
        let state = self.state.lock();
        SpatRenderer::new(
            Arc::clone(&self.shared),
            state.config.max_outputs,
            state.config.gain_interpolation,
        )
    }

    pub fn mode(&self) -> SpatMode {
        self.state.lock().mode
    }

    pub fn dimension(&self) -> Option<Dimension> {
        self.state.lock().dimension
    }

    pub fn config(&self) -> SpatConfig {
        self.state.lock().config.clone()
    }

    /// Layout behind the current snapshot, if any.
    pub fn layout(&self) -> Option<SpeakerSetup> {
        self.state.lock().layout.clone()
    }

    /// Number of snapshots published so far.
    pub fn version(&self) -> u64 {
        self.shared.version()
    }

    /// Currently published snapshot.
    pub fn snapshot(&self) -> Arc<Spatializer> {
        self.shared.load_full()
    }

    /// `true` once the active mode has a layout.
    pub fn is_ready(&self) -> bool {
        self.shared.load().is_ready()
    }

    /// Covering elements for on-screen display; empty when the active mode
    /// has none.
    pub fn triplets(&self) -> Vec<Triplet> {
        self.shared.load().triplets()
    }

    pub fn has_triplets(&self) -> bool {
        self.shared.load().has_triplets()
    }
}

/// Audio-context half of the panning engine.
///
/// Reads the latest published snapshot each call and writes into buffers
/// it owns. Never locks or allocates, and never fails.
///
/// A snapshot is released on the control thread as long as at most one
/// publish lands while a single call is running. If two publishes overtake
/// one call, that call frees the oldest snapshot when it returns.
#[derive(Debug)]
pub struct SpatRenderer {
    shared: Arc<SnapshotCell<Spatializer>>,
    scratch: GainVector,
    gains: GainVector,
    response: DistanceResponse,
    seen_version: u64,
    interpolation: f32,
}

impl SpatRenderer {
    fn new(shared: Arc<SnapshotCell<Spatializer>>, outputs: usize, interpolation: f32) -> Self {
        let seen_version = shared.version();
        Self {
            shared,
            scratch: GainVector::new(outputs),
            gains: GainVector::new(outputs),
            response: DistanceResponse::UNITY,
            seen_version,
            interpolation,
        }
    }

    /// Gains for `source` against the latest snapshot.
    pub fn compute_gains(&mut self, source: &SourceState) -> &GainVector {
        let snapshot = self.shared.load();
        self.response = snapshot.compute(source, &mut self.scratch, &mut self.gains);
        &self.gains
    }

    /// Like [`compute_gains`](Self::compute_gains), copying into `out`.
    pub fn compute_into(&mut self, source: &SourceState, out: &mut GainVector) -> DistanceResponse {
        self.compute_gains(source);
        out.copy_from(&self.gains);
        self.response
    }

    /// Compute gains and step `smoother` toward them.
    pub fn render<'a>(
        &mut self,
        source: &SourceState,
        smoother: &'a mut GainSmoother,
    ) -> &'a GainVector {
        self.compute_gains(source);
        smoother.process(&self.gains)
    }

    /// Distance response of the last computed source.
    #[inline]
    pub fn response(&self) -> DistanceResponse {
        self.response
    }

    /// Smoother sized and tuned for this renderer, one per source.
    pub fn smoother(&self) -> GainSmoother {
        GainSmoother::new(self.gains.len(), self.interpolation)
    }

    #[inline]
    pub fn outputs(&self) -> usize {
        self.gains.len()
    }

    pub fn mode(&self) -> SpatMode {
        self.shared.load().mode()
    }

    /// `true` once per publish since the previous call.
    pub fn layout_changed(&mut self) -> bool {
        let version = self.shared.version();
        let changed = version != self.seen_version;
        self.seen_version = version;
        changed
    }
}
