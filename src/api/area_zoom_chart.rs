use std::time::Duration;

use tracing::{debug, trace};

use crate::api::area_zoom_frame_builder::{AreaZoomStyle, build_area_zoom_frame};
use crate::api::{AreaZoomConfig, DataView, ObjectInstance, area_series};
use crate::core::viewport::wheel_zoom_factor;
use crate::core::{
    LocateMode, Margins, PlotArea, Sample, Viewport, ViewportState, XKind, ZoomTransform, locate,
};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{InteractionMode, InteractionState, TrackerSnap, TrackerState};
use crate::render::{RenderFrame, Renderer};

/// Plot inset inside the host viewport; axes and footer live in the margins.
pub const AREA_ZOOM_MARGINS: Margins = Margins::new(0.0, 60.0, 60.0, 0.0);

/// Step-after area chart with wheel/drag zoom and a debounced hover tracker.
///
/// Hosts feed data with [`update`](Self::update), forward pointer gestures in
/// viewport coordinates, and call [`advance_time`](Self::advance_time) with a
/// monotonic clock so debounced tracker lookups can commit.
pub struct AreaZoomChart<R: Renderer> {
    renderer: R,
    viewport: Viewport,
    config: AreaZoomConfig,
    samples: Vec<Sample>,
    x_kind: XKind,
    state: Option<ViewportState>,
    interaction: InteractionState,
}

impl<R: Renderer> AreaZoomChart<R> {
    pub fn new(renderer: R, viewport: Viewport) -> ChartResult<Self> {
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        Ok(Self {
            renderer,
            viewport,
            config: AreaZoomConfig::default(),
            samples: Vec::new(),
            x_kind: XKind::default(),
            state: None,
            interaction: InteractionState::default(),
        })
    }

    /// Replaces data, formatting and viewport, and resets zoom to the
    /// initial domain.
    pub fn update(&mut self, view: &DataView, viewport: Viewport) -> ChartResult<()> {
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        let config = AreaZoomConfig::from_properties(&view.objects)?;
        let data = area_series(view)?;

        self.viewport = viewport;
        self.config = config;
        self.samples = data.samples;
        self.x_kind = data.x_kind;
        self.interaction.on_pointer_leave();
        self.state = self.initial_state()?;

        debug!(
            samples = self.samples.len(),
            width = viewport.width,
            height = viewport.height,
            zoomable = self.state.is_some(),
            "area zoom chart updated"
        );
        Ok(())
    }

    fn initial_state(&self) -> ChartResult<Option<ViewportState>> {
        let plot = self.plot_area();
        if !plot.is_renderable() {
            debug!(
                plot_width = plot.width,
                plot_height = plot.height,
                "plot area too small, skipping layout"
            );
            return Ok(None);
        }
        let Some((data_min, data_max)) = self.data_extent() else {
            return Ok(None);
        };

        let (start, end) = self.config.initial_domain(data_min, data_max);
        let mut state = ViewportState::initialize(
            start,
            end,
            plot.width,
            self.x_kind,
            self.config.zoom_limits(),
        )?;
        state.fit_value_domain(&self.samples);
        Ok(Some(state))
    }

    #[must_use]
    pub fn plot_area(&self) -> PlotArea {
        self.viewport.plot_area(AREA_ZOOM_MARGINS)
    }

    /// `[min x, max x]` of the loaded samples.
    #[must_use]
    pub fn data_extent(&self) -> Option<(f64, f64)> {
        Some((self.samples.first()?.x, self.samples.last()?.x))
    }

    #[must_use]
    pub fn viewport_state(&self) -> Option<&ViewportState> {
        self.state.as_ref()
    }

    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    #[must_use]
    pub fn config(&self) -> &AreaZoomConfig {
        &self.config
    }

    #[must_use]
    pub fn tracker(&self) -> TrackerState {
        self.interaction.tracker()
    }

    pub fn set_locate_mode(&mut self, mode: LocateMode) {
        self.interaction.set_locate_mode(mode);
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Sets an absolute zoom transform (translate in plot pixels, scale factor).
    pub fn set_transform(&mut self, transform: ZoomTransform) {
        self.map_state(|state, samples| state.apply_zoom(transform, samples));
    }

    /// Zooms by `factor` around viewport x `anchor_x`.
    pub fn zoom(&mut self, factor: f64, anchor_x: f64) {
        let anchor_px = anchor_x - self.plot_area().left;
        self.map_state(|state, samples| state.zoom_about(factor, anchor_px, samples));
    }

    /// Starts a drag. Tracker lookups are suspended until [`pan_end`](Self::pan_end).
    pub fn pan_start(&mut self) {
        self.interaction.on_pan_start();
        trace!("pan started");
    }

    /// Drags the view by `delta_x` viewport pixels. Ignored outside a drag.
    pub fn pan_move(&mut self, delta_x: f64) {
        if self.interaction.mode() != InteractionMode::Panning {
            trace!(delta_x, "pan move outside a drag, ignoring");
            return;
        }
        self.map_state(|state, samples| state.pan_by(delta_x, samples));
    }

    pub fn pan_end(&mut self) {
        self.interaction.on_pan_end();
        trace!("pan ended");
    }

    #[must_use]
    pub fn mode(&self) -> InteractionMode {
        self.interaction.mode()
    }

    /// Applies a wheel step at viewport x `anchor_x`.
    pub fn wheel_zoom(&mut self, wheel_delta_y: f64, anchor_x: f64) -> ChartResult<()> {
        if let Some(factor) = wheel_zoom_factor(wheel_delta_y)? {
            self.zoom(factor, anchor_x);
        }
        Ok(())
    }

    /// Returns to the initial domain.
    pub fn reset_zoom(&mut self) {
        self.map_state(|state, samples| state.reset(samples));
    }

    fn map_state(&mut self, step: impl FnOnce(&ViewportState, &[Sample]) -> ViewportState) {
        let Some(state) = self.state.as_ref() else {
            trace!("no viewport state, ignoring gesture");
            return;
        };
        let next = step(state, &self.samples);
        self.state = Some(next);
        self.refresh_snap();
    }

    /// Records the pointer; the tracker lookup runs once the pointer rests.
    pub fn pointer_move(&mut self, now: Duration, x: f64, y: f64) {
        let plot = self.plot_area();
        self.interaction
            .on_pointer_move(now, x - plot.left, y - plot.top);
    }

    pub fn pointer_leave(&mut self) {
        self.interaction.on_pointer_leave();
    }

    /// Runs debounced work that is due at `now`. Returns `true` when the
    /// tracker changed.
    pub fn advance_time(&mut self, now: Duration) -> bool {
        let Some(lookup) = self.interaction.take_due_lookup(now) else {
            return false;
        };
        let Some(state) = self.state.as_ref() else {
            return false;
        };
        let previous = self.interaction.tracker().snap;
        let snap = locate(&self.samples, lookup.x, state, self.interaction.locate_mode())
            .and_then(|sample| self.snap_for(sample));
        self.interaction.set_snap(snap);
        trace!(
            pointer_x = lookup.x,
            sample_x = snap.map(|snap| snap.sample.x),
            "tracker lookup committed"
        );
        previous != snap
    }

    fn snap_for(&self, sample: Sample) -> Option<TrackerSnap> {
        let state = self.state.as_ref()?;
        let value_scale = state.value_scale(self.plot_area().height).ok()?;
        Some(TrackerSnap {
            sample,
            x: state.project(sample.x),
            y: value_scale.map(sample.y),
        })
    }

    fn refresh_snap(&mut self) {
        if let Some(snap) = self.interaction.tracker().snap {
            let refreshed = self.snap_for(snap.sample);
            self.interaction.set_snap(refreshed);
        }
    }

    /// Materializes the current scene. Empty when nothing can be drawn.
    pub fn build_frame(&self) -> ChartResult<RenderFrame> {
        let Some(state) = self.state.as_ref() else {
            return Ok(RenderFrame::new(self.viewport));
        };
        let style = AreaZoomStyle::from_config(&self.config)?;
        build_area_zoom_frame(
            self.viewport,
            self.plot_area(),
            state,
            &self.samples,
            &style,
            self.interaction.tracker(),
        )
    }

    pub fn render(&mut self) -> ChartResult<()> {
        if self.state.is_none() {
            debug!("nothing to draw, skipping render");
            return Ok(());
        }
        let frame = self.build_frame()?;
        self.renderer.render(&frame)
    }

    /// Current formatting values of `group` for the host's property pane.
    #[must_use]
    pub fn enumerate_object_instances(&self, group: &str) -> Vec<ObjectInstance> {
        self.config
            .object_instances(group, self.data_extent(), self.x_kind)
    }
}
