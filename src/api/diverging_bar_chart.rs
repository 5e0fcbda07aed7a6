use std::time::Duration;

use tracing::{debug, trace};

use crate::api::diverging_frame_builder::{
    DivergingScene, DivergingStyle, ROW_PADDING, build_diverging_frame, diverging_x_scale,
};
use crate::api::host::SelectionManager;
use crate::api::{CategoryInfo, DataView, DivergingBarConfig, ObjectInstance, diverging_rows};
use crate::core::{BandScale, LaidOutRow, Margins, PlotArea, Viewport, layout, shared_domain};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{SELECTION_TRANSITION, SelectionId, SelectionRequest, SelectionTracker};
use crate::render::{Color, RenderFrame, Renderer};

/// Room for the legend and top axis above, series labels on the left.
pub const DIVERGING_MARGINS: Margins = Margins::new(60.0, 20.0, 20.0, 100.0);

/// Diverging stacked bar chart with click selection.
pub struct DivergingBarChart<R: Renderer, S: SelectionManager> {
    renderer: R,
    selection_manager: S,
    viewport: Viewport,
    config: DivergingBarConfig,
    host_palette: Option<Vec<String>>,
    rows: Vec<LaidOutRow>,
    row_identities: Vec<SelectionId>,
    categories: Vec<CategoryInfo>,
    domain: Option<(f64, f64)>,
    selection: SelectionTracker,
}

impl<R: Renderer, S: SelectionManager> DivergingBarChart<R, S> {
    pub fn new(renderer: R, selection_manager: S, viewport: Viewport) -> ChartResult<Self> {
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        Ok(Self {
            renderer,
            selection_manager,
            viewport,
            config: DivergingBarConfig::default(),
            host_palette: None,
            rows: Vec::new(),
            row_identities: Vec::new(),
            categories: Vec::new(),
            domain: None,
            selection: SelectionTracker::new(),
        })
    }

    /// Rebuilds rows, layout and formatting from a new data view.
    pub fn update(&mut self, view: &DataView, viewport: Viewport) -> ChartResult<()> {
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        let mut config = DivergingBarConfig::from_properties(&view.objects);
        if let Some(palette) = &self.host_palette {
            config = config.with_palette(palette.clone());
        }
        let data = diverging_rows(view, |category, index| config.fill_for(category, index))?;
        let rows = layout(&data.rows, config.sort_direction);

        self.viewport = viewport;
        self.domain = shared_domain(&rows);
        self.rows = rows;
        self.row_identities = data.row_identities;
        self.categories = data.categories;
        self.config = config;

        debug!(
            rows = self.rows.len(),
            categories = self.categories.len(),
            domain = ?self.domain,
            sort = self.config.sort_direction.label(),
            "diverging bar chart updated"
        );
        Ok(())
    }

    /// Installs the host's category palette, used from the next update on.
    /// An empty palette restores the built-in one.
    pub fn set_palette(&mut self, palette: Vec<String>) -> ChartResult<()> {
        for color in &palette {
            Color::parse_css(color)?;
        }
        self.host_palette = (!palette.is_empty()).then_some(palette);
        debug!(
            colors = self.host_palette.as_ref().map_or(0, Vec::len),
            "host palette set"
        );
        Ok(())
    }

    #[must_use]
    pub fn host_palette(&self) -> Option<&[String]> {
        self.host_palette.as_deref()
    }

    #[must_use]
    pub fn plot_area(&self) -> PlotArea {
        self.viewport.plot_area(DIVERGING_MARGINS)
    }

    #[must_use]
    pub fn rows(&self) -> &[LaidOutRow] {
        &self.rows
    }

    #[must_use]
    pub fn row_identities(&self) -> &[SelectionId] {
        &self.row_identities
    }

    #[must_use]
    pub fn categories(&self) -> &[CategoryInfo] {
        &self.categories
    }

    /// Niced shared x-domain, `None` while no row has segments.
    #[must_use]
    pub fn domain(&self) -> Option<(f64, f64)> {
        self.domain
    }

    #[must_use]
    pub fn config(&self) -> &DivergingBarConfig {
        &self.config
    }

    #[must_use]
    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    #[must_use]
    pub fn selection_manager(&self) -> &S {
        &self.selection_manager
    }

    pub fn selection_manager_mut(&mut self) -> &mut S {
        &mut self.selection_manager
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Asks the host to select the series row at `index`.
    pub fn click_series(&mut self, index: usize, multi_select: bool) -> Option<SelectionRequest> {
        let identity = self.row_identities.get(index)?.clone();
        let request = self.selection_manager.select(identity, multi_select);
        self.selection.observe(&request);
        trace!(
            index,
            generation = request.generation,
            multi_select,
            "series clicked"
        );
        Some(request)
    }

    /// Clears the selection; results of requests still in flight are dropped.
    pub fn click_background(&mut self) {
        self.selection_manager.clear();
        self.selection.clear();
        trace!("selection cleared");
    }

    /// Applies the host's answer to the request tagged `generation`.
    /// Returns `false` when the answer is stale.
    pub fn on_selection_resolved(&mut self, generation: u64, selected: Vec<SelectionId>) -> bool {
        let applied = self.selection.resolve(generation, selected);
        if !applied {
            trace!(
                generation,
                latest = ?self.selection.latest_generation(),
                "dropping stale selection result"
            );
        }
        applied
    }

    /// Fill opacity of each row under the current selection.
    #[must_use]
    pub fn row_opacities(&self) -> Vec<f64> {
        self.row_identities
            .iter()
            .map(|identity| self.selection.opacity_for(identity))
            .collect()
    }

    /// How long backends should take to fade rows to [`row_opacities`](Self::row_opacities)
    /// after a selection change.
    #[must_use]
    pub fn opacity_transition(&self) -> Duration {
        SELECTION_TRANSITION
    }

    /// Materializes the current scene. Empty when nothing can be drawn.
    pub fn build_frame(&self) -> ChartResult<RenderFrame> {
        let plot = self.plot_area();
        let Some(domain) = self.domain.filter(|_| plot.is_renderable()) else {
            return Ok(RenderFrame::new(self.viewport));
        };
        let bands = BandScale::new(self.rows.len(), (0.0, plot.height), ROW_PADDING)?;
        let row_opacity = self.row_opacities();
        let scene = DivergingScene {
            rows: &self.rows,
            x_scale: diverging_x_scale(domain, plot)?,
            bands: &bands,
            row_opacity: &row_opacity,
        };
        let style = DivergingStyle::from_config(&self.config)?;
        build_diverging_frame(self.viewport, plot, &scene, &style)
    }

    pub fn render(&mut self) -> ChartResult<()> {
        let plot = self.plot_area();
        if !plot.is_renderable() {
            debug!(
                plot_width = plot.width,
                plot_height = plot.height,
                "plot area too small, skipping render"
            );
            return Ok(());
        }
        if self.domain.is_none() {
            debug!("no segments to draw, skipping render");
            return Ok(());
        }
        let frame = self.build_frame()?;
        self.renderer.render(&frame)
    }

    /// Current formatting values of `group` for the host's property pane.
    #[must_use]
    pub fn enumerate_object_instances(&self, group: &str) -> Vec<ObjectInstance> {
        self.config.object_instances(group, &self.categories)
    }
}
