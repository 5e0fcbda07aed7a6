use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;

use crate::core::scale::LinearScale;
use crate::core::{Sample, ViewportState};

/// Vertex in plot-local pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaVertex {
    pub x: f64,
    pub y: f64,
}

/// Step-after geometry for an area series.
///
/// `line_points` holds the stepped outline. `fill_polygon` closes the outline
/// against the zero baseline and repeats its first vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaGeometry {
    pub line_points: Vec<AreaVertex>,
    pub fill_polygon: Vec<AreaVertex>,
}

impl AreaGeometry {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            line_points: Vec::new(),
            fill_polygon: Vec::new(),
        }
    }
}

/// Projects samples into step-after area geometry.
///
/// Each sample holds its value until the next sample's x, so the outline
/// moves horizontally first and then vertically.
#[must_use]
pub fn project_area_geometry(
    samples: &[Sample],
    viewport: &ViewportState,
    value_scale: LinearScale,
) -> AreaGeometry {
    if samples.is_empty() {
        return AreaGeometry::empty();
    }

    let projected = project_vertices(samples, viewport, value_scale);

    let mut line_points = Vec::with_capacity(projected.len() * 2);
    for (index, vertex) in projected.iter().enumerate() {
        if index > 0 {
            let previous = projected[index - 1];
            line_points.push(AreaVertex {
                x: vertex.x,
                y: previous.y,
            });
        }
        line_points.push(*vertex);
    }

    let baseline_y = value_scale.map(0.0);
    let first_x = projected[0].x;
    let last_x = projected[projected.len() - 1].x;

    let mut fill_polygon = Vec::with_capacity(line_points.len() + 3);
    fill_polygon.push(AreaVertex {
        x: first_x,
        y: baseline_y,
    });
    fill_polygon.extend(line_points.iter().copied());
    fill_polygon.push(AreaVertex {
        x: last_x,
        y: baseline_y,
    });
    fill_polygon.push(AreaVertex {
        x: first_x,
        y: baseline_y,
    });

    AreaGeometry {
        line_points,
        fill_polygon,
    }
}

fn project_vertices(
    samples: &[Sample],
    viewport: &ViewportState,
    value_scale: LinearScale,
) -> Vec<AreaVertex> {
    let project = |sample: &Sample| AreaVertex {
        x: viewport.project(sample.x),
        y: value_scale.map(sample.y),
    };

    // Hosts deliver up to 10k rows per update.
    #[cfg(feature = "parallel-projection")]
    {
        samples.par_iter().map(project).collect()
    }

    #[cfg(not(feature = "parallel-projection"))]
    {
        samples.iter().map(project).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{AreaVertex, project_area_geometry};
    use crate::core::scale::LinearScale;
    use crate::core::{Sample, ViewportState, XKind, ZoomLimits};

    #[test]
    fn outline_steps_after_each_sample() {
        let viewport =
            ViewportState::initialize(0.0, 2.0, 200.0, XKind::Numeric, ZoomLimits::default())
                .expect("viewport");
        let value_scale = LinearScale::new((0.0, 10.0), (100.0, 0.0)).expect("value scale");
        let samples = [
            Sample::new(0.0, 5.0),
            Sample::new(1.0, 10.0),
            Sample::new(2.0, 0.0),
        ];

        let geometry = project_area_geometry(&samples, &viewport, value_scale);
        assert_eq!(
            geometry.line_points,
            vec![
                AreaVertex { x: 0.0, y: 50.0 },
                AreaVertex { x: 100.0, y: 50.0 },
                AreaVertex { x: 100.0, y: 0.0 },
                AreaVertex { x: 200.0, y: 0.0 },
                AreaVertex { x: 200.0, y: 100.0 },
            ]
        );
        assert_eq!(geometry.fill_polygon.len(), geometry.line_points.len() + 3);
        assert_eq!(geometry.fill_polygon.first(), geometry.fill_polygon.last());
    }

    #[test]
    fn empty_series_has_no_geometry() {
        let viewport =
            ViewportState::initialize(0.0, 2.0, 200.0, XKind::Numeric, ZoomLimits::default())
                .expect("viewport");
        let value_scale = LinearScale::new((0.0, 1.0), (100.0, 0.0)).expect("value scale");
        let geometry = project_area_geometry(&[], &viewport, value_scale);
        assert!(geometry.line_points.is_empty());
        assert!(geometry.fill_polygon.is_empty());
    }
}
