use std::path::Path;

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};
use log::{debug, info, warn};

use crate::errors::RasterError;
use crate::geometry::{Polyline, Vec2};
use crate::grid::{Cell, GridMap, MoveSet};
use crate::search::shortest_path;


/// Color stamped along traced routes
const ROUTE_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Color of annotated polylines and their sample markers
const ANNOTATION_COLOR: Rgba<u8> = Rgba([0, 255, 0, 255]);


/// Pixel classifier deciding which colors count as obstacles
/// A pixel blocks when its red channel exceeds min_red while green and blue
/// stay at or below their maxima; the defaults match strong reds
#[derive(Clone, Copy, Debug)]
pub struct ObstacleFilter {
    pub min_red: u8,
    pub max_green: u8,
    pub max_blue: u8,
}

impl Default for ObstacleFilter {
    fn default() -> Self {
        Self {
            min_red: 0xe0,
            max_green: 0x40,
            max_blue: 0x40,
        }
    }
}

impl ObstacleFilter {

    /// Whether the pixel color counts as an obstacle
    pub fn matches(&self, pixel: Rgba<u8>) -> bool {
        let Rgba([r, g, b, _]) = pixel;
        r > self.min_red && g <= self.max_green && b <= self.max_blue
    }
}


/// Classify every pixel of the image into an occupancy grid
pub fn grid_from_image(img: &RgbaImage, filter: &ObstacleFilter) -> GridMap {
    let (width, height) = img.dimensions();
    GridMap::from_fn(width as i32, height as i32, |x, y| {
        filter.matches(*img.get_pixel(x as u32, y as u32))
    })
}


/// Configuration for route tracing
#[derive(Clone, Debug)]
pub struct TraceSettings {
    /// Which pixel colors block movement
    pub filter: ObstacleFilter,
    /// Displacements a route may take per step
    pub moves: MoveSet,
    /// Radius of the dots stamped along the traced route
    pub mark_radius: i32,
}

impl Default for TraceSettings {
    fn default() -> Self {
        Self {
            filter: ObstacleFilter::default(),
            moves: MoveSet::extended(),
            mark_radius: 2,
        }
    }
}


/// A traced route: the cells stepped through, excluding the start cell, and
/// the total cost in scaled-Euclidean units
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteTrace {
    pub path: Vec<Cell>,
    pub cost: i32,
}

impl RouteTrace {

    /// Whether start and end coincide
    pub fn is_trivial(&self) -> bool {
        self.path.is_empty()
    }
}


/// Find the cheapest route between two pixels of the image, avoiding every
/// pixel the filter classifies as an obstacle
pub fn find_route(
    img: &RgbaImage,
    start: Cell,
    end: Cell,
    settings: &TraceSettings,
) -> Result<RouteTrace, RasterError> {
    let grid = grid_from_image(img, &settings.filter);
    debug!(
        "classified {}x{} image, {} blocked cells",
        grid.width(),
        grid.height(),
        grid.blocked_cells()
    );

    // Moves only validate their landing cell, so a bad endpoint is worth a
    // warning but not an error: the search settles reachability
    if !grid.is_open(start) {
        warn!("start {start} is blocked or outside the image");
    }
    if !grid.is_open(end) {
        warn!("end {end} is blocked or outside the image");
    }

    let (path, cost) = shortest_path(start, grid.successors(&settings.moves), |cell| *cell == end)
        .ok_or(RasterError::NoRoute { from: start, to: end })?;

    debug!("route from {start} to {end}: {} steps, cost {cost}", path.len());
    Ok(RouteTrace { path, cost })
}


/// Stamp a filled dot on every route cell
pub fn draw_route(canvas: &mut RgbaImage, path: &[Cell], radius: i32, color: Rgba<u8>) {
    for cell in path {
        draw_filled_circle_mut(canvas, (cell.x, cell.y), radius, color);
    }
}


/// End-to-end tracing: decode the input image, find the cheapest route from
/// start to end, stamp it onto the image and encode the result to output
pub fn trace_route(
    input: &Path,
    output: &Path,
    start: Cell,
    end: Cell,
    settings: &TraceSettings,
) -> Result<RouteTrace, RasterError> {
    let mut canvas = image::open(input)?.to_rgba8();
    info!(
        "tracing {start} -> {end} on {} ({}x{})",
        input.display(),
        canvas.width(),
        canvas.height()
    );

    let trace = find_route(&canvas, start, end, settings)?;

    draw_route(&mut canvas, &trace.path, settings.mark_radius, ROUTE_COLOR);
    canvas.save(output)?;
    info!(
        "saved route ({} steps, cost {}) to {}",
        trace.path.len(),
        trace.cost,
        output.display()
    );

    Ok(trace)
}


/// A sampled point near an annotated polyline, with its measured distance
/// from the polyline start
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistanceMark {
    pub at: Vec2,
    pub from_start: f64,
}


/// Draw the polyline onto the canvas and scatter measured sample points
/// around it
/// Every segment contributes samples_per_segment points at uniformly random
/// parameters, offset by up to `scatter` pixels per axis. Each sample gets a
/// marker on the canvas and a measurement from the polyline start; the
/// measurements come back so the caller can label or report them
pub fn annotate_distances(
    canvas: &mut RgbaImage,
    line: &Polyline,
    samples_per_segment: usize,
    scatter: f64,
) -> Vec<DistanceMark> {
    for segment in line.segments() {
        draw_line_segment_mut(
            canvas,
            (segment.a.x as f32, segment.a.y as f32),
            (segment.b.x as f32, segment.b.y as f32),
            ANNOTATION_COLOR,
        );
    }

    let mut marks = Vec::new();
    for segment in line.segments() {
        for _ in 0..samples_per_segment {
            let at = segment.point_at(rand::random::<f64>()) + scatter * random_offset();
            let from_start = line.distance_from_start(at);

            draw_filled_circle_mut(canvas, (at.x as i32, at.y as i32), 2, ANNOTATION_COLOR);
            debug!("sample at ({:.1}, {:.1}) measures {:.1} from start", at.x, at.y, from_start);

            marks.push(DistanceMark { at, from_start });
        }
    }

    marks
}

/// Offset vector with both components uniform in [-1, 1)
fn random_offset() -> Vec2 {
    Vec2::new(
        rand::random::<f64>() * 2.0 - 1.0,
        rand::random::<f64>() * 2.0 - 1.0,
    )
}
