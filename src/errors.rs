use thiserror::Error;

use crate::grid::Cell;


/// Failures from the raster routing pipeline
#[derive(Debug, Error)]
pub enum RasterError {
    /// No open route connects the two cells
    #[error("no route from {from} to {to}")]
    NoRoute { from: Cell, to: Cell },

    /// Image decode or encode failure
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Failures from geometric constructions
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeometryError {
    /// A polyline needs at least two points
    #[error("polyline requires at least two points")]
    InvalidPolyline,
}
