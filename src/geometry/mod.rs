use std::ops::{Add, Mul, Sub};

use num_traits::Float;
use crate::errors::GeometryError;


/// Euclidean distance
pub fn euclidean<T>(x1: T, y1: T, x2: T, y2: T) -> T
where
    T: Float,
    {
    ((x1 - x2).powi(2) + (y1 - y2).powi(2)).sqrt()
}

/// Squared Euclidean distance
pub fn squared_euclidean<T>(x1: T, y1: T, x2: T, y2: T) -> T
where
    T: Float,
    {
    (x1 - x2).powi(2) + (y1 - y2).powi(2)
}


/// 2D point or displacement in continuous image space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Dot product
    pub fn dot(self, v: Vec2) -> f64 {
        self.x * v.x + self.y * v.y
    }

    pub fn distance(self, p: Vec2) -> f64 {
        euclidean(self.x, self.y, p.x, p.y)
    }

    pub fn squared_distance(self, p: Vec2) -> f64 {
        squared_euclidean(self.x, self.y, p.x, p.y)
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, v: Vec2) -> Vec2 {
        Vec2::new(self.x + v.x, self.y + v.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, v: Vec2) -> Vec2 {
        Vec2::new(self.x - v.x, self.y - v.y)
    }
}

/// Scale a vector: 2.0 * v
impl Mul<Vec2> for f64 {
    type Output = Vec2;

    fn mul(self, v: Vec2) -> Vec2 {
        Vec2::new(self * v.x, self * v.y)
    }
}


/// Straight segment between two points
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineSegment {
    pub a: Vec2,
    pub b: Vec2,
}

impl LineSegment {

    pub const fn new(a: Vec2, b: Vec2) -> Self {
        Self { a, b }
    }

    pub fn length(&self) -> f64 {
        self.a.distance(self.b)
    }

    /// Point on the segment at parameter t, with 0 at `a` and 1 at `b`
    pub fn point_at(&self, t: f64) -> Vec2 {
        ((1.0 - t) * self.a) + (t * self.b)
    }

    /// Point on this segment closest to p
    /// Projects p onto the segment; when the projection falls outside, the
    /// nearer endpoint is the answer. A zero-length segment yields `a`
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        let v = self.b - self.a;
        let u = self.a - p;
        let vu = v.dot(u);
        let vv = v.dot(v);
        let t = -vu / vv;

        if (0.0..=1.0).contains(&t) {
            self.point_at(t)
        } else if self.a.squared_distance(p) <= self.b.squared_distance(p) {
            self.a
        } else {
            self.b
        }
    }

    pub fn squared_distance_to(&self, p: Vec2) -> f64 {
        p.squared_distance(self.closest_point(p))
    }
}


/// Open polyline through a sequence of points
#[derive(Clone, Debug, PartialEq)]
pub struct Polyline {
    segments: Vec<LineSegment>,
}

impl Polyline {

    /// Create a polyline from a list of points
    pub fn new(points: &[Vec2]) -> Result<Self, GeometryError> {
        if points.len() < 2 {
            return Err(GeometryError::InvalidPolyline);
        }
        let segments = points
            .windows(2)
            .map(|pair| LineSegment::new(pair[0], pair[1]))
            .collect();
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[LineSegment] {
        &self.segments
    }

    /// Total length of all segments
    pub fn length(&self) -> f64 {
        self.segments.iter().map(LineSegment::length).sum()
    }

    /// Distance along the polyline at which p sits
    /// Picks the segment closest to p (the earliest on ties), then adds the
    /// full lengths of all segments before it to the straight distance from
    /// that segment's first vertex to p
    pub fn distance_from_start(&self, p: Vec2) -> f64 {
        let mut closest_index = 0;
        let mut closest_distance = f64::INFINITY;

        for (index, segment) in self.segments.iter().enumerate() {
            let d = segment.squared_distance_to(p);
            if d < closest_distance {
                closest_index = index;
                closest_distance = d;
            }
        }

        let run: f64 = self.segments[..closest_index].iter().map(LineSegment::length).sum();
        run + self.segments[closest_index].a.distance(p)
    }
}
