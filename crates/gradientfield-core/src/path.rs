use glam::Vec2;

use crate::error::{Error, Result};

/// Open polyline the path particles are seeded along.
#[derive(Debug, Clone, PartialEq)]
pub struct PathShape {
    points: Vec<Vec2>,
}

/// A point on the path together with the unit normal of its segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSample {
    pub point: Vec2,
    pub normal: Vec2,
    pub segment: usize,
}

impl PathShape {
    pub fn new(points: Vec<Vec2>) -> Result<Self> {
        let has_extent = points.windows(2).any(|w| w[0] != w[1]);
        if points.len() < 2 || !has_extent {
            return Err(Error::DegeneratePath(points.len()));
        }
        Ok(Self { points })
    }

    /// The club's zigzag mark: four strokes up and down, rising to the right.
    pub fn zigzag() -> Self {
        Self {
            points: vec![
                Vec2::new(-0.55, 0.45),
                Vec2::new(-0.40, -0.45),
                Vec2::new(-0.25, 0.35),
                Vec2::new(-0.05, -0.40),
                Vec2::new(0.15, 0.40),
                Vec2::new(0.35, -0.35),
                Vec2::new(0.55, 0.45),
                Vec2::new(0.70, -0.30),
            ],
        }
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn segment_count(&self) -> usize {
        self.points.len() - 1
    }

    /// Sample at `progress` in `[0, 1]`, spread evenly per segment (not per arc length).
    pub fn sample(&self, progress: f32) -> PathSample {
        let segments = self.segment_count();
        let scaled = progress.clamp(0.0, 1.0) * segments as f32;
        let segment = (scaled.floor() as usize).min(segments - 1);
        let t = scaled - segment as f32;

        let start = self.points[segment];
        let end = self.points[segment + 1];
        let dir = end - start;
        // Zero-length segments inherit a vertical normal.
        let normal = dir.perp().try_normalize().unwrap_or(Vec2::Y);

        PathSample {
            point: start + dir * t,
            normal,
            segment,
        }
    }

    /// Axis-aligned bounds of the anchor points.
    pub fn bounds(&self) -> (Vec2, Vec2) {
        self.points.iter().fold(
            (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
            |(lo, hi), p| (lo.min(*p), hi.max(*p)),
        )
    }
}

impl Default for PathShape {
    fn default() -> Self {
        Self::zigzag()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_degenerate_paths() {
        assert!(PathShape::new(vec![]).is_err());
        assert!(PathShape::new(vec![Vec2::ONE]).is_err());
        assert!(PathShape::new(vec![Vec2::ONE, Vec2::ONE]).is_err());
        assert!(PathShape::new(vec![Vec2::ZERO, Vec2::X]).is_ok());
    }

    #[test]
    fn sample_walks_segments_evenly() {
        let shape = PathShape::zigzag();
        assert_eq!(shape.segment_count(), 7);

        let first = shape.sample(0.0);
        assert_eq!(first.segment, 0);
        assert_eq!(first.point, Vec2::new(-0.55, 0.45));

        let last = shape.sample(1.0);
        assert_eq!(last.segment, 6);
        assert!((last.point - Vec2::new(0.70, -0.30)).length() < 1e-6);

        let mid = shape.sample(0.5 / 7.0);
        assert_eq!(mid.segment, 0);
        assert!((mid.point - Vec2::new(-0.475, 0.0)).length() < 1e-5);
    }

    #[test]
    fn normals_are_unit_and_perpendicular() {
        let shape = PathShape::zigzag();
        for i in 0..=20 {
            let sample = shape.sample(i as f32 / 20.0);
            let pts = shape.points();
            let dir = pts[sample.segment + 1] - pts[sample.segment];
            assert!((sample.normal.length() - 1.0).abs() < 1e-5);
            assert!(sample.normal.dot(dir).abs() < 1e-5);
        }
    }

    #[test]
    fn zero_length_segment_gets_fallback_normal() {
        let shape = PathShape::new(vec![Vec2::ZERO, Vec2::ZERO, Vec2::X]).unwrap();
        assert_eq!(shape.sample(0.25).normal, Vec2::Y);
    }

    #[test]
    fn bounds_cover_anchors() {
        let (lo, hi) = PathShape::zigzag().bounds();
        assert_eq!(lo, Vec2::new(-0.55, -0.45));
        assert_eq!(hi, Vec2::new(0.70, 0.45));
    }
}
