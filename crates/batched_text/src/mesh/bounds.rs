//! Axis-aligned bounds for laid out text

use crate::foundation::math::{Point3, Vec3};

/// Bounding box for text geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextBounds {
    /// Minimum corner
    pub min: Point3,
    /// Maximum corner
    pub max: Point3,
}

impl TextBounds {
    /// Bounds spanning two corners given in any order
    pub fn from_corners(a: Point3, b: Point3) -> Self {
        Self {
            min: a.inf(&b),
            max: a.sup(&b),
        }
    }
    
    /// Smallest bounds containing every point, `None` for no points
    pub fn from_points(points: impl IntoIterator<Item = Point3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        
        Some(points.fold(Self { min: first, max: first }, |bounds, point| Self {
            min: bounds.min.inf(&point),
            max: bounds.max.sup(&point),
        }))
    }
    
    /// Calculate width of bounding box
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }
    
    /// Calculate height of bounding box
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
    
    /// Calculate depth of bounding box
    pub fn depth(&self) -> f32 {
        self.max.z - self.min.z
    }
    
    /// Box center
    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }
    
    /// Radius of the sphere through the box corners, centered on the box
    pub fn bounding_radius(&self) -> f32 {
        (self.max - self.min).norm() / 2.0
    }
    
    /// Bounds moved by `offset`
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    
    #[test]
    fn test_bounds_calculation() {
        let bounds = TextBounds::from_corners(Point3::new(100.0, 50.0, 0.0), Point3::new(0.0, 0.0, 2.0));
        
        assert_eq!(bounds.width(), 100.0);
        assert_eq!(bounds.height(), 50.0);
        assert_eq!(bounds.depth(), 2.0);
        assert_eq!(bounds.center(), Point3::new(50.0, 25.0, 1.0));
    }
    
    #[test]
    fn test_from_points() {
        assert!(TextBounds::from_points(std::iter::empty()).is_none());
        
        let bounds = TextBounds::from_points([
            Point3::new(1.0, -2.0, 0.0),
            Point3::new(-3.0, 4.0, 0.0),
            Point3::new(0.0, 0.0, 5.0),
        ])
        .unwrap();
        assert_eq!(bounds.min, Point3::new(-3.0, -2.0, 0.0));
        assert_eq!(bounds.max, Point3::new(1.0, 4.0, 5.0));
    }
    
    #[test]
    fn test_bounding_radius_and_translation() {
        let bounds = TextBounds::from_corners(Point3::origin(), Point3::new(6.0, 8.0, 0.0));
        
        assert_relative_eq!(bounds.bounding_radius(), 5.0);
        assert_eq!(bounds.translated(Vec3::new(1.0, 1.0, 1.0)).min, Point3::new(1.0, 1.0, 1.0));
    }
}
