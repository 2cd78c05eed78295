//! Orientation-independent part dimensions

use crate::units::LengthUnit;

/// Part dimensions as an ordered triple
///
/// A nominal size satisfies `length >= width >= thickness`: it is built by
/// sorting three extents, so the modeling axis a dimension came from is
/// irrelevant. A raw size keeps the roles of the nominal size it was derived
/// from (see [`Size::raw`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    length: f64,
    width: f64,
    thickness: f64,
}

impl Size {
    /// Build a size from three extents in any order
    ///
    /// # Example
    ///
    /// ```
    /// use cutlist::Size;
    ///
    /// let size = Size::from_extents([5.0, 50.0, 4.0]);
    /// assert_eq!((size.length(), size.width(), size.thickness()), (50.0, 5.0, 4.0));
    /// ```
    pub fn from_extents(extents: [f64; 3]) -> Self {
        let mut ordered = extents;
        ordered.sort_by(|a, b| b.total_cmp(a));
        Self {
            length: ordered[0],
            width: ordered[1],
            thickness: ordered[2],
        }
    }

    /// Zero size, used for parts without measurable faces
    pub fn zero() -> Self {
        Self {
            length: 0.0,
            width: 0.0,
            thickness: 0.0,
        }
    }

    /// Longest dimension
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Middle dimension
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Shortest dimension
    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    /// `length × width`, in squared scene units
    pub fn area(&self) -> f64 {
        self.length * self.width
    }

    /// `length × width × thickness`, in cubed scene units
    pub fn volume(&self) -> f64 {
        self.length * self.width * self.thickness
    }

    /// Area in square meters, given the unit the dimensions are expressed in
    pub fn area_m2(&self, unit: LengthUnit) -> f64 {
        let m = unit.meters();
        self.area() * m * m
    }

    /// Volume in cubic meters, given the unit the dimensions are expressed in
    pub fn volume_m3(&self, unit: LengthUnit) -> f64 {
        let m = unit.meters();
        self.volume() * m * m * m
    }

    /// Raw (stock) size: margins added to length and width, thickness already resolved
    ///
    /// Dimension roles are kept rather than re-sorted: the raw length is always
    /// the nominal length plus its margin, even when margins reorder the values.
    pub(crate) fn raw(&self, length_increase: f64, width_increase: f64, raw_thickness: f64) -> Self {
        Self {
            length: self.length + length_increase,
            width: self.width + width_increase,
            thickness: raw_thickness,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extents_sorts_descending() {
        for extents in [
            [1.0, 2.0, 3.0],
            [3.0, 1.0, 2.0],
            [2.0, 3.0, 1.0],
            [3.0, 2.0, 1.0],
        ] {
            let size = Size::from_extents(extents);
            assert_eq!(size.length(), 3.0);
            assert_eq!(size.width(), 2.0);
            assert_eq!(size.thickness(), 1.0);
        }
    }

    #[test]
    fn test_area_and_volume() {
        let size = Size::from_extents([100.0, 60.0, 3.0]);
        assert_eq!(size.area(), 6000.0);
        assert_eq!(size.volume(), 18000.0);
    }

    #[test]
    fn test_metric_conversions() {
        let size = Size::from_extents([1000.0, 500.0, 20.0]);
        assert!((size.area_m2(LengthUnit::Millimeter) - 0.5).abs() < 1e-12);
        assert!((size.volume_m3(LengthUnit::Millimeter) - 0.01).abs() < 1e-12);

        let size = Size::from_extents([100.0, 100.0, 100.0]);
        assert!((size.volume_m3(LengthUnit::Centimeter) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_raw_applies_margins() {
        let size = Size::from_extents([500.0, 50.0, 18.0]);
        let raw = size.raw(10.0, 5.0, 22.0);
        assert_eq!(raw.length(), 510.0);
        assert_eq!(raw.width(), 55.0);
        assert_eq!(raw.thickness(), 22.0);
    }

    #[test]
    fn test_zero_size() {
        let size = Size::zero();
        assert_eq!(size.area(), 0.0);
        assert_eq!(size.volume(), 0.0);
    }
}
