//! Standard thickness resolution

/// Result of resolving a thickness against a catalog
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardThickness {
    /// Catalog thickness, or the input when none fits
    pub value: f64,
    /// Whether `value` comes from the catalog
    pub available: bool,
}

/// Round a thickness up to the first catalog value that can hold it
///
/// `catalog` must be ascending. When every entry is thinner than `actual`
/// (or the catalog is empty) the input is returned unchanged and flagged as
/// unavailable. The result is never thinner than the input.
///
/// # Example
///
/// ```
/// use cutlist::resolve_standard_thickness;
///
/// let catalog = [12.0, 18.0, 22.0];
/// assert_eq!(resolve_standard_thickness(18.0, &catalog).value, 18.0);
/// assert_eq!(resolve_standard_thickness(19.0, &catalog).value, 22.0);
/// assert!(!resolve_standard_thickness(30.0, &catalog).available);
/// ```
pub fn resolve_standard_thickness(actual: f64, catalog: &[f64]) -> StandardThickness {
    catalog
        .iter()
        .find(|&&standard| actual <= standard)
        .map(|&value| StandardThickness {
            value,
            available: true,
        })
        .unwrap_or(StandardThickness {
            value: actual,
            available: false,
        })
}
