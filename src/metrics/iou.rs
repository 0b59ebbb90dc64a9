//! Intersection over Union (IoU) calculation.
//!
//! Areas follow the discrete pixel-grid convention: a box spanning columns
//! 0..=9 is 10 pixels wide, so every width and height gets `+ 1`. The same
//! convention is applied to area, intersection and union. For sub-pixel or
//! very small boxes this inflates IoU slightly compared to continuous area.

use crate::error::{Result, VocEvalError};
use crate::types::Rectangle;

/// Check whether two rectangles overlap.
///
/// Boxes are disjoint only if one lies strictly beyond the other's opposite
/// edge; boxes sharing a boundary line still intersect by one pixel.
pub fn boxes_intersect(a: &Rectangle, b: &Rectangle) -> bool {
    if a.left() > b.right() {
        return false; // a is right of b
    }
    if b.left() > a.right() {
        return false; // a is left of b
    }
    if a.bottom() < b.top() {
        return false; // a is above b
    }
    if a.top() > b.bottom() {
        return false; // a is below b
    }
    true
}

/// Pixel area `(right - left + 1) * (bottom - top + 1)`.
pub fn pixel_area(rect: &Rectangle) -> f64 {
    (rect.right() - rect.left() + 1.0) * (rect.bottom() - rect.top() + 1.0)
}

/// Area of the overlap rectangle. Only meaningful when [`boxes_intersect`] holds.
pub fn intersection_area(a: &Rectangle, b: &Rectangle) -> f64 {
    let x_left = a.left().max(b.left());
    let y_top = a.top().max(b.top());
    let x_right = a.right().min(b.right());
    let y_bottom = a.bottom().min(b.bottom());

    (x_right - x_left + 1.0) * (y_bottom - y_top + 1.0)
}

/// Area covered by either rectangle.
pub fn union_area(a: &Rectangle, b: &Rectangle, intersection: f64) -> f64 {
    pixel_area(a) + pixel_area(b) - intersection
}

/// Calculate the Intersection over Union (IoU) between two rectangles.
///
/// # Returns
///
/// Returns a value between 0.0 (no overlap) and 1.0 (identical boxes).
///
/// # Errors
///
/// Returns [`VocEvalError::InternalError`] if the computed ratio falls outside
/// [0, 1], which means the area formulas are inconsistent.
///
/// # Example
///
/// ```
/// use voc_eval::metrics::iou::calculate_iou;
/// use voc_eval::types::Rectangle;
///
/// let a = Rectangle::from_xyrb(0.0, 0.0, 9.0, 9.0).unwrap();
/// let b = Rectangle::from_xyrb(5.0, 5.0, 14.0, 14.0).unwrap();
/// let iou = calculate_iou(&a, &b).unwrap();
/// assert!((iou - 25.0 / 175.0).abs() < 1e-12);
/// ```
pub fn calculate_iou(a: &Rectangle, b: &Rectangle) -> Result<f64> {
    if !boxes_intersect(a, b) {
        return Ok(0.0);
    }

    let intersection = intersection_area(a, b);
    let union = union_area(a, b, intersection);
    let iou = intersection / union;

    if !(0.0..=1.0).contains(&iou) {
        return Err(VocEvalError::InternalError(format!(
            "IoU {iou} out of range for {:?} and {:?}",
            a.to_xyrb(),
            b.to_xyrb()
        )));
    }

    Ok(iou)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(l: f64, t: f64, r: f64, b: f64) -> Rectangle {
        Rectangle::from_xyrb(l, t, r, b).unwrap()
    }

    #[test]
    fn test_identical_boxes() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let iou = calculate_iou(&a, &a).unwrap();
        assert!((iou - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_no_overlap() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(20.0, 20.0, 30.0, 30.0);
        assert!(!boxes_intersect(&a, &b));
        assert_eq!(calculate_iou(&a, &b).unwrap(), 0.0);
    }

    #[test]
    fn test_partial_overlap() {
        let a = rect(0.0, 0.0, 9.0, 9.0);
        let b = rect(5.0, 5.0, 14.0, 14.0);

        // Intersection: 5x5 = 25
        // Union: 100 + 100 - 25 = 175
        let iou = calculate_iou(&a, &b).unwrap();
        assert!((iou - 25.0 / 175.0).abs() < 1e-12);
    }

    #[test]
    fn test_shared_edge_counts_as_one_pixel() {
        let a = rect(0.0, 0.0, 9.0, 9.0);
        let b = rect(9.0, 0.0, 18.0, 9.0);
        assert!(boxes_intersect(&a, &b));
        assert_eq!(intersection_area(&a, &b), 10.0);
        let iou = calculate_iou(&a, &b).unwrap();
        assert!((iou - 10.0 / 190.0).abs() < 1e-12);
    }

    #[test]
    fn test_pixel_area_adds_one() {
        assert_eq!(pixel_area(&rect(0.0, 0.0, 9.0, 9.0)), 100.0);
        assert_eq!(pixel_area(&rect(3.0, 3.0, 3.0, 3.0)), 1.0);
    }

    #[test]
    fn test_contained_box() {
        let outer = rect(0.0, 0.0, 19.0, 19.0);
        let inner = rect(5.0, 5.0, 14.0, 14.0);
        let iou = calculate_iou(&outer, &inner).unwrap();
        assert!((iou - 100.0 / 400.0).abs() < 1e-12);
    }
}
