//! Reading-order reconstruction
//!
//! Orders recognized text regions the way a reader would walk the page. The
//! whole page is classified once: when most regions are taller than wide it is
//! read as right-to-left columns, otherwise as top-to-bottom rows.

use std::cmp::Ordering;

use super::Polygon;

/// A region is vertical when its height exceeds this multiple of its width.
const VERTICAL_ASPECT_RATIO: f64 = 1.5;

/// Geometry of one region, derived for sorting
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEntry {
    /// Position of the region in the input
    pub index: usize,
    /// Center x of the axis-aligned bounds
    pub cx: f64,
    /// Center y of the axis-aligned bounds
    pub cy: f64,
    pub width: f64,
    pub height: f64,
}

impl LayoutEntry {
    /// Compute the axis-aligned bounds of `polygon`.
    ///
    /// Returns `None` for a polygon with no points.
    pub fn from_polygon(index: usize, polygon: &Polygon) -> Option<Self> {
        let first = polygon.first()?;
        let (mut x_min, mut x_max) = (first[0], first[0]);
        let (mut y_min, mut y_max) = (first[1], first[1]);

        for point in &polygon[1..] {
            x_min = x_min.min(point[0]);
            x_max = x_max.max(point[0]);
            y_min = y_min.min(point[1]);
            y_max = y_max.max(point[1]);
        }

        Some(Self {
            index,
            cx: (x_min + x_max) / 2.0,
            cy: (y_min + y_max) / 2.0,
            width: x_max - x_min,
            height: y_max - y_min,
        })
    }

    pub fn is_vertical(&self) -> bool {
        self.height > VERTICAL_ASPECT_RATIO * self.width
    }
}

/// Page-level reading direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutDirection {
    /// Rows read top to bottom, each left to right
    Horizontal,
    /// Columns read right to left, each top to bottom
    Vertical,
}

/// Majority vote: vertical only when more than half the regions are vertical
pub fn classify(entries: &[LayoutEntry]) -> LayoutDirection {
    let vertical = entries.iter().filter(|e| e.is_vertical()).count();
    if vertical * 2 > entries.len() {
        LayoutDirection::Vertical
    } else {
        LayoutDirection::Horizontal
    }
}

fn compare(direction: LayoutDirection, a: &LayoutEntry, b: &LayoutEntry) -> Ordering {
    match direction {
        LayoutDirection::Vertical => b.cx.total_cmp(&a.cx).then(a.cy.total_cmp(&b.cy)),
        LayoutDirection::Horizontal => a.cy.total_cmp(&b.cy).then(a.cx.total_cmp(&b.cx)),
    }
}

/// Permutation of `polygons` in reading order.
///
/// Returns `None` when any polygon is empty. The sort is stable, so regions
/// with identical keys keep their input order.
pub fn reading_order_indices(polygons: &[Polygon]) -> Option<Vec<usize>> {
    let mut entries = polygons
        .iter()
        .enumerate()
        .map(|(index, polygon)| LayoutEntry::from_polygon(index, polygon))
        .collect::<Option<Vec<_>>>()?;

    let direction = classify(&entries);
    entries.sort_by(|a, b| compare(direction, a, b));

    Some(entries.into_iter().map(|e| e.index).collect())
}

/// Reorder `texts` by their parallel `polygons`.
///
/// The texts come back untouched when there are no polygons, when the two
/// sequences differ in length, or when a polygon has no points.
pub fn reading_order(texts: Vec<String>, polygons: Option<&[Polygon]>) -> Vec<String> {
    let Some(polygons) = polygons else {
        return texts;
    };
    if texts.is_empty() || polygons.len() != texts.len() {
        return texts;
    }
    let Some(order) = reading_order_indices(polygons) else {
        return texts;
    };

    let mut slots: Vec<Option<String>> = texts.into_iter().map(Some).collect();
    order.into_iter().filter_map(|i| slots[i].take()).collect()
}
