//! Declarative window layout.
//!
//! The screen is described as a small tree of [`RegionSpec`] records, each
//! placed relative to its parent (or the whole terminal). Sizes and offsets
//! follow one rule per axis:
//!
//! - positive: that many cells
//! - negative: counted back from the parent's far edge
//! - zero size: everything from the offset to the far edge
//!
//! Resolution happens at startup and again on every resize. A region that
//! ends up empty or spills out of its parent is an error, so a terminal that
//! is too small is reported instead of drawn garbled.

use std::collections::HashMap;

use ratatui::layout::Rect;
use thiserror::Error;

/// Named screen regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// Border around the scrollback.
    OutFrame,
    /// Scrollback text.
    Output,
    /// Border around the input line, holding the prompt.
    InFrame,
    /// Input text and cursor.
    Input,
}

/// Placement of one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionSpec {
    /// Region being placed.
    pub region: Region,
    /// Region this one sits inside. `None` means the whole terminal.
    pub parent: Option<Region>,
    /// (rows, columns).
    pub size: (i32, i32),
    /// (row, column) relative to the parent.
    pub offset: (i32, i32),
    /// Whether a border is drawn on the region's edge.
    pub border: bool,
}

/// Layout resolution failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// Region does not fit inside its parent at the current size.
    #[error("{region:?} does not fit in a {width}x{height} parent")]
    DoesNotFit {
        /// Offending region.
        region: Region,
        /// Parent width in cells.
        width: u16,
        /// Parent height in cells.
        height: u16,
    },

    /// Parent was not placed before its child.
    #[error("{region:?} refers to unplaced parent {parent:?}")]
    UnknownParent {
        /// Child region.
        region: Region,
        /// Missing parent.
        parent: Region,
    },

    /// Layout lacks a region the renderer needs.
    #[error("layout has no {0:?} region")]
    Missing(Region),
}

/// Ordered list of region specs, parents first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    specs: Vec<RegionSpec>,
}

impl Default for Layout {
    fn default() -> Self {
        Self::standard()
    }
}

impl Layout {
    /// Scrollback on top, a three-row input box at the bottom.
    pub fn standard() -> Self {
        Self::new(vec![
            RegionSpec {
                region: Region::OutFrame,
                parent: None,
                size: (-3, 0),
                offset: (0, 0),
                border: true,
            },
            RegionSpec {
                region: Region::Output,
                parent: Some(Region::OutFrame),
                size: (-2, -2),
                offset: (1, 1),
                border: false,
            },
            RegionSpec {
                region: Region::InFrame,
                parent: None,
                size: (3, 0),
                offset: (-3, 0),
                border: true,
            },
            RegionSpec {
                region: Region::Input,
                parent: Some(Region::InFrame),
                size: (1, -4),
                offset: (1, 3),
                border: false,
            },
        ])
    }

    /// Layout from explicit specs. Parents must come before children.
    pub fn new(specs: Vec<RegionSpec>) -> Self {
        Self { specs }
    }

    /// Region specs in resolution order.
    pub fn specs(&self) -> &[RegionSpec] {
        &self.specs
    }

    /// Place every region inside `area`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError`] if any region does not fit, a parent is
    /// referenced before it is placed, or one of the four regions is absent.
    pub fn resolve(&self, area: Rect) -> Result<ResolvedLayout, LayoutError> {
        let mut rects = HashMap::with_capacity(self.specs.len());

        for spec in &self.specs {
            let parent = match spec.parent {
                None => area,
                Some(parent) => *rects
                    .get(&parent)
                    .ok_or(LayoutError::UnknownParent { region: spec.region, parent })?,
            };
            rects.insert(spec.region, place(spec, parent)?);
        }

        for region in [Region::OutFrame, Region::Output, Region::InFrame, Region::Input] {
            if !rects.contains_key(&region) {
                return Err(LayoutError::Missing(region));
            }
        }

        Ok(ResolvedLayout { rects })
    }
}

/// Resolve one axis: returns (start, length) within `extent`.
fn axis(size: i32, offset: i32, extent: i32) -> Option<(i32, i32)> {
    let start = if offset < 0 { extent + offset } else { offset };
    let len = match size {
        0 => extent - start,
        s if s < 0 => extent + s,
        s => s,
    };

    (start >= 0 && len > 0 && start + len <= extent).then_some((start, len))
}

fn place(spec: &RegionSpec, parent: Rect) -> Result<Rect, LayoutError> {
    let does_not_fit =
        || LayoutError::DoesNotFit { region: spec.region, width: parent.width, height: parent.height };

    let (row, height) =
        axis(spec.size.0, spec.offset.0, i32::from(parent.height)).ok_or_else(does_not_fit)?;
    let (col, width) =
        axis(spec.size.1, spec.offset.1, i32::from(parent.width)).ok_or_else(does_not_fit)?;

    // In range: every value is bounded by the parent's u16 extent
    let cell = |v: i32| u16::try_from(v).map_err(|_| does_not_fit());
    Ok(Rect::new(parent.x + cell(col)?, parent.y + cell(row)?, cell(width)?, cell(height)?))
}

/// Absolute screen rectangles for each region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLayout {
    rects: HashMap<Region, Rect>,
}

impl ResolvedLayout {
    /// Rectangle of `region`.
    pub fn rect(&self, region: Region) -> Rect {
        self.rects.get(&region).copied().unwrap_or_default()
    }
}
