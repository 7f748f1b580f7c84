//! Sheet layout calculations
//!
//! All values are PDF user-space units (1/72 inch) with the origin at the
//! bottom-left corner of the sheet.

/// Number of source pages placed on one output sheet
pub const SLOTS_PER_SHEET: usize = 4;

/// Inset between a half-sheet corner and the embedded page on every side
pub const CELL_MARGIN: f32 = 10.0;

/// Label font size in points
pub const LABEL_FONT_SIZE: f32 = 24.0;

/// Distance of the label baseline below the top edge of the sheet
pub const LABEL_TOP_OFFSET: f32 = 25.0;

/// Page dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageDimensions {
    pub width: f32,
    pub height: f32,
}

impl PageDimensions {
    /// A4 portrait (210mm × 297mm)
    pub fn a4() -> Self {
        Self {
            width: 595.28,
            height: 841.89,
        }
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Quadrant of a sheet, in fill order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Slot {
    /// Slot for the `index`-th page of a group, if the group has room for it
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Slot::TopLeft),
            1 => Some(Slot::TopRight),
            2 => Some(Slot::BottomLeft),
            3 => Some(Slot::BottomRight),
            _ => None,
        }
    }
}

/// The 2×2 grid of an output sheet
#[derive(Debug, Clone, Copy)]
pub struct SheetGrid {
    pub sheet: PageDimensions,
    pub margin: f32,
}

impl Default for SheetGrid {
    fn default() -> Self {
        Self {
            sheet: PageDimensions::a4(),
            margin: CELL_MARGIN,
        }
    }
}

impl SheetGrid {
    /// Half-sheet corner a slot starts from
    pub fn origin(&self, slot: Slot) -> (f32, f32) {
        let half_w = self.sheet.width / 2.0;
        let half_h = self.sheet.height / 2.0;
        match slot {
            Slot::TopLeft => (0.0, half_h),
            Slot::TopRight => (half_w, half_h),
            Slot::BottomLeft => (0.0, 0.0),
            Slot::BottomRight => (half_w, 0.0),
        }
    }

    /// Rectangle an embedded page is stretched into
    pub fn cell(&self, slot: Slot) -> Rect {
        let (x, y) = self.origin(slot);
        Rect {
            x: x + self.margin,
            y: y + self.margin,
            width: self.sheet.width / 2.0 - 2.0 * self.margin,
            height: self.sheet.height / 2.0 - 2.0 * self.margin,
        }
    }

    /// Baseline origin of a label `text_width` wide, centered near the top edge
    pub fn label_origin(&self, text_width: f32) -> (f32, f32) {
        (
            (self.sheet.width - text_width) / 2.0,
            self.sheet.height - LABEL_TOP_OFFSET,
        )
    }
}

/// Number of sheets needed for `page_count` pages
pub fn sheet_count(page_count: usize) -> usize {
    page_count.div_ceil(SLOTS_PER_SHEET)
}
