use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Screen-space layout parameters shared by every container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Layout", inline)]
#[serde(default)]
pub struct LayoutOptions {
    /// Top-left corner of the first cell.
    #[schemars(skip)]
    pub origin: [f32; 2],
    /// Width and height of one element cell.
    #[schemars(title = "Cell Size", range(min = 8.0, max = 160.0), extend("step" = 1.0))]
    pub cell_size: f32,
    /// Spacing between adjacent cells.
    #[schemars(title = "Gap", range(min = 0.0, max = 64.0), extend("step" = 1.0))]
    pub gap: f32,
    /// Cells per row for grid-shaped containers (arrays, deque slots).
    #[schemars(title = "Columns", range(min = 1, max = 64))]
    pub columns: usize,
    /// Vertical distance between tree/heap levels.
    #[schemars(title = "Level Height", range(min = 16.0, max = 240.0), extend("step" = 1.0))]
    pub level_height: f32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            origin: [40.0, 40.0],
            cell_size: 48.0,
            gap: 8.0,
            columns: 10,
            level_height: 72.0,
        }
    }
}

impl LayoutOptions {
    /// Distance from one cell's origin to the next.
    #[must_use]
    pub fn pitch(&self) -> f32 {
        self.cell_size + self.gap
    }
}
