use glam::Vec2;
use hamster_maze_core::CellCoord;
use hamster_maze_rendering::{tile_size, ActorPresentation, RenderingError};

/// Rows reserved above the maze for the title and score.
pub(crate) const HUD_ROWS: u16 = 2;

/// Terminal columns per tile unit; character cells are roughly twice as tall as wide.
const COLUMNS_PER_UNIT: u32 = 2;

/// Placement of the maze inside the terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Layout {
    pub(crate) origin_x: u16,
    pub(crate) origin_y: u16,
    pub(crate) tile_rows: u16,
    pub(crate) tile_columns: u16,
}

impl Layout {
    /// Fits a maze of the given shape into a terminal of `width` by `height` cells.
    pub(crate) fn fit(
        width: u16,
        height: u16,
        rows: u32,
        columns: u32,
    ) -> Result<Self, RenderingError> {
        let available_height = u32::from(height.saturating_sub(HUD_ROWS));
        let available_units = u32::from(width) / COLUMNS_PER_UNIT;
        let size = tile_size(
            Vec2::new(available_units as f32, available_height as f32),
            rows,
            columns,
        );
        if size == 0 {
            return Err(RenderingError::ViewportTooSmall {
                width: u32::from(width),
                height: u32::from(height),
                rows,
                columns,
            });
        }

        // A non-zero tile size guarantees the maze fits, so every value below
        // is bounded by the terminal dimensions.
        let maze_width = columns * size * COLUMNS_PER_UNIT;
        let maze_height = rows * size;
        Ok(Self {
            origin_x: ((u32::from(width) - maze_width) / 2) as u16,
            origin_y: HUD_ROWS + ((available_height - maze_height) / 2) as u16,
            tile_rows: size as u16,
            tile_columns: (size * COLUMNS_PER_UNIT) as u16,
        })
    }

    /// Terminal position of the top-left character of a cell.
    pub(crate) fn cell_origin(&self, cell: CellCoord) -> (u16, u16) {
        (
            self.origin_x + cell.column() as u16 * self.tile_columns,
            self.origin_y + cell.row() as u16 * self.tile_rows,
        )
    }
}

/// Character used to draw the hamster so it points along its heading.
pub(crate) fn actor_glyph(actor: &ActorPresentation) -> char {
    let heading = actor.heading;
    if heading.flip_horizontal {
        '<'
    } else if heading.rotation > 0.0 {
        'v'
    } else if heading.rotation < 0.0 {
        '^'
    } else {
        '>'
    }
}

/// Maps a terminal position to swipe space, compensating for tall characters.
pub(crate) fn swipe_point(column: u16, row: u16) -> Vec2 {
    Vec2::new(f32::from(column), f32::from(row) * COLUMNS_PER_UNIT as f32)
}
