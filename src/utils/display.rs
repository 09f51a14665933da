//! Display and output formatting utilities

use crate::tiling::{Instance, TilingGrid};

/// Renders decoded tilings for the console
pub struct TilingFormatter;

impl TilingFormatter {
    /// Render each cell as `<top,right,bottom,left>` colour names, one grid row per line
    pub fn format_tiling(grid: &TilingGrid, instance: &Instance, placeholder: &str) -> String {
        let mut output = String::new();

        for row in grid.rows() {
            let cells: Vec<String> = row
                .into_iter()
                .map(|cell| match cell.and_then(|tile| instance.tile(tile)) {
                    Some(tile) => {
                        let names: Vec<&str> = tile
                            .edges()
                            .iter()
                            .map(|&color| instance.color_name(color).unwrap_or("?"))
                            .collect();
                        format!("<{}>", names.join(","))
                    }
                    None => placeholder.to_string(),
                })
                .collect();
            output.push_str(&cells.join(" "));
            output.push('\n');
        }

        output
    }

    /// Render the tile index in each cell
    pub fn format_index_grid(grid: &TilingGrid, placeholder: &str) -> String {
        let mut output = String::new();

        for row in grid.rows() {
            let cells: Vec<String> = row
                .into_iter()
                .map(|cell| cell.map_or_else(|| placeholder.to_string(), |tile| tile.to_string()))
                .collect();
            output.push_str(&cells.join(" "));
            output.push('\n');
        }

        output
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    fn supports_color() -> bool {
        std::env::var_os("NO_COLOR").is_none()
            && std::env::var("TERM").map_or(true, |term| term != "dumb")
    }

    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
        }
    }
}
