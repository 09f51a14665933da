//! Tiling instance representation and text parser

use crate::config::ParseMode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Positive colour identifier, assigned from 1 in declaration order
pub type ColorId = u32;

/// A square tile with four coloured edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub top: ColorId,
    pub right: ColorId,
    pub bottom: ColorId,
    pub left: ColorId,
}

impl Tile {
    pub fn new(top: ColorId, right: ColorId, bottom: ColorId, left: ColorId) -> Self {
        Self { top, right, bottom, left }
    }

    /// Edge colours in `(top, right, bottom, left)` order
    pub fn edges(&self) -> [ColorId; 4] {
        [self.top, self.right, self.bottom, self.left]
    }

    /// Whether `other` may sit directly to the right of this tile
    pub fn matches_right(&self, other: &Tile) -> bool {
        self.right == other.left
    }

    /// Whether `other` may sit directly below this tile
    pub fn matches_bottom(&self, other: &Tile) -> bool {
        self.bottom == other.top
    }
}

/// Errors raised by the parser in strict mode
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: expected 4 colours, found {found}")]
    WrongTokenCount { line: usize, found: usize },

    #[error("line {line}: unknown colour '{color}'")]
    UnknownColor { line: usize, color: String },
}

/// A parsed edge-matching problem: colour table plus ordered tile catalogue
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    /// Colour name to colour ID
    pub colors: HashMap<String, ColorId>,
    /// Tiles in file order; the position is the tile index
    pub tiles: Vec<Tile>,
    /// Tile-count hint from the first line, if present
    pub declared_tile_count: Option<usize>,
    /// Declared colour tokens, indexed by `id - 1`
    color_names: Vec<String>,
}

impl Instance {
    /// Build an instance directly from colour names and tiles (IDs follow `names` order)
    pub fn from_parts(names: &[&str], tiles: Vec<Tile>) -> Self {
        let mut instance = Self::default();
        instance.declare_colors(names.iter().copied());
        instance.tiles = tiles;
        instance
    }

    pub fn num_tiles(&self) -> usize {
        self.tiles.len()
    }

    pub fn num_colors(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty() && self.tiles.is_empty()
    }

    pub fn tile(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    pub fn color_id(&self, name: &str) -> Option<ColorId> {
        self.colors.get(name).copied()
    }

    /// Resolve a colour ID back to the token that declared it
    pub fn color_name(&self, id: ColorId) -> Option<&str> {
        let index = (id as usize).checked_sub(1)?;
        self.color_names.get(index).map(String::as_str)
    }

    fn declare_colors<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        for name in names {
            self.color_names.push(name.to_string());
            // Duplicates collapse onto the last-assigned ID
            self.colors.insert(name.to_string(), self.color_names.len() as ColorId);
        }
    }
}

/// Split on commas and/or whitespace, dropping empty tokens
fn tokens(line: &str) -> Vec<&str> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .collect()
}

fn strip_brackets(line: &str) -> &str {
    match line.strip_prefix('<').and_then(|rest| rest.strip_suffix('>')) {
        Some(inner) => inner.trim(),
        None => line,
    }
}

/// A first line holding one whitespace-delimited, all-digit token
fn is_count_hint(line: &str) -> bool {
    let mut words = line.split_whitespace();
    match (words.next(), words.next()) {
        (Some(word), None) => word.chars().all(|c| c.is_ascii_digit()),
        _ => false,
    }
}

/// Parse an instance, dropping malformed tile lines
pub fn parse_instance(raw: &str) -> Instance {
    parse_instance_with_mode(raw, ParseMode::Lenient).unwrap_or_default()
}

/// Parse an instance, rejecting it on the first malformed tile line
pub fn parse_instance_strict(raw: &str) -> Result<Instance, ParseError> {
    parse_instance_with_mode(raw, ParseMode::Strict)
}

/// Parse an instance with the given tile-line policy
pub fn parse_instance_with_mode(raw: &str, mode: ParseMode) -> Result<Instance, ParseError> {
    // (1-based source line, trimmed content)
    let mut lines = raw
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .peekable();

    let mut instance = Instance::default();

    if let Some(&(_, first)) = lines.peek() {
        if is_count_hint(first) {
            // Too large for usize still counts as a hint, just not a usable one
            instance.declared_tile_count = first.parse().ok();
            lines.next();
        }
    }

    let Some((_, colour_line)) = lines.next() else {
        return Ok(instance);
    };
    instance.declare_colors(tokens(colour_line));

    for (line_no, line) in lines {
        let parts = tokens(strip_brackets(line));

        if parts.len() != 4 {
            if mode == ParseMode::Strict {
                return Err(ParseError::WrongTokenCount { line: line_no, found: parts.len() });
            }
            debug!("Skipping line {}: expected 4 colours, found {}", line_no, parts.len());
            continue;
        }

        let mut ids = [0 as ColorId; 4];
        let mut unknown = None;
        for (slot, part) in ids.iter_mut().zip(&parts) {
            match instance.color_id(part) {
                Some(id) => *slot = id,
                None => {
                    unknown = Some(*part);
                    break;
                }
            }
        }

        if let Some(color) = unknown {
            if mode == ParseMode::Strict {
                return Err(ParseError::UnknownColor { line: line_no, color: color.to_string() });
            }
            debug!("Skipping line {}: unknown colour '{}'", line_no, color);
            continue;
        }

        let [top, right, bottom, left] = ids;
        instance.tiles.push(Tile::new(top, right, bottom, left));
    }

    if let Some(hint) = instance.declared_tile_count {
        if hint != instance.tiles.len() {
            warn!(
                "Instance declares {} tiles but {} were accepted",
                hint,
                instance.tiles.len()
            );
        }
    }

    Ok(instance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(parse_instance("").is_empty());
        assert!(parse_instance("  \n\n   \n").is_empty());
        assert!(parse_instance("3\n").is_empty());
    }

    #[test]
    fn test_basic_parse() {
        let raw = "2\nred, green blue\n<red,green,blue,red>\ngreen green green green\n";
        let instance = parse_instance(raw);

        assert_eq!(instance.color_id("red"), Some(1));
        assert_eq!(instance.color_id("green"), Some(2));
        assert_eq!(instance.color_id("blue"), Some(3));
        assert_eq!(instance.declared_tile_count, Some(2));
        assert_eq!(instance.tiles, vec![Tile::new(1, 2, 3, 1), Tile::new(2, 2, 2, 2)]);
    }

    #[test]
    fn test_colour_line_without_hint() {
        let instance = parse_instance("a b\n<a,b,a,b>\n");
        assert_eq!(instance.declared_tile_count, None);
        assert_eq!(instance.num_colors(), 2);
        assert_eq!(instance.tiles, vec![Tile::new(1, 2, 1, 2)]);
    }

    #[test]
    fn test_numeric_colour_line_is_not_a_hint_when_multiple_tokens() {
        let instance = parse_instance("1 2\n<1,2,1,2>\n");
        assert_eq!(instance.declared_tile_count, None);
        assert_eq!(instance.color_id("1"), Some(1));
        assert_eq!(instance.num_tiles(), 1);
    }

    #[test]
    fn test_oversized_hint_is_still_skipped() {
        let instance = parse_instance("99999999999999999999999\nR G\n<R,G,R,G>\n");
        assert_eq!(instance.declared_tile_count, None);
        assert_eq!(instance.color_id("R"), Some(1));
        assert_eq!(instance.tiles, vec![Tile::new(1, 2, 1, 2)]);
    }

    #[test]
    fn test_hint_with_comma_is_a_colour_line() {
        // "3," is one whitespace token but not all digits
        let instance = parse_instance("3,\nR G\n<R,G,R,G>\n");
        assert_eq!(instance.declared_tile_count, None);
        assert_eq!(instance.color_id("3"), Some(1));
        assert_eq!(instance.num_colors(), 1);
        assert!(instance.tiles.is_empty());
    }

    #[test]
    fn test_duplicate_colours_take_last_id() {
        let instance = parse_instance("red,green,red\n<red,green,red,green>\n");
        assert_eq!(instance.color_id("red"), Some(3));
        assert_eq!(instance.color_id("green"), Some(2));
        assert_eq!(instance.tiles[0], Tile::new(3, 2, 3, 2));
        assert_eq!(instance.color_name(3), Some("red"));
        assert_eq!(instance.color_name(1), Some("red"));
    }

    #[test]
    fn test_lenient_skips_malformed_lines() {
        let raw = "r g\n<r,g,r>\n<r,g,r,x>\n<r,g,r,g,r>\n<g,g,g,g>\n";
        let instance = parse_instance(raw);
        assert_eq!(instance.tiles, vec![Tile::new(2, 2, 2, 2)]);
    }

    #[test]
    fn test_strict_reports_line_numbers() {
        let raw = "r g\n\n<r,g,r,g>\n<r,g,r>\n";
        assert_eq!(
            parse_instance_strict(raw),
            Err(ParseError::WrongTokenCount { line: 4, found: 3 })
        );

        let raw = "4\nr g\n<r,g,r,blue>\n";
        assert_eq!(
            parse_instance_strict(raw),
            Err(ParseError::UnknownColor { line: 3, color: "blue".to_string() })
        );
    }

    #[test]
    fn test_strict_accepts_clean_instance() {
        let instance = parse_instance_strict("r g\n<r,g,r,g>\n").unwrap();
        assert_eq!(instance.num_tiles(), 1);
    }

    #[test]
    fn test_brackets_only_stripped_in_pairs() {
        // A lone '<' stays glued to the first token, which is then unknown
        let instance = parse_instance("r g\n<r,g,r,g\n");
        assert!(instance.tiles.is_empty());
    }

    #[test]
    fn test_tile_edge_matching() {
        let a = Tile::new(1, 2, 3, 4);
        let b = Tile::new(3, 1, 1, 2);
        assert!(a.matches_right(&b));
        assert!(a.matches_bottom(&b));
        assert!(!b.matches_right(&a));
        assert_eq!(a.edges(), [1, 2, 3, 4]);
    }
}
