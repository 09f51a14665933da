//! File I/O for tiling instances

use super::instance::{parse_instance_with_mode, Instance};
use crate::config::ParseMode;
use anyhow::{Context, Result};
use std::path::Path;

/// Load and parse an instance file
pub fn load_instance_from_file<P: AsRef<Path>>(path: P, mode: ParseMode) -> Result<Instance> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read instance file: {}", path.as_ref().display()))?;

    parse_instance_with_mode(&content, mode)
        .with_context(|| format!("Failed to parse instance file: {}", path.as_ref().display()))
}

/// Write a small example instance
pub fn create_example_instance<P: AsRef<Path>>(output_dir: P) -> Result<()> {
    let dir = output_dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    // Two tiles that checkerboard any k×k grid
    let content = "2\nred,green\n<red,green,red,green>\n<green,red,green,red>\n";
    std::fs::write(dir.join("checkerboard.txt"), content)
        .context("Failed to write checkerboard.txt")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_instance() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("instance.txt");
        std::fs::write(&path, "a,b\n<a,b,a,b>\n<a,b,c,d>\n").unwrap();

        let instance = load_instance_from_file(&path, ParseMode::Lenient).unwrap();
        assert_eq!(instance.num_tiles(), 1);

        let err = load_instance_from_file(&path, ParseMode::Strict).unwrap_err();
        assert!(format!("{:#}", err).contains("unknown colour 'c'"));
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = tempdir().unwrap();
        let result = load_instance_from_file(temp_dir.path().join("nope.txt"), ParseMode::Lenient);
        assert!(result.is_err());
    }

    #[test]
    fn test_create_example_instance() {
        let temp_dir = tempdir().unwrap();
        create_example_instance(temp_dir.path()).unwrap();

        let instance = load_instance_from_file(
            temp_dir.path().join("checkerboard.txt"),
            ParseMode::Strict,
        ).unwrap();
        assert_eq!(instance.num_tiles(), 2);
        assert_eq!(instance.declared_tile_count, Some(2));
    }
}
