//! End-to-end tests: ASCII art rendered to an image and read back.
//!
//! The block font inks a share of each cell that follows the character's
//! position in the standard ramp, so with an aspect correction matching the
//! cell shape the quantizer should recover the original art.

mod common;

use asciivision::app::text_to_image;
use asciivision::ascii::{quantize, Quantizer, STANDARD_CHARSET};
use asciivision::codec;
use asciivision::raster::{ColorModel, RasterImage};
use asciivision::text::{rasterize, RenderStyle, TextDocument};
use common::{BlockFont, BlockFonts};

const ADVANCE: u32 = 9;
const LINE_HEIGHT: u32 = 18;

fn fonts() -> BlockFonts {
    BlockFonts(BlockFont::new(ADVANCE, LINE_HEIGHT))
}

fn unpadded() -> RenderStyle {
    RenderStyle {
        padding: 0,
        ..RenderStyle::default()
    }
}

fn matched_quantizer() -> Quantizer {
    Quantizer::new()
        .with_aspect_correction(ADVANCE as f32 / LINE_HEIGHT as f32)
        .unwrap()
}

/// Right-pad every line to the longest one.
fn padded(lines: &[&str]) -> Vec<String> {
    let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    lines
        .iter()
        .map(|l| format!("{:<width$}", l, width = width))
        .collect()
}

fn roundtrip(lines: &[&str]) -> Vec<String> {
    let doc: TextDocument = lines.iter().copied().collect();
    let image = rasterize(&doc, &unpadded(), &fonts()).unwrap();
    let columns = doc.max_line_chars();
    let grid = matched_quantizer().quantize(&image, columns).unwrap();
    grid.lines()
}

#[test]
fn test_roundtrip_preserves_line_count_and_width() {
    let art = ["  /\\_/\\  ", " ( o.o ) ", "  > ^ <  ", "", " cat"];
    let back = roundtrip(&art);
    assert_eq!(back.len(), art.len());
    assert!(back.iter().all(|l| l.chars().count() == 9));
}

#[test]
fn test_roundtrip_recovers_ramp_characters() {
    let art = ["@%#*+=-:. ", " .:-=+*#%@", "@@@@  @@@@"];
    assert_eq!(roundtrip(&art), padded(&art));
}

#[test]
fn test_roundtrip_recovers_shapes() {
    let art = [
        "   @@@@   ",
        "  @    @  ",
        " @  ##  @ ",
        "  @    @  ",
        "   @@@@",
    ];
    assert_eq!(roundtrip(&art), padded(&art));
}

#[test]
fn test_roundtrip_every_ramp_level() {
    for &ch in STANDARD_CHARSET {
        let line = ch.to_string().repeat(3);
        let art = [line.as_str(), line.as_str()];
        assert_eq!(roundtrip(&art), padded(&art), "character {:?}", ch);
    }
}

#[test]
fn test_density_follows_ink() {
    // Half the cells inked: the dark half must map to darker characters
    let doc: TextDocument = ["@@@@@@@@        "; 4].into_iter().collect();
    let image = rasterize(&doc, &RenderStyle::default(), &fonts()).unwrap();
    let grid = quantize(&image, 8).unwrap();

    let dark_index = |ch: char| STANDARD_CHARSET.iter().position(|&c| c == ch).unwrap();
    for row in grid.iter_rows() {
        let left: usize = row[..2].iter().map(|&c| dark_index(c)).sum();
        let right: usize = row[6..].iter().map(|&c| dark_index(c)).sum();
        assert!(left <= right, "row {:?}", row.iter().collect::<String>());
    }
}

#[test]
fn test_single_column_roundtrip() {
    let back = roundtrip(&["@", " ", "@"]);
    assert_eq!(back, vec!["@", " ", "@"]);
}

#[test]
fn test_roundtrip_through_png_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("art.png");

    let text = "@@  \n  @@\n";
    let image = text_to_image(text, &unpadded(), &fonts()).unwrap();
    codec::save(&image, &path).unwrap();

    let loaded = codec::load(&path).unwrap();
    assert_eq!(loaded.model(), ColorModel::Rgb);
    assert_eq!(loaded, image);

    let grid = matched_quantizer().quantize(&loaded, 4).unwrap();
    assert_eq!(grid.to_string(), "@@  \n  @@");
}

#[test]
fn test_quantize_rgba_render() {
    let style = RenderStyle {
        background: asciivision::text::Color::TRANSPARENT,
        ..unpadded()
    };
    let doc: TextDocument = ["@ "].into_iter().collect();
    let image = rasterize(&doc, &style, &fonts()).unwrap();
    assert_eq!(image.model(), ColorModel::Rgba);

    // Transparent black reads as black: alpha is ignored
    let grid = matched_quantizer().quantize(&image, 2).unwrap();
    assert_eq!(grid.to_string(), "@@");
}

#[test]
fn test_quantize_solid_images() {
    let white = RasterImage::filled(40, 20, ColorModel::Rgb, &[255, 255, 255]);
    let black = RasterImage::filled(40, 20, ColorModel::Rgb, &[0, 0, 0]);
    let w = quantize(&white, 10).unwrap();
    let b = quantize(&black, 10).unwrap();
    assert!(w.to_string().chars().all(|c| c == ' ' || c == '\n'));
    assert!(b.to_string().chars().all(|c| c == '@' || c == '\n'));
    assert_eq!(w.rows(), b.rows());
}

#[test]
fn test_transparent_render_saved_without_alpha_keeps_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("art.bmp");

    let style = RenderStyle {
        background: asciivision::text::Color::TRANSPARENT,
        ..unpadded()
    };
    let image = text_to_image("@ \n @\n", &style, &fonts()).unwrap();
    assert_eq!(image.model(), ColorModel::Rgba);
    codec::save(&image, &path).unwrap();

    let loaded = codec::load(&path).unwrap();
    assert_eq!(loaded.model(), ColorModel::Rgb);
    let grid = matched_quantizer().quantize(&loaded, 2).unwrap();
    assert_eq!(grid.to_string(), "@ \n @");
}
