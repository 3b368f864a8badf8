//! Font resolution and glyph coverage.
//!
//! The rasterizer only sees two traits: a [`FontProvider`] that turns a font
//! name and size into a [`FontHandle`], and the handle itself, which reports
//! monospaced metrics and renders single-glyph coverage masks. [`SystemFonts`]
//! is the real provider: `fontdb` finds the face and `ab_glyph` draws it.
//! Tests substitute a fake with fixed metrics.

use std::fmt;
use std::path::{Path, PathBuf};

use ab_glyph::{point, Font, FontVec, InvalidFont, PxScale, ScaleFont};
use fontdb::{Database, FaceInfo, Family, Query, Source, Style, ID};

use super::error::RenderError;

/// Monospaced layout metrics in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphMetrics {
    /// Horizontal advance of every character
    pub advance: u32,
    /// Distance between baselines before line spacing is applied
    pub line_height: u32,
}

/// Coverage of one rendered glyph, positioned relative to its cell's
/// top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphMask {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
    /// Row-major coverage values in `0.0..=1.0`
    pub coverage: Vec<f32>,
}

impl GlyphMask {
    /// Coverage at `(x, y)` inside the mask.
    pub fn at(&self, x: u32, y: u32) -> f32 {
        self.coverage
            .get(y as usize * self.width as usize + x as usize)
            .copied()
            .unwrap_or(0.0)
    }
}

/// A font resolved at a specific pixel size.
pub trait FontHandle {
    fn metrics(&self) -> GlyphMetrics;

    /// Render `ch` into a coverage mask, or `None` for glyphs with no ink
    /// (spaces, unmapped characters).
    fn glyph_mask(&self, ch: char) -> Option<GlyphMask>;
}

/// Resolves font names to drawable fonts.
pub trait FontProvider {
    fn resolve(&self, name: &str, size: f32) -> Result<Box<dyn FontHandle>, RenderError>;
}

/// Finds fonts through a `fontdb` database.
///
/// A name that points at an existing file is loaded directly. Otherwise the
/// name is matched against the family names stored inside each font, first
/// exactly and then ignoring case, spaces, hyphens and underscores, so
/// `"dejavu-sans-mono"` finds DejaVu Sans Mono whatever its file is called.
/// `monospace`, `serif` and `sans-serif` resolve through fontdb's generic
/// families; `monospace` falls back to any monospaced face.
pub struct SystemFonts {
    db: Database,
}

impl fmt::Debug for SystemFonts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemFonts")
            .field("faces", &self.db.len())
            .finish()
    }
}

impl Default for SystemFonts {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemFonts {
    /// Provider over the fonts installed on this system.
    pub fn new() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        log::debug!("loaded {} system font faces", db.len());
        Self { db }
    }

    /// Provider over the fonts found in `dirs` (searched recursively).
    pub fn with_dirs<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut db = Database::new();
        for dir in dirs {
            db.load_fonts_dir(dir);
        }
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Look up the face for a family name without loading it.
    pub fn find(&self, name: &str) -> Option<ID> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        if let Some(family) = generic_family(name) {
            let found = self.db.query(&Query {
                families: &[family],
                ..Query::default()
            });
            return match family {
                Family::Monospace => found.or_else(|| self.best_face(|face| face.monospaced)),
                _ => found,
            };
        }

        let exact = self.db.query(&Query {
            families: &[Family::Name(name)],
            ..Query::default()
        });
        exact.or_else(|| {
            let wanted = normalize_font_name(name);
            if wanted.is_empty() {
                return None;
            }
            self.best_face(|face| {
                face.families
                    .iter()
                    .any(|(family, _)| normalize_font_name(family) == wanted)
                    || normalize_font_name(&face.post_script_name) == wanted
            })
        })
    }

    /// Regular upright faces win over bold or italic ones.
    fn best_face<F>(&self, matches: F) -> Option<ID>
    where
        F: Fn(&FaceInfo) -> bool,
    {
        self.db
            .faces()
            .filter(|face| matches(face))
            .min_by_key(|face| (face.style != Style::Normal, face.weight.0.abs_diff(400)))
            .map(|face| face.id)
    }

    fn load_face(&self, id: ID, size: f32) -> Result<OutlineFont, RenderError> {
        let origin = self.db.face(id).map(face_origin).unwrap_or_default();
        let loaded = self
            .db
            .with_face_data(id, |data, index| OutlineFont::from_bytes(data.to_vec(), index, size));

        match loaded {
            Some(Ok(font)) => Ok(font),
            Some(Err(e)) => Err(RenderError::FontLoad {
                path: origin,
                reason: e.to_string(),
            }),
            None => Err(RenderError::FontLoad {
                path: origin,
                reason: "font data is not available".to_string(),
            }),
        }
    }
}

impl FontProvider for SystemFonts {
    fn resolve(&self, name: &str, size: f32) -> Result<Box<dyn FontHandle>, RenderError> {
        let direct = Path::new(name);
        let font = if direct.is_file() {
            OutlineFont::load(direct, size)?
        } else {
            let id = self.find(name).ok_or_else(|| RenderError::FontNotFound {
                name: name.to_string(),
            })?;
            self.load_face(id, size)?
        };
        Ok(Box::new(font))
    }
}

/// Lowercase alphanumerics only.
pub fn normalize_font_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

fn generic_family(name: &str) -> Option<Family<'static>> {
    match normalize_font_name(name).as_str() {
        "monospace" | "mono" => Some(Family::Monospace),
        "serif" => Some(Family::Serif),
        "sansserif" | "sans" => Some(Family::SansSerif),
        _ => None,
    }
}

/// Where a face came from, for error messages.
fn face_origin(face: &FaceInfo) -> PathBuf {
    match &face.source {
        Source::File(path) | Source::SharedFile(path, _) => path.clone(),
        Source::Binary(_) => PathBuf::from(&face.post_script_name),
    }
}

/// An outline font loaded at a fixed pixel size.
pub struct OutlineFont {
    font: FontVec,
    scale: PxScale,
}

impl OutlineFont {
    /// Load a TrueType/OpenType file (the first face of a collection).
    pub fn load(path: &Path, size: f32) -> Result<Self, RenderError> {
        let bytes = std::fs::read(path).map_err(|e| RenderError::FontLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_bytes(bytes, 0, size).map_err(|e| RenderError::FontLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Parse face `index` of font data already in memory.
    pub fn from_bytes(bytes: Vec<u8>, index: u32, size: f32) -> Result<Self, InvalidFont> {
        let font = FontVec::try_from_vec_and_index(bytes, index)?;
        Ok(Self {
            font,
            scale: PxScale::from(size),
        })
    }
}

impl FontHandle for OutlineFont {
    fn metrics(&self) -> GlyphMetrics {
        let scaled = self.font.as_scaled(self.scale);
        // Monospace: every glyph shares the advance of a reference glyph
        let advance = scaled.h_advance(self.font.glyph_id('M')).ceil();
        let line_height = (scaled.ascent() - scaled.descent() + scaled.line_gap()).ceil();
        GlyphMetrics {
            advance: (advance as u32).max(1),
            line_height: (line_height as u32).max(1),
        }
    }

    fn glyph_mask(&self, ch: char) -> Option<GlyphMask> {
        let scaled = self.font.as_scaled(self.scale);
        let glyph = scaled
            .glyph_id(ch)
            .with_scale_and_position(self.scale, point(0.0, scaled.ascent()));
        let outlined = self.font.outline_glyph(glyph)?;

        let bounds = outlined.px_bounds();
        let width = bounds.width().ceil() as u32;
        let height = bounds.height().ceil() as u32;
        if width == 0 || height == 0 {
            return None;
        }

        let mut coverage = vec![0.0f32; width as usize * height as usize];
        outlined.draw(|x, y, c| {
            if x < width && y < height {
                coverage[y as usize * width as usize + x as usize] = c.clamp(0.0, 1.0);
            }
        });

        Some(GlyphMask {
            left: bounds.min.x.floor() as i32,
            top: bounds.min.y.floor() as i32,
            width,
            height,
            coverage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A font file installed on this machine and its first family name.
    fn installed_font() -> Option<(PathBuf, String)> {
        let system = SystemFonts::new();
        let found = system.database().faces().find_map(|face| match &face.source {
            Source::File(path) | Source::SharedFile(path, _) if face.index == 0 => face
                .families
                .first()
                .map(|(family, _)| (path.clone(), family.clone())),
            _ => None,
        });
        found
    }

    #[test]
    fn normalize_strips_separators_and_case() {
        assert_eq!(normalize_font_name("DejaVu Sans-Mono_Bold"), "dejavusansmonobold");
        assert_eq!(normalize_font_name(" - "), "");
    }

    #[test]
    fn generic_names() {
        assert_eq!(generic_family("monospace"), Some(Family::Monospace));
        assert_eq!(generic_family("Sans-Serif"), Some(Family::SansSerif));
        assert_eq!(generic_family("serif"), Some(Family::Serif));
        assert_eq!(generic_family("Menlo"), None);
    }

    #[test]
    fn empty_name_finds_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let fonts = SystemFonts::with_dirs([dir.path()]);
        assert_eq!(fonts.find(""), None);
        assert_eq!(fonts.find(" - "), None);
    }

    #[test]
    fn resolve_unknown_font_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let fonts = SystemFonts::with_dirs([dir.path()]);
        let err = fonts.resolve("NoSuchFont", 12.0).err().unwrap();
        assert_eq!(
            err,
            RenderError::FontNotFound {
                name: "NoSuchFont".to_string()
            }
        );
    }

    #[test]
    fn unparsable_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Broken.ttf"), b"definitely not a font").unwrap();

        let fonts = SystemFonts::with_dirs([dir.path()]);
        assert_eq!(fonts.database().len(), 0);
        assert!(matches!(
            fonts.resolve("broken", 12.0).err(),
            Some(RenderError::FontNotFound { .. })
        ));
    }

    #[test]
    fn resolve_direct_path_to_garbage_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("whatever.ttf");
        std::fs::write(&path, b"junk").unwrap();

        let fonts = SystemFonts::with_dirs(Vec::<PathBuf>::new());
        let err = fonts
            .resolve(path.to_str().unwrap(), 12.0)
            .err()
            .unwrap();
        assert!(matches!(err, RenderError::FontLoad { path: p, .. } if p == path));
    }

    #[test]
    fn from_bytes_rejects_garbage() {
        assert!(OutlineFont::from_bytes(b"nope".to_vec(), 0, 12.0).is_err());
    }

    #[test]
    fn family_name_is_found_whatever_the_file_is_called() {
        let Some((source, family)) = installed_font() else {
            eprintln!("no fonts installed; skipping");
            return;
        };
        let dir = tempfile::tempdir().unwrap();
        let ext = source
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("ttf")
            .to_string();
        std::fs::copy(&source, dir.path().join(format!("renamed.{}", ext))).unwrap();

        let fonts = SystemFonts::with_dirs([dir.path()]);
        assert!(fonts.find(&family).is_some(), "family {:?}", family);

        let loose = family.to_uppercase().replace(' ', "-");
        assert!(fonts.find(&loose).is_some(), "loose name {:?}", loose);

        let handle = fonts.resolve(&family, 14.0).unwrap();
        let metrics = handle.metrics();
        assert!(metrics.advance > 0 && metrics.line_height > 0);
    }

    #[test]
    fn monospace_resolves_when_a_monospaced_face_exists() {
        let system = SystemFonts::new();
        if !system.database().faces().any(|face| face.monospaced) {
            eprintln!("no monospaced fonts installed; skipping");
            return;
        }
        assert!(system.find("monospace").is_some());
    }
}
