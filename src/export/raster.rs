use super::{ExportError, ScheduleGrid, NURSE_HEADER};
use crate::model::Shift;
use ab_glyph::{point, Font, FontVec, PxScale, ScaleFont};
use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::path::Path;

pub const PNG_MIME: &str = "image/png";
pub const LEGEND_MIME: &str = "text/plain;charset=utf-8";

const SCALE: u32 = 2;
const NAME_W: u32 = 64;
const CELL_W: u32 = 32;
const CELL_H: u32 = 16;
const BLOCK_GAP: u32 = 8;
const GLYPH_ADVANCE: u32 = 6;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const GRID_LINE: Rgb<u8> = Rgb([203, 213, 225]);
const HEADER: Rgb<u8> = Rgb([166, 218, 244]);
const NAME_CELL: Rgb<u8> = Rgb([241, 245, 249]);
const INK: Rgb<u8> = Rgb([51, 65, 85]);

/// Police optionnelle pour les noms ; sans elle les lignes sont numérotées.
#[derive(Default)]
pub struct ImageStyle {
    font: Option<FontVec>,
}

impl ImageStyle {
    pub fn with_font_bytes(bytes: Vec<u8>) -> Result<Self, ExportError> {
        let font = FontVec::try_from_vec(bytes).map_err(|e| ExportError::Font(e.to_string()))?;
        Ok(Self { font: Some(font) })
    }

    pub fn from_font_file<P: AsRef<Path>>(path: P) -> Result<Self, ExportError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::with_font_bytes(bytes)
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }
}

impl std::fmt::Debug for ImageStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageStyle")
            .field("font", &self.has_font())
            .finish()
    }
}

fn shift_fill(shift: Option<Shift>) -> Rgb<u8> {
    match shift {
        Some(Shift::Day) => Rgb([254, 243, 199]),
        Some(Shift::Evening) => Rgb([254, 215, 170]),
        Some(Shift::Night) => Rgb([199, 210, 254]),
        Some(Shift::Off) => Rgb([226, 232, 240]),
        None => BACKGROUND,
    }
}

/// Glyphes 5×7, une ligne par octet (bit 4 = colonne de gauche).
fn glyph(c: char) -> Option<[u8; 7]> {
    let rows = match c {
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'N' => [0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        '-' => [0, 0, 0, 0b01110, 0, 0, 0],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        _ => return None,
    };
    Some(rows)
}

/// Canevas en coordonnées logiques, multipliées par `SCALE` à l'écriture.
struct Canvas {
    img: RgbImage,
}

impl Canvas {
    fn new(width: u32, height: u32) -> Self {
        Self {
            img: RgbImage::from_pixel(width * SCALE, height * SCALE, BACKGROUND),
        }
    }

    fn fill(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
        let (w_px, h_px) = self.img.dimensions();
        for py in (y * SCALE)..((y + h) * SCALE).min(h_px) {
            for px in (x * SCALE)..((x + w) * SCALE).min(w_px) {
                self.img.put_pixel(px, py, color);
            }
        }
    }

    fn cell(&mut self, x: u32, y: u32, w: u32, color: Rgb<u8>) {
        self.fill(x, y, w, CELL_H, GRID_LINE);
        self.fill(x + 1, y + 1, w - 1, CELL_H - 1, color);
    }

    /// Texte en glyphes bitmap, centré dans la case ; les caractères inconnus sont ignorés.
    fn text(&mut self, x: u32, y: u32, w: u32, label: &str) {
        let glyphs: Vec<[u8; 7]> = label.chars().filter_map(glyph).collect();
        if glyphs.is_empty() {
            return;
        }
        let text_w = glyphs.len() as u32 * GLYPH_ADVANCE - 1;
        let mut cx = x + w.saturating_sub(text_w) / 2;
        let cy = y + (CELL_H - 7) / 2;
        for rows in glyphs {
            for (dy, bits) in rows.iter().enumerate() {
                for dx in 0..5u32 {
                    if bits & (1 << (4 - dx)) != 0 {
                        self.fill(cx + dx, cy + dy as u32, 1, 1, INK);
                    }
                }
            }
            cx += GLYPH_ADVANCE;
        }
    }

    /// Texte vectoriel (noms en hangeul), rastérisé directement en pixels et rogné à la case.
    fn text_with_font(&mut self, font: &FontVec, x: u32, y: u32, w: u32, label: &str) {
        let scaled = font.as_scaled(PxScale::from((CELL_H * SCALE) as f32 * 0.7));
        let text_w: f32 = label
            .chars()
            .map(|c| scaled.h_advance(scaled.glyph_id(c)))
            .sum();
        let (left, right) = (x * SCALE, (x + w) * SCALE);
        let (top, bottom) = (y * SCALE, (y + CELL_H) * SCALE);
        let start = left as f32 + ((right - left) as f32 - text_w).max(4.0) / 2.0;
        let baseline = top as f32 + ((bottom - top) as f32 + scaled.ascent() + scaled.descent()) / 2.0;

        let mut caret = point(start, baseline);
        for c in label.chars() {
            let mut g = scaled.scaled_glyph(c);
            g.position = caret;
            caret.x += scaled.h_advance(g.id);
            let Some(outlined) = font.outline_glyph(g) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let px = bounds.min.x as i64 + i64::from(gx);
                let py = bounds.min.y as i64 + i64::from(gy);
                if px < i64::from(left) + 1 || px >= i64::from(right) || py <= i64::from(top) || py >= i64::from(bottom) {
                    return;
                }
                self.blend(px as u32, py as u32, coverage);
            });
        }
    }

    fn blend(&mut self, px: u32, py: u32, coverage: f32) {
        let a = coverage.clamp(0.0, 1.0);
        let dst = self.img.get_pixel_mut(px, py);
        for (d, s) in dst.0.iter_mut().zip(INK.0) {
            *d = (f32::from(s) * a + f32::from(*d) * (1.0 - a)).round() as u8;
        }
    }
}

/// Libellé de colonne, lisible en glyphes bitmap (`MM-DD`).
fn column_label(date: chrono::NaiveDate) -> String {
    date.format("%m-%d").to_string()
}

/// Rastérise la grille (blocs de 7 jours empilés) en PNG.
pub fn to_png_bytes(grid: &ScheduleGrid<'_>, style: &ImageStyle) -> Result<Vec<u8>, ExportError> {
    let weeks: Vec<_> = grid.weeks().collect();
    let widest = weeks.iter().map(|w| w.len() as u32).max().unwrap_or(0);
    let rows = grid.nurses().len() as u32 + 1;
    let block_h = rows * CELL_H;
    let blocks = (weeks.len() as u32).max(1);
    let width = NAME_W + widest * CELL_W + 1;
    let height = blocks * block_h + (blocks - 1) * BLOCK_GAP + 1;

    let mut canvas = Canvas::new(width, height);
    for (b, week) in weeks.iter().enumerate() {
        let top = b as u32 * (block_h + BLOCK_GAP);
        canvas.cell(0, top, NAME_W, HEADER);
        if let Some(font) = &style.font {
            canvas.text_with_font(font, 0, top, NAME_W, NURSE_HEADER);
        }
        for (c, date) in week.iter().enumerate() {
            let x = NAME_W + c as u32 * CELL_W;
            canvas.cell(x, top, CELL_W, HEADER);
            canvas.text(x, top, CELL_W, &column_label(*date));
        }
        for (r, nurse) in grid.nurses().iter().enumerate() {
            let y = top + (r as u32 + 1) * CELL_H;
            canvas.cell(0, y, NAME_W, NAME_CELL);
            match &style.font {
                Some(font) => canvas.text_with_font(font, 0, y, NAME_W, nurse),
                None => canvas.text(0, y, NAME_W, &(r + 1).to_string()),
            }
            for (c, date) in week.iter().enumerate() {
                let x = NAME_W + c as u32 * CELL_W;
                canvas.cell(x, y, CELL_W, shift_fill(grid.shift(nurse, *date)));
                canvas.text(x, y, CELL_W, grid.cell(nurse, *date));
            }
        }
    }

    let mut out = Cursor::new(Vec::new());
    canvas.img.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

/// Correspondance numéro de ligne → nom, pour une image rendue sans police.
pub fn legend_text(grid: &ScheduleGrid<'_>) -> String {
    grid.nurses()
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{}. {name}\n", i + 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScheduleResponse;
    use chrono::NaiveDate;

    fn sample() -> ScheduleResponse {
        serde_json::from_str(r#"[{"date":"2025-03-01","nurses":{"하나":"off","가람":"day"}}]"#)
            .unwrap()
    }

    fn render(response: &ScheduleResponse, days: u32) -> RgbImage {
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 3, days).unwrap();
        let grid = ScheduleGrid::new(response, vec!["하나".into(), "가람".into()], start, end);
        let bytes = to_png_bytes(&grid, &ImageStyle::default()).unwrap();
        image::load_from_memory_with_format(&bytes, ImageFormat::Png)
            .unwrap()
            .to_rgb8()
    }

    fn has_ink(img: &RgbImage, x: u32, y: u32, w: u32) -> bool {
        ((y * SCALE)..((y + CELL_H) * SCALE))
            .any(|py| ((x * SCALE)..((x + w) * SCALE)).any(|px| *img.get_pixel(px, py) == INK))
    }

    #[test]
    fn png_dimensions_follow_grid_shape() {
        let img = render(&sample(), 10);
        let expected_w = (NAME_W + 7 * CELL_W + 1) * SCALE;
        let expected_h = (2 * 3 * CELL_H + BLOCK_GAP + 1) * SCALE;
        assert_eq!(img.dimensions(), (expected_w, expected_h));
    }

    #[test]
    fn header_band_carries_dates() {
        let img = render(&sample(), 3);
        for c in 0..3 {
            assert!(has_ink(&img, NAME_W + c * CELL_W, 0, CELL_W), "blank header for column {c}");
        }
    }

    #[test]
    fn rows_are_numbered_without_font() {
        let img = render(&sample(), 1);
        assert!(has_ink(&img, 0, CELL_H, NAME_W));
        assert!(has_ink(&img, 0, 2 * CELL_H, NAME_W));
    }

    #[test]
    fn legend_maps_numbers_to_names() {
        let response = sample();
        let day = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let grid = ScheduleGrid::new(&response, vec!["하나".into(), "가람".into()], day, day);
        assert_eq!(legend_text(&grid), "1. 하나\n2. 가람\n");
    }

    #[test]
    fn garbage_font_is_rejected() {
        let err = ImageStyle::with_font_bytes(b"not a font".to_vec()).unwrap_err();
        assert!(matches!(err, ExportError::Font(_)));
    }

    #[test]
    fn digits_and_dash_have_glyphs() {
        assert!("0123456789-".chars().all(|c| glyph(c).is_some()));
        assert!(glyph('월').is_none());
    }
}
