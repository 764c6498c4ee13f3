//! Icon rasterization: a shaded disc on a transparent background.

use crate::Rgb;

/// Reference icon edge length; geometry below is expressed in this grid.
pub const ICON_SIZE: u32 = 64;

const OUTLINE: Rgb = Rgb(64, 64, 64);
const HIGHLIGHT_BOOST: u8 = 50;

/// Renders `color` as an RGBA disc with a dark rim and a highlight.
pub fn render_icon(color: Rgb, size: u32) -> Vec<u8> {
    let size = size.max(1);
    let scale = size as f32 / ICON_SIZE as f32;
    let center = size as f32 / 2.0;

    // Outer disc spans 4..60, rim is one reference pixel wide.
    let outer = (ICON_SIZE as f32 / 2.0 - 4.0) * scale;
    let rim = outer - scale.max(1.0);
    // Highlight disc spans 12..32.
    let highlight_center = 22.0 * scale;
    let highlight_radius = 10.0 * scale;
    let highlight = color.lighten(HIGHLIGHT_BOOST);

    let mut pixels = vec![0u8; (size * size * 4) as usize];
    for y in 0..size {
        for x in 0..size {
            let px = x as f32 + 0.5;
            let py = y as f32 + 0.5;
            let d = ((px - center).powi(2) + (py - center).powi(2)).sqrt();
            let dh = ((px - highlight_center).powi(2) + (py - highlight_center).powi(2)).sqrt();

            let paint = if d > outer {
                None
            } else if d > rim {
                Some(OUTLINE)
            } else if dh <= highlight_radius {
                Some(highlight)
            } else {
                Some(color)
            };

            if let Some(Rgb(r, g, b)) = paint {
                let i = ((y * size + x) * 4) as usize;
                pixels[i..i + 4].copy_from_slice(&[r, g, b, 255]);
            }
        }
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(buf: &[u8], size: u32, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * size + x) * 4) as usize;
        [buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]
    }

    #[test]
    fn buffer_has_rgba_size() {
        assert_eq!(render_icon(Rgb(0, 255, 0), 64).len(), 64 * 64 * 4);
        assert_eq!(render_icon(Rgb(0, 255, 0), 16).len(), 16 * 16 * 4);
    }

    #[test]
    fn corners_are_transparent_center_is_filled() {
        let buf = render_icon(Rgb(0, 200, 0), 64);
        assert_eq!(pixel(&buf, 64, 0, 0)[3], 0);
        assert_eq!(pixel(&buf, 64, 63, 63)[3], 0);
        assert_eq!(pixel(&buf, 64, 40, 40), [0, 200, 0, 255]);
    }

    #[test]
    fn highlight_and_rim() {
        let buf = render_icon(Rgb(200, 200, 0), 64);
        assert_eq!(pixel(&buf, 64, 22, 22), [250, 250, 50, 255]);
        // Leftmost painted pixel on the center row belongs to the rim.
        assert_eq!(pixel(&buf, 64, 4, 32), [64, 64, 64, 255]);
    }
}
