use crate::braille::BrailleCanvas;
use ratatui::style::Color;

/// Draw a line using Bresenham's algorithm
pub fn draw_line(canvas: &mut BrailleCanvas, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        canvas.set_pixel_signed(x, y, color);

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;

        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }

        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}

/// Collect the x crossings of a polygon's rings with the horizontal line at
/// `y` into `out`, sorted ascending. Even-odd rule: consecutive pairs bound
/// the interior spans, so holes fall out for free.
///
/// Rings are closed implicitly (last point connects back to the first).
pub fn scanline_crossings(rings: &[Vec<(f64, f64)>], y: f64, out: &mut Vec<f64>) {
    out.clear();
    for ring in rings {
        if ring.len() < 3 {
            continue;
        }
        let mut prev = ring[ring.len() - 1];
        for &cur in ring {
            // Half-open test so a vertex exactly on the line counts once
            if (prev.1 <= y) != (cur.1 <= y) {
                let t = (y - prev.1) / (cur.1 - prev.1);
                out.push(prev.0 + t * (cur.0 - prev.0));
            }
            prev = cur;
        }
    }
    out.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
}

/// Even-odd point-in-polygon test over a polygon's rings (exterior + holes).
pub fn point_in_rings(rings: &[Vec<(f64, f64)>], x: f64, y: f64) -> bool {
    let mut inside = false;
    for ring in rings {
        if ring.len() < 3 {
            continue;
        }
        let mut prev = ring[ring.len() - 1];
        for &cur in ring {
            if (prev.1 <= y) != (cur.1 <= y) {
                let t = (y - prev.1) / (cur.1 - prev.1);
                if x < prev.0 + t * (cur.0 - prev.0) {
                    inside = !inside;
                }
            }
            prev = cur;
        }
    }
    inside
}
