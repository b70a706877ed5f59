use crate::braille::BrailleCanvas;

/// Bresenham line between two pixel positions, endpoints included
pub fn draw_line(canvas: &mut BrailleCanvas, from: (i32, i32), to: (i32, i32)) {
    let (mut x, mut y) = from;
    let (x1, y1) = to;
    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let step_x = if x < x1 { 1 } else { -1 };
    let step_y = if y < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        canvas.set_pixel_signed(x, y);
        if (x, y) == (x1, y1) {
            return;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += step_x;
        }
        if e2 <= dx {
            err += dx;
            y += step_y;
        }
    }
}

/// Dots whose squared distance from the center falls in `(inner_sq, outer_sq]`
fn fill_band(canvas: &mut BrailleCanvas, center: (i32, i32), inner_sq: i32, outer: i32) {
    let (cx, cy) = center;
    let outer_sq = outer * outer;
    for dy in -outer..=outer {
        for dx in -outer..=outer {
            let d2 = dx * dx + dy * dy;
            if d2 > inner_sq && d2 <= outer_sq {
                canvas.set_pixel_signed(cx + dx, cy + dy);
            }
        }
    }
}

/// Filled disk, the body of a city marker
pub fn draw_disk(canvas: &mut BrailleCanvas, center: (i32, i32), radius: i32) {
    fill_band(canvas, center, -1, radius);
}

/// One-dot outline just outside a disk of `radius`
pub fn draw_ring(canvas: &mut BrailleCanvas, center: (i32, i32), radius: i32) {
    fill_band(canvas, center, radius * radius, radius + 1);
}
