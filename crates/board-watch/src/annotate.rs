//! Overlay rendering for the UI collaborator.
//!
//! Draws the lattice grid, the detected corner markers and a rectangle
//! around every occupied square onto an owned copy of the input frame. All
//! drawing clips at the frame borders.

use board_watch_core::{FullLattice, RgbFrame, RgbFrameView, Square};
use board_watch_track::BoardSnapshot;

const GRID_COLOR: [u8; 3] = [0, 200, 0];
const CORNER_COLOR: [u8; 3] = [220, 40, 40];
const OCCUPIED_COLOR: [u8; 3] = [40, 220, 40];

/// Bresenham line between two pixel positions.
fn draw_line(frame: &mut RgbFrame, x0: i32, y0: i32, x1: i32, y1: i32, color: [u8; 3]) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);

    loop {
        frame.put(x, y, color);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

fn draw_rect(frame: &mut RgbFrame, x: i32, y: i32, w: i32, h: i32, color: [u8; 3]) {
    if w <= 0 || h <= 0 {
        return;
    }
    draw_line(frame, x, y, x + w - 1, y, color);
    draw_line(frame, x, y + h - 1, x + w - 1, y + h - 1, color);
    draw_line(frame, x, y, x, y + h - 1, color);
    draw_line(frame, x + w - 1, y, x + w - 1, y + h - 1, color);
}

fn draw_disc(frame: &mut RgbFrame, cx: i32, cy: i32, radius: i32, color: [u8; 3]) {
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                frame.put(cx + dx, cy + dy, color);
            }
        }
    }
}

/// Render the full overlay onto a copy of `frame`.
pub fn render_overlay(
    frame: &RgbFrameView<'_>,
    lattice: &FullLattice,
    squares: &[Square],
    snapshot: &BoardSnapshot,
) -> RgbFrame {
    let mut out = frame.to_owned_frame();

    // Grid: one polyline per lattice row and column.
    for r in 0..lattice.rows() {
        for c in 0..lattice.cols() {
            let p = lattice.point(r, c);
            if c + 1 < lattice.cols() {
                let q = lattice.point(r, c + 1);
                draw_line(
                    &mut out,
                    p.x as i32,
                    p.y as i32,
                    q.x as i32,
                    q.y as i32,
                    GRID_COLOR,
                );
            }
            if r + 1 < lattice.rows() {
                let q = lattice.point(r + 1, c);
                draw_line(
                    &mut out,
                    p.x as i32,
                    p.y as i32,
                    q.x as i32,
                    q.y as i32,
                    GRID_COLOR,
                );
            }
        }
    }

    // Interior corner markers (the border ring is extrapolated, not
    // observed, so it gets no markers).
    for r in 1..lattice.rows().saturating_sub(1) {
        for c in 1..lattice.cols().saturating_sub(1) {
            let p = lattice.point(r, c);
            draw_disc(&mut out, p.x as i32, p.y as i32, 2, CORNER_COLOR);
        }
    }

    // Occupied squares.
    for square in squares {
        if square.bounds.is_empty() || !snapshot.is_occupied(square.id) {
            continue;
        }
        draw_rect(
            &mut out,
            square.bounds.x as i32,
            square.bounds.y as i32,
            square.bounds.w as i32,
            square.bounds.h as i32,
            OCCUPIED_COLOR,
        );
    }

    out
}
