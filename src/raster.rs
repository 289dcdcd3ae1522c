//! Rectangles, lines, circles and a checkerboard test pattern
//!
//! Everything is plotted through [`Framebuffer::set_pixel`], so shapes
//! reaching over the frame border are clipped pixel by pixel. Coordinates are
//! widened to `i64` internally and the walks only visit the part of a shape
//! that can land inside the frame, so far off-screen input is cheap.

use crate::color::Color;
use crate::framebuffer::Framebuffer;

impl<const WIDTH: u32, const HEIGHT: u32, const BYTECOUNT: usize>
    Framebuffer<WIDTH, HEIGHT, BYTECOUNT>
{
    /// Fills the half-open rectangle `[x, x + width) × [y, y + height)`
    pub fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        let (x, y) = (i64::from(x), i64::from(y));
        self.fill_area(x, y, x + i64::from(width), y + i64::from(height), color);
    }

    // fills [x0, x1) × [y0, y1) after clipping it to the frame
    pub(crate) fn fill_area(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Color) {
        let (x0, x1) = (x0.max(0), x1.min(i64::from(WIDTH)));
        let (y0, y1) = (y0.max(0), y1.min(i64::from(HEIGHT)));
        for y in y0..y1 {
            for x in x0..x1 {
                self.plot(x, y, color);
            }
        }
    }

    fn plot(&mut self, x: i64, y: i64, color: Color) {
        if let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) {
            self.set_pixel(x, y, color);
        }
    }

    /// Draws a line from `(x0, y0)` to `(x1, y1)`, both end points included
    ///
    /// Horizontal and vertical lines are filled as one pixel wide rectangles,
    /// everything else uses the integer Bresenham algorithm.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let (x0, y0, x1, y1) = (
            i64::from(x0),
            i64::from(y0),
            i64::from(x1),
            i64::from(y1),
        );
        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };

        if dy == 0 {
            self.fill_area(x0.min(x1), y0, x0.max(x1) + 1, y0 + 1, color);
            return;
        }
        if dx == 0 {
            self.fill_area(x0, y0.min(y1), x0 + 1, y0.max(y1) + 1, color);
            return;
        }

        if dx > dy {
            self.trace_line((x0, y0), (dx, dy), (sx, sy), i64::from(WIDTH), false, color);
        } else {
            self.trace_line((y0, x0), (dy, dx), (sy, sx), i64::from(HEIGHT), true, color);
        }
    }

    // Bresenham walk along the major axis `a`, visiting only the steps that
    // keep `a` inside `[0, limit)`
    //
    // The error term stays in `[0, da)`, so after `k` steps the minor axis has
    // moved `ceil((k * db - da / 2) / da)` times and the walk can start at the
    // first visible step directly.
    #[allow(clippy::too_many_arguments)]
    fn trace_line(
        &mut self,
        (a0, b0): (i64, i64),
        (da, db): (i64, i64),
        (sa, sb): (i64, i64),
        limit: i64,
        steep: bool,
        color: Color,
    ) {
        let (k_min, k_max) = if sa > 0 {
            (-a0, limit - 1 - a0)
        } else {
            (a0 - (limit - 1), a0)
        };
        let first = k_min.max(0);
        let last = k_max.min(da);
        if first > last {
            return;
        }

        let start_err = i128::from(da / 2);
        let (first_w, da_w, db_w) = (i128::from(first), i128::from(da), i128::from(db));
        let behind = (first_w * db_w - start_err).max(0);
        let moves = (behind + da_w - 1) / da_w;
        let mut err = (start_err - first_w * db_w + moves * da_w) as i64;
        let mut a = a0 + sa * first;
        let mut b = b0 + sb * moves as i64;

        for _ in first..=last {
            if steep {
                self.plot(b, a, color);
            } else {
                self.plot(a, b, color);
            }
            err -= db;
            if err < 0 {
                b += sb;
                err += da;
            }
            a += sa;
        }
    }

    /// Draws a circle around `(cx, cy)` with the midpoint algorithm
    ///
    /// `filled` draws horizontal spans instead of the outline. Circles that
    /// miss the frame, or whose outline runs around all of it, return early.
    pub fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Color, filled: bool) {
        if radius < 0 {
            return;
        }
        let (cx, cy, r) = (i64::from(cx), i64::from(cy), i64::from(radius));
        let (w, h) = (i64::from(WIDTH), i64::from(HEIGHT));

        if cx + r < 0 || cy + r < 0 || cx - r >= w || cy - r >= h {
            return;
        }
        // every corner well inside the circle: the outline never crosses the frame
        let inner = i128::from(r - 2);
        let inside = inner > 0
            && [(0, 0), (w - 1, 0), (0, h - 1), (w - 1, h - 1)]
                .iter()
                .all(|&(x, y)| {
                    let (ddx, ddy) = (i128::from(x - cx), i128::from(y - cy));
                    ddx * ddx + ddy * ddy < inner * inner
                });
        if inside {
            if filled {
                self.fill_area(0, 0, w, h, color);
            }
            return;
        }

        let mut x = r;
        let mut y = 0;
        let mut d = 3 - 2 * r;

        while x >= y {
            if filled {
                self.fill_area(cx - x, cy + y, cx + x + 1, cy + y + 1, color);
                if y != 0 {
                    self.fill_area(cx - x, cy - y, cx + x + 1, cy - y + 1, color);
                }
                if x != y {
                    self.fill_area(cx - y, cy + x, cx + y + 1, cy + x + 1, color);
                }
                if y != 0 && x != y {
                    self.fill_area(cx - y, cy - x, cx + y + 1, cy - x + 1, color);
                }
            } else {
                self.plot_octants(cx, cy, x, y, color);
            }

            if d < 0 {
                d += 4 * y + 6;
            } else {
                d += 4 * (y - x) + 10;
                x -= 1;
            }
            y += 1;
        }
    }

    // the 8 mirror images of (x, y), each distinct point plotted once
    fn plot_octants(&mut self, cx: i64, cy: i64, x: i64, y: i64, color: Color) {
        self.plot(cx + x, cy + y, color);
        self.plot(cx - x, cy + y, color);
        if y != 0 {
            self.plot(cx + x, cy - y, color);
            self.plot(cx - x, cy - y, color);
        }
        if x != y {
            self.plot(cx + y, cy + x, color);
            self.plot(cx + y, cy - x, color);
            if y != 0 {
                self.plot(cx - y, cy + x, color);
                self.plot(cx - y, cy - x, color);
            }
        }
    }

    /// Fills `width × height` pixels with `cell × cell` squares
    ///
    /// The square in the top left corner gets `color`, its neighbours the
    /// inverse. Partial cells at the right and bottom edge are left untouched.
    pub fn draw_checkerboard(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        cell: i32,
        color: Color,
    ) {
        if cell <= 0 {
            return;
        }
        let (x, y, cell) = (i64::from(x), i64::from(y), i64::from(cell));
        let rows = i64::from(height) / cell;
        let cols = i64::from(width) / cell;

        // cells overlapping the frame
        let row_first = (-y).div_euclid(cell).max(0);
        let row_last = (i64::from(HEIGHT) - 1 - y).div_euclid(cell).min(rows - 1);
        let col_first = (-x).div_euclid(cell).max(0);
        let col_last = (i64::from(WIDTH) - 1 - x).div_euclid(cell).min(cols - 1);

        for row in row_first..=row_last {
            for col in col_first..=col_last {
                let cell_color = if (row + col) % 2 == 0 {
                    color
                } else {
                    color.inverse()
                };
                let (left, top) = (x + col * cell, y + row * cell);
                self.fill_area(left, top, left + cell, top + cell, cell_color);
            }
        }
    }
}
