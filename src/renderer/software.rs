//! ---------------------------------------------------------------------------
//! CPU back-end
//!
//! * Keeps one `Vec<u32>` frame in **0x00RRGGBB** format.
//! * Clips every primitive against the frame, so callers never have to.
//! ---------------------------------------------------------------------------

use crate::renderer::{DrawCall, Renderer, Rgba};

/// Colour the frame is cleared to.
const CLEAR: Rgba = 0x00_000000;

/// Software rasteriser.
#[derive(Default)]
pub struct Software {
    scratch: Vec<Rgba>,
    width: usize,
    height: usize,
}

/*──────────────────────── Renderer trait impl ────────────────────────*/
impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize) {
        // (re)allocate if resolution changed
        if w != self.width || h != self.height {
            self.width = w;
            self.height = h;
            self.scratch.resize(w * h, CLEAR);
        }
        self.scratch.fill(CLEAR);
    }

    fn draw(&mut self, call: &DrawCall) {
        match *call {
            DrawCall::VLine { x, y0, y1, color } => self.fill(x, y0, 1, y1 - y0 + 1, color),
            DrawCall::Rect { x, y, w, h, color } => self.fill(x, y, w, h, color),
            DrawCall::Outline { x, y, w, h, color } => {
                self.fill(x, y, w, 1, color);
                self.fill(x, y + h - 1, w, 1, color);
                self.fill(x, y, 1, h, color);
                self.fill(x + w - 1, y, 1, h, color);
            }
        }
    }

    fn blit(&mut self, frame: &[Rgba]) {
        debug_assert_eq!(frame.len(), self.scratch.len());
        self.scratch.copy_from_slice(frame); // one fast memcpy
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(&self.scratch, self.width, self.height);
    }
}

impl Software {
    /// Read back one pixel of the frame being built.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        (x < self.width && y < self.height).then(|| self.scratch[y * self.width + x])
    }

    /// Fill the part of the `w`×`h` rectangle at `(x, y)` that is on screen.
    fn fill(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgba) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(self.width as i32);
        let y1 = (y + h).min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        for row in y0 as usize..y1 as usize {
            let start = row * self.width;
            self.scratch[start + x0 as usize..start + x1 as usize].fill(color);
        }
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
