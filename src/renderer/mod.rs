//! Presentation layer.
//!
//! *The casters never talk to a window.*  They either fill a frame buffer
//! that is handed over in one [`Renderer::blit`], or emit [`DrawCall`]s
//! (flat-colour mode, overlays) that a back-end rasterises.
//!
//! * Back-ends implement [`Renderer`]; [`software::Software`] rasterises
//!   into a CPU buffer suitable for `minifb`.
//! * [`RendererExt`] adds `draw_all` so call-sites stay short.

/// Pixel format of every buffer in the crate (0x00RRGGBB).
pub type Rgba = u32;

/// One primitive of the flat-colour path, in screen pixels.
/// Back-ends clip; callers may pass spans that leave the screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawCall {
    /// Vertical line on column `x`, rows `y0 ..= y1`.
    VLine { x: i32, y0: i32, y1: i32, color: Rgba },
    /// Filled rectangle.
    Rect {
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        color: Rgba,
    },
    /// One-pixel rectangle outline.
    Outline {
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        color: Rgba,
    },
}

/// A presenter that owns the scratch buffer of the frame being built.
///
/// `end_frame` hands the finished buffer to a user-supplied closure,
/// typically `|fb, w, h| window.update_with_buffer(fb, w, h)`.
pub trait Renderer {
    /// (Re)allocate internal scratch for the requested resolution and clear it.
    fn begin_frame(&mut self, width: usize, height: usize);

    /// Rasterise one primitive.
    fn draw(&mut self, call: &DrawCall);

    /// Replace the whole frame with a fully rendered buffer.
    fn blit(&mut self, frame: &[Rgba]);

    /// Finish the frame and **loan** the finished buffer to `submit`.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}

/// Convenience blanket-impl.
pub trait RendererExt: Renderer {
    fn draw_all(&mut self, calls: &[DrawCall]) {
        for c in calls {
            self.draw(c);
        }
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}

pub mod overlay;
pub mod software;

pub use software::Software;
