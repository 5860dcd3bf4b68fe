use crate::{
    engine::{planes, types::Screen, walls},
    renderer::{DrawCall, Renderer, RendererExt, Rgba, overlay},
    sim::Overlays,
    world::{CameraState, Grid, TexFlags, TexGroup, Texture, auto_ceiling, auto_floor, auto_walls},
};

/// Optional texture set. Every slot is independent.
#[derive(Clone, Debug, Default)]
pub struct Textures {
    pub floor: Option<Texture>,
    pub ceiling: Option<Texture>,
    pub walls: Option<TexGroup>,
}

impl Textures {
    /// Procedural textures for each surface selected in `flags`.
    pub fn auto(flags: TexFlags) -> Self {
        Self {
            floor: flags.contains(TexFlags::AUTO_FLOOR).then(auto_floor),
            ceiling: flags.contains(TexFlags::AUTO_CEILING).then(auto_ceiling),
            walls: flags.contains(TexFlags::AUTO_WALL).then(auto_walls),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.floor.is_none() && self.ceiling.is_none() && self.walls.is_none()
    }
}

/// How a frame reaches the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderMode {
    /// Primitives only: two rectangles and one line per column.
    Flat,
    /// Every pixel written into a frame buffer, handed over in one blit.
    Buffered,
}

/// Per-frame driver: casts planes and walls, then overlays.
pub struct Engine<R: Renderer> {
    pub renderer: R,
    screen: Screen,
    textures: Textures,
    /// Present exactly when any texture is loaded.
    frame: Option<Vec<Rgba>>,
    calls: Vec<DrawCall>,
}

impl<R: Renderer> Engine<R> {
    pub fn new(renderer: R, w: usize, h: usize, flags: TexFlags) -> Self {
        let mut engine = Self {
            renderer,
            screen: Screen::new(w, h),
            textures: Textures::default(),
            frame: None,
            calls: Vec::with_capacity(w + 2),
        };
        let textures = Textures::auto(flags);
        if !textures.is_empty() {
            engine.load_textures(textures);
        }
        engine
    }

    /// Install a texture set and switch to buffered rendering.
    ///
    /// Textures can be installed once; a second call is refused with an
    /// error log and returns `false`, leaving the engine untouched.
    pub fn load_textures(&mut self, textures: Textures) -> bool {
        if self.frame.is_some() {
            log::error!("textures already loaded; refusing to replace them");
            return false;
        }
        log::info!(
            "textures loaded: floor={} ceiling={} walls={}",
            textures.floor.is_some(),
            textures.ceiling.is_some(),
            textures.walls.as_ref().map_or(0, TexGroup::len),
        );
        self.frame = Some(vec![0; self.screen.w * self.screen.h]);
        self.textures = textures;
        true
    }

    pub fn mode(&self) -> RenderMode {
        if self.frame.is_some() {
            RenderMode::Buffered
        } else {
            RenderMode::Flat
        }
    }

    #[inline]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Draw one complete frame and loan it to `submit`.
    pub fn render_frame(
        &mut self,
        cam: &CameraState,
        grid: &Grid,
        overlays: Overlays,
        submit: impl FnOnce(&[Rgba], usize, usize),
    ) {
        let Self {
            renderer,
            screen,
            textures,
            frame,
            calls,
        } = self;

        renderer.begin_frame(screen.w, screen.h);

        match frame {
            Some(frame) => {
                planes::cast_planes(
                    cam,
                    screen,
                    textures.floor.as_ref(),
                    textures.ceiling.as_ref(),
                    frame,
                );
                walls::cast_walls_buffered(cam, grid, screen, textures.walls.as_ref(), frame);
                renderer.blit(frame);
            }
            None => {
                calls.clear();
                calls.extend(planes::plane_calls(cam, screen));
                walls::cast_walls_flat(cam, grid, screen, calls);
                renderer.draw_all(calls);
            }
        }

        if overlays.map {
            renderer.draw_all(&overlay::minimap(grid, cam, screen.w, screen.h));
        }

        renderer.end_frame(submit);
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::planes::{GROUND, SKY};
    use crate::renderer::Software;
    use crate::world::{DEFAULT_DIR, DEFAULT_PALETTE, DEFAULT_PLANE, darken};
    use glam::vec2;

    fn scene() -> (Grid, CameraState) {
        let grid = Grid::bordered(8, 8, 1, &DEFAULT_PALETTE).unwrap();
        let cam = CameraState::new(vec2(4.5, 4.5), DEFAULT_DIR, DEFAULT_PLANE);
        (grid, cam)
    }

    fn capture<R: Renderer>(
        engine: &mut Engine<R>,
        grid: &Grid,
        cam: &CameraState,
        overlays: Overlays,
    ) -> Vec<Rgba> {
        let mut out = Vec::new();
        engine.render_frame(cam, grid, overlays, |fb, _, _| out.extend_from_slice(fb));
        out
    }

    #[test]
    fn flags_select_mode() {
        let none = Engine::new(Software::default(), 32, 24, TexFlags::empty());
        assert_eq!(none.mode(), RenderMode::Flat);

        let walls = Engine::new(Software::default(), 32, 24, TexFlags::AUTO_WALL);
        assert_eq!(walls.mode(), RenderMode::Buffered);
        assert!(walls.textures.floor.is_none());
    }

    #[test]
    fn second_texture_load_is_refused() {
        let mut engine = Engine::new(Software::default(), 32, 24, TexFlags::empty());
        assert!(engine.load_textures(Textures::auto(TexFlags::AUTO_FLOOR)));
        assert!(!engine.load_textures(Textures::auto(TexFlags::AUTO_FULL)));
        assert!(engine.textures.walls.is_none());
    }

    #[test]
    fn flat_frame_has_sky_wall_ground() {
        let (grid, cam) = scene();
        let mut engine = Engine::new(Software::default(), 32, 24, TexFlags::empty());
        let fb = capture(&mut engine, &grid, &cam, Overlays::default());

        // wall at 3.5: 24 / 3.5 = 6 px tall, rows 9 ..= 15
        let column: Vec<_> = (0..24).map(|y| fb[y * 32 + 16]).collect();
        assert_eq!(column[0], SKY);
        assert_eq!(column[12], 0x00_FF0000);
        assert_eq!(column[23], GROUND);
    }

    #[test]
    fn buffered_without_wall_textures_uses_palette() {
        let (grid, cam) = scene();
        let mut engine = Engine::new(Software::default(), 32, 24, TexFlags::AUTO_FLOOR);
        let fb = capture(&mut engine, &grid, &cam, Overlays::default());

        assert_eq!(fb[12 * 32 + 16], 0x00_FF0000);
        assert_eq!(fb[0], SKY);
        let floor = auto_floor();
        assert!(floor.pixels().iter().any(|&c| darken(c) == fb[23 * 32]));
    }

    #[test]
    fn buffered_frame_is_deterministic() {
        let (grid, mut cam) = scene();
        cam.pitch = 12.0;
        cam.z = -40.0;
        let mut engine = Engine::new(Software::default(), 64, 48, TexFlags::AUTO_FULL);
        let a = capture(&mut engine, &grid, &cam, Overlays::default());
        let b = capture(&mut engine, &grid, &cam, Overlays::default());
        assert_eq!(a.len(), 64 * 48);
        assert_eq!(a, b);
    }

    #[test]
    fn minimap_overlay_is_drawn_on_top() {
        let (grid, cam) = scene();
        let mut engine = Engine::new(Software::default(), 200, 200, TexFlags::empty());
        let overlays = Overlays {
            map: true,
            fps: false,
        };
        let fb = capture(&mut engine, &grid, &cam, overlays);

        // origin (200 - 80) / 2 = 60, player cell (4, 4) is black
        assert_eq!(fb[105 * 200 + 105], 0x00_000000);
    }
}
