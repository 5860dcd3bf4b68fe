// Immutable pixel buffers sampled by the casters.
// Dimensions are powers of two so coordinates wrap with a bit-mask.

use bitflags::bitflags;

use crate::renderer::Rgba;

/// Side length of the procedurally generated textures.
pub const AUTO_TEX_SIZE: usize = 64;

/// Number of procedurally generated wall textures.
pub const AUTO_WALL_COUNT: usize = 10;

bitflags! {
    /// Which surfaces get a procedural texture at start-up.
    ///
    /// The empty set selects the flat-colour renderer.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct TexFlags: u8 {
        const AUTO_WALL    = 0x01;
        const AUTO_FLOOR   = 0x02;
        const AUTO_CEILING = 0x04;
        const AUTO_FULL    = Self::AUTO_WALL.bits()
                           | Self::AUTO_FLOOR.bits()
                           | Self::AUTO_CEILING.bits();
    }
}

/// Things that can go wrong when building textures.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    /// Width and height must be equal powers of two.
    #[error("texture `{name}` is {w}x{h}, expected a square power of two")]
    BadDimensions { name: String, w: usize, h: usize },

    #[error("texture `{name}` holds {got} pixels, expected {expected}")]
    BadPixelCount {
        name: String,
        expected: usize,
        got: usize,
    },

    /// Every texture in a group must share the first one's size.
    #[error("texture `{name}` is {w}x{h}, group is {group_w}x{group_h}")]
    MismatchedSize {
        name: String,
        w: usize,
        h: usize,
        group_w: usize,
        group_h: usize,
    },

    #[error("texture group is empty")]
    EmptyGroup,
}

/// Halve each colour channel with a shift and a mask.
#[inline(always)]
pub fn darken(color: Rgba) -> Rgba {
    (color >> 1) & 0x7F_7F7F
}

/// Row-major 0x00RRGGBB pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub name: String,
    w: usize,
    h: usize,
    pixels: Vec<Rgba>,
}

impl Texture {
    pub fn new<S: Into<String>>(
        name: S,
        w: usize,
        h: usize,
        pixels: Vec<Rgba>,
    ) -> Result<Self, TextureError> {
        let name = name.into();
        if w != h || !w.is_power_of_two() {
            return Err(TextureError::BadDimensions { name, w, h });
        }
        if pixels.len() != w * h {
            return Err(TextureError::BadPixelCount {
                name,
                expected: w * h,
                got: pixels.len(),
            });
        }
        Ok(Self { name, w, h, pixels })
    }

    /// Build a `size`×`size` texture from a per-texel function.
    fn from_fn(name: &str, size: usize, f: impl Fn(usize, usize) -> Rgba) -> Self {
        let mut pixels = vec![0; size * size];
        for y in 0..size {
            for x in 0..size {
                pixels[y * size + x] = f(x, y);
            }
        }
        Self {
            name: name.to_string(),
            w: size,
            h: size,
            pixels,
        }
    }

    #[inline]
    pub fn w(&self) -> usize {
        self.w
    }

    #[inline]
    pub fn h(&self) -> usize {
        self.h
    }

    #[inline]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Texel at `(tx, ty)` with both coordinates wrapped by masking, so any
    /// integer (negative included) maps into the texture periodically.
    #[inline(always)]
    pub fn sample_wrapped(&self, tx: i32, ty: i32) -> Rgba {
        let tx = (tx & (self.w as i32 - 1)) as usize;
        let ty = (ty & (self.h as i32 - 1)) as usize;
        self.pixels[ty * self.w + tx]
    }
}

/// Same-sized textures indexed by wall type − 1.
#[derive(Clone, Debug, PartialEq)]
pub struct TexGroup {
    w: usize,
    h: usize,
    textures: Vec<Texture>,
}

impl TexGroup {
    pub fn new(textures: Vec<Texture>) -> Result<Self, TextureError> {
        let first = textures.first().ok_or(TextureError::EmptyGroup)?;
        let (group_w, group_h) = (first.w, first.h);
        if let Some(odd) = textures
            .iter()
            .find(|t| t.w != group_w || t.h != group_h)
        {
            return Err(TextureError::MismatchedSize {
                name: odd.name.clone(),
                w: odd.w,
                h: odd.h,
                group_w,
                group_h,
            });
        }
        Ok(Self {
            w: group_w,
            h: group_h,
            textures,
        })
    }

    #[inline]
    pub fn w(&self) -> usize {
        self.w
    }

    #[inline]
    pub fn h(&self) -> usize {
        self.h
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Texture for wall type `wall` (1-based). Types beyond the group wrap
    /// around so a small group can still dress a large palette.
    #[inline]
    pub fn for_wall(&self, wall: u8) -> &Texture {
        let idx = (wall.max(1) as usize - 1) % self.textures.len();
        &self.textures[idx]
    }
}

/*──────────────────────── procedural textures ────────────────────────*/

#[inline]
fn gradient(v: usize, size: usize) -> u32 {
    (v * 256 / size) as u32
}

#[inline]
fn xy_gradient(x: usize, y: usize, size: usize) -> u32 {
    (y * 128 / size + x * 128 / size) as u32
}

#[inline]
fn xor_colour(x: usize, y: usize, size: usize) -> u32 {
    gradient(x, size) ^ gradient(y, size)
}

#[inline]
fn grid_lines(x: usize, y: usize, cell: usize) -> u32 {
    (x % cell != 0 && y % cell != 0) as u32
}

/// Blue-ish XOR pattern with a 16-texel grid of black lines.
pub fn auto_floor() -> Texture {
    Texture::from_fn("AUTO_FLOOR", AUTO_TEX_SIZE, |x, y| {
        let xor = xor_colour(x, y, AUTO_TEX_SIZE);
        (128 + xor * 65536 + xor) * grid_lines(x, y, 16)
    })
}

/// Almost-black blue ceiling with a dark seam on row and column 0.
pub fn auto_ceiling() -> Texture {
    Texture::from_fn("AUTO_CEILING", AUTO_TEX_SIZE, |x, y| {
        65536 + 192 * grid_lines(x, y, AUTO_TEX_SIZE)
    })
}

/// The ten procedural wall textures, in wall-type order.
pub fn auto_walls() -> TexGroup {
    const S: usize = AUTO_TEX_SIZE;
    let patterns: [(&str, fn(usize, usize) -> Rgba); AUTO_WALL_COUNT] = [
        // flat red with a black cross
        ("RED_CROSS", |x, y| 65536 * 254 * (x != y && x != S - y) as u32),
        ("GREY_SLOPE", |x, y| {
            let c = xy_gradient(x, y, S);
            c + 256 * c + 65536 * c
        }),
        ("YELLOW_SLOPE", |x, y| {
            let c = xy_gradient(x, y, S);
            256 * c + 65536 * c
        }),
        ("GREY_XOR", |x, y| {
            let c = xor_colour(x, y, S);
            c + 256 * c + 65536 * c
        }),
        ("GREEN_XOR", |x, y| 256 * xor_colour(x, y, S)),
        ("RED_BRICKS", |x, y| 65536 * 192 * grid_lines(x, y, 16)),
        ("RED_GRADIENT", |_, y| 65536 * gradient(y, S)),
        ("FLAT_GREY", |_, _| 128 + 256 * 128 + 65536 * 128),
        ("SYNTH_DIM", |x, y| {
            (64 * gradient(x, S) + 65536 * gradient(y, S) + xor_colour(x, y, S))
                * grid_lines(x, y, 32)
        }),
        ("SYNTH_BRIGHT", |x, y| {
            (128 * gradient(x, S) + 65536 * gradient(y, S) + xor_colour(x, y, S))
                * grid_lines(x, y, 32)
        }),
    ];

    let textures = patterns
        .iter()
        .map(|&(name, f)| Texture::from_fn(name, S, f))
        .collect();
    TexGroup {
        w: S,
        h: S,
        textures,
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn flat(name: &str, size: usize, color: Rgba) -> Texture {
        Texture::new(name, size, size, vec![color; size * size]).unwrap()
    }

    #[test]
    fn non_power_of_two_rejected() {
        let err = Texture::new("ODD", 48, 48, vec![0; 48 * 48]).unwrap_err();
        assert!(matches!(err, TextureError::BadDimensions { w: 48, h: 48, .. }));
        let err = Texture::new("TALL", 8, 16, vec![0; 128]).unwrap_err();
        assert!(matches!(err, TextureError::BadDimensions { .. }));
    }

    #[test]
    fn pixel_count_checked() {
        let err = Texture::new("SHORT", 4, 4, vec![0; 15]).unwrap_err();
        assert!(matches!(
            err,
            TextureError::BadPixelCount {
                expected: 16,
                got: 15,
                ..
            }
        ));
    }

    #[test]
    fn group_rejects_mixed_sizes() {
        let err = TexGroup::new(vec![flat("A", 8, 1), flat("B", 16, 2)]).unwrap_err();
        assert_eq!(
            err,
            TextureError::MismatchedSize {
                name: "B".into(),
                w: 16,
                h: 16,
                group_w: 8,
                group_h: 8,
            }
        );
        assert_eq!(TexGroup::new(Vec::new()).unwrap_err(), TextureError::EmptyGroup);
    }

    #[test]
    fn wall_lookup_is_one_based_and_wraps() {
        let group = TexGroup::new(vec![flat("A", 4, 1), flat("B", 4, 2)]).unwrap();
        assert_eq!(group.for_wall(1).name, "A");
        assert_eq!(group.for_wall(2).name, "B");
        assert_eq!(group.for_wall(3).name, "A");
    }

    #[test]
    fn auto_textures_are_valid() {
        let walls = auto_walls();
        assert_eq!(walls.len(), AUTO_WALL_COUNT);
        assert_eq!((walls.w(), walls.h()), (AUTO_TEX_SIZE, AUTO_TEX_SIZE));
        for tex in [auto_floor(), auto_ceiling()] {
            assert_eq!(tex.pixels().len(), AUTO_TEX_SIZE * AUTO_TEX_SIZE);
        }
        // black cross on the first wall texture
        assert_eq!(walls.for_wall(1).sample_wrapped(5, 5), 0);
        assert_eq!(walls.for_wall(1).sample_wrapped(5, 6), 65536 * 254);
    }

    #[test]
    fn darken_halves_channels() {
        assert_eq!(darken(0x00_FF8001), 0x00_7F4000);
    }

    proptest! {
        #[test]
        fn sampling_is_periodic(
            tx in -64i32..64,
            ty in -64i32..64,
            kx in -50i32..50,
            ky in -50i32..50,
        ) {
            let tex = auto_floor();
            let size = tex.w() as i32;
            prop_assert_eq!(
                tex.sample_wrapped(tx + kx * size, ty + ky * size),
                tex.sample_wrapped(tx.rem_euclid(size), ty.rem_euclid(size))
            );
        }
    }
}
