//! Square grey+alpha texel grids and the static sprites drawn from them

/// A grey/alpha texel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Texel {
    pub grey: u8,
    pub alpha: u8,
}

impl Texel {
    pub const TRANSPARENT: Texel = Texel { grey: 0, alpha: 0 };

    pub const fn new(grey: u8, alpha: u8) -> Self {
        Self { grey, alpha }
    }

    /// RGBA colour (0-1) for vertex output
    #[inline]
    pub fn rgba(&self) -> [f32; 4] {
        let g = self.grey as f32 / 255.0;
        [g, g, g, self.alpha as f32 / 255.0]
    }
}

/// Square grid of texels, row-major, fixed size for its lifetime
#[derive(Debug, Clone, PartialEq)]
pub struct TexelGrid {
    side: usize,
    texels: Vec<Texel>,
}

impl TexelGrid {
    /// Fully transparent grid
    pub fn new(side: usize) -> Self {
        Self {
            side,
            texels: vec![Texel::TRANSPARENT; side * side],
        }
    }

    /// Grid filled by evaluating `f(x, y)` for every texel
    pub fn from_fn(side: usize, mut f: impl FnMut(usize, usize) -> Texel) -> Self {
        let mut texels = Vec::with_capacity(side * side);
        for y in 0..side {
            for x in 0..side {
                texels.push(f(x, y));
            }
        }
        Self { side, texels }
    }

    #[inline]
    pub fn side(&self) -> usize {
        self.side
    }

    /// Pixel centre of the grid (texel coordinates, may be fractional)
    #[inline]
    pub fn center(&self) -> f32 {
        self.side as f32 / 2.0
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Texel {
        self.texels[x + y * self.side]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, texel: Texel) {
        self.texels[x + y * self.side] = texel;
    }

    pub fn texels(&self) -> &[Texel] {
        &self.texels
    }

    /// Copy another grid of the same size into this one
    pub fn copy_from(&mut self, other: &TexelGrid) {
        assert_eq!(self.side, other.side, "texel grid size mismatch");
        self.texels.copy_from_slice(&other.texels);
    }

    /// Iterate `(x, y, texel)` over texels with non-zero alpha
    pub fn visible(&self) -> impl Iterator<Item = (usize, usize, Texel)> + '_ {
        let side = self.side;
        self.texels
            .iter()
            .enumerate()
            .filter(|(_, t)| t.alpha > 0)
            .map(move |(i, t)| (i % side, i / side, *t))
    }
}

/// Soft white disc drawn under a body's flares
///
/// Side `6r`; grey fades to zero at `r`, alpha at `sqrt(1.2)·r`.
pub fn body_sprite(radius: f32) -> TexelGrid {
    let side = (6.0 * radius) as usize;
    let c = side as f32 / 2.0;
    let r2 = radius * radius;
    TexelGrid::from_fn(side, |x, y| {
        let dx = x as f32 - c;
        let dy = y as f32 - c;
        let rel = (dx * dx + dy * dy) / r2;
        let grey = (255.0 * (1.0 - rel)).max(0.0);
        let alpha = (255.0 * (1.2 - rel)).clamp(0.0, 255.0);
        Texel::new(grey as u8, alpha as u8)
    })
}

/// Dark halo drawn for the central mass
///
/// Side `4r`; black, opaque out to `0.3·r` and transparent beyond `1.3·r`.
pub fn central_sprite(radius: f32) -> TexelGrid {
    let side = (4.0 * radius) as usize;
    let c = side as f32 / 2.0;
    TexelGrid::from_fn(side, |x, y| {
        let dx = x as f32 - c;
        let dy = y as f32 - c;
        let rel = (dx * dx + dy * dy).sqrt() / radius;
        let alpha = (255.0 * (1.3 - rel)).clamp(0.0, 255.0);
        Texel::new(0, alpha as u8)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_indexing() {
        let mut grid = TexelGrid::new(4);
        grid.set(3, 1, Texel::new(9, 10));
        assert_eq!(grid.get(3, 1), Texel::new(9, 10));
        assert_eq!(grid.texels()[3 + 4], Texel::new(9, 10));
        let visible: Vec<_> = grid.visible().collect();
        assert_eq!(visible, vec![(3, 1, Texel::new(9, 10))]);
    }

    #[test]
    fn test_body_sprite_profile() {
        let sprite = body_sprite(10.0);
        assert_eq!(sprite.side(), 60);
        // Bright, opaque centre
        assert_eq!(sprite.get(30, 30), Texel::new(255, 255));
        // Transparent corner
        assert_eq!(sprite.get(0, 0), Texel::TRANSPARENT);
        // At r: no grey, partial alpha
        let edge = sprite.get(40, 30);
        assert_eq!(edge.grey, 0);
        assert!(edge.alpha > 0 && edge.alpha < 255);
    }

    #[test]
    fn test_central_sprite_profile() {
        let sprite = central_sprite(10.0);
        assert_eq!(sprite.side(), 40);
        assert_eq!(sprite.get(20, 20), Texel::new(0, 255));
        assert_eq!(sprite.get(0, 0).alpha, 0);
        assert!(sprite.texels().iter().all(|t| t.grey == 0));
    }

    #[test]
    #[should_panic(expected = "texel grid size mismatch")]
    fn test_copy_from_size_mismatch() {
        let mut a = TexelGrid::new(4);
        a.copy_from(&TexelGrid::new(5));
    }
}
