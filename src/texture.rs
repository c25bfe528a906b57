//! Procedural replacement for the usual tutorial texture files: RGBA8 images
//! generated at startup and uploaded once, so the demo ships no assets.

use crate::scene::TextureKind;

pub const TEXTURE_SIZE: u32 = 128;

/// Running-bond brick pattern: warm bricks, light mortar
pub fn brick_image(size: u32) -> Vec<u8> {
    let brick_w = size / 4;
    let brick_h = size / 8;
    let mortar = (size / 64).max(1);

    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        let course = y / brick_h;
        // Every other course shifts half a brick
        let shift = if course % 2 == 0 { 0 } else { brick_w / 2 };
        for x in 0..size {
            let in_mortar_row = y % brick_h < mortar;
            let in_mortar_col = (x + shift) % brick_w < mortar;
            let rgb: [u8; 3] = if in_mortar_row || in_mortar_col {
                [200, 195, 185]
            } else {
                // Per-brick tone variation keyed off the brick's grid cell
                let bx = (x + shift) / brick_w;
                let tone = ((bx * 13 + course * 7) % 5) as u8 * 8;
                [170 + tone, 80 + tone / 2, 60]
            };
            pixels.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
        }
    }
    pixels
}

/// Vertical planks with darker seams and grain banding
pub fn planks_image(size: u32) -> Vec<u8> {
    let plank_w = size / 8;
    let seam = (size / 64).max(1);

    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let rgb: [u8; 3] = if x % plank_w < seam {
                [80, 55, 30]
            } else {
                let plank = x / plank_w;
                let grain = ((y / 3 + plank * 11) % 7) as u8 * 5;
                [150 + grain, 105 + grain / 2, 60]
            };
            pixels.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
        }
    }
    pixels
}

/// 8x8 checkerboard
pub fn checker_image(size: u32) -> Vec<u8> {
    let cell = size / 8;

    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let odd = (x / cell + y / cell) % 2 == 1;
            let v = if odd { 60 } else { 230 };
            pixels.extend_from_slice(&[v, v, v, 255]);
        }
    }
    pixels
}

/// Single white texel for objects that only use vertex color
pub fn white_image() -> Vec<u8> {
    vec![255, 255, 255, 255]
}

/// Generate the image for a texture kind; returns (width, height, pixels)
pub fn image_for(kind: TextureKind) -> (u32, u32, Vec<u8>) {
    match kind {
        TextureKind::Brick => (TEXTURE_SIZE, TEXTURE_SIZE, brick_image(TEXTURE_SIZE)),
        TextureKind::Planks => (TEXTURE_SIZE, TEXTURE_SIZE, planks_image(TEXTURE_SIZE)),
        TextureKind::Checker => (TEXTURE_SIZE, TEXTURE_SIZE, checker_image(TEXTURE_SIZE)),
        TextureKind::White => (1, 1, white_image()),
    }
}

/// Upload an RGBA8 image and return a view ready for binding
pub fn create_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    width: u32,
    height: u32,
    pixels: &[u8],
) -> wgpu::TextureView {
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        pixels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        size,
    );

    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_images_are_fully_populated() {
        for (kind, expected) in [
            (TextureKind::Brick, TEXTURE_SIZE * TEXTURE_SIZE * 4),
            (TextureKind::Planks, TEXTURE_SIZE * TEXTURE_SIZE * 4),
            (TextureKind::Checker, TEXTURE_SIZE * TEXTURE_SIZE * 4),
            (TextureKind::White, 4),
        ] {
            let (w, h, pixels) = image_for(kind);
            assert_eq!(pixels.len(), expected as usize);
            assert_eq!(pixels.len(), (w * h * 4) as usize);
        }
    }

    #[test]
    fn test_images_are_opaque() {
        let (_, _, pixels) = image_for(TextureKind::Brick);
        assert!(pixels.chunks_exact(4).all(|px| px[3] == 255));
    }

    #[test]
    fn test_checker_alternates() {
        let size = 64;
        let cell = size / 8;
        let pixels = checker_image(size);
        let at = |x: u32, y: u32| pixels[((y * size + x) * 4) as usize];

        assert_ne!(at(0, 0), at(cell, 0), "adjacent cells differ");
        assert_eq!(at(0, 0), at(cell, cell), "diagonal cells match");
    }
}
