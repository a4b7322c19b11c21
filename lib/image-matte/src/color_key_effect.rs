use crate::{Color, Effect, Result, Tolerance};
use derivative::Derivative;
use derive_setters::Setters;
use image::RgbaImage;

pub const DEFAULT_KEY_COLOR: Color = Color::new(0x8D, 0xC5, 0xFE);
pub const DEFAULT_TOLERANCE: Tolerance = Tolerance::new(30);

/// Color key matte configuration
///
/// Pixels whose RGB lies within `tolerance` (Euclidean distance) of `color`
/// become fully transparent. RGB channels are left untouched.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct ColorKeyConfig {
    #[derivative(Default(value = "DEFAULT_KEY_COLOR"))]
    color: Color,

    #[derivative(Default(value = "DEFAULT_TOLERANCE"))]
    tolerance: Tolerance,
}

impl ColorKeyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    pub fn is_background(&self, pixel: &image::Rgba<u8>) -> bool {
        let tolerance = self.tolerance.value() as u32;
        self.color.distance_sq(pixel) <= tolerance * tolerance
    }
}

impl Effect for ColorKeyConfig {
    fn apply(&self, image: &mut RgbaImage) -> Result<()> {
        let mut cleared = 0usize;

        for pixel in image.pixels_mut() {
            if self.is_background(pixel) {
                pixel[3] = 0;
                cleared += 1;
            }
        }

        log::debug!(
            "color key {} (tolerance {}): cleared {cleared}/{} pixels",
            self.color,
            self.tolerance.value(),
            image.width() as usize * image.height() as usize
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn key(color: Color, tolerance: u8) -> ColorKeyConfig {
        ColorKeyConfig::new()
            .with_color(color)
            .with_tolerance(Tolerance::new(tolerance))
    }

    #[test]
    fn test_default_config() {
        let config = ColorKeyConfig::new();
        assert_eq!(config.color(), Color::new(0x8D, 0xC5, 0xFE));
        assert_eq!(config.tolerance().value(), 30);
    }

    #[test]
    fn test_default_background_becomes_transparent() {
        let mut image = RgbaImage::from_pixel(3, 3, Rgba([0x8D, 0xC5, 0xFE, 255]));
        ColorKeyConfig::new().apply(&mut image).unwrap();

        assert!(image.pixels().all(|p| p[3] == 0));
        assert!(image.pixels().all(|p| p[0] == 0x8D && p[1] == 0xC5 && p[2] == 0xFE));
    }

    #[test]
    fn test_zero_tolerance_is_exact_match() {
        let target = Color::new(100, 100, 100);
        let mut image = RgbaImage::new(4, 1);
        image.put_pixel(0, 0, Rgba([100, 100, 100, 255]));
        image.put_pixel(1, 0, Rgba([101, 100, 100, 255]));
        image.put_pixel(2, 0, Rgba([100, 99, 100, 255]));
        image.put_pixel(3, 0, Rgba([100, 100, 101, 255]));

        key(target, 0).apply(&mut image).unwrap();

        assert_eq!(image.get_pixel(0, 0)[3], 0);
        assert_eq!(image.get_pixel(1, 0)[3], 255);
        assert_eq!(image.get_pixel(2, 0)[3], 255);
        assert_eq!(image.get_pixel(3, 0)[3], 255);
    }

    #[test]
    fn test_distance_equal_to_tolerance_is_background() {
        // (3, 4, 0) away from the target: distance exactly 5
        let target = Color::new(50, 50, 50);
        let mut image = RgbaImage::from_pixel(1, 1, Rgba([53, 54, 50, 255]));
        key(target, 5).apply(&mut image).unwrap();
        assert_eq!(image.get_pixel(0, 0)[3], 0);

        let mut image = RgbaImage::from_pixel(1, 1, Rgba([53, 54, 50, 255]));
        key(target, 4).apply(&mut image).unwrap();
        assert_eq!(image.get_pixel(0, 0)[3], 255);
    }

    #[test]
    fn test_alpha_follows_distance_rule() {
        let config = key(Color::new(120, 60, 200), 40);
        let mut image = RgbaImage::from_fn(64, 64, |x, y| {
            Rgba([(x * 4) as u8, (y * 4) as u8, ((x + y) * 2) as u8, ((x * y) % 256) as u8])
        });
        let original = image.clone();

        config.apply(&mut image).unwrap();

        for (before, after) in original.pixels().zip(image.pixels()) {
            let d = (config.color().distance_sq(before) as f64).sqrt();
            let expected = if d <= 40.0 { 0 } else { before[3] };
            assert_eq!(after[3], expected, "pixel {before:?}");
            assert_eq!(&after.0[..3], &before.0[..3]);
        }
    }

    #[test]
    fn test_apply_is_idempotent() {
        let config = key(Color::new(0, 255, 0), 60);
        let mut image = RgbaImage::from_fn(16, 16, |x, y| {
            Rgba([(x * 16) as u8, 255 - (y * 8) as u8, (x * y) as u8, 200])
        });

        config.apply(&mut image).unwrap();
        let once = image.clone();
        config.apply(&mut image).unwrap();

        assert_eq!(once, image);
    }
}
