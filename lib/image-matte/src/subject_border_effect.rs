use crate::{BorderWidth, Color, Effect, Error, Result};
use derivative::Derivative;
use derive_setters::Setters;
use image::RgbaImage;
use imageproc::{drawing::draw_hollow_rect_mut, rect::Rect};

pub const DEFAULT_BORDER_COLOR: Color = Color::new(0xFF, 0x00, 0x00);

/// Inclusive pixel bounds of everything with alpha > 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl BoundingBox {
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    /// Scan the whole image once. `None` when every pixel is fully transparent.
    pub fn of_subject(image: &RgbaImage) -> Option<Self> {
        let mut bbox: Option<Self> = None;

        for (x, y, pixel) in image.enumerate_pixels() {
            if pixel[3] == 0 {
                continue;
            }

            bbox = Some(match bbox {
                None => Self {
                    min_x: x,
                    min_y: y,
                    max_x: x,
                    max_y: y,
                },
                Some(b) => Self {
                    min_x: b.min_x.min(x),
                    min_y: b.min_y.min(y),
                    max_x: b.max_x.max(x),
                    max_y: b.max_y.max(y),
                },
            });
        }

        bbox
    }

    /// The box grown by `offset` pixels on every side. May extend past the canvas.
    fn grown(&self, offset: u32) -> Rect {
        let offset = offset as i32;
        Rect::at(self.min_x as i32 - offset, self.min_y as i32 - offset)
            .of_size(self.width() + 2 * offset as u32, self.height() + 2 * offset as u32)
    }
}

/// Subject border configuration
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct SubjectBorderConfig {
    #[derivative(Default(value = "DEFAULT_BORDER_COLOR"))]
    color: Color,

    width: BorderWidth,
}

impl SubjectBorderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn width(&self) -> BorderWidth {
        self.width
    }
}

impl Effect for SubjectBorderConfig {
    /// Draws `width` one-pixel rings just outside the subject bounding box.
    /// Ring pixels outside the canvas are dropped.
    fn apply(&self, image: &mut RgbaImage) -> Result<()> {
        let bbox = BoundingBox::of_subject(image).ok_or(Error::NoSubjectFound)?;
        let color = self.color.to_rgba();

        for ring in 1..=self.width.value() {
            draw_hollow_rect_mut(image, bbox.grown(ring), color);
        }

        log::debug!(
            "border {} ({}px) around subject {bbox:?}",
            self.color,
            self.width.value()
        );

        Ok(())
    }
}
