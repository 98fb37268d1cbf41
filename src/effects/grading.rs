//! Color grading looks

use super::{apply_all, ChannelScale, Contrast, Effect, Saturation};
use crate::{config::ColorGrading, error::Result};
use image::RgbImage;

impl Effect for ColorGrading {
    fn apply(&self, image: &mut RgbImage) -> Result<()> {
        match self {
            Self::Warm => ChannelScale([1.1, 1.05, 1.0]).apply(image),
            Self::Cool => ChannelScale([1.0, 1.0, 1.15]).apply(image),
            Self::Dramatic | Self::Luxury => {
                apply_all(image, &[&Contrast(1.2), &Saturation(1.1)])
            },
            Self::Neutral => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_warm_and_cool_shift_channels() {
        let base = RgbImage::from_pixel(4, 4, Rgb([100, 100, 100]));

        let mut warm = base.clone();
        ColorGrading::Warm.apply(&mut warm).unwrap();
        assert_eq!(*warm.get_pixel(0, 0), Rgb([110, 105, 100]));

        let mut cool = base.clone();
        ColorGrading::Cool.apply(&mut cool).unwrap();
        assert_eq!(*cool.get_pixel(0, 0), Rgb([100, 100, 115]));

        let mut neutral = base.clone();
        ColorGrading::Neutral.apply(&mut neutral).unwrap();
        assert_eq!(neutral, base);
    }

    #[test]
    fn test_dramatic_matches_luxury() {
        let base = RgbImage::from_fn(8, 8, |x, y| Rgb([x as u8 * 30, y as u8 * 20, 90]));
        let mut dramatic = base.clone();
        let mut luxury = base.clone();
        ColorGrading::Dramatic.apply(&mut dramatic).unwrap();
        ColorGrading::Luxury.apply(&mut luxury).unwrap();
        assert_eq!(dramatic, luxury);
        assert_ne!(dramatic, base);
    }
}
