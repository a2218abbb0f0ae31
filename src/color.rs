use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use yelp_explorer::pipeline::hours::RatingBucket;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

fn hsl_to_color32(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| hsl_to_color32((i as f32 / n as f32) * 360.0, 0.75, 0.55))
        .collect()
}

// ---------------------------------------------------------------------------
// Rating colours
// ---------------------------------------------------------------------------

/// Continuous red → green scale over ratings 0–5.
pub fn rating_color(rating: f64) -> Color32 {
    let t = (rating / 5.0).clamp(0.0, 1.0) as f32;
    hsl_to_color32(t * 120.0, 0.7, 0.45)
}

/// Fixed colour per rating bucket, ascending blue, green, orange, red, purple.
pub fn bucket_color(bucket: RatingBucket) -> Color32 {
    match bucket {
        RatingBucket::One => Color32::from_rgb(0x1f, 0x77, 0xb4),
        RatingBucket::Two => Color32::from_rgb(0x2c, 0xa0, 0x2c),
        RatingBucket::Three => Color32::from_rgb(0xff, 0x7f, 0x0e),
        RatingBucket::Four => Color32::from_rgb(0xd6, 0x27, 0x28),
        RatingBucket::Five => Color32::from_rgb(0x94, 0x67, 0xbd),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_size() {
        assert!(generate_palette(0).is_empty());
        let colors = generate_palette(4);
        assert_eq!(colors.len(), 4);
        assert_ne!(colors[0], colors[2]);
    }

    #[test]
    fn test_rating_scale_ends() {
        let low = rating_color(0.0);
        let high = rating_color(5.0);
        assert!(low.r() > low.g());
        assert!(high.g() > high.r());
        assert_eq!(rating_color(9.0), high);
    }

    #[test]
    fn test_bucket_colors_distinct() {
        let colors: Vec<Color32> = RatingBucket::ALL.into_iter().map(bucket_color).collect();
        for (i, a) in colors.iter().enumerate() {
            assert!(colors[i + 1..].iter().all(|b| b != a));
        }
    }
}
