/// Empirical RGB skin rule.
///
/// A pixel counts as skin when it is bright enough, clearly red-dominant,
/// and not washed out: R > 95, G > 40, B > 20, max−min > 15, |R−G| > 15,
/// R > G, R > B.
pub fn is_skin_pixel(r: u8, g: u8, b: u8) -> bool {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    r > 95
        && g > 40
        && b > 20
        && max - min > 15
        && r.abs_diff(g) > 15
        && r > g
        && r > b
}

/// Fraction of skin pixels in an RGB window, in [0, 1].
pub fn skin_fraction(pixels: impl Iterator<Item = [u8; 3]>) -> f64 {
    let mut total = 0usize;
    let mut skin = 0usize;
    for [r, g, b] in pixels {
        total += 1;
        if is_skin_pixel(r, g, b) {
            skin += 1;
        }
    }
    if total == 0 {
        return 0.0;
    }
    skin as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case::light_tone(224, 172, 145)]
    #[case::medium_tone(182, 130, 108)]
    #[case::warm_tone(200, 150, 120)]
    fn test_accepts_skin_tones(#[case] r: u8, #[case] g: u8, #[case] b: u8) {
        assert!(is_skin_pixel(r, g, b));
    }

    #[rstest]
    #[case::gray(128, 128, 128)]
    #[case::green(60, 180, 60)]
    #[case::blue(60, 80, 200)]
    #[case::too_dark(90, 50, 30)]
    #[case::red_equals_green(150, 150, 60)]
    #[case::washed_out(250, 245, 240)]
    fn test_rejects_non_skin(#[case] r: u8, #[case] g: u8, #[case] b: u8) {
        assert!(!is_skin_pixel(r, g, b));
    }

    #[test]
    fn test_skin_fraction_mixed() {
        let pixels = vec![
            [224, 172, 145], // skin
            [128, 128, 128], // gray
            [182, 130, 108], // skin
            [60, 80, 200],   // blue
        ];
        assert_relative_eq!(skin_fraction(pixels.into_iter()), 0.5);
    }

    #[test]
    fn test_skin_fraction_empty_is_zero() {
        assert_relative_eq!(skin_fraction(std::iter::empty()), 0.0);
    }
}
