//! Brightness to character mapping.

use super::charset::LuminanceRamp;

/// Ramp index for a luminance value.
///
/// `index = floor(luminance * levels / 256)`, clamped to `[0, levels - 1]`.
/// Non-decreasing in `luminance` for any ramp length.
#[inline]
pub fn ramp_index(luminance: u8, levels: usize) -> usize {
    if levels == 0 {
        return 0;
    }
    (luminance as usize * levels / 256).min(levels - 1)
}

/// Map brightness values to characters.
///
/// Lower brightness maps to earlier (darker) characters of the ramp.
///
/// # Arguments
/// * `brightness` - Brightness values (0-255), one per character cell
/// * `ramp` - Characters ordered from darkest to lightest
/// * `invert` - If true, invert brightness before mapping (for light-on-dark output)
///
/// # Example
/// ```
/// use asciivision::ascii::{map_to_chars, LuminanceRamp};
/// let chars = map_to_chars(&[0, 128, 255], &LuminanceRamp::default(), false);
/// assert_eq!(chars, vec!['@', '=', ' ']);
/// ```
pub fn map_to_chars(brightness: &[u8], ramp: &LuminanceRamp, invert: bool) -> Vec<char> {
    let mut out = Vec::new();
    map_to_chars_into(brightness, ramp, invert, &mut out);
    out
}

/// Map brightness values to characters, reusing an existing buffer.
///
/// # Returns
/// The number of characters written to the buffer.
pub fn map_to_chars_into(
    brightness: &[u8],
    ramp: &LuminanceRamp,
    invert: bool,
    buffer: &mut Vec<char>,
) -> usize {
    buffer.clear();
    buffer.reserve(brightness.len());
    let levels = ramp.len();

    for &b in brightness {
        let b = if invert { 255 - b } else { b };
        buffer.push(ramp.get(ramp_index(b, levels)));
    }

    brightness.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_bounds() {
        assert_eq!(ramp_index(0, 10), 0);
        assert_eq!(ramp_index(255, 10), 9);
        assert_eq!(ramp_index(255, 1), 0);
        assert_eq!(ramp_index(25, 10), 0);
        assert_eq!(ramp_index(26, 10), 1);
    }

    #[test]
    fn index_is_monotonic() {
        for levels in [1, 2, 3, 5, 10, 70, 256, 300] {
            let mut prev = 0;
            for l in 0..=255u8 {
                let idx = ramp_index(l, levels);
                assert!(idx >= prev, "levels={} l={}", levels, l);
                assert!(idx < levels);
                prev = idx;
            }
        }
    }

    #[test]
    fn invert_flips_ends() {
        let ramp = LuminanceRamp::default();
        assert_eq!(map_to_chars(&[0, 255], &ramp, true), vec![' ', '@']);
    }
}
