//! Transform size selection.

/// How the padded working size is chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PaddingMode {
    /// Round each axis up to the next 2·3·5-smooth length.
    #[default]
    Fast,
    /// Use exactly `a + b - 1` along each axis.
    Minimal,
}

/// Returns the smallest `n >= len` whose only prime factors are 2, 3 and 5.
///
/// Returns `None` if no such value fits in `usize`. `len == 0` maps to 1.
pub fn next_fast_len(len: usize) -> Option<usize> {
    if len <= 1 {
        return Some(1);
    }
    let mut best: Option<usize> = None;
    let mut p5 = 1usize;
    loop {
        let mut p35 = p5;
        loop {
            // Smallest power of two lifting p35 to at least len.
            let mut candidate = Some(p35);
            while let Some(c) = candidate {
                if c >= len {
                    break;
                }
                candidate = c.checked_mul(2);
            }
            if let Some(c) = candidate {
                if best.map_or(true, |b| c < b) {
                    best = Some(c);
                }
            }
            if p35 >= len {
                break;
            }
            p35 = match p35.checked_mul(3) {
                Some(v) => v,
                None => break,
            };
        }
        if p5 >= len {
            break;
        }
        p5 = match p5.checked_mul(5) {
            Some(v) => v,
            None => break,
        };
    }
    best
}

/// Padded length for one axis given the two raster extents along it.
pub(crate) fn padded_len(a: usize, b: usize, mode: PaddingMode) -> Option<usize> {
    let min = a.checked_add(b)?.checked_sub(1)?;
    match mode {
        PaddingMode::Fast => next_fast_len(min),
        PaddingMode::Minimal => Some(min),
    }
}

#[cfg(test)]
mod tests {
    use super::{next_fast_len, padded_len, PaddingMode};

    fn is_smooth(mut n: usize) -> bool {
        for p in [2, 3, 5] {
            while n % p == 0 {
                n /= p;
            }
        }
        n == 1
    }

    #[test]
    fn next_fast_len_known_values() {
        assert_eq!(next_fast_len(0), Some(1));
        assert_eq!(next_fast_len(1), Some(1));
        assert_eq!(next_fast_len(7), Some(8));
        assert_eq!(next_fast_len(11), Some(12));
        assert_eq!(next_fast_len(97), Some(100));
        assert_eq!(next_fast_len(121), Some(125));
        assert_eq!(next_fast_len(1025), Some(1080));
    }

    #[test]
    fn next_fast_len_is_minimal_smooth() {
        for len in 1..600 {
            let n = next_fast_len(len).unwrap();
            assert!(n >= len);
            assert!(is_smooth(n), "{n} is not smooth");
            assert!((len..n).all(|m| !is_smooth(m)), "missed a smaller size for {len}");
        }
    }

    #[test]
    fn padded_len_respects_mode() {
        assert_eq!(padded_len(4, 4, PaddingMode::Minimal), Some(7));
        assert_eq!(padded_len(4, 4, PaddingMode::Fast), Some(8));
        assert_eq!(padded_len(1, 1, PaddingMode::Fast), Some(1));
        assert_eq!(padded_len(usize::MAX, 2, PaddingMode::Minimal), None);
    }
}
