/// Ease-out quartic: `1 - (1 - t)^4`, with `t` clamped to `[0, 1]`.
#[inline]
pub fn ease_out_quart(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    let inv = 1.0 - t;
    1.0 - inv * inv * inv * inv
}

/// Value shown at eased progress `eased` between `start` and `target`,
/// floored to an integer.
pub fn interpolate(start: u64, target: u64, eased: f64) -> u64 {
    let from = start as f64;
    let value = from + (target as f64 - from) * eased;
    value.floor().max(0.0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ease_out_quart_hits_both_ends() {
        assert_eq!(ease_out_quart(0.0), 0.0);
        assert_eq!(ease_out_quart(1.0), 1.0);
        assert_eq!(ease_out_quart(-3.0), 0.0);
        assert_eq!(ease_out_quart(7.0), 1.0);
    }

    #[test]
    fn ease_out_quart_front_loads_progress() {
        // 1 - 0.5^4
        assert!((ease_out_quart(0.5) - 0.9375).abs() < 1e-12);
        let mut last = 0.0;
        for step in 0..=100 {
            let eased = ease_out_quart(step as f64 / 100.0);
            assert!(eased >= last);
            last = eased;
        }
    }

    #[test]
    fn interpolate_floors() {
        assert_eq!(interpolate(0, 250, 0.5), 125);
        assert_eq!(interpolate(0, 98, 0.9375), 91);
        assert_eq!(interpolate(10, 20, 0.99), 19);
        assert_eq!(interpolate(0, 98, 1.0), 98);
    }

    #[test]
    fn interpolate_counts_down_when_start_is_above_target() {
        assert_eq!(interpolate(100, 0, 0.0), 100);
        assert_eq!(interpolate(100, 0, 0.25), 75);
        assert_eq!(interpolate(100, 0, 1.0), 0);
    }
}
