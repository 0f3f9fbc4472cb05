//! Integer helpers for the planner.
//!
//! Square roots and Euclidean distances are approximated with integer arithmetic; none of
//! this is allowed to pull in floating point on the target.

/// Fractional bits of a fixed-point step period.
pub const PERIOD_SHIFT: u32 = 8;

/// Longest step period representable in fixed point while `2 × c` still fits a signed
/// 32-bit value. At 16 MHz this is about 0.26 s, i.e. just under 4 steps/s.
pub const MAX_PERIOD_TICKS: u32 = (1 << 22) - 1;

/// Longest move for which the staged duration computation stays within 32 bits
/// (`distance × 2400` must not overflow). About 1790 mm.
pub const MAX_MOVE_DISTANCE_UM: u32 = u32::MAX / 2400;

/// Convert a period in timer ticks to 24.8 fixed point, clamping at [`MAX_PERIOD_TICKS`].
#[inline]
pub const fn to_fixed(ticks: u32) -> u32 {
    let ticks = if ticks > MAX_PERIOD_TICKS {
        MAX_PERIOD_TICKS
    } else {
        ticks
    };
    ticks << PERIOD_SHIFT
}

/// Convert a 24.8 fixed-point period back to whole timer ticks.
#[inline]
pub const fn to_ticks(fixed: u32) -> u32 {
    fixed >> PERIOD_SHIFT
}

/// Integer square root, rounded down.
pub fn int_sqrt(a: u32) -> u16 {
    let mut op = a;
    let mut res: u32 = 0;
    let mut one: u32 = 1 << 30;

    while one > op {
        one >>= 2;
    }

    while one != 0 {
        if op >= res + one {
            op -= res + one;
            res = (res >> 1) + one;
        } else {
            res >>= 1;
        }
        one >>= 2;
    }

    res as u16
}

/// Bit index of the most significant set bit; 0 for 0.
#[inline]
pub fn msbloc(v: u32) -> u8 {
    if v == 0 {
        0
    } else {
        (31 - v.leading_zeros()) as u8
    }
}

/// Approximate `sqrt(dx² + dy²)` within a few percent.
///
/// Weighted sum of the larger and smaller component, scaled by 1024 and rounded.
pub fn approx_distance_2d(dx: u32, dy: u32) -> u32 {
    let (min, max) = if dx < dy { (dx, dy) } else { (dy, dx) };

    let mut approx = max.saturating_mul(1007).saturating_add(min.saturating_mul(441));
    if max < (min << 4) {
        approx = approx.saturating_sub(max.saturating_mul(40));
    }

    approx.saturating_add(512) >> 10
}

/// Approximate `sqrt(dx² + dy² + dz²)` within about ten percent.
pub fn approx_distance_3d(dx: u32, dy: u32, dz: u32) -> u32 {
    let mut v = [dx, dy, dz];
    v.sort_unstable();
    let [min, med, max] = v;

    let mut approx = max
        .saturating_mul(860)
        .saturating_add(med.saturating_mul(851))
        .saturating_add(min.saturating_mul(520));
    if max < (med << 1) {
        approx = approx.saturating_sub(max.saturating_mul(294));
    }
    if max < (min << 2) {
        approx = approx.saturating_sub(max.saturating_mul(113));
    }
    if med < (min << 2) {
        approx = approx.saturating_sub(med.saturating_mul(40));
    }

    approx.saturating_add(512) >> 10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_sqrt() {
        assert_eq!(int_sqrt(0), 0);
        assert_eq!(int_sqrt(1), 1);
        assert_eq!(int_sqrt(15), 3);
        assert_eq!(int_sqrt(16), 4);
        assert_eq!(int_sqrt(1_000_000), 1000);
        assert_eq!(int_sqrt(u32::MAX), 65535);
    }

    #[test]
    fn test_msbloc() {
        assert_eq!(msbloc(0), 0);
        assert_eq!(msbloc(1), 0);
        assert_eq!(msbloc(0x80), 7);
        assert_eq!(msbloc(u32::MAX), 31);
    }

    #[test]
    fn test_approx_distance_2d() {
        // 3-4-5 triangle scaled up
        let d = approx_distance_2d(30_000, 40_000);
        assert!((49_000..=51_000).contains(&d), "got {}", d);

        // symmetric in its arguments
        assert_eq!(approx_distance_2d(123, 4567), approx_distance_2d(4567, 123));
        assert_eq!(approx_distance_2d(0, 0), 0);
    }

    #[test]
    fn test_approx_distance_3d() {
        // sqrt(3) * 1000
        let d = approx_distance_3d(1000, 1000, 1000);
        assert!((1700..=1780).contains(&d), "got {}", d);

        assert_eq!(
            approx_distance_3d(10, 2000, 300),
            approx_distance_3d(300, 10, 2000)
        );
    }

    #[test]
    fn test_fixed_point_clamp() {
        assert_eq!(to_fixed(1000), 256_000);
        assert_eq!(to_ticks(to_fixed(1000)), 1000);
        assert_eq!(to_ticks(to_fixed(u32::MAX)), MAX_PERIOD_TICKS);
        assert!(to_fixed(u32::MAX) <= (i32::MAX as u32) / 2);
    }
}
