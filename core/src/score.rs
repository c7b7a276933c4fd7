use core::num::NonZeroU32;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StarRating {
    One,
    Two,
    Three,
}

impl StarRating {
    /// Two stars within 20% of the optimum, three stars for hitting it exactly.
    pub fn rate(optimum: NonZeroU32, steps: NonZeroU32) -> Self {
        let (optimum, steps) = (u64::from(optimum.get()), u64::from(steps.get()));

        if steps == optimum {
            Self::Three
        } else if 5 * steps < 6 * optimum {
            Self::Two
        } else {
            Self::One
        }
    }

    pub const fn count(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::One => "Good job!",
            Self::Two => "Well done!",
            Self::Three => "Excellent!",
        }
    }
}

/// Result of a completed level.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub points: u32,
    pub stars: StarRating,
    pub steps: NonZeroU32,
    pub optimum: NonZeroU32,
}

impl Score {
    /// `points = floor(optimum / steps * 100 * optimum)`, evaluated exactly in integers and
    /// saturated to `u32::MAX`.
    pub fn compute(optimum: NonZeroU32, steps: NonZeroU32) -> Self {
        // 100 * u32::MAX² fits in u128.
        let opt = u128::from(optimum.get());
        let points = 100 * opt * opt / u128::from(steps.get());

        Self {
            points: u32::try_from(points).unwrap_or(u32::MAX),
            stars: StarRating::rate(optimum, steps),
            steps,
            optimum,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nz(value: u32) -> NonZeroU32 {
        NonZeroU32::new(value).unwrap()
    }

    #[test]
    fn star_rating_table() {
        let cases = [
            (4, 4, StarRating::Three),
            (4, 5, StarRating::One),
            (10, 11, StarRating::Two),
            (10, 12, StarRating::One),
            (5, 5, StarRating::Three),
            (5, 6, StarRating::One),
            (6, 7, StarRating::Two),
            (1, 2, StarRating::One),
        ];

        for (optimum, steps, expected) in cases {
            assert_eq!(
                StarRating::rate(nz(optimum), nz(steps)),
                expected,
                "optimum {optimum}, steps {steps}"
            );
        }
    }

    #[test]
    fn points_follow_formula() {
        assert_eq!(Score::compute(nz(4), nz(4)).points, 400);
        assert_eq!(Score::compute(nz(4), nz(5)).points, 320);
        assert_eq!(Score::compute(nz(10), nz(11)).points, 909);
        assert_eq!(Score::compute(nz(3), nz(7)).points, 128);
    }

    #[test]
    fn huge_optimum_saturates_points() {
        assert_eq!(Score::compute(nz(1_000_000_000), nz(1)).points, u32::MAX);
        assert_eq!(Score::compute(nz(u32::MAX), nz(1)).points, u32::MAX);
        assert_eq!(
            Score::compute(nz(u32::MAX), nz(u32::MAX)).stars,
            StarRating::Three
        );
        assert_eq!(Score::compute(nz(1_000_000), nz(1_000_000_000)).points, 100_000);
    }

    #[test]
    fn beating_the_optimum_is_not_three_stars() {
        let score = Score::compute(nz(5), nz(4));

        assert_eq!(score.stars, StarRating::Two);
        assert_eq!(score.points, 625);
    }

    #[test]
    fn titles_per_star_count() {
        assert_eq!(StarRating::One.title(), "Good job!");
        assert_eq!(StarRating::Two.count(), 2);
        assert_eq!(StarRating::Three.title(), "Excellent!");
    }
}
