use std::fmt;

/// Theoretical maximum score of a chart.
pub const MAX_SCORE: u32 = 1_010_000;

/// Lower bounds of each rank band, highest first.
pub const SSSP_BORDER: u32 = 1_009_000;
pub const SSS_BORDER: u32 = 1_007_500;
pub const SSP_BORDER: u32 = 1_005_000;
pub const SS_BORDER: u32 = 1_000_000;
pub const S_BORDER: u32 = 975_000;

/// Letter grade of a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rank {
    SSSP,
    SSS,
    SSP,
    SS,
    S,
    /// Below S: no rating contribution.
    Unranked,
}

impl Rank {
    pub fn label(&self) -> &'static str {
        match self {
            Rank::SSSP => "SSSP",
            Rank::SSS => "SSS",
            Rank::SSP => "SSP",
            Rank::SS => "SS",
            Rank::S => "S",
            Rank::Unranked => "?",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Map a score to its rank and the rating contribution it adds on top of the chart constant.
///
/// Bands are checked from the highest border down and the first match wins.
/// Scores above [`MAX_SCORE`] are not clamped and land in the SSSP band.
pub fn score_to_rank_rate(score: u32) -> (Rank, f64) {
    let s = f64::from(score);
    if score >= SSSP_BORDER {
        (Rank::SSSP, 2.15)
    } else if score >= SSS_BORDER {
        (Rank::SSS, 2.0 + (s - f64::from(SSS_BORDER)) * 0.0001)
    } else if score >= SSP_BORDER {
        (Rank::SSP, 1.5 + (s - f64::from(SSP_BORDER)) * 0.0002)
    } else if score >= SS_BORDER {
        (Rank::SS, 1.0 + (s - f64::from(SS_BORDER)) * 0.0001)
    } else if score >= S_BORDER {
        (Rank::S, (s - f64::from(S_BORDER)) * 0.00004)
    } else {
        (Rank::Unranked, 0.0)
    }
}
