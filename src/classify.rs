use serde::Serialize;

use crate::config::Thresholds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LearnerBand {
    Excellent,
    Good,
    Average,
    Poor,
}

impl LearnerBand {
    pub fn label(self) -> &'static str {
        match self {
            LearnerBand::Excellent => "Excellent",
            LearnerBand::Good => "Good",
            LearnerBand::Average => "Average",
            LearnerBand::Poor => "Poor",
        }
    }

    /// 0 is the best band; sorting ascending puts stronger students first.
    pub fn severity_rank(self) -> u8 {
        match self {
            LearnerBand::Excellent => 0,
            LearnerBand::Good => 1,
            LearnerBand::Average => 2,
            LearnerBand::Poor => 3,
        }
    }

    /// The simplified three-way view some dashboards show. Derived from the
    /// canonical bands so there is a single threshold table.
    pub fn pace(self) -> LearnerPace {
        match self {
            LearnerBand::Excellent => LearnerPace::Fast,
            LearnerBand::Good | LearnerBand::Average => LearnerPace::Average,
            LearnerBand::Poor => LearnerPace::Slow,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LearnerPace {
    Fast,
    Average,
    Slow,
}

impl LearnerPace {
    pub fn label(self) -> &'static str {
        match self {
            LearnerPace::Fast => "Fast",
            LearnerPace::Average => "Average",
            LearnerPace::Slow => "Slow",
        }
    }
}

pub fn classify_learner(average: f64, thresholds: &Thresholds) -> LearnerBand {
    if average >= thresholds.excellent_cut {
        LearnerBand::Excellent
    } else if average >= thresholds.good_cut {
        LearnerBand::Good
    } else if average >= thresholds.average_cut {
        LearnerBand::Average
    } else {
        LearnerBand::Poor
    }
}
