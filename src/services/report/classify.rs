// Single source of truth for score banding. Screen, CSV and PDF all color
// through here; callers pick the scale their score is on.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    // 0-100, as rendered category percentages
    Percent,
    // 0-1, as raw category/audit fractions
    Fraction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Good,
    NeedsImprovement,
    Poor,
}

impl ScoreBand {
    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Good => "good",
            ScoreBand::NeedsImprovement => "needs-improvement",
            ScoreBand::Poor => "poor",
        }
    }

    // Lighthouse palette
    pub fn hex(&self) -> &'static str {
        match self {
            ScoreBand::Good => "#0cce6b",
            ScoreBand::NeedsImprovement => "#ffa400",
            ScoreBand::Poor => "#ff4e42",
        }
    }

    // Same palette as normalized RGB, for the PDF content stream
    pub fn rgb(&self) -> (f32, f32, f32) {
        match self {
            ScoreBand::Good => (0.047, 0.808, 0.420),
            ScoreBand::NeedsImprovement => (1.0, 0.643, 0.0),
            ScoreBand::Poor => (1.0, 0.306, 0.259),
        }
    }
}

// Upper band is inclusive: 90 (or 0.9) already classifies as good.
pub fn classify(score: f64, scale: Scale) -> ScoreBand {
    let pct = match scale {
        Scale::Percent => score,
        Scale::Fraction => score * 100.0,
    };
    if pct >= 90.0 {
        ScoreBand::Good
    } else if pct >= 50.0 {
        ScoreBand::NeedsImprovement
    } else {
        ScoreBand::Poor
    }
}
