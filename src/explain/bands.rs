use crate::scoring::ScoreBands;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeOp {
    GreaterThan(f64),
    Between(f64, f64), // Inclusive range: low..=high
    Any,
}

impl RangeOp {
    pub fn matches(&self, value: f64) -> bool {
        match self {
            RangeOp::GreaterThan(n) => value > *n,
            RangeOp::Between(low, high) => value >= *low && value <= *high,
            RangeOp::Any => true,
        }
    }
}

/// One band of a factor: a range and the phrase used when a value falls in it.
#[derive(Debug, Clone, Copy)]
pub struct Band {
    pub range: RangeOp,
    pub text: &'static str,
}

/// Phrase of the first band that matches `value`. Band tables end with `Any`,
/// so a match always exists; an empty table yields an empty phrase.
pub fn pick(bands: &[Band], value: f64) -> &'static str {
    bands
        .iter()
        .find(|band| band.range.matches(value))
        .map(|band| band.text)
        .unwrap_or_default()
}

pub const IMPORTANCE: [Band; 3] = [
    Band {
        range: RangeOp::GreaterThan(4.0),
        text: "this requirement is crucial to the project's goals and should be addressed promptly.",
    },
    Band {
        range: RangeOp::Between(3.0, 4.0),
        text: "it aligns well with project objectives, making it moderately important.",
    },
    Band {
        range: RangeOp::Any,
        text: "it has a lower impact on overall project objectives, suggesting it may be less critical.",
    },
];

pub const COMPLEXITY: [Band; 3] = [
    Band {
        range: RangeOp::GreaterThan(3.0),
        text: "a significant level of effort and resources required for implementation. This may affect scheduling and prioritization.",
    },
    Band {
        range: RangeOp::Between(2.0, 3.0),
        text: "a manageable level of complexity, suggesting that it requires moderate resources but is feasible within the current timeline.",
    },
    Band {
        range: RangeOp::Any,
        text: "minimal complexity, meaning it would require fewer resources, which may boost its priority.",
    },
];

pub const URGENCY: [Band; 3] = [
    Band {
        range: RangeOp::GreaterThan(4.0),
        text: "this requirement demands immediate attention and is crucial for timely implementation.",
    },
    Band {
        range: RangeOp::Between(3.0, 4.0),
        text: "this requirement should be addressed soon but may not need immediate focus.",
    },
    Band {
        range: RangeOp::Any,
        text: "its implementation can be delayed, as it is less time-sensitive.",
    },
];

/// Overall bands depend on the configured thresholds.
pub fn overall(thresholds: &ScoreBands) -> [Band; 3] {
    [
        Band {
            range: RangeOp::GreaterThan(thresholds.high),
            text: "Overall, this requirement is prioritized highly due to its strong alignment with project goals and needs.",
        },
        Band {
            range: RangeOp::Between(thresholds.moderate, thresholds.high),
            text: "This requirement has a moderate priority, balancing relevance, feasibility, and timeliness.",
        },
        Band {
            range: RangeOp::Any,
            text: "This requirement has a lower priority and could be revisited based on further project developments.",
        },
    ]
}
