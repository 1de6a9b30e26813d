//! Aggregate quest statistics.

/// Raw sums produced by a single pass over the quest collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuestTotals {
    pub total: u64,
    pub prepare: u64,
    pub active: u64,
    pub done: u64,
    pub studied_minutes: i64,
    pub suggested_minutes: i64,
}

/// Statistics reported to clients.
///
/// # Examples
/// ```
/// use effortee::domain::{QuestStats, QuestTotals};
///
/// let stats = QuestStats::from(QuestTotals {
///     studied_minutes: 30,
///     suggested_minutes: 60,
///     ..QuestTotals::default()
/// });
/// assert_eq!(stats.completion_rate(), "50.00%");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestStats {
    totals: QuestTotals,
    completion_rate: String,
}

impl QuestStats {
    pub fn totals(&self) -> &QuestTotals {
        &self.totals
    }

    /// Studied over suggested minutes as a percentage with two decimals,
    /// or `"0%"` when nothing is suggested.
    pub fn completion_rate(&self) -> &str {
        &self.completion_rate
    }
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "minute sums stay far below 2^53 and the rate is a display value"
)]
fn completion_rate(studied: i64, suggested: i64) -> String {
    if suggested == 0 {
        return "0%".to_owned();
    }
    let rate = studied as f64 / suggested as f64 * 100.0;
    format!("{rate:.2}%")
}

impl From<QuestTotals> for QuestStats {
    fn from(totals: QuestTotals) -> Self {
        Self {
            completion_rate: completion_rate(totals.studied_minutes, totals.suggested_minutes),
            totals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(30, 60, "50.00%")]
    #[case(0, 0, "0%")]
    #[case(10, 0, "0%")]
    #[case(1, 3, "33.33%")]
    #[case(90, 60, "150.00%")]
    #[case(0, 45, "0.00%")]
    fn formats_completion_rate(
        #[case] studied: i64,
        #[case] suggested: i64,
        #[case] expected: &str,
    ) {
        let stats = QuestStats::from(QuestTotals {
            studied_minutes: studied,
            suggested_minutes: suggested,
            ..QuestTotals::default()
        });
        assert_eq!(stats.completion_rate(), expected);
    }

    #[rstest]
    fn empty_collection_is_all_zero() {
        let stats = QuestStats::from(QuestTotals::default());
        assert_eq!(stats.totals(), &QuestTotals::default());
        assert_eq!(stats.completion_rate(), "0%");
    }
}
