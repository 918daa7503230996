use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use crate::classify::{self, LearnerBand};
use crate::config::Thresholds;
use crate::models::ScoreRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BandDistribution {
    pub excellent: usize,
    pub good: usize,
    pub average: usize,
    pub poor: usize,
}

impl BandDistribution {
    pub fn add(&mut self, band: LearnerBand) {
        match band {
            LearnerBand::Excellent => self.excellent += 1,
            LearnerBand::Good => self.good += 1,
            LearnerBand::Average => self.average += 1,
            LearnerBand::Poor => self.poor += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.excellent + self.good + self.average + self.poor
    }
}

pub fn distribution<I>(percentages: I, thresholds: &Thresholds) -> BandDistribution
where
    I: IntoIterator<Item = f64>,
{
    let mut counts = BandDistribution::default();
    for value in percentages {
        counts.add(classify::classify_learner(value, thresholds));
    }
    counts
}

#[derive(Debug, Clone, Serialize)]
pub struct AggregateBucket {
    pub key: String,
    /// Records grouped under the key, including ones with no usable maximum.
    pub records: usize,
    /// Records that produced a percentage; the mean covers only these.
    pub count: usize,
    pub mean: Option<f64>,
    pub distribution: BandDistribution,
}

pub fn aggregate_by<F, K>(
    records: &[ScoreRecord],
    thresholds: &Thresholds,
    key_fn: F,
) -> Vec<AggregateBucket>
where
    F: Fn(&ScoreRecord) -> K,
    K: ToString,
{
    let mut groups: HashMap<String, (usize, usize, f64, BandDistribution)> = HashMap::new();

    for record in records {
        let entry = groups.entry(key_fn(record).to_string()).or_default();
        entry.0 += 1;
        if let Some(value) = record.percentage() {
            entry.1 += 1;
            entry.2 += value;
            entry.3.add(classify::classify_learner(value, thresholds));
        }
    }

    let mut buckets: Vec<AggregateBucket> = groups
        .into_iter()
        .map(|(key, (records, count, sum, distribution))| AggregateBucket {
            key,
            records,
            count,
            mean: if count > 0 {
                Some(sum / count as f64)
            } else {
                None
            },
            distribution,
        })
        .collect();

    buckets.sort_by(|a, b| a.key.cmp(&b.key));
    buckets
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedBucket {
    /// None for buckets with no mean; they trail the ranking.
    pub rank: Option<usize>,
    pub bucket: AggregateBucket,
}

/// Competition ranking by mean, descending: buckets with equal means share a
/// rank and the next distinct mean skips the tied positions (1, 2, 2, 4).
pub fn rank_by_mean(mut buckets: Vec<AggregateBucket>) -> Vec<RankedBucket> {
    buckets.sort_by(|a, b| match (a.mean, b.mean) {
        (Some(x), Some(y)) => y
            .partial_cmp(&x)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.key.cmp(&b.key)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.key.cmp(&b.key),
    });

    let mut ranked = Vec::with_capacity(buckets.len());
    let mut last_mean: Option<f64> = None;
    let mut last_rank = 0usize;

    for (index, bucket) in buckets.into_iter().enumerate() {
        let rank = bucket.mean.map(|mean| {
            let rank = if last_mean == Some(mean) {
                last_rank
            } else {
                index + 1
            };
            last_mean = Some(mean);
            last_rank = rank;
            rank
        });
        ranked.push(RankedBucket { rank, bucket });
    }

    ranked
}
