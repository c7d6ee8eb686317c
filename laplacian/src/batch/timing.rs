use std::iter::Sum;
use std::time::Duration;

/// Time spent inside filter passes across a batch.
///
/// Built after every image task has joined by reducing the per-task
/// durations, so no task ever touches it concurrently.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimingAggregate {
    total: Duration,
    longest: Duration,
    passes: usize,
}

impl TimingAggregate {
    pub fn add(&mut self, elapsed: Duration) {
        self.total += elapsed;
        self.longest = self.longest.max(elapsed);
        self.passes += 1;
    }

    /// Sum of all pass durations.
    pub fn total(&self) -> Duration {
        self.total
    }

    pub fn total_seconds(&self) -> f64 {
        self.total.as_secs_f64()
    }

    pub fn longest(&self) -> Duration {
        self.longest
    }

    pub fn passes(&self) -> usize {
        self.passes
    }
}

impl FromIterator<Duration> for TimingAggregate {
    fn from_iter<I: IntoIterator<Item = Duration>>(iter: I) -> Self {
        let mut aggregate = TimingAggregate::default();
        iter.into_iter().for_each(|elapsed| aggregate.add(elapsed));
        aggregate
    }
}

impl Sum for TimingAggregate {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(TimingAggregate::default(), |acc, other| TimingAggregate {
            total: acc.total + other.total,
            longest: acc.longest.max(other.longest),
            passes: acc.passes + other.passes,
        })
    }
}
