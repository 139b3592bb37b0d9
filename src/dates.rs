use rand::Rng;

/// The fixed, ordered pool of calendar dates that rewritten commits are
/// distributed across. Every date receives at least one commit, so the
/// repository must contain at least `DATE_POOL.len()` commits.
pub const DATE_POOL: [&str; 13] = [
    "2025-12-01",
    "2025-12-02",
    "2025-12-03",
    "2025-12-04",
    "2025-12-05",
    "2025-12-06",
    "2025-12-07",
    "2025-12-08",
    "2025-12-09",
    "2025-12-10",
    "2025-12-12",
    "2025-12-15",
    "2025-12-16",
];

/// Distributes `commit_count` commits across the date pool.
///
/// Every date starts with one commit; the remaining `commit_count - D`
/// commits are spread by repeated uniform-random selection of a date index.
/// If `commit_count` is smaller than the pool (callers are expected to have
/// rejected that case already), the surplus is simply zero and every date
/// keeps its single commit.
///
/// # Parameters
///
/// * `commit_count` — Total number of commits to assign.
/// * `rng` — Random source; inject a seeded generator for reproducible runs.
///
/// # Returns
///
/// A vector of per-date commit counts, one entry per `DATE_POOL` date, in
/// pool order. Each entry is at least 1 and the entries sum to
/// `max(commit_count, DATE_POOL.len())`.
///
/// # Examples
///
/// ```ignore
/// use rand::{SeedableRng, rngs::StdRng};
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let dist = distribute(20, &mut rng);
/// assert_eq!(dist.iter().sum::<usize>(), 20);
/// ```
pub fn distribute<R: Rng>(commit_count: usize, rng: &mut R) -> Vec<usize> {
    let mut distribution = vec![1usize; DATE_POOL.len()];
    let extra = commit_count.saturating_sub(DATE_POOL.len());

    for _ in 0..extra {
        let index = rng.random_range(0..DATE_POOL.len());
        distribution[index] += 1;
    }

    distribution
}

/// Expands a per-date distribution into one `"YYYY-MM-DD HH:MM:SS"` timestamp
/// per commit, in pool-date order.
///
/// Each date contributes a contiguous block of `count` timestamps with a
/// random time-of-day (hour 9–18, minute and second 0–59). Blocks are emitted
/// in the fixed pool order and are never shuffled, so the sequence is
/// non-decreasing by calendar date and lines up index-for-index with commits
/// traversed oldest-first.
///
/// # Parameters
///
/// * `distribution` — Per-date commit counts, as produced by [`distribute`].
/// * `rng` — Random source for the time-of-day components.
///
/// # Returns
///
/// A vector of timestamp strings whose length equals the distribution sum.
pub fn assign_timestamps<R: Rng>(distribution: &[usize], rng: &mut R) -> Vec<String> {
    let mut timestamps = Vec::with_capacity(distribution.iter().sum());

    for (date, count) in DATE_POOL.iter().zip(distribution.iter()) {
        for _ in 0..*count {
            let hour = rng.random_range(9..=18);
            let minute = rng.random_range(0..=59);
            let second = rng.random_range(0..=59);
            timestamps.push(format!("{date} {hour:02}:{minute:02}:{second:02}"));
        }
    }

    timestamps
}

/// Looks up the timestamp for commit `index`, reusing the last timestamp for
/// any index past the end. The overflow arm is a defensive guard only; under
/// normal operation every commit has its own slot.
pub fn timestamp_for(timestamps: &[String], index: usize) -> &str {
    match timestamps.get(index) {
        Some(ts) => ts.as_str(),
        None => match timestamps.last() {
            Some(ts) => ts.as_str(),
            None => "",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{DATE_POOL, assign_timestamps, distribute, timestamp_for};
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn exact_pool_size_gives_one_commit_per_date() {
        let mut rng = StdRng::seed_from_u64(1);
        let dist = distribute(DATE_POOL.len(), &mut rng);
        assert_eq!(dist.len(), DATE_POOL.len());
        assert!(dist.iter().all(|&c| c == 1));
    }

    #[test]
    fn surplus_commits_are_spread_with_every_date_kept_nonempty() {
        let mut rng = StdRng::seed_from_u64(2);
        let dist = distribute(20, &mut rng);
        assert_eq!(dist.iter().sum::<usize>(), 20);
        assert!(dist.iter().all(|&c| c >= 1));
    }

    #[test]
    fn distribution_is_deterministic_for_a_fixed_seed() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        assert_eq!(distribute(50, &mut a), distribute(50, &mut b));
    }

    #[test]
    fn timestamp_assignment_is_deterministic_for_a_fixed_seed() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        let dist_a = distribute(50, &mut a);
        let dist_b = distribute(50, &mut b);
        assert_eq!(
            assign_timestamps(&dist_a, &mut a),
            assign_timestamps(&dist_b, &mut b)
        );
    }

    #[test]
    fn timestamps_cover_every_commit_in_date_order() {
        let mut rng = StdRng::seed_from_u64(3);
        let dist = distribute(30, &mut rng);
        let timestamps = assign_timestamps(&dist, &mut rng);
        assert_eq!(timestamps.len(), 30);

        // Blocks follow the fixed pool order, so calendar dates never go
        // backwards across the whole sequence.
        let dates: Vec<&str> = timestamps.iter().map(|t| &t[..10]).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);

        // Each pool date owns a block of the expected size.
        let mut offset = 0;
        for (date, count) in DATE_POOL.iter().zip(dist.iter()) {
            for ts in &timestamps[offset..offset + count] {
                assert!(ts.starts_with(date));
            }
            offset += count;
        }
    }

    #[test]
    fn times_of_day_stay_within_working_hours() {
        let mut rng = StdRng::seed_from_u64(4);
        let dist = distribute(100, &mut rng);
        let timestamps = assign_timestamps(&dist, &mut rng);

        for ts in &timestamps {
            // "YYYY-MM-DD HH:MM:SS"
            assert_eq!(ts.len(), 19);
            let hour: u32 = ts[11..13].parse().expect("hour parses");
            let minute: u32 = ts[14..16].parse().expect("minute parses");
            let second: u32 = ts[17..19].parse().expect("second parses");
            assert!((9..=18).contains(&hour));
            assert!(minute <= 59);
            assert!(second <= 59);
        }
    }

    #[test]
    fn overflow_index_reuses_last_timestamp() {
        let timestamps = vec![
            String::from("2025-12-01 09:00:00"),
            String::from("2025-12-02 10:00:00"),
        ];
        assert_eq!(timestamp_for(&timestamps, 1), "2025-12-02 10:00:00");
        assert_eq!(timestamp_for(&timestamps, 5), "2025-12-02 10:00:00");
    }

    #[test]
    fn overflow_on_empty_slice_is_empty() {
        let timestamps: Vec<String> = Vec::new();
        assert_eq!(timestamp_for(&timestamps, 0), "");
    }
}
