//! Percentage schedules for pouring the hot liquid.

use itertools::Itertools;

/// Total of a schedule, in hundredths of a percent.
pub const SCHEDULE_TOTAL: u32 = 10_000;

/// Ramped schedule in hundredths of a percent: batch `i` gets weight `i`, so the first
/// pour is a drizzle and the last is the largest.
///
/// The peak contact temperature comes from that last, large pour. With few batches it
/// carries a big share of the hot liquid (half of it for three batches), which is what
/// pushes short schedules past the coagulation ceiling.
///
/// Shares are floored to 0.01 % and the shortfall is handed out one hundredth at a
/// time to the batches with the largest remainders (lower batch first on ties), so the
/// result always sums to exactly [`SCHEDULE_TOTAL`].
pub fn ramped_schedule(batch_count: usize) -> Vec<u32> {
    if batch_count == 0 {
        return Vec::new();
    }
    let weights: Vec<u64> = (1..=batch_count as u64).collect();
    let weight_sum: u64 = weights.iter().sum();

    let shares: Vec<(u64, u64)> = weights
        .iter()
        .map(|w| {
            let scaled = w * SCHEDULE_TOTAL as u64;
            (scaled / weight_sum, scaled % weight_sum)
        })
        .collect();

    let mut units: Vec<u32> = shares.iter().map(|(floor, _)| *floor as u32).collect();
    let shortfall = SCHEDULE_TOTAL - units.iter().sum::<u32>();

    shares
        .iter()
        .enumerate()
        .sorted_by(|(ia, (_, ra)), (ib, (_, rb))| rb.cmp(ra).then(ia.cmp(ib)))
        .take(shortfall as usize)
        .for_each(|(index, _)| units[index] += 1);

    units
}

/// Hundredths of a percent as a percentage.
pub fn to_percent(units: u32) -> f64 {
    units as f64 / 100.0
}
