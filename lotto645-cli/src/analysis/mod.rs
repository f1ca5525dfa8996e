pub mod cache;
pub mod sampler;
pub mod weights;

use lotto645_draws::models::{Draw, FrequencyTag, MAX_NUMBER, NumberStats, WeightTable};

/// `draws[0]` = tirage le plus récent.
pub fn compute_stats(draws: &[Draw], table: &WeightTable) -> Vec<NumberStats> {
    let mut stats: Vec<NumberStats> = table
        .iter()
        .map(|(number, weight)| NumberStats {
            number,
            frequency: 0,
            bonus_frequency: 0,
            gap: 0,
            weight,
            tag: FrequencyTag::Normal,
        })
        .collect();
    let mut seen = [false; MAX_NUMBER as usize];

    for (i, draw) in draws.iter().enumerate() {
        for &n in &draw.main {
            let idx = (n as usize).wrapping_sub(1);
            if idx < stats.len() {
                stats[idx].frequency += 1;
                if !seen[idx] {
                    seen[idx] = true;
                    stats[idx].gap = i as u32;
                }
            }
        }
        let idx = (draw.bonus as usize).wrapping_sub(1);
        if idx < stats.len() {
            stats[idx].bonus_frequency += 1;
        }
    }

    for (stat, seen) in stats.iter_mut().zip(seen) {
        if !seen {
            stat.gap = draws.len() as u32;
        }
    }

    tag_weights(&mut stats);
    stats
}

pub fn tag_weights(stats: &mut [NumberStats]) {
    if stats.is_empty() {
        return;
    }
    let mean = stats.iter().map(|s| s.weight).sum::<f64>() / stats.len() as f64;
    let threshold = 0.3;

    for s in stats.iter_mut() {
        let deviation = (s.weight - mean) / mean;
        s.tag = if deviation > threshold {
            FrequencyTag::Hot
        } else if deviation < -threshold {
            FrequencyTag::Cold
        } else {
            FrequencyTag::Normal
        };
    }
}

/// Tirages synthétiques valides, du plus récent au plus ancien.
#[cfg(test)]
pub(crate) fn make_test_draws(n: usize) -> Vec<Draw> {
    (0..n)
        .map(|i| {
            let base = (i * 7 % 39) as u8 + 1;
            let main = [base, base + 1, base + 2, base + 3, base + 4, base + 5];
            Draw::new((n - i) as u32, main, base + 6)
        })
        .collect()
}
