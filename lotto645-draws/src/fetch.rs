use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use crate::models::Draw;
use crate::source::DrawSource;

pub const BATCH_SIZE: usize = 8;

/// Récupère les tirages en remontant depuis le plus récent, par lots parallèles.
pub struct DrawFetcher<S> {
    source: S,
    pool: rayon::ThreadPool,
    batch_size: usize,
    show_progress: bool,
}

impl<S: DrawSource> DrawFetcher<S> {
    pub fn new(source: S) -> Result<Self> {
        Self::with_batch_size(source, BATCH_SIZE)
    }

    pub fn with_batch_size(source: S, batch_size: usize) -> Result<Self> {
        let batch_size = batch_size.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(batch_size)
            .thread_name(|i| format!("draw-fetch-{i}"))
            .build()
            .context("Impossible de créer le pool de téléchargement")?;
        Ok(Self {
            source,
            pool,
            batch_size,
            show_progress: false,
        })
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn latest_draw_no(&self) -> Result<u32> {
        self.source.fetch_latest_draw_no()
    }

    /// Remonte depuis `latest` jusqu'à obtenir `count` tirages ou atteindre
    /// le tirage 0. Un tirage en échec est ignoré, pas retenté.
    pub fn fetch_draws(&self, latest: u32, count: usize) -> Vec<Draw> {
        let reachable = count.min(latest as usize);
        let pb = if self.show_progress {
            let pb = ProgressBar::new(reachable as u64);
            pb.set_style(
                ProgressStyle::with_template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
            );
            pb
        } else {
            ProgressBar::hidden()
        };

        let step = self.batch_size as u32;
        let mut draws: Vec<Draw> = Vec::with_capacity(reachable);
        let mut start = latest;

        while start > 0 && draws.len() < count {
            let batch = batch_indices(start, step, count - draws.len());
            pb.set_message(format!("tirages {}..{}", start, start.saturating_sub(step - 1).max(1)));

            let results: Vec<(u32, Result<Draw>)> = self.pool.install(|| {
                batch
                    .par_iter()
                    .map(|&no| (no, self.source.fetch_draw(no)))
                    .collect()
            });

            for (no, result) in results {
                pb.inc(1);
                match result {
                    Ok(draw) => draws.push(draw),
                    Err(e) => log::debug!("Tirage {} ignoré : {:#}", no, e),
                }
            }

            start = start.saturating_sub(step);
        }

        pb.finish_and_clear();
        draws
    }
}

/// Indices d'un lot : `start`, `start - 1`, ... sans descendre à 0 ni
/// dépasser `remaining` éléments.
fn batch_indices(start: u32, step: u32, remaining: usize) -> Vec<u32> {
    let floor = start.saturating_sub(step);
    (floor + 1..=start).rev().take(remaining).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    use anyhow::bail;

    struct FakeSource {
        latest: u32,
        failing: HashSet<u32>,
        calls: AtomicUsize,
    }

    impl FakeSource {
        fn new(latest: u32, failing: &[u32]) -> Self {
            Self {
                latest,
                failing: failing.iter().copied().collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl DrawSource for FakeSource {
        fn fetch_latest_draw_no(&self) -> Result<u32> {
            Ok(self.latest)
        }

        fn fetch_draw(&self, draw_no: u32) -> Result<Draw> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.contains(&draw_no) || draw_no > self.latest {
                bail!("tirage {} indisponible", draw_no);
            }
            let base = (draw_no % 39) as u8 + 1;
            Ok(Draw::new(
                draw_no,
                [base, base + 1, base + 2, base + 3, base + 4, base + 5],
                base + 6,
            ))
        }
    }

    #[test]
    fn test_batch_indices() {
        assert_eq!(batch_indices(92, 8, 10), vec![92, 91, 90, 89, 88, 87, 86, 85]);
        assert_eq!(batch_indices(84, 8, 4), vec![84, 83, 82, 81]);
        assert_eq!(batch_indices(3, 8, 10), vec![3, 2, 1]);
        assert!(batch_indices(5, 8, 0).is_empty());
    }

    #[test]
    fn test_partial_failures_are_skipped() {
        let fetcher = DrawFetcher::new(FakeSource::new(92, &[90, 85])).unwrap();
        let draws = fetcher.fetch_draws(92, 10);

        let numbers: Vec<u32> = draws.iter().map(|d| d.draw_no).collect();
        assert_eq!(numbers, vec![92, 91, 89, 88, 87, 86, 84, 83, 82, 81]);
        assert!(draws.iter().all(|d| d.draw_no <= 92));
        assert!(!numbers.contains(&90) && !numbers.contains(&85));
        // 8 au premier lot, 4 au second
        assert_eq!(fetcher.source().calls.load(Ordering::SeqCst), 12);
    }

    #[test]
    fn test_stops_at_draw_zero() {
        let fetcher = DrawFetcher::new(FakeSource::new(9, &[5, 3])).unwrap();
        let draws = fetcher.fetch_draws(9, 10);

        let numbers: Vec<u32> = draws.iter().map(|d| d.draw_no).collect();
        assert_eq!(numbers, vec![9, 8, 7, 6, 4, 2, 1]);
    }

    #[test]
    fn test_exact_count_when_no_failures() {
        let fetcher = DrawFetcher::new(FakeSource::new(500, &[])).unwrap();
        let draws = fetcher.fetch_draws(500, 50);
        assert_eq!(draws.len(), 50);
        assert_eq!(draws[0].draw_no, 500);
        assert_eq!(draws[49].draw_no, 451);
        assert_eq!(fetcher.source().calls.load(Ordering::SeqCst), 50);
    }

    #[test]
    fn test_all_failing_returns_empty() {
        let failing: Vec<u32> = (1..=20).collect();
        let fetcher = DrawFetcher::new(FakeSource::new(20, &failing)).unwrap();
        assert!(fetcher.fetch_draws(20, 10).is_empty());
    }

    #[test]
    fn test_latest_draw_no() {
        let fetcher = DrawFetcher::with_batch_size(FakeSource::new(1100, &[]), 4).unwrap();
        assert_eq!(fetcher.latest_draw_no().unwrap(), 1100);
    }

    #[test]
    fn test_custom_batch_size() {
        let fetcher = DrawFetcher::with_batch_size(FakeSource::new(30, &[29]), 3).unwrap();
        let numbers: Vec<u32> = fetcher.fetch_draws(30, 5).iter().map(|d| d.draw_no).collect();
        assert_eq!(numbers, vec![30, 28, 27, 26, 25]);
    }

    #[test]
    fn test_huge_count_is_bounded_by_latest() {
        let fetcher = DrawFetcher::new(FakeSource::new(3, &[])).unwrap();
        let numbers: Vec<u32> = fetcher
            .fetch_draws(3, u32::MAX as usize)
            .iter()
            .map(|d| d.draw_no)
            .collect();
        assert_eq!(numbers, vec![3, 2, 1]);
        assert_eq!(fetcher.source().calls.load(Ordering::SeqCst), 3);
    }

    /// Source lente qui note les appels simultanés et l'ordre début/fin.
    struct SlowSource {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        events: Mutex<Vec<(u32, bool)>>,
    }

    impl SlowSource {
        fn new() -> Self {
            Self {
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
                events: Mutex::new(Vec::new()),
            }
        }
    }

    impl DrawSource for SlowSource {
        fn fetch_latest_draw_no(&self) -> Result<u32> {
            Ok(100)
        }

        fn fetch_draw(&self, draw_no: u32) -> Result<Draw> {
            self.events.lock().unwrap().push((draw_no, true));
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            thread::sleep(Duration::from_millis(50));

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.events.lock().unwrap().push((draw_no, false));
            Ok(Draw::new(draw_no, [1, 2, 3, 4, 5, 6], 7))
        }
    }

    #[test]
    fn test_batches_run_in_parallel_one_after_another() {
        let fetcher = DrawFetcher::new(SlowSource::new()).unwrap();
        let draws = fetcher.fetch_draws(100, 2 * BATCH_SIZE);
        assert_eq!(draws.len(), 2 * BATCH_SIZE);

        let source = fetcher.source();
        assert_eq!(source.peak.load(Ordering::SeqCst), BATCH_SIZE);

        // Premier lot : 100..93, second lot : 92..85
        let events = source.events.lock().unwrap();
        let last_end_first = events
            .iter()
            .rposition(|&(no, start)| !start && no > 92)
            .unwrap();
        let first_start_second = events
            .iter()
            .position(|&(no, start)| start && no <= 92)
            .unwrap();
        assert!(last_end_first < first_start_second);
    }
}
