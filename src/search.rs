//! Bounded binary search for the longest chunk whose frame fits a byte budget.
//!
//! The search knows nothing about the engine. It asks a probe closure to
//! compress a candidate length and only looks at the sizes it reports.

use tracing::trace;

/// Most probes spent on one chunk. When the budget runs out the best length so
/// far is kept, even if a longer one would have fit.
pub const MAX_PROBES: usize = 10;

/// Upper bound of the search range, as a multiple of the budget.
pub const SEARCH_SPAN: usize = 4;

/// What a probe reports for one candidate length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe {
    pub consumed: usize,
    pub produced: usize,
    pub finished: bool,
}

impl Probe {
    /// A candidate fits when the whole of it became one finished frame strictly below `budget`.
    #[must_use]
    pub const fn fits(&self, candidate: usize, budget: usize) -> bool {
        self.finished && self.consumed == candidate && self.produced < budget
    }
}

/// The best feasible candidate of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fit {
    /// Source bytes absorbed.
    pub length: usize,
    /// Compressed size reported for `length`.
    pub produced: usize,
    /// The last probe evaluated was this one, so its output is still in the scratch region.
    pub last_probed: bool,
}

/// Searches `[budget, min(remaining, budget * SEARCH_SPAN)]` for the longest
/// candidate whose frame stays under `budget`.
///
/// Returns `Ok(None)` when no probe fits. Probe errors end the search.
pub fn fit_chunk<E, F>(budget: usize, remaining: usize, mut probe: F) -> Result<Option<Fit>, E>
where
    F: FnMut(usize) -> Result<Probe, E>,
{
    let mut low = budget;
    let mut high = remaining.min(budget.saturating_mul(SEARCH_SPAN));
    let mut best: Option<Fit> = None;

    for _ in 0..MAX_PROBES {
        if low > high || low == 0 {
            break;
        }
        let mid = low + (high - low) / 2;
        let result = probe(mid)?;
        let fits = result.fits(mid, budget);
        trace!(mid, produced = result.produced, fits, "probe");

        if let Some(best) = best.as_mut() {
            best.last_probed = false;
        }
        if fits {
            best = Some(Fit {
                length: mid,
                produced: result.produced,
                last_probed: true,
            });
            low = mid + 1;
        } else {
            high = mid - 1;
        }
    }

    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    /// Fake engine: a frame costs a fixed header plus `ratio` of its input.
    fn linear_probe(header: usize, ratio: f64) -> impl FnMut(usize) -> Result<Probe, Infallible> {
        move |len| {
            Ok(Probe {
                consumed: len,
                produced: header + (len as f64 * ratio) as usize,
                finished: true,
            })
        }
    }

    #[test]
    fn test_finds_longest_fitting_length() {
        // 10 + len/4 < 100  <=>  len < 360
        let fit = fit_chunk(100, 10_000, linear_probe(10, 0.25)).unwrap().unwrap();
        assert_eq!(fit.length, 359);
        assert_eq!(fit.produced, 99);
    }

    #[test]
    fn test_range_capped_by_span() {
        let fit = fit_chunk(100, 10_000, linear_probe(0, 0.01)).unwrap().unwrap();
        assert_eq!(fit.length, 400);
        assert!(fit.last_probed);
    }

    #[test]
    fn test_range_capped_by_remaining() {
        let fit = fit_chunk(100, 150, linear_probe(0, 0.1)).unwrap().unwrap();
        assert_eq!(fit.length, 150);
    }

    #[test]
    fn test_nothing_fits() {
        assert_eq!(fit_chunk(100, 1000, linear_probe(0, 1.5)).unwrap(), None);
    }

    #[test]
    fn test_short_tail_probes_once() {
        let mut calls = Vec::new();
        let fit = fit_chunk(40, 40, |len| {
            calls.push(len);
            Ok::<_, Infallible>(Probe {
                consumed: len,
                produced: 12,
                finished: true,
            })
        })
        .unwrap()
        .unwrap();
        assert_eq!(calls, [40]);
        assert_eq!(fit.length, 40);
    }

    #[test]
    fn test_probe_budget_is_bounded() {
        let mut calls = 0;
        let _ = fit_chunk(1 << 20, usize::MAX, |len| {
            calls += 1;
            Ok::<_, Infallible>(Probe {
                consumed: len,
                produced: 0,
                finished: true,
            })
        });
        assert_eq!(calls, MAX_PROBES);
    }

    #[test]
    fn test_earlier_best_is_not_last_probed() {
        // Probes 25, 17, 21, 19, 20: the final one overshoots.
        let fit = fit_chunk(10, 40, |len| {
            Ok::<_, Infallible>(Probe {
                consumed: len,
                produced: if len <= 19 { 5 } else { 10 },
                finished: true,
            })
        })
        .unwrap()
        .unwrap();
        assert!(!fit.last_probed);
        assert_eq!(fit.length, 19);
    }

    #[test]
    fn test_partial_consumption_does_not_fit() {
        let fit = fit_chunk(50, 200, |len| {
            Ok::<_, Infallible>(Probe {
                consumed: len.min(120),
                produced: 10,
                finished: true,
            })
        })
        .unwrap()
        .unwrap();
        assert_eq!(fit.length, 120);
    }

    #[test]
    fn test_probe_error_stops_search() {
        let result: Result<Option<Fit>, &str> = fit_chunk(10, 100, |_| Err("engine down"));
        assert_eq!(result, Err("engine down"));
    }
}
