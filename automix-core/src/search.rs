//! Width-bounded beam search over sequencing choices
//!
//! Builds an ordered subsequence of the track pool maximizing the average
//! pairwise compatibility score, subject to a target total duration. This is
//! a local, greedy, width-bounded search: the contract is "best found within
//! the beam budget", not a global optimum. Runtime per round is bounded by
//! O(beam_width x pool_size).

use tracing::debug;

use crate::config::MixConfig;
use crate::model::TrackFeature;
use crate::score::compat_score;

/// Result of a sequencing run
#[derive(Debug, Clone)]
pub struct SequenceOutcome {
    /// Ordered tracks drawn from the input pool, pairwise distinct
    pub tracks: Vec<TrackFeature>,

    /// Average pairwise score of the sequence (0 for fewer than two tracks)
    pub avg_score: f64,
}

impl SequenceOutcome {
    fn empty() -> Self {
        Self {
            tracks: Vec::new(),
            avg_score: 0.0,
        }
    }
}

/// Partial sequence under construction; exists only during the search
#[derive(Debug, Clone)]
struct Path {
    /// Indices into the pool, in playback order
    indices: Vec<usize>,
    /// Accumulated pairwise score sum
    sum: f64,
    /// Accumulated duration in seconds
    duration_sec: f64,
}

impl Path {
    fn seed(index: usize, pool: &[TrackFeature]) -> Self {
        Self {
            indices: vec![index],
            sum: 0.0,
            duration_sec: pool[index].duration_sec,
        }
    }

    fn extended(&self, index: usize, score: f64, pool: &[TrackFeature]) -> Self {
        let mut indices = Vec::with_capacity(self.indices.len() + 1);
        indices.extend_from_slice(&self.indices);
        indices.push(index);
        Self {
            indices,
            sum: self.sum + score,
            duration_sec: self.duration_sec + pool[index].duration_sec,
        }
    }

    /// Average pairwise score; 0 for single-track paths
    fn avg(&self) -> f64 {
        if self.indices.len() <= 1 {
            0.0
        } else {
            self.sum / (self.indices.len() - 1) as f64
        }
    }

    fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }
}

/// Deterministic preference between finalized paths
///
/// Strictly higher average wins; on an exact tie the longer sequence wins;
/// a remaining tie keeps the earlier-finalized path.
fn better(candidate: &Path, best: &Path) -> bool {
    let (ca, ba) = (candidate.avg(), best.avg());
    ca > ba || (ca == ba && candidate.indices.len() > best.indices.len())
}

/// Pick starting tracks: soft-band tempos ranked by distance from the ideal
///
/// Falls back to the full pool when nothing lands in the band. The stable
/// sort keeps input pool order among equal distances, so seeding is
/// deterministic.
fn seed_indices(pool: &[TrackFeature], beam_width: usize, config: &MixConfig) -> Vec<usize> {
    let limits = &config.limits;
    let mut candidates: Vec<usize> = (0..pool.len())
        .filter(|&i| pool[i].bpm >= limits.soft_lo && pool[i].bpm <= limits.soft_hi)
        .collect();
    if candidates.is_empty() {
        candidates = (0..pool.len()).collect();
    }
    candidates.sort_by(|&x, &y| {
        let dx = (pool[x].bpm - limits.ideal_bpm).abs();
        let dy = (pool[y].bpm - limits.ideal_bpm).abs();
        dx.total_cmp(&dy)
    });
    let count = beam_width.min((pool.len() / 4).max(1));
    candidates.truncate(count);
    candidates
}

/// Beam search for the best sequence within the duration target
///
/// Seeds from the tempo soft band, expands each active path with its top
/// `beam_width` continuations by compatibility score, prunes globally to the
/// top `beam_width` paths by average score, and finalizes a path once its
/// accumulated duration reaches `target_minutes` (or it runs out of unused
/// tracks, which covers pools too small to fill the target). An empty pool
/// yields an empty outcome, never an error.
pub fn beam_search(
    pool: &[TrackFeature],
    target_minutes: f64,
    beam_width: usize,
    config: &MixConfig,
) -> SequenceOutcome {
    if pool.is_empty() || beam_width == 0 {
        return SequenceOutcome::empty();
    }
    let target_sec = target_minutes * 60.0;

    let mut paths: Vec<Path> = seed_indices(pool, beam_width, config)
        .into_iter()
        .map(|i| Path::seed(i, pool))
        .collect();
    let mut best: Option<Path> = None;
    let mut rounds = 0usize;

    while !paths.is_empty() {
        rounds += 1;
        let mut next: Vec<Path> = Vec::new();

        for path in &paths {
            if path.duration_sec >= target_sec {
                finalize(path, &mut best);
                continue;
            }

            let last = *path.indices.last().unwrap_or(&0);
            let mut candidates: Vec<(usize, f64)> = (0..pool.len())
                .filter(|&i| !path.contains(i))
                .map(|i| (i, compat_score(&pool[last], &pool[i], config)))
                .collect();

            if candidates.is_empty() {
                // Pool exhausted under the target: best achievable path
                finalize(path, &mut best);
                continue;
            }

            candidates.sort_by(|a, b| b.1.total_cmp(&a.1));
            candidates.truncate(beam_width);
            for (index, score) in candidates {
                next.push(path.extended(index, score, pool));
            }
        }

        // Global prune: scores decide ranking, the stable sort keeps
        // generation order among exact ties
        next.sort_by(|a, b| b.avg().total_cmp(&a.avg()));
        next.truncate(beam_width);
        paths = next;
    }

    match best {
        Some(path) => {
            debug!(
                rounds,
                tracks = path.indices.len(),
                avg_score = path.avg(),
                "Beam search complete"
            );
            SequenceOutcome {
                avg_score: path.avg(),
                tracks: path.indices.iter().map(|&i| pool[i].clone()).collect(),
            }
        }
        None => SequenceOutcome::empty(),
    }
}

fn finalize(path: &Path, best: &mut Option<Path>) {
    match best {
        Some(current) if !better(path, current) => {}
        _ => *best = Some(path.clone()),
    }
}
