use std::collections::HashMap;

use kmeans_colors::get_kmeans;
use log::debug;
use palette::{Lab, Srgb};
use serde::{Deserialize, Serialize};

use crate::color::{distance_sq, from_lab, to_hex, to_lab};
use crate::error::{AnalysisError, Result};
use crate::sample::SampledPixel;

/// Largest cluster count accepted by either backend.
pub const MAX_CLUSTERS: usize = 64;

// Used by the Lab backend only, matching kmeans_colors' own scale.
const LAB_CONVERGENCE: f32 = 1e-4;
const LAB_SEED: u64 = 0;

/// One extracted representative color with its coverage share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaletteSwatch {
    /// Six uppercase hex digits.
    pub hex: String,
    /// Share of sampled pixels, 0–100, floored to one decimal.
    pub percentage: f32,
    pub name: Option<String>,
    pub simple_name: Option<String>,
}

impl PaletteSwatch {
    pub fn new(hex: impl Into<String>, percentage: f32) -> Self {
        PaletteSwatch {
            hex: hex.into(),
            percentage,
            name: None,
            simple_name: None,
        }
    }
}

/// Space in which pixels are clustered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSpace {
    /// Lloyd's k-means on raw 8-bit RGB with deterministic seeding.
    #[default]
    Rgb,
    /// k-means in CIELAB via `kmeans_colors`, with a fixed seed.
    Lab,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    pub k: usize,
    pub max_iterations: usize,
    /// Stop once no centroid moves further than this (RGB channel units).
    pub convergence: f32,
    pub color_space: ColorSpace,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        ExtractOptions {
            k: 5,
            max_iterations: 20,
            convergence: 0.5,
            color_space: ColorSpace::Rgb,
        }
    }
}

impl ExtractOptions {
    pub fn with_k(k: usize) -> Self {
        ExtractOptions {
            k,
            ..Default::default()
        }
    }
}

/// Cluster `pixels` into at most `options.k` dominant colors.
///
/// The result is sorted by coverage, most dominant first. Clusters that end
/// up empty, or below 0.1% coverage, are dropped, so the palette may be
/// shorter than `k`.
pub fn extract(pixels: &[SampledPixel], options: &ExtractOptions) -> Result<Vec<PaletteSwatch>> {
    if options.k == 0 || options.k > MAX_CLUSTERS {
        return Err(AnalysisError::InvalidClusterCount {
            k: options.k,
            max: MAX_CLUSTERS,
        });
    }
    if pixels.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }

    let clusters = match options.color_space {
        ColorSpace::Rgb => lloyds(pixels, options),
        ColorSpace::Lab => lab_kmeans(pixels, options),
    };
    Ok(to_swatches(clusters, pixels.len()))
}

struct Cluster {
    color: Srgb<u8>,
    count: usize,
}

/// Clusters covering less than 0.1% of the samples (stray pixels) are
/// dropped along with empty ones. The largest cluster always survives.
fn to_swatches(mut clusters: Vec<Cluster>, total: usize) -> Vec<PaletteSwatch> {
    // Stable, so equal counts keep cluster order.
    clusters.sort_by(|a, b| b.count.cmp(&a.count));
    clusters
        .into_iter()
        .map(|c| (c.color, (c.count as u64 * 1000) / total as u64))
        .filter(|&(_, tenths)| tenths > 0)
        .map(|(color, tenths)| PaletteSwatch::new(to_hex(color), tenths as f32 / 10.0))
        .collect()
}

// ------------------------------------------------------------
// RGB backend
// ------------------------------------------------------------

type Centroid = [f32; 3];

#[inline]
fn as_point(p: SampledPixel) -> Centroid {
    [p.red as f32, p.green as f32, p.blue as f32]
}

#[inline]
fn point_distance_sq(a: &Centroid, b: &Centroid) -> f32 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    dr * dr + dg * dg + db * db
}

/// Index of the nearest centroid; ties go to the lowest index.
#[inline]
fn nearest(point: &Centroid, centroids: &[Centroid]) -> usize {
    let mut best = 0;
    let mut best_dist = f32::INFINITY;
    for (i, c) in centroids.iter().enumerate() {
        let d = point_distance_sq(point, c);
        if d < best_dist {
            best_dist = d;
            best = i;
        }
    }
    best
}

/// Distinct colors with their pixel counts, in order of first appearance.
fn histogram(pixels: &[SampledPixel]) -> Vec<(SampledPixel, usize)> {
    let mut index: HashMap<[u8; 3], usize> = HashMap::new();
    let mut bins: Vec<(SampledPixel, usize)> = Vec::new();
    for &p in pixels {
        let slot = *index.entry([p.red, p.green, p.blue]).or_insert_with(|| {
            bins.push((p, 0));
            bins.len() - 1
        });
        bins[slot].1 += 1;
    }
    bins
}

/// Farthest-point seeding weighted by how often each color occurs.
///
/// The first seed is the most frequent color. Each further seed maximises
/// `count * distance²` to the seeds chosen so far, so a lone stray pixel
/// never outranks a real region of the image. Ties go to the color seen
/// first. Seeding stops early once every color coincides with a seed, which
/// is how a solid image ends up with a single cluster.
fn seed(pixels: &[SampledPixel], k: usize) -> Vec<Centroid> {
    let bins = histogram(pixels);
    let first = bins
        .iter()
        .enumerate()
        .fold(0, |best, (i, bin)| if bin.1 > bins[best].1 { i } else { best });

    let mut seeds = vec![as_point(bins[first].0)];
    // Squared distance from every color to its closest seed so far.
    let mut closest: Vec<u32> = bins.iter().map(|&(c, _)| distance_sq(c, bins[first].0)).collect();

    while seeds.len() < k {
        let (idx, score) = closest
            .iter()
            .zip(&bins)
            .map(|(&d, &(_, count))| d as u64 * count as u64)
            .enumerate()
            .fold((0, 0u64), |acc, cur| if cur.1 > acc.1 { cur } else { acc });
        if score == 0 {
            break;
        }
        let chosen = bins[idx].0;
        seeds.push(as_point(chosen));
        for (d, &(c, _)) in closest.iter_mut().zip(&bins) {
            *d = (*d).min(distance_sq(c, chosen));
        }
    }
    seeds
}

fn lloyds(pixels: &[SampledPixel], options: &ExtractOptions) -> Vec<Cluster> {
    let points: Vec<Centroid> = pixels.iter().map(|&p| as_point(p)).collect();
    let mut centroids = seed(pixels, options.k.min(pixels.len()));
    let mut assignments = vec![0usize; points.len()];
    let mut counts = vec![0usize; centroids.len()];
    let threshold_sq = options.convergence * options.convergence;

    let mut iterations = 0;
    let mut converged = false;
    while iterations < options.max_iterations.max(1) {
        iterations += 1;

        for (a, p) in assignments.iter_mut().zip(&points) {
            *a = nearest(p, &centroids);
        }

        let mut sums = vec![[0.0f64; 3]; centroids.len()];
        counts.iter_mut().for_each(|c| *c = 0);
        for (&a, p) in assignments.iter().zip(&points) {
            sums[a][0] += p[0] as f64;
            sums[a][1] += p[1] as f64;
            sums[a][2] += p[2] as f64;
            counts[a] += 1;
        }

        let mut max_shift = 0.0f32;
        for ((c, sum), &count) in centroids.iter_mut().zip(&sums).zip(&counts) {
            // Empty clusters keep their centroid and are dropped at the end.
            if count == 0 {
                continue;
            }
            let updated = [
                (sum[0] / count as f64) as f32,
                (sum[1] / count as f64) as f32,
                (sum[2] / count as f64) as f32,
            ];
            max_shift = max_shift.max(point_distance_sq(c, &updated));
            *c = updated;
        }

        if max_shift < threshold_sq {
            converged = true;
            break;
        }
    }
    debug!(
        "rgb k-means: {} centroids, {iterations} iterations, converged: {converged}",
        centroids.len()
    );

    centroids
        .iter()
        .zip(counts)
        .map(|(c, count)| Cluster {
            color: Srgb::new(channel(c[0]), channel(c[1]), channel(c[2])),
            count,
        })
        .collect()
}

#[inline]
fn channel(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

// ------------------------------------------------------------
// Lab backend
// ------------------------------------------------------------

fn lab_kmeans(pixels: &[SampledPixel], options: &ExtractOptions) -> Vec<Cluster> {
    let lab_pixels: Vec<Lab> = pixels.iter().map(|&p| to_lab(p)).collect();
    // k-means++ seeding needs a nonzero distance for every extra centroid.
    let k = distinct_up_to(pixels, options.k);

    let kmeans = get_kmeans(
        k,
        options.max_iterations.max(1),
        LAB_CONVERGENCE,
        false,
        &lab_pixels,
        LAB_SEED,
    );
    debug!(
        "lab k-means: {} centroids, score {}",
        kmeans.centroids.len(),
        kmeans.score
    );

    let mut counts = vec![0usize; kmeans.centroids.len()];
    for &idx in &kmeans.indices {
        counts[idx as usize] += 1;
    }

    kmeans
        .centroids
        .iter()
        .zip(counts)
        .map(|(&lab, count)| Cluster {
            color: from_lab(lab),
            count,
        })
        .collect()
}

fn distinct_up_to(pixels: &[SampledPixel], limit: usize) -> usize {
    let mut seen: Vec<SampledPixel> = Vec::with_capacity(limit);
    for &p in pixels {
        if !seen.contains(&p) {
            seen.push(p);
            if seen.len() == limit {
                break;
            }
        }
    }
    seen.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn red() -> SampledPixel {
        Srgb::new(255, 0, 0)
    }

    fn blue() -> SampledPixel {
        Srgb::new(0, 0, 255)
    }

    fn halves(n: usize) -> Vec<SampledPixel> {
        // Row-major order, like the sampler: left half red, right half blue.
        (0..n * n)
            .map(|i| if i % n < n / 2 { red() } else { blue() })
            .collect()
    }

    fn gradient() -> Vec<SampledPixel> {
        (0..40u8)
            .flat_map(|y| (0..40u8).map(move |x| Srgb::new(x * 6, y * 6, 255 - x * 3)))
            .collect()
    }

    fn percent_sum(palette: &[PaletteSwatch]) -> f32 {
        palette.iter().map(|s| s.percentage).sum()
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = extract(&[], &ExtractOptions::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyInput));
    }

    #[test]
    fn cluster_count_is_validated() {
        for k in [0, MAX_CLUSTERS + 1] {
            let err = extract(&[red()], &ExtractOptions::with_k(k)).unwrap_err();
            assert!(matches!(err, AnalysisError::InvalidClusterCount { .. }));
        }
    }

    #[test]
    fn solid_color_gives_single_swatch() {
        let pixels = vec![Srgb::new(200, 100, 50); 500];
        for k in [1, 2, 5, 12] {
            let palette = extract(&pixels, &ExtractOptions::with_k(k)).unwrap();
            assert_eq!(palette, vec![PaletteSwatch::new("C86432", 100.0)]);
        }
    }

    #[test]
    fn equal_halves_split_evenly() {
        let palette = extract(&halves(20), &ExtractOptions::with_k(2)).unwrap();
        assert_eq!(palette.len(), 2);
        let mut hexes: Vec<&str> = palette.iter().map(|s| s.hex.as_str()).collect();
        hexes.sort();
        assert_eq!(hexes, vec!["0000FF", "FF0000"]);
        assert!(palette.iter().all(|s| (s.percentage - 50.0).abs() < 0.1));
    }

    #[test]
    fn palette_is_sorted_and_bounded() {
        let pixels = gradient();
        for k in 1..=8 {
            let palette = extract(&pixels, &ExtractOptions::with_k(k)).unwrap();
            assert!(!palette.is_empty() && palette.len() <= k);
            assert!(palette.windows(2).all(|w| w[0].percentage >= w[1].percentage));
            assert!(percent_sum(&palette) <= 100.0 + 1e-3);
            // Each of the k clusters loses under 0.1 to flooring or dropping.
            assert!(percent_sum(&palette) >= 100.0 - 0.1 * k as f32 - 1e-3);
        }
    }

    #[test]
    fn dominant_color_comes_first() {
        let mut pixels = vec![Srgb::new(20, 120, 40); 300];
        pixels.extend(vec![Srgb::new(240, 240, 240); 100]);
        pixels.extend(vec![Srgb::new(10, 10, 10); 50]);
        let palette = extract(&pixels, &ExtractOptions::with_k(3)).unwrap();
        assert_eq!(palette[0].hex, "147828");
        assert_eq!(palette[0].percentage, 66.6);
        assert_eq!(palette[1].hex, "F0F0F0");
        assert_eq!(palette[2].hex, "0A0A0A");
    }

    #[test]
    fn fewer_distinct_colors_than_k() {
        let pixels = [red(), blue(), red(), blue(), red()];
        let palette = extract(&pixels, &ExtractOptions::with_k(5)).unwrap();
        assert_eq!(
            palette,
            vec![PaletteSwatch::new("FF0000", 60.0), PaletteSwatch::new("0000FF", 40.0)]
        );
    }

    #[test]
    fn extraction_is_deterministic() {
        let pixels = gradient();
        let options = ExtractOptions::default();
        assert_eq!(extract(&pixels, &options).unwrap(), extract(&pixels, &options).unwrap());
    }

    #[test]
    fn iteration_cap_still_produces_palette() {
        let options = ExtractOptions {
            max_iterations: 1,
            ..Default::default()
        };
        let palette = extract(&gradient(), &options).unwrap();
        assert!(!palette.is_empty() && palette.len() <= 5);
    }

    #[test]
    fn lab_backend_finds_both_halves() {
        let options = ExtractOptions {
            k: 2,
            color_space: ColorSpace::Lab,
            ..Default::default()
        };
        let palette = extract(&halves(20), &options).unwrap();
        assert_eq!(palette.len(), 2);
        assert!(palette.iter().all(|s| (s.percentage - 50.0).abs() < 0.1));
        assert!(percent_sum(&palette) <= 100.0 + 1e-3);
    }

    #[test]
    fn stray_pixel_does_not_steal_a_seed() {
        let mut pixels = halves(64);
        pixels[0] = Srgb::new(0, 255, 0);
        let palette = extract(&pixels, &ExtractOptions::with_k(2)).unwrap();
        let mut hexes: Vec<&str> = palette.iter().map(|s| s.hex.as_str()).collect();
        hexes.sort();
        assert_eq!(hexes, vec!["0000FF", "FF0000"]);
        assert!(palette.iter().all(|s| (s.percentage - 50.0).abs() <= 0.2));
    }

    #[test]
    fn salt_noise_never_yields_empty_share_swatches() {
        // White and red halves with a few green and blue specks.
        let mut pixels: Vec<SampledPixel> = (0..100 * 50)
            .map(|i| if i % 100 < 50 { Srgb::new(255, 255, 255) } else { red() })
            .collect();
        for (i, speck) in [(0, Srgb::new(0, 255, 0)), (1, blue()), (4999, Srgb::new(0, 255, 0)), (4998, blue())] {
            pixels[i] = speck;
        }
        for k in [2, 5] {
            let palette = extract(&pixels, &ExtractOptions::with_k(k)).unwrap();
            assert!(palette.iter().all(|s| s.percentage > 0.0), "k={k}: {palette:?}");
            let mut hexes: Vec<&str> = palette.iter().map(|s| s.hex.as_str()).collect();
            hexes.sort();
            assert_eq!(hexes, vec!["FF0000", "FFFFFF"], "k={k}");
        }
    }

    #[test]
    fn histogram_keeps_first_appearance_order() {
        let bins = histogram(&[blue(), red(), blue(), blue()]);
        assert_eq!(bins, vec![(blue(), 3), (red(), 1)]);
    }

    #[test]
    fn most_frequent_color_seeds_first() {
        let seeds = seed(&[red(), blue(), blue()], 2);
        assert_eq!(seeds, vec![[0.0, 0.0, 255.0], [255.0, 0.0, 0.0]]);
    }

    #[test]
    fn distinct_count_stops_at_limit() {
        assert_eq!(distinct_up_to(&halves(4), 5), 2);
        assert_eq!(distinct_up_to(&gradient(), 5), 5);
    }

    #[test]
    fn lab_backend_collapses_solid_color() {
        let options = ExtractOptions {
            k: 4,
            color_space: ColorSpace::Lab,
            ..Default::default()
        };
        let palette = extract(&vec![Srgb::new(30, 60, 90); 200], &options).unwrap();
        assert_eq!(palette.len(), 1);
        assert_eq!(palette[0].percentage, 100.0);
    }
}
