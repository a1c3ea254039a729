extern crate alloc;
use alloc::vec;
use alloc::vec::Vec;

use crate::error::HistError;
use crate::perceptual::PerceptualColor;

/// Margin a nearer-but-translucent candidate must win by before it may
/// replace an opaque incumbent for an opaque-biased query. Empirical value
/// kept for behavioral compatibility with legacy renderers.
pub const OPAQUE_BIAS_EPSILON: f32 = 1.0 / 1024.0;

/// Fixed-length ordered palette of perceptual colors.
///
/// Entries start zero-valued and are written by the palette construction
/// stage through `entries_mut`; the length never changes after creation.
#[derive(Debug, Clone)]
pub struct Palette {
    entries: Vec<PerceptualColor>,
}

impl Palette {
    pub fn new(size: usize) -> Self {
        Self {
            entries: vec![PerceptualColor::new(0.0, 0.0, 0.0, 0.0); size],
        }
    }

    pub fn entries(&self) -> &[PerceptualColor] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut [PerceptualColor] {
        &mut self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distance from a query color to one palette entry.
    pub fn distance(&self, query: PerceptualColor, index: usize) -> f32 {
        query.distance(self.entries[index])
    }

    /// Find the palette entry nearest to `query`, biased against translucent
    /// entries when the query is meant to render opaque.
    ///
    /// Linear scan with entry 0 as the initial best. When the query's alpha
    /// exceeds `min_opaque_alpha`, a candidate with alpha below 1 must beat
    /// the incumbent by more than `OPAQUE_BIAS_EPSILON` — a marginally
    /// nearer translucent color would punch a visible hole into a region
    /// meant to be solid. Ties go to the lowest index.
    ///
    /// Returns the winning index and its distance.
    pub fn best_color_index(
        &self,
        query: PerceptualColor,
        min_opaque_alpha: f32,
    ) -> Result<(usize, f32), HistError> {
        let first = self.entries.first().ok_or(HistError::EmptyPalette)?;

        let opaque_biased = query.a > min_opaque_alpha;
        let mut best = 0;
        let mut best_dist = query.distance(*first);

        for (i, entry) in self.entries.iter().enumerate().skip(1) {
            let dist = query.distance(*entry);
            if dist < best_dist {
                if opaque_biased && entry.a < 1.0 && dist + OPAQUE_BIAS_EPSILON > best_dist {
                    continue;
                }
                best = i;
                best_dist = dist;
            }
        }

        Ok((best, best_dist))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(l: f32) -> PerceptualColor {
        PerceptualColor::new(l, l, l, 1.0)
    }

    #[test]
    fn new_palette_is_zeroed() {
        let p = Palette::new(4);
        assert_eq!(p.len(), 4);
        for e in p.entries() {
            assert_eq!(*e, PerceptualColor::new(0.0, 0.0, 0.0, 0.0));
        }
    }

    #[test]
    fn empty_palette_rejected() {
        let p = Palette::new(0);
        assert!(matches!(
            p.best_color_index(gray(0.5), 0.6),
            Err(HistError::EmptyPalette)
        ));
    }

    #[test]
    fn single_entry_always_wins() {
        let mut p = Palette::new(1);
        p.entries_mut()[0] = gray(0.9);
        for q in [gray(0.0), gray(0.5), gray(1.0)] {
            let (idx, _) = p.best_color_index(q, 0.6).unwrap();
            assert_eq!(idx, 0);
        }
    }

    #[test]
    fn finds_nearest_entry() {
        let mut p = Palette::new(3);
        p.entries_mut().copy_from_slice(&[gray(0.1), gray(0.5), gray(0.9)]);

        let (idx, dist) = p.best_color_index(gray(0.48), 0.6).unwrap();
        assert_eq!(idx, 1);
        assert!((dist - p.distance(gray(0.48), 1)).abs() < 1e-9);
    }

    #[test]
    fn exact_tie_keeps_lowest_index() {
        let mut p = Palette::new(2);
        p.entries_mut().copy_from_slice(&[gray(0.5), gray(0.5)]);
        let (idx, _) = p.best_color_index(gray(0.4), 0.6).unwrap();
        assert_eq!(idx, 0);
    }

    /// Two-entry palette where entry 1 is translucent and nearer to the
    /// query by `gap`. Entry 0 is opaque with the query's own rgb shifted
    /// so its distance lands at exactly (translucent distance + gap).
    fn biased_palette(query: PerceptualColor, gap: f32) -> Palette {
        let translucent = PerceptualColor::new(query.r, query.g, query.b, 0.5);
        let translucent_dist = query.distance(translucent);
        let shift = (translucent_dist + gap).sqrt();
        let opaque = PerceptualColor::new(query.r + shift, query.g, query.b, 1.0);

        let mut p = Palette::new(2);
        p.entries_mut().copy_from_slice(&[opaque, translucent]);

        // The construction must really put entry 1 nearer by `gap`
        assert!((p.distance(query, 0) - p.distance(query, 1) - gap).abs() < 1e-5);
        p
    }

    #[test]
    fn sub_epsilon_translucent_gain_is_refused() {
        let query = gray(0.5);
        let p = biased_palette(query, OPAQUE_BIAS_EPSILON / 2.0);
        let (idx, _) = p.best_color_index(query, 0.6).unwrap();
        assert_eq!(idx, 0, "marginally nearer translucent entry must lose");
    }

    #[test]
    fn super_epsilon_translucent_gain_is_accepted() {
        let query = gray(0.5);
        let p = biased_palette(query, OPAQUE_BIAS_EPSILON * 4.0);
        let (idx, _) = p.best_color_index(query, 0.6).unwrap();
        assert_eq!(idx, 1, "clearly nearer translucent entry must win");
    }

    #[test]
    fn bias_off_when_query_not_above_threshold() {
        let query = gray(0.5);
        let p = biased_palette(query, OPAQUE_BIAS_EPSILON / 2.0);
        // query.a == min_opaque_alpha → not opaque-biased, the nearest wins
        let (idx, _) = p.best_color_index(query, 1.0).unwrap();
        assert_eq!(idx, 1);
    }

    #[test]
    fn opaque_candidates_never_penalized() {
        let query = gray(0.5);
        let mut p = Palette::new(2);
        // Entry 1 is opaque and nearer by less than epsilon
        let far = PerceptualColor::new(0.5 + 0.1f32.sqrt(), 0.5, 0.5, 1.0);
        let near_gap = OPAQUE_BIAS_EPSILON / 2.0;
        let near = PerceptualColor::new(0.5 + (0.1f32 - near_gap).sqrt(), 0.5, 0.5, 1.0);
        p.entries_mut().copy_from_slice(&[far, near]);

        let (idx, _) = p.best_color_index(query, 0.6).unwrap();
        assert_eq!(idx, 1);
    }

    #[test]
    fn result_index_always_in_range() {
        let mut p = Palette::new(5);
        for (i, e) in p.entries_mut().iter_mut().enumerate() {
            *e = gray(i as f32 / 4.0);
        }
        for i in 0..=10 {
            let q = gray(i as f32 / 10.0);
            let (idx, dist) = p.best_color_index(q, 0.6).unwrap();
            assert!(idx < p.len());
            assert!(dist >= 0.0);
        }
    }
}
