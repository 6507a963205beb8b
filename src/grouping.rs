//! Clusters a slice of [`Media`] into near-duplicate groups.
//!
//! Pairwise similarity feeds a [`Dsu`] to close matches transitively; each
//! surviving bucket (size >= 2) becomes a [`Group`], members ordered by the
//! quality ordering: longest first, then largest pixel area, then largest
//! file size, stable on full ties.

use std::collections::HashMap;

use crate::dsu::Dsu;
use crate::media::Media;
use crate::similarity::similarity;

/// One equivalence class of near-duplicate media, ordered best-first by
/// the quality ordering.
pub type Group = Vec<Media>;

/// Groups `media` by pairwise similarity at or above `threshold`.
///
/// `O(n^2)` pairwise comparisons; video-video pairs dominate due to DTW.
/// Order between returned groups is unspecified.
pub fn group(media: Vec<Media>, threshold: f64) -> Vec<Group> {
    let n = media.len();
    log::debug!("grouping {n} media item(s) at threshold {threshold}");
    let mut dsu = Dsu::new(n);

    let mut unions = 0usize;
    for i in 0..n {
        for j in (i + 1)..n {
            if similarity(&media[i], &media[j]) >= threshold {
                dsu.union(i, j);
                unions += 1;
            }
        }
    }
    log::trace!("{unions} pair(s) cleared the threshold");

    let mut buckets: HashMap<usize, Vec<usize>> = HashMap::new();
    for i in 0..n {
        buckets.entry(dsu.find(i)).or_default().push(i);
    }

    let mut media: Vec<Option<Media>> = media.into_iter().map(Some).collect();
    let mut groups = Vec::new();

    for (_, mut indices) in buckets {
        if indices.len() < 2 {
            continue;
        }

        indices.sort_by(|&a, &b| {
            let ma = media[a].as_ref().unwrap();
            let mb = media[b].as_ref().unwrap();
            mb.length
                .cmp(&ma.length)
                .then_with(|| mb.pixel_area().cmp(&ma.pixel_area()))
                .then_with(|| mb.size.cmp(&ma.size))
                .then_with(|| a.cmp(&b))
        });

        let group: Group = indices
            .into_iter()
            .map(|i| media[i].take().expect("index referenced at most once"))
            .collect();
        groups.push(group);
    }

    log::debug!("formed {} group(s)", groups.len());
    groups
}
