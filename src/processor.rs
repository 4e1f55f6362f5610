use crate::srt::Subtitle;

use log::debug;

/// Pairs every live (not deleted) subtitle with the number it gets on
/// output. Numbering is dense and starts at 1, independent of the numbers
/// read from the file. The subtitles themselves are not touched.
pub fn renumber(subs: &[Subtitle]) -> impl Iterator<Item = (usize, &Subtitle)> + '_ {
    let mut deleted = 0;
    subs.iter().enumerate().filter_map(move |(i, sub)| {
        if sub.deleted {
            deleted += 1;
            debug!("Skipping deleted subtitle #{} at row {}", sub.num, i);
            return None;
        }
        Some((i + 1 - deleted, sub))
    })
}

pub fn count_deleted(subs: &[Subtitle]) -> usize {
    subs.iter().filter(|s| s.deleted).count()
}
