//! Dominant colour extraction from RGBA pixel buffers.

use std::collections::HashMap;

use tracing::trace;

use crate::color::Colour;

/// Pixels with alpha below this value are more than half transparent and
/// never counted.
pub const MIN_ALPHA: u8 = 128;

/// The most frequent opaque colour in a buffer and how often it occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dominant {
    /// `None` when no pixel was opaque enough (or the buffer was empty).
    pub colour: Option<Colour>,
    pub count: usize,
}

/// Finds the mode colour of a row-major RGBA buffer (4 bytes per pixel).
///
/// Ties go to the colour that appeared first in scan order. A trailing
/// partial pixel is ignored.
pub fn dominant_colour(pixels: &[u8]) -> Dominant {
    // colour -> (count, first seen)
    let mut counts: HashMap<Colour, (usize, usize)> = HashMap::new();

    for (index, px) in pixels.chunks_exact(4).enumerate() {
        if px[3] < MIN_ALPHA {
            continue;
        }
        counts
            .entry(Colour::rgb(px[0], px[1], px[2]))
            .or_insert((0, index))
            .0 += 1;
    }

    let best = counts
        .iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(colour, (count, _))| (*colour, *count));

    trace!(
        extract.distinct = counts.len(),
        extract.pixels = pixels.len() / 4,
        "Scanned avatar pixels"
    );

    match best {
        Some((colour, count)) => Dominant {
            colour: Some(colour),
            count,
        },
        None => Dominant::default(),
    }
}
