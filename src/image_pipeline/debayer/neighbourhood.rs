//! 3x3 windows clipped to the image.

/// In-range positions of the 3x3 window around `(x, y)`, rows top to bottom,
/// columns left to right, centre included.
#[inline]
pub fn window(x: usize, y: usize, width: usize, height: usize) -> impl Iterator<Item = (usize, usize)> {
    let rows = y.saturating_sub(1)..=(y + 1).min(height - 1);
    rows.flat_map(move |ny| {
        let cols = x.saturating_sub(1)..=(x + 1).min(width - 1);
        cols.map(move |nx| (nx, ny))
    })
}

/// Same as [`window`] without the centre.
#[inline]
pub fn neighbours(x: usize, y: usize, width: usize, height: usize) -> impl Iterator<Item = (usize, usize)> {
    window(x, y, width, height).filter(move |&pos| pos != (x, y))
}
