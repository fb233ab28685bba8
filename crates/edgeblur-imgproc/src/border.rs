use edgeblur_image::PixelGrid;

/// The 3x3 window of samples around a pixel, indexed `[row][col]`.
///
/// `[1][1]` is the center pixel, `[0][0]` its top-left neighbour.
pub type Neighborhood = [[u8; 3]; 3];

/// Maps index `i` to a valid index within `[0, len)` by clamping to the edge.
///
/// Example: ...d c b a | a a a a...
///
/// # Arguments
///
/// * `i` - The (possibly out-of-range) coordinate index.
/// * `len` - The valid length of the dimension. Must be at least 1.
///
/// # Examples
///
/// ```
/// use edgeblur_imgproc::border::clamp_index;
///
/// assert_eq!(clamp_index(-1, 5), 0);
/// assert_eq!(clamp_index(2, 5), 2);
/// assert_eq!(clamp_index(5, 5), 4);
/// ```
#[inline]
pub fn clamp_index(i: isize, len: usize) -> usize {
    i.clamp(0, len as isize - 1) as usize
}

/// Read the sample at `(x, y)`, clamping out-of-range coordinates to the
/// nearest row and column of the image.
#[inline]
pub fn pixel_clamped(src: &PixelGrid, x: isize, y: isize) -> u8 {
    let col = clamp_index(x, src.cols());
    let row = clamp_index(y, src.rows());
    src.as_slice()[row * src.cols() + col]
}

/// Gather the 3x3 window centered at `(x, y)` with edge clamping.
///
/// This is the only place where out-of-range neighbours are resolved, so every
/// operator and execution strategy sees the same values at the image border.
pub fn neighborhood(src: &PixelGrid, x: usize, y: usize) -> Neighborhood {
    let mut window = [[0u8; 3]; 3];
    for (dy, row) in window.iter_mut().enumerate() {
        for (dx, val) in row.iter_mut().enumerate() {
            *val = pixel_clamped(
                src,
                x as isize + dx as isize - 1,
                y as isize + dy as isize - 1,
            );
        }
    }
    window
}
