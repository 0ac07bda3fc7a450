//! Default chunk and buffer shapes.
//!
//! Chunks start from the aspect ratio of the array (every axis divided by
//! the shortest one), which is coarsened until one such unit fits the chunk
//! budget and then scaled up uniformly. Buffers are whole multiples of the
//! chunk shape grown towards the buffer budget, last axis first.

fn saturating_product(values: impl Iterator<Item = u128>) -> u128 {
    values.fold(1u128, |acc, v| acc.saturating_mul(v))
}

/// Largest integer `s >= 1` with `s^rank <= ratio`, or 1.
fn fit_scale(ratio: f64, rank: usize) -> u64 {
    if rank == 0 || !ratio.is_finite() || ratio < 1.0 {
        return 1;
    }
    let mut scale = ratio.powf(1.0 / rank as f64).floor().max(1.0) as u64;
    // powf may round up across an integer boundary
    while scale > 1 && (scale as f64).powi(rank as i32) > ratio {
        scale -= 1;
    }
    scale
}

/// Default chunk shape for an array of `full_shape` under `chunk_bytes`.
///
/// `full_shape` must be non-empty with no zero-length axis. The result is at
/// least 1 and at most the full extent along every axis.
pub fn estimate_default_chunk_shape(
    chunk_bytes: f64,
    full_shape: &[usize],
    itemsize: usize,
) -> Vec<usize> {
    let Some(&shortest) = full_shape.iter().min() else {
        return Vec::new();
    };
    let shortest = shortest.max(1) as u128;
    let itemsize = itemsize.max(1) as u128;

    let mut unit: Vec<u128> = full_shape.iter().map(|&n| n as u128 / shortest).collect();
    let mut volume = saturating_product(unit.iter().copied());
    while volume.saturating_mul(itemsize) as f64 > chunk_bytes && volume != 1 {
        let Some(step) = unit.iter().copied().filter(|&x| x != 1).min() else {
            break;
        };
        for x in unit.iter_mut().filter(|x| **x != 1) {
            *x /= step;
        }
        volume = saturating_product(unit.iter().copied());
    }

    let rank = full_shape.len();
    let unit_bytes = volume.saturating_mul(itemsize) as f64;
    let scale = fit_scale(chunk_bytes / unit_bytes, rank) as u128;

    unit.iter()
        .zip(full_shape)
        .map(|(&x, &n)| (x.saturating_mul(scale).min(n as u128) as usize).max(1))
        .collect()
}

/// Default buffer shape for `chunk_shape` under `buffer_bytes`.
///
/// Every axis of the result is a whole multiple of the chunk axis and no
/// larger than the full extent.
pub fn estimate_default_buffer_shape(
    buffer_bytes: f64,
    chunk_shape: &[usize],
    full_shape: &[usize],
    itemsize: usize,
) -> Vec<usize> {
    let rank = chunk_shape.len();
    let fits: Vec<usize> = full_shape
        .iter()
        .zip(chunk_shape)
        .map(|(&n, &c)| (n / c.max(1)).max(1))
        .collect();

    let full_bytes = full_shape.iter().map(|&n| n as f64).product::<f64>() * itemsize as f64;
    if full_bytes <= buffer_bytes {
        return fits.iter().zip(chunk_shape).map(|(&m, &c)| m * c).collect();
    }

    let chunk_bytes = chunk_shape.iter().map(|&n| n as f64).product::<f64>() * itemsize as f64;
    let scale = fit_scale(buffer_bytes / chunk_bytes, rank) as usize;
    let mut buffer: Vec<usize> = fits
        .iter()
        .zip(chunk_shape)
        .map(|(&m, &c)| scale.min(m) * c)
        .collect();

    for axis in (0..rank).rev() {
        let others: f64 = (0..rank)
            .filter(|&j| j != axis)
            .map(|j| buffer[j] as f64)
            .product::<f64>()
            * itemsize as f64;
        let room = (buffer_bytes / (others * chunk_shape[axis] as f64)).floor();
        let multiples = if room.is_finite() && room >= 1.0 {
            (room as usize).min(fits[axis])
        } else {
            1
        };
        buffer[axis] = buffer[axis].max(multiples * chunk_shape[axis]);
    }
    buffer
}
