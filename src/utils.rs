/// Utility functions for multi-channel audio
use num_traits::Float;

/// Mix interleaved multi-channel audio down to mono by averaging each frame.
///
/// Converts interleaved format (e.g., `[L,R,L,R,...]` for stereo) into one
/// channel where every sample is the arithmetic mean of the frame's channels.
/// A trailing incomplete frame is dropped.
///
/// # Panics
///
/// Panics if `num_channels` is 0.
///
/// # Example
///
/// ```
/// use pvoc_rs::downmix_to_mono;
///
/// let interleaved = vec![1.0, 3.0, -1.0, 1.0, 0.5, 0.5]; // L,R,L,R,L,R
/// let mono = downmix_to_mono(&interleaved, 2);
///
/// assert_eq!(mono, vec![2.0, 0.0, 0.5]);
/// ```
pub fn downmix_to_mono<T: Float>(data: &[T], num_channels: usize) -> Vec<T> {
    assert!(num_channels > 0, "num_channels must be greater than 0");

    if num_channels == 1 {
        return data.to_vec();
    }

    let divisor = T::from(num_channels).unwrap_or_else(T::one);
    data.chunks_exact(num_channels)
        .map(|frame| frame.iter().fold(T::zero(), |acc, &s| acc + s) / divisor)
        .collect()
}
