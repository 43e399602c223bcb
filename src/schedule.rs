//! Analysis and synthesis frame positions.
//!
//! Frame `f` is read from the input at `f * hop` and written to the output at
//! `round(f * hop * time_scale)`. Decoupling the two hops is what changes the
//! duration.
//!
//! Frame count policy: `floor(input_len / hop) - 1`. The last partial hop of
//! the input is never the start of a frame, and frames whose window runs past
//! the input end are zero-padded by the caller.

/// Where one frame is read from and written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePosition {
    pub index: usize,
    pub analysis_offset: usize,
    pub synthesis_offset: usize,
}

#[derive(Debug, Clone)]
pub struct FrameScheduler {
    hop: usize,
    time_scale: f64,
    frame_count: usize,
}

impl FrameScheduler {
    pub fn new(input_len: usize, hop: usize, time_scale: f64) -> Self {
        let frame_count = if hop == 0 {
            0
        } else {
            (input_len / hop).saturating_sub(1)
        };

        Self {
            hop,
            time_scale,
            frame_count,
        }
    }

    /// `round(input_len * time_scale)`
    pub fn output_len(input_len: usize, time_scale: f64) -> usize {
        (input_len as f64 * time_scale).round() as usize
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn hop(&self) -> usize {
        self.hop
    }

    pub fn synthesis_hop(&self) -> f64 {
        self.hop as f64 * self.time_scale
    }

    #[inline]
    pub fn analysis_offset(&self, index: usize) -> usize {
        index * self.hop
    }

    #[inline]
    pub fn synthesis_offset(&self, index: usize) -> usize {
        (index as f64 * self.synthesis_hop()).round() as usize
    }

    pub fn position(&self, index: usize) -> FramePosition {
        FramePosition {
            index,
            analysis_offset: self.analysis_offset(index),
            synthesis_offset: self.synthesis_offset(index),
        }
    }

    /// Every frame, in the order it must be processed.
    pub fn positions(&self) -> impl Iterator<Item = FramePosition> + '_ {
        (0..self.frame_count).map(move |index| self.position(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_count_drops_last_partial_hop() {
        assert_eq!(FrameScheduler::new(44100, 1024, 1.0).frame_count(), 42);
        assert_eq!(FrameScheduler::new(4096, 1024, 1.0).frame_count(), 3);
        assert_eq!(FrameScheduler::new(2048, 1024, 1.0).frame_count(), 1);
        assert_eq!(FrameScheduler::new(1500, 1024, 1.0).frame_count(), 0);
        assert_eq!(FrameScheduler::new(0, 1024, 1.0).frame_count(), 0);
        assert_eq!(FrameScheduler::new(4096, 0, 1.0).frame_count(), 0);
    }

    #[test]
    fn test_offsets() {
        let scheduler = FrameScheduler::new(10 * 1024, 1024, 1.5);
        let positions: Vec<_> = scheduler.positions().collect();
        assert_eq!(positions.len(), 9);

        for (f, position) in positions.iter().enumerate() {
            assert_eq!(position.index, f);
            assert_eq!(position.analysis_offset, f * 1024);
            assert_eq!(position.synthesis_offset, f * 1536);
        }
    }

    #[test]
    fn test_synthesis_offsets_round_to_nearest() {
        let scheduler = FrameScheduler::new(8 * 100, 100, 0.333);
        assert_eq!(scheduler.synthesis_offset(1), 33);
        assert_eq!(scheduler.synthesis_offset(2), 67);
        assert_eq!(scheduler.synthesis_offset(3), 100);
    }

    #[test]
    fn test_output_len() {
        assert_eq!(FrameScheduler::output_len(44100, 2.0), 88200);
        assert_eq!(FrameScheduler::output_len(44100, 0.5), 22050);
        assert_eq!(FrameScheduler::output_len(3, 0.5), 2);
        assert_eq!(FrameScheduler::output_len(1000, 1.0), 1000);
    }
}
