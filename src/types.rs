//! Result types returned by the pipeline

use crate::config::CanvasSize;
use image::RgbImage;
use serde::{Deserialize, Serialize};

/// Wall-clock time spent in each pipeline stage, in milliseconds
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingTimings {
    /// Light-background removal (0 when skipped)
    pub removal_ms: u64,
    /// Background synthesis; shared by every item of a batch
    pub synthesis_ms: u64,
    /// Resize, placement and blending
    pub composite_ms: u64,
    /// Lighting, shadow, vignette and grading
    pub effects_ms: u64,
    /// Quality enhancement and final resize
    pub post_ms: u64,
    /// End to end
    pub total_ms: u64,
}

impl ProcessingTimings {
    /// Sum of the per-stage timings
    #[must_use]
    pub fn stage_sum_ms(&self) -> u64 {
        self.removal_ms + self.synthesis_ms + self.composite_ms + self.effects_ms + self.post_ms
    }

    /// One-line summary for logs
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "total {}ms (removal {}ms, synthesis {}ms, composite {}ms, effects {}ms, post {}ms)",
            self.total_ms,
            self.removal_ms,
            self.synthesis_ms,
            self.composite_ms,
            self.effects_ms,
            self.post_ms
        )
    }
}

/// A finished render
#[derive(Debug, Clone)]
pub struct RenderResult {
    /// Final canvas, always exactly `canvas` in size
    pub image: RgbImage,
    /// Requested canvas
    pub canvas: CanvasSize,
    /// Stage timings
    pub timings: ProcessingTimings,
}

impl RenderResult {
    #[must_use]
    pub fn into_image(self) -> RgbImage {
        self.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_lists_every_stage() {
        let timings = ProcessingTimings {
            removal_ms: 1,
            synthesis_ms: 2,
            composite_ms: 3,
            effects_ms: 4,
            post_ms: 5,
            total_ms: 16,
        };
        assert_eq!(timings.stage_sum_ms(), 15);
        let summary = timings.summary();
        assert!(summary.starts_with("total 16ms"));
        assert!(summary.contains("post 5ms"));
    }
}
