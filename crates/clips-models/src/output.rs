//! Transcode output handed from the engine to the upload stage.

/// Product of one trim confirmation.
///
/// Owned by the upload stage until submission; discarded after a
/// successful submission or a processing failure, retained across a
/// pure network failure so resubmission skips the transcode.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedOutput {
    /// Trimmed clip in its output container (MP4, stream-copied).
    pub video: Vec<u8>,
    /// Still-frame thumbnail (JPEG).
    pub thumbnail: Vec<u8>,
    /// Duration of the trimmed clip in seconds.
    pub duration_seconds: f64,
}

impl ProcessedOutput {
    /// Clip length as the submission endpoint encodes it: whole seconds.
    pub fn length_seconds(&self) -> u64 {
        self.duration_seconds.max(0.0).floor() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_floors_to_whole_seconds() {
        let output = ProcessedOutput {
            video: vec![0u8; 4],
            thumbnail: vec![0u8; 2],
            duration_seconds: 9.97,
        };
        assert_eq!(output.length_seconds(), 9);
    }
}
