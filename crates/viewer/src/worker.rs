use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender};

use facetag_core::capture::domain::frame_source::FrameSource;
use facetag_core::pipeline::analyze_use_case::{AnalyzeFrameUseCase, FaceAnalysis};
use facetag_core::shared::frame::Frame;

/// Consecutive grab failures tolerated before the worker declares the
/// camera dead.
const MAX_GRAB_FAILURES: u32 = 30;

pub enum WorkerEvent {
    Frame {
        frame: Frame,
        analyses: Vec<FaceAnalysis>,
    },
    Stopped {
        reason: String,
    },
}

/// Starts the capture thread: grab → analyze → send, until the stop flag
/// flips or the UI side hangs up.
///
/// The channel is small on purpose; a slow UI backpressures the grabber
/// instead of piling up stale frames.
pub fn spawn(
    source: Box<dyn FrameSource>,
    use_case: AnalyzeFrameUseCase,
    stop: Arc<AtomicBool>,
) -> Receiver<WorkerEvent> {
    let (tx, rx) = bounded(2);
    thread::spawn(move || capture_loop(source, use_case, stop, tx));
    rx
}

fn capture_loop(
    mut source: Box<dyn FrameSource>,
    mut use_case: AnalyzeFrameUseCase,
    stop: Arc<AtomicBool>,
    tx: Sender<WorkerEvent>,
) {
    let mut failures = 0u32;

    while !stop.load(Ordering::Relaxed) {
        let frame = match source.next_frame() {
            Ok(frame) => {
                failures = 0;
                frame
            }
            Err(e) => {
                // Transient: skip and retry until the camera looks dead.
                failures += 1;
                log::debug!("skipping frame ({failures} in a row): {e}");
                if failures >= MAX_GRAB_FAILURES {
                    let _ = tx.send(WorkerEvent::Stopped {
                        reason: format!("camera stopped delivering frames: {e}"),
                    });
                    return;
                }
                continue;
            }
        };

        let analyses = match use_case.execute(&frame) {
            Ok(analyses) => analyses,
            Err(e) => {
                let _ = tx.send(WorkerEvent::Stopped {
                    reason: format!("analysis failed: {e}"),
                });
                return;
            }
        };

        if tx.send(WorkerEvent::Frame { frame, analyses }).is_err() {
            return; // UI hung up
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facetag_core::classification::domain::gender_classifier::{
        Gender, GenderClassifier, GenderResult,
    };
    use facetag_core::detection::domain::face_detector::FaceDetector;
    use facetag_core::shared::region::FaceRegion;
    use std::time::Duration;

    struct CountingSource {
        produced: usize,
        fail_after: Option<usize>,
    }

    impl FrameSource for CountingSource {
        fn resolution(&self) -> (u32, u32) {
            (16, 16)
        }

        fn next_frame(&mut self) -> Result<Frame, Box<dyn std::error::Error>> {
            if let Some(limit) = self.fail_after {
                if self.produced >= limit {
                    return Err("gone".into());
                }
            }
            let frame = Frame::new(vec![0u8; 16 * 16 * 3], 16, 16, self.produced);
            self.produced += 1;
            Ok(frame)
        }
    }

    struct OneFaceDetector;

    impl FaceDetector for OneFaceDetector {
        fn detect(
            &mut self,
            _frame: &Frame,
        ) -> Result<Vec<FaceRegion>, Box<dyn std::error::Error>> {
            Ok(vec![FaceRegion::new(2, 2, 8, 8, Some(0.9))])
        }
    }

    struct FixedClassifier;

    impl GenderClassifier for FixedClassifier {
        fn classify(
            &mut self,
            _frame: &Frame,
            _region: &FaceRegion,
        ) -> Result<GenderResult, Box<dyn std::error::Error>> {
            Ok(GenderResult {
                label: Gender::Male,
                confidence: 0.9,
            })
        }
    }

    fn use_case() -> AnalyzeFrameUseCase {
        AnalyzeFrameUseCase::new(Box::new(OneFaceDetector), Box::new(FixedClassifier))
    }

    #[test]
    fn test_worker_delivers_analyzed_frames() {
        let stop = Arc::new(AtomicBool::new(false));
        let source = CountingSource {
            produced: 0,
            fail_after: None,
        };
        let rx = spawn(Box::new(source), use_case(), stop.clone());

        let event = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        match event {
            WorkerEvent::Frame { frame, analyses } => {
                assert_eq!(frame.width(), 16);
                assert_eq!(analyses.len(), 1);
                assert_eq!(analyses[0].gender.label, Gender::Male);
            }
            WorkerEvent::Stopped { reason } => panic!("worker stopped: {reason}"),
        }

        stop.store(true, Ordering::Relaxed);
        // Drain so the worker isn't blocked on a full channel.
        while rx.recv_timeout(Duration::from_millis(100)).is_ok() {}
    }

    #[test]
    fn test_worker_reports_dead_camera() {
        let stop = Arc::new(AtomicBool::new(false));
        let source = CountingSource {
            produced: 0,
            fail_after: Some(0),
        };
        let rx = spawn(Box::new(source), use_case(), stop);

        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            WorkerEvent::Stopped { reason } => assert!(reason.contains("camera")),
            WorkerEvent::Frame { .. } => panic!("expected stop event"),
        }
    }

    #[test]
    fn test_worker_exits_when_receiver_dropped() {
        let stop = Arc::new(AtomicBool::new(false));
        let source = CountingSource {
            produced: 0,
            fail_after: None,
        };
        let rx = spawn(Box::new(source), use_case(), stop);
        drop(rx);
        // Nothing to assert directly; the worker must not wedge the test
        // binary on exit, which a blocked send would.
    }
}
