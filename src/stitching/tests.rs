#[cfg(test)]
mod tests {
    use crate::stitching::chrome::{ChromeBandDetector, ChromeBands};
    use crate::stitching::common::error::StitchError;
    use crate::stitching::config::StitchConfig;
    use crate::stitching::overlap::OverlapDetector;
    use crate::stitching::pipeline::{PipelineState, StitchPipeline};
    use crate::stitching::raster::{Axis, RasterImage};
    use crate::stitching::report::FoldMode;
    use crate::stitching::seam::SeamRefiner;
    use crate::stitching::test_support::{
        horizontal_successor, noise_frame, smooth_frame, vertical_successor, with_uniform_rows,
    };

    fn concat_only(axis: Axis) -> StitchConfig {
        StitchConfig::builder()
            .axis(axis)
            .auto_detect_overlap(false)
            .build()
    }

    #[test]
    fn test_shifted_frame_scenario() {
        let a = noise_frame(400, 600, 1);
        let b = vertical_successor(&a, 600, 50, 2);

        let mut pipeline = StitchPipeline::new(StitchConfig::default()).unwrap();
        let (composite, report) = pipeline.stitch_with_report(&[a.clone(), b.clone()]).unwrap();

        assert_eq!(composite.height(), 1150);
        assert_eq!(composite.width(), 400);
        assert_eq!(pipeline.state(), PipelineState::Done);

        let fold = &report.folds()[0];
        assert_eq!(fold.mode, FoldMode::Blended);
        assert!(fold.overlap.overlap_size.abs_diff(50) <= 10);
        assert!(fold.overlap.confidence >= 0.8);

        assert_eq!(composite.row(0), a.row(0));
        assert_eq!(composite.row(1149), b.row(599));
    }

    #[test]
    fn test_concatenation_sizes() {
        let frames = [noise_frame(30, 40, 1), noise_frame(30, 55, 2), noise_frame(30, 7, 3)];
        let mut pipeline = StitchPipeline::new(concat_only(Axis::Vertical)).unwrap();
        let composite = pipeline.stitch(&frames).unwrap();
        assert_eq!((composite.width(), composite.height()), (30, 102));

        let frames = [noise_frame(12, 20, 1), noise_frame(33, 20, 2)];
        let mut pipeline = StitchPipeline::new(concat_only(Axis::Horizontal)).unwrap();
        let composite = pipeline.stitch(&frames).unwrap();
        assert_eq!((composite.width(), composite.height()), (45, 20));
    }

    #[test]
    fn test_fold_order_matches_single_pass_concatenation() {
        let (a, b, c) = (noise_frame(16, 10, 1), noise_frame(16, 20, 2), noise_frame(16, 5, 3));
        let mut pipeline = StitchPipeline::new(concat_only(Axis::Vertical)).unwrap();
        let folded = pipeline.stitch(&[a.clone(), b.clone(), c.clone()]).unwrap();

        let expected: Vec<u8> = [a.data(), b.data(), c.data()].concat();
        assert_eq!(folded.data(), expected.as_slice());

        let pairwise = RasterImage::concat(&RasterImage::concat(&a, &b, Axis::Vertical).unwrap(), &c, Axis::Vertical).unwrap();
        assert_eq!(folded, pairwise);
    }

    #[test]
    fn test_insufficient_frames() {
        let mut pipeline = StitchPipeline::new(StitchConfig::default()).unwrap();
        assert_eq!(pipeline.state(), PipelineState::Idle);

        let err = pipeline.stitch(&[]).unwrap_err();
        assert!(matches!(err, StitchError::InsufficientFrames { found: 0 }));

        let err = pipeline.stitch(&[noise_frame(4, 4, 1)]).unwrap_err();
        assert!(matches!(err, StitchError::InsufficientFrames { found: 1 }));
        assert_eq!(pipeline.state(), PipelineState::Failed);
    }

    #[test]
    fn test_dimension_mismatch_aborts_run() {
        let frames = [noise_frame(20, 30, 1), noise_frame(20, 30, 2), noise_frame(21, 30, 3)];
        let mut pipeline = StitchPipeline::new(StitchConfig::default()).unwrap();
        let err = pipeline.stitch(&frames).unwrap_err();

        assert!(matches!(
            err,
            StitchError::DimensionMismatch { axis: Axis::Vertical, frame_index: 2, expected: 20, found: 21 }
        ));
        assert_eq!(pipeline.state(), PipelineState::Failed);
    }

    #[test]
    fn test_three_frames_with_growing_composite() {
        // second overlap only fits the search once the composite is taller than frame 0
        let first = noise_frame(40, 200, 1);
        let second = vertical_successor(&first, 300, 60, 2);
        let third = vertical_successor(&second, 500, 120, 3);

        let mut pipeline = StitchPipeline::new(StitchConfig::default()).unwrap();
        let (composite, report) = pipeline
            .stitch_with_report(&[first.clone(), second, third.clone()])
            .unwrap();

        assert_eq!(composite.height(), 200 + 300 - 60 + 500 - 120);
        assert_eq!(pipeline.state(), PipelineState::Done);

        let folds = report.folds();
        assert_eq!(folds.len(), 2);
        assert_eq!((folds[0].frame_index, folds[0].overlap.overlap_size), (1, 60));
        assert_eq!((folds[1].frame_index, folds[1].overlap.overlap_size), (2, 120));
        assert!(folds.iter().all(|fold| fold.mode == FoldMode::Blended));

        assert_eq!(composite.row(0), first.row(0));
        assert_eq!(composite.row(819), third.row(499));
    }

    #[test]
    fn test_min_overlap_applies_to_supplied_detector() {
        let a = noise_frame(40, 300, 1);
        let b = vertical_successor(&a, 300, 30, 2);
        let frames = [a, b];
        let config = StitchConfig::builder().min_overlap(30).build();

        let mut built = StitchPipeline::new(config.clone()).unwrap();
        let from_new = built.stitch(&frames).unwrap();

        let mut assembled = StitchPipeline::with_components(
            config,
            ChromeBandDetector::new(),
            OverlapDetector::with_search(50, 10),
            SeamRefiner::new(),
        )
        .unwrap();
        let (from_components, report) = assembled.stitch_with_report(&frames).unwrap();

        assert_eq!(from_new.height(), 570);
        assert_eq!(from_components, from_new);
        assert_eq!(report.folds()[0].overlap.overlap_size, 30);
    }

    #[test]
    fn test_horizontal_overlap_is_blended() {
        let a = noise_frame(300, 60, 1);
        let b = horizontal_successor(&a, 300, 70, 2);
        let config = StitchConfig::builder().axis(Axis::Horizontal).blend_width(20).build();
        let mut pipeline = StitchPipeline::new(config).unwrap();
        let (composite, report) = pipeline.stitch_with_report(&[a, b]).unwrap();

        assert_eq!((composite.width(), composite.height()), (530, 60));
        assert_eq!(report.folds()[0].overlap.overlap_size, 70);
    }

    #[test]
    fn test_unrelated_frames_fall_back_to_concatenation() {
        let frames = [noise_frame(50, 300, 1), noise_frame(50, 300, 2)];
        let mut pipeline = StitchPipeline::new(StitchConfig::default()).unwrap();
        let (composite, report) = pipeline.stitch_with_report(&frames).unwrap();

        assert_eq!(composite.height(), 600);
        assert_eq!(report.folds()[0].mode, FoldMode::Concatenated);
        assert_eq!(report.folds()[0].overlap.overlap_size, 0);
    }

    #[test]
    fn test_chrome_is_cropped_before_folding() {
        let frames: Vec<RasterImage> = (0..3)
            .map(|seed| {
                let frame = with_uniform_rows(&noise_frame(40, 300, seed), 0..44, [30, 30, 30]);
                with_uniform_rows(&frame, 266..300, [240, 240, 240])
            })
            .collect();
        let config = StitchConfig::builder()
            .remove_chrome(true)
            .auto_detect_overlap(false)
            .build();
        let mut pipeline = StitchPipeline::new(config).unwrap();
        let (composite, report) = pipeline.stitch_with_report(&frames).unwrap();

        assert_eq!(composite.height(), 3 * (300 - 44 - 34));
        assert_eq!(composite.row(0), frames[0].row(44));
        assert_eq!(
            report.chrome_bands(),
            &[ChromeBands { top_height: 44, bottom_height: 34 }; 3]
        );
        assert!(report.get_step("crop_chrome").is_some());
        // inputs are left alone
        assert_eq!(frames[0].height(), 300);
    }

    #[test]
    fn test_chrome_removal_skipped_for_horizontal() {
        let frames = [
            with_uniform_rows(&noise_frame(40, 300, 1), 0..44, [0, 0, 0]),
            with_uniform_rows(&noise_frame(40, 300, 2), 0..44, [0, 0, 0]),
        ];
        let config = StitchConfig::builder()
            .axis(Axis::Horizontal)
            .remove_chrome(true)
            .auto_detect_overlap(false)
            .build();
        let mut pipeline = StitchPipeline::new(config).unwrap();
        let (composite, report) = pipeline.stitch_with_report(&frames).unwrap();

        assert_eq!((composite.width(), composite.height()), (80, 300));
        assert!(report.chrome_bands().is_empty());
    }

    #[test]
    fn test_refined_seam_reconstructs_source() {
        // true overlap 77, the coarse search lands on 80
        let a = smooth_frame(60, 400, 0);
        let b = smooth_frame(60, 400, 323);
        let config = StitchConfig::builder().refine_seam(true).blend_width(10).build();
        let mut pipeline = StitchPipeline::with_components(
            config,
            ChromeBandDetector::new(),
            OverlapDetector::new(),
            SeamRefiner::with_stride(1),
        )
        .unwrap();
        let (composite, report) = pipeline.stitch_with_report(&[a, b]).unwrap();

        let fold = &report.folds()[0];
        assert_eq!(fold.overlap.overlap_size, 80);
        assert_eq!(fold.seam_offset, Some(3));
        assert_eq!(fold.effective_overlap(), 77);
        assert_eq!(composite, smooth_frame(60, 723, 0));
    }

    #[test]
    fn test_unrefined_seam_uses_coarse_overlap() {
        let a = smooth_frame(60, 400, 0);
        let b = smooth_frame(60, 400, 323);
        let mut pipeline = StitchPipeline::new(StitchConfig::default()).unwrap();
        let (composite, report) = pipeline.stitch_with_report(&[a, b]).unwrap();

        assert_eq!(report.folds()[0].seam_offset, None);
        assert_eq!(composite.height(), 720);
    }

    #[test]
    fn test_diagnostics_do_not_change_output() {
        let a = noise_frame(64, 300, 5);
        let b = vertical_successor(&a, 300, 60, 6);
        let frames = [a, b];

        let mut pipeline = StitchPipeline::new(StitchConfig::default()).unwrap();
        let silent = pipeline.stitch(&frames).unwrap();

        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .finish();
        let traced = tracing::subscriber::with_default(subscriber, || pipeline.stitch(&frames).unwrap());

        assert_eq!(silent, traced);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = StitchConfig::builder().blend_width(0).build();
        assert!(matches!(StitchPipeline::new(config), Err(StitchError::InvalidConfig(_))));

        let mut pipeline = StitchPipeline::new(StitchConfig::default()).unwrap();
        let bad = StitchConfig::builder().max_overlap_ratio(2.0).build();
        assert!(pipeline.set_config(bad).is_err());
        assert_eq!(pipeline.config(), &StitchConfig::default());
    }
}
