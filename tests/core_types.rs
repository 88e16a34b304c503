use texcorr::{
    correlate, find_peak, CorrelationConfig, Correlator, FftContext, ImageView, Operand,
    OwnedImage, PaddingMode, TexCorrError,
};

#[test]
fn image_view_rejects_invalid_dimensions() {
    let data = [0u8; 4];

    let err = ImageView::from_slice(&data, 0, 1).err().unwrap();
    assert_eq!(
        err,
        TexCorrError::InvalidDimensions {
            width: 0,
            height: 1,
        }
    );

    let err = ImageView::from_slice(&data, 1, 0).err().unwrap();
    assert_eq!(
        err,
        TexCorrError::InvalidDimensions {
            width: 1,
            height: 0,
        }
    );
}

#[test]
fn image_view_rejects_invalid_stride() {
    let data = [0u8; 8];

    let err = ImageView::new(&data, 4, 1, 3).err().unwrap();
    assert_eq!(
        err,
        TexCorrError::InvalidStride {
            width: 4,
            stride: 3,
        }
    );
}

#[test]
fn image_view_rejects_small_buffer() {
    let data = [0u8; 3];

    let err = ImageView::new(&data, 2, 2, 2).err().unwrap();
    assert_eq!(err, TexCorrError::BufferTooSmall { needed: 4, got: 3 });
}

#[test]
fn image_view_roi_matches_expected_values() {
    let data: Vec<u8> = (0u8..16).collect();
    let view = ImageView::from_slice(&data, 4, 4).unwrap();
    assert_eq!(view.stride(), 4);
    assert_eq!(view.as_slice(), data.as_slice());

    let roi = view.roi(1, 1, 2, 2).unwrap();
    assert_eq!(roi.width(), 2);
    assert_eq!(roi.height(), 2);
    assert_eq!(roi.stride(), 4);
    assert_eq!(roi.row(0).unwrap(), &[5u8, 6u8]);
    assert_eq!(roi.row(1).unwrap(), &[9u8, 10u8]);
    assert_eq!(roi.get(0, 0).copied(), Some(5u8));
    assert!(roi.get(2, 0).is_none());

    let err = view.roi(3, 3, 2, 2).err().unwrap();
    assert_eq!(
        err,
        TexCorrError::RoiOutOfBounds {
            x: 3,
            y: 3,
            width: 2,
            height: 2,
            img_width: 4,
            img_height: 4,
        }
    );
}

#[test]
fn owned_image_requires_exact_length() {
    assert!(OwnedImage::new(vec![0u8; 6], 3, 2).is_ok());
    assert_eq!(
        OwnedImage::new(vec![0u8; 5], 3, 2).err().unwrap(),
        TexCorrError::BufferTooSmall { needed: 6, got: 5 }
    );
    assert_eq!(
        OwnedImage::new(vec![0u8; 7], 3, 2).err().unwrap(),
        TexCorrError::InvalidDimensions {
            width: 3,
            height: 2,
        }
    );
}

#[test]
fn owned_image_from_strided_view_is_contiguous() {
    let data = [1u16, 2, 0, 3, 4, 0];
    let view = ImageView::new(&data, 2, 2, 3).unwrap();
    let owned = OwnedImage::from_view(view).unwrap();
    assert_eq!(owned.data(), &[1u16, 2, 3, 4]);
    assert_eq!(owned.view().stride(), 2);
}

#[test]
fn roi_can_be_correlated_without_copying() {
    let parent = OwnedImage::from_fn(12, 10, |x, y| ((x * 31 + y * 17 + x * y * 7) % 97) as u8)
        .unwrap();
    let patch = parent.view().roi(4, 3, 5, 4).unwrap();
    let surface = correlate(parent.view(), patch).unwrap();
    assert_eq!((surface.width(), surface.height()), (8, 7));

    let patch_copy = OwnedImage::from_view(patch).unwrap();
    let copied = correlate(parent.view(), patch_copy.view()).unwrap();
    assert_eq!(surface, copied);
}

#[test]
fn degenerate_error_names_the_operand() {
    let flat = [7.5f32; 9];
    let textured: Vec<f32> = (0..9).map(|v| v as f32).collect();
    let flat = ImageView::from_slice(&flat, 3, 3).unwrap();
    let textured = ImageView::from_slice(&textured, 3, 3).unwrap();

    match correlate(textured, flat) {
        Err(TexCorrError::DegenerateInput { which, variance }) => {
            assert_eq!(which, Operand::B);
            assert_eq!(variance, 0.0);
        }
        other => panic!("expected degenerate input, got {other:?}"),
    }
}

#[test]
fn degeneracy_threshold_is_configurable() {
    // Centered energy 1 against raw energy 2.
    let faint = [0u8, 1, 0, 1];
    let view = ImageView::from_slice(&faint, 2, 2).unwrap();
    let strict = CorrelationConfig {
        min_relative_energy: 0.5,
        ..CorrelationConfig::default()
    };

    let err = texcorr::correlate_with(&mut FftContext::new(), &strict, view, view).unwrap_err();
    assert!(matches!(err, TexCorrError::DegenerateInput { .. }));

    let surface =
        texcorr::correlate_with(&mut FftContext::new(), &CorrelationConfig::default(), view, view)
            .unwrap();
    let peak = find_peak(surface.view()).unwrap();
    assert!((peak.value - 1.0).abs() < 1e-4);
}

#[test]
fn small_sample_scale_is_not_degenerate() {
    let textured: Vec<f64> = (0..16).map(|v| ((v * 5) % 7) as f64 * 1e-6).collect();
    let view = ImageView::from_slice(&textured, 4, 4).unwrap();

    let surface = correlate(view, view).unwrap();
    let peak = find_peak(surface.view()).unwrap();
    assert!((peak.value - 1.0).abs() < 1e-4);
}

#[test]
fn correlator_keeps_its_config_and_pools_scratch() {
    let config = CorrelationConfig {
        padding: PaddingMode::Minimal,
        ..CorrelationConfig::default()
    };
    let mut correlator = Correlator::new().with_config(config);
    assert_eq!(correlator.config(), &config);

    let data: Vec<u8> = (0..36).map(|v| ((v * 11) % 17) as u8).collect();
    let view = ImageView::from_slice(&data, 6, 6).unwrap();
    let surface = correlator.correlate(view, view).unwrap();
    assert!(correlator.context().pooled_buffers() > 0);

    let width = surface.width();
    let values = surface.values().to_vec();
    let image = surface.into_image();
    assert_eq!(image.width(), width);
    assert_eq!(image.data(), values.as_slice());
}

#[test]
fn clearing_the_pool_drops_pooled_buffers() {
    let data: Vec<f32> = (0..20).map(|v| (v % 3) as f32).collect();
    let view = ImageView::from_slice(&data, 5, 4).unwrap();
    let mut ctx = FftContext::new();

    texcorr::correlate_with(&mut ctx, &CorrelationConfig::default(), view, view).unwrap();
    assert!(ctx.pooled_buffers() > 0);

    ctx.clear_pool();
    assert_eq!(ctx.pooled_buffers(), 0);

    texcorr::correlate_with(&mut ctx, &CorrelationConfig::default(), view, view).unwrap();
    assert!(ctx.pooled_buffers() > 0);
}
