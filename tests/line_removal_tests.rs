use darkline::{
    DarkLineError, DetectionParams, ImageBuffer, Line, LineRegistry, LineScanner, RemovalMethod,
    Result, ScanOrientation, copy_registry, create_registry, destroy_registry, remove_selective,
    remove_sequential, scan, summarize,
};
use image::{ImageBuffer as Luma16Image, Luma};

const WHITE: u16 = 65535;

/// Loads a synthetic 16-bit image the way a file loader would hand it over.
fn load(img: &Luma16Image<Luma<u16>, Vec<u16>>) -> Result<ImageBuffer> {
    ImageBuffer::from_u16_samples(img.height() as usize, img.width() as usize, img.as_raw())
}

fn seam_image(
    width: u32,
    height: u32,
    dark_cols: &[u32],
    dark_rows: &[u32],
) -> Result<ImageBuffer> {
    let img = Luma16Image::from_fn(width, height, |x, y| {
        if dark_cols.contains(&x) || dark_rows.contains(&y) {
            Luma([0u16])
        } else {
            Luma([WHITE])
        }
    });
    load(&img)
}

fn numbered(rows: usize, cols: usize) -> Result<ImageBuffer> {
    ImageBuffer::from_fn(rows, cols, |y, x| (y * 1000 + x) as f64 + 2000.0)
}

#[test]
fn test_scan_is_independent_of_worker_count() -> Result<()> {
    let img = Luma16Image::from_fn(120, 90, |x, y| {
        let v = if x % 17 < 2 || y % 23 == 4 {
            (x * 7 + y) % 900
        } else if (x * y) % 13 == 0 {
            30000
        } else {
            WHITE as u32
        };
        Luma([v as u16])
    });
    let image = load(&img)?;
    let single = LineScanner::new(DetectionParams::default().with_workers(1))
        .scan(&image, ScanOrientation::Both)?;
    let many = LineScanner::new(DetectionParams::default().with_workers(7))
        .scan(&image, ScanOrientation::Both)?;
    assert!(single.len() > 4);
    assert_eq!(single, many);
    Ok(())
}

#[test]
fn test_single_dark_column_yields_one_line() -> Result<()> {
    let image = seam_image(40, 30, &[13], &[])?;
    let registry = scan(&image, ScanOrientation::Vertical)?;
    assert_eq!(registry.len(), 1);
    let line = registry.lines()[0];
    assert_eq!((line.x, line.width, line.end_y), (13, 1, 29));
    Ok(())
}

#[test]
fn test_run_reaching_right_edge_is_kept() -> Result<()> {
    let w = 25;
    let image = seam_image(w, 10, &[w - 3, w - 2, w - 1], &[])?;
    let registry = scan(&image, ScanOrientation::Vertical)?;
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.lines()[0].x, (w - 3) as usize);
    assert_eq!(registry.lines()[0].width, 3);
    Ok(())
}

#[test]
fn test_neighbor_values_leaves_bright_lines_unchanged() -> Result<()> {
    let mut image = numbered(12, 12)?;
    let before = image.clone();
    let mut registry =
        LineRegistry::from_lines(vec![Line::vertical(4, 2, 12), Line::horizontal(7, 1, 12)]);
    let outcome = remove_selective(
        &mut image,
        &mut registry,
        true,
        true,
        RemovalMethod::NeighborValues,
    )?;
    assert!(!outcome.dimensions_changed());
    assert_eq!(outcome.pixels_replaced, 0);
    assert_eq!(image, before);
    assert_eq!(
        image.to_display_frame()?.as_raw(),
        before.to_display_frame()?.as_raw()
    );
    Ok(())
}

#[test]
fn test_neighbor_values_uses_median_not_mean() -> Result<()> {
    let mut image = ImageBuffer::from_rows(vec![vec![10000.0, 20000.0, 0.0, 30000.0, 40000.0]])?;
    let line = Line::vertical(2, 1, 1);
    let mut registry = LineRegistry::default();
    remove_sequential(
        &mut image,
        &mut registry,
        &[line],
        true,
        true,
        RemovalMethod::NeighborValues,
    )?;
    assert_eq!(image.get(0, 2), 30000.0);
    assert_ne!(image.get(0, 2), 25000.0);
    Ok(())
}

#[test]
fn test_direct_stitch_dimension_law() -> Result<()> {
    let source = numbered(9, 15)?;
    let mut image = source.clone();
    let line = Line::vertical(6, 4, 9);
    let mut registry = LineRegistry::default();
    let outcome = remove_sequential(
        &mut image,
        &mut registry,
        &[line],
        true,
        true,
        RemovalMethod::DirectStitch,
    )?;
    assert!(outcome.dimensions_changed());
    assert_eq!(outcome.dimensions(), (9, 11));
    for y in 0..9 {
        for x in 0..11 {
            let sx = if x < 6 { x } else { x + 4 };
            assert_eq!(image.get(y, x), source.get(y, sx));
        }
    }
    Ok(())
}

#[test]
fn test_sequential_stitch_matches_combined_pass() -> Result<()> {
    let source = numbered(8, 30)?;
    let a = Line::vertical(5, 2, 8);
    let b = Line::vertical(20, 3, 8);

    let mut sequential = source.clone();
    let mut reg_seq = LineRegistry::default();
    remove_sequential(
        &mut sequential,
        &mut reg_seq,
        &[b, a],
        true,
        true,
        RemovalMethod::DirectStitch,
    )?;

    let mut combined = source.clone();
    let mut reg_all = LineRegistry::from_lines(vec![a, b]);
    remove_selective(&mut combined, &mut reg_all, true, true, RemovalMethod::DirectStitch)?;

    assert_eq!(sequential.dimensions(), (8, 25));
    assert_eq!(sequential, combined);
    assert!(reg_all.is_empty());
    Ok(())
}

#[test]
fn test_mixed_orientation_sequential_matches_combined_pass() -> Result<()> {
    let source = numbered(20, 20)?;
    let lines = [
        Line::horizontal(15, 2, 20),
        Line::vertical(3, 1, 20),
        Line::horizontal(2, 1, 20),
        Line::vertical(10, 2, 20),
    ];

    let mut sequential = source.clone();
    let mut registry = LineRegistry::from_lines(lines.to_vec());
    let outcome = remove_sequential(
        &mut sequential,
        &mut registry,
        &lines,
        true,
        true,
        RemovalMethod::DirectStitch,
    )?;
    assert_eq!(outcome.removed_count(), 4);
    assert_eq!(outcome.dimensions(), (17, 17));
    assert!(registry.is_empty());

    let mut combined = source.clone();
    let mut all = LineRegistry::from_lines(lines.to_vec());
    remove_selective(&mut combined, &mut all, true, true, RemovalMethod::DirectStitch)?;
    assert_eq!(sequential, combined);
    Ok(())
}

#[test]
fn test_single_invalid_line_is_rejected() -> Result<()> {
    let mut image = numbered(5, 10)?;
    let before = image.clone();
    let mut registry = LineRegistry::default();
    for method in [RemovalMethod::DirectStitch, RemovalMethod::NeighborValues] {
        let err = remove_sequential(
            &mut image,
            &mut registry,
            &[Line::vertical(10, 1, 5)],
            true,
            true,
            method,
        )
        .unwrap_err();
        assert!(matches!(err, DarkLineError::InvalidLineSelection(_)));
        assert_eq!(image, before);
    }
    Ok(())
}

#[test]
fn test_registry_lifecycle() -> Result<()> {
    let mut registry = create_registry(0)?;
    assert!(registry.is_empty());
    destroy_registry(Some(&mut registry));
    destroy_registry(Some(&mut registry));
    destroy_registry(None);

    let mut filled = create_registry(3)?;
    assert_eq!(filled.len(), 3);
    destroy_registry(Some(&mut filled));
    assert!(filled.is_empty());
    Ok(())
}

#[test]
fn test_isolated_only_keeps_in_object_lines() -> Result<()> {
    // Column 10 sits on a dark object spanning columns 8..=12; column 30 is isolated.
    let img = Luma16Image::from_fn(50, 40, |x, _| match x {
        10 | 30 => Luma([0u16]),
        8 | 9 | 11 | 12 => Luma([20000u16]),
        _ => Luma([WHITE]),
    });
    let mut image = load(&img)?;
    let mut registry = scan(&image, ScanOrientation::Both)?;
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.count_in_object(), 1);

    let before = copy_registry(&registry)?;
    let outcome = remove_selective(
        &mut image,
        &mut registry,
        false,
        true,
        RemovalMethod::DirectStitch,
    )?;
    assert_eq!(outcome.removed_count(), 1);
    assert_eq!(outcome.removed[0].x, 30);
    assert_eq!(image.dimensions(), (40, 49));
    assert_eq!(registry.len(), 1);
    assert!(registry.lines()[0].in_object);

    let report = summarize(&before, &registry);
    assert!(report.contains("vertical x=30"));
    assert!(report.contains("1 lines remain."));
    Ok(())
}

#[test]
fn test_in_object_infill_keeps_dimensions() -> Result<()> {
    let img = Luma16Image::from_fn(30, 20, |_, y| match y {
        9 => Luma([0u16]),
        7 | 8 | 10 | 11 => Luma([12000u16]),
        _ => Luma([WHITE]),
    });
    let mut image = load(&img)?;
    let mut registry = scan(&image, ScanOrientation::Horizontal)?;
    assert_eq!(registry.count_in_object(), 1);

    let outcome = remove_selective(
        &mut image,
        &mut registry,
        true,
        false,
        RemovalMethod::NeighborValues,
    )?;
    assert_eq!(outcome.pixels_replaced, 30);
    assert_eq!(image.dimensions(), (20, 30));
    // Within radius 10: four 12000 neighbours and fifteen white ones.
    assert!((0..30).all(|x| image.get(9, x) == WHITE as f64));
    assert!(scan(&image, ScanOrientation::Horizontal)?.is_empty());
    Ok(())
}
