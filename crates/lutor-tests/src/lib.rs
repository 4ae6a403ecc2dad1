//! Integration tests for LUTor crates.
//!
//! This crate contains end-to-end tests that go through image files, the LUT
//! builder, the `.cube` codec and the preset exporter together.

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use lutor_core::Image;
    use lutor_lut::{cube, Lut3D, LutBuilder, LutBuilderOptions};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::path::Path;
    use tempfile::tempdir;

    fn noise_image(width: u32, height: u32, seed: u64) -> Image {
        let mut rng = StdRng::seed_from_u64(seed);
        Image::from_fn(width, height, |_, _| [rng.random(), rng.random(), rng.random()]).unwrap()
    }

    fn grade(p: [u8; 3]) -> [u8; 3] {
        [p[0] / 2 + 64, p[1], 255 - p[2]]
    }

    fn save(dir: &Path, name: &str, image: &Image) -> std::path::PathBuf {
        let path = dir.join(name);
        lutor_io::write(&path, image).expect("Failed to write image");
        path
    }

    fn mean_abs_error(a: &Image, b: &Image) -> f64 {
        let total: u64 = a
            .pixels()
            .iter()
            .zip(b.pixels())
            .flat_map(|(p, q)| (0..3).map(move |c| (p[c] as i64 - q[c] as i64).unsigned_abs()))
            .sum();
        total as f64 / (a.pixel_count() * 3) as f64
    }

    /// Full pipeline: files -> LUT -> .cube -> reload -> apply
    #[test]
    fn test_lut_pipeline_reproduces_grade() {
        let dir = tempdir().unwrap();
        let original = noise_image(256, 256, 11);
        let stylized = original.map_pixels(grade);
        let orig_path = save(dir.path(), "before.png", &original);
        let styl_path = save(dir.path(), "after.png", &stylized);

        let original = lutor_io::read(&orig_path).unwrap();
        let stylized = lutor_io::read(&styl_path).unwrap();
        let builder = LutBuilder::new(LutBuilderOptions::default().with_size(17).with_seed(5));
        let lut = builder.build(&original, &stylized).unwrap();

        let cube_path = dir.path().join("look.cube");
        cube::write_3d(&cube_path, &lut).unwrap();
        let text = std::fs::read_to_string(&cube_path).unwrap();
        assert_eq!(text.lines().count(), 17 * 17 * 17 + 8);

        let loaded = cube::read_3d(&cube_path).unwrap();
        assert!(loaded.max_abs_diff(&lut).unwrap() < 1e-6);

        let preview = loaded.apply_image(&original);
        let before = mean_abs_error(&original, &stylized);
        let after = mean_abs_error(&preview, &stylized);
        assert!(after < before * 0.25, "before {before:.2}, after {after:.2}");
    }

    #[test]
    fn test_identity_pair_exports_identity() {
        let dir = tempdir().unwrap();
        let size = 16usize;
        let step = 255 / (size - 1);
        let mut pixels = Vec::new();
        for b in 0..size {
            for g in 0..size {
                for r in 0..size {
                    pixels.push([(r * step) as u8, (g * step) as u8, (b * step) as u8]);
                }
            }
        }
        let img = Image::from_pixels(64, 64, pixels).unwrap();
        let path = save(dir.path(), "lattice.png", &img);
        let img = lutor_io::read(&path).unwrap();

        let lut = LutBuilder::new(LutBuilderOptions::default().with_size(size).with_seed(0))
            .build(&img, &img)
            .unwrap();
        let bytes = cube::encode_3d(&lut).unwrap();
        let decoded = cube::parse_3d(std::io::Cursor::new(&bytes)).unwrap();

        assert!(decoded.max_abs_diff(&Lut3D::identity(size).unwrap()).unwrap() < 1e-4);
        assert_eq!(cube::encode_3d(&decoded).unwrap(), bytes);
    }

    #[test]
    fn test_single_color_pair() {
        let original = Image::filled(100, 100, [128, 128, 128]).unwrap();
        let stylized = Image::filled(100, 100, [150, 100, 80]).unwrap();
        let lut = LutBuilder::new(LutBuilderOptions::default().with_size(9))
            .build(&original, &stylized)
            .unwrap();

        let bytes = cube::encode_3d(&lut).unwrap();
        let decoded = cube::parse_3d(std::io::Cursor::new(&bytes)).unwrap();
        for cell in &decoded.data {
            assert_abs_diff_eq!(cell[0], 150.0 / 255.0, epsilon = 2e-6);
            assert_abs_diff_eq!(cell[1], 100.0 / 255.0, epsilon = 2e-6);
            assert_abs_diff_eq!(cell[2], 80.0 / 255.0, epsilon = 2e-6);
        }
        assert_eq!(lut.apply_rgb8([3, 200, 90]), [150, 100, 80]);
    }

    #[test]
    fn test_mismatched_sizes_resample() {
        let original = noise_image(120, 80, 1);
        let stylized = original.map_pixels(grade).resized(60, 40).unwrap();

        let lut = LutBuilder::new(LutBuilderOptions::default().with_size(8).with_seed(2))
            .build(&original, &stylized)
            .unwrap();
        assert_eq!(lut.size, 8);

        let strict = LutBuilder::new(LutBuilderOptions::default().with_auto_resize(false));
        assert!(strict.build(&original, &stylized).is_err());

        let adj = lutor_preset::estimate(&original, &stylized).unwrap();
        assert!((-2.0..=2.0).contains(&adj.exposure));
    }

    #[test]
    fn test_preset_pipeline() {
        let dir = tempdir().unwrap();
        let original = noise_image(64, 64, 3);
        let warm = original.map_pixels(|p| [p[0].saturating_add(30), p[1].saturating_add(10), p[2] / 2]);
        let orig_path = save(dir.path(), "before.bmp", &original);
        let warm_path = save(dir.path(), "after.bmp", &warm);

        let adj = lutor_preset::estimate(
            &lutor_io::read(&orig_path).unwrap(),
            &lutor_io::read(&warm_path).unwrap(),
        )
        .unwrap();
        assert!(adj.temperature > 0.0);
        assert!(adj.vibrance > 0.0 && adj.vibrance <= 100.0);

        let xmp_path = dir.path().join("look.xmp");
        lutor_preset::write_xmp(&xmp_path, &adj).unwrap();
        let text = std::fs::read_to_string(&xmp_path).unwrap();
        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
        assert!(text.ends_with("</x:xmpmeta>"));

        let reread = lutor_preset::read_xmp(&xmp_path).unwrap();
        assert_eq!(lutor_preset::encode(&reread), text);
    }

    #[test]
    fn test_transfer_pipeline() {
        let dir = tempdir().unwrap();
        let content = noise_image(48, 32, 7);
        let style = Image::filled(16, 16, [30, 140, 220]).unwrap();
        let content_path = save(dir.path(), "content.png", &content);
        let style_path = save(dir.path(), "style.png", &style);

        let content = lutor_io::read(&content_path).unwrap();
        let style = lutor_io::read(&style_path).unwrap();
        let options = lutor_color::TransferOptions::default();
        let out = lutor_color::transfer(&content, &style, &options).unwrap();
        assert_eq!(out.dimensions(), content.dimensions());
        assert!(out.pixels().iter().all(|&p| p == [30, 140, 220]));

        let out_path = save(dir.path(), "out.png", &out);
        assert_eq!(lutor_io::read(&out_path).unwrap(), out);
    }

    #[test]
    fn test_histogram_matching_is_idempotent() {
        let img = noise_image(40, 40, 21);
        let once = lutor_color::match_histograms(&img, &img).unwrap();
        assert_eq!(once, img);
    }
}
