use nalgebra::Point2;
use typed_image_core::{
    Bgr, Bgra, Gray, Image, ImageError, ImageView, LineSegment, Rect, Size,
};

/// xorshift64, enough to scramble pixel content deterministically.
struct Noise(u64);

impl Noise {
    fn next(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    fn byte(&mut self) -> u8 {
        (self.next() >> 24) as u8
    }

    fn unit(&mut self) -> f32 {
        (self.next() >> 40) as f32 / (1u64 << 24) as f32
    }
}

fn noisy_bgr(width: usize, height: usize, seed: u64) -> Image<Bgr, u8> {
    let mut noise = Noise(seed);
    let data = (0..width * height * 3).map(|_| noise.byte()).collect();
    Image::from_vec(width, height, data).expect("valid buffer")
}

fn noisy_gray_f32(width: usize, height: usize, seed: u64) -> Image<Gray, f32> {
    let mut noise = Noise(seed);
    let data = (0..width * height).map(|_| noise.unit() * 255.0).collect();
    Image::from_vec(width, height, data).expect("valid buffer")
}

#[test]
fn generic_scale_matches_pairwise_add() {
    let a = noisy_gray_f32(64, 48, 7);
    let doubled = a.convert(|v| v * 2.0);
    let summed = a.combine(&a, |x, y| x + y).expect("same shape");
    assert_eq!(doubled, summed);
}

#[test]
fn three_way_combine_is_associative_for_random_content() {
    let a = noisy_gray_f32(33, 21, 99);
    let chained = a
        .combine(&a, |x, y| x + y)
        .and_then(|ab| ab.combine(&a, |x, y| x + y))
        .expect("same shape");
    let direct = a.combine3(&a, &a, |x, y, z| x + y + z).expect("same shape");
    assert_eq!(direct, chained);
}

#[test]
fn split_merge_round_trip_for_random_bgr() {
    let img = noisy_bgr(301, 234, 3);
    let channels = img.split();
    assert_eq!(channels.len(), 3);
    assert!(channels.iter().all(|c| c.size() == img.size()));
    let merged = Image::<Bgr, u8>::from_channels(&channels).expect("matching planes");
    assert_eq!(merged, img);
}

#[test]
fn roi_isolation_and_full_extents() {
    let mut img1 = Image::<Gray, f32>::new(50, 20).expect("valid size");
    img1.set_roi(Some(Rect::from_edges(10, 50, 1, 19).expect("ordered")))
        .expect("roi fits");
    img1.set_value(Gray::new(5.0));

    let mut img2 = Image::<Gray, f32>::new(50, 20).expect("valid size");
    img2.set_roi(Some(Rect::from_edges(0, 40, 2, 20).expect("ordered")))
        .expect("roi fits");
    img2.set_value(Gray::new(2.0));

    assert_eq!(img1.width(), img2.width());
    assert_eq!(img1.height(), img2.height());

    let sum = img1.combine(&img2, |a, b| a + b).expect("equal roi sizes");
    let abs_diff = sum.combine(&sum, |a, b| (a - b).abs()).expect("same shape");
    let mut total = 0.0f32;
    abs_diff.action(|v| total += v);
    assert_eq!(total, 0.0);

    img1.reset_roi();
    let outside = img1.reduce(0usize, |n, v| n + usize::from(v == 0.0));
    assert_eq!(outside, 50 * 20 - 40 * 18);
}

#[test]
fn construction_from_nested_data_matches_indexing() {
    let mut noise = Noise(11);
    let data: Vec<Vec<[u8; 4]>> = (0..9)
        .map(|_| {
            (0..5)
                .map(|_| [noise.byte(), noise.byte(), noise.byte(), noise.byte()])
                .collect()
        })
        .collect();
    let img = Image::<Bgra, u8>::from_array3(&data).expect("valid data");
    assert_eq!(img.size(), Size::new(5, 9));
    for (i, row) in data.iter().enumerate() {
        for (j, px) in row.iter().enumerate() {
            assert_eq!(img.pixel(i, j).expect("in range"), px);
        }
    }
}

#[test]
fn boundaries() {
    assert!(matches!(
        Image::<Bgr, u8>::new(0, 1),
        Err(ImageError::InvalidDimension { .. })
    ));
    assert!(matches!(
        Image::<Gray, f64>::filled(3, 0, Gray::new(1.0)),
        Err(ImageError::InvalidDimension { .. })
    ));
    let img = noisy_bgr(8, 6, 5);
    assert!(img.get(5, 7).is_ok());
    assert!(matches!(img.get(6, 0), Err(ImageError::OutOfRange { .. })));
    assert!(matches!(img.get(0, 8), Err(ImageError::OutOfRange { .. })));
}

#[test]
fn view_over_borrowed_buffer_samples_lines() {
    let owned = noisy_bgr(101, 133, 21);
    let view = ImageView::<Bgr, u8>::from_slice(101, 133, owned.data()).expect("valid view");
    let line = LineSegment::new(Point2::new(0, 0), Point2::new(0, 100));
    let profile = view.sample(&line).expect("inside");
    for i in 0..100 {
        let px = profile.get(i).expect("sample exists");
        assert_eq!(
            owned.get(i, 0).expect("in range"),
            Bgr::new(px[0].into(), px[1].into(), px[2].into())
        );
    }
    assert_eq!(view, owned.view());
}
