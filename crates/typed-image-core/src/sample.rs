//! Line-profile extraction.

use nalgebra::Point2;

use crate::{ColorType, Depth, Image, ImageError, ImageView, LineSegment};

/// Pixel values sampled along a rasterized line, in walk order.
#[derive(Clone, Debug, PartialEq)]
pub struct LineProfile<D> {
    channels: usize,
    points: Vec<Point2<i32>>,
    data: Vec<D>,
}

impl<D: Depth> LineProfile<D> {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Channel values of the `i`-th sample.
    pub fn get(&self, i: usize) -> Option<&[D]> {
        let start = i.checked_mul(self.channels)?;
        self.data.get(start..start + self.channels)
    }

    /// Sampled positions (`x` = column, `y` = row, ROI-relative).
    pub fn points(&self) -> &[Point2<i32>] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &[D]> + '_ {
        self.data.chunks_exact(self.channels)
    }

    /// Flat `len() x channels()` buffer.
    pub fn as_slice(&self) -> &[D] {
        &self.data
    }
}

impl<C: ColorType, D: Depth> ImageView<'_, C, D> {
    /// Sample along `line` with 8-connected Bresenham, both endpoints included.
    pub fn sample(&self, line: &LineSegment) -> Result<LineProfile<D>, ImageError> {
        let roi = self.roi();
        for p in [line.p1, line.p2] {
            let inside = p.x >= 0
                && p.y >= 0
                && (p.x as usize) < roi.width
                && (p.y as usize) < roi.height;
            if !inside {
                return Err(ImageError::OutOfRange {
                    row: i64::from(p.y),
                    col: i64::from(p.x),
                    width: roi.width,
                    height: roi.height,
                });
            }
        }

        let points: Vec<_> = line.rasterize().collect();
        let mut data = Vec::with_capacity(points.len() * C::CHANNELS);
        for p in &points {
            // Convex ROI: every point between two inside endpoints is inside.
            data.extend_from_slice(self.pixel(p.y as usize, p.x as usize)?);
        }
        Ok(LineProfile {
            channels: C::CHANNELS,
            points,
            data,
        })
    }
}

impl<C: ColorType, D: Depth> Image<C, D> {
    /// See [`ImageView::sample`].
    pub fn sample(&self, line: &LineSegment) -> Result<LineProfile<D>, ImageError> {
        self.view().sample(line)
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::Point2;

    use crate::{Bgr, Image, ImageError, LineSegment, Rect};

    fn patterned(width: usize, height: usize) -> Image<Bgr, u8> {
        let data = (0..width * height * 3)
            .map(|i| ((i * 7919) % 256) as u8)
            .collect();
        Image::from_vec(width, height, data).expect("valid buffer")
    }

    #[test]
    fn vertical_profile_matches_indexing() {
        let img = patterned(101, 133);
        let line = LineSegment::new(Point2::new(0, 0), Point2::new(0, 100));
        let profile = img.sample(&line).expect("endpoints inside");
        assert_eq!(profile.len(), 101);
        assert_eq!(profile.channels(), 3);
        for i in 0..100 {
            let px = profile.get(i).expect("sample exists");
            assert_eq!(img.get(i, 0).expect("in range"), Bgr::new(px[0].into(), px[1].into(), px[2].into()));
        }
    }

    #[test]
    fn diagonal_profile_is_deterministic() {
        let img = patterned(40, 30);
        let line = LineSegment::new(Point2::new(3, 29), Point2::new(39, 2));
        let a = img.sample(&line).expect("endpoints inside");
        let b = img.sample(&line).expect("endpoints inside");
        assert_eq!(a, b);
        assert_eq!(a.len(), line.pixel_count());
        assert_eq!(a.iter().count(), a.len());
        let last = a.points().last().expect("non-empty");
        assert_eq!(a.get(a.len() - 1), Some(&img[(last.y as usize, last.x as usize)]));
    }

    #[test]
    fn endpoints_outside_roi_fail() {
        let mut img = patterned(20, 20);
        let line = LineSegment::new(Point2::new(0, 0), Point2::new(19, 19));
        assert!(img.sample(&line).is_ok());

        img.set_roi(Some(Rect::new(5, 5, 10, 10))).expect("roi fits");
        assert!(matches!(
            img.sample(&line),
            Err(ImageError::OutOfRange { row: 19, col: 19, .. })
        ));
        let negative = LineSegment::new(Point2::new(-1, 0), Point2::new(3, 3));
        assert!(img.sample(&negative).is_err());
    }
}
