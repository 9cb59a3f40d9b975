/// An affine transform.
///
/// A six-element array storing the coefficients of an affine transform used
/// in mapping coordinates between pixel/line `(P, L)` (raster) space and
/// `(Xp, Yp)` (projected) space.
///
/// # Interpretation
///
///   * `GeoTransform[0]`: x-coordinate of the upper-left corner of the upper-left pixel.
///   * `GeoTransform[1]`: W-E pixel resolution (pixel width).
///   * `GeoTransform[2]`: row rotation (typically zero).
///   * `GeoTransform[3]`: y-coordinate of the upper-left corner of the upper-left pixel.
///   * `GeoTransform[4]`: column rotation (typically zero).
///   * `GeoTransform[5]`: N-S pixel resolution (pixel height), negative value for a North-up image.
///
/// This is the layout GDAL reports for raster datasets, which is why
/// [`GridSystem`](crate::data::GridSystem) can be built from it.
pub type GeoTransform = [f64; 6];

/// Extension methods on [`GeoTransform`]
pub trait GeoTransformEx {
    /// Apply GeoTransform to x/y coordinate.
    fn apply(&self, pixel: f64, line: f64) -> (f64, f64);
}

impl GeoTransformEx for GeoTransform {
    fn apply(&self, pixel: f64, line: f64) -> (f64, f64) {
        let geo_x = self[0] + pixel * self[1] + line * self[2];
        let geo_y = self[3] + pixel * self[4] + line * self[5];
        (geo_x, geo_y)
    }
}

/// Axis aligned bounding box.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Extent {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl Extent {
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Extent {
        Extent {
            xmin,
            xmax,
            ymin,
            ymax,
        }
    }

    /// Bounding box of a raster of `size` (columns, rows) placed by `transform`.
    pub fn from_geo_transform(transform: &GeoTransform, size: (usize, usize)) -> Extent {
        let (cols, rows) = (size.0 as f64, size.1 as f64);
        let corners = [
            transform.apply(0.0, 0.0),
            transform.apply(cols, 0.0),
            transform.apply(0.0, rows),
            transform.apply(cols, rows),
        ];
        let mut extent = Extent::new(f64::MAX, f64::MIN, f64::MAX, f64::MIN);
        for (x, y) in corners {
            extent.xmin = extent.xmin.min(x);
            extent.xmax = extent.xmax.max(x);
            extent.ymin = extent.ymin.min(y);
            extent.ymax = extent.ymax.max(y);
        }
        extent
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// Grow this extent so that it also covers `other`.
    pub fn union(&mut self, other: &Extent) {
        self.xmin = self.xmin.min(other.xmin);
        self.xmax = self.xmax.max(other.xmax);
        self.ymin = self.ymin.min(other.ymin);
        self.ymax = self.ymax.max(other.ymax);
    }
}
