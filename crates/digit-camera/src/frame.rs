use crate::{FormatError, PlaneKind};

/// One plane of a planar frame.
///
/// Sample `(row, col)` lives at `row * row_stride + col * pixel_stride`.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    data: Vec<u8>,
    row_stride: usize,
    pixel_stride: usize,
}

impl Plane {
    pub fn new(data: Vec<u8>, row_stride: usize, pixel_stride: usize) -> Self {
        Self {
            data,
            row_stride,
            pixel_stride,
        }
    }

    /// A plane with one byte per sample.
    pub fn packed(data: Vec<u8>, row_stride: usize) -> Self {
        Self::new(data, row_stride, 1)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn row_stride(&self) -> usize {
        self.row_stride
    }

    pub fn pixel_stride(&self) -> usize {
        self.pixel_stride
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Caller must have validated the plane for this geometry.
    pub(crate) fn sample(&self, row: usize, col: usize) -> u8 {
        self.data[row * self.row_stride + col * self.pixel_stride]
    }

    fn validate(&self, kind: PlaneKind, rows: usize, cols: usize) -> Result<(), FormatError> {
        let row_span = (cols - 1)
            .checked_mul(self.pixel_stride)
            .and_then(|span| span.checked_add(1));
        let row_span = match row_span {
            Some(span) if self.pixel_stride > 0 && self.row_stride >= span => span,
            _ => {
                return Err(FormatError::Stride {
                    plane: kind,
                    row_stride: self.row_stride,
                    pixel_stride: self.pixel_stride,
                });
            }
        };

        // The last row may be cut short after its final sample.
        let expected = (rows - 1)
            .checked_mul(self.row_stride)
            .and_then(|start| start.checked_add(row_span))
            .unwrap_or(usize::MAX);
        if self.data.len() < expected {
            return Err(FormatError::PlaneSize {
                plane: kind,
                expected,
                got: self.data.len(),
            });
        }
        Ok(())
    }
}

/// A camera frame in planar YUV 4:2:0: full-resolution luma and two
/// chroma planes subsampled by two in each direction.
///
/// Frames are single-use: the analyzer takes them by value and drops them
/// once the frame has been processed.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanarFrame {
    width: usize,
    height: usize,
    y: Plane,
    u: Plane,
    v: Plane,
}

impl PlanarFrame {
    pub fn new(width: usize, height: usize, y: Plane, u: Plane, v: Plane) -> Self {
        Self {
            width,
            height,
            y,
            u,
            v,
        }
    }

    /// Split a contiguous YU12 (I420) buffer: Y, then U, then V.
    ///
    /// `row_stride` is the luma row stride in bytes; chroma rows use half of it.
    pub fn from_i420(
        width: usize,
        height: usize,
        row_stride: usize,
        data: &[u8],
    ) -> Result<Self, FormatError> {
        if width == 0 || height == 0 {
            return Err(FormatError::Dimensions { width, height });
        }
        let chroma_stride = row_stride.div_ceil(2);
        let chroma_rows = height.div_ceil(2);
        let lengths = row_stride.checked_mul(height).and_then(|y_len| {
            let c_len = chroma_stride.checked_mul(chroma_rows)?;
            let total = c_len.checked_mul(2)?.checked_add(y_len)?;
            Some((y_len, c_len, total))
        });

        let (y_len, c_len) = match lengths {
            Some((y_len, c_len, total)) if data.len() >= total => (y_len, c_len),
            _ => {
                return Err(FormatError::PlaneSize {
                    plane: PlaneKind::V,
                    expected: lengths.map_or(usize::MAX, |(_, _, total)| total),
                    got: data.len(),
                });
            }
        };

        let frame = Self::new(
            width,
            height,
            Plane::packed(data[..y_len].to_vec(), row_stride),
            Plane::packed(data[y_len..y_len + c_len].to_vec(), chroma_stride),
            Plane::packed(data[y_len + c_len..y_len + 2 * c_len].to_vec(), chroma_stride),
        );
        frame.validate()?;
        Ok(frame)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn chroma_width(&self) -> usize {
        self.width.div_ceil(2)
    }

    pub fn chroma_height(&self) -> usize {
        self.height.div_ceil(2)
    }

    pub fn y(&self) -> &Plane {
        &self.y
    }

    pub fn u(&self) -> &Plane {
        &self.u
    }

    pub fn v(&self) -> &Plane {
        &self.v
    }

    /// Check dimensions, strides and plane lengths against each other.
    pub fn validate(&self) -> Result<(), FormatError> {
        if self.width == 0 || self.height == 0 {
            return Err(FormatError::Dimensions {
                width: self.width,
                height: self.height,
            });
        }
        self.y.validate(PlaneKind::Y, self.height, self.width)?;
        self.u
            .validate(PlaneKind::U, self.chroma_height(), self.chroma_width())?;
        self.v
            .validate(PlaneKind::V, self.chroma_height(), self.chroma_width())?;
        Ok(())
    }
}
