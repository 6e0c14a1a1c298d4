use std::fmt;

/// Which plane of a planar frame an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneKind {
    Y,
    U,
    V,
}

impl fmt::Display for PlaneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaneKind::Y => write!(f, "Y"),
            PlaneKind::U => write!(f, "U"),
            PlaneKind::V => write!(f, "V"),
        }
    }
}

/// Malformed or inconsistent frame data.
#[derive(Debug, PartialEq)]
pub enum FormatError {
    Dimensions { width: usize, height: usize },
    Stride { plane: PlaneKind, row_stride: usize, pixel_stride: usize },
    PlaneSize { plane: PlaneKind, expected: usize, got: usize },
    Codec(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::Dimensions { width, height } => {
                write!(f, "invalid frame dimensions: {width}x{height}")
            }
            FormatError::Stride {
                plane,
                row_stride,
                pixel_stride,
            } => write!(
                f,
                "invalid {plane} plane stride: row_stride={row_stride}, pixel_stride={pixel_stride}"
            ),
            FormatError::PlaneSize {
                plane,
                expected,
                got,
            } => write!(f, "{plane} plane too small: need {expected} bytes, got {got}"),
            FormatError::Codec(msg) => write!(f, "codec error: {msg}"),
        }
    }
}

impl std::error::Error for FormatError {}

impl From<digit_image::ImageError> for FormatError {
    fn from(err: digit_image::ImageError) -> Self {
        FormatError::Codec(err.to_string())
    }
}

#[derive(Debug)]
pub enum CameraError {
    Device(String),
    Stream(String),
    Channel(String),
    /// The capture pipeline could not be started.
    Binding(String),
    Format(FormatError),
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::Device(msg) => write!(f, "device error: {msg}"),
            CameraError::Stream(msg) => write!(f, "stream error: {msg}"),
            CameraError::Channel(msg) => write!(f, "channel error: {msg}"),
            CameraError::Binding(msg) => write!(f, "use case binding failed: {msg}"),
            CameraError::Format(err) => write!(f, "format error: {err}"),
        }
    }
}

impl std::error::Error for CameraError {}

impl From<std::io::Error> for CameraError {
    fn from(err: std::io::Error) -> Self {
        CameraError::Device(err.to_string())
    }
}

impl From<FormatError> for CameraError {
    fn from(err: FormatError) -> Self {
        CameraError::Format(err)
    }
}
