use std::fs::File;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied(String),
}

impl Permission {
    pub fn is_granted(&self) -> bool {
        matches!(self, Permission::Granted)
    }
}

/// Decides whether the camera may be used before capture starts.
pub trait PermissionGate {
    fn request(&self) -> Permission;
}

/// Grants access unconditionally (synthetic cameras).
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysGranted;

impl PermissionGate for AlwaysGranted {
    fn request(&self) -> Permission {
        Permission::Granted
    }
}

/// Grants access when the camera device node can be opened for reading.
#[derive(Debug, Clone)]
pub struct DeviceAccessGate {
    path: PathBuf,
}

impl DeviceAccessGate {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PermissionGate for DeviceAccessGate {
    fn request(&self) -> Permission {
        match File::open(&self.path) {
            Ok(_) => Permission::Granted,
            Err(e) => Permission::Denied(format!("{}: {}", self.path.display(), e)),
        }
    }
}
