// Security module for validating local files before they are uploaded
//
// Upload tools read arbitrary caller-supplied paths from disk; this module
// confines them to an optional root directory.

pub mod path_validator;

pub use path_validator::{validate_upload_path, PathSecurityError};
