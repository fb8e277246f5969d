//! Uploaded-file descriptor rule: `file`
//!
//! A descriptor is an object shaped like a multipart upload record:
//!
//! ```json
//! {"name": "a.png", "type": "image/png", "tmp_name": "/tmp/up1", "error": 0, "size": 1024}
//! ```
//!
//! The temporary path must exist on disk. A non-zero `error` reports the
//! diagnostic for that upload error code instead of the generic message.

use std::path::Path;

use serde_json::{Map, Value};

use super::violation;
use crate::error::RuleError;
use crate::message::keys;
use crate::registry::{Rule, RuleContext};

/// Upload error codes with a dedicated message.
const KNOWN_UPLOAD_ERRORS: &[i64] = &[1, 2, 3, 4, 6, 7, 8];

/// Accepts uploaded-file descriptors, optionally restricted to MIME types.
///
/// The parameter is a comma-separated list of MIME types; `image/*` style
/// wildcards match a whole top-level type.
#[derive(Debug, Clone, Copy, Default)]
pub struct File;

impl Rule for File {
    fn validate(
        &self,
        field: &str,
        value: &Value,
        param: Option<&str>,
        _ctx: &RuleContext<'_>,
    ) -> Result<(), RuleError> {
        let Some(upload) = value.as_object() else {
            return Err(violation("file", keys::FILE, field).into());
        };

        let code = upload.get("error").and_then(Value::as_i64);
        if let Some(code) = code.filter(|c| *c != 0) {
            return Err(upload_error(field, code).into());
        }

        let Some(descriptor) = Descriptor::read(upload).filter(|_| code == Some(0)) else {
            return Err(violation("file", keys::FILE, field).into());
        };

        if !Path::new(descriptor.tmp_name).exists() {
            tracing::debug!(field, path = descriptor.tmp_name, "Upload temp file is missing");
            return Err(violation("file", keys::FILE, field).into());
        }

        if let Some(allowed) = param {
            if !mime_allowed(descriptor.mime, allowed) {
                return Err(violation("file", keys::FILE_MIME, field)
                    .with_arg(allowed)
                    .into());
            }
        }

        Ok(())
    }
}

/// The string fields of a structurally valid descriptor.
struct Descriptor<'a> {
    mime: &'a str,
    tmp_name: &'a str,
}

impl<'a> Descriptor<'a> {
    fn read(upload: &'a Map<String, Value>) -> Option<Self> {
        upload.get("name")?.as_str()?;
        let mime = upload.get("type")?.as_str()?;
        let tmp_name = upload.get("tmp_name")?.as_str()?;
        upload.get("size")?.as_u64()?;
        Some(Self { mime, tmp_name })
    }
}

fn upload_error(field: &str, code: i64) -> crate::error::Violation {
    if KNOWN_UPLOAD_ERRORS.contains(&code) {
        violation("file", format!("{}.{code}", keys::FILE_UPLOAD_ERROR), field)
    } else {
        violation("file", format!("{}.unknown", keys::FILE_UPLOAD_ERROR), field)
            .with_arg(code.to_string())
    }
}

fn mime_allowed(mime: &str, allowed: &str) -> bool {
    allowed
        .split(',')
        .map(str::trim)
        .filter(|candidate| !candidate.is_empty())
        .any(|candidate| match candidate.strip_suffix("/*") {
            Some(top) => mime
                .split_once('/')
                .is_some_and(|(kind, _)| kind.eq_ignore_ascii_case(top)),
            None => candidate.eq_ignore_ascii_case(mime),
        })
}
