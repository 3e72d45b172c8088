use std::panic::Location;

use serde::Serialize;

/// Source location an instrumented call originated from.
///
/// Call sites supply their own location through the [`callsite!`] macro;
/// `#[track_caller]` entry points fall back to [`Callsite::caller`], which
/// knows the file and line but not the function name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Callsite {
    file: String,
    line: u32,
    function: String,
}

impl Callsite {
    pub fn new(file: impl Into<String>, line: u32, function: impl Into<String>) -> Self {
        Self {
            file: relative_to_cwd(file.into()),
            line,
            function: function.into(),
        }
    }

    /// Best-effort automatic capture from the caller's panic location. The
    /// function name is not recoverable this way and stays `"unknown"`.
    #[track_caller]
    pub fn caller() -> Self {
        let location = Location::caller();
        Self::new(location.file(), location.line(), "unknown")
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn function(&self) -> &str {
        &self.function
    }

    /// Deterministic 8-character digest of `file:line:function`, used to group
    /// identical call sites across runs.
    pub fn hash(&self) -> String {
        let digest = md5::compute(format!("{}:{}:{}", self.file, self.line, self.function));
        format!("{digest:x}")[..8].to_string()
    }

    pub(crate) fn into_attributes(self) -> CallsiteAttributes {
        let callsite_hash = self.hash();

        CallsiteAttributes {
            file: self.file,
            line_number: self.line,
            function_name: self.function,
            callsite_hash,
        }
    }
}

/// Callsite fields as they appear flattened into the event payload.
#[derive(Debug, Clone, Serialize)]
pub struct CallsiteAttributes {
    pub file: String,
    pub line_number: u32,
    pub function_name: String,
    pub callsite_hash: String,
}

/// Paths are reported relative to the working directory when they resolve
/// under it, absolute otherwise. `file!()` already yields workspace-relative
/// paths, which pass through untouched.
fn relative_to_cwd(file: String) -> String {
    let path = std::path::Path::new(&file);

    if !path.is_absolute() {
        return file;
    }

    match std::env::current_dir() {
        Ok(cwd) => path
            .strip_prefix(&cwd)
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or(file),
        Err(_) => file,
    }
}

/// Extracts the enclosing function name from a `type_name` of a local item.
///
/// `type_name_of(f)` inside `my_crate::billing::charge` yields
/// `my_crate::billing::charge::f`; this strips the probe item and any closure
/// segments and returns the last path segment.
pub fn function_name_from_type_path(type_path: &str) -> &str {
    let mut path = type_path.strip_suffix("::f").unwrap_or(type_path);

    while let Some(stripped) = path.strip_suffix("::{{closure}}") {
        path = stripped;
    }

    path.rsplit("::").next().unwrap_or(path)
}

/// Captures the current source location, including the enclosing function
/// name.
#[macro_export]
macro_rules! callsite {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            std::any::type_name::<T>()
        }
        $crate::Callsite::new(
            file!(),
            line!(),
            $crate::function_name_from_type_path(type_name_of(f)),
        )
    }};
}
