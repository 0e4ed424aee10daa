//! Runtime binding to the MediaInfo shared library

use std::ffi::{c_char, c_int, c_void, CStr, CString};
use std::path::{Path, PathBuf};
use std::ptr::NonNull;

use libloading::Library;
use tracing::{debug, trace};

use crate::domain::model::StreamKind;
use crate::error::{InspectError, InspectResult};

type NewFn = unsafe extern "C" fn() -> *mut c_void;
type DeleteFn = unsafe extern "C" fn(*mut c_void);
type OpenFn = unsafe extern "C" fn(*mut c_void, *const c_char) -> usize;
type CloseFn = unsafe extern "C" fn(*mut c_void);
type GetFn =
    unsafe extern "C" fn(*mut c_void, c_int, usize, *const c_char, c_int, c_int) -> *const c_char;
type CountGetFn = unsafe extern "C" fn(*mut c_void, c_int, usize) -> usize;
type OptionFn = unsafe extern "C" fn(*mut c_void, *const c_char, *const c_char) -> *const c_char;

/// Aspect of a field requested from the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum InfoKind {
    Text = 1,
    Measure = 2,
    NameText = 4,
    Info = 6,
}

/// Search field names by parameter name
const SEARCH_NAME: c_int = 0;

/// Stream number asking `Count_Get` for the number of streams of a kind
const COUNT_STREAMS: usize = usize::MAX;

/// `Open` result for a successfully opened resource
const OPEN_OK: usize = 1;

/// Library names tried when no explicit path is configured
pub fn default_candidates() -> &'static [&'static str] {
    if cfg!(target_os = "windows") {
        &["MediaInfo.dll"]
    } else if cfg!(target_os = "macos") {
        &["libmediainfo.0.dylib", "libmediainfo.dylib"]
    } else {
        &["libmediainfo.so.0", "libmediainfo.so"]
    }
}

fn engine_index(kind: StreamKind) -> c_int {
    match kind {
        StreamKind::General => 0,
        StreamKind::Video => 1,
        StreamKind::Audio => 2,
        StreamKind::Text => 3,
        StreamKind::Other => 4,
        StreamKind::Image => 5,
        StreamKind::Menu => 6,
    }
}

/// A loaded MediaInfo library and its resolved entry points
pub struct MediaInfoLibrary {
    location: PathBuf,
    new: NewFn,
    delete: DeleteFn,
    open: OpenFn,
    close: CloseFn,
    get: GetFn,
    count_get: CountGetFn,
    option: OptionFn,
    // Keeps the entry points above valid; must outlive every handle.
    _library: Library,
}

impl std::fmt::Debug for MediaInfoLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaInfoLibrary")
            .field("location", &self.location)
            .finish()
    }
}

impl MediaInfoLibrary {
    /// Load the library from `path`, or from the platform's default names
    pub fn load(path: Option<&Path>) -> InspectResult<Self> {
        let candidates: Vec<PathBuf> = match path {
            Some(path) => vec![path.to_path_buf()],
            None => default_candidates().iter().map(PathBuf::from).collect(),
        };

        let mut failures = Vec::new();
        for candidate in candidates {
            // SAFETY: loading MediaInfo runs only its own initializers.
            match unsafe { Library::new(&candidate) } {
                Ok(library) => return Self::bind(library, candidate),
                Err(e) => {
                    trace!("Could not load {}: {}", candidate.display(), e);
                    failures.push(format!("{}: {}", candidate.display(), e));
                }
            }
        }

        Err(InspectError::EngineUnavailable {
            message: format!("MediaInfo library not loaded ({})", failures.join("; ")),
        })
    }

    fn bind(library: Library, location: PathBuf) -> InspectResult<Self> {
        let unavailable = |e: libloading::Error| InspectError::EngineUnavailable {
            message: format!("{} is missing an entry point: {}", location.display(), e),
        };

        // SAFETY: the signatures match MediaInfoDLL.h for the narrow-char API,
        // and the pointers are stored next to the library that owns them.
        let (new, delete, open, close, get, count_get, option) = unsafe {
            let new = *library.get::<NewFn>(b"MediaInfoA_New\0").map_err(unavailable)?;
            let delete = *library.get::<DeleteFn>(b"MediaInfoA_Delete\0").map_err(unavailable)?;
            let open = *library.get::<OpenFn>(b"MediaInfoA_Open\0").map_err(unavailable)?;
            let close = *library.get::<CloseFn>(b"MediaInfoA_Close\0").map_err(unavailable)?;
            let get = *library.get::<GetFn>(b"MediaInfoA_Get\0").map_err(unavailable)?;
            let count_get = *library
                .get::<CountGetFn>(b"MediaInfoA_Count_Get\0")
                .map_err(unavailable)?;
            let option = *library.get::<OptionFn>(b"MediaInfoA_Option\0").map_err(unavailable)?;
            (new, delete, open, close, get, count_get, option)
        };

        let bound = Self {
            location: location.clone(),
            new,
            delete,
            open,
            close,
            get,
            count_get,
            option,
            _library: library,
        };

        debug!("Loaded MediaInfo library from {}", location.display());
        Ok(bound)
    }

    /// Where the library was loaded from
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Create a fresh engine handle configured for UTF-8 text
    pub fn handle(&self) -> InspectResult<EngineHandle<'_>> {
        // SAFETY: `new` takes no arguments and returns an owned handle or null.
        let raw = NonNull::new(unsafe { (self.new)() }).ok_or_else(|| {
            InspectError::EngineUnavailable {
                message: "MediaInfo refused to create a handle".to_string(),
            }
        })?;

        let handle = EngineHandle {
            library: self,
            raw,
            opened: false,
        };
        handle.option("CharSet", "UTF-8");
        Ok(handle)
    }

    /// Engine version string, e.g. `MediaInfoLib - v23.04`
    pub fn version(&self) -> InspectResult<String> {
        Ok(self.handle()?.option("Info_Version", ""))
    }
}

/// One engine handle. Closed and deleted when dropped.
pub struct EngineHandle<'lib> {
    library: &'lib MediaInfoLibrary,
    raw: NonNull<c_void>,
    opened: bool,
}

// SAFETY: a MediaInfo handle has no thread affinity; it only must not be used
// from two threads at once, which `&mut`/ownership rules already prevent
// because `EngineHandle` is not `Sync`.
unsafe impl Send for EngineHandle<'_> {}

impl<'lib> EngineHandle<'lib> {
    /// Open a resource on this handle
    pub fn open(&mut self, locator: &str, argument: &str) -> InspectResult<()> {
        let name = CString::new(argument).map_err(|_| InspectError::OpenFailed {
            locator: locator.to_string(),
            message: "locator contains a NUL byte".to_string(),
        })?;

        // SAFETY: the handle is live and `name` outlives the call.
        let status = unsafe { (self.library.open)(self.raw.as_ptr(), name.as_ptr()) };
        if status != OPEN_OK {
            return Err(InspectError::OpenFailed {
                locator: locator.to_string(),
                message: format!("engine could not open the resource (status {})", status),
            });
        }

        self.opened = true;
        Ok(())
    }

    /// Number of tracks of `kind` in the opened resource
    pub fn count(&self, kind: StreamKind) -> usize {
        // SAFETY: the handle is live; Count_Get only reads engine state.
        unsafe { (self.library.count_get)(self.raw.as_ptr(), engine_index(kind), COUNT_STREAMS) }
    }

    /// One aspect of a field; empty when the engine has nothing for it
    pub fn get(&self, kind: StreamKind, index: usize, field: &str, info: InfoKind) -> String {
        let Ok(parameter) = CString::new(field) else {
            return String::new();
        };

        // SAFETY: the handle is live; the returned buffer is owned by the engine
        // and stays valid until the next call on this handle, so it is copied
        // out immediately.
        unsafe {
            let value = (self.library.get)(
                self.raw.as_ptr(),
                engine_index(kind),
                index,
                parameter.as_ptr(),
                info as c_int,
                SEARCH_NAME,
            );
            copy_string(value)
        }
    }

    fn option(&self, name: &str, value: &str) -> String {
        let (Ok(name), Ok(value)) = (CString::new(name), CString::new(value)) else {
            return String::new();
        };

        // SAFETY: same buffer rules as `get`.
        unsafe { copy_string((self.library.option)(self.raw.as_ptr(), name.as_ptr(), value.as_ptr())) }
    }
}

impl Drop for EngineHandle<'_> {
    fn drop(&mut self) {
        // SAFETY: the handle is live and never used after this point.
        unsafe {
            if self.opened {
                (self.library.close)(self.raw.as_ptr());
            }
            (self.library.delete)(self.raw.as_ptr());
        }
        trace!("Released MediaInfo handle");
    }
}

/// Copy a NUL-terminated engine string; null yields an empty string.
///
/// # Safety
///
/// `value` must be null or point to a valid NUL-terminated string.
unsafe fn copy_string(value: *const c_char) -> String {
    if value.is_null() {
        String::new()
    } else {
        CStr::from_ptr(value).to_string_lossy().into_owned()
    }
}
