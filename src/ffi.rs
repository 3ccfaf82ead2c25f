//! C ABI for driving a [`GridSimulator`] from foreign hosts.
//!
//! The symbol names and argument order match the shared library that the
//! Python ctypes wrapper loads, so an existing host can swap this crate in
//! without changes.
//!
//! # Safety
//!
//! Every `extern "C"` function wraps its body in `std::panic::catch_unwind`
//! so Rust panics never cross the boundary. Null pointers are detected early
//! and reported as [`GridStatus::NullPointer`]. Handles must come from one of
//! the `create_grid*` constructors and must not be used after `delete_grid`.
//!
//! # Snapshot ownership
//!
//! `get_grid_state` returns a heap-allocated [`JsonString`]. The caller owns
//! it until it is passed back to `free_state`.

use std::ffi::{CStr, CString, c_char};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::ptr;

use tracing::warn;

use crate::devices::{Consumer, ConsumerKind, Producer, ProducerKind};
use crate::error::GridError;
use crate::sim::grid::{DEFAULT_SEED, DEFAULT_TIME_STEP_S, GridSimulator};

// ---------------------------------------------------------------------------
// Result codes
// ---------------------------------------------------------------------------

/// Status codes returned by every non-constructor FFI function.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridStatus {
    /// Success.
    Ok = 0,
    /// A required pointer argument was null.
    NullPointer = 1,
    /// No device with the given identifier.
    InvalidIdentifier = 2,
    /// A device with the given identifier already exists.
    DuplicateIdentifier = 3,
    /// Non-positive or non-finite battery or device parameter.
    InvalidConfiguration = 4,
    /// Negative energy or time passed to the battery.
    NegativeEnergyInput = 5,
    /// Category string outside the known set.
    UnknownCategory = 6,
    /// Category string was not valid UTF-8.
    InvalidString = 7,
    /// Snapshot serialization failed.
    SerializeError = 8,
    /// An internal panic was caught at the FFI boundary.
    InternalError = 9,
}

impl From<GridError> for GridStatus {
    fn from(err: GridError) -> Self {
        match err {
            GridError::InvalidIdentifier { .. } => Self::InvalidIdentifier,
            GridError::DuplicateIdentifier { .. } => Self::DuplicateIdentifier,
            GridError::InvalidConfiguration { .. } => Self::InvalidConfiguration,
            GridError::NegativeEnergyInput { .. } => Self::NegativeEnergyInput,
            GridError::UnknownCategory { .. } => Self::UnknownCategory,
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot buffer
// ---------------------------------------------------------------------------

/// A NUL-terminated JSON snapshot allocated by this library.
#[repr(C)]
#[derive(Debug)]
pub struct JsonString {
    /// UTF-8 JSON text. Owned by the library until `free_state`.
    pub data: *mut c_char,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Runs `f` against the simulator behind `grid`, translating failures and
/// panics into status codes.
///
/// # Safety
///
/// `grid` must be null or a live handle returned by a `create_grid*` call.
unsafe fn with_grid<F>(grid: *mut GridSimulator, op: &'static str, f: F) -> GridStatus
where
    F: FnOnce(&mut GridSimulator) -> Result<(), GridStatus>,
{
    if grid.is_null() {
        warn!(op, "null grid handle");
        return GridStatus::NullPointer;
    }
    let status = match catch_unwind(AssertUnwindSafe(|| {
        // SAFETY: caller guarantees `grid` came from create_grid and is live.
        let grid = unsafe { &mut *grid };
        f(grid)
    })) {
        Ok(Ok(())) => return GridStatus::Ok,
        Ok(Err(status)) => status,
        Err(_) => GridStatus::InternalError,
    };
    warn!(op, ?status, "grid call failed");
    status
}

/// Borrows a C string as UTF-8.
///
/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated string that outlives the
/// returned slice.
unsafe fn read_str<'a>(ptr: *const c_char) -> Result<&'a str, GridStatus> {
    if ptr.is_null() {
        return Err(GridStatus::NullPointer);
    }
    // SAFETY: non-null and NUL-terminated per the caller's contract.
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map_err(|_| GridStatus::InvalidString)
}

fn into_handle(result: Result<GridSimulator, GridError>) -> *mut GridSimulator {
    match result {
        Ok(grid) => Box::into_raw(Box::new(grid)),
        Err(e) => {
            warn!(error = %e, "create_grid rejected configuration");
            ptr::null_mut()
        }
    }
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// Creates a simulator with a one-hour tick and the default seed.
///
/// Returns null if capacity or rate is non-positive.
#[unsafe(no_mangle)]
pub extern "C" fn create_grid(battery_capacity: f64, charge_rate: f64) -> *mut GridSimulator {
    create_grid_seeded(
        battery_capacity,
        charge_rate,
        DEFAULT_TIME_STEP_S,
        DEFAULT_SEED,
    )
}

/// Creates a simulator with an explicit tick length in seconds.
#[unsafe(no_mangle)]
pub extern "C" fn create_grid_with_step(
    battery_capacity: f64,
    charge_rate: f64,
    time_step: f64,
) -> *mut GridSimulator {
    create_grid_seeded(battery_capacity, charge_rate, time_step, DEFAULT_SEED)
}

/// Creates a simulator with an explicit tick length and random seed.
#[unsafe(no_mangle)]
pub extern "C" fn create_grid_seeded(
    battery_capacity: f64,
    charge_rate: f64,
    time_step: f64,
    seed: u64,
) -> *mut GridSimulator {
    let build = || GridSimulator::new(battery_capacity, charge_rate, time_step, seed);
    catch_unwind(build).map_or(ptr::null_mut(), into_handle)
}

/// Destroys a simulator.
///
/// # Safety
///
/// `grid` must have been returned by a `create_grid*` call and must not be
/// used afterwards.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn delete_grid(grid: *mut GridSimulator) -> GridStatus {
    if grid.is_null() {
        return GridStatus::NullPointer;
    }
    match catch_unwind(AssertUnwindSafe(|| {
        // SAFETY: caller guarantees `grid` was returned by create_grid.
        drop(unsafe { Box::from_raw(grid) });
    })) {
        Ok(()) => GridStatus::Ok,
        Err(_) => GridStatus::InternalError,
    }
}

// ---------------------------------------------------------------------------
// Devices
// ---------------------------------------------------------------------------

/// Adds a producer of the named category (`"solar"`, `"wind"`, `"grid"`).
///
/// # Safety
///
/// `grid` must be a live handle and `kind` a NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn add_producer(
    grid: *mut GridSimulator,
    id: i32,
    kind: *const c_char,
    capacity: f64,
) -> GridStatus {
    unsafe {
        with_grid(grid, "add_producer", |g| {
            let kind: ProducerKind = read_str(kind)?.parse()?;
            g.add_producer(Producer::new(id, kind, capacity)?)?;
            Ok(())
        })
    }
}

/// Removes the producer with identifier `id`.
///
/// # Safety
///
/// `grid` must be a live handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn remove_producer(grid: *mut GridSimulator, id: i32) -> GridStatus {
    unsafe {
        with_grid(grid, "remove_producer", |g| {
            g.remove_producer(id)?;
            Ok(())
        })
    }
}

/// Adds a consumer of the named category (`"household"`, `"industry"`).
///
/// # Safety
///
/// `grid` must be a live handle and `kind` a NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn add_consumer(
    grid: *mut GridSimulator,
    id: i32,
    kind: *const c_char,
    base_demand: f64,
) -> GridStatus {
    unsafe {
        with_grid(grid, "add_consumer", |g| {
            let kind: ConsumerKind = read_str(kind)?.parse()?;
            g.add_consumer(Consumer::new(id, kind, base_demand)?)?;
            Ok(())
        })
    }
}

/// Removes the consumer with identifier `id`.
///
/// # Safety
///
/// `grid` must be a live handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn remove_consumer(grid: *mut GridSimulator, id: i32) -> GridStatus {
    unsafe {
        with_grid(grid, "remove_consumer", |g| {
            g.remove_consumer(id)?;
            Ok(())
        })
    }
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// Advances one tick. Read the outcome with `get_grid_state`.
///
/// # Safety
///
/// `grid` must be a live handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn update_grid(grid: *mut GridSimulator) -> GridStatus {
    unsafe {
        with_grid(grid, "update_grid", |g| {
            g.update();
            Ok(())
        })
    }
}

/// Replaces battery capacity and rate; stored energy restarts half full.
///
/// # Safety
///
/// `grid` must be a live handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn update_battery(
    grid: *mut GridSimulator,
    capacity: f64,
    charge_rate: f64,
) -> GridStatus {
    unsafe {
        with_grid(grid, "update_battery", |g| {
            g.reconfigure_battery(capacity, charge_rate)?;
            Ok(())
        })
    }
}

/// Clears devices and returns the simulator to its starting state.
///
/// # Safety
///
/// `grid` must be a live handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn reset(grid: *mut GridSimulator) -> GridStatus {
    unsafe {
        with_grid(grid, "reset", |g| {
            g.reset();
            Ok(())
        })
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Serializes the current state to JSON.
///
/// Returns null on a null handle or serialization failure. The result must
/// be released with `free_state`.
///
/// # Safety
///
/// `grid` must be null or a live handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn get_grid_state(grid: *mut GridSimulator) -> *mut JsonString {
    let mut out = ptr::null_mut();
    let status = unsafe {
        with_grid(grid, "get_grid_state", |g| {
            let state = g.state();
            let json = state.to_json().map_err(|_| GridStatus::SerializeError)?;
            let data = CString::new(json).map_err(|_| GridStatus::SerializeError)?;
            out = Box::into_raw(Box::new(JsonString {
                data: data.into_raw(),
            }));
            Ok(())
        })
    };
    if status == GridStatus::Ok {
        out
    } else {
        ptr::null_mut()
    }
}

/// Releases a snapshot returned by `get_grid_state`.
///
/// # Safety
///
/// `state` must have come from `get_grid_state` and must not be freed twice.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn free_state(state: *mut JsonString) -> GridStatus {
    if state.is_null() {
        return GridStatus::NullPointer;
    }
    match catch_unwind(AssertUnwindSafe(|| {
        // SAFETY: both allocations were produced by get_grid_state.
        let state = unsafe { Box::from_raw(state) };
        if !state.data.is_null() {
            drop(unsafe { CString::from_raw(state.data) });
        }
    })) {
        Ok(()) => GridStatus::Ok,
        Err(_) => GridStatus::InternalError,
    }
}
