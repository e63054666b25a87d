//! The session/driver boundary.
//!
//! Pagina never talks a browser protocol itself. Everything native goes
//! through two traits: [`Session`], the process-wide entry point for
//! lookups, and [`Element`], a resolved handle that can perform scoped
//! lookups beneath itself plus the handful of native actions the capability
//! layer needs. Swapping driver implementations (WebDriver, CDP, an
//! in-memory mock) is a matter of implementing these traits — see
//! [`crate::mock`] for the shipped test double.
//!
//! All operations are synchronous and blocking; a handle and the session it
//! came from belong to one thread at a time.

use std::sync::Arc;

use crate::locator::Locator;
use crate::result::DriverResult;

/// A native reference to a found UI element.
///
/// Handles are cheap to clone and share within a thread; cloning never
/// re-queries the browser.
pub type Handle = Arc<dyn Element>;

/// A live browser session capable of top-level lookups.
pub trait Session: std::fmt::Debug {
    /// Find exactly one element matching `locator` in the whole document
    fn find_single(&self, locator: &Locator) -> DriverResult<Handle>;

    /// Find all elements matching `locator`, in document order
    fn find_many(&self, locator: &Locator) -> DriverResult<Vec<Handle>>;
}

/// A resolved element handle.
///
/// The first two methods mirror [`Session`] so a handle can serve as the
/// scope for its own descendants. The rest are the native operations
/// consumed by leaves and capability decorators.
pub trait Element: std::fmt::Debug {
    /// Find exactly one element matching `locator` beneath this element
    fn find_single(&self, locator: &Locator) -> DriverResult<Handle>;

    /// Find all elements matching `locator` beneath this element
    fn find_many(&self, locator: &Locator) -> DriverResult<Vec<Handle>>;

    /// Whether the element is currently rendered and visible
    fn is_displayed(&self) -> DriverResult<bool>;

    /// Native click
    fn click(&self) -> DriverResult<()>;

    /// Clear any current input value
    fn clear(&self) -> DriverResult<()>;

    /// Type text into the element
    fn send_keys(&self, text: &str) -> DriverResult<()>;

    /// Read an attribute, `None` when the attribute is absent
    fn attribute(&self, name: &str) -> DriverResult<Option<String>>;

    /// Visible text content
    fn text(&self) -> DriverResult<String>;

    /// Whether a checkbox/radio/option is currently selected
    fn is_selected(&self) -> DriverResult<bool>;

    /// Execute a script with this element bound as `arguments[0]`
    fn execute_script(&self, script: &str) -> DriverResult<()>;
}
