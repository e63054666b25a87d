#![warn(missing_docs)]

//! Declarative page objects for UI test automation.
//!
//! A page is described once as a tree of [`SectionDef`]s: containers with a
//! default locator, scalar leaf fields ([`LeafKind`]), nested sections, and
//! multi-handle collections. A [`Resolver`] binds that description to a live
//! [`Session`] and hands out per-access bound fields, each freshly resolved
//! against either its owner's cached handle or the session scope (see
//! [`ScopePolicy`]).
//!
//! On top of resolution sit two protocols:
//!
//! - **state**: [`BoundSection::get_state`] reads the section tree into a
//!   JSON mapping and [`BoundSection::fill`] writes one back, recursing
//!   through nested sections unless `stop_propagation` caps the recursion;
//! - **actions**: [`Interact`] capabilities (visibility waits, scrolling,
//!   clicking) composed through an explicit [`ActionPipeline`].
//!
//! Page descriptions can also be loaded from untyped YAML or JSON documents
//! via [`SectionDef::from_yaml`] and [`SectionDef::from_json`].
//!
//! ```
//! use pagina::mock::MockPage;
//! use pagina::{FieldDecl, Locator, Resolver, SectionDef};
//! use serde_json::{json, Value};
//!
//! # fn main() -> pagina::PageResult<()> {
//! let login = SectionDef::builder("LoginForm")
//!     .locator(Locator::css("form#login"))
//!     .field("username", FieldDecl::input(Locator::css("input[name=username]")))
//!     .field("remember_me", FieldDecl::checkbox(Locator::css("input[name=remember]")))
//!     .build()?;
//! let page = SectionDef::builder("LoginPage")
//!     .field("login", FieldDecl::section(&login))
//!     .build()?;
//!
//! let driver = MockPage::new();
//! let form = driver.node("form");
//! form.mount_single(Locator::css("input[name=username]"), &driver.node("username"));
//! form.mount_single(Locator::css("input[name=remember]"), &driver.node("remember"));
//! driver.mount_single(Locator::css("form#login"), &form);
//!
//! let mut resolver = Resolver::new(&driver);
//! let login = resolver
//!     .page(&page)
//!     .field(&mut resolver, "login")?
//!     .into_section()
//!     .unwrap();
//!
//! login.fill(&mut resolver, &json!({"username": "ada", "remember_me": true}))?;
//!
//! let state = login.get_state(&mut resolver)?;
//! assert_eq!(
//!     Value::Object(state),
//!     json!({"username": "ada", "remember_me": true}),
//! );
//! # Ok(())
//! # }
//! ```

mod actions;
mod driver;
mod fields;
mod locator;
pub mod mock;
mod resolve;
mod result;
mod schema;
mod state;
mod wait;

pub use actions::{
    ActionPipeline, ClickMode, Interact, Step, SCRIPT_CLICK_SCRIPT, SCROLL_INTO_VIEW_SCRIPT,
};
pub use driver::{Element, Handle, Session};
pub use fields::{
    FieldDecl, FieldDef, FieldKind, LeafKind, ScopePolicy, SectionBuilder, SectionDef,
    RESERVED_MULTI, RESERVED_SINGLE,
};
pub use locator::{Locator, Strategy};
pub use resolve::{BoundCollection, BoundField, BoundLeaf, BoundSection, Resolver};
pub use result::{
    DriverError, DriverResult, PageError, PageResult, ResolutionWarning,
};
pub use wait::{WaitOptions, DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS};
