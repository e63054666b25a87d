//! Capability decorators over a resolved handle: visibility waits,
//! scroll-into-view, and clicking.
//!
//! Capabilities are orthogonal to the recursive state protocol and are
//! invoked explicitly. Composition is an explicit ordered pipeline rather
//! than anything inheritance-shaped: [`ActionPipeline::standard`] fixes the
//! documented order — wait until visible, *then* scroll, *then* click.
//!
//! Against an unresolved field no native action occurs: every capability
//! returns `Ok(())` having done nothing.

use tracing::debug;

use crate::driver::Handle;
use crate::resolve::{BoundField, BoundLeaf, BoundSection};
use crate::result::PageResult;
use crate::wait::{self, WaitOptions};

/// Script executed for scroll-into-view
pub const SCROLL_INTO_VIEW_SCRIPT: &str = "return arguments[0].scrollIntoView();";

/// Script executed for script-driven clicks
pub const SCRIPT_CLICK_SCRIPT: &str = "return arguments[0].click();";

/// How a click is performed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClickMode {
    /// Native click through the driver
    #[default]
    Native,
    /// Script-driven click, for elements a native click cannot reach
    Script,
}

/// Capability surface shared by every bound single-handle field.
pub trait Interact {
    /// The resolved handle to act on, when resolution succeeded
    fn resolved_handle(&self) -> Option<&Handle>;

    /// Block until the element is visible, polling per `options`
    fn wait_until_visible(&self, options: &WaitOptions) -> PageResult<()> {
        match self.resolved_handle() {
            Some(handle) => wait::wait_displayed(handle, options),
            None => {
                debug!("wait_until_visible on unresolved field; no native action");
                Ok(())
            }
        }
    }

    /// Scroll the element into view
    fn scroll_into_view(&self) -> PageResult<()> {
        match self.resolved_handle() {
            Some(handle) => {
                handle.execute_script(SCROLL_INTO_VIEW_SCRIPT)?;
                Ok(())
            }
            None => {
                debug!("scroll_into_view on unresolved field; no native action");
                Ok(())
            }
        }
    }

    /// Click the element
    fn click(&self, mode: ClickMode) -> PageResult<()> {
        match self.resolved_handle() {
            Some(handle) => {
                match mode {
                    ClickMode::Native => handle.click()?,
                    ClickMode::Script => handle.execute_script(SCRIPT_CLICK_SCRIPT)?,
                }
                Ok(())
            }
            None => {
                debug!("click on unresolved field; no native action");
                Ok(())
            }
        }
    }
}

impl Interact for BoundSection {
    fn resolved_handle(&self) -> Option<&Handle> {
        self.handle()
    }
}

impl Interact for BoundLeaf {
    fn resolved_handle(&self) -> Option<&Handle> {
        self.handle()
    }
}

impl Interact for BoundField {
    fn resolved_handle(&self) -> Option<&Handle> {
        self.handle()
    }
}

/// One step of an [`ActionPipeline`].
#[derive(Debug, Clone)]
pub enum Step {
    /// Wait until visible with the given options
    WaitVisible(WaitOptions),
    /// Scroll into view
    ScrollIntoView,
    /// Click with the given mode
    Click(ClickMode),
}

/// An explicit, ordered pipeline of capability steps.
///
/// Steps run strictly in declared order; the first failure aborts the rest.
#[derive(Debug, Clone, Default)]
pub struct ActionPipeline {
    steps: Vec<Step>,
}

impl ActionPipeline {
    /// An empty pipeline
    #[must_use]
    pub const fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// The standard interaction order: wait until visible, scroll into
    /// view, native click.
    #[must_use]
    pub fn standard() -> Self {
        Self::new()
            .then(Step::WaitVisible(WaitOptions::default()))
            .then(Step::ScrollIntoView)
            .then(Step::Click(ClickMode::Native))
    }

    /// Append a step
    #[must_use]
    pub fn then(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// The declared steps, in execution order
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Run every step against the target, in order
    pub fn run(&self, target: &dyn Interact) -> PageResult<()> {
        for step in &self.steps {
            match step {
                Step::WaitVisible(options) => target.wait_until_visible(options)?,
                Step::ScrollIntoView => target.scroll_into_view()?,
                Step::Click(mode) => target.click(*mode)?,
            }
        }
        Ok(())
    }
}
