//! UI rendering
//!
//! Rendering functions that convert App state into terminal output using
//! ratatui widgets. All functions are pure (no I/O): geometry comes from a
//! [`ResolvedLayout`] computed by the driver, state from the [`App`].

mod input;
mod layout;
mod output;
pub mod wrap;

pub use layout::{Layout, LayoutError, Region, RegionSpec, ResolvedLayout};
use linewire_app::App;
use ratatui::Frame;

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &App, layout: &ResolvedLayout) {
    output::render(frame, app, layout.rect(Region::OutFrame), layout.rect(Region::Output));
    input::render(frame, app, layout.rect(Region::InFrame), layout.rect(Region::Input));
}
