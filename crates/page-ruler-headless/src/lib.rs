#![warn(missing_docs)]
//! `page-ruler-headless` - an in-memory page host for `page-ruler`.
//!
//! [`HeadlessPage`] simulates the pieces of a browser page the rulers read and write: a scroll
//! container below the horizontal ruler, a centered fixed-width document container, a content
//! box whose inline `style` carries the margin padding, and a caret rectangle. It implements
//! [`page_ruler::PageSurface`], so kernels can be exercised end to end without a DOM.
//!
//! The page also plays the part of the observers: resizing, scrolling and style writes queue
//! [`page_ruler::GeometryTrigger`]s that a host loop drains with [`HeadlessPage::take_triggers`].

pub mod layout;
pub mod page;

pub use layout::PageLayout;
pub use page::{HeadlessPage, MAX_RECORDED_MUTATIONS, StyleMutation};
