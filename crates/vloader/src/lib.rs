//! Layout and animation core of a vertical bouncing-gap loading indicator.
//!
//! A column of circles with a gap that travels up and down it. Nothing in
//! here draws or keeps time; hosts implement [`host::Container`], drive a
//! [`transition::Timeline`] from their frame clock and feed completions back
//! into [`widget::VerticalLoader`].

pub mod animator;
pub mod circles;
pub mod command;
pub mod config;
pub mod error;
pub mod geometry;
pub mod host;
pub mod layout;
pub mod transition;
pub mod widget;

pub use error::LoaderError;
pub use widget::VerticalLoader;
