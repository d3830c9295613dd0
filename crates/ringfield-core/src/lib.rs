//! Decorative particle simulations for a portfolio site background.
//!
//! [`field::Field`] is the 3D ring of points that springs back to its layout
//! while being pushed away from the pointer. [`blob::Blob`] is the 2D liquid
//! outline that stretches toward a fast-moving pointer. Both are advanced one
//! fixed step per animation frame; [`frame_loop::FrameLoop`] drives a field
//! through any [`frame::FrameScheduler`].

pub mod blob;
pub mod camera;
pub mod config;
pub mod error;
pub mod field;
pub mod forces;
pub mod frame;
pub mod frame_loop;
pub mod layout;
pub mod palette;
pub mod particle;

pub use error::{FieldError, Result};
