//! Browser helpers shared by the page effects.

#[cfg(feature = "csr")]
pub mod frame_loop;
