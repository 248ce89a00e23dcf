//! Record-line parsing helpers used by [`crate::product::Product`].
pub(crate) mod position;
pub(crate) mod velocity;
