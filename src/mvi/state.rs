//! Base trait for state trees.

/// Marker trait for state values.
///
/// States should be:
/// - Immutable (Clone to create new states)
/// - Self-contained (all data needed to render)
/// - Comparable (PartialEq for change detection)
/// - Printable (Debug, so wrapping actions can carry them)
pub trait UiState: Clone + PartialEq + std::fmt::Debug + Send + 'static {}

impl<T: UiState> UiState for Option<T> {}
impl<T: UiState> UiState for Vec<T> {}
impl UiState for () {}
impl UiState for bool {}
impl UiState for i64 {}
impl UiState for u32 {}
impl UiState for usize {}
impl UiState for String {}
