//! Base trait for actions.

/// Marker trait for action values.
///
/// Actions represent:
/// - User events (button presses, text input)
/// - System events (responses, timer fires, animation callbacks)
/// - Child feature events wrapped by their parent
///
/// Actions are cloned once per dispatch for history and action listeners.
pub trait Action: Clone + std::fmt::Debug + Send + 'static {}

impl Action for () {}
impl Action for bool {}
impl Action for i64 {}
impl Action for u32 {}
impl Action for usize {}
impl Action for String {}
