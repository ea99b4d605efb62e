//! Macro utilities for building pipes

/// Builds a lazy [`Pipe`](crate::Pipe) from a value and a chain of `to` steps.
///
/// Nothing runs until `exec` is called on the result.
///
/// ```rust
/// use pipe_sugars::pipe;
///
/// let mut doubled = pipe!(5 => |x| x * 2 => |x| x + 3);
/// assert_eq!(doubled.queued(), 2);
/// assert_eq!(doubled.exec_ready().ok(), Some(13));
/// ```
#[macro_export]
macro_rules! pipe {
    ($value:expr $(=> $step:expr)* $(,)?) => {{
        #[allow(unused_mut)]
        let mut pipe = $crate::Pipe::new($value);
        $( pipe.to($step); )*
        pipe
    }};
}
