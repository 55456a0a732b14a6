//! Macros for building spans with a convenient syntax, plus the crate's
//! internal contract-assertion macro.

/// Contract assertion used by the `_unchecked` fast paths.
///
/// Active in debug builds and whenever the `strict-checks` feature is
/// enabled; compiled out otherwise.
macro_rules! nd_assert {
    ($cond:expr $(, $($arg:tt)+)?) => {
        if cfg!(any(debug_assertions, feature = "strict-checks")) {
            assert!($cond $(, $($arg)+)?);
        }
    };
}

/// Creates a [`Span`](crate::view::Span) with the same arity rules as the
/// classic `span()` helper.
///
/// # Examples
/// ```
/// use ndview::{span, view::Span};
///
/// assert_eq!(span!(), Span::all());
/// assert_eq!(span!(3), Span::simple(0, 3));
/// assert_eq!(span!(1, -1), Span::simple(1, -1));
/// assert_eq!(span!(-1, -1, -1), Span::regular(-1, -1, -1));
/// assert_eq!(span!([0, 2, -1]), Span::irregular(vec![0, 2, -1]));
/// ```
#[macro_export]
macro_rules! span {
    () => {
        $crate::view::Span::all()
    };
    ([$($index:expr),* $(,)?]) => {
        $crate::view::Span::irregular(vec![$(($index) as isize),*])
    };
    ($last:expr) => {
        $crate::view::Span::to(($last) as isize)
    };
    ($first:expr, $last:expr) => {
        $crate::view::Span::simple(($first) as isize, ($last) as isize)
    };
    ($first:expr, $last:expr, $step:expr) => {
        $crate::view::Span::regular(($first) as isize, ($last) as isize, ($step) as isize)
    };
}

/// Collects a list of span-like values into a `Vec<Span>`.
///
/// Every entry goes through `Span::from`, so integers become scalar spans,
/// `..` takes the whole dimension and `a..b` becomes a simple range.
///
/// # Examples
/// ```
/// use ndview::{spans, view::Span};
///
/// let s = spans![.., 1..3, 2];
/// assert_eq!(s, vec![Span::all(), Span::simple(1, 3), Span::scalar(2)]);
/// ```
#[macro_export]
macro_rules! spans {
    ($($span:expr),* $(,)?) => {
        vec![$($crate::view::Span::from($span)),*]
    };
}
