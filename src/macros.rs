/// Builds an exhaustive [`Table`](crate::Table) from `pattern => handler`
/// entries, optionally ending with an `else => handler` entry.
///
/// # Examples
///
/// ```rust
/// use tagmatch::{exhaustive_match, table, Registry};
///
/// #[derive(Registry)]
/// enum Reply {
///     Some((i32, String)),
///     None,
/// }
///
/// let value = Reply::of(reply::Some, (12, "x".to_string()));
/// let n = exhaustive_match(value, table! {
///     reply::Some => |(n, _)| n,
///     reply::None => |()| -1,
/// });
/// assert_eq!(n, 12);
///
/// let n = exhaustive_match(Reply::of(reply::None, ()), table! {
///     reply::Some => |(n, _)| n,
///     else => || 0,
/// });
/// assert_eq!(n, 0);
/// ```
#[macro_export]
macro_rules! table {
    (else => $fallback:expr $(,)?) => {
        $crate::Table::new().fallback($fallback)
    };
    ($($pattern:expr => $handler:expr),+ $(, else => $fallback:expr)? $(,)?) => {
        $crate::Table::new()
            $(.on($pattern, $handler))+
            $(.fallback($fallback))?
    };
}

/// Builds a [`PartialTable`](crate::PartialTable) with the same syntax as
/// [`table!`].
///
/// # Examples
///
/// ```rust
/// use tagmatch::{partial_match, partial_table, Registry};
///
/// #[derive(Registry)]
/// enum Reply {
///     Some((i32, String)),
///     None,
/// }
///
/// let n = partial_match(Reply::of(reply::None, ()), partial_table! {
///     reply::Some => |(n, _)| n,
/// });
/// assert_eq!(n, None);
/// ```
#[macro_export]
macro_rules! partial_table {
    (else => $fallback:expr $(,)?) => {
        $crate::PartialTable::new().fallback($fallback)
    };
    ($($pattern:expr => $handler:expr),+ $(, else => $fallback:expr)? $(,)?) => {
        $crate::PartialTable::new()
            $(.on($pattern, $handler))+
            $(.fallback($fallback))?
    };
}

#[cfg(test)]
mod tests {
    use crate::{exhaustive_match, partial_match, Registry};

    #[derive(crate::Registry)]
    enum Coin {
        Penny,
        Nickel,
        Quarter(&'static str),
    }

    fn cents(coin: Coin) -> u32 {
        exhaustive_match(coin, table! {
            coin::Penny => |()| 1,
            coin::Nickel => |()| 5,
            coin::Quarter => |_state| 25,
        })
    }

    #[test]
    fn table_macro_builds_exhaustive_tables() {
        assert_eq!(cents(Coin::of(coin::Penny, ())), 1);
        assert_eq!(cents(Coin::of(coin::Nickel, ())), 5);
        assert_eq!(cents(Coin::of(coin::Quarter, "Alaska")), 25);

        let only_else = table! { else => || "coin" };
        assert_eq!(only_else.run(Coin::Penny), "coin");

        let quarter = table! {
            coin::Quarter => |state| state,
            else => || "none",
        };
        assert_eq!(quarter.run(Coin::Quarter("Ohio")), "Ohio");
    }

    #[test]
    fn partial_table_macro_leaves_gaps() {
        let got = partial_match(Coin::Nickel, partial_table! { coin::Penny => |()| 1 });
        assert_eq!(got, None);

        let got = partial_match(Coin::Nickel, partial_table! {
            coin::Penny => |()| 1,
            else => || 0,
        });
        assert_eq!(got, Some(0));
    }
}
