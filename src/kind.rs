use std::fmt;

/// The JSON kind carried by a [`Context`](crate::Context) handle.
///
/// The discriminant order is the cross-kind sort order used by
/// [`Context::less`](crate::Context::less): `Null < False < Number < String
/// < True < Json`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    /// An explicit `null`, or a handle that does not exist (empty raw).
    #[default]
    Null,
    /// The literal `false`.
    False,
    /// A JSON number.
    Number,
    /// A JSON string.
    String,
    /// The literal `true`.
    True,
    /// An object or an array, distinguished by the first non-space byte.
    Json,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Kind::Null => "Null",
            Kind::False => "False",
            Kind::Number => "Number",
            Kind::String => "String",
            Kind::True => "True",
            Kind::Json => "JSON",
        };
        f.write_str(s)
    }
}

#[inline]
pub(crate) fn is_ws(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}
