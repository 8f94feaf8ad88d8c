//! Unicode identifier classification via the `unicode-ident` crate.
//!
//! Identifier classification needs a real XID_Start/XID_Continue table
//! rather than a built-in `is_alphabetic`-style check, which Python's own
//! identifier rules don't match exactly. `unicode-ident` is the same
//! table-lookup dependency real-world Python lexers use for this exact
//! purpose.

/// Whether `ch` can start a Python identifier: Unicode XID_Start, or `_`.
pub fn is_identifier_start(ch: char) -> bool {
    ch == '_' || unicode_ident::is_xid_start(ch)
}

/// Whether `ch` can continue a Python identifier: Unicode XID_Continue.
/// `_` is already covered by `XID_Continue`.
pub fn is_identifier_continue(ch: char) -> bool {
    unicode_ident::is_xid_continue(ch)
}
