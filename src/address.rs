/// Characters kept from the start of an address
pub const HEAD_LEN: usize = 8;
/// Characters kept from the end of an address
pub const TAIL_LEN: usize = 8;
/// Separator placed between head and tail
pub const ELLIPSIS: &str = "...";

/// Shortest address that gets truncated: head and tail no longer overlap.
pub const MIN_TRUNCATED_LEN: usize = HEAD_LEN + TAIL_LEN;

/// Shorten an address to `head(8) + "..." + tail(8)`.
///
/// Addresses shorter than 16 characters are returned unchanged, so head and
/// tail never overlap. Lengths are counted in characters, not bytes.
pub fn format(address: &str) -> String {
    let len = address.chars().count();
    if len < MIN_TRUNCATED_LEN {
        return address.to_string();
    }

    let head: String = address.chars().take(HEAD_LEN).collect();
    let tail: String = address.chars().skip(len - TAIL_LEN).collect();
    format!("{head}{ELLIPSIS}{tail}")
}
