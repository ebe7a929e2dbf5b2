//! Mailbox address extraction from `From`/`To`/`Cc` header values.

use crate::encoding::decode_rfc2047;

/// A single mailbox: optional display name plus address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    /// Display name with RFC 2047 words decoded, if any.
    pub name: Option<String>,
    /// The address as written (case preserved).
    pub email: String,
}

/// Parses a comma separated address list.
///
/// Handles quoted display names containing commas, angle-bracket
/// addresses, trailing `(comments)` and RFC 5322 group syntax
/// (`team: a@x, b@x;`). Entries without an address are dropped.
#[must_use]
pub fn parse_address_list(value: &str) -> Vec<Address> {
    split_top_level(value)
        .into_iter()
        .filter_map(parse_mailbox)
        .collect()
}

/// Splits on commas that are not inside quotes, angle brackets or comments.
fn split_top_level(value: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut in_quotes = false;
    let mut angle = 0usize;
    let mut paren = 0usize;
    let mut escaped = false;
    let mut start = 0;

    for (i, ch) in value.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            '<' if !in_quotes => angle += 1,
            '>' if !in_quotes => angle = angle.saturating_sub(1),
            '(' if !in_quotes => paren += 1,
            ')' if !in_quotes => paren = paren.saturating_sub(1),
            ',' | ';' if !in_quotes && angle == 0 && paren == 0 => {
                items.push(&value[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    items.push(&value[start..]);
    items
}

fn parse_mailbox(item: &str) -> Option<Address> {
    let item = strip_group_label(item.trim());
    if item.is_empty() {
        return None;
    }

    if let (Some(open), Some(close)) = (item.rfind('<'), item.rfind('>'))
        && open < close
    {
        let email = item[open + 1..close].trim().to_string();
        if email.is_empty() {
            return None;
        }
        let name = clean_display_name(&item[..open]);
        return Some(Address { name, email });
    }

    let (bare, comment) = split_comment(item);
    let email = bare.trim();
    if email.is_empty() {
        return None;
    }
    Some(Address {
        name: comment.and_then(clean_display_name),
        email: email.to_string(),
    })
}

/// Drops a leading `group-name:` label.
fn strip_group_label(item: &str) -> &str {
    let mut in_quotes = false;
    for (i, ch) in item.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            '<' | '@' if !in_quotes => return item,
            ':' if !in_quotes => return item[i + 1..].trim(),
            _ => {}
        }
    }
    item
}

/// Splits `addr (comment)` into the address and the comment text.
fn split_comment(item: &str) -> (&str, Option<&str>) {
    match (item.find('('), item.rfind(')')) {
        (Some(open), Some(close)) if open < close => (&item[..open], Some(&item[open + 1..close])),
        _ => (item, None),
    }
}

fn clean_display_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_matches('"').replace("\\\"", "\"");
    let trimmed = trimmed.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(decode_rfc2047(trimmed).unwrap_or_else(|_| trimmed.to_string()))
}
