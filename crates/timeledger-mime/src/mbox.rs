//! Mailbox (mbox) archive splitting.

/// Iterator over the messages of an mbox archive.
///
/// A message starts at every line beginning with `From ` (the envelope
/// line, which is not part of the message). Escaped body lines
/// (`>From `, `>>From ` ...) lose one leading `>`.
#[derive(Debug, Clone)]
pub struct Mbox<'a> {
    rest: &'a str,
}

impl<'a> Mbox<'a> {
    /// Wraps the full text of an mbox archive.
    #[must_use]
    pub const fn new(text: &'a str) -> Self {
        Self { rest: text }
    }
}

impl Iterator for Mbox<'_> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        // Skip to the first envelope line
        while !self.rest.is_empty() && !self.rest.starts_with("From ") {
            self.rest = self
                .rest
                .find('\n')
                .map_or("", |index| &self.rest[index + 1..]);
        }
        if self.rest.is_empty() {
            return None;
        }

        // Drop the envelope line itself
        let body_start = self.rest.find('\n').map_or(self.rest.len(), |i| i + 1);
        let message = &self.rest[body_start..];

        let end = find_next_envelope(message).unwrap_or(message.len());
        self.rest = &message[end..];

        Some(unescape(&message[..end]))
    }
}

fn find_next_envelope(text: &str) -> Option<usize> {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if line.starts_with("From ") {
            return Some(offset);
        }
        offset += line.len();
    }
    None
}

fn unescape(message: &str) -> String {
    let mut out = String::with_capacity(message.len());
    for line in message.split_inclusive('\n') {
        let quoted = line.trim_start_matches('>');
        if quoted.len() < line.len() && quoted.starts_with("From ") {
            out.push_str(&line[1..]);
        } else {
            out.push_str(line);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_messages() {
        let archive = concat!(
            "From alice@example.com Mon Jan  2 10:00:00 2023\n",
            "Subject: one\n",
            "\n",
            "first body\n",
            "\n",
            "From bob@example.com Tue Jan  3 10:00:00 2023\n",
            "Subject: two\n",
            "\n",
            ">From the archives\n",
            ">>From deeper\n",
        );

        let messages: Vec<String> = Mbox::new(archive).collect();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], "Subject: one\n\nfirst body\n\n");
        assert_eq!(
            messages[1],
            "Subject: two\n\nFrom the archives\n>From deeper\n"
        );
    }

    #[test]
    fn test_leading_garbage_and_empty() {
        assert_eq!(Mbox::new("").count(), 0);
        assert_eq!(Mbox::new("no envelope here\n").count(), 0);

        let messages: Vec<String> = Mbox::new("junk\nFrom x\nSubject: a\n").collect();
        assert_eq!(messages, vec!["Subject: a\n".to_string()]);
    }
}
