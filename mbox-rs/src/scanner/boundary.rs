//! MIME boundary tracking for the header block of a single message

use super::separator::trim_line_end;

/// Value of header `name` if `line` starts that header.
fn header_value<'a>(line: &'a [u8], name: &str) -> Option<&'a [u8]> {
    let colon = line.iter().position(|&b| b == b':')?;
    let field = line[..colon].trim_ascii_end();

    if field.eq_ignore_ascii_case(name.as_bytes()) {
        Some(&line[colon + 1..])
    } else {
        None
    }
}

/// Extract parameter `name` from a structured header value such as
/// `multipart/alternative; boundary="abc";`.
///
/// Parameter names match case-insensitively. Quoted values may contain
/// `;` and backslash escapes.
pub fn extract_parameter(value: &[u8], name: &str) -> Option<Vec<u8>> {
    // Skip the media type
    let mut pos = value.iter().position(|&b| b == b';')?;

    loop {
        pos += 1;
        while pos < value.len() && value[pos].is_ascii_whitespace() {
            pos += 1;
        }

        let name_start = pos;
        while pos < value.len() && !matches!(value[pos], b'=' | b';') {
            pos += 1;
        }
        let param_name = value[name_start..pos].trim_ascii();

        if pos >= value.len() {
            return None;
        }
        if value[pos] == b';' {
            continue;
        }

        pos += 1;
        while pos < value.len() && value[pos].is_ascii_whitespace() {
            pos += 1;
        }

        let (param_value, end) = read_parameter_value(value, pos);
        if param_name.eq_ignore_ascii_case(name.as_bytes()) {
            return Some(param_value);
        }

        pos = end + value[end..].iter().position(|&b| b == b';')?;
    }
}

/// Read a token or quoted string starting at `pos`. Returns the unquoted
/// value and the index just past it.
fn read_parameter_value(value: &[u8], mut pos: usize) -> (Vec<u8>, usize) {
    let mut out = Vec::new();

    if value.get(pos) == Some(&b'"') {
        pos += 1;
        while pos < value.len() {
            match value[pos] {
                b'"' => return (out, pos + 1),
                b'\\' if pos + 1 < value.len() => {
                    out.push(value[pos + 1]);
                    pos += 2;
                }
                b => {
                    out.push(b);
                    pos += 1;
                }
            }
        }
        // Unterminated quote, take what we have
        return (out, pos);
    }

    while pos < value.len() && value[pos] != b';' && !value[pos].is_ascii_whitespace() {
        out.push(value[pos]);
        pos += 1;
    }
    (out, pos)
}

/// `boundary` parameter of a `Content-Type` value, if non-empty.
pub fn content_type_boundary(value: &[u8]) -> Option<Vec<u8>> {
    extract_parameter(value, "boundary").filter(|b| !b.is_empty())
}

/// Whether `line` is the closing delimiter `--boundary--`.
pub(crate) fn is_closing_delimiter(line: &[u8], boundary: &[u8]) -> bool {
    line.trim_ascii_end()
        .strip_prefix(b"--")
        .and_then(|l| l.strip_suffix(b"--"))
        .is_some_and(|token| token == boundary)
}

/// Follows the header block of one message, line by line, and records the
/// boundary declared by its `Content-Type` header (folded or not).
#[derive(Debug)]
pub(crate) struct HeaderBoundary {
    in_headers: bool,
    content_type: Option<Vec<u8>>,
    boundary: Option<Vec<u8>>,
}

impl HeaderBoundary {
    pub(crate) fn new() -> Self {
        Self {
            in_headers: true,
            content_type: None,
            boundary: None,
        }
    }

    /// Feed the next complete line of the message.
    pub(crate) fn feed(&mut self, line: &[u8]) {
        if !self.in_headers {
            return;
        }

        let line = trim_line_end(line);
        if line.is_empty() {
            self.finish_header();
            self.in_headers = false;
            return;
        }

        if line[0] == b' ' || line[0] == b'\t' {
            if let Some(value) = self.content_type.as_mut() {
                value.push(b' ');
                value.extend_from_slice(line.trim_ascii());
            }
            return;
        }

        self.finish_header();
        if self.boundary.is_none() {
            if let Some(value) = header_value(line, "content-type") {
                self.content_type = Some(value.trim_ascii().to_vec());
            }
        }
    }

    fn finish_header(&mut self) {
        if let Some(value) = self.content_type.take() {
            self.boundary = content_type_boundary(&value);
        }
    }

    pub(crate) fn boundary(&self) -> Option<&[u8]> {
        self.boundary.as_deref()
    }
}
