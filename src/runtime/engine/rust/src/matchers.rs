/* src/runtime/engine/rust/src/matchers.rs */

//! Rewrites of framework-emitted route regexes.
//! Both functions work on the pattern text, never on a compiled regex,
//! and hand back the input untouched when they do not recognize its shape.

/// Optional `/_next/data/<build-id>` prefix emitted in front of every i18n route.
const DATA_PREFIX_GROUP: &str = r"(?:\/(_next\/data\/[^/]{1,}))?";

/// Mandatory single-segment locale group that follows the data prefix.
const LOCALE_GROUP: &str = r"(?:\/([^/.]{1,}))";

/// Make the locale segment of an i18n route regex optional, so both
/// `/en/static` and `/static` (and their data routes) match.
///
/// Only the exact data-prefix + locale-group sequence is rewritten. Anything
/// else, including a locale group that already carries a quantifier, is
/// returned byte-for-byte.
pub fn make_locale_optional(regex: &str) -> String {
  let localized = format!("{DATA_PREFIX_GROUP}{LOCALE_GROUP}");
  let Some(start) = regex.find(&localized) else {
    return regex.to_string();
  };
  let end = start + localized.len();
  let rest = &regex[end..];
  if rest.starts_with(['?', '*', '+', '{']) {
    return regex.to_string();
  }

  let mut out = String::with_capacity(regex.len() + 1);
  out.push_str(&regex[..end]);
  out.push('?');
  out.push_str(rest);
  out
}

/// Remove every lookahead assertion (`(?!...)` and `(?=...)`) from a route regex.
///
/// The result matches a superset of what the input matched. It exists for
/// runtimes whose regex engine has no lookahead support; the exact check has
/// to happen again wherever the full pattern can be evaluated.
pub fn strip_lookahead(regex: &str) -> String {
  let spans = match lookahead_spans(regex) {
    Some(spans) if !spans.is_empty() => spans,
    _ => return regex.to_string(),
  };

  let mut out = String::with_capacity(regex.len());
  let mut cursor = 0;
  for (start, end) in spans {
    out.push_str(&regex[cursor..start]);
    cursor = end;
  }
  out.push_str(&regex[cursor..]);
  out
}

/// Whether the pattern contains at least one lookahead assertion.
pub fn has_lookahead(regex: &str) -> bool {
  matches!(lookahead_spans(regex), Some(spans) if !spans.is_empty())
}

/// Byte ranges of the outermost lookahead groups, in order.
/// `None` when a lookahead is never closed.
fn lookahead_spans(regex: &str) -> Option<Vec<(usize, usize)>> {
  let bytes = regex.as_bytes();
  let mut spans = Vec::new();
  let mut i = 0;
  while i < bytes.len() {
    match bytes[i] {
      b'\\' => i += 2,
      b'[' => i = skip_class(bytes, i),
      b'(' if is_lookahead_open(&bytes[i..]) => {
        let end = group_end(bytes, i)?;
        spans.push((i, end));
        i = end;
      }
      _ => i += 1,
    }
  }
  Some(spans)
}

fn is_lookahead_open(rest: &[u8]) -> bool {
  rest.starts_with(b"(?!") || rest.starts_with(b"(?=")
}

/// Index just past the `]` closing the class opened at `open`.
/// An unterminated class runs to the end of the pattern.
fn skip_class(bytes: &[u8], open: usize) -> usize {
  let mut i = open + 1;
  while i < bytes.len() {
    match bytes[i] {
      b'\\' => i += 2,
      b']' => return i + 1,
      _ => i += 1,
    }
  }
  bytes.len()
}

/// Index just past the `)` balancing the `(` at `open`.
fn group_end(bytes: &[u8], open: usize) -> Option<usize> {
  let mut depth = 0usize;
  let mut i = open;
  while i < bytes.len() {
    match bytes[i] {
      b'\\' => {
        i += 2;
        continue;
      }
      b'[' => {
        i = skip_class(bytes, i);
        continue;
      }
      b'(' => depth += 1,
      b')' => {
        depth -= 1;
        if depth == 0 {
          return Some(i + 1);
        }
      }
      _ => {}
    }
    i += 1;
  }
  None
}
