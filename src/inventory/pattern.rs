//! Host range expansion.
//!
//! Inventories may describe many similar hosts with one pattern:
//!
//! - `web[01:03].example.com` -> `web01`, `web02`, `web03` (zero padded)
//! - `node[0:10:5]` -> `node0`, `node5`, `node10`
//! - `db-[a:c]` -> `db-a`, `db-b`, `db-c`
//!
//! Several ranges in one name expand to their cartesian product, left to right.
//! Bracketed text that is not a range is kept literally.

use crate::error::{Result, ScitsiError};

/// Upper bound on the hosts one pattern may expand to.
pub const MAX_EXPANDED_HOSTS: usize = 10_000;

/// Expand every range in `pattern` into concrete host names.
///
/// # Errors
///
/// Returns [`ScitsiError::InventoryParse`] for ranges that are recognised but
/// invalid, such as a zero stride or a start after the end, and for patterns
/// that would expand to more than [`MAX_EXPANDED_HOSTS`] hosts.
pub fn expand_hosts(pattern: &str) -> Result<Vec<String>> {
    let Some((start, end, range)) = find_range(pattern) else {
        return Ok(vec![pattern.to_string()]);
    };

    let head = &pattern[..start];
    let tails = expand_hosts(&pattern[end + 1..])?;
    let items = range.items(pattern)?;

    match items.len().checked_mul(tails.len()) {
        Some(total) if total <= MAX_EXPANDED_HOSTS => {}
        _ => return Err(too_many(pattern)),
    }

    let mut hosts = Vec::with_capacity(items.len() * tails.len());
    for item in items {
        for tail in &tails {
            hosts.push(format!("{}{}{}", head, item, tail));
        }
    }
    Ok(hosts)
}

fn too_many(pattern: &str) -> ScitsiError {
    ScitsiError::inventory(format!(
        "host range in '{}' expands to more than {} hosts",
        pattern, MAX_EXPANDED_HOSTS
    ))
}

#[derive(Debug)]
struct Range<'a> {
    from: &'a str,
    to: &'a str,
    stride: Option<&'a str>,
}

impl Range<'_> {
    fn items(&self, pattern: &str) -> Result<Vec<String>> {
        let invalid = |why: &str| ScitsiError::inventory(format!("invalid host range in '{}': {}", pattern, why));

        let stride = match self.stride {
            Some(s) => s.parse::<usize>().map_err(|_| invalid("stride is not a number"))?,
            None => 1,
        };
        if stride == 0 {
            return Err(invalid("stride must be positive"));
        }

        if let (Ok(from), Ok(to)) = (self.from.parse::<u64>(), self.to.parse::<u64>()) {
            if from > to {
                return Err(invalid("start is after end"));
            }
            if (to - from) / stride as u64 >= MAX_EXPANDED_HOSTS as u64 {
                return Err(too_many(pattern));
            }
            let width = if self.from.len() > 1 && self.from.starts_with('0') {
                self.from.len()
            } else {
                0
            };
            return Ok((from..=to)
                .step_by(stride)
                .map(|n| format!("{:0width$}", n, width = width))
                .collect());
        }

        let (Some(from), Some(to)) = (single_letter(self.from), single_letter(self.to)) else {
            return Err(invalid("bounds must both be numbers or single letters"));
        };
        if from > to {
            return Err(invalid("start is after end"));
        }
        Ok((from..=to).step_by(stride).map(String::from).collect())
    }
}

fn single_letter(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Some(c),
        _ => None,
    }
}

/// Locate the first `[from:to]` or `[from:to:stride]` range.
fn find_range(pattern: &str) -> Option<(usize, usize, Range<'_>)> {
    let mut offset = 0;
    while let Some(open) = pattern[offset..].find('[').map(|i| i + offset) {
        let close = pattern[open..].find(']').map(|i| i + open)?;
        let inner = &pattern[open + 1..close];
        let parts: Vec<&str> = inner.split(':').collect();
        let is_range = matches!(parts.len(), 2 | 3)
            && parts[..2]
                .iter()
                .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_alphanumeric()));
        if is_range {
            let range = Range {
                from: parts[0],
                to: parts[1],
                stride: parts.get(2).copied(),
            };
            return Some((open, close, range));
        }
        offset = open + 1;
    }
    None
}
