//! Sexagesimal (degrees-minutes-seconds) angle parsing and formatting.
//!
//! Data entry accepts decimal degrees or hyphen-separated D-M-S, with an
//! optional leading sign: `"45"`, `"45-30"`, `"45-30-15.5"`, `"-0-30"`.

/// Attempts to parse an angle in signed D-M-S or decimal-degree notation
/// into radians. Returns `None` if the text is not a valid angle.
pub fn parse_dms(text: &str) -> Option<f64> {
    let s = text.trim_end();
    if s.is_empty() {
        return None;
    }

    // Degrees.
    let mut pos = 0;
    let num = numeric_prefix(s, pos);
    let deg: f64 = num.parse().ok()?;
    let mut rad = deg.to_radians();
    pos += num.len();
    if pos >= s.len() {
        return Some(rad);
    }

    // Skip a single separating hyphen.
    if s.as_bytes()[pos] == b'-' {
        pos += 1;
        if pos >= s.len() {
            return Some(rad);
        }
    }

    // Minutes. A negated value means there was a doubled hyphen.
    let num = numeric_prefix(s, pos);
    let mins: f64 = num.parse().ok()?;
    if mins < 0.0 {
        return None;
    }
    if rad < 0.0 {
        rad -= (mins / 60.0).to_radians();
    } else {
        rad += (mins / 60.0).to_radians();
    }
    pos += num.len();
    if pos >= s.len() {
        return Some(rad);
    }

    if s.as_bytes()[pos] == b'-' {
        pos += 1;
        if pos >= s.len() {
            return Some(rad);
        }
    }

    // Seconds, which must run to the end of the text.
    let num = numeric_prefix(s, pos);
    let secs: f64 = num.parse().ok()?;
    if secs < 0.0 {
        return None;
    }
    if rad < 0.0 {
        rad -= (secs / 3600.0).to_radians();
    } else {
        rad += (secs / 3600.0).to_radians();
    }

    if pos + num.len() == s.len() {
        Some(rad)
    } else {
        None
    }
}

/// Formats an angle in radians as a D-MM-SS.sss string, e.g. `"45-30-0.000"`.
pub fn format_dms(radians: f64) -> String {
    let sdeg = radians.to_degrees();
    let (deg, mins, secs) = split_dms(sdeg);
    let s = format!("{}-{:02}-{:.3}", deg, mins, secs);
    if sdeg < 0.0 {
        format!("-{}", s)
    } else {
        s
    }
}

/// Formats an angle in radians as an abbreviated D-M string, with seconds
/// appended only when they would show, e.g. `"23-0"` or `"23-0-12.500"`.
pub fn format_dms_short(radians: f64) -> String {
    let sdeg = radians.to_degrees();
    let (deg, mins, secs) = split_dms(sdeg);
    let mut s = if sdeg < 0.0 {
        format!("-{}-{}", deg, mins)
    } else {
        format!("{}-{}", deg, mins)
    };
    if secs >= 0.001 {
        s.push_str(&format!("-{:.3}", secs));
    }
    s
}

/// Splits unsigned decimal degrees into whole degrees, whole minutes and
/// seconds, carrying so that neither minutes nor seconds reach 60.
fn split_dms(sdeg: f64) -> (u32, u32, f64) {
    let v = sdeg.abs();
    let mut deg = v.trunc() as u32;
    let rem = (v - v.trunc()) * 60.0;
    let mut mins = rem.trunc() as u32;
    let mut secs = (rem - rem.trunc()) * 60.0;

    // Guard against 60s introduced by the float arithmetic (seconds are
    // formatted to 3 decimals below).
    if (secs - 60.0).abs() < 0.001 {
        secs = 0.0;
        mins += 1;
    }
    if mins >= 60 {
        mins = 0;
        deg += 1;
    }
    (deg, mins, secs)
}

/// Returns the leading numeric characters of `s` at `start` (digits, a
/// decimal point, or a minus sign in the first position only).
fn numeric_prefix(s: &str, start: usize) -> &str {
    let mut n = 0;
    for (i, c) in s.as_bytes()[start..].iter().enumerate() {
        if (*c == b'-' && i == 0) || *c == b'.' || c.is_ascii_digit() {
            n += 1;
        } else {
            break;
        }
    }
    &s[start..start + n]
}
