//! Scanner, validator and leg numbering for path description strings.
//!
//! A description is a whitespace-delimited list of words, but one word can
//! pack several tokens with no separating space (`"(45-00"`, `"100.5*3"`,
//! `"250)"`), so each word is decomposed left to right against a small
//! priority list of token rules.

use log::debug;

use crate::angles;
use crate::error::{PathError, Result};
use crate::units::{DistanceUnit, UnitTable};

use super::{ParsedPath, PathItem, PathItemType};

/// Parses a complete path description: scan, validate, assign leg numbers.
pub fn parse(text: &str, table: &UnitTable, entry_unit: &DistanceUnit) -> Result<ParsedPath> {
    let items = scan(text, table, entry_unit)?;
    let mut items = validate(items)?;
    let leg_count = set_legs(&mut items);
    debug!(
        "parsed path: {} items over {} legs",
        items.len(),
        leg_count
    );
    Ok(ParsedPath { items, leg_count })
}

/// Tokenizes a path description into path items, without considering the
/// context each item appears in. Numeric tokens come out as `Value` (or as
/// angle kinds when unambiguous) and are classified fully by [`validate`].
///
/// `entry_unit` is the default unit for un-suffixed values until the
/// description changes it with a `"<abbrev>..."` token.
pub fn scan(text: &str, table: &UnitTable, entry_unit: &DistanceUnit) -> Result<Vec<PathItem>> {
    let mut scanner = Scanner {
        items: Vec::new(),
        units: entry_unit.clone(),
        omit: false,
        table,
    };
    for word in text.split_whitespace() {
        scanner.parse_word(word)?;
    }
    Ok(scanner.items)
}

struct Scanner<'a> {
    /// Items parsed so far.
    items: Vec<PathItem>,
    /// The current default data entry units.
    units: DistanceUnit,
    /// Did the last parsed item signify an omitted point?
    omit: bool,
    table: &'a UnitTable,
}

impl Scanner<'_> {
    /// Decomposes one whitespace-delimited word, consuming tokens from the
    /// front until the word is exhausted.
    fn parse_word(&mut self, word: &str) -> Result<()> {
        let mut rest = word;
        loop {
            if rest.is_empty() {
                return Ok(());
            }

            // A new default units specification ("ft..."). The abbreviation
            // runs up to the first '.'; anything after the "..." is ignored.
            if rest.contains("...") {
                let unit = self.match_units(rest)?;
                self.units = unit.clone();
                self.add_item(PathItem::new(PathItemType::Units, Some(unit), 0.0));
                return Ok(());
            }

            // Counter-clockwise indicator.
            if rest
                .get(..2)
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case("cc"))
            {
                self.add_marker(PathItemType::CounterClockwise);
                rest = &rest[2..];
                continue;
            }

            if let Some(r) = rest.strip_prefix('(') {
                self.add_marker(PathItemType::Bc);
                rest = r;
                continue;
            }

            if let Some(r) = rest.strip_prefix(')') {
                self.add_marker(PathItemType::Ec);
                rest = r;
                continue;
            }

            if rest.starts_with('/') {
                let bytes = rest.as_bytes();

                // A free-standing slash, or a slash followed by a numeric value.
                if rest.len() == 1 || bytes[1].is_ascii_digit() || bytes[1] == b'.' {
                    self.add_marker(PathItemType::Slash);
                    rest = &rest[1..];
                    continue;
                }

                // Miss-connect and omit-point qualifiers terminate the word.
                if rest.len() == 2 {
                    if bytes[1] == b'-' {
                        self.add_marker(PathItemType::MissConnect);
                        return Ok(());
                    }
                    if bytes[1] == b'*' {
                        self.add_marker(PathItemType::OmitPoint);
                        return Ok(());
                    }
                } else if rest.len() == 3 {
                    if rest.eq_ignore_ascii_case("/mc") {
                        self.add_marker(PathItemType::MissConnect);
                        return Ok(());
                    }
                    if rest.eq_ignore_ascii_case("/op") {
                        self.add_marker(PathItemType::OmitPoint);
                        return Ok(());
                    }
                }

                return Err(PathError::UnexpectedQualifier(rest.to_string()));
            }

            // Repeat multiplier: "*n" duplicates the last value n-1 times.
            if let Some(r) = rest.strip_prefix('*') {
                if r.is_empty() {
                    return Err(PathError::UnexpectedStar);
                }
                let digits = int_prefix(r);
                let repeat: u32 = digits
                    .parse()
                    .map_err(|_| PathError::BadRepeatCount(rest.to_string()))?;
                if repeat < 2 {
                    return Err(PathError::BadRepeatCount(rest.to_string()));
                }
                self.add_repeats(repeat)?;
                rest = &r[digits.len()..];
                continue;
            }

            // An embedded qualifier later in the word: handle the leading
            // token on its own, then continue from the qualifier. The prefix
            // cannot itself contain a qualifier, so this recursion is one
            // level deep at most.
            if let Some(qual) = rest.find(['*', '/']) {
                self.parse_word(&rest[..qual])?;
                rest = &rest[qual..];
                continue;
            }

            // What remains is a value or an angle. A '-' anywhere marks an
            // angle in D-M-S form, and the token right after a BC is always
            // an angle.
            if rest.contains('-') || self.last_is_bc() {
                return self.parse_angle(rest);
            }
            rest = self.parse_value(rest)?;
        }
    }

    /// Parses an angle token: a central angle if it carries a 'c', a
    /// deflection if it carries a 'd', otherwise a plain angle.
    fn parse_angle(&mut self, word: &str) -> Result<()> {
        let mut text = word.to_string();
        let mut item_type = PathItemType::Angle;

        if let Some(i) = word.find(['c', 'C']) {
            // Central angle: the marker truncates the token.
            text.truncate(i);
            item_type = PathItemType::CentralAngle;
        } else if let Some(i) = word.find(['d', 'D']) {
            text.remove(i);
            item_type = PathItemType::Deflection;
        }

        match angles::parse_dms(&text) {
            Some(radians) => {
                self.add_item(PathItem::new(item_type, None, radians));
                Ok(())
            }
            None => Err(PathError::MalformedAngle(text)),
        }
    }

    /// Parses a numeric value with an optional unit suffix. Returns the
    /// unconsumed remainder, which is non-empty only when the value runs
    /// into an EC marker ("250)").
    fn parse_value<'b>(&mut self, word: &'b str) -> Result<&'b str> {
        let num = double_prefix(word);
        let value: f64 = num
            .parse()
            .map_err(|_| PathError::MalformedValue(word.to_string()))?;

        let rest = &word[num.len()..];
        let unit = if !rest.is_empty() && !rest.starts_with(')') {
            // Explicit unit suffix for this value only.
            self.match_units(rest)
                .map_err(|_| PathError::MalformedValue(word.to_string()))?
        } else {
            self.units.clone()
        };

        self.add_item(PathItem::new(PathItemType::Value, Some(unit), value));

        if rest.starts_with(')') {
            Ok(rest)
        } else {
            Ok("")
        }
    }

    /// Resolves the unit abbreviation at the start of `text` (up to the
    /// first whitespace or '.' character) against the unit table.
    fn match_units(&self, text: &str) -> Result<DistanceUnit> {
        let abbrev: String = text
            .chars()
            .take_while(|c| !c.is_whitespace() && *c != '.')
            .collect();
        match self.table.find(&abbrev) {
            Some(unit) => Ok(unit.clone()),
            None => Err(PathError::UnknownUnit(abbrev)),
        }
    }

    fn last_is_bc(&self) -> bool {
        matches!(
            self.items.last(),
            Some(item) if item.item_type == PathItemType::Bc
        )
    }

    /// Appends n-1 copies of the most recent value, skipping over a
    /// trailing miss-connect that [`Scanner::add_item`] inserted.
    fn add_repeats(&mut self, repeat: u32) -> Result<()> {
        if self.items.is_empty() {
            return Err(PathError::NothingToRepeat);
        }

        let mut prev = self.items.len() - 1;
        if self.items[prev].item_type == PathItemType::MissConnect && prev > 0 {
            prev -= 1;
        }
        if self.items[prev].item_type != PathItemType::Value {
            return Err(PathError::BadRepeatItem);
        }

        for _ in 1..repeat {
            let copy = self.items[prev].clone();
            self.add_item(copy);
        }
        Ok(())
    }

    fn add_marker(&mut self, item_type: PathItemType) {
        self.add_item(PathItem::marker(item_type));
    }

    fn add_item(&mut self, item: PathItem) {
        let item_type = item.item_type;

        // Never two miss-connects in a row.
        if item_type == PathItemType::MissConnect
            && self
                .items
                .last()
                .is_some_and(|last| last.item_type == PathItemType::MissConnect)
        {
            return;
        }

        self.items.push(item);

        // A value that follows an omitted point gets an automatic
        // miss-connect appended after it.
        if self.omit && item_type == PathItemType::Value {
            self.omit = false;
            self.add_item(PathItem::marker(PathItemType::MissConnect));
        }

        if item_type == PathItemType::OmitPoint {
            self.omit = true;
        }
    }
}

/// Validates scan output, reclassifying every `Value` (and the angles
/// inside curves) according to its position, and checking curve nesting
/// and qualifier placement. Returns the re-tagged sequence; the input is
/// consumed so stale copies of un-classified items cannot linger.
pub fn validate(items: Vec<PathItem>) -> Result<Vec<PathItem>> {
    if items.is_empty() {
        return Err(PathError::EmptyPath);
    }

    let mut items = items;
    let mut ibc = 0; // index of the most recent BC
    let mut curve = false;

    for i in 0..items.len() {
        match items[i].item_type {
            PathItemType::Bc => {
                if curve {
                    return Err(PathError::NestedCurve);
                }
                curve = true;

                // The lookahead is measured from the previous BC (zero to
                // start), so a BC near the end of a short path surfaces as
                // a missing EC rather than failing here.
                if ibc + 4 > items.len() {
                    return Err(PathError::ShortCurve);
                }
                ibc = i;
            }

            PathItemType::Ec => {
                if !curve {
                    return Err(PathError::UnexpectedEc);
                }
                curve = false;
            }

            PathItemType::Value => {
                if items[i].unit.is_none() {
                    return Err(PathError::MissingUnit);
                }

                if !curve {
                    items[i].item_type = PathItemType::Distance;
                } else if i == ibc + 1 {
                    // The value immediately after the BC is always an angle,
                    // entered in decimal degrees.
                    items[i].item_type = PathItemType::BcAngle;
                    items[i].value = items[i].value.to_radians();
                } else if i == ibc + 2 {
                    // Either an exit angle or the radius: an exit angle only
                    // when yet another value follows.
                    let next_is_value = items
                        .get(i + 1)
                        .is_some_and(|next| next.item_type == PathItemType::Value);
                    if next_is_value {
                        items[i].item_type = PathItemType::EcAngle;
                        items[i].value = items[i].value.to_radians();
                    } else {
                        items[i].item_type = PathItemType::Radius;
                    }
                } else if i == ibc + 3 {
                    items[i].item_type = PathItemType::Radius;
                } else {
                    items[i].item_type = PathItemType::Distance;
                }
            }

            PathItemType::Angle | PathItemType::Deflection => {
                if curve {
                    if items[i].item_type == PathItemType::Deflection {
                        return Err(PathError::DeflectionInCurve);
                    }
                    if i == ibc + 1 {
                        items[i].item_type = PathItemType::BcAngle;
                    } else if i == ibc + 2 {
                        items[i].item_type = PathItemType::EcAngle;
                    } else {
                        return Err(PathError::ExtraneousAngle);
                    }
                } else {
                    if i > 0 && items[i - 1].item_type == PathItemType::Angle {
                        return Err(PathError::DoubledAngle);
                    }
                    if i > 0 && items[i - 1].item_type == PathItemType::Ec {
                        return Err(PathError::AngleAfterEc);
                    }
                }
            }

            PathItemType::Slash => {
                // Legal positions relative to the BC:
                //   BC angle radius /
                //   BC angle radius cc /
                //   BC angle angle radius cc /
                if !curve {
                    return Err(PathError::ExtraneousSlash);
                }
                if i < ibc + 3 || i > ibc + 5 {
                    return Err(PathError::MisplacedSlash);
                }
            }

            PathItemType::CounterClockwise => {
                if !curve {
                    return Err(PathError::ExtraneousCounterClockwise);
                }
                if i < ibc + 3 || i > ibc + 4 {
                    return Err(PathError::MisplacedCounterClockwise);
                }
            }

            PathItemType::CentralAngle => {
                if !curve {
                    return Err(PathError::ExtraneousCentralAngle);
                }
                if i != ibc + 1 {
                    return Err(PathError::MisplacedCentralAngle);
                }
            }

            PathItemType::MissConnect | PathItemType::OmitPoint => {
                if i == 0 || items[i - 1].item_type != PathItemType::Distance {
                    return Err(PathError::QualifierWithoutDistance);
                }
            }

            PathItemType::Units => {}

            // Already-classified kinds pass through, so a validated
            // sequence can be validated again.
            PathItemType::Distance
            | PathItemType::BcAngle
            | PathItemType::EcAngle
            | PathItemType::Radius => {}
        }
    }

    if curve {
        return Err(PathError::UnclosedCurve);
    }

    Ok(items)
}

/// Associates each validated item with a leg sequence number and returns
/// the total number of legs. Items inside a curve get the negated leg
/// number; units items before the first leg keep leg number 0.
pub fn set_legs(items: &mut [PathItem]) -> i32 {
    let mut nleg = 0;
    let mut i = 0;

    while i < items.len() {
        match items[i].item_type {
            PathItemType::Distance | PathItemType::Angle | PathItemType::Deflection => {
                // A new straight leg, running until the next angle or BC
                // (an angle always comes at the start of a leg).
                nleg += 1;
                items[i].leg_number = nleg;
                i += 1;
                while i < items.len() {
                    match items[i].item_type {
                        PathItemType::Angle | PathItemType::Deflection | PathItemType::Bc => break,
                        _ => {
                            items[i].leg_number = nleg;
                            i += 1;
                        }
                    }
                }
            }

            PathItemType::Bc => {
                // A curve leg: everything up to and including the EC.
                nleg += 1;
                while i < items.len() {
                    items[i].leg_number = -nleg;
                    let at_ec = items[i].item_type == PathItemType::Ec;
                    i += 1;
                    if at_ec {
                        break;
                    }
                }
            }

            _ => {
                items[i].leg_number = nleg;
                i += 1;
            }
        }
    }

    nleg
}

/// Returns the leading decimal digits of `s`.
fn int_prefix(s: &str) -> &str {
    let n = s.bytes().take_while(u8::is_ascii_digit).count();
    &s[..n]
}

/// Returns the leading characters of `s` that look like a floating point
/// number (a minus sign in the first position only, digits, decimal point).
fn double_prefix(s: &str) -> &str {
    let mut n = 0;
    for (i, c) in s.bytes().enumerate() {
        if (c == b'-' && i == 0) || c == b'.' || c.is_ascii_digit() {
            n += 1;
        } else {
            break;
        }
    }
    &s[..n]
}
