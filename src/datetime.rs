//! RFC 3339 date and time values as they appear in TOML.

#[cfg(test)]
#[path = "./datetime_tests.rs"]
mod tests;

use std::fmt;

/// A calendar date.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Date {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

/// A time of day.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Time {
    pub hour: u8,
    pub minute: u8,
    /// May be 60 to represent a leap second.
    pub second: u8,
    pub nanosecond: u32,
    digits: u8,
    has_seconds: bool,
}

impl Time {
    /// Number of digits in the original fractional seconds, 0 if there were none.
    pub fn subsecond_precision(&self) -> u8 {
        self.digits
    }

    /// Whether seconds were present in the source, or defaulted to zero.
    pub fn has_seconds(&self) -> bool {
        self.has_seconds
    }
}

/// The UTC offset of an offset date-time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Offset {
    /// A suffix which, when applied to a time, denotes a UTC offset of 00:00;
    /// often spoken "Zulu" from the ICAO phonetic alphabet representation of the letter "Z".
    /// RFC 3339 section 2
    Z,
    /// Offset between local time and UTC
    Custom { minutes: i16 },
}

impl Offset {
    /// Offset from UTC in minutes.
    pub fn minutes(&self) -> i16 {
        match self {
            Offset::Z => 0,
            Offset::Custom { minutes } => *minutes,
        }
    }
}

/// Container for temporal values of the TOML format.
///
/// The four TOML flavours map onto the optional parts:
///
/// | TOML type        | `date` | `time` | `offset` |
/// |------------------|--------|--------|----------|
/// | offset date-time | yes    | yes    | yes      |
/// | local date-time  | yes    | yes    | no       |
/// | local date       | yes    | no     | no       |
/// | local time       | no     | yes    | no       |
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Datetime {
    pub date: Option<Date>,
    pub time: Option<Time>,
    pub offset: Option<Offset>,
}

fn is_leap_year(year: u16) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

fn days_in_month(year: u16, month: u8) -> u8 {
    const DAYS: [u8; 13] = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    if month == 2 && is_leap_year(year) {
        29
    } else {
        DAYS[month as usize]
    }
}

/// Reads exactly `n` ASCII digits at `at`, rejecting a longer digit run.
fn fixed_digits(input: &[u8], at: usize, n: usize) -> Option<u32> {
    let field = input.get(at..at + n)?;
    let mut value = 0u32;
    for &b in field {
        if !b.is_ascii_digit() {
            return None;
        }
        value = value * 10 + (b - b'0') as u32;
    }
    if input.get(at + n).is_some_and(u8::is_ascii_digit) {
        return None;
    }
    Some(value)
}

impl Datetime {
    /// Quick shape check used to decide whether a bare value should be
    /// parsed as a date-time rather than a number.
    pub(crate) fn looks_like_datetime(input: &[u8]) -> bool {
        matches!(input, [_, _, b':', ..] | [_, _, _, _, b'-', _, _, b'-', ..])
    }

    /// Parses the longest date-time prefix of `input`, returning the number
    /// of bytes consumed.
    pub(crate) fn munch(input: &[u8]) -> Option<(usize, Datetime)> {
        let mut value = Datetime {
            date: None,
            time: None,
            offset: None,
        };
        let mut i = 0;

        if let [_, _, _, _, b'-', _, _, b'-', ..] = input {
            let year = fixed_digits(input, 0, 4)? as u16;
            let month = fixed_digits(input, 5, 2)? as u8;
            if month < 1 || month > 12 {
                return None;
            }
            let day = fixed_digits(input, 8, 2)? as u8;
            if day < 1 || day > days_in_month(year, month) {
                return None;
            }
            value.date = Some(Date { year, month, day });
            i = 10;
            match input.get(i) {
                Some(b'T' | b't') => i += 1,
                Some(b' ') if input.get(i + 1).is_some_and(u8::is_ascii_digit) => i += 1,
                _ => return Some((i, value)),
            }
        }

        if input.get(i + 2) != Some(&b':') {
            return None;
        }
        let hour = fixed_digits(input, i, 2)? as u8;
        let minute = fixed_digits(input, i + 3, 2)? as u8;
        if hour > 23 || minute > 59 {
            return None;
        }
        i += 5;

        let mut time = Time {
            hour,
            minute,
            second: 0,
            nanosecond: 0,
            digits: 0,
            has_seconds: false,
        };
        if input.get(i) == Some(&b':') {
            let second = fixed_digits(input, i + 1, 2)? as u8;
            // 60 is permitted for leap seconds.
            if second > 60 {
                return None;
            }
            time.second = second;
            time.has_seconds = true;
            i += 3;

            if input.get(i) == Some(&b'.') {
                i += 1;
                let start = i;
                let mut nanos = 0u32;
                while let Some(&b) = input.get(i) {
                    if !b.is_ascii_digit() {
                        break;
                    }
                    // Precision beyond nanoseconds is truncated.
                    if i - start < 9 {
                        nanos = nanos * 10 + (b - b'0') as u32;
                    }
                    i += 1;
                }
                let digits = (i - start).min(9);
                if digits == 0 {
                    return None;
                }
                for _ in digits..9 {
                    nanos *= 10;
                }
                time.nanosecond = nanos;
                time.digits = digits as u8;
            }
        }
        value.time = Some(time);

        match input.get(i) {
            Some(b'Z' | b'z') => {
                value.date?;
                value.offset = Some(Offset::Z);
                i += 1;
            }
            Some(&sign @ (b'+' | b'-')) => {
                value.date?;
                let off_hour = fixed_digits(input, i + 1, 2)? as i16;
                if input.get(i + 3) != Some(&b':') {
                    return None;
                }
                let off_minute = fixed_digits(input, i + 4, 2)? as i16;
                if off_hour > 23 || off_minute > 59 {
                    return None;
                }
                let minutes = off_hour * 60 + off_minute;
                let minutes = if sign == b'-' { -minutes } else { minutes };
                value.offset = Some(Offset::Custom { minutes });
                i += 6;
            }
            _ => {}
        }

        Some((i, value))
    }

    /// Returns the date part, if any.
    pub fn date(&self) -> Option<Date> {
        self.date
    }

    /// Returns the time part, if any.
    pub fn time(&self) -> Option<Time> {
        self.time
    }

    /// Returns the UTC offset, present only for offset date-times.
    pub fn offset(&self) -> Option<Offset> {
        self.offset
    }

    /// Converts an offset date-time into a [`chrono::DateTime`].
    ///
    /// Returns [`None`] for the local variants, which do not denote an instant.
    #[cfg(feature = "chrono")]
    #[cfg_attr(docsrs, doc(cfg(feature = "chrono")))]
    pub fn to_chrono(&self) -> Option<chrono::DateTime<chrono::FixedOffset>> {
        let offset = chrono::FixedOffset::east_opt(self.offset?.minutes() as i32 * 60)?;
        self.to_chrono_naive()?
            .and_local_timezone(offset)
            .single()
    }

    /// Converts the date and time parts into a [`chrono::NaiveDateTime`],
    /// ignoring any offset.
    #[cfg(feature = "chrono")]
    #[cfg_attr(docsrs, doc(cfg(feature = "chrono")))]
    pub fn to_chrono_naive(&self) -> Option<chrono::NaiveDateTime> {
        let date = self.date?;
        let time = self.time?;
        let naive_date =
            chrono::NaiveDate::from_ymd_opt(date.year as i32, date.month as u32, date.day as u32)?;
        // chrono encodes a leap second as second 59 with an overflowing nanosecond field.
        let (second, nanos) = if time.second == 60 {
            (59, time.nanosecond + 1_000_000_000)
        } else {
            (time.second as u32, time.nanosecond)
        };
        let naive_time =
            chrono::NaiveTime::from_hms_nano_opt(time.hour as u32, time.minute as u32, second, nanos)?;
        Some(naive_date.and_time(naive_time))
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)?;
        if self.digits > 0 {
            let scaled = self.nanosecond / 10u32.pow(9 - self.digits as u32);
            write!(f, ".{:0width$}", scaled, width = self.digits as usize)?;
        }
        Ok(())
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Offset::Z | Offset::Custom { minutes: 0 } => f.write_str("Z"),
            Offset::Custom { minutes } => {
                let sign = if minutes < 0 { '-' } else { '+' };
                let abs = minutes.unsigned_abs();
                write!(f, "{sign}{:02}:{:02}", abs / 60, abs % 60)
            }
        }
    }
}

impl fmt::Display for Datetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(date) = &self.date {
            date.fmt(f)?;
            if self.time.is_some() {
                f.write_str("T")?;
            }
        }
        if let Some(time) = &self.time {
            time.fmt(f)?;
        }
        if let Some(offset) = &self.offset {
            offset.fmt(f)?;
        }
        Ok(())
    }
}
