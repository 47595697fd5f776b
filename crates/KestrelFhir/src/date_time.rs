use std::fmt;
use std::str::FromStr;

use chrono::{DateTime as ChronoDateTime, FixedOffset, NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Precision levels for FHIR Date values.
///
/// FHIR dates support partial precision, allowing year-only, year-month,
/// or full date specifications. This enum tracks which components are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DatePrecision {
    /// Year only (YYYY)
    Year,
    /// Year and month (YYYY-MM)
    YearMonth,
    /// Full date (YYYY-MM-DD)
    Full,
}

/// Precision levels for FHIR Time values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimePrecision {
    /// Hour only (HH)
    Hour,
    /// Hour and minute (HH:MM)
    HourMinute,
    /// Hour, minute, and second (HH:MM:SS)
    HourMinuteSecond,
    /// Full time with sub-second precision (HH:MM:SS.sss)
    Millisecond,
}

/// Precision levels for FHIR DateTime values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DateTimePrecision {
    /// Year only (YYYY)
    Year,
    /// Year and month (YYYY-MM)
    YearMonth,
    /// Date only (YYYY-MM-DD)
    Date,
    /// Date with hour (YYYY-MM-DDTHH)
    DateHour,
    /// Date with hour and minute (YYYY-MM-DDTHH:MM)
    DateHourMinute,
    /// Date with time to seconds (YYYY-MM-DDTHH:MM:SS)
    DateHourMinuteSecond,
    /// Full datetime with sub-second precision (YYYY-MM-DDTHH:MM:SS.sss)
    Full,
}

/// Precision-aware FHIR Date value.
///
/// Preserves the declared precision of the source data, so a year-only date
/// renders as `2020` rather than being zero-filled to `2020-01-01`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrecisionDate {
    year: i32,
    month: Option<u32>,
    day: Option<u32>,
    precision: DatePrecision,
}

impl PrecisionDate {
    /// Creates a year-only date.
    pub fn from_year(year: i32) -> Self {
        PrecisionDate {
            year,
            month: None,
            day: None,
            precision: DatePrecision::Year,
        }
    }

    /// Creates a year-month date.
    pub fn from_year_month(year: i32, month: u32) -> Self {
        PrecisionDate {
            year,
            month: Some(month),
            day: None,
            precision: DatePrecision::YearMonth,
        }
    }

    /// Creates a full date.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Self {
        PrecisionDate {
            year,
            month: Some(month),
            day: Some(day),
            precision: DatePrecision::Full,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> Option<u32> {
        self.month
    }

    pub fn day(&self) -> Option<u32> {
        self.day
    }

    pub fn precision(&self) -> DatePrecision {
        self.precision
    }

    /// Converts to a calendar date when full precision is available.
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        match (self.month, self.day) {
            (Some(month), Some(day)) => NaiveDate::from_ymd_opt(self.year, month, day),
            _ => None,
        }
    }
}

impl fmt::Display for PrecisionDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.precision {
            DatePrecision::Year => write!(f, "{:04}", self.year),
            DatePrecision::YearMonth => {
                write!(f, "{:04}-{:02}", self.year, self.month.unwrap_or(1))
            }
            DatePrecision::Full => write!(
                f,
                "{:04}-{:02}-{:02}",
                self.year,
                self.month.unwrap_or(1),
                self.day.unwrap_or(1)
            ),
        }
    }
}

impl FromStr for PrecisionDate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, '-');
        let year: i32 = parts
            .next()
            .ok_or_else(|| format!("empty date: {:?}", s))?
            .parse()
            .map_err(|_| format!("invalid year in date: {:?}", s))?;
        let month = match parts.next() {
            Some(m) => Some(
                m.parse::<u32>()
                    .map_err(|_| format!("invalid month in date: {:?}", s))?,
            ),
            None => return Ok(PrecisionDate::from_year(year)),
        };
        match parts.next() {
            Some(d) => {
                let day = d
                    .parse::<u32>()
                    .map_err(|_| format!("invalid day in date: {:?}", s))?;
                Ok(PrecisionDate::from_ymd(year, month.unwrap_or(1), day))
            }
            None => Ok(PrecisionDate::from_year_month(year, month.unwrap_or(1))),
        }
    }
}

/// Precision-aware FHIR Time value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrecisionTime {
    hour: u32,
    minute: Option<u32>,
    second: Option<u32>,
    millisecond: Option<u32>,
    precision: TimePrecision,
}

impl PrecisionTime {
    pub fn from_hour(hour: u32) -> Self {
        PrecisionTime {
            hour,
            minute: None,
            second: None,
            millisecond: None,
            precision: TimePrecision::Hour,
        }
    }

    pub fn from_hm(hour: u32, minute: u32) -> Self {
        PrecisionTime {
            hour,
            minute: Some(minute),
            second: None,
            millisecond: None,
            precision: TimePrecision::HourMinute,
        }
    }

    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Self {
        PrecisionTime {
            hour,
            minute: Some(minute),
            second: Some(second),
            millisecond: None,
            precision: TimePrecision::HourMinuteSecond,
        }
    }

    pub fn from_hms_milli(hour: u32, minute: u32, second: u32, millisecond: u32) -> Self {
        PrecisionTime {
            hour,
            minute: Some(minute),
            second: Some(second),
            millisecond: Some(millisecond),
            precision: TimePrecision::Millisecond,
        }
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> Option<u32> {
        self.minute
    }

    pub fn second(&self) -> Option<u32> {
        self.second
    }

    pub fn millisecond(&self) -> Option<u32> {
        self.millisecond
    }

    pub fn precision(&self) -> TimePrecision {
        self.precision
    }

    /// Converts to a chrono time when at least second precision is available.
    pub fn to_naive_time(&self) -> Option<NaiveTime> {
        match (self.minute, self.second) {
            (Some(minute), Some(second)) => NaiveTime::from_hms_milli_opt(
                self.hour,
                minute,
                second,
                self.millisecond.unwrap_or(0),
            ),
            _ => None,
        }
    }
}

impl fmt::Display for PrecisionTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.precision {
            TimePrecision::Hour => write!(f, "{:02}", self.hour),
            TimePrecision::HourMinute => {
                write!(f, "{:02}:{:02}", self.hour, self.minute.unwrap_or(0))
            }
            TimePrecision::HourMinuteSecond => write!(
                f,
                "{:02}:{:02}:{:02}",
                self.hour,
                self.minute.unwrap_or(0),
                self.second.unwrap_or(0)
            ),
            TimePrecision::Millisecond => write!(
                f,
                "{:02}:{:02}:{:02}.{:03}",
                self.hour,
                self.minute.unwrap_or(0),
                self.second.unwrap_or(0),
                self.millisecond.unwrap_or(0)
            ),
        }
    }
}

/// Precision-aware FHIR DateTime value with optional timezone offset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrecisionDateTime {
    date: PrecisionDate,
    hour: Option<u32>,
    minute: Option<u32>,
    second: Option<u32>,
    millisecond: Option<u32>,
    offset: Option<FixedOffset>,
    precision: DateTimePrecision,
}

impl PrecisionDateTime {
    /// Creates a datetime carrying only date components.
    pub fn from_date(date: PrecisionDate) -> Self {
        let precision = match date.precision() {
            DatePrecision::Year => DateTimePrecision::Year,
            DatePrecision::YearMonth => DateTimePrecision::YearMonth,
            DatePrecision::Full => DateTimePrecision::Date,
        };
        PrecisionDateTime {
            date,
            hour: None,
            minute: None,
            second: None,
            millisecond: None,
            offset: None,
            precision,
        }
    }

    /// Creates a datetime with explicit time components and precision.
    ///
    /// `precision` must be one of the time-bearing levels; the corresponding
    /// finer components are ignored when the precision says they are absent.
    pub fn with_time(
        date: PrecisionDate,
        hour: u32,
        minute: u32,
        second: u32,
        millisecond: u32,
        precision: DateTimePrecision,
        offset: Option<FixedOffset>,
    ) -> Self {
        let minute_present = precision >= DateTimePrecision::DateHourMinute;
        let second_present = precision >= DateTimePrecision::DateHourMinuteSecond;
        let milli_present = precision >= DateTimePrecision::Full;
        PrecisionDateTime {
            date,
            hour: Some(hour),
            minute: minute_present.then_some(minute),
            second: second_present.then_some(second),
            millisecond: milli_present.then_some(millisecond),
            offset,
            precision,
        }
    }

    pub fn date(&self) -> &PrecisionDate {
        &self.date
    }

    pub fn hour(&self) -> Option<u32> {
        self.hour
    }

    pub fn minute(&self) -> Option<u32> {
        self.minute
    }

    pub fn second(&self) -> Option<u32> {
        self.second
    }

    pub fn millisecond(&self) -> Option<u32> {
        self.millisecond
    }

    pub fn offset(&self) -> Option<FixedOffset> {
        self.offset
    }

    pub fn precision(&self) -> DateTimePrecision {
        self.precision
    }

    /// Converts to a chrono datetime when date, seconds and offset are known.
    pub fn to_fixed(&self) -> Option<ChronoDateTime<FixedOffset>> {
        let date = self.date.to_naive_date()?;
        let time = NaiveTime::from_hms_milli_opt(
            self.hour?,
            self.minute?,
            self.second?,
            self.millisecond.unwrap_or(0),
        )?;
        let offset = self.offset?;
        date.and_time(time).and_local_timezone(offset).single()
    }
}

fn write_offset(f: &mut fmt::Formatter<'_>, offset: FixedOffset) -> fmt::Result {
    let seconds = offset.local_minus_utc();
    if seconds == 0 {
        return write!(f, "Z");
    }
    let sign = if seconds < 0 { '-' } else { '+' };
    let abs = seconds.unsigned_abs();
    write!(f, "{}{:02}:{:02}", sign, abs / 3600, (abs % 3600) / 60)
}

impl fmt::Display for PrecisionDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.date.fmt(f)?;
        if self.precision < DateTimePrecision::DateHour {
            return Ok(());
        }
        write!(f, "T{:02}", self.hour.unwrap_or(0))?;
        if let Some(minute) = self.minute {
            write!(f, ":{:02}", minute)?;
        }
        if let Some(second) = self.second {
            write!(f, ":{:02}", second)?;
        }
        if let Some(milli) = self.millisecond {
            write!(f, ".{:03}", milli)?;
        }
        if let Some(offset) = self.offset {
            write_offset(f, offset)?;
        }
        Ok(())
    }
}

impl FromStr for PrecisionDateTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (date_part, time_part) = match s.split_once('T') {
            Some((d, t)) => (d, Some(t)),
            None => (s, None),
        };
        let date: PrecisionDate = date_part.parse()?;
        let Some(time_part) = time_part else {
            return Ok(PrecisionDateTime::from_date(date));
        };

        // Split the timezone suffix off the time components.
        let (clock, offset) = if let Some(stripped) = time_part.strip_suffix('Z') {
            (stripped, Some(FixedOffset::east_opt(0).ok_or("offset")?))
        } else if let Some(pos) = time_part.rfind(['+', '-']) {
            let (clock, tz) = time_part.split_at(pos);
            let sign = if tz.starts_with('-') { -1 } else { 1 };
            let body = &tz[1..];
            let (th, tm) = body
                .split_once(':')
                .ok_or_else(|| format!("invalid offset in {:?}", s))?;
            let th: i32 = th.parse().map_err(|_| format!("invalid offset in {:?}", s))?;
            let tm: i32 = tm.parse().map_err(|_| format!("invalid offset in {:?}", s))?;
            let offset = FixedOffset::east_opt(sign * (th * 3600 + tm * 60))
                .ok_or_else(|| format!("offset out of range in {:?}", s))?;
            (clock, Some(offset))
        } else {
            (time_part, None)
        };

        let mut hour = 0;
        let mut minute = 0;
        let mut second = 0;
        let mut milli = 0;
        let mut precision = DateTimePrecision::DateHour;
        for (i, piece) in clock.splitn(3, ':').enumerate() {
            match i {
                0 => {
                    hour = piece
                        .parse()
                        .map_err(|_| format!("invalid hour in {:?}", s))?
                }
                1 => {
                    minute = piece
                        .parse()
                        .map_err(|_| format!("invalid minute in {:?}", s))?;
                    precision = DateTimePrecision::DateHourMinute;
                }
                _ => {
                    if let Some((sec, frac)) = piece.split_once('.') {
                        second = sec
                            .parse()
                            .map_err(|_| format!("invalid second in {:?}", s))?;
                        let frac = format!("{:0<3}", &frac[..frac.len().min(3)]);
                        milli = frac
                            .parse()
                            .map_err(|_| format!("invalid millisecond in {:?}", s))?;
                        precision = DateTimePrecision::Full;
                    } else {
                        second = piece
                            .parse()
                            .map_err(|_| format!("invalid second in {:?}", s))?;
                        precision = DateTimePrecision::DateHourMinuteSecond;
                    }
                }
            }
        }
        Ok(PrecisionDateTime::with_time(
            date, hour, minute, second, milli, precision, offset,
        ))
    }
}

/// FHIR instant: a fully-specified point in time with mandatory offset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrecisionInstant {
    value: ChronoDateTime<FixedOffset>,
}

impl PrecisionInstant {
    pub fn new(value: ChronoDateTime<FixedOffset>) -> Self {
        PrecisionInstant { value }
    }

    pub fn value(&self) -> ChronoDateTime<FixedOffset> {
        self.value
    }

    pub fn offset(&self) -> FixedOffset {
        *self.value.offset()
    }
}

impl fmt::Display for PrecisionInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value.format("%Y-%m-%dT%H:%M:%S%.3f%:z"))
    }
}

impl FromStr for PrecisionInstant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChronoDateTime::parse_from_rfc3339(s)
            .map(PrecisionInstant::new)
            .map_err(|e| format!("invalid instant {:?}: {}", s, e))
    }
}

macro_rules! string_serde {
    ($($t:ty),*) => {
        $(
            impl Serialize for $t {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serializer.collect_str(self)
                }
            }

            impl<'de> Deserialize<'de> for $t {
                fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                    let s = String::deserialize(deserializer)?;
                    s.parse().map_err(serde::de::Error::custom)
                }
            }
        )*
    };
}

string_serde!(PrecisionDate, PrecisionDateTime, PrecisionInstant, PrecisionTime);

impl FromStr for PrecisionTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut hour = None;
        let mut minute = None;
        let mut second = None;
        let mut milli = None;
        for (i, piece) in s.splitn(3, ':').enumerate() {
            match i {
                0 => hour = Some(piece.parse().map_err(|_| format!("invalid hour: {:?}", s))?),
                1 => {
                    minute = Some(
                        piece
                            .parse()
                            .map_err(|_| format!("invalid minute: {:?}", s))?,
                    )
                }
                _ => {
                    if let Some((sec, frac)) = piece.split_once('.') {
                        second = Some(
                            sec.parse()
                                .map_err(|_| format!("invalid second: {:?}", s))?,
                        );
                        let frac = format!("{:0<3}", &frac[..frac.len().min(3)]);
                        milli = Some(
                            frac.parse()
                                .map_err(|_| format!("invalid millisecond: {:?}", s))?,
                        );
                    } else {
                        second = Some(
                            piece
                                .parse()
                                .map_err(|_| format!("invalid second: {:?}", s))?,
                        );
                    }
                }
            }
        }
        let hour = hour.ok_or_else(|| format!("empty time: {:?}", s))?;
        Ok(match (minute, second, milli) {
            (None, _, _) => PrecisionTime::from_hour(hour),
            (Some(m), None, _) => PrecisionTime::from_hm(hour, m),
            (Some(m), Some(sec), None) => PrecisionTime::from_hms(hour, m, sec),
            (Some(m), Some(sec), Some(ms)) => PrecisionTime::from_hms_milli(hour, m, sec, ms),
        })
    }
}
