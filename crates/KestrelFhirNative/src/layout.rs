//! The closed set of nullable primitive wrapper shapes the native parser
//! emits, and their readers.
//!
//! Every primitive field of a native record uses one of five fixed layouts:
//!
//! - `OptBool` (4 bytes): present flag `u8`, value `u8`, padding
//! - `OptInt` (8 bytes): present flag `u32`, value `i32`
//! - `TextOpt` (12 bytes): span offset `u32`, span length `u32`, present flag `u32`
//! - `Text` (8 bytes): span offset `u32`, span length `u32` (zero offset = absent)
//! - `DateTime` (16 bytes): packed calendar components with a precision marker
//!
//! Readers return `Option`: absence is ordinary data here, never an error.

use chrono::{FixedOffset, NaiveDate, NaiveTime};
use kestrel_fhir_lib::date_time::{
    DateTimePrecision, PrecisionDate, PrecisionDateTime, PrecisionInstant, PrecisionTime,
};

use crate::arena::StructView;

/// Shape discriminator for primitive wrapper fields in the schema tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapperKind {
    OptBool,
    OptInt,
    TextOpt,
    Text,
    DateTime,
}

impl WrapperKind {
    /// In-record size of this wrapper shape, in bytes.
    pub fn size(self) -> u32 {
        match self {
            WrapperKind::OptBool => 4,
            WrapperKind::OptInt => 8,
            WrapperKind::TextOpt => 12,
            WrapperKind::Text => 8,
            WrapperKind::DateTime => 16,
        }
    }
}

/// Offset of the type tag within every record.
pub const RECORD_TAG_OFFSET: u32 = 0;
/// Offset of the extension side-channel anchor within every record.
pub const RECORD_EXT_OFFSET: u32 = 4;
/// Size of the common record header (tag + extension anchor).
pub const RECORD_HEADER_SIZE: u32 = 8;

/// Precision marker values carried by the packed date/time wrapper.
pub mod precision {
    pub const YEAR: u8 = 0;
    pub const MONTH: u8 = 1;
    pub const DAY: u8 = 2;
    pub const HOUR: u8 = 3;
    pub const MINUTE: u8 = 4;
    pub const SECOND: u8 = 5;
    pub const MILLI: u8 = 6;
}

/// Reads an optional boolean wrapper.
pub fn opt_bool(view: &StructView<'_>, offset: u32) -> Option<bool> {
    if view.u8_at(offset) == 0 {
        return None;
    }
    Some(view.u8_at(offset + 1) != 0)
}

/// Reads an optional 32-bit integer wrapper.
pub fn opt_int(view: &StructView<'_>, offset: u32) -> Option<i32> {
    if view.u32_at(offset) == 0 {
        return None;
    }
    Some(view.i32_at(offset + 4))
}

/// Reads a text span with a present flag.
pub fn text_opt(view: &StructView<'_>, offset: u32) -> Option<String> {
    if view.u32_at(offset + 8) == 0 {
        return None;
    }
    view.str_span(offset).map(str::to_owned)
}

/// Reads a bare text span (absent when the span offset is zero).
pub fn text(view: &StructView<'_>, offset: u32) -> Option<String> {
    view.str_span(offset).map(str::to_owned)
}

/// The packed date/time wrapper, decoded field-by-field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedDateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub precision: u8,
    pub milli: u16,
    pub tz_sign: i8,
    pub tz_hour: u8,
    pub tz_minute: u8,
}

impl PackedDateTime {
    /// Reads the wrapper at `offset`; a zero year means absent.
    pub fn read(view: &StructView<'_>, offset: u32) -> Option<Self> {
        let year = view.u16_at(offset);
        if year == 0 {
            return None;
        }
        Some(PackedDateTime {
            year,
            month: view.u8_at(offset + 2),
            day: view.u8_at(offset + 3),
            hour: view.u8_at(offset + 4),
            minute: view.u8_at(offset + 5),
            second: view.u8_at(offset + 6),
            precision: view.u8_at(offset + 7),
            milli: view.u16_at(offset + 8),
            tz_sign: view.i8_at(offset + 10),
            tz_hour: view.u8_at(offset + 11),
            tz_minute: view.u8_at(offset + 12),
        })
    }

    /// The explicit timezone offset, when one was present on the wire.
    pub fn offset(&self) -> Option<FixedOffset> {
        if self.tz_sign == 0 {
            return None;
        }
        let seconds = i32::from(self.tz_hour) * 3600 + i32::from(self.tz_minute) * 60;
        FixedOffset::east_opt(i32::from(self.tz_sign.signum()) * seconds)
    }
}

/// Converts a packed date/time to a date, truncating finer components.
pub fn date(view: &StructView<'_>, offset: u32) -> Option<PrecisionDate> {
    let packed = PackedDateTime::read(view, offset)?;
    let year = i32::from(packed.year);
    Some(match packed.precision {
        precision::YEAR => PrecisionDate::from_year(year),
        precision::MONTH => PrecisionDate::from_year_month(year, u32::from(packed.month)),
        _ => PrecisionDate::from_ymd(year, u32::from(packed.month), u32::from(packed.day)),
    })
}

/// Converts a packed date/time to a datetime, honoring the precision marker.
pub fn date_time(view: &StructView<'_>, offset: u32) -> Option<PrecisionDateTime> {
    let packed = PackedDateTime::read(view, offset)?;
    let year = i32::from(packed.year);
    let value = match packed.precision {
        precision::YEAR => PrecisionDateTime::from_date(PrecisionDate::from_year(year)),
        precision::MONTH => PrecisionDateTime::from_date(PrecisionDate::from_year_month(
            year,
            u32::from(packed.month),
        )),
        precision::DAY => PrecisionDateTime::from_date(PrecisionDate::from_ymd(
            year,
            u32::from(packed.month),
            u32::from(packed.day),
        )),
        marker => {
            let date_part =
                PrecisionDate::from_ymd(year, u32::from(packed.month), u32::from(packed.day));
            let level = match marker {
                precision::HOUR => DateTimePrecision::DateHour,
                precision::MINUTE => DateTimePrecision::DateHourMinute,
                precision::SECOND => DateTimePrecision::DateHourMinuteSecond,
                _ => DateTimePrecision::Full,
            };
            PrecisionDateTime::with_time(
                date_part,
                u32::from(packed.hour),
                u32::from(packed.minute),
                u32::from(packed.second),
                u32::from(packed.milli),
                level,
                packed.offset(),
            )
        }
    };
    Some(value)
}

/// Converts a packed date/time to an instant.
///
/// Instants require at least second precision and an explicit offset;
/// anything coarser is absent, never zero-filled.
pub fn instant(view: &StructView<'_>, offset: u32) -> Option<PrecisionInstant> {
    let packed = PackedDateTime::read(view, offset)?;
    if packed.precision < precision::SECOND {
        return None;
    }
    let tz = packed.offset()?;
    let milli = if packed.precision >= precision::MILLI {
        u32::from(packed.milli)
    } else {
        0
    };
    let date_part = NaiveDate::from_ymd_opt(
        i32::from(packed.year),
        u32::from(packed.month),
        u32::from(packed.day),
    )?;
    let time_part = NaiveTime::from_hms_milli_opt(
        u32::from(packed.hour),
        u32::from(packed.minute),
        u32::from(packed.second),
        milli,
    )?;
    date_part
        .and_time(time_part)
        .and_local_timezone(tz)
        .single()
        .map(PrecisionInstant::new)
}

/// Converts a packed date/time to a time of day.
///
/// A date-only value has no time-of-day reading and yields absent.
pub fn time(view: &StructView<'_>, offset: u32) -> Option<PrecisionTime> {
    let packed = PackedDateTime::read(view, offset)?;
    let hour = u32::from(packed.hour);
    let minute = u32::from(packed.minute);
    let second = u32::from(packed.second);
    Some(match packed.precision {
        precision::HOUR => PrecisionTime::from_hour(hour),
        precision::MINUTE => PrecisionTime::from_hm(hour, minute),
        precision::SECOND => PrecisionTime::from_hms(hour, minute, second),
        precision::MILLI => {
            PrecisionTime::from_hms_milli(hour, minute, second, u32::from(packed.milli))
        }
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::NativeArena;

    fn packed(values: &PackedDateTime) -> NativeArena {
        let mut arena = NativeArena::new();
        let record = arena.alloc(24);
        let base = record.0 + 8;
        arena.write(base, &values.year.to_le_bytes());
        arena.write(base + 2, &[values.month, values.day, values.hour, values.minute]);
        arena.write(base + 6, &[values.second, values.precision]);
        arena.write(base + 8, &values.milli.to_le_bytes());
        arena.write(
            base + 10,
            &[values.tz_sign as u8, values.tz_hour, values.tz_minute],
        );
        arena
    }

    fn sample() -> PackedDateTime {
        PackedDateTime {
            year: 2020,
            month: 5,
            day: 14,
            hour: 10,
            minute: 30,
            second: 0,
            precision: precision::MILLI,
            milli: 123,
            tz_sign: 1,
            tz_hour: 5,
            tz_minute: 30,
        }
    }

    #[test]
    fn year_precision_truncates_date() {
        let mut values = sample();
        values.precision = precision::YEAR;
        let arena = packed(&values);
        let view = arena.view(crate::arena::NativeRef(4)).unwrap();
        let d = date(&view, 8).unwrap();
        assert_eq!(d.year(), 2020);
        assert_eq!(d.month(), None);
        assert_eq!(d.day(), None);
    }

    #[test]
    fn full_precision_keeps_offset() {
        let arena = packed(&sample());
        let view = arena.view(crate::arena::NativeRef(4)).unwrap();
        let i = instant(&view, 8).unwrap();
        assert_eq!(i.offset(), FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap());
        assert_eq!(i.to_string(), "2020-05-14T10:30:00.123+05:30");
    }

    #[test]
    fn date_precision_has_no_time_reading() {
        let mut values = sample();
        values.precision = precision::DAY;
        let arena = packed(&values);
        let view = arena.view(crate::arena::NativeRef(4)).unwrap();
        assert!(time(&view, 8).is_none());
        assert!(instant(&view, 8).is_none());
    }

    #[test]
    fn zero_year_is_absent() {
        let mut arena = NativeArena::new();
        let record = arena.alloc(24);
        let view = arena.view(record).unwrap();
        assert!(PackedDateTime::read(&view, 8).is_none());
        assert!(date(&view, 8).is_none());
    }

    #[test]
    fn negative_offset_sign_is_honored() {
        let mut values = sample();
        values.tz_sign = -1;
        let arena = packed(&values);
        let view = arena.view(crate::arena::NativeRef(4)).unwrap();
        let dt = date_time(&view, 8).unwrap();
        assert_eq!(dt.offset(), FixedOffset::east_opt(-(5 * 3600 + 30 * 60)));
    }
}
