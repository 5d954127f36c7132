//! Partially populated calendar timestamps
//!
//! A [`Timestamp`] carries any subset of year, month, day, hour, minute,
//! second, a sub-second component and a UTC offset. Absent fields are
//! `None` in memory and absent bits in the control byte on the wire.
//!
//! ## Wire format
//!
//! ```text
//! control:    u8        bit 7 year, 6 month, 5 day, 4 hour,
//!                       3 minute, 2 second, 1 sub-second, 0 offset
//! year:       u16 BE    if bit 7
//! month:      u8        if bit 6
//! day:        u8        if bit 5
//! hour:       u8        if bit 4
//! minute:     u8        if bit 3
//! second:     u8        if bit 2
//! sub_second: u16 BE    if bit 1   (top 2 bits unit, low 10 bits magnitude)
//! offset:     u8        if bit 0   (top bit sign, low 6 bits quarter-hours)
//! ```
//!
//! A control byte of zero is malformed: a timestamp encodes at least one field.

use crate::error::{MobfError, MobfResult};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Timelike};
use std::io::{Read, Write};

const YEAR_BIT: u8 = 1 << 7;
const MONTH_BIT: u8 = 1 << 6;
const DAY_BIT: u8 = 1 << 5;
const HOUR_BIT: u8 = 1 << 4;
const MINUTE_BIT: u8 = 1 << 3;
const SECOND_BIT: u8 = 1 << 2;
const SUB_SECOND_BIT: u8 = 1 << 1;
const OFFSET_BIT: u8 = 1;

/// Largest sub-second magnitude (10 bits)
pub const MAX_SUB_SECOND_MAGNITUDE: u16 = 0x03FF;

/// Largest absolute offset in quarter-hours (6 bits)
pub const MAX_OFFSET_QUARTERS: i8 = 0x3F;

const SECONDS_PER_QUARTER: i32 = 15 * 60;

/// Unit of the sub-second component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubSecondUnit {
    /// Milliseconds (tag 0)
    Millis,
    /// Microseconds (tag 1)
    Micros,
    /// Nanoseconds (tag 2)
    Nanos,
}

impl SubSecondUnit {
    const fn tag(self) -> u16 {
        match self {
            SubSecondUnit::Millis => 0,
            SubSecondUnit::Micros => 1,
            SubSecondUnit::Nanos => 2,
        }
    }

    fn from_tag(tag: u16) -> MobfResult<Self> {
        match tag {
            0 => Ok(SubSecondUnit::Millis),
            1 => Ok(SubSecondUnit::Micros),
            2 => Ok(SubSecondUnit::Nanos),
            other => Err(MobfError::malformed_timestamp(format!(
                "unknown sub-second unit tag {}",
                other
            ))),
        }
    }

    const fn nanos_per_unit(self) -> u32 {
        match self {
            SubSecondUnit::Millis => 1_000_000,
            SubSecondUnit::Micros => 1_000,
            SubSecondUnit::Nanos => 1,
        }
    }
}

/// Sub-second component: a unit plus a 10-bit magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubSecond {
    unit: SubSecondUnit,
    magnitude: u16,
}

impl SubSecond {
    /// Create a sub-second component; `magnitude` must fit in 10 bits
    pub fn new(unit: SubSecondUnit, magnitude: u16) -> MobfResult<Self> {
        if magnitude > MAX_SUB_SECOND_MAGNITUDE {
            return Err(MobfError::InvalidTimestampField {
                field: "sub_second",
                value: magnitude as i64,
            });
        }
        Ok(SubSecond { unit, magnitude })
    }

    /// Unit
    pub fn unit(&self) -> SubSecondUnit {
        self.unit
    }

    /// Magnitude in `unit`
    pub fn magnitude(&self) -> u16 {
        self.magnitude
    }

    fn to_wire(self) -> u16 {
        (self.unit.tag() << 10) | self.magnitude
    }

    fn from_wire(raw: u16) -> MobfResult<Self> {
        let unit = SubSecondUnit::from_tag(raw >> 10)?;
        Ok(SubSecond {
            unit,
            magnitude: raw & MAX_SUB_SECOND_MAGNITUDE,
        })
    }
}

/// UTC offset in signed quarter-hours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtcOffset(i8);

impl UtcOffset {
    /// UTC itself
    pub const UTC: UtcOffset = UtcOffset(0);

    /// Create an offset of `quarters` * 15 minutes; at most 63 quarters either way
    pub fn from_quarters(quarters: i8) -> MobfResult<Self> {
        if !(-MAX_OFFSET_QUARTERS..=MAX_OFFSET_QUARTERS).contains(&quarters) {
            return Err(MobfError::InvalidTimestampField {
                field: "offset",
                value: quarters as i64,
            });
        }
        Ok(UtcOffset(quarters))
    }

    /// Create an offset from seconds east of UTC; must be a whole quarter-hour
    pub fn from_seconds(seconds: i32) -> MobfResult<Self> {
        let quarters = seconds / SECONDS_PER_QUARTER;
        if seconds % SECONDS_PER_QUARTER != 0 || quarters.abs() > MAX_OFFSET_QUARTERS as i32 {
            return Err(MobfError::InvalidTimestampField {
                field: "offset",
                value: seconds as i64,
            });
        }
        Ok(UtcOffset(quarters as i8))
    }

    /// Signed quarter-hours east of UTC
    pub fn quarters(&self) -> i8 {
        self.0
    }

    /// Seconds east of UTC
    pub fn seconds(&self) -> i32 {
        self.0 as i32 * SECONDS_PER_QUARTER
    }

    fn to_wire(self) -> u8 {
        let magnitude = self.0.unsigned_abs();
        if self.0 < 0 {
            0x80 | magnitude
        } else {
            magnitude
        }
    }

    fn from_wire(raw: u8) -> MobfResult<Self> {
        if raw & 0x40 != 0 {
            return Err(MobfError::malformed_timestamp(format!(
                "offset byte 0x{:02x} sets reserved bit 6",
                raw
            )));
        }
        let magnitude = (raw & 0x3F) as i8;
        match (raw & 0x80 != 0, magnitude) {
            (true, 0) => Err(MobfError::malformed_timestamp("negative zero offset")),
            (true, _) => Ok(UtcOffset(-magnitude)),
            (false, _) => Ok(UtcOffset(magnitude)),
        }
    }
}

/// Calendar value whose fields are independently present or absent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Timestamp {
    year: Option<u16>,
    month: Option<u8>,
    day: Option<u8>,
    hour: Option<u8>,
    minute: Option<u8>,
    second: Option<u8>,
    sub_second: Option<SubSecond>,
    offset: Option<UtcOffset>,
}

fn check_range(field: &'static str, value: u8, min: u8, max: u8) -> MobfResult<u8> {
    if value < min || value > max {
        return Err(MobfError::InvalidTimestampField {
            field,
            value: value as i64,
        });
    }
    Ok(value)
}

impl Timestamp {
    /// Empty timestamp; at least one field must be set before encoding
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Builders
    // =========================================================================

    /// Set the year
    pub fn with_year(mut self, year: u16) -> Self {
        self.year = Some(year);
        self
    }

    /// Set the month (1-12)
    pub fn with_month(mut self, month: u8) -> MobfResult<Self> {
        self.month = Some(check_range("month", month, 1, 12)?);
        Ok(self)
    }

    /// Set the day of month (1-31)
    pub fn with_day(mut self, day: u8) -> MobfResult<Self> {
        self.day = Some(check_range("day", day, 1, 31)?);
        Ok(self)
    }

    /// Set the hour (0-23)
    pub fn with_hour(mut self, hour: u8) -> MobfResult<Self> {
        self.hour = Some(check_range("hour", hour, 0, 23)?);
        Ok(self)
    }

    /// Set the minute (0-59)
    pub fn with_minute(mut self, minute: u8) -> MobfResult<Self> {
        self.minute = Some(check_range("minute", minute, 0, 59)?);
        Ok(self)
    }

    /// Set the second (0-59)
    pub fn with_second(mut self, second: u8) -> MobfResult<Self> {
        self.second = Some(check_range("second", second, 0, 59)?);
        Ok(self)
    }

    /// Set the sub-second component
    pub fn with_sub_second(mut self, sub_second: SubSecond) -> Self {
        self.sub_second = Some(sub_second);
        self
    }

    /// Set the UTC offset
    pub fn with_offset(mut self, offset: UtcOffset) -> Self {
        self.offset = Some(offset);
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Year, if present
    pub fn year(&self) -> Option<u16> {
        self.year
    }

    /// Month, if present
    pub fn month(&self) -> Option<u8> {
        self.month
    }

    /// Day, if present
    pub fn day(&self) -> Option<u8> {
        self.day
    }

    /// Hour, if present
    pub fn hour(&self) -> Option<u8> {
        self.hour
    }

    /// Minute, if present
    pub fn minute(&self) -> Option<u8> {
        self.minute
    }

    /// Second, if present
    pub fn second(&self) -> Option<u8> {
        self.second
    }

    /// Sub-second component, if present
    pub fn sub_second(&self) -> Option<SubSecond> {
        self.sub_second
    }

    /// UTC offset, if present
    pub fn offset(&self) -> Option<UtcOffset> {
        self.offset
    }

    /// True if no field is present
    pub fn is_empty(&self) -> bool {
        self.control_byte() == 0
    }

    // =========================================================================
    // chrono interop
    // =========================================================================

    /// Capture every field of `dt`, with millisecond sub-second precision
    pub fn from_datetime(dt: &DateTime<FixedOffset>) -> MobfResult<Self> {
        let year = u16::try_from(dt.year()).map_err(|_| MobfError::InvalidTimestampField {
            field: "year",
            value: dt.year() as i64,
        })?;
        // Leap seconds are reported as nanosecond >= 1e9
        let millis = ((dt.nanosecond() % 1_000_000_000) / 1_000_000) as u16;
        let offset = UtcOffset::from_seconds(dt.offset().local_minus_utc())?;

        Ok(Timestamp {
            year: Some(year),
            month: Some(dt.month() as u8),
            day: Some(dt.day() as u8),
            hour: Some(dt.hour() as u8),
            minute: Some(dt.minute() as u8),
            second: Some(dt.second() as u8),
            sub_second: Some(SubSecond::new(SubSecondUnit::Millis, millis)?),
            offset: Some(offset),
        })
    }

    /// Convert to a `chrono` datetime
    ///
    /// Requires year, month and day. Missing time fields read as zero and a
    /// missing offset reads as UTC. Returns `None` for impossible dates.
    pub fn to_datetime(&self) -> Option<DateTime<FixedOffset>> {
        let date = NaiveDate::from_ymd_opt(
            self.year? as i32,
            self.month? as u32,
            self.day? as u32,
        )?;
        let nanos = self
            .sub_second
            .map(|s| s.magnitude as u32 * s.unit.nanos_per_unit())
            .unwrap_or(0);
        let naive = date.and_hms_nano_opt(
            self.hour.unwrap_or(0) as u32,
            self.minute.unwrap_or(0) as u32,
            self.second.unwrap_or(0) as u32,
            nanos,
        )?;
        let offset = FixedOffset::east_opt(self.offset.unwrap_or(UtcOffset::UTC).seconds())?;
        naive.and_local_timezone(offset).single()
    }

    // =========================================================================
    // Wire encoding
    // =========================================================================

    /// Presence bitmask
    pub fn control_byte(&self) -> u8 {
        let mut control = 0u8;
        if self.year.is_some() {
            control |= YEAR_BIT;
        }
        if self.month.is_some() {
            control |= MONTH_BIT;
        }
        if self.day.is_some() {
            control |= DAY_BIT;
        }
        if self.hour.is_some() {
            control |= HOUR_BIT;
        }
        if self.minute.is_some() {
            control |= MINUTE_BIT;
        }
        if self.second.is_some() {
            control |= SECOND_BIT;
        }
        if self.sub_second.is_some() {
            control |= SUB_SECOND_BIT;
        }
        if self.offset.is_some() {
            control |= OFFSET_BIT;
        }
        control
    }

    /// Write control byte and present fields; returns bytes written
    pub fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> MobfResult<usize> {
        let control = self.control_byte();
        if control == 0 {
            return Err(MobfError::malformed_timestamp(
                "timestamp has no fields to encode",
            ));
        }

        w.write_u8(control)?;
        let mut len = 1;
        if let Some(year) = self.year {
            w.write_u16::<BigEndian>(year)?;
            len += 2;
        }
        for field in [self.month, self.day, self.hour, self.minute, self.second]
            .into_iter()
            .flatten()
        {
            w.write_u8(field)?;
            len += 1;
        }
        if let Some(sub_second) = self.sub_second {
            w.write_u16::<BigEndian>(sub_second.to_wire())?;
            len += 2;
        }
        if let Some(offset) = self.offset {
            w.write_u8(offset.to_wire())?;
            len += 1;
        }
        Ok(len)
    }

    /// Read a timestamp written by [`Timestamp::write_to`]
    pub fn read_from<R: Read + ?Sized>(r: &mut R) -> MobfResult<Self> {
        let control = r.read_u8()?;
        if control == 0 {
            return Err(MobfError::malformed_timestamp("control byte is zero"));
        }

        let malformed = |e: MobfError| match e {
            MobfError::InvalidTimestampField { field, value } => {
                MobfError::malformed_timestamp(format!("{} out of range: {}", field, value))
            }
            other => other,
        };

        let mut ts = Timestamp::new();
        if control & YEAR_BIT != 0 {
            ts.year = Some(r.read_u16::<BigEndian>()?);
        }
        if control & MONTH_BIT != 0 {
            ts = ts.with_month(r.read_u8()?).map_err(malformed)?;
        }
        if control & DAY_BIT != 0 {
            ts = ts.with_day(r.read_u8()?).map_err(malformed)?;
        }
        if control & HOUR_BIT != 0 {
            ts = ts.with_hour(r.read_u8()?).map_err(malformed)?;
        }
        if control & MINUTE_BIT != 0 {
            ts = ts.with_minute(r.read_u8()?).map_err(malformed)?;
        }
        if control & SECOND_BIT != 0 {
            ts = ts.with_second(r.read_u8()?).map_err(malformed)?;
        }
        if control & SUB_SECOND_BIT != 0 {
            ts.sub_second = Some(SubSecond::from_wire(r.read_u16::<BigEndian>()?)?);
        }
        if control & OFFSET_BIT != 0 {
            ts.offset = Some(UtcOffset::from_wire(r.read_u8()?)?);
        }
        Ok(ts)
    }
}
