//! Time crate type implementations (Date, PrimitiveDateTime, OffsetDateTime).

use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::error::{Error, Result};
use crate::protocol::codec::{write_bytes, write_i32};

use super::{FromWireValue, ToWireValue};

/// PostgreSQL epoch is 2000-01-01, whose Julian day is 2451545
const PG_EPOCH_JULIAN_DAY: i32 = 2_451_545;

/// PostgreSQL epoch as microseconds since the Unix epoch
const PG_EPOCH_UNIX_USECS: i128 = 946_684_800_000_000;

impl FromWireValue<'_> for Date {
    fn from_binary(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; 4] = bytes.try_into().map_err(|_| Error::UnsupportedWidth {
            target: "Date",
            width: bytes.len(),
        })?;
        let pg_days = i32::from_be_bytes(arr);
        let julian = pg_days
            .checked_add(PG_EPOCH_JULIAN_DAY)
            .ok_or_else(|| Error::Decode(format!("date out of range: {} days", pg_days)))?;
        Date::from_julian_day(julian).map_err(|e| Error::Decode(format!("invalid date: {}", e)))
    }
}

impl ToWireValue for Date {
    fn to_binary(&self, buf: &mut Vec<u8>) -> Result<()> {
        let pg_days = self.to_julian_day() - PG_EPOCH_JULIAN_DAY;
        write_i32(buf, 4);
        write_bytes(buf, &pg_days.to_be_bytes());
        Ok(())
    }
}

impl FromWireValue<'_> for OffsetDateTime {
    fn from_binary(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; 8] = bytes.try_into().map_err(|_| Error::UnsupportedWidth {
            target: "OffsetDateTime",
            width: bytes.len(),
        })?;
        let usecs = i64::from_be_bytes(arr) as i128;
        OffsetDateTime::from_unix_timestamp_nanos((usecs + PG_EPOCH_UNIX_USECS) * 1000)
            .map_err(|e| Error::Decode(format!("invalid timestamp: {}", e)))
    }
}

impl ToWireValue for OffsetDateTime {
    fn to_binary(&self, buf: &mut Vec<u8>) -> Result<()> {
        // Floor, so sub-microsecond instants round toward the past on both sides of the epoch.
        let nanos = self.unix_timestamp_nanos() - PG_EPOCH_UNIX_USECS * 1000;
        let usecs = nanos.div_euclid(1000);
        let usecs = i64::try_from(usecs).map_err(|_| Error::NumericOverflow {
            target: "timestamp",
            value: usecs,
        })?;
        write_i32(buf, 8);
        write_bytes(buf, &usecs.to_be_bytes());
        Ok(())
    }
}

impl FromWireValue<'_> for PrimitiveDateTime {
    fn from_binary(bytes: &[u8]) -> Result<Self> {
        let odt = OffsetDateTime::from_binary(bytes)?;
        Ok(PrimitiveDateTime::new(odt.date(), odt.time()))
    }
}

impl ToWireValue for PrimitiveDateTime {
    fn to_binary(&self, buf: &mut Vec<u8>) -> Result<()> {
        self.assume_offset(UtcOffset::UTC).to_binary(buf)
    }
}
