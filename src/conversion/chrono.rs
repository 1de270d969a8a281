//! Chrono crate type implementations (NaiveDate, NaiveDateTime, DateTime<Utc>).
//!
//! `timestamp` / `timestamptz` fields are 8-byte microseconds since the
//! PostgreSQL epoch, `date` fields are 4-byte days since the same epoch.

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};

use crate::error::{Error, Result};
use crate::protocol::codec::{write_bytes, write_i32};

use super::{FromWireValue, ToWireValue};

/// PostgreSQL epoch: 2000-01-01
const PG_EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(2000, 1, 1) {
    Some(d) => d,
    None => panic!("invalid date"),
};

fn pg_epoch_datetime() -> NaiveDateTime {
    PG_EPOCH.and_time(NaiveTime::MIN)
}

fn read_usecs(target: &'static str, bytes: &[u8]) -> Result<i64> {
    let arr: [u8; 8] = bytes.try_into().map_err(|_| Error::UnsupportedWidth {
        target,
        width: bytes.len(),
    })?;
    Ok(i64::from_be_bytes(arr))
}

fn write_usecs(buf: &mut Vec<u8>, usecs: i64) {
    write_i32(buf, 8);
    write_bytes(buf, &usecs.to_be_bytes());
}

impl FromWireValue<'_> for NaiveDate {
    fn from_binary(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; 4] = bytes.try_into().map_err(|_| Error::UnsupportedWidth {
            target: "NaiveDate",
            width: bytes.len(),
        })?;
        let pg_days = i32::from_be_bytes(arr);
        let days = Days::new(pg_days.unsigned_abs() as u64);
        if pg_days >= 0 {
            PG_EPOCH.checked_add_days(days)
        } else {
            PG_EPOCH.checked_sub_days(days)
        }
        .ok_or_else(|| Error::Decode(format!("date out of range: {} days", pg_days)))
    }
}

impl ToWireValue for NaiveDate {
    fn to_binary(&self, buf: &mut Vec<u8>) -> Result<()> {
        let days = self.signed_duration_since(PG_EPOCH).num_days();
        let pg_days = i32::try_from(days).map_err(|_| Error::NumericOverflow {
            target: "date",
            value: days as i128,
        })?;
        write_i32(buf, 4);
        write_bytes(buf, &pg_days.to_be_bytes());
        Ok(())
    }
}

impl FromWireValue<'_> for NaiveDateTime {
    fn from_binary(bytes: &[u8]) -> Result<Self> {
        let usecs = read_usecs("NaiveDateTime", bytes)?;
        pg_epoch_datetime()
            .checked_add_signed(TimeDelta::microseconds(usecs))
            .ok_or_else(|| Error::Decode(format!("timestamp out of range: {} usecs", usecs)))
    }
}

impl ToWireValue for NaiveDateTime {
    fn to_binary(&self, buf: &mut Vec<u8>) -> Result<()> {
        // `subsec_nanos` carries the sign of the delta; flooring it rounds toward the past.
        let delta = self.signed_duration_since(pg_epoch_datetime());
        let usecs = delta
            .num_seconds()
            .checked_mul(1_000_000)
            .and_then(|secs| secs.checked_add(i64::from(delta.subsec_nanos()).div_euclid(1000)))
            .ok_or_else(|| Error::Decode(format!("timestamp out of range: {}", self)))?;
        write_usecs(buf, usecs);
        Ok(())
    }
}

impl FromWireValue<'_> for DateTime<Utc> {
    fn from_binary(bytes: &[u8]) -> Result<Self> {
        NaiveDateTime::from_binary(bytes).map(|naive| naive.and_utc())
    }
}

impl ToWireValue for DateTime<Utc> {
    fn to_binary(&self, buf: &mut Vec<u8>) -> Result<()> {
        self.naive_utc().to_binary(buf)
    }
}
