//! Typed query methods for the climate dataset.
//!
//! Each method acquires a pooled connection for its own scope and releases
//! it on return, including error returns. Every aggregation re-executes its
//! SQL against the store; there is no caching layer.
//!
//! # Recent Window Convention
//!
//! "Recent" means the 366-day span ending at the dataset's most recent
//! recorded date: observations whose date is strictly greater than
//! (most-recent-date - 366 days). The 366 is a fixed lookback, not a
//! leap-year computation.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use rusqlite::{params, OptionalExtension};

use crate::models::{TempStats, TobsReading};
use crate::{dates, Database, DbError};

/// Fixed lookback, in days, for the recent-observation window.
pub const RECENT_WINDOW_DAYS: i64 = 366;

impl Database {
    /// Get the most recent observation date across all measurements.
    ///
    /// Returns `None` when the measurement table is empty.
    pub fn most_recent_date(&self) -> Result<Option<NaiveDate>, DbError> {
        let conn = self.conn()?;
        let max: Option<String> =
            conn.query_row("SELECT MAX(date) FROM measurement", [], |row| row.get(0))?;
        match max {
            Some(raw) => {
                let date = dates::parse_date(&raw).map_err(|_| DbError::InvalidStoredDate(raw))?;
                Ok(Some(date))
            }
            None => Ok(None),
        }
    }

    /// Get the exclusive lower bound of the recent window, as a date string.
    ///
    /// `None` when the measurement table is empty (no anchor date exists).
    fn recent_cutoff(&self) -> Result<Option<String>, DbError> {
        Ok(self
            .most_recent_date()?
            .map(|latest| dates::format_date(&(latest - Duration::days(RECENT_WINDOW_DAYS)))))
    }

    /// Get precipitation readings grouped by date for the recent window.
    ///
    /// Rows with a NULL precipitation are dropped. Keys are ascending dates;
    /// when several stations report the same date, their values appear under
    /// that key in query row order. An empty measurement table yields an
    /// empty map.
    pub fn precipitation_by_date(&self) -> Result<BTreeMap<String, Vec<f64>>, DbError> {
        let Some(cutoff) = self.recent_cutoff()? else {
            return Ok(BTreeMap::new());
        };

        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT date, prcp FROM measurement
             WHERE date > ?1 AND prcp IS NOT NULL
             ORDER BY date",
        )?;
        let rows: Vec<(String, f64)> = stmt
            .query_map(params![cutoff], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut by_date: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for (date, prcp) in rows {
            by_date.entry(date).or_default().push(prcp);
        }
        log::info!(
            "query: precipitation_by_date returned {} dates",
            by_date.len()
        );
        Ok(by_date)
    }

    /// Get the station with the most measurement rows.
    ///
    /// Ties are resolved by whichever row SQLite returns first for equal
    /// counts; that order is store-dependent, not guaranteed. Returns `None`
    /// when the measurement table is empty.
    pub fn most_active_station(&self) -> Result<Option<String>, DbError> {
        let conn = self.conn()?;
        let station = conn
            .query_row(
                "SELECT station FROM measurement
                 GROUP BY station
                 ORDER BY COUNT(station) DESC
                 LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(station)
    }

    /// Get the most-active station's temperature readings within the recent
    /// window, ordered chronologically.
    ///
    /// Rows with a NULL temperature are dropped. An empty measurement table
    /// yields an empty vec.
    pub fn recent_station_temperatures(&self) -> Result<Vec<TobsReading>, DbError> {
        let (Some(station), Some(cutoff)) = (self.most_active_station()?, self.recent_cutoff()?)
        else {
            return Ok(Vec::new());
        };

        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT date, tobs FROM measurement
             WHERE station = ?1 AND date > ?2 AND tobs IS NOT NULL
             ORDER BY date",
        )?;
        let rows = stmt
            .query_map(params![station, cutoff], |row| {
                Ok(TobsReading {
                    date: row.get(0)?,
                    temperature: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!(
            "query: recent_station_temperatures returned {} readings for {}",
            rows.len(),
            station
        );
        Ok(rows)
    }

    /// Get all station names, one entry per station row, in store order.
    pub fn station_names(&self) -> Result<Vec<String>, DbError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT name FROM station")?;
        let rows = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!("query: station_names returned {} stations", rows.len());
        Ok(rows)
    }

    /// Get min/max/avg temperature for measurements with `date >= start`,
    /// bounded above by `end` (inclusive) when given.
    ///
    /// SQL aggregates over zero rows are NULL, so all three statistics come
    /// back `None` for a range matching nothing.
    pub fn temperature_stats(
        &self,
        start: &NaiveDate,
        end: Option<&NaiveDate>,
    ) -> Result<TempStats, DbError> {
        let conn = self.conn()?;
        let read_stats = |row: &rusqlite::Row<'_>| {
            Ok(TempStats {
                min: row.get(0)?,
                max: row.get(1)?,
                avg: row.get(2)?,
            })
        };
        let stats = match end {
            Some(end) => conn.query_row(
                "SELECT MIN(tobs), MAX(tobs), AVG(tobs) FROM measurement
                 WHERE date >= ?1 AND date <= ?2",
                params![dates::format_date(start), dates::format_date(end)],
                read_stats,
            )?,
            None => conn.query_row(
                "SELECT MIN(tobs), MAX(tobs), AVG(tobs) FROM measurement
                 WHERE date >= ?1",
                params![dates::format_date(start)],
                read_stats,
            )?,
        };
        Ok(stats)
    }

    /// Get the measurement row count.
    pub fn measurement_count(&self) -> Result<i64, DbError> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM measurement", [], |row| row.get(0))?;
        Ok(count)
    }
}
