use std::collections::BTreeMap;

use anyhow::Result;

use crate::models::ErrorDay;
use crate::store::LogStore;
use crate::utils::time::date_from_unix_day;

/// A day qualifies only when its error fraction is strictly greater than
/// this; exactly 1.00% stays out.
pub const ERROR_RATE_THRESHOLD: f64 = 0.01;

const ERROR_STATUS_PREFIX: &str = "404";

/// Whether a status line falls in the not-found error class.
#[must_use]
pub fn is_error_status(status: &str) -> bool {
    status.starts_with(ERROR_STATUS_PREFIX)
}

/// Every UTC calendar day on which more than 1% of requests errored,
/// highest error fraction first; ties break on the earlier day.
///
/// The fraction is compared unrounded; rounding happens only when a row is
/// rendered.
pub fn high_error_days(store: &LogStore) -> Result<Vec<ErrorDay>> {
    let mut per_day: BTreeMap<i64, (u64, u64)> = BTreeMap::new();
    for row in store.daily_status_counts()? {
        let (total, errors) = per_day.entry(row.unix_day).or_default();
        *total += row.count;
        if is_error_status(&row.status) {
            *errors += row.count;
        }
    }

    let mut days = Vec::new();
    for (unix_day, (total_requests, error_requests)) in per_day {
        if total_requests == 0 {
            continue;
        }
        let error_fraction = error_requests as f64 / total_requests as f64;
        if error_fraction > ERROR_RATE_THRESHOLD {
            days.push(ErrorDay {
                date: date_from_unix_day(unix_day)?,
                total_requests,
                error_requests,
                error_fraction,
            });
        }
    }

    days.sort_by(|left, right| {
        right
            .error_fraction
            .total_cmp(&left.error_fraction)
            .then_with(|| left.date.cmp(&right.date))
    });
    Ok(days)
}

#[cfg(test)]
mod tests {
    use super::{ERROR_RATE_THRESHOLD, high_error_days, is_error_status};
    use crate::store::{LogStore, ensure_schema};
    use rusqlite::{Connection, params};

    fn store_with_day(unix_day: i64, ok_requests: u64, error_requests: u64) -> LogStore {
        let connection = Connection::open_in_memory().expect("in-memory sqlite should open");
        ensure_schema(&connection).expect("schema creation should succeed");
        seed_day(&connection, unix_day, ok_requests, error_requests);
        LogStore::from_connection(connection).expect("store should open")
    }

    fn seed_day(connection: &Connection, unix_day: i64, ok_requests: u64, error_requests: u64) {
        let base_ms = unix_day * 86_400_000;
        for offset in 0..ok_requests {
            connection
                .execute(
                    "INSERT INTO log (path, status, time_unix_ms) VALUES ('/x', '200 OK', ?1)",
                    params![base_ms + offset as i64],
                )
                .expect("log row should insert");
        }
        for offset in 0..error_requests {
            connection
                .execute(
                    "INSERT INTO log (path, status, time_unix_ms) VALUES ('/x', '404 NOT FOUND', ?1)",
                    params![base_ms + 1_000 + offset as i64],
                )
                .expect("log row should insert");
        }
    }

    #[test]
    fn classifies_not_found_status_lines() {
        assert!(is_error_status("404 NOT FOUND"));
        assert!(is_error_status("404"));
        assert!(!is_error_status("200 OK"));
        assert!(!is_error_status("500 INTERNAL SERVER ERROR"));
        assert!(!is_error_status("x404"));
    }

    #[test]
    fn one_error_in_a_hundred_is_excluded() {
        // Exactly the 1% threshold must not qualify.
        let store = store_with_day(16_999, 99, 1);
        let days = high_error_days(&store).expect("report should run");
        assert!(days.is_empty(), "1/100 must not exceed the threshold");
    }

    #[test]
    fn two_errors_in_a_hundred_are_included() {
        let store = store_with_day(16_999, 98, 2);
        let days = high_error_days(&store).expect("report should run");
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].total_requests, 100);
        assert_eq!(days[0].error_requests, 2);
        assert!((days[0].error_fraction - 0.02).abs() < 1e-12);
        assert!(days[0].error_fraction > ERROR_RATE_THRESHOLD);
    }

    #[test]
    fn days_sort_by_fraction_descending() {
        let connection = Connection::open_in_memory().expect("in-memory sqlite should open");
        ensure_schema(&connection).expect("schema creation should succeed");
        seed_day(&connection, 100, 90, 10); // 10%
        seed_day(&connection, 101, 98, 2); // 2%
        seed_day(&connection, 102, 95, 5); // 5%
        let store = LogStore::from_connection(connection).expect("store should open");

        let days = high_error_days(&store).expect("report should run");
        let fractions: Vec<u64> = days.iter().map(|day| day.error_requests).collect();
        assert_eq!(fractions, vec![10, 5, 2]);
    }

    #[test]
    fn empty_log_reports_no_days() {
        let connection = Connection::open_in_memory().expect("in-memory sqlite should open");
        ensure_schema(&connection).expect("schema creation should succeed");
        let store = LogStore::from_connection(connection).expect("store should open");

        let days = high_error_days(&store).expect("empty log is not an error");
        assert!(days.is_empty());
    }
}
