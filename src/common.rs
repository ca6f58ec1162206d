use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DEFAULT_OUTPUT_FILE: &str = "contactData.csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl QueryWindow {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> QueryWindow {
        QueryWindow {
            start_date,
            end_date
        }
    }
}

impl fmt::Display for QueryWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} TO {}", self.start_date.format(DATE_FORMAT), self.end_date.format(DATE_FORMAT))
    }
}

/// Connection limits in milliseconds. `None` leaves the HTTP client default in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub connect_ms: Option<u64>,
    pub read_ms: Option<u64>,
}

pub struct RunConfig {
    pub window: QueryWindow,
    pub output_file: PathBuf,
    pub verbose: bool,
    pub url: String, // carries the access token, keep out of logs
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("window", &self.window)
            .field("output_file", &self.output_file)
            .field("verbose", &self.verbose)
            .field("url", &"<redacted>")
            .finish()
    }
}

#[test]
fn test_run_config_debug_hides_url() {
    let date = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
    let config = RunConfig {
        window: QueryWindow::new(date, date),
        output_file: PathBuf::from("out.csv"),
        verbose: true,
        url: "https://example.invalid/secret-token/avhdata/range".to_owned(),
    };

    let rendered = format!("{:?}", config);
    assert!(!rendered.contains("secret-token"));
    assert!(rendered.contains("out.csv"));
}

#[test]
fn test_window_display() {
    let window = QueryWindow::new(
        NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2021, 1, 31).unwrap()
    );
    assert_eq!(window.to_string(), "2021-01-01 TO 2021-01-31");
}
