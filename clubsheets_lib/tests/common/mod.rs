//! Shared helpers: an in-memory row source that counts its calls.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use clubsheets_lib::{RowSource, Rows};

/// Row source backed by a map of range -> canned response.
///
/// Unconfigured ranges answer with zero rows. Every call is counted and its
/// quota tag recorded.
#[derive(Default)]
pub struct FakeSource {
    responses: Mutex<HashMap<String, Result<Rows, clubsheets_lib::sheets_api::Error>>>,
    calls: Mutex<HashMap<String, usize>>,
    tags: Mutex<Vec<String>>,
    delay: Duration,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call waits this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn set_rows(&self, range: &str, rows: Rows) {
        self.responses
            .lock()
            .unwrap()
            .insert(range.to_string(), Ok(rows));
    }

    pub fn set_error(&self, range: &str, err: clubsheets_lib::sheets_api::Error) {
        self.responses
            .lock()
            .unwrap()
            .insert(range.to_string(), Err(err));
    }

    pub fn calls(&self, range: &str) -> usize {
        self.calls.lock().unwrap().get(range).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    pub fn tags(&self) -> Vec<String> {
        self.tags.lock().unwrap().clone()
    }
}

impl RowSource for FakeSource {
    async fn fetch_range(
        &self,
        range: &str,
        quota_tag: &str,
    ) -> Result<Rows, clubsheets_lib::sheets_api::Error> {
        {
            *self.calls.lock().unwrap().entry(range.to_string()).or_insert(0) += 1;
            self.tags.lock().unwrap().push(quota_tag.to_string());
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let response = self.responses.lock().unwrap().get(range).cloned();
        response.unwrap_or_else(|| Ok(Vec::new()))
    }
}

pub fn rows(data: &[&[&str]]) -> Rows {
    data.iter()
        .map(|r| r.iter().map(|c| c.to_string()).collect())
        .collect()
}

/// A row `width` cells wide with only the given cells filled.
pub fn wide_row(width: usize, cells: &[(usize, &str)]) -> Vec<String> {
    let mut row = vec![String::new(); width];
    for (idx, val) in cells {
        row[*idx] = val.to_string();
    }
    row
}

/// An Accounts row; `eligible` fills the eligible-to-reserve column.
pub fn account_row(cert: &str, last_name: &str, ty: &str, eligible: bool) -> Vec<String> {
    let mut cells = vec![(0, cert), (1, last_name), (2, ty)];
    if eligible {
        cells.push((43, "x"));
    }
    wide_row(44, &cells)
}

/// A Members row with the given email in the primary email column.
pub fn member_row(last_name: &str, cert: &str, ty: &str, email: &str) -> Vec<String> {
    wide_row(
        17,
        &[(0, last_name), (1, cert), (2, ty), (9, email), (16, "2")],
    )
}

/// An Over-Due row owing `total` in membership dues.
pub fn overdue_row(last_name: &str, cert: &str, ty: &str, total: &str) -> Vec<String> {
    wide_row(
        18,
        &[(0, last_name), (2, cert), (4, total), (8, total), (17, ty)],
    )
}
