//! Input checks shared by the resource façades.
//!
//! Every check runs before a request is built and fails with
//! [`Error::Validation`].

use std::sync::LazyLock;

use regex::Regex;

use super::models::{AlertCondition, AlertParameters, CreateAlert, UpdateAlert};
use crate::error::{Error, Result};

static UUID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("UUID pattern is a valid regex")
});

static SYMBOL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][A-Z0-9.\-]{0,9}$").expect("symbol pattern is a valid regex")
});

static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])$")
        .expect("date pattern is a valid regex")
});

static TIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("time pattern is a valid regex")
});

pub const MAX_PAGE_SIZE: u32 = 100;
const MAX_API_KEY_NAME: usize = 100;
const MA_PERIODS: [u32; 2] = [50, 200];

/// Checks that `id` is a UUID.
pub fn id(field: &'static str, id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(Error::invalid_field(field, format!("{field} is required")));
    }
    if !UUID_PATTERN.is_match(id) {
        return Err(Error::invalid_field(
            field,
            format!("{field} must be a valid UUID"),
        ));
    }
    Ok(())
}

/// Trims and upper-cases a ticker symbol, then checks its format.
pub fn symbol(raw: &str) -> Result<String> {
    let symbol = raw.trim().to_ascii_uppercase();
    if symbol.is_empty() {
        return Err(Error::invalid_field("symbol", "Symbol is required"));
    }
    if !SYMBOL_PATTERN.is_match(&symbol) {
        return Err(Error::invalid_field(
            "symbol",
            format!("Invalid symbol '{}'", raw.trim()),
        ));
    }
    Ok(symbol)
}

/// Checks a page number and page size.
pub fn paging(page: Option<u32>, limit: Option<u32>) -> Result<()> {
    if page == Some(0) {
        return Err(Error::invalid_field("page", "Page must be at least 1"));
    }
    if limit.is_some_and(|l| !(1..=MAX_PAGE_SIZE).contains(&l)) {
        return Err(Error::invalid_field(
            "limit",
            format!("Limit must be between 1 and {MAX_PAGE_SIZE}"),
        ));
    }
    Ok(())
}

/// Validates an alert request, returning it with the symbol normalized.
pub fn create_alert(request: &CreateAlert) -> Result<CreateAlert> {
    let symbol = symbol(&request.symbol)?;
    threshold(request.condition, request.threshold)?;
    parameters(request.condition, request.parameters.as_ref())?;

    Ok(CreateAlert {
        symbol,
        ..request.clone()
    })
}

/// Validates an alert update.
pub fn update_alert(request: &UpdateAlert) -> Result<()> {
    if request.threshold.is_none()
        && request.notification.is_none()
        && request.status.is_none()
        && request.parameters.is_none()
    {
        return Err(Error::validation("At least one field must be updated"));
    }
    if let Some(value) = request.threshold {
        finite(value)?;
    }
    if let Some(params) = &request.parameters {
        if let Some(period) = params.period {
            ma_period(period)?;
        }
        if let Some(date) = &params.date {
            reminder_date(date)?;
        }
        if let Some(time) = &params.time {
            reminder_time(time)?;
        }
    }
    Ok(())
}

fn threshold(condition: AlertCondition, threshold: Option<f64>) -> Result<()> {
    let Some(value) = threshold else {
        if condition.requires_threshold() {
            return Err(Error::invalid_field(
                "threshold",
                format!("Threshold is required for {condition} alerts"),
            ));
        }
        return Ok(());
    };

    finite(value)?;
    match condition {
        AlertCondition::PriceAbove | AlertCondition::PriceBelow if value <= 0.0 => Err(
            Error::invalid_field("threshold", "Price threshold must be greater than 0"),
        ),
        AlertCondition::RsiLimit if !(0.0..=100.0).contains(&value) => Err(Error::invalid_field(
            "threshold",
            "RSI threshold must be between 0 and 100",
        )),
        _ => Ok(()),
    }
}

fn finite(value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::invalid_field(
            "threshold",
            "Threshold must be a finite number",
        ))
    }
}

fn parameters(condition: AlertCondition, params: Option<&AlertParameters>) -> Result<()> {
    match condition {
        AlertCondition::Reminder => {
            let date = params.and_then(|p| p.date.as_deref()).ok_or_else(|| {
                Error::invalid_field("parameters.date", "Reminder alerts require a date")
            })?;
            reminder_date(date)
        }
        AlertCondition::DailyReminder => {
            let time = params.and_then(|p| p.time.as_deref()).ok_or_else(|| {
                Error::invalid_field("parameters.time", "Daily reminder alerts require a time")
            })?;
            reminder_time(time)
        }
        c if c.is_moving_average() => match params.and_then(|p| p.period) {
            Some(period) => ma_period(period),
            None => Ok(()),
        },
        _ => Ok(()),
    }
}

fn reminder_date(date: &str) -> Result<()> {
    if DATE_PATTERN.is_match(date) {
        Ok(())
    } else {
        Err(Error::invalid_field(
            "parameters.date",
            "Date must use the YYYY-MM-DD format",
        ))
    }
}

fn reminder_time(time: &str) -> Result<()> {
    if TIME_PATTERN.is_match(time) {
        Ok(())
    } else {
        Err(Error::invalid_field(
            "parameters.time",
            "Time must use the HH:MM format",
        ))
    }
}

fn ma_period(period: u32) -> Result<()> {
    if MA_PERIODS.contains(&period) {
        Ok(())
    } else {
        Err(Error::invalid_field(
            "parameters.period",
            "Moving average period must be 50 or 200",
        ))
    }
}

/// Checks a webhook delivery URL.
pub fn webhook_url(raw: &str) -> Result<()> {
    let url = url::Url::parse(raw.trim())
        .map_err(|_| Error::invalid_field("url", format!("Invalid webhook URL '{raw}'")))?;
    if url.scheme() != "https" {
        return Err(Error::invalid_field("url", "Webhook URL must use https"));
    }
    Ok(())
}

/// Checks an API key display name.
pub fn api_key_name(name: &str) -> Result<()> {
    let length = name.trim().chars().count();
    if length == 0 {
        return Err(Error::invalid_field("name", "API key name is required"));
    }
    if length > MAX_API_KEY_NAME {
        return Err(Error::invalid_field(
            "name",
            format!("API key name must be at most {MAX_API_KEY_NAME} characters"),
        ));
    }
    Ok(())
}

/// Checks a search query.
pub fn search_query(query: &str) -> Result<()> {
    if query.trim().is_empty() {
        return Err(Error::invalid_field("query", "Search query is required"));
    }
    Ok(())
}
