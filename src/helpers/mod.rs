//! Helper functions for templates
//!
//! These are registered as Tera filters on every compiled page:
//! `friendly_date`, `slugify`, `read_time` and `word_count`.

mod date;
mod text;

use std::collections::HashMap;
use tera::{Tera, Value};

pub use date::*;
pub use text::*;

/// Register all helpers on a Tera instance
pub fn register(tera: &mut Tera) {
    tera.register_filter("friendly_date", friendly_date_filter);
    tera.register_filter("slugify", slugify_filter);
    tera.register_filter("read_time", read_time_filter);
    tera.register_filter("word_count", word_count_filter);
}

/// Tera filter: format a post timestamp, empty for a missing date
fn friendly_date_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    match value {
        Value::Null => Ok(Value::String(String::new())),
        Value::String(s) if s.trim().is_empty() => Ok(Value::String(String::new())),
        Value::String(s) => match parse_timestamp(s) {
            Some(date) => Ok(Value::String(friendly_date(Some(&date)))),
            None => Err(tera::Error::msg(format!(
                "Filter `friendly_date` received an invalid timestamp: {:?}",
                s
            ))),
        },
        other => Err(tera::Error::msg(format!(
            "Filter `friendly_date` expects a timestamp string, got {}",
            other
        ))),
    }
}

/// Tera filter: slugify a string
fn slugify_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = tera::try_get_value!("slugify", "value", String, value);
    Ok(Value::String(slugify(&s)))
}

/// Tera filter: reading time in minutes, from a word count or a (possibly HTML) text
fn read_time_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    if let Value::Number(n) = value {
        let words = n.as_u64().ok_or_else(|| {
            tera::Error::msg(format!(
                "Filter `read_time` expects a non-negative word count, got {}",
                n
            ))
        })?;
        return Ok(Value::from(reading_minutes(words as usize)));
    }
    let s = tera::try_get_value!("read_time", "value", String, value);
    Ok(Value::from(read_time(&strip_html(&s))))
}

/// Tera filter: number of words in a (possibly HTML) text
fn word_count_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = tera::try_get_value!("word_count", "value", String, value);
    Ok(Value::from(word_count(&strip_html(&s))))
}
