//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Once;

use strainer::Record;

static INIT: Once = Once::new();

/// Installs a tracing subscriber once per test binary. Honors `RUST_LOG`.
pub fn init_tracing() {
    INIT.call_once(|| {
        use tracing_subscriber::filter::EnvFilter;
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

#[derive(Debug, Clone, PartialEq, Record)]
pub struct Simple {
    #[filter(ops = "lt,lte,eq,gte,gt,neq", rename = "a")]
    pub a: i32,
    #[filter(ops = "lt, lte, eq, gte, gt, neq", rename = "b")]
    pub b: i64,
    #[filter(ops = "c,eq,neq,nc", rename = "str")]
    pub label: String,
    #[filter(ops = "eq", rename = "tags")]
    pub tags: Vec<String>,
    pub note: Option<String>,
}

pub fn simple(a: i32) -> Simple {
    Simple {
        a,
        b: i64::from(a) * 10,
        label: format!("wzyao{a}"),
        tags: Vec::new(),
        note: None,
    }
}

/// R1..R5 with A=1..5, B=10..50, Str="wzyao1".."wzyao5".
pub fn five() -> Vec<Simple> {
    (1..=5).map(simple).collect()
}

#[derive(Debug, Clone, Record)]
pub struct Measurement {
    #[filter(ops = "lt,lte,eq,gte,gt,neq")]
    pub tiny: u8,
    #[filter(ops = "lt,gt,eq")]
    pub offset: i16,
    #[filter(ops = "lt,lte,gte,gt")]
    pub ratio: f32,
    #[filter(ops = "eq,neq,lt")]
    pub total: f64,
    #[filter(ops = "lte,gte", kind = "u32")]
    pub count: Count,
    #[filter(ops = "eq,nc")]
    pub site: String,
}

pub type Count = u32;

pub fn measurement(tiny: u8, ratio: f32, site: &str) -> Measurement {
    Measurement {
        tiny,
        offset: -(tiny as i16),
        ratio,
        total: f64::from(ratio) * 2.0,
        count: u32::from(tiny) * 100,
        site: site.to_string(),
    }
}
