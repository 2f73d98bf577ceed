//! Demonstration contract
//!
//! The operations here are the payload behind the demonstration entry
//! points in `seam-ffi`: small, deterministic pieces of library logic that
//! together exercise every shape the boundary supports. Nothing in this
//! module knows about the C ABI.

use serde::{Deserialize, Serialize};

/// Structured value crossing the boundary as an opaque payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoRecord {
    pub id: i32,
    pub kind: i8,
    pub label: String,
    pub enabled: bool,
    pub ratio: f32,
    pub scale: f64,
}

/// Host-side callback object the demonstration drives.
///
/// One method per (argument-shape, return-shape) pair the boundary
/// exercises; the FFI layer routes each to the matching slot of the
/// host's function-pointer bundle.
pub trait DemoCallback: Send + Sync {
    fn on_u8(&self, value: u8) -> u8;
    fn on_i8(&self, value: i8) -> i8;
    fn on_i16(&self, value: i16) -> i16;
    fn on_u16(&self, value: u16) -> u16;
    fn on_i32(&self, value: i32) -> i32;
    fn on_u32(&self, value: u32) -> u32;
    fn on_i64(&self, value: i64) -> i64;
    fn on_u64(&self, value: u64) -> u64;
    fn on_f32(&self, value: f32) -> f32;
    fn on_f64(&self, value: f64) -> f64;
    fn on_flag(&self, value: bool) -> bool;
    fn on_text(&self, value: &str) -> String;
    fn on_bytes(&self, value: &[u8]) -> Vec<u8>;
    fn on_record(&self, value: DemoRecord) -> i32;
    fn on_done(&self);
}

/// Sum a slice of any element width that widens to i64
pub fn sum<T: Into<i64> + Copy>(values: &[T]) -> i64 {
    values.iter().map(|&v| v.into()).sum()
}

pub fn double_u8(values: &[u8]) -> Vec<u8> {
    values.iter().map(|v| v.wrapping_mul(2)).collect()
}

pub fn double_i32(values: &[i32]) -> Vec<i32> {
    values.iter().map(|v| v.wrapping_mul(2)).collect()
}

/// The sequence 0..count
pub fn sequence_u32(count: u32) -> Vec<u32> {
    (0..count).collect()
}

pub fn concat(left: &str, right: &str) -> String {
    format!("{left}{right}")
}

pub fn xor(left: bool, right: bool) -> bool {
    left != right
}

pub fn make_record() -> DemoRecord {
    DemoRecord {
        id: 17,
        kind: 2,
        label: "seam".to_string(),
        enabled: true,
        ratio: 0.5,
        scale: 8.25,
    }
}

pub fn sample_records() -> Vec<DemoRecord> {
    vec![
        make_record(),
        DemoRecord {
            id: -4,
            kind: 0,
            label: String::new(),
            enabled: false,
            ratio: 1.5,
            scale: -2.0,
        },
    ]
}

/// Integer summary of a record, used to prove a payload decoded intact
pub fn record_total(record: &DemoRecord) -> i64 {
    let flag = i64::from(record.enabled);
    record.id as i64 + record.kind as i64 + record.label.len() as i64 + flag
}

/// Invoke every slot of the callback and fold the results.
///
/// The checksum makes a dropped or misrouted slot visible to the caller
/// instead of silently passing.
pub fn drive_callback(callback: &dyn DemoCallback) -> i64 {
    let mut acc: i64 = 0;
    acc = acc.wrapping_add(callback.on_u8(5) as i64);
    acc = acc.wrapping_add(callback.on_i8(-3) as i64);
    acc = acc.wrapping_add(callback.on_i16(300) as i64);
    acc = acc.wrapping_add(callback.on_u16(40_000) as i64);
    acc = acc.wrapping_add(callback.on_i32(-70_000) as i64);
    acc = acc.wrapping_add(callback.on_u32(3_000_000) as i64);
    acc = acc.wrapping_add(callback.on_i64(1 << 40));
    acc = acc.wrapping_add(callback.on_u64(1 << 40) as i64);
    acc = acc.wrapping_add(callback.on_f32(1.25) as i64);
    acc = acc.wrapping_add(callback.on_f64(2.75) as i64);
    acc = acc.wrapping_add(i64::from(callback.on_flag(true)));
    acc = acc.wrapping_add(callback.on_text("ping").len() as i64);
    acc = acc.wrapping_add(callback.on_bytes(&[1, 2, 3]).iter().map(|&b| b as i64).sum());
    acc = acc.wrapping_add(callback.on_record(make_record()) as i64);
    callback.on_done();
    acc
}
