//! PINFL Forge Library
//!
//! Synthetic identity batch generator: produces unique fake
//! (PINFL identifier, passport) pairs and serializes them into XLSX
//! spreadsheets, served over a single HTTP endpoint. Outputs are synthetic
//! throughout; no checksum-valid national IDs are ever produced.

pub mod api;
pub mod collector;
pub mod config;
pub mod error;
pub mod generator;
pub mod telemetry;
pub mod xlsx;

pub use collector::{collect, Record};
pub use config::ServerConfig;
pub use error::{AppError, AppResult, ErrorCode};
pub use generator::{
    generate_identifier, generate_passport, Passport, IDENTIFIER_LEN, MAX_SAFE_COUNT,
    PASSPORT_NUMBER_MAX, PASSPORT_PREFIXES, PASSPORT_SPACE,
};
pub use telemetry::{TelemetryCollector, TelemetryStats};
pub use xlsx::{build_workbook, COLUMNS, SHEET_NAME};
