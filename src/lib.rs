//! # Sigenbridge - Modbus/TCP Register Access for Sigenergy Fleets
//!
//! A Rust service for reading and writing Sigenergy energy storage systems
//! over Modbus/TCP, covering the plant controller, its inverters and the AC
//! and DC chargers attached to them.
//!
//! ## Features
//!
//! - **Declarative Register Catalog**: every known register with address,
//!   width, data type, gain, unit and access mode
//! - **Big-Endian Value Codec**: U16/U32/U64/S16/S32 and packed ASCII,
//!   with gain scaling on decode and encode
//! - **Shared Connections**: one lazily-opened TCP connection per gateway,
//!   shared by every unit id behind it
//! - **Register Probing**: per-device support detection so absent hardware
//!   never poisons a poll cycle
//! - **Read-Only Gate**: a configuration switch that rejects every write
//!   before any I/O happens
//! - **Fleet Polling**: interval polling of every configured device with
//!   snapshot publication
//! - **Configuration**: YAML-based configuration with validation
//!
//! ## Architecture
//!
//! The application follows a modular architecture with clear separation of concerns:
//!
//! - `config`: Configuration management and validation
//! - `logging`: Structured logging and tracing
//! - `registers`: Register catalog for every supported device kind
//! - `codec`: Word-level encoding and decoding of register values
//! - `modbus`: Connection hub, register prober and read/write front end
//! - `coordinator`: Fleet polling loop and snapshot publication

pub mod codec;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod logging;
pub mod modbus;
pub mod registers;

// Re-export commonly used types
pub use config::Config;
pub use coordinator::PollCoordinator;
pub use error::{Result, SigenError};
pub use modbus::ModbusHub;
