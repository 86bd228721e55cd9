//! Modbus/TCP transport layer
//!
//! Narrows tokio-modbus to the four operations the engine performs and folds
//! device exception responses into the read result so callers can classify
//! them without string matching. Connection errors, device exceptions and
//! timeouts stay distinguishable all the way up.

use crate::config::ModbusSettings;
use crate::error::{Result, SigenError};
use crate::logging::{LogContext, get_logger_with_context};
use crate::modbus::Endpoint;
use async_trait::async_trait;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_modbus::ExceptionCode;
use tokio_modbus::client::tcp;
use tokio_modbus::prelude::*;

/// Outcome of a register read that reached the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadResponse {
    /// Register words from a normal response
    Words(Vec<u16>),
    /// Modbus exception code returned by the device
    Exception(u8),
}

/// Register operations against one endpoint
///
/// The unit id is passed per call because Sigenergy shares a single TCP
/// connection between the plant, its inverters and any AC chargers.
#[async_trait]
pub trait ModbusTransport: Send {
    /// Read input registers (function code 0x04)
    async fn read_input_registers(
        &mut self,
        unit_id: u8,
        address: u16,
        count: u16,
    ) -> Result<ReadResponse>;

    /// Read holding registers (function code 0x03)
    async fn read_holding_registers(
        &mut self,
        unit_id: u8,
        address: u16,
        count: u16,
    ) -> Result<ReadResponse>;

    /// Write a single holding register (function code 0x06)
    async fn write_single_register(&mut self, unit_id: u8, address: u16, word: u16) -> Result<()>;

    /// Write consecutive holding registers (function code 0x10)
    async fn write_multiple_registers(
        &mut self,
        unit_id: u8,
        address: u16,
        words: &[u16],
    ) -> Result<()>;

    /// Close the underlying connection
    async fn disconnect(&mut self) -> Result<()>;
}

/// Opens transports for the hub; tests substitute their own implementation
#[async_trait]
pub trait TransportConnector: Send + Sync {
    async fn connect(
        &self,
        endpoint: &Endpoint,
        settings: &ModbusSettings,
    ) -> Result<Box<dyn ModbusTransport>>;
}

/// Numeric exception code for a tokio-modbus exception response
fn exception_code(code: ExceptionCode) -> u8 {
    match code {
        ExceptionCode::IllegalFunction => 0x01,
        ExceptionCode::IllegalDataAddress => 0x02,
        ExceptionCode::IllegalDataValue => 0x03,
        ExceptionCode::ServerDeviceFailure => 0x04,
        ExceptionCode::Acknowledge => 0x05,
        ExceptionCode::ServerDeviceBusy => 0x06,
        ExceptionCode::MemoryParityError => 0x08,
        ExceptionCode::GatewayPathUnavailable => 0x0A,
        ExceptionCode::GatewayTargetDevice => 0x0B,
        _ => 0xFF,
    }
}

/// Modbus/TCP transport backed by tokio-modbus
pub struct TcpTransport {
    /// Attached tokio-modbus context
    ctx: tokio_modbus::client::Context,

    /// Endpoint this transport is connected to
    endpoint: Endpoint,

    /// Per-operation timeout
    operation_timeout: Duration,

    /// Logger
    logger: crate::logging::StructuredLogger,
}

impl TcpTransport {
    /// Map a tokio-modbus error to the engine error taxonomy
    fn map_error(&self, error: tokio_modbus::Error, operation: &str) -> SigenError {
        match error {
            tokio_modbus::Error::Transport(io_error) => SigenError::connection(
                self.endpoint.host.clone(),
                self.endpoint.port,
                format!("{operation}: {io_error}"),
            ),
            other => SigenError::modbus(format!("{operation} failed: {other}")),
        }
    }
}

#[async_trait]
impl ModbusTransport for TcpTransport {
    async fn read_input_registers(
        &mut self,
        unit_id: u8,
        address: u16,
        count: u16,
    ) -> Result<ReadResponse> {
        let timeout_duration = self.operation_timeout;

        self.ctx.set_slave(Slave(unit_id));
        let request = self.ctx.read_input_registers(address, count);

        match timeout(timeout_duration, request).await {
            Ok(Ok(Ok(words))) => Ok(ReadResponse::Words(words)),
            Ok(Ok(Err(code))) => {
                self.logger.debug(&format!(
                    "Input register read at {address} on unit {unit_id} returned exception {code:?}"
                ));
                Ok(ReadResponse::Exception(exception_code(code)))
            }
            Ok(Err(e)) => Err(self.map_error(e, "read_input_registers")),
            Err(_) => Err(SigenError::timeout("Read operation timeout")),
        }
    }

    async fn read_holding_registers(
        &mut self,
        unit_id: u8,
        address: u16,
        count: u16,
    ) -> Result<ReadResponse> {
        let timeout_duration = self.operation_timeout;

        self.ctx.set_slave(Slave(unit_id));
        let request = self.ctx.read_holding_registers(address, count);

        match timeout(timeout_duration, request).await {
            Ok(Ok(Ok(words))) => Ok(ReadResponse::Words(words)),
            Ok(Ok(Err(code))) => {
                self.logger.debug(&format!(
                    "Holding register read at {address} on unit {unit_id} returned exception {code:?}"
                ));
                Ok(ReadResponse::Exception(exception_code(code)))
            }
            Ok(Err(e)) => Err(self.map_error(e, "read_holding_registers")),
            Err(_) => Err(SigenError::timeout("Read operation timeout")),
        }
    }

    async fn write_single_register(&mut self, unit_id: u8, address: u16, word: u16) -> Result<()> {
        let timeout_duration = self.operation_timeout;

        self.logger.debug(&format!(
            "Writing value {word} to register {address} on unit {unit_id}"
        ));

        self.ctx.set_slave(Slave(unit_id));
        let request = self.ctx.write_single_register(address, word);

        match timeout(timeout_duration, request).await {
            Ok(Ok(Ok(()))) => Ok(()),
            Ok(Ok(Err(code))) => Err(SigenError::modbus(format!(
                "Write to register {address} on unit {unit_id} rejected with exception {code:?}"
            ))),
            Ok(Err(e)) => Err(self.map_error(e, "write_single_register")),
            Err(_) => Err(SigenError::timeout("Write operation timeout")),
        }
    }

    async fn write_multiple_registers(
        &mut self,
        unit_id: u8,
        address: u16,
        words: &[u16],
    ) -> Result<()> {
        let timeout_duration = self.operation_timeout;

        self.logger.debug(&format!(
            "Writing {} values to registers starting at {address} on unit {unit_id}",
            words.len()
        ));

        self.ctx.set_slave(Slave(unit_id));
        let request = self.ctx.write_multiple_registers(address, words);

        match timeout(timeout_duration, request).await {
            Ok(Ok(Ok(()))) => Ok(()),
            Ok(Ok(Err(code))) => Err(SigenError::modbus(format!(
                "Write to registers at {address} on unit {unit_id} rejected with exception {code:?}"
            ))),
            Ok(Err(e)) => Err(self.map_error(e, "write_multiple_registers")),
            Err(_) => Err(SigenError::timeout("Write operation timeout")),
        }
    }

    async fn disconnect(&mut self) -> Result<()> {
        self.logger
            .debug(&format!("Disconnecting from {}", self.endpoint));
        self.ctx
            .disconnect()
            .await
            .map_err(|e| SigenError::modbus(format!("Disconnect failed: {e}")))
    }
}

/// Opens real TCP connections
pub struct TcpConnector;

#[async_trait]
impl TransportConnector for TcpConnector {
    async fn connect(
        &self,
        endpoint: &Endpoint,
        settings: &ModbusSettings,
    ) -> Result<Box<dyn ModbusTransport>> {
        let logger = get_logger_with_context(
            LogContext::new("modbus").with_device(endpoint.to_string()),
        );
        let address = format!("{}:{}", endpoint.host, endpoint.port);
        let connect_timeout = Duration::from_secs(settings.connect_timeout_secs);

        logger.info(&format!("Connecting to Modbus endpoint {address}"));

        let stream = match timeout(connect_timeout, TcpStream::connect(&address)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => {
                let err =
                    SigenError::connection(endpoint.host.clone(), endpoint.port, e.to_string());
                logger.error(&err.to_string());
                return Err(err);
            }
            Err(_) => {
                let err = SigenError::connection(
                    endpoint.host.clone(),
                    endpoint.port,
                    format!(
                        "connect timed out after {}s",
                        settings.connect_timeout_secs
                    ),
                );
                logger.error(&err.to_string());
                return Err(err);
            }
        };

        let _ = stream.set_nodelay(true);
        let ctx = tcp::attach(stream);

        logger.info("Connected to Modbus endpoint");

        Ok(Box::new(TcpTransport {
            ctx,
            endpoint: endpoint.clone(),
            operation_timeout: Duration::from_secs(settings.operation_timeout_secs),
            logger,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exception_code_mapping() {
        assert_eq!(exception_code(ExceptionCode::IllegalFunction), 0x01);
        assert_eq!(exception_code(ExceptionCode::IllegalDataAddress), 0x02);
        assert_eq!(exception_code(ExceptionCode::ServerDeviceBusy), 0x06);
    }

    #[test]
    fn test_read_response_equality() {
        assert_eq!(
            ReadResponse::Words(vec![1, 2]),
            ReadResponse::Words(vec![1, 2])
        );
        assert_ne!(ReadResponse::Words(vec![0]), ReadResponse::Exception(0x02));
    }
}
