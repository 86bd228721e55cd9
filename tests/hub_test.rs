use async_trait::async_trait;
use sigenbridge::codec::RegisterValue;
use sigenbridge::config::{ModbusSettings, PlausibilityLimits};
use sigenbridge::error::{Result, SigenError};
use sigenbridge::modbus::support::RegisterSupport;
use sigenbridge::modbus::transport::{ModbusTransport, ReadResponse, TransportConnector};
use sigenbridge::modbus::{DeviceAddress, Endpoint, ModbusHub};
use sigenbridge::registers::{
    INVERTER_RUNNING_INFO_REGISTERS, PLANT_PARAMETER_REGISTERS, PLANT_RUNNING_INFO_REGISTERS,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory stand-in for a Modbus gateway. Registers not present in the
/// map answer with an illegal-data-address exception, like real hardware
/// does for registers it never heard of.
#[derive(Default)]
struct FakeGateway {
    registers: Mutex<HashMap<(u8, u16), ReadResponse>>,
    writes: Mutex<Vec<(u8, u16, Vec<u16>)>>,
    timeout_on: Mutex<Option<(u8, u16)>>,
    refuse_connections: AtomicBool,
    connects: AtomicUsize,
    disconnects: AtomicUsize,
}

impl FakeGateway {
    fn set_words(&self, unit_id: u8, address: u16, words: Vec<u16>) {
        self.registers
            .lock()
            .unwrap()
            .insert((unit_id, address), ReadResponse::Words(words));
    }

    fn set_timeout(&self, target: Option<(u8, u16)>) {
        *self.timeout_on.lock().unwrap() = target;
    }
}

struct FakeTransport {
    gateway: Arc<FakeGateway>,
}

impl FakeTransport {
    fn lookup(&self, unit_id: u8, address: u16) -> Result<ReadResponse> {
        if let Some(target) = *self.gateway.timeout_on.lock().unwrap()
            && target == (unit_id, address)
        {
            return Err(SigenError::timeout("Read operation timeout"));
        }
        match self.gateway.registers.lock().unwrap().get(&(unit_id, address)) {
            Some(response) => Ok(response.clone()),
            None => Ok(ReadResponse::Exception(0x02)),
        }
    }
}

#[async_trait]
impl ModbusTransport for FakeTransport {
    async fn read_input_registers(
        &mut self,
        unit_id: u8,
        address: u16,
        _count: u16,
    ) -> Result<ReadResponse> {
        self.lookup(unit_id, address)
    }

    async fn read_holding_registers(
        &mut self,
        unit_id: u8,
        address: u16,
        _count: u16,
    ) -> Result<ReadResponse> {
        self.lookup(unit_id, address)
    }

    async fn write_single_register(&mut self, unit_id: u8, address: u16, word: u16) -> Result<()> {
        self.gateway
            .writes
            .lock()
            .unwrap()
            .push((unit_id, address, vec![word]));
        Ok(())
    }

    async fn write_multiple_registers(
        &mut self,
        unit_id: u8,
        address: u16,
        words: &[u16],
    ) -> Result<()> {
        self.gateway
            .writes
            .lock()
            .unwrap()
            .push((unit_id, address, words.to_vec()));
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        self.gateway.disconnects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct FakeConnector {
    gateway: Arc<FakeGateway>,
}

#[async_trait]
impl TransportConnector for FakeConnector {
    async fn connect(
        &self,
        endpoint: &Endpoint,
        _settings: &ModbusSettings,
    ) -> Result<Box<dyn ModbusTransport>> {
        if self.gateway.refuse_connections.load(Ordering::SeqCst) {
            return Err(SigenError::connection(
                endpoint.host.clone(),
                endpoint.port,
                "connection refused".to_string(),
            ));
        }
        self.gateway.connects.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeTransport {
            gateway: Arc::clone(&self.gateway),
        }))
    }
}

fn hub_with(gateway: &Arc<FakeGateway>, read_only: bool) -> ModbusHub {
    let settings = ModbusSettings {
        retry_count: 1,
        retry_delay_ms: 1,
        ..Default::default()
    };
    ModbusHub::with_connector(
        &settings,
        &PlausibilityLimits::default(),
        read_only,
        Arc::new(FakeConnector {
            gateway: Arc::clone(gateway),
        }),
    )
}

fn plant() -> DeviceAddress {
    DeviceAddress::new("10.0.0.9", 502, 247)
}

#[tokio::test]
async fn read_returns_only_supported_registers() {
    let gateway = Arc::new(FakeGateway::default());
    gateway.set_words(247, 30014, vec![655]); // plant_ess_soc, 65.5 %
    gateway.set_words(247, 30031, vec![0xFFFF, 0xF63C]); // plant_active_power, -2.5 kW
    let hub = hub_with(&gateway, true);

    let values = hub
        .read_registers(&plant(), &PLANT_RUNNING_INFO_REGISTERS)
        .await
        .unwrap();

    assert_eq!(
        values.get("plant_ess_soc"),
        Some(&RegisterValue::Number(65.5))
    );
    assert_eq!(
        values.get("plant_active_power"),
        Some(&RegisterValue::Number(-2.5))
    );
    assert!(!values.contains_key("plant_photovoltaic_power"));
    assert_eq!(
        hub.support_state(&plant(), "plant_photovoltaic_power"),
        RegisterSupport::Unsupported
    );
}

#[tokio::test]
async fn units_behind_one_endpoint_share_a_connection() {
    let gateway = Arc::new(FakeGateway::default());
    gateway.set_words(247, 30014, vec![655]);
    gateway.set_words(1, 30601, vec![700]); // inverter_ess_battery_soc on unit 1
    let hub = hub_with(&gateway, true);

    let inverter = DeviceAddress::new("10.0.0.9", 502, 1);
    hub.read_registers(&plant(), &PLANT_RUNNING_INFO_REGISTERS)
        .await
        .unwrap();
    let values = hub
        .read_registers(&inverter, &INVERTER_RUNNING_INFO_REGISTERS)
        .await
        .unwrap();

    assert_eq!(
        values.get("inverter_ess_battery_soc"),
        Some(&RegisterValue::Number(70.0))
    );
    assert_eq!(gateway.connects.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn concurrent_reads_open_a_single_connection() {
    let gateway = Arc::new(FakeGateway::default());
    gateway.set_words(247, 30014, vec![655]);
    gateway.set_words(1, 30601, vec![700]);
    let hub = Arc::new(hub_with(&gateway, true));

    let plant_hub = Arc::clone(&hub);
    let plant_task = tokio::spawn(async move {
        plant_hub
            .read_registers(&plant(), &PLANT_RUNNING_INFO_REGISTERS)
            .await
    });
    let inverter_hub = Arc::clone(&hub);
    let inverter_task = tokio::spawn(async move {
        let inverter = DeviceAddress::new("10.0.0.9", 502, 1);
        inverter_hub
            .read_registers(&inverter, &INVERTER_RUNNING_INFO_REGISTERS)
            .await
    });

    plant_task.await.unwrap().unwrap();
    inverter_task.await.unwrap().unwrap();

    assert_eq!(gateway.connects.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn eager_connect_is_reused_by_later_reads() {
    let gateway = Arc::new(FakeGateway::default());
    gateway.set_words(247, 30014, vec![655]);
    let hub = hub_with(&gateway, true);

    hub.connect(&plant()).await.unwrap();
    assert_eq!(gateway.connects.load(Ordering::SeqCst), 1);

    let values = hub
        .read_registers(&plant(), &PLANT_RUNNING_INFO_REGISTERS)
        .await
        .unwrap();
    assert_eq!(values.len(), 1);
    assert_eq!(gateway.connects.load(Ordering::SeqCst), 1);

    // The first read probed the whole table, so every readable register
    // now carries a settled verdict
    let verdicts = hub.device_support(&plant());
    assert_eq!(verdicts.len(), PLANT_RUNNING_INFO_REGISTERS.len());
    assert_eq!(
        verdicts
            .values()
            .filter(|state| **state == RegisterSupport::Supported)
            .count(),
        1
    );
}

#[tokio::test]
async fn write_scales_and_routes_by_register_width() {
    let gateway = Arc::new(FakeGateway::default());
    let hub = hub_with(&gateway, false);

    hub.write_parameter(
        &plant(),
        &PLANT_PARAMETER_REGISTERS,
        "plant_start_stop",
        &RegisterValue::Number(1.0),
    )
    .await
    .unwrap();
    hub.write_parameter(
        &plant(),
        &PLANT_PARAMETER_REGISTERS,
        "plant_active_power_fixed_target",
        &RegisterValue::Number(-2.5),
    )
    .await
    .unwrap();

    let writes = gateway.writes.lock().unwrap().clone();
    assert_eq!(
        writes,
        vec![
            (247, 40000, vec![1]),
            (247, 40001, vec![0xFFFF, 0xF63C]),
        ]
    );
}

#[tokio::test]
async fn read_only_gate_rejects_before_any_io() {
    let gateway = Arc::new(FakeGateway::default());
    let hub = hub_with(&gateway, true);

    let err = hub
        .write_parameter(
            &plant(),
            &PLANT_PARAMETER_REGISTERS,
            "plant_start_stop",
            &RegisterValue::Number(1.0),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, SigenError::ReadOnlyMode));
    assert_eq!(gateway.connects.load(Ordering::SeqCst), 0);
    assert!(gateway.writes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn writes_to_unknown_or_read_only_registers_are_rejected() {
    let gateway = Arc::new(FakeGateway::default());
    let hub = hub_with(&gateway, false);

    let err = hub
        .write_parameter(
            &plant(),
            &PLANT_PARAMETER_REGISTERS,
            "bogus_register",
            &RegisterValue::Number(1.0),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, SigenError::Validation { .. }));

    // Running info registers are not writable
    let err = hub
        .write_parameter(
            &plant(),
            &PLANT_RUNNING_INFO_REGISTERS,
            "plant_ess_soc",
            &RegisterValue::Number(50.0),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, SigenError::WriteRejected { .. }));

    assert_eq!(gateway.connects.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn connection_failure_names_the_endpoint() {
    let gateway = Arc::new(FakeGateway::default());
    gateway.refuse_connections.store(true, Ordering::SeqCst);
    let hub = hub_with(&gateway, true);

    let err = hub
        .read_registers(&plant(), &PLANT_RUNNING_INFO_REGISTERS)
        .await
        .unwrap_err();

    assert!(err.is_connection_failure());
    match err {
        SigenError::ConnectionFailed { host, port, .. } => {
            assert_eq!(host, "10.0.0.9");
            assert_eq!(port, 502);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn probe_verdicts_are_final_for_the_session() {
    let gateway = Arc::new(FakeGateway::default());
    let hub = hub_with(&gateway, true);

    // First probe sees nothing but exceptions
    hub.probe_registers(&plant(), &PLANT_RUNNING_INFO_REGISTERS)
        .await
        .unwrap();
    assert_eq!(
        hub.support_state(&plant(), "plant_ess_soc"),
        RegisterSupport::Unsupported
    );

    // The register appearing later does not reopen the verdict
    gateway.set_words(247, 30014, vec![655]);
    let values = hub
        .read_registers(&plant(), &PLANT_RUNNING_INFO_REGISTERS)
        .await
        .unwrap();
    assert!(values.is_empty());
}

#[tokio::test]
async fn implausible_probe_reading_settles_unsupported() {
    let gateway = Arc::new(FakeGateway::default());
    gateway.set_words(247, 30014, vec![1300]); // 130.0 %, beyond the percentage limit
    let hub = hub_with(&gateway, true);

    hub.probe_registers(&plant(), &PLANT_RUNNING_INFO_REGISTERS)
        .await
        .unwrap();

    assert_eq!(
        hub.support_state(&plant(), "plant_ess_soc"),
        RegisterSupport::Unsupported
    );
}

#[tokio::test]
async fn text_registers_probe_by_content() {
    let gateway = Arc::new(FakeGateway::default());
    // "SigenStor" packed two bytes per word, zero padded to the full width
    let mut model = vec![0x5369, 0x6765, 0x6E53, 0x746F, 0x7200];
    model.resize(15, 0);
    gateway.set_words(1, 30500, model);
    // The serial number field answers but is blank
    gateway.set_words(1, 30515, vec![0; 10]);
    let hub = hub_with(&gateway, true);

    let inverter = DeviceAddress::new("10.0.0.9", 502, 1);
    let values = hub
        .read_registers(&inverter, &INVERTER_RUNNING_INFO_REGISTERS)
        .await
        .unwrap();

    assert_eq!(
        values.get("inverter_model_type"),
        Some(&RegisterValue::Text("SigenStor".to_string()))
    );
    assert_eq!(
        hub.support_state(&inverter, "inverter_serial_number"),
        RegisterSupport::Unsupported
    );
}

#[tokio::test]
async fn write_only_registers_are_never_probed() {
    let gateway = Arc::new(FakeGateway::default());
    let hub = hub_with(&gateway, false);

    hub.probe_registers(&plant(), &PLANT_PARAMETER_REGISTERS)
        .await
        .unwrap();

    // Readable parameters settled from the exception answers, but the
    // start/stop command register cannot be read back and stays unknown
    assert_eq!(
        hub.support_state(&plant(), "plant_active_power_fixed_target"),
        RegisterSupport::Unsupported
    );
    assert_eq!(
        hub.support_state(&plant(), "plant_start_stop"),
        RegisterSupport::Unknown
    );

    // Writes do not consult the verdicts
    hub.write_parameter(
        &plant(),
        &PLANT_PARAMETER_REGISTERS,
        "plant_start_stop",
        &RegisterValue::Number(1.0),
    )
    .await
    .unwrap();
    assert_eq!(
        gateway.writes.lock().unwrap().clone(),
        vec![(247, 40000, vec![1])]
    );
}

#[tokio::test]
async fn timed_out_read_flags_the_connection_for_recycling() {
    let gateway = Arc::new(FakeGateway::default());
    gateway.set_words(247, 30014, vec![655]);
    gateway.set_words(247, 30031, vec![0xFFFF, 0xF63C]);
    let hub = hub_with(&gateway, true);

    // Healthy first read settles support and opens the connection
    let values = hub
        .read_registers(&plant(), &PLANT_RUNNING_INFO_REGISTERS)
        .await
        .unwrap();
    assert_eq!(values.len(), 2);
    assert_eq!(gateway.connects.load(Ordering::SeqCst), 1);

    // A timeout mid-read omits the value and poisons the transport
    gateway.set_timeout(Some((247, 30014)));
    let values = hub
        .read_registers(&plant(), &PLANT_RUNNING_INFO_REGISTERS)
        .await
        .unwrap();
    assert!(values.is_empty());
    assert_eq!(gateway.connects.load(Ordering::SeqCst), 1);

    // The next read reconnects before touching the wire
    gateway.set_timeout(None);
    let values = hub
        .read_registers(&plant(), &PLANT_RUNNING_INFO_REGISTERS)
        .await
        .unwrap();
    assert_eq!(values.len(), 2);
    assert_eq!(gateway.connects.load(Ordering::SeqCst), 2);
    assert!(gateway.disconnects.load(Ordering::SeqCst) >= 1);
}

#[tokio::test]
async fn close_all_drops_open_connections() {
    let gateway = Arc::new(FakeGateway::default());
    gateway.set_words(247, 30014, vec![655]);
    let hub = hub_with(&gateway, true);

    hub.read_registers(&plant(), &PLANT_RUNNING_INFO_REGISTERS)
        .await
        .unwrap();
    hub.close_all().await;
    assert_eq!(gateway.disconnects.load(Ordering::SeqCst), 1);

    // Support verdicts survive the disconnect, so the next read only
    // reconnects and reads
    let values = hub
        .read_registers(&plant(), &PLANT_RUNNING_INFO_REGISTERS)
        .await
        .unwrap();
    assert_eq!(values.len(), 1);
    assert_eq!(gateway.connects.load(Ordering::SeqCst), 2);
}
