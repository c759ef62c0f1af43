use anyhow::{Context, Result};
use jkbms_lib::protocol::BmsReading;
use jkbms_lib::serialport::JkBms;
use log::{error, info};
use std::time::Instant;

use crate::{commandline, mqtt};

/// Measurement name of the line-protocol payload.
const MEASUREMENT: &str = "battery_measurements";

/// One poll cycle: request, read, decode.
pub fn poll_once(bms: &mut JkBms, timing: bool) -> Result<BmsReading> {
    let started = Instant::now();
    let reading = bms
        .read_all()
        .with_context(|| "Cannot read data from the BMS")?;
    if timing {
        info!("Poll cycle took {:?}", started.elapsed());
    }
    Ok(reading)
}

/// Formats a reading as a flat `key=value` line-protocol string.
///
/// Absent fields are left out entirely; `None` when the reading carries no
/// publishable field at all.
fn line_protocol(reading: &BmsReading) -> Option<String> {
    let mut fields = Vec::new();
    if let Some(voltage) = reading.voltage {
        fields.push(format!("voltage={voltage}"));
    }
    if let Some(current) = reading.current {
        fields.push(format!("current={current}"));
    }
    if let Some(delta) = reading.delta_voltage {
        fields.push(format!("delta_voltage={delta}"));
    }
    if let Some(soc) = reading.soc_percent {
        fields.push(format!("soc={soc}"));
    }
    if let Some(cells) = &reading.cell_voltages {
        for cell in cells {
            fields.push(format!("voltage_cell{}={}", cell.cell, cell.volts));
        }
    }
    if fields.is_empty() {
        return None;
    }
    Some(format!("{MEASUREMENT} {}", fields.join(",")))
}

pub fn run(
    mut bms: JkBms,
    output: commandline::DaemonOutput,
    interval: std::time::Duration,
    timing: bool,
) -> Result<()> {
    info!("Starting daemon mode: output={output:?}, interval={interval:?}");

    let mut mqtt_publisher: Option<mqtt::MqttPublisher> = None;

    if let commandline::DaemonOutput::Mqtt { config_file } = &output {
        let config = mqtt::MqttConfig::load(config_file)
            .with_context(|| format!("Failed to open MQTT config file at '{config_file}'"))?;
        info!("Successfully loaded MQTT config from {config_file}: {config:?}");
        let publisher =
            mqtt::MqttPublisher::new(config).with_context(|| "Failed to create MQTT publisher")?;
        info!("MQTT Publisher created successfully.");
        mqtt_publisher = Some(publisher);
    }

    loop {
        match poll_once(&mut bms, timing) {
            Ok(reading) => match &output {
                commandline::DaemonOutput::Console => {
                    println!("--- Reading at {} ---", chrono::Local::now().to_rfc3339());
                    println!("{reading:#?}");
                    println!("--------------------------");
                }
                commandline::DaemonOutput::Mqtt { .. } => {
                    if let Some(publisher) = &mqtt_publisher {
                        match line_protocol(&reading) {
                            Some(payload) => {
                                if let Err(e) = publisher.publish(publisher.topic(), &payload) {
                                    error!("Failed to publish reading to MQTT: {e:?}");
                                }
                            }
                            None => info!("No publishable fields in this reading, skipping."),
                        }
                    }
                }
            },
            Err(e) => error!("Poll cycle failed: {e:#}"),
        }
        std::thread::sleep(interval);
    }
}
