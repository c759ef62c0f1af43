use crate::mqtt;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use std::time::Duration;

fn default_device_name() -> String {
    if cfg!(target_os = "windows") {
        String::from("COM1")
    } else {
        String::from("/dev/ttyUSB0")
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum CliCommands {
    /// Poll the BMS once and print the decoded reading
    Read,
    /// Run continuously, polling the BMS at a fixed interval and sending
    /// readings to an output
    Daemon {
        /// Output destination for readings
        #[command(subcommand)]
        output: DaemonOutput,
        /// Pause between poll cycles (e.g., "200ms", "1s")
        #[clap(long, short, value_parser = humantime::parse_duration, default_value = "200ms")]
        interval: Duration,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum DaemonOutput {
    /// Print each reading to the standard output (console).
    Console,
    /// Publish each reading to an MQTT broker in line-protocol format.
    Mqtt {
        /// The configuration file for the MQTT broker
        #[arg(long, default_value_t = mqtt::MqttConfig::DEFAULT_CONFIG_FILE.to_string())]
        config_file: String,
    },
}

const fn about_text() -> &'static str {
    "jk bms command line tool"
}

#[derive(Parser, Debug)]
#[command(version, about=about_text(), long_about = None)]
pub struct CliArgs {
    #[command(flatten)]
    pub verbose: Verbosity<InfoLevel>,

    /// Serial port device path (e.g., /dev/ttyUSB0 on Linux, COM1 on Windows)
    #[arg(short, long, default_value_t = default_device_name())]
    pub device: String,

    /// Serial baud rate
    #[arg(short, long, default_value_t = 115200)]
    pub baud_rate: u32,

    #[command(subcommand)]
    pub command: CliCommands,

    /// Timeout for serial I/O operations (e.g., "500ms", "1s")
    #[arg(value_parser = humantime::parse_duration, long, default_value = "500ms")]
    pub timeout: Duration,

    // The BMS is half-duplex and needs a pause before the next request frame
    /// Minimum delay between consecutive requests to the BMS (e.g., "100ms", "200ms")
    #[arg(value_parser = humantime::parse_duration, long, default_value = "200ms")]
    pub delay: Duration,

    /// Log how long each phase of a poll cycle takes
    #[arg(long)]
    pub timing: bool,
}
