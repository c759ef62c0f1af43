use serde::Serialize;
use std::fmt;
use std::ops::Deref;

/// Recommended pause between poll cycles when running continuously.
/// The BMS is half-duplex; one outstanding request at a time.
pub const POLL_DELAY: std::time::Duration = std::time::Duration::from_millis(200);

const TX_FRAME_LENGTH: usize = 21;
/// The checksum covers the header up to and including the end flag byte.
const CHECKSUM_RANGE: std::ops::Range<usize> = 0..17;

/// Responses shorter than this carry no decodable fields.
pub const MIN_RESPONSE_LENGTH: usize = 38;

const FRAME_STX: [u8; 2] = [0x4E, 0x57];
const FRAME_LENGTH: [u8; 2] = [0x00, 0x13];
const FRAME_BMS_ID: [u8; 4] = [0x00, 0x00, 0x00, 0x00];
const COMMAND_READ_ALL_DATA: u8 = 0x06;
const SOURCE_HOST_PC: u8 = 0x03;
const TX_TYPE_READ_DATA: u8 = 0x00;
const FRAME_INFO_READ: u8 = 0x00;
const FRAME_REC_NUM: [u8; 4] = [0x00, 0x00, 0x00, 0x00];
const FRAME_END_FLAG: u8 = 0x68;

const SOFTWARE_VERSION_LENGTH: usize = 15;

/// One-byte field tags found in the response buffer.
mod tag {
    pub const CELL_VOLTAGES: u8 = 0x79;
    pub const POWER_TUBE_TEMPERATURE: u8 = 0x80;
    pub const BATTERY_BOX_TEMPERATURE: u8 = 0x81;
    pub const BATTERY_TEMPERATURE: u8 = 0x82;
    pub const TOTAL_VOLTAGE: u8 = 0x83;
    pub const CURRENT: u8 = 0x84;
    pub const STATE_OF_CHARGE: u8 = 0x85;
    pub const TEMPERATURE_SENSOR_COUNT: u8 = 0x86;
    pub const BATTERY_STRINGS: u8 = 0x8A;
    pub const WARNING_FLAGS: u8 = 0x8B;
    pub const ACTIVE_BALANCE_SWITCH: u8 = 0x9D;
    pub const CURRENT_CALIBRATION: u8 = 0xAD;
    pub const SOFTWARE_VERSION: u8 = 0xB7;
    pub const CALIBRATION_STATUS: u8 = 0xB8;
    pub const ACTUAL_CAPACITY: u8 = 0xB9;
    pub const PROTOCOL_VERSION: u8 = 0xC0;
}

macro_rules! read_bit {
    ($value:expr,$position:expr) => {
        ($value >> $position) & 1 != 0
    };
}

/// Additive 16-bit checksum over the given bytes (non-CRC despite the
/// protocol documentation calling it one).
fn checksum(buffer: &[u8]) -> u16 {
    buffer.iter().map(|&b| u32::from(b)).sum::<u32>() as u16
}

/// The fixed-layout read-all-data request frame.
///
/// Built fresh for every poll cycle by [`RequestFrame::read_all`]; no field
/// varies between polls in the current protocol scope.
pub struct RequestFrame([u8; TX_FRAME_LENGTH]);

impl RequestFrame {
    /// Builds the request frame that asks the BMS for all measurements.
    pub fn read_all() -> Self {
        let mut buffer = [0u8; TX_FRAME_LENGTH];
        buffer[0..2].copy_from_slice(&FRAME_STX);
        buffer[2..4].copy_from_slice(&FRAME_LENGTH);
        buffer[4..8].copy_from_slice(&FRAME_BMS_ID);
        buffer[8] = COMMAND_READ_ALL_DATA;
        buffer[9] = SOURCE_HOST_PC;
        buffer[10] = TX_TYPE_READ_DATA;
        buffer[11] = FRAME_INFO_READ;
        buffer[12..16].copy_from_slice(&FRAME_REC_NUM);
        buffer[16] = FRAME_END_FLAG;
        // Bytes 17..19 stay zero; the checksum occupies the last two bytes.
        let sum = checksum(&buffer[CHECKSUM_RANGE]);
        buffer[19..21].copy_from_slice(&sum.to_be_bytes());
        Self(buffer)
    }
}

impl Deref for RequestFrame {
    type Target = [u8; TX_FRAME_LENGTH];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Debug for RequestFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X?}", self.0)
    }
}

/// Voltage of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellVoltage {
    pub cell: u8,
    pub volts: f32,
}

/// State of the current calibration procedure.
///
/// The BMS reports 0 (stopped) or 1 (started); anything else is passed
/// through as [`CalibrationStatus::Unknown`] instead of being coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CalibrationStatus {
    Stopped,
    Started,
    Unknown(u8),
}

impl CalibrationStatus {
    fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::Stopped,
            1 => Self::Started,
            other => {
                log::warn!("Unknown calibration status byte: {other}");
                Self::Unknown(other)
            }
        }
    }
}

/// Warning conditions reported by the BMS, one per bit of the 0x8B field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(u8)]
pub enum Warning {
    LowCapacity = 0,
    MosOvertemperature = 1,
    ChargeOvervoltage = 2,
    DischargeUndervoltage = 3,
    BatteryOvertemperature = 4,
    ChargeOvercurrent = 5,
    DischargeOvercurrent = 6,
    CellDifferentialPressure = 7,
    BatteryBoxOvertemperature = 8,
    BatteryLowTemperature = 9,
    MonomerOvervoltage = 10,
    MonomerUndervoltage = 11,
    Protection309A = 12,
    Protection309B = 13,
}

impl Warning {
    // Bits 14 and 15 are reserved.
    const ALL: [Warning; 14] = [
        Warning::LowCapacity,
        Warning::MosOvertemperature,
        Warning::ChargeOvervoltage,
        Warning::DischargeUndervoltage,
        Warning::BatteryOvertemperature,
        Warning::ChargeOvercurrent,
        Warning::DischargeOvercurrent,
        Warning::CellDifferentialPressure,
        Warning::BatteryBoxOvertemperature,
        Warning::BatteryLowTemperature,
        Warning::MonomerOvervoltage,
        Warning::MonomerUndervoltage,
        Warning::Protection309A,
        Warning::Protection309B,
    ];
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Warning::LowCapacity => write!(f, "Low capacity alarm"),
            Warning::MosOvertemperature => write!(f, "MOS tube overtemperature alarm"),
            Warning::ChargeOvervoltage => write!(f, "Charging overvoltage alarm"),
            Warning::DischargeUndervoltage => write!(f, "Discharge undervoltage alarm"),
            Warning::BatteryOvertemperature => write!(f, "Battery over temperature alarm"),
            Warning::ChargeOvercurrent => write!(f, "Charging overcurrent alarm"),
            Warning::DischargeOvercurrent => write!(f, "Discharge overcurrent alarm"),
            Warning::CellDifferentialPressure => write!(f, "Cell differential pressure alarm"),
            Warning::BatteryBoxOvertemperature => {
                write!(f, "Overtemperature alarm in battery box")
            }
            Warning::BatteryLowTemperature => write!(f, "Battery low temperature alarm"),
            Warning::MonomerOvervoltage => write!(f, "Monomer overvoltage alarm"),
            Warning::MonomerUndervoltage => write!(f, "Monomer undervoltage alarm"),
            Warning::Protection309A => write!(f, "309_A protection alarm"),
            Warning::Protection309B => write!(f, "309_B protection alarm"),
        }
    }
}

/// The raw 16-bit warning field plus bit-level access to each condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WarningFlags(pub u16);

impl WarningFlags {
    pub fn raw(&self) -> u16 {
        self.0
    }

    pub fn is_active(&self, warning: Warning) -> bool {
        read_bit!(self.0, warning as u16)
    }

    /// All currently active warnings, in bit order.
    pub fn active(&self) -> Vec<Warning> {
        Warning::ALL
            .iter()
            .copied()
            .filter(|w| self.is_active(*w))
            .collect()
    }
}

/// One decoded telemetry reading.
///
/// Every field is optional: `None` means the tag was absent from the
/// response or its payload was truncated. A reading is created per poll,
/// never mutated, and discarded after publishing.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BmsReading {
    /// Total pack voltage in volts.
    pub voltage: Option<f32>,
    /// Pack current in amps; positive while charging.
    pub current: Option<f32>,
    /// State of charge in percent (0-100).
    pub soc_percent: Option<u8>,
    /// Per-cell voltages in the order reported by the BMS.
    pub cell_voltages: Option<Vec<CellVoltage>>,
    /// Highest minus lowest cell voltage, derived from `cell_voltages`.
    pub delta_voltage: Option<f32>,
    /// Number of battery strings in the pack.
    pub battery_strings: Option<u16>,
    /// Power tube (MOS) temperature in degrees Celsius.
    pub power_tube_temperature: Option<i32>,
    /// Battery box temperature in degrees Celsius.
    pub battery_box_temperature: Option<i32>,
    /// Battery cell temperature in degrees Celsius.
    pub battery_temperature: Option<i32>,
    /// Number of temperature sensors.
    pub temperature_sensor_count: Option<u8>,
    pub software_version: Option<String>,
    /// Actual battery capacity in amp-hours.
    pub actual_capacity_ah: Option<u16>,
    pub protocol_version: Option<u8>,
    /// Current calibration value in milliamps.
    pub current_calibration_ma: Option<u16>,
    pub calibration_status: Option<CalibrationStatus>,
    pub active_balance_enabled: Option<bool>,
    pub warnings: Option<WarningFlags>,
}

impl BmsReading {
    /// Decodes a raw response buffer into a reading.
    ///
    /// Never fails: each field is extracted independently and resolves to
    /// `None` when its tag is missing or the trailing bytes are too short.
    /// Buffers at or below [`MIN_RESPONSE_LENGTH`] yield an all-absent
    /// reading, which is the normal outcome of a timed-out or short read.
    pub fn decode(buffer: &[u8]) -> Self {
        if buffer.len() <= MIN_RESPONSE_LENGTH {
            log::warn!(
                "Undersized response ({} bytes), nothing to decode",
                buffer.len()
            );
            return Self::default();
        }
        let cell_voltages = decode_cell_voltages(buffer);
        let delta_voltage = cell_voltages.as_deref().and_then(delta_voltage);
        Self {
            voltage: u16_field(buffer, tag::TOTAL_VOLTAGE)
                .map(|raw| (f64::from(raw) * 0.01) as f32),
            current: u16_field(buffer, tag::CURRENT).and_then(decode_current),
            soc_percent: u8_field(buffer, tag::STATE_OF_CHARGE),
            cell_voltages,
            delta_voltage,
            battery_strings: u16_field(buffer, tag::BATTERY_STRINGS),
            power_tube_temperature: u16_field(buffer, tag::POWER_TUBE_TEMPERATURE)
                .map(decode_temperature),
            battery_box_temperature: u16_field(buffer, tag::BATTERY_BOX_TEMPERATURE)
                .map(decode_temperature),
            battery_temperature: u16_field(buffer, tag::BATTERY_TEMPERATURE)
                .map(decode_temperature),
            temperature_sensor_count: u8_field(buffer, tag::TEMPERATURE_SENSOR_COUNT),
            software_version: decode_software_version(buffer),
            actual_capacity_ah: u16_field(buffer, tag::ACTUAL_CAPACITY),
            protocol_version: u8_field(buffer, tag::PROTOCOL_VERSION),
            current_calibration_ma: u16_field(buffer, tag::CURRENT_CALIBRATION),
            calibration_status: u8_field(buffer, tag::CALIBRATION_STATUS)
                .map(CalibrationStatus::from_raw),
            active_balance_enabled: u8_field(buffer, tag::ACTIVE_BALANCE_SWITCH)
                .map(|raw| raw == 1),
            warnings: u16_field(buffer, tag::WARNING_FLAGS).map(WarningFlags),
        }
    }
}

/// Position of the first occurrence of `tag` in the buffer, if any.
fn find_tag(buffer: &[u8], tag: u8) -> Option<usize> {
    let position = buffer.iter().position(|&b| b == tag);
    if position.is_none() {
        log::debug!("Tag 0x{tag:02X} not found in the response");
    }
    position
}

/// One-byte field following `tag`.
fn u8_field(buffer: &[u8], tag: u8) -> Option<u8> {
    let position = find_tag(buffer, tag)?;
    buffer.get(position + 1).copied()
}

/// Big-endian two-byte field following `tag`.
fn u16_field(buffer: &[u8], tag: u8) -> Option<u16> {
    let position = find_tag(buffer, tag)?;
    let bytes = buffer.get(position + 1..position + 3)?;
    Some(u16::from_be_bytes([bytes[0], bytes[1]]))
}

/// Temperatures are sign-magnitude encoded around an offset of 100:
/// raw values above 100 are negative degrees.
fn decode_temperature(raw: u16) -> i32 {
    if raw <= 100 {
        i32::from(raw)
    } else {
        -(i32::from(raw) - 100)
    }
}

/// The current field uses a biased encoding: values up to 10000 are the
/// discharge range, values from 32768 up are the charge range. The gap in
/// between has no defined meaning and indicates a corrupt response.
fn decode_current(raw: u16) -> Option<f32> {
    if raw <= 10000 {
        Some((-(((10000.0 - f64::from(raw)) * 0.01) - 100.0)) as f32)
    } else if raw >= 32768 {
        Some(((f64::from(raw) - 32768.0) * 0.01) as f32)
    } else {
        log::warn!("Current raw value {raw} outside the charge/discharge ranges");
        None
    }
}

/// The cell voltage block: one length byte followed by 3-byte groups of
/// `[cell number, millivolts high, millivolts low]`.
fn decode_cell_voltages(buffer: &[u8]) -> Option<Vec<CellVoltage>> {
    let position = find_tag(buffer, tag::CELL_VOLTAGES)?;
    let length = usize::from(*buffer.get(position + 1)?);
    if length % 3 != 0 {
        log::warn!("Cell voltage block length {length} is not a multiple of 3");
        return None;
    }
    let payload = buffer.get(position + 2..position + 2 + length)?;
    let mut cells = Vec::with_capacity(length / 3);
    for group in payload.chunks_exact(3) {
        let millivolts = u16::from_be_bytes([group[1], group[2]]);
        cells.push(CellVoltage {
            cell: group[0],
            volts: f32::from(millivolts) / 1000.0,
        });
    }
    Some(cells)
}

/// Highest minus lowest cell voltage; `None` for an empty sequence.
fn delta_voltage(cells: &[CellVoltage]) -> Option<f32> {
    let first = cells.first()?.volts;
    let (lowest, highest) = cells
        .iter()
        .skip(1)
        .fold((first, first), |(lo, hi), c| (lo.min(c.volts), hi.max(c.volts)));
    Some(highest - lowest)
}

/// Software version string: 15 bytes of text, decoded best-effort and
/// stripped of padding NULs.
fn decode_software_version(buffer: &[u8]) -> Option<String> {
    let position = find_tag(buffer, tag::SOFTWARE_VERSION)?;
    let raw = buffer.get(position + 1..position + 1 + SOFTWARE_VERSION_LENGTH)?;
    Some(String::from_utf8_lossy(raw).trim_matches('\0').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Pads a buffer past the minimum response length so the decoder's
    /// length guard passes. Zero filler never collides with tag bytes.
    fn padded(entries: &[u8]) -> Vec<u8> {
        let mut buffer = entries.to_vec();
        while buffer.len() <= MIN_RESPONSE_LENGTH {
            buffer.push(0);
        }
        buffer
    }

    #[test]
    fn request_frame_layout() {
        let frame = RequestFrame::read_all();
        assert_eq!(frame.len(), 21);
        assert_eq!(&frame[0..2], &[0x4E, 0x57]);
        assert_eq!(&frame[2..4], &[0x00, 0x13]);
        assert_eq!(&frame[4..8], &[0x00; 4]);
        assert_eq!(frame[8], 0x06);
        assert_eq!(frame[9], 0x03);
        assert_eq!(frame[10], 0x00);
        assert_eq!(frame[11], 0x00);
        assert_eq!(&frame[12..16], &[0x00; 4]);
        assert_eq!(frame[16], 0x68);
        assert_eq!(&frame[17..19], &[0x00, 0x00]);
    }

    #[test]
    fn request_frame_checksum_round_trip() {
        let frame = RequestFrame::read_all();
        let sum: u32 = frame[0..17].iter().map(|&b| u32::from(b)).sum();
        let stored = u16::from_be_bytes([frame[19], frame[20]]);
        assert_eq!(stored, (sum & 0xFFFF) as u16);
        // Known value for the fixed frame: 0x4E+0x57+0x13+0x06+0x03+0x68.
        assert_eq!(stored, 0x0129);
    }

    #[test]
    fn request_frame_is_deterministic() {
        assert_eq!(*RequestFrame::read_all(), *RequestFrame::read_all());
    }

    #[test]
    fn undersized_response_yields_all_absent_reading() {
        let reading = BmsReading::decode(&[0x85, 0x42]);
        assert!(reading.soc_percent.is_none());

        // Length exactly 38 is still below the guard.
        let mut buffer = vec![0x85, 0x42];
        buffer.resize(38, 0);
        let reading = BmsReading::decode(&buffer);
        assert!(reading.soc_percent.is_none());
        assert!(reading.voltage.is_none());

        // One byte more and fields decode.
        buffer.resize(39, 0);
        let reading = BmsReading::decode(&buffer);
        assert_eq!(reading.soc_percent, Some(0x42));
    }

    #[test]
    fn absent_tag_leaves_only_that_field_empty() {
        // Voltage and SOC present, current absent.
        let buffer = padded(&[0x83, 0x14, 0xC2, 0x85, 0x63]);
        let reading = BmsReading::decode(&buffer);
        assert_eq!(reading.voltage, Some(53.14));
        assert_eq!(reading.soc_percent, Some(99));
        assert!(reading.current.is_none());
        assert!(reading.warnings.is_none());
    }

    #[test]
    fn truncated_field_is_absent() {
        // The voltage tag sits at the very end with only one trailing byte.
        let mut buffer = padded(&[0x85, 0x63]);
        buffer.extend_from_slice(&[0x83, 0x14]);
        let reading = BmsReading::decode(&buffer);
        assert!(reading.voltage.is_none());
        assert_eq!(reading.soc_percent, Some(99));
    }

    #[test]
    fn current_discharge_range() {
        assert_eq!(decode_current(10000), Some(100.0));
        assert_eq!(decode_current(0), Some(0.0));
        // 5000 raw: -(((10000-5000)*0.01)-100) = 50.0
        assert_eq!(decode_current(5000), Some(50.0));
    }

    #[test]
    fn current_charge_range() {
        assert_eq!(decode_current(32768), Some(0.0));
        assert_eq!(decode_current(42768), Some(100.0));
    }

    #[test]
    fn current_dead_zone_is_absent() {
        assert_eq!(decode_current(20000), None);
        assert_eq!(decode_current(10001), None);
        assert_eq!(decode_current(32767), None);
    }

    #[test]
    fn temperature_offset_encoding() {
        assert_eq!(decode_temperature(25), 25);
        assert_eq!(decode_temperature(100), 0);
        assert_eq!(decode_temperature(125), -25);
    }

    #[test]
    fn cell_voltage_block() {
        let buffer = padded(&[0x79, 0x03, 0x02, 0x03, 0xE8]);
        let reading = BmsReading::decode(&buffer);
        let cells = reading.cell_voltages.expect("cell voltages");
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].cell, 2);
        assert!((cells[0].volts - 1.000).abs() < 1e-6);
    }

    #[test]
    fn delta_voltage_is_max_minus_min() {
        let buffer = padded(&[
            0x79, 0x09, //
            0x01, 0x0C, 0xE4, // cell 1: 3300 mV
            0x02, 0x0C, 0xB2, // cell 2: 3250 mV
            0x03, 0x0C, 0xD0, // cell 3: 3280 mV
        ]);
        let reading = BmsReading::decode(&buffer);
        let delta = reading.delta_voltage.expect("delta voltage");
        assert!((delta - 0.050).abs() < 1e-5);
    }

    #[test]
    fn cell_voltage_block_truncated_is_absent() {
        // Length byte says 6 but only 4 payload bytes follow.
        let mut buffer = padded(&[0x85, 0x63]);
        buffer.extend_from_slice(&[0x79, 0x06, 0x01, 0x0C, 0xE4, 0x02]);
        let reading = BmsReading::decode(&buffer);
        assert!(reading.cell_voltages.is_none());
        assert!(reading.delta_voltage.is_none());
        assert_eq!(reading.soc_percent, Some(99));
    }

    #[test]
    fn cell_voltage_block_length_must_be_multiple_of_three() {
        let buffer = padded(&[0x79, 0x04, 0x01, 0x0C, 0xE4, 0x02]);
        let reading = BmsReading::decode(&buffer);
        assert!(reading.cell_voltages.is_none());
    }

    #[test]
    fn warning_bits() {
        let flags = WarningFlags(0x0005);
        assert_eq!(
            flags.active(),
            vec![Warning::LowCapacity, Warning::ChargeOvervoltage]
        );
        assert!(flags.is_active(Warning::LowCapacity));
        assert!(!flags.is_active(Warning::MosOvertemperature));
        assert_eq!(Warning::LowCapacity.to_string(), "Low capacity alarm");

        assert!(WarningFlags(0).active().is_empty());
    }

    #[test]
    fn software_version_is_nul_trimmed_and_lossy() {
        let mut entries = vec![0xB7];
        entries.extend_from_slice(b"11.XW_S11.26___");
        let reading = BmsReading::decode(&padded(&entries));
        assert_eq!(reading.software_version.as_deref(), Some("11.XW_S11.26___"));

        // Invalid UTF-8 is replaced, padding NULs stripped.
        let mut entries = vec![0xB7];
        entries.extend_from_slice(b"11.26");
        entries.push(0xFF);
        entries.extend_from_slice(&[0x00; 9]);
        let reading = BmsReading::decode(&padded(&entries));
        assert_eq!(reading.software_version.as_deref(), Some("11.26\u{FFFD}"));
    }

    #[test]
    fn calibration_status_third_state() {
        let reading = BmsReading::decode(&padded(&[0xB8, 0x00]));
        assert_eq!(reading.calibration_status, Some(CalibrationStatus::Stopped));
        let reading = BmsReading::decode(&padded(&[0xB8, 0x01]));
        assert_eq!(reading.calibration_status, Some(CalibrationStatus::Started));
        let reading = BmsReading::decode(&padded(&[0xB8, 0x07]));
        assert_eq!(
            reading.calibration_status,
            Some(CalibrationStatus::Unknown(7))
        );
    }

    #[test]
    fn full_response_decodes_all_fields() {
        let mut entries = vec![
            0x79, 0x06, 0x01, 0x0C, 0xE4, 0x02, 0x0C, 0xB2, // cells
            0x80, 0x00, 0x19, // power tube 25 C
            0x81, 0x00, 0x7D, // battery box -25 C
            0x82, 0x00, 0x64, // battery 0 C
            0x83, 0x14, 0xC2, // 53.14 V
            0x84, 0xA7, 0x10, // raw 42768 -> 100 A charging
            0x85, 0x63, // SOC 99
            0x86, 0x03, // 3 sensors
            0x8A, 0x00, 0x10, // 16 strings
            0x8B, 0x00, 0x05, // warnings
            0x9D, 0x01, // balance on
            0xAD, 0x03, 0xE8, // 1000 mA
        ];
        entries.extend_from_slice(&[0xB7]);
        entries.extend_from_slice(b"11.XW_S11.26___");
        entries.extend_from_slice(&[
            0xB8, 0x00, // calibration stopped
            0xB9, 0x01, 0x18, // 280 Ah
            0xC0, 0x02, // protocol version 2
        ]);
        let reading = BmsReading::decode(&padded(&entries));

        assert_eq!(reading.voltage, Some(53.14));
        assert_eq!(reading.current, Some(100.0));
        assert_eq!(reading.soc_percent, Some(99));
        assert_eq!(reading.cell_voltages.as_ref().map(Vec::len), Some(2));
        assert!((reading.delta_voltage.unwrap() - 0.050).abs() < 1e-5);
        assert_eq!(reading.battery_strings, Some(16));
        assert_eq!(reading.power_tube_temperature, Some(25));
        assert_eq!(reading.battery_box_temperature, Some(-25));
        assert_eq!(reading.battery_temperature, Some(0));
        assert_eq!(reading.temperature_sensor_count, Some(3));
        assert_eq!(reading.software_version.as_deref(), Some("11.XW_S11.26___"));
        assert_eq!(reading.actual_capacity_ah, Some(280));
        assert_eq!(reading.protocol_version, Some(2));
        assert_eq!(reading.current_calibration_ma, Some(1000));
        assert_eq!(reading.calibration_status, Some(CalibrationStatus::Stopped));
        assert_eq!(reading.active_balance_enabled, Some(true));
        assert_eq!(
            reading.warnings.unwrap().active(),
            vec![Warning::LowCapacity, Warning::ChargeOvervoltage]
        );
    }
}
