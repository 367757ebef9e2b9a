//! Tests for the outbound payload layouts.
use super::*;
use crate::core::{CommandOpcode, FanSpeed};
use crate::protocol::transport::can_id::CanId;

const ALL_WRITES: [WriteCommand; 8] = [
    WriteCommand::permanent_voltage(53.5),
    WriteCommand::online_voltage(48.0),
    WriteCommand::permanent_current_limit(0.5),
    WriteCommand::online_current_limit(1.21),
    WriteCommand::max_input_current(10.0),
    WriteCommand::fan_speed(FanSpeed::Full),
    WriteCommand::walk_in(true),
    WriteCommand::walk_in_time(60.0),
];

#[test]
/// Read requests: fixed prefix, measurement code, zeroed tail.
fn test_read_payloads() {
    for measurement in Measurement::ALL {
        let payload = read_payload(measurement);
        assert_eq!(&payload[..3], &[0x01, 0xF0, 0x00]);
        assert_eq!(payload[3], measurement.code());
        assert_eq!(&payload[4..], &[0, 0, 0, 0]);
    }
    assert_eq!(
        read_payload(Measurement::Temperature),
        [0x01, 0xF0, 0x00, 0x04, 0x00, 0x00, 0x00, 0x00]
    );
}

#[test]
/// Every write opcode produces the write prefix and its own opcode byte.
fn test_write_prefix_for_every_opcode() {
    for command in ALL_WRITES {
        let payload = write_payload(&command);
        assert_eq!(payload.len(), 8);
        assert_eq!(&payload[..3], &[0x03, 0xF0, 0x00]);
        assert_eq!(payload[3], command.opcode.code());
    }
}

#[test]
/// Float argument is encoded most-significant byte first.
fn test_permanent_voltage_payload() {
    let payload = write_payload(&WriteCommand::permanent_voltage(52.5));
    assert_eq!(payload, [0x03, 0xF0, 0x00, 0x24, 0x42, 0x52, 0x00, 0x00]);
}

#[test]
/// Flag opcodes: byte 4 carries the flag, bytes 5..8 stay zero.
fn test_flag_payloads() {
    assert_eq!(
        write_payload(&WriteCommand::fan_speed(FanSpeed::Full)),
        [0x03, 0xF0, 0x00, 0x33, 0x01, 0x00, 0x00, 0x00]
    );
    assert_eq!(
        write_payload(&WriteCommand::fan_speed(FanSpeed::Auto)),
        [0x03, 0xF0, 0x00, 0x33, 0x00, 0x00, 0x00, 0x00]
    );
    assert_eq!(
        write_payload(&WriteCommand::walk_in(true)),
        [0x03, 0xF0, 0x00, 0x32, 0x01, 0x00, 0x00, 0x00]
    );
    assert_eq!(
        &write_payload(&WriteCommand::walk_in(false))[4..],
        &[0x00, 0x00, 0x00, 0x00]
    );
}

#[test]
/// Frames pick the identifier matching their category.
fn test_frames_use_configured_ids() {
    let config = BridgeConfig::new();

    let read = Request::Read(Measurement::SupplyVoltage).frame(&config);
    assert_eq!(read.id, CanId::READ_REQUEST);
    assert_eq!(read.len, 8);

    let write = Request::Write(WriteCommand::online_voltage(48.0)).frame(&config);
    assert_eq!(write.id, CanId::COMMAND);
    assert_eq!(write.data[3], CommandOpcode::OnlineVoltage.code());
    assert_eq!(write.len, 8);
}

#[test]
/// Simulated answers parse back through the response decoder.
fn test_response_frame_is_accepted_by_parser() {
    let config = BridgeConfig::new();
    let frame = response_frame(Measurement::SupplyVoltage, 229.5, &config);
    assert_eq!(frame.id, CanId::RESPONSE);
    assert_eq!(&frame.data[..4], &[0x41, 0xF0, 0x00, 0x05]);

    let reading = crate::protocol::frames::parser::decode_response(&frame, config.response_id)
        .expect("well-formed answer");
    assert_eq!(reading.measurement, Measurement::SupplyVoltage);
    assert_eq!(reading.value, 229.5);
}
